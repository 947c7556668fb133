use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use optabbrev_core::{
    AbbreviationIndex, OptionSetConfig, PrefixEntry, RejectionError, Resolution,
};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

/// Output format for a rewritten argument vector.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ArgsFormat {
    Lines,
    Json,
}

/// Output format for the prefix table.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum TableFormat {
    Json,
    Yaml,
    Table,
}

#[derive(Debug, Parser)]
#[command(name = "optabbrev")]
#[command(about = "Expand abbreviated long options against a registered option set")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rewrite the arguments after `--`, expanding abbreviated long options.
    Rewrite(RewriteArgs),
    /// Resolve a single token and print the verdict.
    Resolve(ResolveArgs),
    /// Print every prefix of the option set and what it resolves to.
    Table(TableArgs),
    /// Validate the registered option set.
    Validate(ValidateArgs),
    /// Write an option-set config file.
    Init(InitArgs),
}

#[derive(Debug, Args)]
struct OptionSource {
    /// Comma-separated registered options (e.g. --options=--alpha,--beta).
    #[arg(long, allow_hyphen_values = true)]
    options: Option<String>,
    /// YAML or JSON option-set file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct RewriteArgs {
    #[command(flatten)]
    source: OptionSource,
    /// Stop expanding at a bare `--` inside the rewritten arguments.
    #[arg(long)]
    stop_at_separator: bool,
    /// Expand only the name part of `--name=value` tokens.
    #[arg(long)]
    split_assignment: bool,
    /// Print the substitutions as JSON instead of the rewritten arguments.
    #[arg(long)]
    report: bool,
    /// Output format.
    #[arg(long, default_value = "lines")]
    format: ArgsFormat,
    /// Arguments to rewrite.
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct ResolveArgs {
    #[command(flatten)]
    source: OptionSource,
    /// Token to resolve (pass after `--` if it starts with a dash).
    #[arg(allow_hyphen_values = true)]
    token: String,
}

#[derive(Debug, Args)]
struct TableArgs {
    #[command(flatten)]
    source: OptionSource,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: TableFormat,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    #[command(flatten)]
    source: OptionSource,
}

#[derive(Debug, Args)]
struct InitArgs {
    /// Comma-separated registered options.
    #[arg(long, allow_hyphen_values = true)]
    options: String,
    /// Output config path.
    #[arg(long)]
    output: PathBuf,
    /// Enable end-of-options handling for a bare `--`.
    #[arg(long)]
    stop_at_separator: bool,
    /// Enable `--name=value` splitting.
    #[arg(long)]
    split_assignment: bool,
}

#[derive(Debug, Serialize)]
struct TableRow<'a> {
    prefix: &'a str,
    #[serde(flatten)]
    entry: &'a PrefixEntry,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Rewrite(args) => run_rewrite(args),
        Command::Resolve(args) => run_resolve(args),
        Command::Table(args) => run_table(args),
        Command::Validate(args) => run_validate(args),
        Command::Init(args) => run_init(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run_rewrite(args: RewriteArgs) -> Result<(), String> {
    let mut config = load_option_set(&args.source)?;
    config.rewrite.stop_at_separator |= args.stop_at_separator;
    config.rewrite.split_assignment |= args.split_assignment;

    let index = config.build_index();
    let rewriter = config.rewriter(&index);

    if args.report {
        let report = rewriter
            .rewrite_with_report(args.args.as_slice())
            .map_err(|err| err.to_string())?;
        let raw = serde_json::to_string_pretty(&report)
            .map_err(|err| format!("JSON serialization failed: {err}"))?;
        println!("{raw}");
        return Ok(());
    }

    let rewritten = rewriter.rewrite(args.args.as_slice()).map_err(|err| err.to_string())?;
    match args.format {
        ArgsFormat::Lines => {
            for token in &rewritten {
                println!("{token}");
            }
        }
        ArgsFormat::Json => {
            let raw = serde_json::to_string(&rewritten)
                .map_err(|err| format!("JSON serialization failed: {err}"))?;
            println!("{raw}");
        }
    }

    Ok(())
}

fn run_resolve(args: ResolveArgs) -> Result<(), String> {
    let config = load_option_set(&args.source)?;
    let index = config.build_index();

    let rejection = match index.resolve(&args.token) {
        Resolution::Unique(name) => {
            println!("unique {name}");
            return Ok(());
        }
        Resolution::NotFound => {
            println!("not-found");
            RejectionError::UnknownOption(args.token)
        }
        Resolution::Ambiguous => {
            let candidates = index.candidates(&args.token);
            println!("ambiguous {}", candidates.join(" "));
            RejectionError::AmbiguousOption {
                candidates: candidates.into_iter().map(String::from).collect(),
                token: args.token,
            }
        }
    };

    Err(rejection.to_string())
}

fn run_table(args: TableArgs) -> Result<(), String> {
    let config = load_option_set(&args.source)?;
    let index = config.build_index();
    let rows = table_rows(&index);

    let raw = match args.format {
        TableFormat::Json => serde_json::to_string_pretty(&rows)
            .map_err(|e| format!("JSON serialization failed: {e}"))?,
        TableFormat::Yaml => {
            serde_yaml::to_string(&rows).map_err(|e| format!("YAML serialization failed: {e}"))?
        }
        TableFormat::Table => rows_to_table(&rows),
    };
    print!("{raw}");
    if !raw.ends_with('\n') {
        println!();
    }

    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let config = load_option_set(&args.source)?;
    config.validate().map_err(|err| err.to_string())?;
    println!("Validated {} option(s).", config.options.len());
    Ok(())
}

fn run_init(args: InitArgs) -> Result<(), String> {
    let mut config = OptionSetConfig::new(parse_csv_list(Some(args.options)));
    config.rewrite.stop_at_separator = args.stop_at_separator;
    config.rewrite.split_assignment = args.split_assignment;
    config.validate().map_err(|err| err.to_string())?;

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create output directory '{}': {err}",
                    parent.display()
                )
            })?;
        }
    }

    config
        .save(&args.output)
        .map_err(|err| format!("Failed to write '{}': {err}", args.output.display()))?;

    println!(
        "Wrote {} option(s) to '{}'.",
        config.options.len(),
        args.output.display()
    );

    Ok(())
}

/// Combines `--config` and `--options` into one option set.
fn load_option_set(source: &OptionSource) -> Result<OptionSetConfig, String> {
    let mut config = match &source.config {
        Some(path) => OptionSetConfig::load(path)
            .map_err(|err| format!("Failed to load '{}': {err}", path.display()))?,
        None => OptionSetConfig::new(Vec::<String>::new()),
    };
    config
        .options
        .extend(parse_csv_list(source.options.clone()));

    if config.options.is_empty() {
        return Err("Specify registered options with --options or --config".to_string());
    }

    debug!(options = config.options.len(), "loaded option set");
    Ok(config)
}

fn table_rows(index: &AbbreviationIndex) -> Vec<TableRow<'_>> {
    index
        .entries()
        .map(|(prefix, entry)| TableRow { prefix, entry })
        .collect()
}

fn rows_to_table(rows: &[TableRow<'_>]) -> String {
    let width = rows
        .iter()
        .map(|row| row.prefix.chars().count())
        .max()
        .unwrap_or(0)
        .max("PREFIX".len());

    let mut out = format!("{:<width$}  VERDICT    OPTION\n", "PREFIX");
    for row in rows {
        let (verdict, option) = match row.entry {
            PrefixEntry::Unique(name) => ("unique", name.as_str()),
            PrefixEntry::Ambiguous => ("ambiguous", "-"),
        };
        out.push_str(&format!("{:<width$}  {verdict:<9}  {option}\n", row.prefix));
    }
    out
}

fn parse_csv_list(raw: Option<String>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(ToOwned::to_owned)
            .collect()
    })
    .unwrap_or_default()
}
