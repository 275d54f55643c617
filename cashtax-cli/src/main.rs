use anyhow::{bail, Context, Result};
use cashtax_core::{Converter, TargetSchema};
use cashtax_ingest::{parse_cashapp_csv, read_target_schema, TokenTaxWriter};
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};

mod config;
mod report;

use config::{init_config, load_config, Config, DEFAULT_CONFIG_FILE};

#[derive(Parser, Debug)]
#[command(name = "cashtax", version, about = "Convert CashApp exports to TokenTax CSV")]
struct Cli {
    /// Config file (defaults to ./cashtax.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More logging (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a CashApp CSV export into a TokenTax import file
    Convert {
        /// CashApp CSV export
        input: PathBuf,

        /// TokenTax CSV whose header defines the output columns
        #[arg(long)]
        target_format: Option<PathBuf>,

        /// Output CSV (default: tokentax.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,

        /// Don't print a summary
        #[arg(short, long)]
        quiet: bool,
    },

    /// List the transaction types in an export and the rule each maps to
    Types {
        /// CashApp CSV export
        input: PathBuf,
    },

    /// Config file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default cashtax.toml
    Init {
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Convert {
            input,
            target_format,
            output,
            json,
            quiet,
        } => {
            let cfg = load_config(cli.config.as_deref())?;
            let opts = ConvertOptions::resolve(&cfg, target_format, output, json, quiet);
            convert(&input, &opts)?;
        }

        Command::Types { input } => {
            require_file(&input, "CashApp file")?;
            let records = parse_cashapp_csv(&input)?;
            println!("{} transactions in {}\n", records.len(), input.display());
            report::print_type_usage(&report::type_usage(&records));
        }

        Command::Config { command } => match command {
            ConfigCommand::Init { path } => init_config(&path)?,
        },
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Config values with command-line flags applied on top.
#[derive(Debug)]
struct ConvertOptions {
    target_format: Option<PathBuf>,
    output: PathBuf,
    json: bool,
    print_summary: bool,
}

impl ConvertOptions {
    fn resolve(
        cfg: &Config,
        target_format: Option<PathBuf>,
        output: Option<PathBuf>,
        json: bool,
        quiet: bool,
    ) -> Self {
        Self {
            target_format: target_format.or_else(|| cfg.convert.target_format.clone()),
            output: output.unwrap_or_else(|| cfg.convert.output.clone()),
            json: json || cfg.report.json,
            print_summary: !quiet && cfg.report.print_summary,
        }
    }
}

fn convert(input: &Path, opts: &ConvertOptions) -> Result<()> {
    require_file(input, "CashApp file")?;

    let schema = match &opts.target_format {
        Some(p) => {
            require_file(p, "Target format file")?;
            read_target_schema(p)?
        }
        None => TargetSchema::tokentax(),
    };

    let records =
        parse_cashapp_csv(input).with_context(|| format!("parsing {}", input.display()))?;

    let mut writer = TokenTaxWriter::create(&opts.output, &schema)?;
    let summary = Converter::convert_each(&records, &schema, |row| writer.write(&row))
        .with_context(|| format!("converting {}", input.display()))?;
    writer.finish()?;

    if opts.print_summary {
        if opts.json {
            report::print_summary_json(&summary, &opts.output)?;
        } else {
            println!("Found {} transactions in {}", records.len(), input.display());
            report::print_summary(&summary, &opts.output);
        }
    }
    Ok(())
}

fn require_file(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{what} not found: {}", path.display());
    }
    Ok(())
}
