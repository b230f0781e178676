mod debug_report;

use clap::{Parser, Subcommand};
use inflect::{CompiledRules, RuleSet, generate_forms_verbose, table};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const DEBUG_ENV: &str = "INFLECT_DEBUG_RULES";

#[derive(Parser)]
#[command(name = "inflect", version)]
#[command(about = "Rule-driven inflection generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the merged verb table from a data directory and print it as YAML
    Table {
        /// Directory holding rules.yaml, words.yaml and optionally explicit.yaml / wikidata.yaml
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
    /// Generate parts for a single headword and print a trace report
    Generate {
        /// Rule repository (YAML)
        #[arg(long)]
        rules: PathBuf,

        /// Category to generate in
        #[arg(long)]
        category: String,

        /// Seed part, as part=value (repeatable)
        #[arg(long = "seed", value_parser = parse_seed)]
        seeds: Vec<(String, String)>,

        /// Force ANSI color output
        #[arg(long, conflicts_with = "no_color")]
        color: bool,

        /// Disable ANSI color output
        #[arg(long)]
        no_color: bool,

        /// Parts to generate
        #[arg(required = true)]
        parts: Vec<String>,
    },
}

fn main() -> ExitCode {
    if std::env::var_os(DEBUG_ENV).is_some() {
        tracing_subscriber::fmt().with_max_level(tracing::Level::TRACE).with_writer(io::stderr).init();
    }

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::from(1)
        }
    }
}

fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Table { data_dir } => {
            let forms = table::read_all_forms(&data_dir)?;
            let yaml = serde_yaml::to_string(&forms)?;
            io::stdout().lock().write_all(yaml.as_bytes())?;
        }
        Command::Generate { rules, category, seeds, color, no_color, parts } => {
            let compiled = CompiledRules::new(&RuleSet::from_path(&rules)?)?;
            let report = generate_forms_verbose(&compiled, &category, seeds, &parts)?;
            let color = if color || no_color { color } else { io::stdout().is_terminal() };
            debug_report::print_report(&report, &parts, color);
        }
    }
    Ok(())
}

fn parse_seed(arg: &str) -> Result<(String, String), String> {
    let (part, value) = arg.split_once('=').ok_or_else(|| format!("invalid seed '{arg}' (expected part=value)"))?;
    if part.is_empty() {
        return Err(format!("invalid seed '{arg}' (empty part name)"));
    }
    Ok((part.to_string(), value.to_string()))
}
