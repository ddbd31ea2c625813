//! Rollo - Recurring Tasks for Plain-Text Daily Notes
//!
//! Command-line front end for the recurrence and rollover engine: evaluates
//! the vault's recurring items, vacuums unfinished tasks out of recent daily
//! records, and files everything under today's record.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rollo::{
    ConsoleNotifier, Engine, EngineConfig, FsCompletionSource, FsRecordStore, Notifier,
    NullNotifier,
};

#[derive(Parser)]
#[command(name = "rollo")]
#[command(author = "Laurence Avent")]
#[command(version = "0.1.0")]
#[command(about = "Recurring tasks and rollover for plain-text daily notes", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Vault directory (defaults to current directory)
    #[arg(long, global = true, default_value = ".")]
    vault: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate recurring items and roll over unfinished tasks
    Run {
        /// Day to evaluate (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Dry run - report what would change without writing
        #[arg(long)]
        dry_run: bool,

        /// Output the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Explain how a single line would be scheduled
    Check {
        /// The line to inspect, as it would appear on the source page
        #[arg(allow_hyphen_values = true)]
        line: String,

        /// Day to evaluate against (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Output the verdict as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or validate vault configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration files
    Validate,

    /// Show configuration file paths
    Paths,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "rollo=debug,info"
    } else {
        "rollo=info,warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Resolve vault path
    let vault_path = cli.vault.canonicalize().unwrap_or(cli.vault.clone());

    if !vault_path.exists() {
        eprintln!(
            "{} Vault directory does not exist: {}",
            "Error:".red().bold(),
            vault_path.display()
        );
        std::process::exit(1);
    }

    match cli.command {
        Commands::Run {
            date,
            dry_run,
            json,
        } => {
            let config = load_config_or_exit(&vault_path);
            let today = date.unwrap_or_else(|| chrono::Local::now().date_naive());

            // JSON mode keeps stdout machine-readable
            let notifier: Box<dyn Notifier> = if json {
                Box::new(NullNotifier::new())
            } else {
                Box::new(ConsoleNotifier::new())
            };

            let store = FsRecordStore::new(&vault_path);
            let completions = FsCompletionSource::new(&vault_path)?;
            let mut engine = match Engine::new(config, store, completions, notifier) {
                Ok(engine) => engine,
                Err(e) => {
                    eprintln!("{} {}", "Error:".red().bold(), e);
                    std::process::exit(e.exit_code());
                }
            };

            match engine.run(today, dry_run) {
                Ok(summary) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&summary)?);
                    } else {
                        println!("\n{} Run complete for {}", "OK".green().bold(), summary.date);
                        println!("   Rules parsed: {}", summary.rules_parsed);
                        println!("   Due: {}", summary.due);
                        println!("   Reclaimed from history: {}", summary.reclaimed);
                        println!("   Added: {}", summary.added);
                        println!("   Rolled over: {}", summary.rolled_over);
                        println!("   Already present: {}", summary.suppressed);
                        println!("   Records rewritten: {}", summary.rewritten_records);

                        if summary.failed_writes > 0 {
                            println!(
                                "   {} Failed writes: {}",
                                "Warning:".yellow(),
                                summary.failed_writes
                            );
                        }

                        if dry_run {
                            println!("\n   {} Dry run - no changes made", "Info:".blue());
                        }
                    }
                }
                Err(e) => {
                    eprintln!("{} {}", "Error:".red().bold(), e);
                    std::process::exit(e.exit_code());
                }
            }
        }

        Commands::Check { line, date, json } => {
            let config = load_config_or_exit(&vault_path);
            let today = date.unwrap_or_else(|| chrono::Local::now().date_naive());

            let store = FsRecordStore::new(&vault_path);
            let completions = FsCompletionSource::new(&vault_path)?;
            let mut engine = match Engine::new(config, store, completions, NullNotifier::new()) {
                Ok(engine) => engine,
                Err(e) => {
                    eprintln!("{} {}", "Error:".red().bold(), e);
                    std::process::exit(e.exit_code());
                }
            };

            match engine.check_line(&line, today) {
                Ok(Some(report)) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    } else {
                        println!("\n{} {}", "Item:".cyan().bold(), report.rule.display_text);
                        println!("{}", "─".repeat(40));
                        println!(
                            "   Rule: every {} {}(s), {} strategy",
                            report.rule.frequency, report.rule.unit, report.rule.strategy
                        );
                        match report.rule.anchor {
                            Some(anchor) => println!("   Anchor: {}", anchor),
                            None => println!("   Anchor: none"),
                        }
                        println!(
                            "   Weekends: {}",
                            if report.rule.include_weekend {
                                "included"
                            } else {
                                "skipped"
                            }
                        );
                        let verdict = if report.due {
                            "due".green().bold().to_string()
                        } else {
                            "not due".yellow().to_string()
                        };
                        println!("   On {}: {}", report.date, verdict);
                    }
                }
                Ok(None) => {
                    if json {
                        println!("{}", serde_json::json!({ "recurrence": false }));
                    } else {
                        println!("{} Not a recurrence item", "Note:".yellow());
                    }
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("{} {}", "Error:".red().bold(), e);
                    std::process::exit(e.exit_code());
                }
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show { json } => {
                let config = load_config_or_exit(&vault_path);

                if json {
                    println!("{}", serde_json::to_string_pretty(&config)?);
                } else {
                    println!("\n{} Vault Configuration", "Config:".cyan().bold());
                    println!("{}", "─".repeat(40));
                    println!("   Source page: {}", config.source_page);
                    println!("   Daily note prefix: {:?}", config.daily_note_prefix);
                    println!("   Rollover header: {}", config.rollover_header);
                    println!("   Max lookback days: {}", config.max_lookback_days);
                }
            }

            ConfigAction::Validate => {
                let local = EngineConfig::vault_config_path(&vault_path);
                if local.exists() {
                    match EngineConfig::load_from(&local).and_then(|c| c.validate()) {
                        Ok(()) => println!("{} rollo.toml is valid", "OK".green()),
                        Err(e) => {
                            eprintln!("{} rollo.toml: {}", "Error:".red(), e);
                            std::process::exit(1);
                        }
                    }
                } else {
                    println!("{} rollo.toml not found (using defaults)", "Info:".blue());
                }

                if let Some(global) = EngineConfig::global_config_path() {
                    if global.exists() {
                        match EngineConfig::load_from(&global).and_then(|c| c.validate()) {
                            Ok(()) => {
                                println!("{} {} is valid", "OK".green(), global.display());
                            }
                            Err(e) => {
                                eprintln!("{} {}: {}", "Error:".red(), global.display(), e);
                                std::process::exit(1);
                            }
                        }
                    } else {
                        println!("{} no user configuration file", "Info:".blue());
                    }
                }
            }

            ConfigAction::Paths => {
                println!("\n{} Configuration Paths", "Config:".cyan().bold());
                println!("{}", "─".repeat(40));
                println!(
                    "   Vault config: {}",
                    EngineConfig::vault_config_path(&vault_path).display()
                );
                match EngineConfig::global_config_path() {
                    Some(path) => println!("   User config: {}", path.display()),
                    None => println!("   User config: unavailable"),
                }
            }
        },
    }

    Ok(())
}

fn load_config_or_exit(vault: &Path) -> EngineConfig {
    match EngineConfig::load(vault) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(e.exit_code());
        }
    }
}
