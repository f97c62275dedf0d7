//! shop-migrate CLI - premapping and product conversion for shop migrations.

use clap::{Parser, Subcommand};
use shop_migrate::{Config, MigrateError, Orchestrator, PremappingTable};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(name = "shop-migrate")]
#[command(about = "Shop record conversion with manufacturer premapping")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build premapping tables for the selected entity groups
    Premapping,

    /// Save operator-confirmed premapping tables
    Confirm {
        /// JSON file with premapping tables (as printed by `premapping --output-json`)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Convert source products, resolving manufacturers through premapping
    Convert {
        /// Source table to convert (defaults to source.product_table)
        #[arg(long)]
        table: Option<String>,
    },

    /// Validate the configuration and show what would run
    Check,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), MigrateError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format)
        .map_err(|e| MigrateError::Config(e.to_string()))?;

    let config = Config::load(&cli.config)?;
    info!("Loaded configuration from {:?}", cli.config);

    let orchestrator = Orchestrator::new(config)?;

    match cli.command {
        Commands::Premapping => {
            let tables = orchestrator.premapping().await?;

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&tables)?);
            } else {
                print_premapping(&tables);
            }
        }

        Commands::Confirm { file } => {
            let content = std::fs::read_to_string(&file)?;
            let tables: Vec<PremappingTable> = serde_json::from_str(&content)?;
            let saved = orchestrator.confirm(&tables).await?;

            if cli.output_json {
                println!("{}", serde_json::json!({ "confirmed": saved }));
            } else {
                println!("Saved {} confirmed premapping entries", saved);
            }
        }

        Commands::Convert { table } => {
            let result = match table {
                Some(table) => orchestrator.convert_table(&table).await?,
                None => orchestrator.convert().await?,
            };

            if cli.output_json {
                println!("{}", result.to_json()?);
            } else {
                println!("\nConversion completed!");
                println!("  Connection: {}", result.connection_id);
                println!(
                    "  Records: {}/{}",
                    result.stats.converted, result.stats.records
                );
                println!(
                    "  Unresolved manufacturer references: {}",
                    result.stats.unresolved_references
                );
                if !result.stats.unresolved_record_ids.is_empty() {
                    println!("  Affected records: {:?}", result.stats.unresolved_record_ids);
                }
                if let Some(media) = &result.media_uuids {
                    println!("  Media references: {}", media.len());
                }
            }
        }

        Commands::Check => {
            let plan = orchestrator.plan();

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                println!("Configuration is valid");
                println!("  Connection: {} ({})", plan.connection_id, plan.profile);
                println!("  Selection: {}", plan.selection.join(", "));
                if plan.premappings.is_empty() {
                    println!("  Premapping: none");
                } else {
                    println!("  Premapping: {}", plan.premappings.join(", "));
                }
                println!(
                    "  Product conversion: {}",
                    if plan.converter_supported {
                        "supported"
                    } else {
                        "not supported for this profile"
                    }
                );
            }
        }
    }

    Ok(())
}

fn print_premapping(tables: &[PremappingTable]) {
    if tables.is_empty() {
        println!("No premapping required for the selected entity groups");
        return;
    }

    for table in tables {
        let open = table.unresolved().count();
        println!(
            "\nPremapping {}: {} entries, {} need a decision, {} choices",
            table.entity,
            table.mapping.len(),
            open,
            table.choices.len()
        );
        for entity in &table.mapping {
            let destination = table
                .choices
                .iter()
                .find(|c| c.uuid == entity.destination_uuid)
                .map(|c| format!("{} ({})", c.description, c.uuid))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {:>8}  {:<30} -> {}",
                entity.source_id, entity.description, destination
            );
        }
    }
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so --output-json stays parseable.
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == "json" {
        subscriber.json().init();
    } else if format == "text" {
        subscriber.init();
    } else {
        return Err(format!("unknown log format '{}', expected text or json", format));
    }

    Ok(())
}
