use clap::{Parser, Subcommand, builder::styling};
use eyre::Result;
use owo_colors::OwoColorize;
use rawload::{
    NullMarkers,
    cli::{
        LoadOptions, check_connection, describe_tables, find_table, load_mysql_provider,
        load_registry, load_table, plan_load,
    },
};
use std::path::PathBuf;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// rawload: batched insert-ignore loading of CSV exports into raw staging tables
#[derive(Parser)]
#[command(name = "rawload", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source MYSQL_* settings from
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// YAML manifest replacing the built-in table definitions
    #[arg(short, long, global = true)]
    tables: Option<PathBuf>,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a CSV file into a raw table
    Load {
        /// Registered table name (see `rawload tables`)
        table: String,

        /// CSV file with a header row
        source: PathBuf,

        /// Rows per insert statement and transaction
        #[arg(short, long, default_value_t = rawload::DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// Extra source values to treat as missing
        #[arg(long = "na-marker")]
        na_markers: Vec<String>,

        /// Read and batch the source without connecting
        #[arg(long)]
        dry_run: bool,
    },

    /// List registered tables and their columns
    Tables,

    /// Test the connection to the destination database
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    match dotenvy::from_filename(&cli.env) {
        Ok(path) => log::debug!("Sourced settings from {}", path.display()),
        Err(e) if e.not_found() => log::debug!("No dotenv file at {}", cli.env),
        Err(e) => return Err(e.into()),
    }

    let registry = load_registry(cli.tables.as_deref())?;

    match cli.command {
        Commands::Load {
            table,
            source,
            batch_size,
            na_markers,
            dry_run,
        } => {
            let spec = find_table(&registry, &table)?;
            let options = LoadOptions {
                batch_size,
                nulls: NullMarkers::default().with_extra(na_markers),
            };

            if dry_run {
                log::info!(
                    "Planning {} from {}",
                    spec.table.cyan(),
                    source.display().bright_black()
                );
                let plan = plan_load(spec, &source, &options)?;
                log::info!(
                    "✓ {} row(s) in {} batch(es) of up to {}",
                    plan.rows,
                    plan.batches,
                    plan.batch_size
                );
                return Ok(());
            }

            log::info!(
                "Loading {} from {}",
                spec.table.cyan(),
                source.display().bright_black()
            );
            let provider = load_mysql_provider()?;
            let report = load_table(provider, spec, &source, &options).await?;
            log::info!(
                "✓ Inserted {} row(s) into {} ({} ignored as duplicates)",
                report.rows_affected(),
                report.table.cyan(),
                report.rows_ignored()
            );
        }
        Commands::Tables => {
            for line in describe_tables(&registry) {
                println!("{}", line);
            }
        }
        Commands::Check => {
            let provider = load_mysql_provider()?;
            check_connection(&provider).await?;
            log::info!("✓ Connected to {}", provider.config().cyan());
        }
    }

    Ok(())
}
