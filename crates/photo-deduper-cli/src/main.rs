use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use photo_deduper_core::{logging, write_report, Config, KeeperRule, LogLevel, PhotoDeduper};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photo-deduper")]
#[command(about = "Remove byte-identical duplicate photos from a directory")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a directory and delete duplicate photos
    Scan {
        /// Directory to deduplicate (defaults to the configured one)
        directory: Option<PathBuf>,

        /// Report what would be deleted without deleting anything
        #[arg(long)]
        dry_run: bool,

        /// Which copy of a duplicate group to keep
        #[arg(long, value_enum)]
        keep: Option<Keep>,

        /// Number of hashing threads (0 = one per CPU)
        #[arg(long)]
        threads: Option<usize>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,

        /// Write logs to rotating files in this directory
        #[arg(long)]
        log_dir: Option<PathBuf>,

        /// Verbosity level
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbose: u8,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate default configuration file
    GenerateConfig {
        /// Path to save configuration file
        #[arg(default_value = "photo-deduper.json")]
        path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Keep {
    /// First file in directory listing order
    ScanOrder,
    /// Earliest modification time
    OldestModified,
    /// Smallest file name
    NameOrder,
}

impl From<Keep> for KeeperRule {
    fn from(keep: Keep) -> Self {
        match keep {
            Keep::ScanOrder => KeeperRule::ScanOrder,
            Keep::OldestModified => KeeperRule::OldestModified,
            Keep::NameOrder => KeeperRule::NameOrder,
        }
    }
}

fn init_logging(config: &Config) -> Result<(), anyhow::Error> {
    let level = config.log_level.to_level_filter();
    match &config.log_dir {
        Some(log_dir) => logging::init_logger(log_dir, level)?,
        None => {
            env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(level.to_string()),
            )
            .init();
        }
    }
    Ok(())
}

fn main() -> Result<(), anyhow::Error> {
    // Parse command line arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            directory,
            dry_run,
            keep,
            threads,
            json,
            no_progress,
            log_dir,
            verbose,
            config,
        } => {
            // Set up configuration
            let mut config = if let Some(config_path) = config {
                Config::from_file(&config_path)?
            } else {
                Config::default()
            };

            // Override config with command line arguments
            if let Some(directory) = directory {
                config.directory = directory;
            }
            config.dry_run |= dry_run;
            if let Some(keep) = keep {
                config.keeper_rule = keep.into();
            }
            if let Some(threads) = threads {
                config.threads = threads;
            }
            if json || no_progress {
                config.show_progress = false;
            }
            if log_dir.is_some() {
                config.log_dir = log_dir;
            }

            // Set log level based on verbosity
            config.log_level = match verbose {
                0 => config.log_level,
                1 => LogLevel::Debug,
                _ => LogLevel::Trace,
            };

            init_logging(&config)?;

            let deduper = PhotoDeduper::new(config)?;

            info!("Starting photo deduplication...");
            let report = deduper.run()?;
            info!("Deduplication complete");

            if json {
                serde_json::to_writer_pretty(std::io::stdout().lock(), &report)?;
                println!();
            } else {
                write_report(&report, &mut std::io::stdout().lock())?;
            }

            Ok(())
        }

        Commands::GenerateConfig { path } => {
            let config = Config::default();
            config.save_to_file(&path)?;
            println!("Configuration file generated at: {}", path.display());
            Ok(())
        }
    }
}
