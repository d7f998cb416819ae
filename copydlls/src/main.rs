use clap::{ArgAction, Parser, Subcommand};
use deploy::{CopyOptions, Deployer};
use error::Error;
use log::{error, info};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;

mod deploy;
mod error;
mod inspect;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Log more (-v debug, -vv trace)"
    )]
    verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Only log warnings and errors"
    )]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Copy DLLs in SOURCE needed by the PE executables in DESTINATION to DESTINATION
    Copy {
        #[arg(env = "COPYDLLS_SOURCE", help = "Directory holding the available DLLs")]
        source: PathBuf,

        #[arg(env = "COPYDLLS_DESTINATION", help = "Directory holding the executables")]
        destination: PathBuf,

        #[arg(long, help = "Report what would be copied without copying")]
        dry_run: bool,
    },
    /// List the DLLs imported by PE files
    Imports {
        #[arg(required = true, help = "Files to scan")]
        files: Vec<PathBuf>,

        #[arg(long, help = "Print a JSON array instead of text")]
        json: bool,
    },
}

fn log_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Warn;
    }

    match verbose {
        0 if cfg!(debug_assertions) => LevelFilter::Debug,
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let args = Args::parse();

    TermLogger::init(
        log_level(args.verbose, args.quiet),
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    match args.command {
        Command::Copy {
            source,
            destination,
            dry_run,
        } => {
            let deployer = Deployer::new(CopyOptions {
                source,
                destination,
                dry_run,
            });

            let report = match deployer.run() {
                Ok(report) => report,
                Err(err) => {
                    error!("failed to deploy dlls");
                    return Err(err.into());
                }
            };

            for file in &report.scanned {
                println!("{}", file.name);
                for import in &file.imports {
                    println!("- {} {}", import.library, import.resolution);
                }
            }

            for skipped in &report.skipped {
                println!("{} (skipped: {})", skipped.name, skipped.reason);
            }

            info!(
                "{} dll(s) {}, {} file(s) skipped",
                report.copied().count(),
                if dry_run { "to copy" } else { "copied" },
                report.skipped.len()
            );
        }
        Command::Imports { files, json } => {
            let inspection = inspect::inspect(&files);

            if json {
                println!("{}", serde_json::to_string_pretty(&inspection.reports)?);
            } else {
                for report in &inspection.reports {
                    println!("{}", report.file.display());
                    for library in &report.imports {
                        println!("- {}", library);
                    }
                }
            }

            if inspection.failures > 0 {
                return Err(Error::ScanFailed(inspection.failures).into());
            }
        }
    }

    Ok(())
}
