// ecsfs-cli/src/main.rs

mod commands;
mod utils;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::{LogLevel, init_logger};

pub(crate) const DEFAULT_DATA_BLOCKS: u16 = 8192;

#[derive(Parser)]
#[command(name = "ecsfs", version, about = "ECS150FS disk image tool", long_about = None)]
struct Cli {
    /// Show debug output from the filesystem layer
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create and format a new disk image
    Make {
        /// Disk image path
        disk: PathBuf,
        /// Number of data blocks
        #[arg(short, long, conflicts_with = "total_blocks")]
        data_blocks: Option<u16>,
        /// Total image size in blocks, split between FAT and data
        #[arg(short, long)]
        total_blocks: Option<usize>,
        /// Zero the data region too
        #[arg(long)]
        full: bool,
    },
    /// Print volume geometry and usage
    Info { disk: PathBuf },
    /// List files
    Ls { disk: PathBuf },
    /// Copy a host file into the volume
    Add {
        disk: PathBuf,
        /// Host file to copy
        file: PathBuf,
        /// Name inside the volume (defaults to the host file name)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Print a file to stdout
    Cat { disk: PathBuf, name: String },
    /// Delete a file
    Rm { disk: PathBuf, name: String },
    /// Print the size of a file
    Stat { disk: PathBuf, name: String },
    /// Verify volume consistency
    Check { disk: PathBuf },
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Make {
            disk,
            data_blocks,
            total_blocks,
            full,
        } => commands::make(&disk, data_blocks, total_blocks, full),
        Commands::Info { disk } => commands::info(&disk),
        Commands::Ls { disk } => commands::ls(&disk),
        Commands::Add { disk, file, name } => commands::add(&disk, &file, name.as_deref()),
        Commands::Cat { disk, name } => commands::cat(&disk, &name),
        Commands::Rm { disk, name } => commands::rm(&disk, &name),
        Commands::Stat { disk, name } => commands::stat(&disk, &name),
        Commands::Check { disk } => commands::check(&disk),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(LogLevel::from_flags(cli.quiet, cli.verbose))?;
    run(cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_make() {
        let cli = Cli::try_parse_from(["ecsfs", "-q", "make", "disk.img", "-d", "100"]).unwrap();
        assert!(cli.quiet);
        assert!(matches!(
            cli.command,
            Commands::Make {
                data_blocks: Some(100),
                total_blocks: None,
                full: false,
                ..
            }
        ));
        assert!(
            Cli::try_parse_from(["ecsfs", "make", "d.img", "-d", "1", "-t", "9"]).is_err()
        );
    }

    #[test]
    fn test_image_workflow() {
        let dir = tempfile::tempdir().unwrap();
        let disk = dir.path().join("disk.img");
        let host = dir.path().join("hello.txt");
        std::fs::write(&host, b"hello ecsfs").unwrap();

        run(Commands::Make {
            disk: disk.clone(),
            data_blocks: Some(32),
            total_blocks: None,
            full: false,
        })
        .unwrap();
        run(Commands::Add {
            disk: disk.clone(),
            file: host.clone(),
            name: None,
        })
        .unwrap();
        run(Commands::Stat {
            disk: disk.clone(),
            name: "hello.txt".into(),
        })
        .unwrap();
        run(Commands::Check { disk: disk.clone() }).unwrap();

        // Name already taken
        assert!(run(Commands::Add {
            disk: disk.clone(),
            file: host,
            name: None,
        })
        .is_err());

        run(Commands::Rm {
            disk: disk.clone(),
            name: "hello.txt".into(),
        })
        .unwrap();
        assert!(run(Commands::Cat {
            disk,
            name: "hello.txt".into(),
        })
        .is_err());
    }
}
