/// clipkit - import local media into a video project
use clap::{error::ErrorKind, ArgAction, Parser, Subcommand};
use clipkit_cli::{
    commands::{self, ImportArgs},
    config::CliConfig,
    error::error_json,
    CliError,
};
use clipkit_importer::{ForceType, RenameContext};
use serde::Serialize;
use std::{path::PathBuf, process::ExitCode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "clipkit")]
#[command(about = "Import local media files into a video project", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path (defaults to ./clipkit.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug); logs go to stderr
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import files into a project directory
    Import {
        /// Project directory (must already exist)
        project_dir: PathBuf,

        /// Files to import
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Content type override: auto, video, image, music or sfx
        #[arg(long = "type", default_value = "auto")]
        force_type: ForceType,

        /// Scene identifier used in generated filenames
        #[arg(long)]
        scene: Option<String>,

        /// Label used in generated filenames
        #[arg(long)]
        label: Option<String>,

        /// Append imported files to resources.json
        #[arg(long)]
        update_manifest: bool,

        /// Report what would happen without copying or writing anything
        #[arg(long)]
        dry_run: bool,

        /// Verify copies by SHA-256
        #[arg(long)]
        verify: bool,
    },
    /// Show how files would be classified
    Classify {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Content type override: auto, video, image, music or sfx
        #[arg(long = "type", default_value = "auto")]
        force_type: ForceType,
    },
    /// Preview the filenames an import would generate
    Rename {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Content type override: auto, video, image, music or sfx
        #[arg(long = "type", default_value = "auto")]
        force_type: ForceType,

        #[arg(long)]
        scene: Option<String>,

        #[arg(long)]
        label: Option<String>,
    },
    /// List importable files under a directory
    Scan {
        /// Directory to scan
        path: PathBuf,

        /// Maximum directory depth
        #[arg(long)]
        max_depth: Option<usize>,

        /// Follow symbolic links
        #[arg(long)]
        follow_links: bool,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let rendered = e.to_string();
            let message = rendered
                .lines()
                .next()
                .unwrap_or_default()
                .trim_start_matches("error: ")
                .to_string();
            return fail(&CliError::Usage(message).into());
        }
    };

    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => fail(&e),
    }
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "clipkit_cli=warn,clipkit_importer=warn",
        1 => "clipkit_cli=info,clipkit_importer=info",
        _ => "clipkit_cli=debug,clipkit_importer=debug",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> anyhow::Result<u8> {
    let config = CliConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Import {
            project_dir,
            files,
            force_type,
            scene,
            label,
            update_manifest,
            dry_run,
            verify,
        } => {
            let report = commands::run_import(
                &config,
                ImportArgs {
                    project_dir,
                    files,
                    force_type,
                    scene_id: scene,
                    label,
                    update_manifest,
                    dry_run,
                    verify,
                },
            )?;
            print_json(&report)?;
            Ok(report.exit_code())
        }
        Commands::Classify { files, force_type } => {
            print_json(&commands::classify_files(&files, force_type))?;
            Ok(0)
        }
        Commands::Rename {
            files,
            force_type,
            scene,
            label,
        } => {
            let context = RenameContext::new(scene, label);
            print_json(&commands::preview_renames(
                &config, &files, force_type, &context,
            ))?;
            Ok(0)
        }
        Commands::Scan {
            path,
            max_depth,
            follow_links,
        } => {
            print_json(&commands::scan_directory(&path, max_depth, follow_links)?)?;
            Ok(0)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> clipkit_cli::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a fatal error as JSON on stderr
fn fail(error: &anyhow::Error) -> ExitCode {
    eprintln!("{}", error_json(&error.to_string()));
    ExitCode::from(1)
}
