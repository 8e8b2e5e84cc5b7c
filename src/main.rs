mod caption;
mod cli;
mod config;
mod error;
mod render;
mod transcript;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use cli::export::ExportOptions;

#[derive(Parser)]
#[command(
    name = "session-export",
    about = "Export Claude Code sessions to markdown and meeting transcripts to SRT"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export session JSONL files to one markdown document each
    Export {
        /// Claude project directory (auto-detected from cwd if omitted)
        #[arg(long)]
        project_dir: Option<PathBuf>,
        /// Output directory for markdown files
        #[arg(long, default_value = config::DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,
        /// Exclude the currently active session
        #[arg(long)]
        exclude_current: bool,
        /// Current session ID to exclude
        #[arg(long)]
        current_session: Option<String>,
        /// Export only sessions whose ID contains this string
        #[arg(long)]
        session: Option<String>,
        /// Show debug output
        #[arg(short, long)]
        verbose: bool,
    },
    /// Convert a meeting transcript HTML file to SRT subtitles
    Srt {
        /// Input HTML file
        input: PathBuf,
        /// Output SRT file (derived from the input name if omitted)
        output: Option<PathBuf>,
        /// Show debug output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            project_dir,
            output_dir,
            exclude_current,
            current_session,
            session,
            verbose,
        } => {
            init_logging(verbose);
            cli::export::run(ExportOptions {
                project_dir,
                output_dir,
                exclude_current,
                current_session,
                session,
            })?
        }
        Commands::Srt {
            input,
            output,
            verbose,
        } => {
            init_logging(verbose);
            cli::srt::run(&input, output)?
        }
    }

    Ok(())
}
