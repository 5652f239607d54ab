pub mod output;
pub mod sets;
pub mod weekly;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sets::{process_sets_command, SetsCommand};
use tracing::level_filters::LevelFilter;
use weekly::{process_weekly_command, WeeklyCommand};

use crate::utils::{
    dir::create_application_default_path,
    logging::{enable_logging, CLI_PREFIX},
};

#[derive(Parser, Debug)]
#[command(name = "Studylog", version, long_about = None)]
#[command(about = "Analyze study sessions from a time tracking export", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        global = true,
        help = "Enable logging. Logs are also saved into $XDG_STATE_HOME/studylog/logs or $HOME/.local/state/studylog/logs"
    )]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Time spent on every study set of a category, split by activity")]
    Sets {
        #[command(flatten)]
        command: SetsCommand,
    },
    #[command(about = "Hours studied per week as a stacked bar chart with a summary")]
    Weekly {
        #[command(flatten)]
        command: WeeklyCommand,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    if args.log {
        let path = create_application_default_path()?;
        enable_logging(CLI_PREFIX, Some(&path), Some(LevelFilter::TRACE))?;
    } else {
        enable_logging(CLI_PREFIX, None, None)?;
    }

    match args.commands {
        Commands::Sets { command } => process_sets_command(command).await,
        Commands::Weekly { command } => process_weekly_command(command).await,
    }
}
