use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rackplan")]
#[command(about = "Replay rack layout edits through an undo/redo history", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Maximum number of undoable actions (overrides config)
    #[arg(long, env = "RACKPLAN_MAX_DEPTH")]
    pub max_depth: Option<usize>,

    /// Height of the starting rack in units (overrides config)
    #[arg(long)]
    pub rack_height: Option<u32>,

    /// Name of the starting rack (overrides config)
    #[arg(long)]
    pub rack_name: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply editor actions from a script file, or stdin when omitted
    Run {
        #[arg(value_name = "SCRIPT")]
        script: Option<PathBuf>,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
