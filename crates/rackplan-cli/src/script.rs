//! Line-oriented editor action scripts.
//!
//! One action per line; blank lines and `#` comments are skipped. Each line is
//! parsed with clap as if it were a command line of its own.

use clap::{Parser, Subcommand, ValueEnum};
use rackplan_core::{RackError, RackResult};
use rackplan_domain::DeviceFace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FaceArg {
    Front,
    Rear,
    Both,
}

impl From<FaceArg> for DeviceFace {
    fn from(face: FaceArg) -> Self {
        match face {
            FaceArg::Front => DeviceFace::Front,
            FaceArg::Rear => DeviceFace::Rear,
            FaceArg::Both => DeviceFace::Both,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum EditorAction {
    /// Register a device type
    AddType {
        slug: String,
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        u_height: u32,
        /// Mount on one face only
        #[arg(long)]
        half: bool,
        /// Model name, defaults to the slug
        #[arg(trailing_var_arg = true)]
        model: Vec<String>,
    },
    /// Place a device of a registered type
    Place {
        slug: String,
        position: u32,
        #[arg(value_enum, default_value_t = FaceArg::Front)]
        face: FaceArg,
    },
    /// Move a placed device to another unit
    Move { index: usize, position: u32 },
    /// Remove a placed device
    Remove { index: usize },
    /// Change the face a device is mounted on
    Face {
        index: usize,
        #[arg(value_enum)]
        face: FaceArg,
    },
    /// Rename a placed device, or clear its name when none is given
    Rename {
        index: usize,
        #[arg(trailing_var_arg = true)]
        name: Vec<String>,
    },
    /// Delete a device type and every placed instance of it
    DeleteType { slug: String },
    /// Resize the rack
    RackHeight { height: u32 },
    /// Rename the rack
    RackName {
        #[arg(required = true, trailing_var_arg = true)]
        name: Vec<String>,
    },
    /// Remove every placed device
    Clear,
    Undo,
    Redo,
    /// List undo and redo entries
    History,
    /// Print the layout and history status
    Show,
}

impl EditorAction {
    pub fn name(&self) -> &'static str {
        match self {
            EditorAction::AddType { .. } => "add-type",
            EditorAction::Place { .. } => "place",
            EditorAction::Move { .. } => "move",
            EditorAction::Remove { .. } => "remove",
            EditorAction::Face { .. } => "face",
            EditorAction::Rename { .. } => "rename",
            EditorAction::DeleteType { .. } => "delete-type",
            EditorAction::RackHeight { .. } => "rack-height",
            EditorAction::RackName { .. } => "rack-name",
            EditorAction::Clear => "clear",
            EditorAction::Undo => "undo",
            EditorAction::Redo => "redo",
            EditorAction::History => "history",
            EditorAction::Show => "show",
        }
    }
}

#[derive(Parser)]
#[command(
    name = "action",
    no_binary_name = true,
    disable_help_subcommand = true,
    color = clap::ColorChoice::Never
)]
struct ScriptLine {
    #[command(subcommand)]
    action: EditorAction,
}

/// Join trailing words, `None` when there are none.
pub fn join_words(words: &[String]) -> Option<String> {
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

/// First line of a clap error without the `error: ` prefix.
fn describe(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    first.trim_start_matches("error: ").to_string()
}

/// Parse one script line. Returns `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> RackResult<Option<EditorAction>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    ScriptLine::try_parse_from(line.split_whitespace())
        .map(|parsed| Some(parsed.action))
        .map_err(|e| RackError::Validation(describe(&e)))
}
