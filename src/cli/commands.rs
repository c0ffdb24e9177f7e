use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "myday", about = concat!("myday v", env!("CARGO_PKG_VERSION"), " - a to-do list for today and beyond"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding todos.json and customLists.json
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Config file (default: ~/.config/myday/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task
    Add(AddArgs),
    /// List the tasks in a section or custom list
    List(ListArgs),
    /// Show task details
    Show(IdArg),
    /// Toggle a task between done and not done
    Done(IdArg),
    /// Toggle a category flag (important, my-day, planned, assigned)
    Flag(FlagArgs),
    /// Change a task's text
    Edit(EditArgs),
    /// Delete a task
    Rm(IdArg),
    /// Restore the most recently deleted task
    Undo,
    /// Move a task within a section (positions as shown by `list`)
    Mv(MvArgs),
    /// Attach a task to a custom list, or detach it
    Attach(AttachArgs),
    /// Search task text (case-insensitive)
    Search(SearchArgs),
    /// Show task counts for every section and list
    Counts,
    /// Show custom lists
    Lists,
    /// Create a custom list
    ListNew(ListNewArgs),
    /// Rename a custom list
    ListRename(ListRenameArgs),
    /// Change a custom list's theme
    ListTheme(ListThemeArgs),
    /// Delete a custom list and every task in it
    ListRm(ListNameArg),
    /// Show available themes
    Themes,
    /// Replay a recorded pointer stream through the gesture recognizer
    Gesture(GestureArgs),
}

// ---------------------------------------------------------------------------
// Task args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct IdArg {
    /// Task ID
    pub id: u64,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
    /// Mark as important
    #[arg(long)]
    pub important: bool,
    /// Add to My Day
    #[arg(long)]
    pub my_day: bool,
    /// Mark as planned
    #[arg(long)]
    pub planned: bool,
    /// Mark as assigned to me
    #[arg(long)]
    pub assigned: bool,
    /// Attach to a custom list by name
    #[arg(long)]
    pub list: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Section: my-day, important, planned, assigned, tasks
    /// (default: my-day, or tasks with --grouped)
    pub section: Option<String>,
    /// Show a custom list instead of a section
    #[arg(long, conflicts_with = "section")]
    pub list: Option<String>,
    /// Group the tasks section into My Day, Important and Completed
    #[arg(long)]
    pub grouped: bool,
}

#[derive(Args)]
pub struct FlagArgs {
    /// Task ID
    pub id: u64,
    /// Flag to toggle
    pub flag: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: u64,
    /// New text
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct MvArgs {
    /// Current position (1-based)
    pub from: usize,
    /// New position (1-based)
    pub to: usize,
    /// Section the positions refer to
    #[arg(long, default_value = "tasks")]
    pub section: String,
    /// Positions refer to a custom list
    #[arg(long, conflicts_with = "section")]
    pub list: Option<String>,
}

#[derive(Args)]
pub struct AttachArgs {
    /// Task ID
    pub id: u64,
    /// List name (omit to detach)
    pub list: Option<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Text to look for; empty matches everything
    #[arg(default_value = "")]
    pub query: String,
}

// ---------------------------------------------------------------------------
// List args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListNameArg {
    /// List name (case-insensitive)
    pub name: String,
}

#[derive(Args)]
pub struct ListNewArgs {
    /// List name
    pub name: String,
    /// Theme key (see `myday themes`)
    #[arg(long, default_value = crate::model::theme::DEFAULT_THEME)]
    pub theme: String,
}

#[derive(Args)]
pub struct ListRenameArgs {
    /// Current name
    pub name: String,
    /// New name
    pub new_name: String,
}

#[derive(Args)]
pub struct ListThemeArgs {
    /// List name
    pub name: String,
    /// Theme key
    pub theme: String,
}

// ---------------------------------------------------------------------------
// Gesture args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct GestureArgs {
    /// JSON file with `rows`, `origin_index` and `events` (default: stdin)
    pub file: Option<PathBuf>,
}
