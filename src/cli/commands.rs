use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lanes", about = concat!("[>] lanes v", env!("CARGO_PKG_VERSION"), " - pending, in progress, done"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different board directory
    #[arg(short = 'C', long = "board-dir", global = true)]
    pub board_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a board in the current directory
    Init(InitArgs),
    /// List tasks, optionally filtered
    List(ListArgs),
    /// Show the three lanes side by side
    Board(BoardArgs),
    /// Show task details
    Show(ShowArgs),
    /// Add a task
    Add(AddArgs),
    /// Edit a task's fields
    Edit(EditArgs),
    /// Delete a task
    Rm(RmArgs),
    /// Mark a task completed
    Done(IdArg),
    /// Mark a task pending again
    Undo(IdArg),
    /// Drop a task onto another task or onto a lane
    Mv(MvArgs),
    /// Search titles, descriptions and tags
    Search(SearchArgs),
    /// Show tasks due on a day, or the days with tasks in a month
    Calendar(CalendarArgs),
    /// Show lane counts
    Stats,
    /// Show the recovery log
    Recovery(RecoveryArgs),
}

// ---------------------------------------------------------------------------
// Init args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Board name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Start with no tasks instead of the sample board
    #[arg(long)]
    pub empty: bool,
    /// Rewrite board.toml even if .lanes/ already exists
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Only tasks whose title, description or tags contain this text
    pub query: Option<String>,
    /// Filter by status (pending, in-progress, completed)
    #[arg(long)]
    pub status: Option<String>,
    /// Filter by tag
    #[arg(long)]
    pub tag: Option<String>,
}

#[derive(Args)]
pub struct BoardArgs {
    /// Only tasks matching this text
    pub query: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Task ID to show
    pub id: String,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Text to search for (case-insensitive)
    pub query: String,
}

#[derive(Args)]
pub struct CalendarArgs {
    /// Day to show (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub date: Option<String>,
    /// Show which days of the month have tasks due
    #[arg(long)]
    pub month: bool,
}

#[derive(Args)]
pub struct RecoveryArgs {
    /// Show only the N most recent entries
    #[arg(long)]
    pub limit: Option<usize>,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Description
    #[arg(long = "desc")]
    pub description: Option<String>,
    /// Priority (low, medium, high)
    #[arg(long)]
    pub priority: Option<String>,
    /// Lane to add to (default: pending)
    #[arg(long)]
    pub status: Option<String>,
    /// Tag (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// Due date (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: String,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New description
    #[arg(long = "desc")]
    pub description: Option<String>,
    /// New priority
    #[arg(long)]
    pub priority: Option<String>,
    /// New status
    #[arg(long)]
    pub status: Option<String>,
    /// New due date
    #[arg(long, conflicts_with = "no_due")]
    pub due: Option<String>,
    /// Clear the due date
    #[arg(long)]
    pub no_due: bool,
    /// Add a tag (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// Remove a tag (repeatable)
    #[arg(long = "untag")]
    pub untags: Vec<String>,
}

#[derive(Args)]
pub struct RmArgs {
    /// Task ID to delete
    pub id: String,
}

#[derive(Args)]
pub struct IdArg {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// Task being moved
    pub dragged: String,
    /// Task to drop before, or a lane (`column-<status>` or a bare status)
    pub target: String,
}
