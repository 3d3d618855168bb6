mod init;
pub use init::cmd_init;

use std::path::PathBuf;

use chrono::{Datelike, Local, NaiveDate};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::board_io;
use crate::io::recovery;
use crate::io::store::{FileStorage, TaskStore};
use crate::model::board::Board;
use crate::model::task::{Status, Task, TaskDraft};
use crate::ops::reconcile::DropTarget;
use crate::ops::{calendar, search, task_ops};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let ctx = Context::resolve(cli.board_dir.as_deref())?;

    match cli.command {
        None => Ok(()),
        Some(cmd) => match cmd {
            // Init is handled in main.rs before board discovery
            Commands::Init(args) => cmd_init(args, cli.board_dir.as_deref()),

            // Read commands
            Commands::List(args) => cmd_list(&ctx, args, json),
            Commands::Board(args) => cmd_board(&ctx, args, json),
            Commands::Show(args) => cmd_show(&ctx, args, json),
            Commands::Search(args) => cmd_search(&ctx, args, json),
            Commands::Calendar(args) => cmd_calendar(&ctx, args, json),
            Commands::Stats => cmd_stats(&ctx, json),
            Commands::Recovery(args) => cmd_recovery(&ctx, args, json),

            // Write commands
            Commands::Add(args) => cmd_add(&ctx, args, json),
            Commands::Edit(args) => cmd_edit(&ctx, args, json),
            Commands::Rm(args) => cmd_rm(&ctx, args, json),
            Commands::Done(args) => cmd_set_status(&ctx, args, true, json),
            Commands::Undo(args) => cmd_set_status(&ctx, args, false, json),
            Commands::Mv(args) => cmd_mv(&ctx, args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Where board discovery starts: the `-C` directory or the working directory
struct Context {
    start: PathBuf,
}

impl Context {
    fn resolve(board_dir: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        let start = match board_dir {
            Some(dir) => std::fs::canonicalize(dir)
                .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
            None => std::env::current_dir()?,
        };
        Ok(Context { start })
    }

    fn board(&self) -> Result<Board, board_io::BoardError> {
        board_io::open_board(&self.start)
    }

    fn store(&self) -> Result<(Board, TaskStore<FileStorage>), board_io::BoardError> {
        let board = self.board()?;
        let store = board_io::load_store(&board)?;
        Ok((board, store))
    }

    /// The store for a write command, with the board locked until the
    /// handler returns
    fn store_for_write(&self) -> Result<(Board, TaskStore<FileStorage>), board_io::BoardError> {
        let board = self.board()?;
        let store = board_io::load_locked_store(&board)?;
        Ok((board, store))
    }
}

fn print_lines(lines: impl IntoIterator<Item = String>) {
    for line in lines {
        println!("{}", line);
    }
}

fn print_tasks(tasks: &[&Task], json: bool) -> CmdResult {
    if json {
        println!("{}", serde_json::to_string_pretty(tasks)?);
    } else {
        print_lines(tasks.iter().map(|t| format_task_line(t)));
    }
    Ok(())
}

/// Report the outcome of a mutation. Not-found ids are not errors: the store
/// ignores them and so does the exit status.
fn print_change(id: &str, changed: bool, verb: &str, json: bool) -> CmdResult {
    if json {
        let out = ChangeJson {
            id: id.to_string(),
            changed,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if changed {
        println!("{} {}", verb, id);
    } else {
        println!("no change");
    }
    Ok(())
}

fn split_lanes<'a>(tasks: &[&'a Task]) -> [Vec<&'a Task>; 3] {
    Status::ALL.map(|status| {
        tasks
            .iter()
            .copied()
            .filter(|t| t.status == status)
            .collect()
    })
}

/// Interpret the `mv` target. Lane ids always name a lane; a bare status
/// names a lane unless a task happens to carry that id.
fn resolve_drop_target(store: &TaskStore<FileStorage>, target: &str) -> DropTarget {
    match DropTarget::parse(target) {
        DropTarget::Task(id) if store.get(&id).is_none() => match Status::parse_status(&id) {
            Some(status) => DropTarget::Lane(status),
            None => DropTarget::Task(id),
        },
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(ctx: &Context, args: ListArgs, json: bool) -> CmdResult {
    let (_, store) = ctx.store()?;
    let status = args.status.as_deref().map(task_ops::parse_status).transpose()?;
    let tag = args.tag.as_deref().map(str::to_lowercase);

    let tasks: Vec<&Task> = search::filter_tasks(args.query.as_deref().unwrap_or(""), store.tasks())
        .into_iter()
        .filter(|t| status.is_none_or(|s| t.status == s))
        .filter(|t| {
            tag.as_ref()
                .is_none_or(|tag| t.tags.iter().any(|x| x.to_lowercase() == *tag))
        })
        .collect();
    print_tasks(&tasks, json)
}

fn cmd_board(ctx: &Context, args: BoardArgs, json: bool) -> CmdResult {
    let (_, store) = ctx.store()?;
    let filtered = search::filter_tasks(args.query.as_deref().unwrap_or(""), store.tasks());
    let lanes = split_lanes(&filtered);

    if json {
        let [pending, in_progress, completed] = lanes;
        let out = BoardJson {
            pending,
            in_progress,
            completed,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_lines(format_board(&lanes));
    }
    Ok(())
}

fn cmd_show(ctx: &Context, args: ShowArgs, json: bool) -> CmdResult {
    let (_, store) = ctx.store()?;
    let task = store
        .get(&args.id)
        .ok_or_else(|| format!("task not found: {}", args.id))?;
    if json {
        println!("{}", serde_json::to_string_pretty(task)?);
    } else {
        print_lines(format_task_detail(task));
    }
    Ok(())
}

fn cmd_search(ctx: &Context, args: SearchArgs, json: bool) -> CmdResult {
    let (_, store) = ctx.store()?;
    let tasks = search::filter_tasks(&args.query, store.tasks());
    print_tasks(&tasks, json)
}

fn cmd_calendar(ctx: &Context, args: CalendarArgs, json: bool) -> CmdResult {
    let (_, store) = ctx.store()?;
    let date = match args.date.as_deref() {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| task_ops::TaskError::InvalidDate(s.to_string()))?,
        None => Local::now().date_naive(),
    };

    if args.month {
        let days = calendar::due_days_in_month(store.tasks(), date.year(), date.month(), &Local);
        if json {
            let out = CalendarMonthJson {
                year: date.year(),
                month: date.month(),
                days: days.into_iter().collect(),
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        } else {
            let days: Vec<String> = days.iter().map(|d| d.to_string()).collect();
            println!("{}: {}", date.format("%Y-%m"), days.join(" "));
        }
        return Ok(());
    }

    let tasks = calendar::tasks_due_on(store.tasks(), date, &Local);
    if json {
        let out = CalendarDayJson {
            date: date.to_string(),
            tasks,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if tasks.is_empty() {
        println!("no tasks due on {}", date);
    } else {
        print_tasks(&tasks, false)?;
    }
    Ok(())
}

fn cmd_stats(ctx: &Context, json: bool) -> CmdResult {
    let (_, store) = ctx.store()?;
    let counts = task_ops::lane_counts(store.tasks());
    if json {
        println!("{}", serde_json::to_string_pretty(&StatsJson::from(counts))?);
    } else {
        print_lines(format_stats(counts));
    }
    Ok(())
}

fn cmd_recovery(ctx: &Context, args: RecoveryArgs, json: bool) -> CmdResult {
    let board = ctx.board()?;
    let entries = recovery::read_recovery_entries(&board.lanes_dir, args.limit);
    if json {
        let out: Vec<_> = entries.iter().map(recovery_entry_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if entries.is_empty() {
        println!("recovery log is empty");
    } else {
        for entry in &entries {
            print_lines(format_recovery_entry(entry));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(ctx: &Context, args: AddArgs, json: bool) -> CmdResult {
    task_ops::validate_title(&args.title)?;

    let mut draft = TaskDraft::new(args.title);
    if let Some(desc) = args.description {
        draft.description = desc;
    }
    if let Some(p) = args.priority.as_deref() {
        draft.priority = task_ops::parse_priority(p)?;
    }
    if let Some(s) = args.status.as_deref() {
        draft.status = task_ops::parse_status(s)?;
    }
    if let Some(d) = args.due.as_deref() {
        draft.due_date = Some(task_ops::parse_due_date(d)?);
    }
    for tag in &args.tags {
        task_ops::add_tag(&mut draft.tags, tag);
    }

    let (_, mut store) = ctx.store_for_write()?;
    let id = store.add(draft)?;
    if json {
        if let Some(task) = store.get(&id) {
            println!("{}", serde_json::to_string_pretty(task)?);
        }
    } else {
        println!("{}", id);
    }
    Ok(())
}

fn cmd_edit(ctx: &Context, args: EditArgs, json: bool) -> CmdResult {
    // Validate every input before touching the store
    if let Some(title) = args.title.as_deref() {
        task_ops::validate_title(title)?;
    }
    let priority = args.priority.as_deref().map(task_ops::parse_priority).transpose()?;
    let status = args.status.as_deref().map(task_ops::parse_status).transpose()?;
    let due = args.due.as_deref().map(task_ops::parse_due_date).transpose()?;

    let (_, mut store) = ctx.store_for_write()?;
    let Some(mut task) = store.get(&args.id).cloned() else {
        return print_change(&args.id, false, "updated", json);
    };

    if let Some(title) = args.title {
        task.title = title;
    }
    if let Some(desc) = args.description {
        task.description = desc;
    }
    if let Some(p) = priority {
        task.priority = p;
    }
    if let Some(s) = status {
        task.status = s;
    }
    if due.is_some() || args.no_due {
        task.due_date = due;
    }
    for tag in &args.tags {
        task_ops::add_tag(&mut task.tags, tag);
    }
    for tag in &args.untags {
        task_ops::remove_tag(&mut task.tags, tag);
    }

    let changed = store.update(task)?;
    print_change(&args.id, changed, "updated", json)
}

fn cmd_rm(ctx: &Context, args: RmArgs, json: bool) -> CmdResult {
    let (board, mut store) = ctx.store_for_write()?;
    let removed = store.delete(&args.id)?;
    if let Some(task) = &removed {
        let body = serde_json::to_string_pretty(task)?;
        recovery::log_task_deletion(&board.lanes_dir, &task.id, &task.title, &body);
    }
    print_change(&args.id, removed.is_some(), "deleted", json)
}

fn cmd_set_status(ctx: &Context, args: IdArg, completed: bool, json: bool) -> CmdResult {
    let (_, mut store) = ctx.store_for_write()?;
    let changed = store.set_status(&args.id, completed)?;
    let verb = if completed { "completed" } else { "reopened" };
    print_change(&args.id, changed, verb, json)
}

fn cmd_mv(ctx: &Context, args: MvArgs, json: bool) -> CmdResult {
    let (_, mut store) = ctx.store_for_write()?;
    let target = resolve_drop_target(&store, &args.target);
    let changed = store.move_task(&args.dragged, &target)?;
    print_change(&args.dragged, changed, "moved", json)
}
