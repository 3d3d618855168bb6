use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::board_io;
use crate::io::store::{FileStorage, Storage};

const BOARD_TOML_TEMPLATE: &str = r##"[board]
name = "{name}"

[storage]
# Tasks are stored in .lanes/<namespace>.json
namespace = "lanes-tasks"

# --- UI Customization ---
# Uncomment and edit to override defaults.

[ui]
# default_view = "kanban"         # "kanban", "list" or "calendar"
default_tags = ["work", "personal", "study", "health", "meeting", "design", "development", "presentation"]
#
# [ui.colors]
# background = "#1A1215"
# text = "#E8D9D2"
# text_bright = "#FFFFFF"
# highlight = "#E16A54"
# dim = "#7C6A6E"
# red = "#E16A54"
# yellow = "#F39E60"
# green = "#7FB77E"
#
# [ui.tag_colors]
# work = "#7C444F"
# personal = "#9F5255"
# study = "#E16A54"
# health = "#F39E60"
"##;

/// Board name from a directory name: hyphens and underscores become spaces,
/// words are capitalized.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_board_toml(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
    BOARD_TOML_TEMPLATE.replace("{name}", &escaped)
}

pub fn cmd_init(args: InitArgs, board_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let root = match board_dir {
        Some(dir) => std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        None => std::env::current_dir()?,
    };

    if let Some(parent) = root.parent()
        && let Ok(parent_root) = board_io::discover_board(parent)
    {
        eprintln!(
            "Note: parent board found at {}/",
            parent_root.join(board_io::LANES_DIR).display()
        );
        eprintln!("Creating new board in ./{}/", board_io::LANES_DIR);
    }

    let name = args.name.unwrap_or_else(|| default_name(&root));
    let board = board_io::create_board(&root, &render_board_toml(&name), args.force)?;

    if args.empty {
        FileStorage::locked(&board.lanes_dir)?.set(board.namespace(), "[]")?;
    }

    println!(
        "Initialized board '{}' in ./{}/",
        board.config.board.name,
        board_io::LANES_DIR
    );
    Ok(())
}

fn default_name(root: &Path) -> String {
    root.file_name()
        .and_then(|n| n.to_str())
        .map(infer_name)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Tasks".to_string())
}
