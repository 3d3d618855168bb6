use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::config::ViewMode;

/// Persisted TUI state (written to .state.json)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UiState {
    /// Which view is showing
    pub view: ViewMode,
    /// Focused lane on the board (0 = pending)
    #[serde(default)]
    pub lane: usize,
    /// Card cursor per lane
    #[serde(default)]
    pub cursors: [usize; 3],
    /// Cursor in list mode
    #[serde(default)]
    pub list_cursor: usize,
    /// Active search query
    #[serde(default)]
    pub last_search: Option<String>,
    /// Day selected in calendar mode
    #[serde(default)]
    pub calendar_date: Option<NaiveDate>,
}

pub fn read_ui_state(lanes_dir: &Path) -> Option<UiState> {
    let path = lanes_dir.join(".state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

pub fn write_ui_state(lanes_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = lanes_dir.join(".state.json");
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)
}
