use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default storage key for the task collection
pub const DEFAULT_NAMESPACE: &str = "lanes-tasks";

/// Configuration from board.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub board: BoardInfo,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardInfo {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Key the task collection is stored under (file `<namespace>.json`)
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            namespace: default_namespace(),
        }
    }
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

/// How the TUI lays out the (filtered) task collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Kanban,
    List,
    Calendar,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Kanban, ViewMode::List, ViewMode::Calendar];

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Kanban => "Board",
            ViewMode::List => "List",
            ViewMode::Calendar => "Calendar",
        }
    }

    pub fn next(self) -> ViewMode {
        match self {
            ViewMode::Kanban => ViewMode::List,
            ViewMode::List => ViewMode::Calendar,
            ViewMode::Calendar => ViewMode::Kanban,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// View the TUI opens in when no saved UI state exists
    #[serde(default)]
    pub default_view: ViewMode,
    #[serde(default)]
    pub colors: HashMap<String, String>,
    #[serde(default)]
    pub tag_colors: HashMap<String, String>,
    /// Tags offered as suggestions when adding a task
    #[serde(default)]
    pub default_tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_gets_defaults() {
        let config: BoardConfig = toml::from_str("[board]\nname = \"home\"\n").unwrap();
        assert_eq!(config.board.name, "home");
        assert_eq!(config.storage.namespace, DEFAULT_NAMESPACE);
        assert_eq!(config.ui.default_view, ViewMode::Kanban);
        assert!(config.ui.tag_colors.is_empty());
    }

    #[test]
    fn full_config() {
        let text = r##"
[board]
name = "work"

[storage]
namespace = "work-tasks"

[ui]
default_view = "calendar"
default_tags = ["urgent"]

[ui.tag_colors]
urgent = "#FF0000"
"##;
        let config: BoardConfig = toml::from_str(text).unwrap();
        assert_eq!(config.storage.namespace, "work-tasks");
        assert_eq!(config.ui.default_view, ViewMode::Calendar);
        assert_eq!(config.ui.default_tags, vec!["urgent"]);
        assert_eq!(config.ui.tag_colors["urgent"], "#FF0000");
    }

    #[test]
    fn missing_board_section_is_an_error() {
        assert!(toml::from_str::<BoardConfig>("[ui]\n").is_err());
    }

    #[test]
    fn view_mode_cycles() {
        let mut mode = ViewMode::Kanban;
        for _ in 0..3 {
            mode = mode.next();
        }
        assert_eq!(mode, ViewMode::Kanban);
    }
}
