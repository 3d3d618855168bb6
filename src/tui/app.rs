use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::board_io;
use crate::io::recovery;
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::store::{Storage, StoreError, TaskStore};
use crate::model::config::{UiConfig, ViewMode};
use crate::model::task::{Status, Task};
use crate::ops::reconcile::DropTarget;
use crate::ops::{calendar, search, task_ops};

use super::edit_form::EditForm;
use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a search query; the filter follows every keystroke
    Search,
    /// Typing the title of a new task
    Add,
    /// Waiting for y/n before deleting `App::pending_delete`
    ConfirmDelete,
    /// Editing every field of a task in `App::edit`
    Edit,
}

/// Single-line text input. `cursor` is a byte offset on a grapheme boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub cursor: usize,
}

impl Prompt {
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Prompt { text, cursor }
    }

    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }
}

/// Main application state
pub struct App<S: Storage> {
    pub store: TaskStore<S>,
    pub board_name: String,
    /// Board directory, for the recovery log and UI state. None in tests.
    pub lanes_dir: Option<PathBuf>,
    pub view: ViewMode,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    /// Focused lane on the board (index into `Status::ALL`)
    pub lane: usize,
    /// Card cursor per lane, into the filtered lane
    pub cursors: [usize; 3],
    /// Cursor in list mode, into the filtered collection
    pub list_cursor: usize,
    pub calendar_date: NaiveDate,
    pub today: NaiveDate,
    /// Committed search query
    pub query: String,
    pub prompt: Prompt,
    pub pending_delete: Option<String>,
    pub edit: Option<EditForm>,
    /// Tags suggested while adding a task
    pub suggested_tags: Vec<String>,
    /// One-shot message for the status row
    pub message: Option<String>,
}

impl<S: Storage> App<S> {
    pub fn new(store: TaskStore<S>, board_name: impl Into<String>, ui: &UiConfig, today: NaiveDate) -> Self {
        App {
            store,
            board_name: board_name.into(),
            lanes_dir: None,
            view: ui.default_view,
            mode: Mode::Navigate,
            should_quit: false,
            theme: Theme::from_config(ui),
            lane: 0,
            cursors: [0; 3],
            list_cursor: 0,
            calendar_date: today,
            today,
            query: String::new(),
            prompt: Prompt::default(),
            pending_delete: None,
            edit: None,
            suggested_tags: ui.default_tags.clone(),
            message: None,
        }
    }

    pub fn with_lanes_dir(mut self, dir: PathBuf) -> Self {
        self.lanes_dir = Some(dir);
        self
    }

    /// Load the store if that has not happened yet.
    pub fn ensure_loaded(&mut self) {
        if self.store.is_ready() {
            return;
        }
        match self.store.load() {
            Ok(outcome) => {
                if let Some(dir) = &self.lanes_dir {
                    board_io::log_load_outcome(dir, self.store.namespace(), &outcome);
                }
            }
            Err(e) => self.message = Some(e.to_string()),
        }
        self.clamp_cursors();
    }

    /// Adopt changes another process made to the stored collection.
    pub fn sync_with_storage(&mut self) {
        let result = self.store.refresh();
        if self.report(result) == Some(true) {
            self.clamp_cursors();
        }
    }

    fn report<T>(&mut self, result: Result<T, StoreError>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.message = Some(e.to_string());
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // Derived views of the collection
    // -----------------------------------------------------------------------

    /// The query the filter runs with: the prompt while searching, the
    /// committed query otherwise.
    pub fn active_query(&self) -> &str {
        match self.mode {
            Mode::Search => &self.prompt.text,
            _ => &self.query,
        }
    }

    pub fn visible_tasks(&self) -> Vec<&Task> {
        search::filter_tasks(self.active_query(), self.store.tasks())
    }

    pub fn lane_tasks(&self, lane: usize) -> Vec<&Task> {
        let Some(status) = Status::from_index(lane) else {
            return Vec::new();
        };
        self.visible_tasks()
            .into_iter()
            .filter(|t| t.status == status)
            .collect()
    }

    /// Filtered tasks due on the selected calendar day
    pub fn day_tasks(&self) -> Vec<&Task> {
        calendar::tasks_due_on(self.visible_tasks(), self.calendar_date, &Local)
    }

    /// The card under the cursor. Calendar mode has no card cursor.
    pub fn selected_task(&self) -> Option<&Task> {
        match self.view {
            ViewMode::Kanban => self
                .lane_tasks(self.lane)
                .get(self.cursors[self.lane])
                .copied(),
            ViewMode::List => self.visible_tasks().get(self.list_cursor).copied(),
            ViewMode::Calendar => None,
        }
    }

    fn selected_id(&self) -> Option<String> {
        self.selected_task().map(|t| t.id.clone())
    }

    // -----------------------------------------------------------------------
    // Cursor movement
    // -----------------------------------------------------------------------

    pub fn clamp_cursors(&mut self) {
        self.lane = self.lane.min(Status::ALL.len() - 1);
        for lane in 0..Status::ALL.len() {
            let len = self.lane_tasks(lane).len();
            self.cursors[lane] = self.cursors[lane].min(len.saturating_sub(1));
        }
        let len = self.visible_tasks().len();
        self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
    }

    /// Put the cursors on `id` wherever it is visible.
    fn focus_task(&mut self, id: &str) {
        let Some(lane) = self.store.get(id).map(|t| t.status.index()) else {
            return;
        };
        let lane_pos = self.lane_tasks(lane).iter().position(|t| t.id == id);
        if let Some(pos) = lane_pos {
            self.lane = lane;
            self.cursors[lane] = pos;
        }
        let list_pos = self.visible_tasks().iter().position(|t| t.id == id);
        if let Some(pos) = list_pos {
            self.list_cursor = pos;
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        match self.view {
            ViewMode::Kanban => {
                let len = self.lane_tasks(self.lane).len();
                let cursor = &mut self.cursors[self.lane];
                *cursor = step(*cursor, delta, len);
            }
            ViewMode::List => {
                let len = self.visible_tasks().len();
                self.list_cursor = step(self.list_cursor, delta, len);
            }
            ViewMode::Calendar => {
                self.calendar_date = calendar::shift_days(self.calendar_date, 7 * delta as i64);
            }
        }
    }

    pub fn move_lane_focus(&mut self, delta: isize) {
        match self.view {
            ViewMode::Kanban => self.lane = step(self.lane, delta, Status::ALL.len()),
            ViewMode::Calendar => {
                self.calendar_date = calendar::shift_days(self.calendar_date, delta as i64);
            }
            ViewMode::List => {}
        }
    }

    pub fn jump_to_today(&mut self) {
        self.calendar_date = self.today;
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
        self.clamp_cursors();
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Drop the selected card on the lane `delta` lanes over.
    pub fn move_selected_to_adjacent_lane(&mut self, delta: isize) {
        if self.view != ViewMode::Kanban {
            return;
        }
        let Some(id) = self.selected_id() else {
            return;
        };
        let Some(status) = self
            .lane
            .checked_add_signed(delta)
            .and_then(Status::from_index)
        else {
            return;
        };
        let result = self.store.move_task(&id, &DropTarget::Lane(status));
        if self.report(result) == Some(true) {
            self.focus_task(&id);
        }
    }

    /// Move the selected card one place down or up. On the board this is a
    /// drop onto a neighbouring card (or onto the lane, to reach the end);
    /// in the list it is a splice of the flat collection.
    pub fn move_selected_vertically(&mut self, down: bool) {
        match self.view {
            ViewMode::Kanban => self.reorder_in_lane(down),
            ViewMode::List => self.reorder_in_list(down),
            ViewMode::Calendar => {}
        }
    }

    fn reorder_in_lane(&mut self, down: bool) {
        let Some(status) = Status::from_index(self.lane) else {
            return;
        };
        let ids: Vec<String> = self
            .lane_tasks(self.lane)
            .iter()
            .map(|t| t.id.clone())
            .collect();
        let cursor = self.cursors[self.lane];
        let Some(id) = ids.get(cursor).cloned() else {
            return;
        };

        let target = if down {
            match ids.get(cursor + 2) {
                Some(next) => DropTarget::Task(next.clone()),
                None if cursor + 1 < ids.len() => DropTarget::Lane(status),
                None => return,
            }
        } else {
            match cursor.checked_sub(1).and_then(|i| ids.get(i)) {
                Some(prev) => DropTarget::Task(prev.clone()),
                None => return,
            }
        };

        let result = self.store.move_task(&id, &target);
        if self.report(result) == Some(true) {
            self.focus_task(&id);
        }
    }

    fn reorder_in_list(&mut self, down: bool) {
        let visible: Vec<String> = self.visible_tasks().iter().map(|t| t.id.clone()).collect();
        let cursor = self.list_cursor;
        let neighbour = if down {
            cursor + 1
        } else {
            match cursor.checked_sub(1) {
                Some(i) => i,
                None => return,
            }
        };
        let (Some(id), Some(other)) = (visible.get(cursor), visible.get(neighbour)) else {
            return;
        };
        let flat_index = |id: &str| self.store.tasks().iter().position(|t| t.id == id);
        let (Some(start), Some(end)) = (flat_index(id), flat_index(other)) else {
            return;
        };
        let result = self.store.reorder(start, end);
        if self.report(result) == Some(true) {
            self.list_cursor = neighbour;
        }
    }

    /// Checkbox toggle: completed when unchecked, pending when checked.
    pub fn toggle_selected(&mut self) {
        let Some((id, completed)) = self
            .selected_task()
            .map(|t| (t.id.clone(), t.is_completed()))
        else {
            return;
        };
        let result = self.store.set_status(&id, !completed);
        self.report(result);
        self.clamp_cursors();
    }

    pub fn request_delete(&mut self) {
        if let Some(id) = self.selected_id() {
            self.pending_delete = Some(id);
            self.mode = Mode::ConfirmDelete;
        }
    }

    pub fn confirm_delete(&mut self) {
        self.mode = Mode::Navigate;
        let Some(id) = self.pending_delete.take() else {
            return;
        };
        let result = self.store.delete(&id);
        if let Some(Some(task)) = self.report(result) {
            if let Some(dir) = &self.lanes_dir {
                let body = serde_json::to_string_pretty(&task).unwrap_or_default();
                recovery::log_task_deletion(dir, &task.id, &task.title, &body);
            }
            self.message = Some(format!("deleted \"{}\"", task.title));
        }
        self.clamp_cursors();
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.mode = Mode::Navigate;
    }

    /// Create a task from the add prompt. `#word` tokens become tags. The
    /// task lands in the focused lane on the board, and is due on the
    /// selected day in calendar mode.
    pub fn submit_add(&mut self) {
        self.mode = Mode::Navigate;
        let input = self.prompt.take();
        let mut draft = task_ops::parse_quick_add(&input);
        if let Err(e) = task_ops::validate_title(&draft.title) {
            self.message = Some(e.to_string());
            return;
        }
        match self.view {
            ViewMode::Kanban => draft.status = Status::from_index(self.lane).unwrap_or_default(),
            ViewMode::Calendar => {
                draft.due_date = task_ops::local_midnight(self.calendar_date, &Local);
            }
            ViewMode::List => {}
        }
        let result = self.store.add(draft);
        if let Some(id) = self.report(result) {
            self.focus_task(&id);
        }
    }

    /// Open the edit form on the selected card.
    pub fn begin_edit(&mut self) {
        let Some(form) = self.selected_task().map(EditForm::for_task) else {
            return;
        };
        self.edit = Some(form);
        self.mode = Mode::Edit;
    }

    /// Open the edit form for a new task, placed the way quick-add places it.
    pub fn begin_add_form(&mut self) {
        let status = match self.view {
            ViewMode::Kanban => Status::from_index(self.lane).unwrap_or_default(),
            _ => Status::Pending,
        };
        let due = match self.view {
            ViewMode::Calendar => task_ops::local_midnight(self.calendar_date, &Local),
            _ => None,
        };
        self.edit = Some(EditForm::for_new(status, due));
        self.mode = Mode::Edit;
    }

    /// Save the edit form. Invalid input keeps the form open with the error.
    pub fn submit_edit(&mut self) {
        let Some(mut form) = self.edit.take() else {
            self.mode = Mode::Navigate;
            return;
        };
        let saved = match form.task_id.clone() {
            Some(id) => self.save_edit(&id, &form),
            None => self.save_new(&form),
        };
        match saved {
            Ok(Some(id)) => {
                self.mode = Mode::Navigate;
                self.focus_task(&id);
            }
            Ok(None) => {
                self.mode = Mode::Navigate;
                self.message = Some("task no longer exists".into());
                self.clamp_cursors();
            }
            Err(e) => {
                form.error = Some(e);
                self.edit = Some(form);
            }
        }
    }

    fn save_edit(&mut self, id: &str, form: &EditForm) -> Result<Option<String>, String> {
        let Some(mut task) = self.store.get(id).cloned() else {
            return Ok(None);
        };
        form.apply(&mut task).map_err(|e| e.to_string())?;
        let updated = self.store.update(task).map_err(|e| e.to_string())?;
        Ok(updated.then(|| id.to_string()))
    }

    fn save_new(&mut self, form: &EditForm) -> Result<Option<String>, String> {
        let draft = form.to_draft().map_err(|e| e.to_string())?;
        let id = self.store.add(draft).map_err(|e| e.to_string())?;
        Ok(Some(id))
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
        self.mode = Mode::Navigate;
    }

    pub fn begin_add(&mut self) {
        self.prompt = Prompt::default();
        self.mode = Mode::Add;
    }

    pub fn begin_search(&mut self) {
        self.prompt = Prompt::with_text(self.query.clone());
        self.mode = Mode::Search;
    }

    pub fn commit_search(&mut self) {
        self.query = self.prompt.take();
        self.mode = Mode::Navigate;
        self.clamp_cursors();
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = Prompt::default();
        self.mode = Mode::Navigate;
        self.clamp_cursors();
    }
}

/// Move `pos` by `delta` within `0..len`, clamping at both ends
fn step(pos: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    pos.saturating_add_signed(delta).min(len - 1)
}

// ---------------------------------------------------------------------------
// UI state persistence
// ---------------------------------------------------------------------------

pub fn restore_ui_state<S: Storage>(app: &mut App<S>, state: UiState) {
    app.view = state.view;
    app.lane = state.lane;
    app.cursors = state.cursors;
    app.list_cursor = state.list_cursor;
    app.query = state.last_search.unwrap_or_default();
    if let Some(date) = state.calendar_date {
        app.calendar_date = date;
    }
    app.clamp_cursors();
}

pub fn snapshot_ui_state<S: Storage>(app: &App<S>) -> UiState {
    UiState {
        view: app.view,
        lane: app.lane,
        cursors: app.cursors,
        list_cursor: app.list_cursor,
        last_search: (!app.query.is_empty()).then(|| app.query.clone()),
        calendar_date: Some(app.calendar_date),
    }
}

fn save_ui_state<S: Storage>(app: &App<S>) {
    if let Some(dir) = &app.lanes_dir {
        let _ = write_ui_state(dir, &snapshot_ui_state(app));
    }
}

/// Run the TUI application
pub fn run(board_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let start = match board_dir {
        Some(dir) => std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        None => std::env::current_dir()?,
    };
    let board = board_io::open_board(&start)?;
    let store = board_io::open_store(&board);

    let mut app = App::new(
        store,
        board.config.board.name.clone(),
        &board.config.ui,
        Local::now().date_naive(),
    )
    .with_lanes_dir(board.lanes_dir.clone());

    if let Some(state) = read_ui_state(&board.lanes_dir) {
        restore_ui_state(&mut app, state);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal if anything panics
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    save_ui_state(&app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop<S: Storage>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<S>,
) -> Result<(), Box<dyn std::error::Error>> {
    // First frame shows the loading screen
    terminal.draw(|frame| render::render(frame, app))?;
    app.ensure_loaded();

    let mut save_counter = 0u32;
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if !event::poll(Duration::from_millis(250))? {
            // Idle tick: pick up writes from CLI invocations
            app.sync_with_storage();
            continue;
        }

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            // Act on the latest stored collection
            app.sync_with_storage();
            input::handle_key(app, key);
            // Save UI state every few key presses
            save_counter += 1;
            if save_counter >= 5 {
                save_ui_state(app);
                save_counter = 0;
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::MemoryStorage;
    use crate::model::config::DEFAULT_NAMESPACE;
    use crate::tui::render::test_helpers::*;
    use pretty_assertions::assert_eq;

    fn lane_ids<S: Storage>(app: &App<S>, lane: usize) -> Vec<String> {
        app.lane_tasks(lane).iter().map(|t| t.id.clone()).collect()
    }

    fn flat_ids<S: Storage>(app: &App<S>) -> Vec<String> {
        app.store.tasks().iter().map(|t| t.id.clone()).collect()
    }

    fn abc() -> App<MemoryStorage> {
        app_with_tasks(vec![
            task("a", "Alpha", Status::Pending),
            task("b", "Beta", Status::Pending),
            task("c", "Gamma", Status::Pending),
        ])
    }

    #[test]
    fn empty_storage_loads_seed() {
        let store = TaskStore::new(MemoryStorage::new(), DEFAULT_NAMESPACE);
        let mut app = App::new(store, "Test", &UiConfig::default(), today());
        assert!(app.visible_tasks().is_empty());
        app.ensure_loaded();
        assert_eq!(app.visible_tasks().len(), 5);
        assert_eq!(app.message, None);
    }

    #[test]
    fn shift_l_drops_card_on_next_lane() {
        let mut app = app_with_seed();
        app.move_selected_to_adjacent_lane(1);
        assert_eq!(lane_ids(&app, 1), vec!["seed-3", "seed-4", "seed-1"]);
        assert_eq!(app.lane, 1);
        assert_eq!(app.cursors[1], 2);
        assert_eq!(app.selected_task().map(|t| t.id.as_str()), Some("seed-1"));

        // No lane to the left of the first one
        app.lane = 0;
        app.cursors[0] = 0;
        app.move_selected_to_adjacent_lane(-1);
        assert_eq!(lane_ids(&app, 0), vec!["seed-2"]);
    }

    #[test]
    fn shift_j_k_reorder_within_lane() {
        let mut app = abc();
        app.move_selected_vertically(true);
        assert_eq!(lane_ids(&app, 0), vec!["b", "a", "c"]);
        assert_eq!(app.cursors[0], 1);

        // Second-to-last goes to the end via a lane drop
        app.move_selected_vertically(true);
        assert_eq!(lane_ids(&app, 0), vec!["b", "c", "a"]);
        assert_eq!(app.cursors[0], 2);

        // Already last
        app.move_selected_vertically(true);
        assert_eq!(lane_ids(&app, 0), vec!["b", "c", "a"]);

        app.move_selected_vertically(false);
        assert_eq!(lane_ids(&app, 0), vec!["b", "a", "c"]);
        assert_eq!(app.cursors[0], 1);
    }

    #[test]
    fn list_reorder_splices_the_flat_collection() {
        let mut app = app_with_tasks(vec![
            task("a", "Alpha", Status::Pending),
            task("b", "Beta", Status::Completed),
            task("c", "Gamma", Status::InProgress),
        ]);
        app.set_view(ViewMode::List);
        app.move_selected_vertically(true);
        assert_eq!(flat_ids(&app), vec!["b", "a", "c"]);
        assert_eq!(app.list_cursor, 1);

        app.move_selected_vertically(false);
        assert_eq!(flat_ids(&app), vec!["a", "b", "c"]);
        assert_eq!(app.list_cursor, 0);

        app.move_selected_vertically(false);
        assert_eq!(flat_ids(&app), vec!["a", "b", "c"]);
    }

    #[test]
    fn checkbox_toggle_is_binary() {
        let mut app = app_with_seed();
        app.lane = 1;
        app.toggle_selected();
        assert_eq!(app.store.get("seed-3").unwrap().status, Status::Completed);

        app.lane = 2;
        app.cursors[2] = 0;
        app.toggle_selected();
        assert_eq!(app.store.get("seed-3").unwrap().status, Status::Pending);
    }

    #[test]
    fn delete_waits_for_confirmation() {
        let mut app = app_with_seed();
        app.request_delete();
        assert_eq!(app.mode, Mode::ConfirmDelete);
        assert_eq!(app.pending_delete.as_deref(), Some("seed-1"));

        app.cancel_delete();
        assert_eq!(app.store.tasks().len(), 5);

        app.request_delete();
        app.confirm_delete();
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.store.get("seed-1").is_none());
        assert_eq!(app.message.as_deref(), Some("deleted \"Plan the week\""));
    }

    #[test]
    fn add_lands_in_focused_lane() {
        let mut app = app_with_seed();
        app.lane = 1;
        app.begin_add();
        app.prompt = Prompt::with_text("Write tests #work");
        app.submit_add();

        let task = app.selected_task().unwrap();
        assert_eq!(task.title, "Write tests");
        assert_eq!(task.status, Status::InProgress);
        assert_eq!(task.tags.iter().collect::<Vec<_>>(), vec!["work"]);
        assert_eq!(app.mode, Mode::Navigate);
    }

    #[test]
    fn blank_add_is_rejected() {
        let mut app = app_with_seed();
        app.begin_add();
        app.prompt = Prompt::with_text("   #work");
        app.submit_add();
        assert_eq!(app.store.tasks().len(), 5);
        assert_eq!(app.message.as_deref(), Some("title must not be empty"));
    }

    #[test]
    fn calendar_add_is_due_on_selected_day() {
        let mut app = app_with_tasks(vec![]);
        app.set_view(ViewMode::Calendar);
        app.move_lane_focus(1);
        app.begin_add();
        app.prompt = Prompt::with_text("Dentist");
        app.submit_add();

        let day = calendar::shift_days(today(), 1);
        assert_eq!(
            app.store.tasks()[0].due_date,
            task_ops::local_midnight(day, &Local)
        );
        assert_eq!(app.day_tasks().len(), 1);
    }

    #[test]
    fn calendar_keys_move_by_day_and_week() {
        let mut app = app_with_seed();
        app.set_view(ViewMode::Calendar);
        app.move_cursor(1);
        app.move_lane_focus(-1);
        assert_eq!(app.calendar_date, calendar::shift_days(today(), 6));
        assert!(app.selected_task().is_none());
        app.jump_to_today();
        assert_eq!(app.calendar_date, today());
    }

    #[test]
    fn search_filters_live_and_cancel_restores() {
        let mut app = app_with_seed();
        app.begin_search();
        app.prompt = Prompt::with_text("run");
        assert_eq!(app.visible_tasks().len(), 1);

        app.cancel_prompt();
        assert_eq!(app.visible_tasks().len(), 5);

        app.begin_search();
        app.prompt = Prompt::with_text("WEEK");
        app.commit_search();
        assert_eq!(app.query, "WEEK");
        assert_eq!(app.visible_tasks().len(), 1);

        // Re-entering search starts from the committed query
        app.begin_search();
        assert_eq!(app.prompt.text, "WEEK");
        assert_eq!(app.prompt.cursor, 4);
    }

    #[test]
    fn cursors_clamp_when_filter_shrinks_lanes() {
        let mut app = abc();
        app.cursors[0] = 2;
        app.query = "beta".into();
        app.clamp_cursors();
        assert_eq!(app.cursors[0], 0);
        assert_eq!(app.selected_task().map(|t| t.id.as_str()), Some("b"));
    }

    #[test]
    fn ui_state_round_trip() {
        let mut app = app_with_seed();
        app.set_view(ViewMode::List);
        app.list_cursor = 3;
        app.lane = 2;
        app.query = "plan".into();
        app.calendar_date = calendar::shift_days(today(), 30);
        let state = snapshot_ui_state(&app);

        let mut fresh = app_with_seed();
        restore_ui_state(&mut fresh, state);
        assert_eq!(fresh.view, ViewMode::List);
        assert_eq!(fresh.lane, 2);
        assert_eq!(fresh.query, "plan");
        assert_eq!(fresh.calendar_date, calendar::shift_days(today(), 30));
        // Clamped to the single visible match
        assert_eq!(fresh.list_cursor, 0);
    }
}
