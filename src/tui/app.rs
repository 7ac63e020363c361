use chrono::{DateTime, Utc};
use ratatui::widgets::TableState;
use tracing::warn;

use crate::api::{ApiClient, ContactPatch, TaskPatch};
use crate::filters::ContactFilter;
use crate::models::{Contact, ContactStatus, Task, User};
use crate::progress::{contact_stats, ContactStats};
use crate::storage;

/// Rows fetched per list for the dashboard.
const TUI_FETCH_LIMIT: u64 = 200;

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(PartialEq, Clone, Copy)]
pub enum ViewMode {
    Tasks,
    Contacts,
    Stats,
}

pub enum InputField {
    None,
    LogAchieved,
    Target,
}

pub struct App {
    pub client: ApiClient,
    /// Acting user; subject of the Stats view.
    pub actor: Option<i64>,
    /// Everything fetched, including inactive tasks.
    pub all_tasks: Vec<Task>,
    /// What the Tasks view currently shows.
    pub tasks: Vec<Task>,
    pub contacts: Vec<Contact>,
    pub stats: Option<ContactStats>,
    pub stats_user: Option<User>,
    pub state: TableState,
    pub contact_state: TableState,
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub input_field: InputField,
    pub input_buffer: String,
    pub target_id: Option<i64>,
    pub show_inactive: bool,
    /// Outcome of the last action, drawn above the help line.
    pub status_line: String,
    pub offline: bool,
}

impl App {
    /// Creates the app state and performs the initial fetch.
    pub fn new(client: ApiClient, actor: Option<i64>) -> App {
        let mut app = App {
            client,
            actor,
            all_tasks: Vec::new(),
            tasks: Vec::new(),
            contacts: Vec::new(),
            stats: None,
            stats_user: None,
            state: TableState::default(),
            contact_state: TableState::default(),
            view_mode: ViewMode::Tasks,
            input_mode: InputMode::Normal,
            input_field: InputField::None,
            input_buffer: String::new(),
            target_id: None,
            show_inactive: false,
            status_line: String::new(),
            offline: false,
        };
        app.reload_data();
        app
    }

    /// Selects the next row in the current view, wrapping at the bottom.
    pub fn next(&mut self) {
        match self.view_mode {
            ViewMode::Tasks => {
                if self.tasks.is_empty() {
                    return;
                }
                let i = match self.state.selected() {
                    Some(i) => {
                        if i >= self.tasks.len() - 1 {
                            0
                        } else {
                            i + 1
                        }
                    }
                    None => 0,
                };
                self.state.select(Some(i));
            }
            ViewMode::Contacts => {
                if self.contacts.is_empty() {
                    return;
                }
                let i = match self.contact_state.selected() {
                    Some(i) => {
                        if i >= self.contacts.len() - 1 {
                            0
                        } else {
                            i + 1
                        }
                    }
                    None => 0,
                };
                self.contact_state.select(Some(i));
            }
            ViewMode::Stats => {}
        }
    }

    /// Selects the previous row in the current view, wrapping at the top.
    pub fn previous(&mut self) {
        match self.view_mode {
            ViewMode::Tasks => {
                if self.tasks.is_empty() {
                    return;
                }
                let i = match self.state.selected() {
                    Some(i) => {
                        if i == 0 {
                            self.tasks.len() - 1
                        } else {
                            i - 1
                        }
                    }
                    None => 0,
                };
                self.state.select(Some(i));
            }
            ViewMode::Contacts => {
                if self.contacts.is_empty() {
                    return;
                }
                let i = match self.contact_state.selected() {
                    Some(i) => {
                        if i == 0 {
                            self.contacts.len() - 1
                        } else {
                            i - 1
                        }
                    }
                    None => 0,
                };
                self.contact_state.select(Some(i));
            }
            ViewMode::Stats => {}
        }
    }

    /// Cycles Tasks -> Contacts -> Stats.
    pub fn toggle_view(&mut self) {
        self.view_mode = match self.view_mode {
            ViewMode::Tasks => ViewMode::Contacts,
            ViewMode::Contacts => ViewMode::Stats,
            ViewMode::Stats => ViewMode::Tasks,
        };
    }

    /// Shows or hides inactive tasks.
    pub fn toggle_inactive(&mut self) {
        self.show_inactive = !self.show_inactive;
        self.rebuild();
    }

    /// User-initiated refresh.
    pub fn refresh(&mut self) {
        self.reload_data();
        if !self.offline {
            self.status_line = "Refreshed.".to_string();
        }
    }

    /// Fetches fresh lists, falling back to the snapshot when the backend
    /// is down. Mutating actions call this after they finish so the board
    /// always shows backend truth.
    fn reload_data(&mut self) {
        let now = Utc::now();
        self.offline = false;

        let tasks = self.client.tasks(1, TUI_FETCH_LIMIT, None);
        let contacts = self.client.contacts(1, TUI_FETCH_LIMIT, None);

        match (tasks, contacts) {
            (Ok(tasks), Ok(contacts)) => {
                storage::remember_tasks(&tasks.data);
                storage::remember_contacts(&contacts.data);
                self.all_tasks = tasks.data;
                self.contacts = contacts.data;
            }
            (tasks, contacts) => {
                let reason = match (&tasks, &contacts) {
                    (Err(e), _) => e.to_string(),
                    (_, Err(e)) => e.to_string(),
                    _ => String::new(),
                };
                warn!("dashboard fetch failed: {}", reason);
                let snapshot = storage::load_snapshot();
                self.offline = true;
                self.status_line = format!(
                    "Backend unreachable ({}); showing data cached at {}.",
                    reason,
                    snapshot.fetched_label()
                );
                self.all_tasks = match tasks {
                    Ok(page) => page.data,
                    Err(_) => snapshot.tasks.clone(),
                };
                self.contacts = match contacts {
                    Ok(page) => page.data,
                    Err(_) => snapshot.contacts,
                };
            }
        }

        self.load_stats(now);
        self.rebuild();
    }

    /// Loads the statistics card for the acting user.
    fn load_stats(&mut self, now: DateTime<Utc>) {
        let actor = match self.actor {
            Some(actor) => actor,
            None => {
                self.stats = None;
                self.stats_user = None;
                return;
            }
        };
        match self.client.user(actor) {
            Ok(user) => {
                self.stats = Some(contact_stats(&user.contacts, now));
                self.stats_user = Some(user);
            }
            Err(e) => {
                warn!("user fetch failed: {}", e);
                // Profile endpoint down; use the acting user's slice of the
                // contact list instead.
                let filter = ContactFilter {
                    author: Some(actor),
                    period: None,
                    date: None,
                };
                let own = filter.apply(&self.contacts, now);
                self.stats = Some(contact_stats(&own, now));
                self.stats_user = None;
            }
        }
    }

    /// Rebuilds the visible task list and clamps both selections.
    fn rebuild(&mut self) {
        self.tasks = if self.show_inactive {
            self.all_tasks.clone()
        } else {
            self.all_tasks
                .iter()
                .filter(|t| t.is_active)
                .cloned()
                .collect()
        };

        if self.tasks.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.tasks.len() {
                self.state.select(Some(self.tasks.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }

        if self.contacts.is_empty() {
            self.contact_state.select(None);
        } else if let Some(i) = self.contact_state.selected() {
            if i >= self.contacts.len() {
                self.contact_state.select(Some(self.contacts.len() - 1));
            }
        } else {
            self.contact_state.select(Some(0));
        }
    }

    /// Opens the input popup for the selected task.
    pub fn start_edit(&mut self, field: InputField) {
        if self.view_mode != ViewMode::Tasks {
            return;
        }
        let (id, target) = match self.selected_task() {
            Some(t) => (t.id, t.target_value),
            None => return,
        };
        self.target_id = Some(id);
        self.input_buffer = match field {
            InputField::Target => target.to_string(),
            _ => String::new(),
        };
        self.input_field = field;
        self.input_mode = InputMode::Editing;
    }

    /// Applies the popup input to the targeted task.
    pub fn handle_input(&mut self) {
        let id = match self.target_id {
            Some(id) => id,
            None => {
                self.input_mode = InputMode::Normal;
                return;
            }
        };
        match self.input_field {
            InputField::LogAchieved => match self.input_buffer.parse::<i64>() {
                Ok(achieved) if achieved >= 0 => {
                    match self.client.log_progress(id, achieved, Utc::now()) {
                        Ok(()) => self.status_line = "Progress updated.".to_string(),
                        Err(e) => self.status_line = format!("Failed to update progress: {}", e),
                    }
                }
                _ => self.status_line = "Invalid value.".to_string(),
            },
            InputField::Target => match self.input_buffer.parse::<i64>() {
                Ok(value) if value > 0 => {
                    let patch = TaskPatch {
                        target_value: Some(value),
                        is_active: None,
                    };
                    match self.client.update_task(id, &patch) {
                        Ok(()) => self.status_line = "Target updated successfully.".to_string(),
                        Err(e) => self.status_line = format!("Failed to update target: {}", e),
                    }
                }
                _ => self.status_line = "Invalid target value.".to_string(),
            },
            InputField::None => {}
        }
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
        self.reload_data();
    }

    /// Flips the selected task between active and inactive.
    pub fn toggle_active_selected(&mut self) {
        if self.view_mode != ViewMode::Tasks {
            return;
        }
        let (id, active) = match self.selected_task() {
            Some(t) => (t.id, t.is_active),
            None => return,
        };
        let patch = TaskPatch {
            target_value: None,
            is_active: Some(!active),
        };
        match self.client.update_task(id, &patch) {
            Ok(()) => {
                let to_state = if active { "inactive" } else { "active" };
                self.status_line = format!("Task {} is now {}.", id, to_state);
            }
            Err(e) => self.status_line = format!("Failed to change task status: {}", e),
        }
        self.reload_data();
    }

    /// Deletes the selected task.
    pub fn delete_selected(&mut self) {
        if self.view_mode != ViewMode::Tasks {
            return;
        }
        let id = match self.selected_task() {
            Some(t) => t.id,
            None => return,
        };
        match self.client.delete_task(id) {
            Ok(()) => self.status_line = format!("Task {} deleted.", id),
            Err(e) => self.status_line = format!("Failed to delete task: {}", e),
        }
        self.reload_data();
    }

    /// Moves the selected contact one stage along the pipeline.
    pub fn cycle_status_selected(&mut self) {
        if self.view_mode != ViewMode::Contacts {
            return;
        }
        let (id, status) = match self.selected_contact() {
            Some(c) => (c.id, c.status),
            None => return,
        };
        let index = ContactStatus::ALL
            .iter()
            .position(|s| *s == status)
            .unwrap_or(0);
        let next = ContactStatus::ALL[(index + 1) % ContactStatus::ALL.len()];
        let patch = ContactPatch {
            status: Some(next),
            ..ContactPatch::default()
        };
        match self.client.update_contact(id, &patch) {
            Ok(()) => self.status_line = format!("Contact {} moved to {}.", id, next),
            Err(e) => self.status_line = format!("Failed to update contact: {}", e),
        }
        self.reload_data();
    }

    fn selected_task(&self) -> Option<&Task> {
        self.state.selected().and_then(|i| self.tasks.get(i))
    }

    fn selected_contact(&self) -> Option<&Contact> {
        self.contact_state.selected().and_then(|i| self.contacts.get(i))
    }
}
