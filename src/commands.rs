use std::io::{self, Write};

use chrono::{DateTime, NaiveDate, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use tracing::warn;

use crate::api::{ApiClient, ContactDraft, ContactPatch, TaskDraft, TaskPatch};
use crate::filters::{page_slice, ContactFilter};
use crate::models::{Contact, ContactStatus, Country, Pagination, Task, UserStatus};
use crate::progress::{contact_stats, parse_when, task_progress, WindowProgress};
use crate::storage;

/// Page size used when a whole list is needed for local filtering, matching
/// the backend's maximum.
const FETCH_ALL_LIMIT: u64 = 1000;

/// Lists tasks in a formatted table with live progress columns.
///
/// By default hides inactive tasks unless `all` is true; `mine` narrows to
/// one assignee via the backend's own query.
pub fn cmd_task_list(
    client: &ApiClient,
    mine: Option<i64>,
    search: Option<String>,
    page: u64,
    limit: u64,
    all: bool,
) {
    let now = Utc::now();
    let (mut tasks, pagination) = tasks_or_snapshot(client, mine, search.as_deref(), page, limit);
    if !all {
        tasks.retain(|t| t.is_active);
    }
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Target/Day").add_attribute(Attribute::Bold),
            Cell::new("Today").add_attribute(Attribute::Bold),
            Cell::new("Week").add_attribute(Attribute::Bold),
            Cell::new("30 Days").add_attribute(Attribute::Bold),
            Cell::new("Assignee").add_attribute(Attribute::Bold),
            Cell::new("Active").add_attribute(Attribute::Bold),
        ]);

    for t in &tasks {
        let progress = task_progress(t, now);
        let assignee = t
            .assigned_to
            .as_ref()
            .map(|u| u.name.clone())
            .unwrap_or_else(|| format!("#{}", t.assigned_to_id));
        let active_cell = if t.is_active {
            Cell::new("Yes").fg(Color::Green)
        } else {
            Cell::new("No").fg(Color::Grey)
        };
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.title),
            Cell::new(t.target_value),
            window_cell(&progress.today, t.is_active),
            window_cell(&progress.week, t.is_active),
            window_cell(&progress.month, t.is_active),
            Cell::new(assignee),
            active_cell,
        ]);
    }

    println!("{table}");
    print_paging(pagination);
}

/// Prints the full progress card for one task: one row per reporting window.
///
/// `as_of` substitutes a reference date for the current instant, so past
/// reports can be reproduced.
pub fn cmd_task_progress(client: &ApiClient, id: i64, as_of: Option<NaiveDate>) {
    let now = as_of
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
        .unwrap_or_else(Utc::now);

    let (tasks, _) = tasks_or_snapshot(client, None, None, 1, FETCH_ALL_LIMIT);
    let task = match tasks.iter().find(|t| t.id == id) {
        Some(t) => t,
        None => {
            eprintln!("Task {} not found.", id);
            return;
        }
    };

    let progress = task_progress(task, now);
    let assignee = task
        .assigned_to
        .as_ref()
        .map(|u| u.name.clone())
        .unwrap_or_else(|| format!("#{}", task.assigned_to_id));

    println!(
        "{} (target {}/day, assigned to {}{})",
        task.title,
        task.target_value,
        assignee,
        if task.is_active { "" } else { ", inactive" }
    );
    if let Some(description) = &task.description {
        println!("{}", description);
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Window").add_attribute(Attribute::Bold),
            Cell::new("Achieved").add_attribute(Attribute::Bold),
            Cell::new("Target").add_attribute(Attribute::Bold),
            Cell::new("Done").add_attribute(Attribute::Bold),
            Cell::new("Remaining").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    let month_label = format!("Last 30 Days ({} working)", progress.working_days);
    let rows = [
        ("Today", progress.today),
        ("Yesterday", progress.yesterday),
        ("This Week", progress.week),
        (month_label.as_str(), progress.month),
    ];
    for (label, window) in rows {
        let state = if window.complete {
            Cell::new("Complete").fg(Color::Green)
        } else {
            Cell::new("In Progress").fg(Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(label),
            Cell::new(window.achieved),
            Cell::new(window.target),
            Cell::new(format!("{}%", window.percent)).fg(percent_color(window.percent, true)),
            Cell::new(window.remaining),
            state,
        ]);
    }

    println!("{table}");
}

/// Creates a task assigned to a user, on behalf of the acting user.
pub fn cmd_task_add(
    client: &ApiClient,
    title: String,
    description: Option<String>,
    target: i64,
    to: i64,
    by: Option<i64>,
) {
    if target <= 0 {
        eprintln!("Invalid target value.");
        return;
    }
    let by = match by {
        Some(user) => user,
        None => {
            eprintln!("No acting user set. Pass --user or set LEADBOARD_USER.");
            return;
        }
    };
    let draft = TaskDraft {
        title,
        description,
        target_value: target,
        assigned_to_id: to,
        assigned_by_id: by,
    };
    match client.create_task(&draft) {
        Ok(()) => println!("Task created successfully."),
        Err(e) => eprintln!("Failed to create task: {}", e),
    }
}

/// Records today's achieved value for a task.
pub fn cmd_task_log(client: &ApiClient, id: i64, achieved: i64) {
    if achieved < 0 {
        eprintln!("Invalid value.");
        return;
    }
    match client.log_progress(id, achieved, Utc::now()) {
        Ok(()) => println!("Progress updated."),
        Err(e) => eprintln!("Failed to update progress: {}", e),
    }
}

/// Changes a task's daily target.
pub fn cmd_task_target(client: &ApiClient, id: i64, value: i64) {
    if value <= 0 {
        eprintln!("Invalid target value.");
        return;
    }
    let patch = TaskPatch {
        target_value: Some(value),
        is_active: None,
    };
    match client.update_task(id, &patch) {
        Ok(()) => println!("Target updated successfully."),
        Err(e) => eprintln!("Failed to update target: {}", e),
    }
}

/// Flips a task between active and inactive.
pub fn cmd_task_toggle(client: &ApiClient, id: i64, force: bool) {
    let (tasks, _) = tasks_or_snapshot(client, None, None, 1, FETCH_ALL_LIMIT);
    let task = match tasks.iter().find(|t| t.id == id) {
        Some(t) => t,
        None => {
            eprintln!("Task {} not found.", id);
            return;
        }
    };
    let to_state = if task.is_active { "inactive" } else { "active" };
    if !force && !confirm(&format!("Mark task {} as {}?", id, to_state)) {
        println!("Aborted.");
        return;
    }
    let patch = TaskPatch {
        target_value: None,
        is_active: Some(!task.is_active),
    };
    match client.update_task(id, &patch) {
        Ok(()) => println!("Task is now {}.", to_state),
        Err(e) => eprintln!("Failed to change task status: {}", e),
    }
}

/// Deletes a task after confirmation.
pub fn cmd_task_remove(client: &ApiClient, id: i64, force: bool) {
    if !force && !confirm(&format!("Delete task {}? This cannot be undone.", id)) {
        println!("Aborted.");
        return;
    }
    match client.delete_task(id) {
        Ok(()) => println!("Task deleted successfully."),
        Err(e) => eprintln!("Failed to delete task: {}", e),
    }
}

/// Lists contacts, filtered on the backend when it can and locally when it
/// cannot.
pub fn cmd_contact_list(client: &ApiClient, filter: ContactFilter, page: u64, limit: u64) {
    let now = Utc::now();
    let (contacts, pagination) = contacts_or_snapshot(client, &filter, page, limit, now);
    if contacts.is_empty() {
        println!("No contacts found.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Company").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Country").add_attribute(Attribute::Bold),
            Cell::new("Author").add_attribute(Attribute::Bold),
            Cell::new("Created").add_attribute(Attribute::Bold),
        ]);

    for c in &contacts {
        let country = c
            .country
            .as_ref()
            .map(|country| country.name.clone())
            .unwrap_or_else(|| "-".into());
        let author = c
            .author
            .as_ref()
            .map(|u| u.name.clone())
            .unwrap_or_else(|| format!("#{}", c.author_id));
        table.add_row(vec![
            Cell::new(c.id),
            Cell::new(&c.name),
            Cell::new(&c.company),
            Cell::new(c.status.to_string()).fg(status_color(c.status)),
            Cell::new(country),
            Cell::new(author),
            Cell::new(short_date(&c.created_at)),
        ]);
    }

    println!("{table}");
    print_paging(pagination);
}

/// Creates a contact authored by the acting user.
pub fn cmd_contact_add(client: &ApiClient, draft: ContactDraft) {
    match client.create_contact(&draft) {
        Ok(()) => println!("Contact created successfully."),
        Err(e) => eprintln!("Failed to create contact: {}", e),
    }
}

/// Sends the changed fields of a contact to the backend.
pub fn cmd_contact_edit(client: &ApiClient, id: i64, patch: ContactPatch) {
    if patch.is_empty() {
        eprintln!("Nothing to update.");
        return;
    }
    match client.update_contact(id, &patch) {
        Ok(()) => println!("Contact updated successfully."),
        Err(e) => eprintln!("Failed to update contact: {}", e),
    }
}

/// Lists the reference countries.
pub fn cmd_country_list(client: &ApiClient, search: Option<String>, page: u64, limit: u64) {
    let (countries, pagination) = countries_or_snapshot(client, search.as_deref(), page, limit);
    if countries.is_empty() {
        println!("No countries found.");
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        Cell::new("ID").add_attribute(Attribute::Bold),
        Cell::new("Name").add_attribute(Attribute::Bold),
        Cell::new("Code").add_attribute(Attribute::Bold),
    ]);
    for country in &countries {
        table.add_row(vec![
            Cell::new(country.id),
            Cell::new(&country.name),
            Cell::new(&country.code),
        ]);
    }

    println!("{table}");
    print_paging(pagination);
}

/// Adds a country to the reference list.
pub fn cmd_country_add(client: &ApiClient, name: String, code: String) {
    if name.trim().is_empty() || code.trim().is_empty() {
        eprintln!("Name and code are required.");
        return;
    }
    match client.create_country(name.trim(), code.trim()) {
        Ok(()) => println!("Country added successfully."),
        Err(e) => eprintln!("Failed to add country: {}", e),
    }
}

/// Lists all users.
pub fn cmd_user_list(client: &ApiClient) {
    let users = match client.users() {
        Ok(users) => users,
        Err(e) => {
            eprintln!("Failed to load users: {}", e);
            return;
        }
    };
    if users.is_empty() {
        println!("No users found.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Email").add_attribute(Attribute::Bold),
            Cell::new("Role").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);
    for u in &users {
        let status_cell = match u.status {
            UserStatus::Active => Cell::new("ACTIVE").fg(Color::Green),
            UserStatus::Inactive => Cell::new("INACTIVE").fg(Color::Grey),
            UserStatus::Block => Cell::new("BLOCK").fg(Color::Red),
        };
        table.add_row(vec![
            Cell::new(u.id),
            Cell::new(&u.name),
            Cell::new(&u.email),
            Cell::new(u.role.to_string()),
            status_cell,
        ]);
    }

    println!("{table}");
}

/// Shows a user's profile with their contact statistics card and most
/// recent contacts.
pub fn cmd_user_show(client: &ApiClient, id: i64) {
    let user = match client.user(id) {
        Ok(user) => user,
        Err(e) => {
            eprintln!("Failed to load user {}: {}", id, e);
            return;
        }
    };
    let now = Utc::now();
    let stats = contact_stats(&user.contacts, now);

    println!("{} <{}> ({}, {})", user.name, user.email, user.role, user.status);
    if let Some(phone) = &user.phone {
        println!("Phone: {}", phone);
    }

    let mut card = Table::new();
    card.load_preset(UTF8_FULL).set_header(vec![
        Cell::new("Contacts").add_attribute(Attribute::Bold),
        Cell::new("Count").add_attribute(Attribute::Bold),
    ]);
    card.add_row(vec![Cell::new("Today"), Cell::new(stats.today)]);
    card.add_row(vec![Cell::new("Last 7 Days"), Cell::new(stats.last_week)]);
    card.add_row(vec![Cell::new("This Month"), Cell::new(stats.this_month)]);
    card.add_row(vec![
        Cell::new("Monthly Average"),
        Cell::new(format!("{:.1}", stats.monthly_average)),
    ]);
    card.add_row(vec![Cell::new("Lifetime"), Cell::new(stats.lifetime)]);
    card.add_row(vec![
        Cell::new("Responded (This Month)"),
        Cell::new(stats.responded_this_month),
    ]);
    card.add_row(vec![
        Cell::new("Negotiating (This Month)"),
        Cell::new(stats.negotiating_this_month),
    ]);
    card.add_row(vec![
        Cell::new("Closed Won (This Year)").fg(Color::Green),
        Cell::new(stats.won_this_year),
    ]);
    card.add_row(vec![
        Cell::new("Closed Won (Lifetime)").fg(Color::Green),
        Cell::new(stats.won_lifetime),
    ]);
    println!("{card}");

    if !user.contacts.is_empty() {
        let mut recent = user.contacts.clone();
        recent.sort_by(|a, b| parse_when(&b.created_at).cmp(&parse_when(&a.created_at)));
        recent.truncate(10);

        println!("Recent contacts:");
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("Name").add_attribute(Attribute::Bold),
                Cell::new("Company").add_attribute(Attribute::Bold),
                Cell::new("Status").add_attribute(Attribute::Bold),
                Cell::new("Created").add_attribute(Attribute::Bold),
            ]);
        for c in &recent {
            table.add_row(vec![
                Cell::new(&c.name),
                Cell::new(&c.company),
                Cell::new(c.status.to_string()).fg(status_color(c.status)),
                Cell::new(short_date(&c.created_at)),
            ]);
        }
        println!("{table}");
    }
}

/// Deletes a user after confirmation.
pub fn cmd_user_remove(client: &ApiClient, id: i64, force: bool) {
    if !force && !confirm(&format!("Delete user {}? This cannot be undone.", id)) {
        println!("Aborted.");
        return;
    }
    match client.delete_user(id) {
        Ok(()) => println!("User deleted."),
        Err(e) => eprintln!("Failed to delete user: {}", e),
    }
}

// --- fetch-or-fallback helpers ---

fn tasks_or_snapshot(
    client: &ApiClient,
    mine: Option<i64>,
    search: Option<&str>,
    page: u64,
    limit: u64,
) -> (Vec<Task>, Option<Pagination>) {
    let fetched = match mine {
        Some(user) => client.my_tasks(user, page, limit),
        None => client.tasks(page, limit, search),
    };
    match fetched {
        Ok(fetched) => {
            if mine.is_none() && search.is_none() {
                storage::remember_tasks(&fetched.data);
            }
            (fetched.data, fetched.pagination)
        }
        Err(e) => {
            warn!("task fetch failed: {}", e);
            let snapshot = storage::load_snapshot();
            eprintln!(
                "Backend unreachable ({}); showing data cached at {}.",
                e,
                snapshot.fetched_label()
            );
            let mut tasks = snapshot.tasks;
            if let Some(user) = mine {
                tasks.retain(|t| t.assigned_to_id == user);
            }
            if let Some(needle) = search {
                let needle = needle.to_lowercase();
                tasks.retain(|t| t.title.to_lowercase().contains(&needle));
            }
            (tasks, None)
        }
    }
}

fn contacts_or_snapshot(
    client: &ApiClient,
    filter: &ContactFilter,
    page: u64,
    limit: u64,
    now: DateTime<Utc>,
) -> (Vec<Contact>, Option<Pagination>) {
    let fetched = if filter.server_side() {
        client.contacts(page, limit, filter.author).map(|fetched| {
            if filter.is_empty() {
                storage::remember_contacts(&fetched.data);
            }
            (fetched.data, fetched.pagination)
        })
    } else {
        // The backend cannot answer period or date filters; pull everything
        // once and page locally.
        client.contacts(1, FETCH_ALL_LIMIT, None).map(|fetched| {
            storage::remember_contacts(&fetched.data);
            let filtered = filter.apply(&fetched.data, now);
            let (data, pagination) = page_slice(&filtered, page, limit);
            (data, Some(pagination))
        })
    };
    match fetched {
        Ok(result) => result,
        Err(e) => {
            warn!("contact fetch failed: {}", e);
            let snapshot = storage::load_snapshot();
            eprintln!(
                "Backend unreachable ({}); showing data cached at {}.",
                e,
                snapshot.fetched_label()
            );
            let filtered = filter.apply(&snapshot.contacts, now);
            let (data, pagination) = page_slice(&filtered, page, limit);
            (data, Some(pagination))
        }
    }
}

fn countries_or_snapshot(
    client: &ApiClient,
    search: Option<&str>,
    page: u64,
    limit: u64,
) -> (Vec<Country>, Option<Pagination>) {
    match client.countries(page, limit, search) {
        Ok(fetched) => {
            if search.is_none() {
                storage::remember_countries(&fetched.data);
            }
            (fetched.data, fetched.pagination)
        }
        Err(e) => {
            warn!("country fetch failed: {}", e);
            let snapshot = storage::load_snapshot();
            eprintln!(
                "Backend unreachable ({}); showing data cached at {}.",
                e,
                snapshot.fetched_label()
            );
            let mut countries = snapshot.countries;
            if let Some(needle) = search {
                let needle = needle.to_lowercase();
                countries.retain(|c| c.name.to_lowercase().contains(&needle));
            }
            (countries, None)
        }
    }
}

// --- rendering helpers ---

fn window_cell(window: &WindowProgress, active: bool) -> Cell {
    Cell::new(format!(
        "{}/{} ({}%)",
        window.achieved, window.target, window.percent
    ))
    .fg(percent_color(window.percent, active))
}

fn percent_color(percent: u8, active: bool) -> Color {
    if !active {
        Color::Grey
    } else if percent >= 100 {
        Color::Green
    } else if percent >= 50 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn status_color(status: ContactStatus) -> Color {
    match status {
        ContactStatus::New => Color::Blue,
        ContactStatus::Contacted => Color::Cyan,
        ContactStatus::Responded => Color::Yellow,
        ContactStatus::Qualified => Color::Magenta,
        ContactStatus::Negotiating => Color::DarkYellow,
        ContactStatus::ClosedWon => Color::Green,
        ContactStatus::ClosedLost => Color::Red,
    }
}

fn short_date(raw: &str) -> String {
    parse_when(raw)
        .map(|when| when.date_naive().to_string())
        .unwrap_or_else(|| "-".into())
}

fn print_paging(pagination: Option<Pagination>) {
    if let Some(p) = pagination {
        println!(
            "Page {}/{} ({} total)",
            p.current_page,
            p.total_pages.max(1),
            p.total
        );
    }
}

fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    let _ = io::stdout().flush();
    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }
    input.trim().eq_ignore_ascii_case("y")
}
