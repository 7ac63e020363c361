//! # Leadboard
//!
//! A terminal client for a small CRM backend: sales contacts, daily-quota
//! tasks, countries and users, with live progress reporting. Combines a
//! scriptable CLI with an interactive TUI dashboard.
//!
//! ## Features
//!
//! *   **Progress windows**: every task is reported over four windows:
//!     today, yesterday, this week (quota fixed at five days' target) and
//!     the last 30 days (Fridays and Saturdays excluded, quota scaled to
//!     the real working-day count).
//! *   **Contact statistics**: per-user lifetime and period counts,
//!     monthly average, and pipeline-stage totals.
//! *   **Dual interface**:
//!     *   **CLI**: scriptable and quick for single commands.
//!     *   **TUI**: interactive dashboard over tasks, contacts and stats.
//! *   **Offline fallback**: the last fetched lists are cached locally and
//!     shown (with a warning) whenever the backend is unreachable.
//!
//! ## Installation
//!
//! ```bash
//! cargo install --path .
//! ```
//!
//! ## Usage
//!
//! ### Interactive Mode (TUI)
//!
//! Run without arguments to launch the dashboard:
//!
//! ```bash
//! leadboard
//! # or explicitly
//! leadboard ui
//! ```
//!
//! #### TUI Key Bindings
//!
//! **Global**
//! *   `q`: Quit
//! *   `Tab`: Switch view (Tasks / Contacts / Stats)
//! *   `r`: Refresh from the backend
//!
//! **Tasks View**
//! *   `l`: Log today's achieved value
//! *   `t`: Edit the daily target
//! *   `x`: Toggle active/inactive
//! *   `a`: Show/hide inactive tasks
//! *   `d`: Delete selected task
//!
//! **Contacts View**
//! *   `s`: Cycle the selected contact's pipeline status
//!
//! ### Command Line Interface (CLI)
//!
//! ```bash
//! # Task board with live progress columns
//! leadboard task list
//!
//! # Full progress card for one task
//! leadboard task progress 7
//!
//! # Record today's achieved value
//! leadboard task log 7 80
//!
//! # Contacts created this month by user 3
//! leadboard contact list --author 3 --period month
//!
//! # A user's profile with contact statistics
//! leadboard user show 3
//! ```
//!
//! ## Configuration
//!
//! *   `LEADBOARD_API`: backend base URL
//!     (default `http://localhost:5001/api/v1`), or pass `--api`.
//! *   `LEADBOARD_USER`: acting user id, or pass `--user`. Used as the
//!     author of new contacts, the assigner of new tasks, and the subject
//!     of `--mine` listings and the Stats view.
//! *   `LEADBOARD_SNAPSHOT`: override the offline cache location
//!     (default: `leadboard/snapshot.json` under the local data directory).
//! *   `LEADBOARD_LOG`: diagnostic level on stderr
//!     (`error`, `warn`, `info`, `debug`, `trace`); silent when unset.

use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use leadboard::api::{ApiClient, ContactDraft, ContactPatch};
use leadboard::commands::*;
use leadboard::filters::{ContactFilter, Period};
use leadboard::models::ContactStatus;
use leadboard::tui::run_tui;

#[derive(Parser)]
#[command(name = "leadboard")]
#[command(about = "Terminal CRM client with task progress reporting", long_about = None)]
struct Cli {
    /// Backend base URL (defaults to LEADBOARD_API)
    #[arg(long, global = true)]
    api: Option<String>,
    /// Acting user id (defaults to LEADBOARD_USER)
    #[arg(short, long, global = true)]
    user: Option<i64>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage tasks and their progress
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Manage contacts
    Contact {
        #[command(subcommand)]
        command: ContactCommands,
    },
    /// Manage the country reference list
    Country {
        #[command(subcommand)]
        command: CountryCommands,
    },
    /// Inspect users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui,
}

#[derive(Subcommand)]
enum TaskCommands {
    /// List tasks with live progress columns
    List {
        /// Filter by title
        #[arg(short, long)]
        search: Option<String>,
        /// Page number
        #[arg(short, long, default_value_t = 1)]
        page: u64,
        /// Rows per page
        #[arg(short, long, default_value_t = 20)]
        limit: u64,
        /// Only tasks assigned to the acting user
        #[arg(short, long)]
        mine: bool,
        /// Include inactive tasks
        #[arg(short, long)]
        all: bool,
    },
    /// Show the full progress card for a task
    Progress {
        id: i64,
        /// Reference date (YYYY-MM-DD) instead of today
        #[arg(long)]
        as_of: Option<String>,
    },
    /// Assign a new task
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        /// Daily target value
        #[arg(short, long)]
        target: i64,
        /// Assignee user id
        #[arg(long)]
        to: i64,
        /// Longer description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Record today's achieved value for a task
    Log {
        id: i64,
        /// Units achieved today
        achieved: i64,
    },
    /// Change a task's daily target
    Target { id: i64, value: i64 },
    /// Toggle a task between active and inactive
    Toggle {
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Delete a task
    Remove {
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum ContactCommands {
    /// List contacts
    List {
        /// Filter by author user id
        #[arg(long)]
        author: Option<i64>,
        /// Created within a period (week, month)
        #[arg(long)]
        period: Option<String>,
        /// Created on an exact date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Page number
        #[arg(short, long, default_value_t = 1)]
        page: u64,
        /// Rows per page
        #[arg(short, long, default_value_t = 20)]
        limit: u64,
    },
    /// Create a contact authored by the acting user
    Add {
        /// Contact name (quoted if it has spaces)
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        company: String,
        #[arg(long)]
        designation: Option<String>,
        /// Company web domain
        #[arg(long)]
        domain: Option<String>,
        /// Country id from `country list`
        #[arg(long)]
        country: Option<i64>,
        #[arg(long)]
        company_linkedin: Option<String>,
        #[arg(long)]
        personal_linkedin: Option<String>,
        /// Pipeline status (defaults to new)
        #[arg(short, long, default_value = "new")]
        status: String,
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Update the given fields of a contact
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        designation: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        domain: Option<String>,
        /// New country id
        #[arg(long)]
        country: Option<i64>,
        #[arg(long)]
        company_linkedin: Option<String>,
        #[arg(long)]
        personal_linkedin: Option<String>,
        /// New pipeline status
        #[arg(short, long)]
        status: Option<String>,
        #[arg(short, long)]
        note: Option<String>,
    },
}

#[derive(Subcommand)]
enum CountryCommands {
    /// List countries
    List {
        /// Filter by name
        #[arg(short, long)]
        search: Option<String>,
        /// Page number
        #[arg(short, long, default_value_t = 1)]
        page: u64,
        /// Rows per page
        #[arg(short, long, default_value_t = 20)]
        limit: u64,
    },
    /// Add a country
    Add {
        /// Country name
        name: String,
        /// Short code, e.g. BD
        code: String,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// List all users
    List,
    /// Show a user's profile and contact statistics
    Show { id: i64 },
    /// Delete a user
    Remove {
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let base = cli.api.clone().unwrap_or_else(ApiClient::default_base);
    let client = match ApiClient::new(base) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to set up HTTP client: {}", e);
            return;
        }
    };
    let actor = cli.user.or_else(|| {
        std::env::var("LEADBOARD_USER")
            .ok()
            .and_then(|raw| raw.parse().ok())
    });

    match cli.command {
        Some(Commands::Task { command }) => match command {
            TaskCommands::List {
                search,
                page,
                limit,
                mine,
                all,
            } => {
                let mine = if mine {
                    match actor {
                        Some(user) => Some(user),
                        None => {
                            eprintln!("No acting user set. Pass --user or set LEADBOARD_USER.");
                            return;
                        }
                    }
                } else {
                    None
                };
                cmd_task_list(&client, mine, search, page, limit, all);
            }
            TaskCommands::Progress { id, as_of } => {
                let as_of = match as_of {
                    Some(raw) => match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
                        Ok(date) => Some(date),
                        Err(e) => {
                            eprintln!("Invalid date '{}': {}. Use YYYY-MM-DD.", raw, e);
                            return;
                        }
                    },
                    None => None,
                };
                cmd_task_progress(&client, id, as_of);
            }
            TaskCommands::Add {
                title,
                target,
                to,
                description,
            } => cmd_task_add(&client, title, description, target, to, actor),
            TaskCommands::Log { id, achieved } => cmd_task_log(&client, id, achieved),
            TaskCommands::Target { id, value } => cmd_task_target(&client, id, value),
            TaskCommands::Toggle { id, force } => cmd_task_toggle(&client, id, force),
            TaskCommands::Remove { id, force } => cmd_task_remove(&client, id, force),
        },
        Some(Commands::Contact { command }) => match command {
            ContactCommands::List {
                author,
                period,
                date,
                page,
                limit,
            } => {
                let period = match period {
                    Some(raw) => match raw.parse::<Period>() {
                        Ok(period) => Some(period),
                        Err(e) => {
                            eprintln!("{}", e);
                            return;
                        }
                    },
                    None => None,
                };
                let date = match date {
                    Some(raw) => match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
                        Ok(date) => Some(date),
                        Err(e) => {
                            eprintln!("Invalid date '{}': {}. Use YYYY-MM-DD.", raw, e);
                            return;
                        }
                    },
                    None => None,
                };
                let filter = ContactFilter {
                    author,
                    period,
                    date,
                };
                cmd_contact_list(&client, filter, page, limit);
            }
            ContactCommands::Add {
                name,
                email,
                company,
                designation,
                domain,
                country,
                company_linkedin,
                personal_linkedin,
                status,
                note,
            } => {
                let status = match status.parse::<ContactStatus>() {
                    Ok(status) => status,
                    Err(e) => {
                        eprintln!("{}", e);
                        return;
                    }
                };
                let author = match actor {
                    Some(user) => user,
                    None => {
                        eprintln!("No acting user set. Pass --user or set LEADBOARD_USER.");
                        return;
                    }
                };
                let draft = ContactDraft {
                    name,
                    email,
                    company,
                    designation,
                    domain,
                    country_id: country,
                    company_linkedin,
                    personal_linkedin,
                    status,
                    note,
                    author_id: author,
                };
                cmd_contact_add(&client, draft);
            }
            ContactCommands::Edit {
                id,
                name,
                email,
                designation,
                company,
                domain,
                country,
                company_linkedin,
                personal_linkedin,
                status,
                note,
            } => {
                let status = match status {
                    Some(raw) => match raw.parse::<ContactStatus>() {
                        Ok(status) => Some(status),
                        Err(e) => {
                            eprintln!("{}", e);
                            return;
                        }
                    },
                    None => None,
                };
                let patch = ContactPatch {
                    name,
                    email,
                    designation,
                    company,
                    domain,
                    country,
                    company_linkedin,
                    personal_linkedin,
                    status,
                    note,
                };
                cmd_contact_edit(&client, id, patch);
            }
        },
        Some(Commands::Country { command }) => match command {
            CountryCommands::List {
                search,
                page,
                limit,
            } => cmd_country_list(&client, search, page, limit),
            CountryCommands::Add { name, code } => cmd_country_add(&client, name, code),
        },
        Some(Commands::User { command }) => match command {
            UserCommands::List => cmd_user_list(&client),
            UserCommands::Show { id } => cmd_user_show(&client, id),
            UserCommands::Remove { id, force } => cmd_user_remove(&client, id, force),
        },
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => {
                    eprintln!("Unsupported shell: {}", shell);
                    return;
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "leadboard", &mut io::stdout());
        }
        Some(Commands::Ui) | None => {
            if let Err(e) = run_tui(client, actor) {
                eprintln!("Error running TUI: {}", e);
            }
        }
    }
}

/// Installs a stderr subscriber when `LEADBOARD_LOG` names a level; stays
/// silent otherwise so tables and the TUI are not interleaved with logs.
fn init_logging() {
    let level = match std::env::var("LEADBOARD_LOG") {
        Ok(value) => match value.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => return,
        },
        Err(_) => return,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
