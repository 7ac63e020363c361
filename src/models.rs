use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A quota work item assigned to a team member.
///
/// The backend owns every field; the client only reads snapshots. Timestamp
/// fields stay as the raw wire strings so that one malformed date in a list
/// response cannot fail the whole decode; `progress::parse_when` handles
/// them entry by entry.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task.
    pub id: i64,
    /// Short display title.
    pub title: String,
    /// Optional longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// The current per-day quota.
    pub target_value: i64,
    /// User the task is assigned to.
    pub assigned_to_id: i64,
    /// User who assigned the task.
    pub assigned_by_id: i64,
    /// Inactive tasks are hidden from work lists but keep their history.
    pub is_active: bool,
    /// Timestamp when the task was created (ISO 8601).
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Embedded assignee, present on detail responses.
    #[serde(default)]
    pub assigned_to: Option<User>,
    /// Embedded assigner, present on detail responses.
    #[serde(default)]
    pub assigned_by: Option<User>,
    /// Sparse calendar of recorded progress; absent means nothing logged yet.
    #[serde(default)]
    pub daily_logs: Option<Vec<TaskDailyLog>>,
}

/// One day's recorded progress for a task. At most one log per calendar date.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TaskDailyLog {
    pub id: i64,
    pub task_id: i64,
    /// Date the work was done (ISO 8601; only the calendar date matters).
    pub date: String,
    /// The quota that applied on that date, which may differ from the
    /// task's current target if it was changed later.
    pub target_value: i64,
    /// Units actually completed that date.
    pub achieved: i64,
    /// Backend-computed ratio, ignored by the client's own math.
    #[serde(default)]
    pub performance: Option<f64>,
    #[serde(default)]
    pub status: Option<LogStatus>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Backend's own verdict on a daily log.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogStatus {
    Pending,
    Completed,
    Failed,
}

/// A sales lead tracked through the pipeline.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Unique identifier for the contact.
    pub id: i64,
    /// Full name of the lead.
    pub name: String,
    /// Work email address.
    pub email: String,
    #[serde(default)]
    pub designation: Option<String>,
    /// Company the lead works for.
    pub company: String,
    #[serde(default)]
    pub domain: Option<String>,
    /// Embedded country, present when the backend joins it in.
    #[serde(default)]
    pub country: Option<Country>,
    #[serde(default)]
    pub company_linkedin: Option<String>,
    #[serde(default)]
    pub personal_linkedin: Option<String>,
    /// Current pipeline stage.
    pub status: ContactStatus,
    #[serde(default)]
    pub note: Option<String>,
    /// User who created the contact.
    pub author_id: i64,
    /// Embedded author, present on list responses.
    #[serde(default)]
    pub author: Option<User>,
    /// Timestamp when the contact was created (ISO 8601).
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Pipeline stage of a contact.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactStatus {
    New,
    Contacted,
    Responded,
    Qualified,
    Negotiating,
    ClosedWon,
    ClosedLost,
}

impl ContactStatus {
    /// Every stage in pipeline order, used for cycling in the dashboard.
    pub const ALL: [ContactStatus; 7] = [
        ContactStatus::New,
        ContactStatus::Contacted,
        ContactStatus::Responded,
        ContactStatus::Qualified,
        ContactStatus::Negotiating,
        ContactStatus::ClosedWon,
        ContactStatus::ClosedLost,
    ];

    /// Wire form of the status, e.g. `CLOSED_WON`.
    pub fn as_wire(&self) -> &'static str {
        match self {
            ContactStatus::New => "NEW",
            ContactStatus::Contacted => "CONTACTED",
            ContactStatus::Responded => "RESPONDED",
            ContactStatus::Qualified => "QUALIFIED",
            ContactStatus::Negotiating => "NEGOTIATING",
            ContactStatus::ClosedWon => "CLOSED_WON",
            ContactStatus::ClosedLost => "CLOSED_LOST",
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Tables show "CLOSED WON", not the wire form.
        write!(f, "{}", self.as_wire().replace('_', " "))
    }
}

impl FromStr for ContactStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        ContactStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_wire() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown status '{}' (expected one of: new, contacted, responded, \
                     qualified, negotiating, closed-won, closed-lost)",
                    s
                )
            })
    }
}

/// A staff member of the deployment.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    pub role: Role,
    pub status: UserStatus,
    #[serde(default)]
    pub is_verified: Option<bool>,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    /// The user's contacts, embedded only by the profile endpoint.
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Admin,
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::SuperAdmin => "SUPER ADMIN",
            Role::Admin => "ADMIN",
            Role::User => "USER",
        };
        write!(f, "{}", label)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Inactive,
    Block,
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Inactive => "INACTIVE",
            UserStatus::Block => "BLOCK",
        };
        write!(f, "{}", label)
    }
}

/// A reference-list country.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: i64,
    pub name: String,
    /// ISO-style short code, e.g. "BD".
    pub code: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Paging block attached to list responses.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub limit: u64,
}

/// One page of a list endpoint. The backend answers either as
/// `{data: [...], pagination: {...}}` or as a bare array; `api::parse_page`
/// accepts both and leaves `pagination` empty in the bare case.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Option<Pagination>,
}
