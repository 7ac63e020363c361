use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::models::{Contact, ContactStatus, Country, Page, Task, User};

/// Backend base URL when `LEADBOARD_API` is unset.
pub const DEFAULT_BASE: &str = "http://localhost:5001/api/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("could not reach the backend: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend answered {0}")]
    Status(StatusCode),
    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Blocking client for the CRM backend.
///
/// Requests carry no credentials; the deployment fronts the backend with its
/// own session layer.
pub struct ApiClient {
    base: String,
    http: Client,
}

impl ApiClient {
    /// Builds a client against the given base URL; a trailing slash is fine.
    pub fn new(base: impl Into<String>) -> Result<ApiClient, ApiError> {
        let base = base.into().trim_end_matches('/').to_string();
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(ApiClient { base, http })
    }

    /// Base URL from `LEADBOARD_API`, or the default local deployment.
    pub fn default_base() -> String {
        std::env::var("LEADBOARD_API").unwrap_or_else(|_| DEFAULT_BASE.to_string())
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    // --- tasks ---

    pub fn tasks(&self, page: u64, limit: u64, search: Option<&str>) -> Result<Page<Task>, ApiError> {
        let mut query = vec![("page", page.to_string()), ("limit", limit.to_string())];
        if let Some(search) = search {
            query.push(("search", search.to_string()));
        }
        Ok(parse_page(self.get_value("/task/all", &query)?)?)
    }

    pub fn my_tasks(&self, user: i64, page: u64, limit: u64) -> Result<Page<Task>, ApiError> {
        let query = vec![
            ("page", page.to_string()),
            ("limit", limit.to_string()),
            ("userId", user.to_string()),
        ];
        Ok(parse_page(self.get_value("/task/my", &query)?)?)
    }

    pub fn create_task(&self, draft: &TaskDraft) -> Result<(), ApiError> {
        self.post_value("/task", draft).map(|_| ())
    }

    pub fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<(), ApiError> {
        self.patch_value(&format!("/task/{}", id), patch).map(|_| ())
    }

    /// Records an achieved value for the task; the backend files it under
    /// the calendar date of `when`.
    pub fn log_progress(&self, id: i64, achieved: i64, when: DateTime<Utc>) -> Result<(), ApiError> {
        let body = serde_json::json!({
            "achieved": achieved,
            "date": when.to_rfc3339_opts(SecondsFormat::Millis, true),
        });
        self.patch_value(&format!("/task/{}/progress", id), &body)
            .map(|_| ())
    }

    pub fn delete_task(&self, id: i64) -> Result<(), ApiError> {
        self.delete_value(&format!("/task/{}", id)).map(|_| ())
    }

    // --- contacts ---

    pub fn contacts(
        &self,
        page: u64,
        limit: u64,
        author: Option<i64>,
    ) -> Result<Page<Contact>, ApiError> {
        let mut query = vec![("page", page.to_string()), ("limit", limit.to_string())];
        if let Some(author) = author {
            query.push(("authorId", author.to_string()));
        }
        Ok(parse_page(self.get_value("/contact", &query)?)?)
    }

    pub fn create_contact(&self, draft: &ContactDraft) -> Result<(), ApiError> {
        self.post_value("/contact", draft).map(|_| ())
    }

    pub fn update_contact(&self, id: i64, patch: &ContactPatch) -> Result<(), ApiError> {
        self.patch_value(&format!("/contact/{}", id), patch)
            .map(|_| ())
    }

    // --- countries ---

    pub fn countries(
        &self,
        page: u64,
        limit: u64,
        search: Option<&str>,
    ) -> Result<Page<Country>, ApiError> {
        let mut query = vec![("page", page.to_string()), ("limit", limit.to_string())];
        if let Some(search) = search {
            query.push(("search", search.to_string()));
        }
        Ok(parse_page(self.get_value("/country", &query)?)?)
    }

    pub fn create_country(&self, name: &str, code: &str) -> Result<(), ApiError> {
        let body = serde_json::json!({ "name": name, "code": code });
        self.post_value("/country", &body).map(|_| ())
    }

    // --- users ---

    pub fn users(&self) -> Result<Vec<User>, ApiError> {
        Ok(parse_page(self.get_value("/user", &[])?)?.data)
    }

    /// Fetches one user's profile; the response embeds their contacts.
    pub fn user(&self, id: i64) -> Result<User, ApiError> {
        Ok(parse_entity(self.get_value(&format!("/user/{}", id), &[])?)?)
    }

    pub fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        self.delete_value(&format!("/user/{}", id)).map(|_| ())
    }

    // --- plumbing ---

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn get_value(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!("GET {}", url);
        let response = self.http.get(&url).query(query).send()?;
        take_json(response)
    }

    fn post_value<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!("POST {}", url);
        let response = self.http.post(&url).json(body).send()?;
        take_json(response)
    }

    fn patch_value<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!("PATCH {}", url);
        let response = self.http.patch(&url).json(body).send()?;
        take_json(response)
    }

    fn delete_value(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!("DELETE {}", url);
        let response = self.http.delete(&url).send()?;
        take_json(response)
    }
}

fn take_json(response: Response) -> Result<Value, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status(status));
    }
    // Delete and some patch routes answer with an empty body.
    let text = response.text()?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}

/// Decodes a list response in either of the backend's two shapes:
/// `{data: [...], pagination: {...}}` or a bare array. A null body reads as
/// an empty page and a malformed paging block is dropped rather than fatal.
pub fn parse_page<T: DeserializeOwned>(value: Value) -> Result<Page<T>, serde_json::Error> {
    match value {
        Value::Null => Ok(Page {
            data: Vec::new(),
            pagination: None,
        }),
        Value::Object(mut map) if map.contains_key("data") => {
            let data = match map.remove("data").unwrap_or(Value::Null) {
                Value::Null => Vec::new(),
                other => serde_json::from_value(other)?,
            };
            let pagination = map
                .remove("pagination")
                .and_then(|raw| serde_json::from_value(raw).ok());
            Ok(Page { data, pagination })
        }
        other => Ok(Page {
            data: serde_json::from_value(other)?,
            pagination: None,
        }),
    }
}

/// Decodes a single-entity response, wrapped in `{data: ...}` or bare.
pub fn parse_entity<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            serde_json::from_value(map.remove("data").unwrap_or(Value::Null))
        }
        other => serde_json::from_value(other),
    }
}

/// Payload for creating a task.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub target_value: i64,
    pub assigned_to_id: i64,
    pub assigned_by_id: i64,
}

/// Partial update for a task; only the set fields travel.
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Payload for creating a contact.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_linkedin: Option<String>,
    pub status: ContactStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub author_id: i64,
}

/// Partial update for a contact; only the set fields travel.
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContactPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// A country change travels as `country: <id>`, unlike create's
    /// `countryId`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ContactStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ContactPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.designation.is_none()
            && self.company.is_none()
            && self.domain.is_none()
            && self.country.is_none()
            && self.company_linkedin.is_none()
            && self.personal_linkedin.is_none()
            && self.status.is_none()
            && self.note.is_none()
    }
}
