use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::str::FromStr;

use crate::models::{Contact, Pagination};
use crate::progress::{first_instant_of, parse_when};

/// Relative creation-date filter for contact lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Created within the last 7 x 24 hours.
    Week,
    /// Created since the first of the current month.
    Month,
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            other => Err(format!("unknown period '{}' (expected week or month)", other)),
        }
    }
}

/// Filter state for a contact listing, applied over already-fetched rows.
///
/// The backend only knows how to filter by author. Any period or exact-date
/// criterion therefore forces the fetch-everything-and-filter-here path;
/// [`ContactFilter::server_side`] tells the caller which one it is on.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactFilter {
    pub author: Option<i64>,
    pub period: Option<Period>,
    pub date: Option<NaiveDate>,
}

impl ContactFilter {
    pub fn is_empty(&self) -> bool {
        self.author.is_none() && self.period.is_none() && self.date.is_none()
    }

    /// True when the backend's authorId query already answers this filter.
    pub fn server_side(&self) -> bool {
        self.period.is_none() && self.date.is_none()
    }

    /// Whether one contact passes every criterion at the given instant.
    ///
    /// Author matches on the `authorId` field or the embedded author row.
    /// A contact whose `createdAt` does not parse fails every dated
    /// criterion but passes an author-only filter.
    pub fn matches(&self, contact: &Contact, now: DateTime<Utc>) -> bool {
        if let Some(author) = self.author {
            let on_field = contact.author_id == author;
            let on_embed = contact.author.as_ref().map_or(false, |a| a.id == author);
            if !on_field && !on_embed {
                return false;
            }
        }
        let created = parse_when(&contact.created_at);
        if let Some(period) = self.period {
            let floor = match period {
                Period::Week => Some(now - Duration::days(7)),
                Period::Month => first_instant_of(now.year(), now.month()),
            };
            match (created, floor) {
                (Some(t), Some(f)) if t >= f => {}
                _ => return false,
            }
        }
        if let Some(date) = self.date {
            match created {
                Some(t) if t.date_naive() == date => {}
                _ => return false,
            }
        }
        true
    }

    pub fn apply(&self, contacts: &[Contact], now: DateTime<Utc>) -> Vec<Contact> {
        contacts
            .iter()
            .filter(|contact| self.matches(contact, now))
            .cloned()
            .collect()
    }
}

/// Cuts one page out of a locally filtered list, with the same paging block
/// the backend attaches to its own responses.
pub fn page_slice<T: Clone>(items: &[T], page: u64, limit: u64) -> (Vec<T>, Pagination) {
    let page = page.max(1);
    let limit = limit.max(1);
    let total = items.len() as u64;
    let total_pages = total.div_ceil(limit).max(1);
    let start = page.saturating_sub(1).saturating_mul(limit) as usize;
    let data = items
        .iter()
        .skip(start)
        .take(limit as usize)
        .cloned()
        .collect();
    let pagination = Pagination {
        total,
        total_pages,
        current_page: page,
        limit,
    };
    (data, pagination)
}
