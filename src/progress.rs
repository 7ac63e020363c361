use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};

use crate::models::{Contact, ContactStatus, Task, TaskDailyLog};

// The weekly quota assumes five workdays no matter which weekdays the 7-day
// window contains; only the 30-day window counts real working days. The
// backend's own reports carry the same mismatch.
const WEEK_QUOTA_DAYS: i64 = 5;
const MONTH_WINDOW_DAYS: i64 = 30;

/// Progress figures for one reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowProgress {
    /// Units completed inside the window.
    pub achieved: i64,
    /// Quota for the window.
    pub target: i64,
    /// `round(min(achieved/target, 1) * 100)`, 0 when the target is 0.
    pub percent: u8,
    /// `max(target - achieved, 0)`.
    pub remaining: i64,
    /// Whether the quota is met. A zero quota is trivially met.
    pub complete: bool,
}

impl WindowProgress {
    fn from_totals(achieved: i64, target: i64) -> Self {
        let percent = if target > 0 {
            let ratio = (achieved as f64 / target as f64).clamp(0.0, 1.0);
            (ratio * 100.0).round() as u8
        } else {
            0
        };
        WindowProgress {
            achieved,
            target,
            percent,
            remaining: target.saturating_sub(achieved).max(0),
            complete: if target == 0 { true } else { achieved >= target },
        }
    }
}

/// All reporting windows for one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskProgress {
    pub today: WindowProgress,
    pub yesterday: WindowProgress,
    /// The 7 calendar days ending today, quota fixed at five days' target.
    pub week: WindowProgress,
    /// The 30 calendar days ending today, Fridays and Saturdays excluded.
    pub month: WindowProgress,
    /// Non-Friday/Saturday days among those 30 calendar days.
    pub working_days: u32,
}

/// Computes every reporting window for a task.
///
/// Pure in both inputs: `now` is passed in rather than read from the system
/// clock, and the task is never mutated. Rules:
/// - **Today / yesterday**: matched by calendar date only; a missing log
///   reads as achieved 0 against the task's current target, a present log
///   carries its own historical target.
/// - **Week**: sum of the last 7 calendar days, no weekday filtering, quota
///   `targetValue * 5`.
/// - **Month**: sum of the last 30 calendar days excluding entries dated
///   Friday or Saturday, quota `targetValue * working_days`.
/// - A log whose date does not parse is left out of every window. A missing
///   `dailyLogs` list reads as empty.
pub fn task_progress(task: &Task, now: DateTime<Utc>) -> TaskProgress {
    let logs: &[TaskDailyLog] = task.daily_logs.as_deref().unwrap_or(&[]);
    let today = now.date_naive();

    // Bad dates drop out here, once, for all windows.
    let dated: Vec<(NaiveDate, &TaskDailyLog)> = logs
        .iter()
        .filter_map(|log| parse_when(&log.date).map(|when| (when.date_naive(), log)))
        .collect();

    let single_day = |date: NaiveDate| -> WindowProgress {
        match dated.iter().find(|(d, _)| *d == date) {
            Some((_, log)) => WindowProgress::from_totals(log.achieved, log.target_value),
            None => WindowProgress::from_totals(0, task.target_value),
        }
    };

    let week_floor = today - Duration::days(6);
    let week_achieved: i64 = dated
        .iter()
        .filter(|(d, _)| *d >= week_floor && *d <= today)
        .map(|(_, log)| log.achieved)
        .sum();
    let week = WindowProgress::from_totals(
        week_achieved,
        task.target_value.saturating_mul(WEEK_QUOTA_DAYS),
    );

    // Exclusion goes by each log's own weekday, not today's.
    let month_floor = today - Duration::days(MONTH_WINDOW_DAYS - 1);
    let month_achieved: i64 = dated
        .iter()
        .filter(|(d, _)| *d >= month_floor && *d <= today && is_working_day(*d))
        .map(|(_, log)| log.achieved)
        .sum();
    let working_days = (0..MONTH_WINDOW_DAYS)
        .filter(|offset| is_working_day(today - Duration::days(*offset)))
        .count() as u32;
    let month = WindowProgress::from_totals(
        month_achieved,
        task.target_value.saturating_mul(i64::from(working_days)),
    );

    TaskProgress {
        today: single_day(today),
        yesterday: single_day(today - Duration::days(1)),
        week,
        month,
        working_days,
    }
}

/// Lifetime and period statistics over a user's contacts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactStats {
    /// Created on today's calendar date.
    pub today: usize,
    /// Created within the last 7 x 24 hours.
    pub last_week: usize,
    /// Created since the first of the current month.
    pub this_month: usize,
    /// Lifetime count divided by the inclusive month span since the
    /// earliest contact, never less than one month.
    pub monthly_average: f64,
    pub lifetime: usize,
    pub responded_this_month: usize,
    pub negotiating_this_month: usize,
    /// CLOSED_WON created since January 1.
    pub won_this_year: usize,
    pub won_lifetime: usize,
}

/// Computes the contact statistics card for one user's contact list.
///
/// Same contract as [`task_progress`]: pure function of the snapshot and an
/// injected `now`. A contact whose `createdAt` does not parse is skipped by
/// the dated counts but still counts toward `lifetime` and `won_lifetime`.
pub fn contact_stats(contacts: &[Contact], now: DateTime<Utc>) -> ContactStats {
    let today = now.date_naive();
    let week_floor = now - Duration::days(7);
    let month_floor = first_instant_of(today.year(), today.month());
    let year_floor = first_instant_of(today.year(), 1);

    let created: Vec<(Option<DateTime<Utc>>, ContactStatus)> = contacts
        .iter()
        .map(|contact| (parse_when(&contact.created_at), contact.status))
        .collect();

    let earliest = created.iter().filter_map(|(when, _)| *when).min();
    let span_months = earliest
        .map(|first| {
            let years = i64::from(today.year() - first.year());
            let months = i64::from(today.month() as i32 - first.month() as i32);
            (years * 12 + months + 1).max(1)
        })
        .unwrap_or(1);

    ContactStats {
        today: created
            .iter()
            .filter(|(when, _)| matches!(when, Some(t) if t.date_naive() == today))
            .count(),
        last_week: created
            .iter()
            .filter(|(when, _)| matches!(when, Some(t) if *t >= week_floor))
            .count(),
        this_month: created
            .iter()
            .filter(|(when, _)| at_or_after(*when, month_floor))
            .count(),
        monthly_average: contacts.len() as f64 / span_months as f64,
        lifetime: contacts.len(),
        responded_this_month: created
            .iter()
            .filter(|(when, status)| {
                *status == ContactStatus::Responded && at_or_after(*when, month_floor)
            })
            .count(),
        negotiating_this_month: created
            .iter()
            .filter(|(when, status)| {
                *status == ContactStatus::Negotiating && at_or_after(*when, month_floor)
            })
            .count(),
        won_this_year: created
            .iter()
            .filter(|(when, status)| {
                *status == ContactStatus::ClosedWon && at_or_after(*when, year_floor)
            })
            .count(),
        won_lifetime: created
            .iter()
            .filter(|(_, status)| *status == ContactStatus::ClosedWon)
            .count(),
    }
}

/// Parses a backend timestamp leniently.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (fractional seconds
/// allowed), `YYYY-MM-DD HH:MM:SS`, or a bare `YYYY-MM-DD`; naive forms are
/// taken as UTC. Returns `None` for anything else so callers can drop the
/// entry instead of failing.
pub fn parse_when(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(when) = DateTime::parse_from_rfc3339(raw) {
        return Some(when.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(when) = chrono::NaiveDateTime::parse_from_str(raw, format) {
            return Some(when.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|when| when.and_utc());
    }
    None
}

/// The deployment's weekend is Friday and Saturday.
pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Fri | Weekday::Sat)
}

pub(crate) fn first_instant_of(year: i32, month: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|when| when.and_utc())
}

fn at_or_after(when: Option<DateTime<Utc>>, floor: Option<DateTime<Utc>>) -> bool {
    match (when, floor) {
        (Some(t), Some(f)) => t >= f,
        _ => false,
    }
}
