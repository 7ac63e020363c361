use chrono::{DateTime, Utc};
use leadboard::models::{Contact, ContactStatus};
use leadboard::progress::{contact_stats, parse_when};

fn at(raw: &str) -> DateTime<Utc> {
    parse_when(raw).unwrap()
}

fn contact(id: i64, created_at: &str, status: ContactStatus) -> Contact {
    Contact {
        id,
        name: format!("Lead {}", id),
        email: format!("lead{}@example.com", id),
        designation: None,
        company: "Acme Ltd".into(),
        domain: None,
        country: None,
        company_linkedin: None,
        personal_linkedin: None,
        status,
        note: None,
        author_id: 7,
        author: None,
        created_at: created_at.into(),
        updated_at: None,
    }
}

#[test]
fn test_window_counts() {
    let contacts = vec![
        contact(1, "2024-06-10T08:00:00.000Z", ContactStatus::New),
        contact(2, "2024-06-07T09:00:00.000Z", ContactStatus::Contacted),
        contact(3, "2024-05-20T10:00:00.000Z", ContactStatus::New),
        contact(4, "2023-11-05T10:00:00.000Z", ContactStatus::New),
    ];
    let stats = contact_stats(&contacts, at("2024-06-10T12:00:00Z"));

    assert_eq!(stats.today, 1);
    assert_eq!(stats.last_week, 2);
    assert_eq!(stats.this_month, 2);
    assert_eq!(stats.lifetime, 4);
    // Nov 2023 through Jun 2024 is 8 months inclusive.
    assert_eq!(stats.monthly_average, 0.5);
}

#[test]
fn test_today_is_a_calendar_date_not_a_24h_window() {
    let contacts = vec![contact(1, "2024-06-09T23:00:00Z", ContactStatus::New)];
    let stats = contact_stats(&contacts, at("2024-06-10T01:00:00Z"));

    // Two hours old, but dated yesterday.
    assert_eq!(stats.today, 0);
    assert_eq!(stats.last_week, 1);
}

#[test]
fn test_last_week_is_a_rolling_168_hours() {
    let contacts = vec![
        contact(1, "2024-06-03T13:00:00Z", ContactStatus::New),
        contact(2, "2024-06-03T11:00:00Z", ContactStatus::New),
    ];
    let stats = contact_stats(&contacts, at("2024-06-10T12:00:00Z"));

    assert_eq!(stats.last_week, 1);
}

#[test]
fn test_status_counts_follow_their_windows() {
    let contacts = vec![
        contact(1, "2024-06-05T10:00:00Z", ContactStatus::Responded),
        contact(2, "2024-05-08T10:00:00Z", ContactStatus::Responded),
        contact(3, "2024-06-02T10:00:00Z", ContactStatus::Negotiating),
        contact(4, "2024-02-15T10:00:00Z", ContactStatus::ClosedWon),
        contact(5, "2023-09-01T10:00:00Z", ContactStatus::ClosedWon),
    ];
    let stats = contact_stats(&contacts, at("2024-06-10T12:00:00Z"));

    assert_eq!(stats.responded_this_month, 1);
    assert_eq!(stats.negotiating_this_month, 1);
    assert_eq!(stats.won_this_year, 1);
    assert_eq!(stats.won_lifetime, 2);
}

#[test]
fn test_unparseable_created_at_still_counts_toward_lifetime() {
    let contacts = vec![
        contact(1, "garbage", ContactStatus::ClosedWon),
        contact(2, "2024-06-10T08:00:00Z", ContactStatus::New),
    ];
    let stats = contact_stats(&contacts, at("2024-06-10T12:00:00Z"));

    assert_eq!(stats.lifetime, 2);
    assert_eq!(stats.won_lifetime, 1);
    // The dated counts skip the entry they cannot place.
    assert_eq!(stats.today, 1);
    assert_eq!(stats.this_month, 1);
    assert_eq!(stats.won_this_year, 0);
}

#[test]
fn test_average_never_divides_by_less_than_one_month() {
    let contacts = vec![
        contact(1, "2024-06-08T10:00:00Z", ContactStatus::New),
        contact(2, "2024-06-09T10:00:00Z", ContactStatus::New),
    ];
    let stats = contact_stats(&contacts, at("2024-06-10T12:00:00Z"));

    // Both created this month: the span is one month, not a fraction.
    assert_eq!(stats.monthly_average, 2.0);
}

#[test]
fn test_empty_contact_list() {
    let stats = contact_stats(&[], at("2024-06-10T12:00:00Z"));

    assert_eq!(stats.lifetime, 0);
    assert_eq!(stats.today, 0);
    assert_eq!(stats.last_week, 0);
    assert_eq!(stats.monthly_average, 0.0);
}
