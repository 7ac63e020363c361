use chrono::{DateTime, NaiveDate, Utc};
use leadboard::filters::{page_slice, ContactFilter, Period};
use leadboard::models::{Contact, ContactStatus, Role, User, UserStatus};
use leadboard::progress::parse_when;
use std::str::FromStr;

fn at(raw: &str) -> DateTime<Utc> {
    parse_when(raw).unwrap()
}

fn contact(id: i64, author_id: i64, created_at: &str) -> Contact {
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
        status: ContactStatus::New,
        note: None,
        author_id,
        author: None,
        created_at: created_at.into(),
        updated_at: None,
    }
}

fn user(id: i64) -> User {
    User {
        id,
        name: "Agent".into(),
        email: "agent@example.com".into(),
        phone: None,
        picture: None,
        role: Role::User,
        status: UserStatus::Active,
        is_verified: None,
        created_at: "2024-01-01T00:00:00.000Z".into(),
        updated_at: None,
        contacts: Vec::new(),
    }
}

#[test]
fn test_period_parses_case_insensitively() {
    assert_eq!(Period::from_str("week"), Ok(Period::Week));
    assert_eq!(Period::from_str(" Month "), Ok(Period::Month));
    assert!(Period::from_str("fortnight").is_err());
}

#[test]
fn test_server_side_is_author_only() {
    assert!(ContactFilter::default().server_side());

    let by_author = ContactFilter {
        author: Some(7),
        ..ContactFilter::default()
    };
    assert!(by_author.server_side());

    let by_period = ContactFilter {
        period: Some(Period::Week),
        ..ContactFilter::default()
    };
    assert!(!by_period.server_side());
}

#[test]
fn test_author_filter_matches_field_or_embedded_row() {
    let now = at("2024-06-10T12:00:00Z");
    let filter = ContactFilter {
        author: Some(7),
        ..ContactFilter::default()
    };

    assert!(filter.matches(&contact(1, 7, "2024-06-01T00:00:00Z"), now));
    assert!(!filter.matches(&contact(2, 8, "2024-06-01T00:00:00Z"), now));

    // Some list responses only carry the embedded author row.
    let mut embedded = contact(3, 0, "2024-06-01T00:00:00Z");
    embedded.author = Some(user(7));
    assert!(filter.matches(&embedded, now));
}

#[test]
fn test_period_week_is_a_rolling_seven_days() {
    let now = at("2024-06-10T12:00:00Z");
    let filter = ContactFilter {
        period: Some(Period::Week),
        ..ContactFilter::default()
    };

    assert!(filter.matches(&contact(1, 7, "2024-06-03T13:00:00Z"), now));
    assert!(!filter.matches(&contact(2, 7, "2024-06-03T11:00:00Z"), now));
}

#[test]
fn test_period_month_starts_at_the_first() {
    let now = at("2024-06-10T12:00:00Z");
    let filter = ContactFilter {
        period: Some(Period::Month),
        ..ContactFilter::default()
    };

    assert!(filter.matches(&contact(1, 7, "2024-06-01T00:00:00Z"), now));
    assert!(!filter.matches(&contact(2, 7, "2024-05-31T23:59:59Z"), now));
}

#[test]
fn test_exact_date_filter_uses_the_calendar_date() {
    let now = at("2024-06-10T12:00:00Z");
    let filter = ContactFilter {
        date: NaiveDate::from_ymd_opt(2024, 6, 5),
        ..ContactFilter::default()
    };

    assert!(filter.matches(&contact(1, 7, "2024-06-05T23:00:00Z"), now));
    assert!(!filter.matches(&contact(2, 7, "2024-06-06T00:00:00Z"), now));
}

#[test]
fn test_unparseable_created_at_fails_dated_criteria_only() {
    let now = at("2024-06-10T12:00:00Z");
    let broken = contact(1, 7, "not-a-date");

    let by_author = ContactFilter {
        author: Some(7),
        ..ContactFilter::default()
    };
    assert!(by_author.matches(&broken, now));

    let by_period = ContactFilter {
        period: Some(Period::Week),
        ..ContactFilter::default()
    };
    assert!(!by_period.matches(&broken, now));
}

#[test]
fn test_apply_combines_criteria() {
    let now = at("2024-06-10T12:00:00Z");
    let contacts = vec![
        contact(1, 7, "2024-06-09T10:00:00Z"),
        contact(2, 8, "2024-06-09T10:00:00Z"),
        contact(3, 7, "2024-04-01T10:00:00Z"),
    ];
    let filter = ContactFilter {
        author: Some(7),
        period: Some(Period::Month),
        ..ContactFilter::default()
    };

    let kept = filter.apply(&contacts, now);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].id, 1);
}

#[test]
fn test_page_slice_cuts_and_reports() {
    let items: Vec<i64> = (1..=5).collect();
    let (data, paging) = page_slice(&items, 2, 2);

    assert_eq!(data, vec![3, 4]);
    assert_eq!(paging.total, 5);
    assert_eq!(paging.total_pages, 3);
    assert_eq!(paging.current_page, 2);
    assert_eq!(paging.limit, 2);
}

#[test]
fn test_page_slice_past_the_end_is_empty() {
    let items: Vec<i64> = (1..=5).collect();
    let (data, paging) = page_slice(&items, 9, 2);

    assert!(data.is_empty());
    assert_eq!(paging.total_pages, 3);
    assert_eq!(paging.current_page, 9);
}

#[test]
fn test_page_slice_survives_absurd_page_numbers() {
    let items: Vec<i64> = (1..=5).collect();
    let (data, paging) = page_slice(&items, u64::MAX, u64::MAX);

    assert!(data.is_empty());
    assert_eq!(paging.current_page, u64::MAX);
    assert_eq!(paging.total_pages, 1);
}

#[test]
fn test_page_slice_floors_page_and_limit_at_one() {
    let items: Vec<i64> = (1..=3).collect();
    let (data, paging) = page_slice(&items, 0, 0);

    assert_eq!(data, vec![1]);
    assert_eq!(paging.current_page, 1);
    assert_eq!(paging.limit, 1);
    assert_eq!(paging.total_pages, 3);
}

#[test]
fn test_page_slice_of_nothing_is_one_empty_page() {
    let items: Vec<i64> = Vec::new();
    let (data, paging) = page_slice(&items, 1, 20);

    assert!(data.is_empty());
    assert_eq!(paging.total, 0);
    assert_eq!(paging.total_pages, 1);
}
