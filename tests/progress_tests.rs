use chrono::{DateTime, Utc};
use leadboard::models::{Task, TaskDailyLog};
use leadboard::progress::{is_working_day, parse_when, task_progress};

fn at(raw: &str) -> DateTime<Utc> {
    parse_when(raw).unwrap()
}

fn task_with_logs(target: i64, logs: Vec<TaskDailyLog>) -> Task {
    Task {
        id: 1,
        title: "Daily outreach".into(),
        description: None,
        target_value: target,
        assigned_to_id: 2,
        assigned_by_id: 1,
        is_active: true,
        created_at: "2024-01-01T00:00:00.000Z".into(),
        updated_at: None,
        assigned_to: None,
        assigned_by: None,
        daily_logs: Some(logs),
    }
}

fn log(date: &str, target: i64, achieved: i64) -> TaskDailyLog {
    TaskDailyLog {
        id: 0,
        task_id: 1,
        date: date.into(),
        target_value: target,
        achieved,
        performance: None,
        status: None,
        created_at: None,
    }
}

#[test]
fn test_today_without_log_reads_zero_against_current_target() {
    let task = task_with_logs(100, vec![]);
    let progress = task_progress(&task, at("2024-06-10T12:00:00Z"));

    assert_eq!(progress.today.achieved, 0);
    assert_eq!(progress.today.target, 100);
    assert_eq!(progress.today.percent, 0);
    assert_eq!(progress.today.remaining, 100);
    assert!(!progress.today.complete);
}

#[test]
fn test_today_with_log_carries_the_log_target() {
    // The task's quota was raised to 100 after this log was recorded.
    let task = task_with_logs(100, vec![log("2024-06-10T00:00:00.000Z", 80, 80)]);
    let progress = task_progress(&task, at("2024-06-10T17:30:00Z"));

    assert_eq!(progress.today.achieved, 80);
    assert_eq!(progress.today.target, 80);
    assert_eq!(progress.today.percent, 100);
    assert_eq!(progress.today.remaining, 0);
    assert!(progress.today.complete);
}

#[test]
fn test_yesterday_is_matched_by_calendar_date() {
    let task = task_with_logs(40, vec![log("2024-06-09T23:50:00Z", 40, 50)]);
    let progress = task_progress(&task, at("2024-06-10T00:10:00Z"));

    // Logged twenty minutes ago, but on yesterday's date.
    assert_eq!(progress.today.achieved, 0);
    assert_eq!(progress.yesterday.achieved, 50);
    // Overachieving clamps at 100, and remaining never goes negative.
    assert_eq!(progress.yesterday.percent, 100);
    assert_eq!(progress.yesterday.remaining, 0);
    assert!(progress.yesterday.complete);
}

#[test]
fn test_week_sums_seven_days_against_a_five_day_quota() {
    let dates = [
        "2024-06-04",
        "2024-06-05",
        "2024-06-06",
        "2024-06-07",
        "2024-06-08",
        "2024-06-09",
        "2024-06-10",
    ];
    let logs: Vec<TaskDailyLog> = dates.iter().map(|d| log(d, 50, 10)).collect();
    let task = task_with_logs(50, logs);
    let progress = task_progress(&task, at("2024-06-10T12:00:00Z"));

    // June 7 is a Friday and June 8 a Saturday; the week window keeps both.
    assert_eq!(progress.week.achieved, 70);
    assert_eq!(progress.week.target, 250);
    assert_eq!(progress.week.remaining, 180);
    assert_eq!(progress.week.percent, 28);
    assert!(!progress.week.complete);
}

#[test]
fn test_week_ignores_logs_older_than_seven_days() {
    let task = task_with_logs(50, vec![log("2024-06-03", 50, 10)]);
    let progress = task_progress(&task, at("2024-06-10T12:00:00Z"));

    // Eight days back: out of the week window, still inside the 30-day one.
    assert_eq!(progress.week.achieved, 0);
    assert_eq!(progress.month.achieved, 10);
}

#[test]
fn test_month_excludes_friday_and_saturday_logs() {
    let logs = vec![
        log("2024-05-17", 10, 5), // Friday
        log("2024-05-18", 10, 5), // Saturday
        log("2024-05-24", 10, 5), // Friday
        log("2024-05-25", 10, 5), // Saturday
    ];
    let task = task_with_logs(10, logs);
    let progress = task_progress(&task, at("2024-06-10T12:00:00Z"));

    // The 30 calendar days ending 2024-06-10 hold 4 Fridays and 4 Saturdays.
    assert_eq!(progress.month.achieved, 0);
    assert_eq!(progress.working_days, 22);
    assert_eq!(progress.month.target, 220);
    assert!(!progress.month.complete);
}

#[test]
fn test_month_counts_working_day_logs() {
    let logs = vec![
        log("2024-06-03", 10, 7), // Monday
        log("2024-06-07", 10, 9), // Friday, excluded
        log("2024-04-30", 10, 4), // outside the window
    ];
    let task = task_with_logs(10, logs);
    let progress = task_progress(&task, at("2024-06-10T12:00:00Z"));

    assert_eq!(progress.month.achieved, 7);
}

#[test]
fn test_unparseable_log_date_changes_no_window() {
    let good = vec![log("2024-06-09", 50, 20), log("2024-06-10", 50, 30)];
    let mut with_bad = good.clone();
    with_bad.push(log("not-a-date", 50, 999));

    let now = at("2024-06-10T12:00:00Z");
    let clean = task_progress(&task_with_logs(50, good), now);
    let dirty = task_progress(&task_with_logs(50, with_bad), now);

    assert_eq!(clean, dirty);
}

#[test]
fn test_missing_log_list_reads_as_empty() {
    let mut task = task_with_logs(100, vec![]);
    task.daily_logs = None;
    let progress = task_progress(&task, at("2024-06-10T12:00:00Z"));

    assert_eq!(progress.today.achieved, 0);
    assert_eq!(progress.week.achieved, 0);
    assert_eq!(progress.month.achieved, 0);
}

#[test]
fn test_zero_target_is_trivially_complete() {
    let task = task_with_logs(0, vec![]);
    let progress = task_progress(&task, at("2024-06-10T12:00:00Z"));

    assert_eq!(progress.today.target, 0);
    assert_eq!(progress.today.percent, 0);
    assert_eq!(progress.today.remaining, 0);
    assert!(progress.today.complete);
    assert!(progress.week.complete);
    assert!(progress.month.complete);
}

#[test]
fn test_negative_achieved_keeps_derived_fields_bounded() {
    let task = task_with_logs(10, vec![log("2024-06-10", 10, -5)]);
    let progress = task_progress(&task, at("2024-06-10T12:00:00Z"));

    // The raw value passes through; percent floors at 0 and remaining grows.
    assert_eq!(progress.today.achieved, -5);
    assert_eq!(progress.today.target, 10);
    assert_eq!(progress.today.percent, 0);
    assert_eq!(progress.today.remaining, 15);
    assert!(!progress.today.complete);
}

#[test]
fn test_negative_target_reads_as_met_with_nothing_left() {
    let task = task_with_logs(-10, vec![]);
    let progress = task_progress(&task, at("2024-06-10T12:00:00Z"));

    assert_eq!(progress.today.target, -10);
    assert_eq!(progress.today.percent, 0);
    assert_eq!(progress.today.remaining, 0);
    assert!(progress.today.complete);
    // The weekly quota inherits the sign.
    assert_eq!(progress.week.target, -50);
    assert!(progress.week.complete);
}

#[test]
fn test_extreme_target_saturates_the_quotas() {
    let task = task_with_logs(i64::MAX, vec![log("2024-06-10", i64::MAX, 3)]);
    let progress = task_progress(&task, at("2024-06-10T12:00:00Z"));

    assert_eq!(progress.week.target, i64::MAX);
    assert_eq!(progress.month.target, i64::MAX);
    assert_eq!(progress.week.remaining, i64::MAX - 3);
}

#[test]
fn test_percent_rounds_to_nearest() {
    let task = task_with_logs(100, vec![log("2024-06-10", 3, 1)]);
    let progress = task_progress(&task, at("2024-06-10T12:00:00Z"));
    assert_eq!(progress.today.percent, 33);

    let task = task_with_logs(100, vec![log("2024-06-10", 3, 2)]);
    let progress = task_progress(&task, at("2024-06-10T12:00:00Z"));
    assert_eq!(progress.today.percent, 67);
}

#[test]
fn test_parse_when_accepts_backend_date_shapes() {
    assert!(parse_when("2024-06-10T12:34:56.789Z").is_some());
    assert!(parse_when("2024-06-10T12:34:56+06:00").is_some());
    assert!(parse_when("2024-06-10T12:34:56").is_some());
    assert!(parse_when("2024-06-10 12:34:56").is_some());
    assert!(parse_when("2024-06-10").is_some());
    assert!(parse_when("10/06/2024").is_none());
    assert!(parse_when("").is_none());
}

#[test]
fn test_weekend_is_friday_and_saturday() {
    let friday = at("2024-06-07").date_naive();
    let saturday = at("2024-06-08").date_naive();
    let sunday = at("2024-06-09").date_naive();
    let monday = at("2024-06-10").date_naive();

    assert!(!is_working_day(friday));
    assert!(!is_working_day(saturday));
    assert!(is_working_day(sunday));
    assert!(is_working_day(monday));
}
