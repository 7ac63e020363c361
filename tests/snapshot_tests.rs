use leadboard::models::{Contact, ContactStatus, Country, Task};
use leadboard::storage::{
    delete_snapshot, load_snapshot, remember_contacts, remember_tasks, save_snapshot, Snapshot,
};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

// Use a mutex to ensure tests run serially since they modify the environment variable
static TEST_MUTEX: Mutex<()> = Mutex::new(());

fn with_test_snapshot<F>(test_name: &str, f: F)
where
    F: FnOnce(PathBuf),
{
    let _guard = TEST_MUTEX.lock().unwrap();

    let mut path = env::temp_dir();
    path.push(format!("leadboard_test_{}.json", test_name));

    // Set env var
    env::set_var("LEADBOARD_SNAPSHOT", path.to_str().unwrap());

    // Clean up before test
    if path.exists() {
        fs::remove_file(&path).unwrap();
    }

    // Run test
    f(path.clone());

    // Clean up after test
    if path.exists() {
        fs::remove_file(&path).unwrap();
    }
    env::remove_var("LEADBOARD_SNAPSHOT");
}

fn task(id: i64) -> Task {
    Task {
        id,
        title: format!("Task {}", id),
        description: None,
        target_value: 50,
        assigned_to_id: 2,
        assigned_by_id: 1,
        is_active: true,
        created_at: "2024-06-01T00:00:00.000Z".into(),
        updated_at: None,
        assigned_to: None,
        assigned_by: None,
        daily_logs: None,
    }
}

fn contact(id: i64) -> Contact {
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
        author_id: 7,
        author: None,
        created_at: "2024-06-01T00:00:00.000Z".into(),
        updated_at: None,
    }
}

fn country(id: i64) -> Country {
    Country {
        id,
        name: "Bangladesh".into(),
        code: "BD".into(),
        created_at: None,
        updated_at: None,
    }
}

#[test]
fn test_save_and_load_roundtrip() {
    with_test_snapshot("roundtrip", |_path| {
        let snapshot = Snapshot {
            fetched_at: Some("2024-06-10T12:00:00Z".into()),
            tasks: vec![task(1)],
            contacts: vec![contact(2)],
            countries: vec![country(3)],
        };
        save_snapshot(&snapshot).unwrap();

        let loaded = load_snapshot();
        assert_eq!(loaded.tasks.len(), 1);
        assert_eq!(loaded.tasks[0].id, 1);
        assert_eq!(loaded.contacts[0].id, 2);
        assert_eq!(loaded.countries[0].code, "BD");
        assert_eq!(loaded.fetched_at.as_deref(), Some("2024-06-10T12:00:00Z"));
    });
}

#[test]
fn test_missing_file_loads_empty() {
    with_test_snapshot("missing", |_path| {
        let snapshot = load_snapshot();
        assert!(snapshot.tasks.is_empty());
        assert!(snapshot.contacts.is_empty());
        assert_eq!(snapshot.fetched_label(), "an unknown time");
    });
}

#[test]
fn test_corrupt_file_loads_empty() {
    with_test_snapshot("corrupt", |path| {
        fs::write(&path, b"{ this is not json").unwrap();

        let snapshot = load_snapshot();
        assert!(snapshot.tasks.is_empty());
        assert!(snapshot.contacts.is_empty());
    });
}

#[test]
fn test_remember_tasks_keeps_other_sections() {
    with_test_snapshot("remember_tasks", |_path| {
        remember_contacts(&[contact(5)]);
        remember_tasks(&[task(9)]);

        let snapshot = load_snapshot();
        assert_eq!(snapshot.tasks.len(), 1);
        assert_eq!(snapshot.tasks[0].id, 9);
        assert_eq!(snapshot.contacts.len(), 1);
        assert_eq!(snapshot.contacts[0].id, 5);
        assert!(snapshot.fetched_at.is_some());
    });
}

#[test]
fn test_remember_replaces_the_section_wholesale() {
    with_test_snapshot("replace", |_path| {
        remember_tasks(&[task(1), task(2)]);
        remember_tasks(&[task(3)]);

        let snapshot = load_snapshot();
        assert_eq!(snapshot.tasks.len(), 1);
        assert_eq!(snapshot.tasks[0].id, 3);
    });
}

#[test]
fn test_delete_snapshot_removes_the_file() {
    with_test_snapshot("delete", |path| {
        remember_tasks(&[task(1)]);
        assert!(path.exists());

        delete_snapshot().unwrap();
        assert!(!path.exists());
        assert!(load_snapshot().tasks.is_empty());
    });
}
