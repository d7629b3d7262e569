use std::sync::Arc;
use taskpad_core::{
    AddTaskInput, KvStore, MemoryKvStore, Notifier, Permission, ServiceError, Task,
    TaskRepository, TaskService, Theme, TASKS_KEY,
};

struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn permission(&self) -> Permission {
        Permission::Denied
    }

    fn notify(&self, _title: &str, _body: &str, _icon: &str) {}
}

fn open_service(store: &MemoryKvStore) -> TaskService<&MemoryKvStore> {
    TaskService::open(store, Arc::new(SilentNotifier)).unwrap()
}

fn input(text: &str, date: &str, priority: &str, category: &str) -> AddTaskInput {
    AddTaskInput {
        text: text.to_string(),
        date: date.to_string(),
        priority: priority.to_string(),
        category: category.to_string(),
    }
}

#[test]
fn add_appends_to_canonical_state_rows_and_storage() {
    let store = MemoryKvStore::new();
    let mut service = open_service(&store);

    service.add_task(input("first", "", "", "")).unwrap();
    let index = service
        .add_task(input("  second  ", "2025-06-01", "high", "home"))
        .unwrap();

    assert_eq!(index, 1);
    assert_eq!(service.tasks().len(), 2);
    assert_eq!(service.rows().len(), 2);
    assert_eq!(service.tasks()[1].text, "second");
    assert_eq!(service.rows()[1].label, "second");

    let stored = TaskRepository::new(&store).load_all().unwrap();
    assert_eq!(stored, service.tasks());
}

#[test]
fn add_with_blank_text_changes_nothing() {
    let store = MemoryKvStore::new();
    let mut service = open_service(&store);
    service.add_task(input("keep me", "", "", "")).unwrap();

    let err = service.add_task(input("   ", "2025-06-01", "high", "x")).unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(service.tasks().len(), 1);
    assert_eq!(service.rows().len(), 1);
    assert_eq!(TaskRepository::new(&store).load_all().unwrap().len(), 1);
}

#[test]
fn toggle_twice_restores_the_flag_and_keeps_length() {
    let store = MemoryKvStore::new();
    let mut service = open_service(&store);
    service.add_task(input("flip", "", "", "")).unwrap();

    assert!(service.toggle_completed(0).unwrap());
    assert!(service.rows()[0].completed);
    assert!(TaskRepository::new(&store).load_all().unwrap()[0].completed);

    assert!(!service.toggle_completed(0).unwrap());
    let stored = TaskRepository::new(&store).load_all().unwrap();
    assert_eq!(stored.len(), 1);
    assert!(!stored[0].completed);
}

#[test]
fn toggle_out_of_range_is_rejected() {
    let store = MemoryKvStore::new();
    let mut service = open_service(&store);

    let err = service.toggle_completed(3).unwrap_err();
    assert!(matches!(err, ServiceError::UnknownRow(3)));
}

#[test]
fn delete_removes_every_structural_match() {
    let store = MemoryKvStore::new();
    let mut service = open_service(&store);
    service.add_task(input("dup", "2025-06-01", "low", "a")).unwrap();
    service.add_task(input("other", "", "", "")).unwrap();
    service.add_task(input("dup", "2025-06-01", "high", "b")).unwrap();

    service.delete_task(0).unwrap();

    assert_eq!(service.tasks().len(), 1);
    assert_eq!(service.tasks()[0].text, "other");
    assert_eq!(service.rows().len(), 1);
    assert_eq!(
        TaskRepository::new(&store).load_all().unwrap(),
        service.tasks()
    );
}

#[test]
fn startup_load_renders_stored_order() {
    let store = MemoryKvStore::new();
    {
        let mut service = open_service(&store);
        service.add_task(input("one", "", "", "")).unwrap();
        service.add_task(input("two", "2025-06-01", "", "tag")).unwrap();
    }

    let reopened = open_service(&store);
    let labels: Vec<&str> = reopened
        .rows()
        .iter()
        .map(|row| row.label.as_str())
        .collect();
    assert_eq!(labels, vec!["one", "two"]);
    assert!(reopened.rows()[1].meta.is_some());
}

#[test]
fn corrupt_stored_blob_loads_as_empty_without_error() {
    let store = MemoryKvStore::new();
    store.set(TASKS_KEY, "not json").unwrap();

    let service = open_service(&store);
    assert!(service.tasks().is_empty());
    assert!(service.rows().is_empty());
}

#[test]
fn theme_toggle_persists_and_survives_reopen() {
    let store = MemoryKvStore::new();
    let mut service = open_service(&store);
    assert_eq!(service.theme(), Theme::Light);

    assert_eq!(service.toggle_theme().unwrap(), Theme::Dark);
    drop(service);

    assert_eq!(open_service(&store).theme(), Theme::Dark);
}

#[test]
fn export_reflects_the_persisted_collection() {
    let store = MemoryKvStore::new();
    let mut service = open_service(&store);
    service.add_task(input("ship", "2025-06-01", "high", "work")).unwrap();

    let artifact = service.export().unwrap();
    assert_eq!(artifact.file_name, "todo-tasks.json");

    let exported: Vec<Task> = serde_json::from_str(&artifact.json).unwrap();
    assert_eq!(exported, service.tasks());
}

#[test]
fn far_future_due_date_schedules_no_reminder() {
    let store = MemoryKvStore::new();
    let mut service = open_service(&store);

    service
        .add_task(input("Pay rent", "2099-01-01", "", ""))
        .unwrap();

    assert_eq!(service.tasks().len(), 1);
    assert_eq!(service.pending_reminders(), 0);
}

#[test]
fn reload_picks_up_an_external_write() {
    let store = MemoryKvStore::new();
    let mut service = open_service(&store);
    service.add_task(input("mine", "", "", "")).unwrap();

    // Another writer replaces the store wholesale; last writer wins.
    let external = vec![Task::new("theirs", "", "", "").unwrap()];
    TaskRepository::new(&store).save_all(&external).unwrap();

    service.reload().unwrap();
    assert_eq!(service.tasks(), external);
    assert_eq!(service.rows().len(), 1);
}
