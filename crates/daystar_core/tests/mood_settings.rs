use daystar_core::db::{open_db, open_db_in_memory};
use daystar_core::{
    MoodEntry, MoodKind, MoodRepository, MoodStore, RepoError, RepoResult, SettingsPatch,
    SettingsRepository, SettingsStore, SqliteMoodRepository, SqliteSettingsRepository, StoreError,
    Theme, UserSettings,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[test]
fn mood_entries_append_edit_and_delete() {
    let conn = open_db_in_memory().unwrap();
    let mut store = MoodStore::load(SqliteMoodRepository::try_new(&conn).unwrap());

    let happy = MoodEntry::from_kind(MoodKind::Happy);
    let mut upset = MoodEntry::from_kind(MoodKind::Upset);
    store.insert(happy.clone()).unwrap();
    store.insert(upset.clone()).unwrap();
    assert_eq!(store.latest(), Some(&upset));

    upset.notes = Some("lost a toy".to_string());
    store.update(upset.clone()).unwrap();
    store.remove(&happy.id).unwrap();

    let reloaded = MoodStore::load(SqliteMoodRepository::try_new(&conn).unwrap());
    assert_eq!(reloaded.list(), [upset].as_slice());
    assert_eq!(reloaded.list(), store.list());
}

#[test]
fn mood_entry_with_bad_timestamp_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let mut store = MoodStore::load(SqliteMoodRepository::try_new(&conn).unwrap());

    let mut entry = MoodEntry::new(3, None);
    entry.timestamp = "last tuesday".to_string();
    let err = store.insert(entry).unwrap_err();

    assert!(matches!(err, StoreError::Repo(RepoError::Mood(_))));
    assert!(store.list().is_empty());
}

#[test]
fn mood_remove_of_unknown_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let mut store = MoodStore::load(SqliteMoodRepository::try_new(&conn).unwrap());
    assert!(matches!(store.remove("nope"), Err(StoreError::NotFound(_))));
}

#[test]
fn settings_default_until_first_save() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSettingsRepository::try_new(&conn).unwrap();
    assert_eq!(repo.load_settings().unwrap(), None);

    let store = SettingsStore::load(repo);
    assert_eq!(store.get(), &UserSettings::default());
}

#[test]
fn settings_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("daystar.sqlite3");
    let saved = UserSettings {
        theme: Theme::Dark,
        notifications_enabled: false,
    };

    {
        let conn = open_db(&path).unwrap();
        let mut store = SettingsStore::load(SqliteSettingsRepository::try_new(&conn).unwrap());
        store.replace(saved.clone()).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = SettingsStore::load(SqliteSettingsRepository::try_new(&conn).unwrap());
    assert_eq!(store.get(), &saved);
}

#[test]
fn partial_update_merges_and_notifies() {
    let conn = open_db_in_memory().unwrap();
    let mut store = SettingsStore::load(SqliteSettingsRepository::try_new(&conn).unwrap());

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |settings| sink.borrow_mut().push(settings.theme));

    let updated = store
        .update(SettingsPatch {
            theme: Some(Theme::Dark),
            notifications_enabled: None,
        })
        .unwrap()
        .clone();
    assert_eq!(updated.theme, Theme::Dark);
    assert!(updated.notifications_enabled);
    assert_eq!(*seen.borrow(), vec![Theme::Dark]);

    let reread = SqliteSettingsRepository::try_new(&conn)
        .unwrap()
        .load_settings()
        .unwrap();
    assert_eq!(reread, Some(updated));
}

#[test]
fn unknown_persisted_theme_falls_back_to_defaults() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO user_settings (id, theme, notifications_enabled) VALUES (1, 'neon', 0);",
        [],
    )
    .unwrap();

    let repo = SqliteSettingsRepository::try_new(&conn).unwrap();
    assert!(matches!(repo.load_settings(), Err(RepoError::InvalidData(_))));
    let store = SettingsStore::load(repo);
    assert_eq!(store.get(), &UserSettings::default());
}

fn offline() -> RepoError {
    RepoError::InvalidData("storage offline".to_string())
}

/// Mood repository that rejects every write while `fail` is set.
struct FailingMoods<'conn> {
    inner: SqliteMoodRepository<'conn>,
    fail: Rc<Cell<bool>>,
}

impl MoodRepository for FailingMoods<'_> {
    fn list_entries(&self) -> RepoResult<Vec<MoodEntry>> {
        self.inner.list_entries()
    }
    fn insert_entry(&self, entry: &MoodEntry) -> RepoResult<()> {
        if self.fail.get() {
            return Err(offline());
        }
        self.inner.insert_entry(entry)
    }
    fn update_entry(&self, entry: &MoodEntry) -> RepoResult<()> {
        if self.fail.get() {
            return Err(offline());
        }
        self.inner.update_entry(entry)
    }
    fn delete_entry(&self, id: &str) -> RepoResult<()> {
        if self.fail.get() {
            return Err(offline());
        }
        self.inner.delete_entry(id)
    }
}

/// Settings repository that rejects every save while `fail` is set.
struct FailingSettings<'conn> {
    inner: SqliteSettingsRepository<'conn>,
    fail: Rc<Cell<bool>>,
}

impl SettingsRepository for FailingSettings<'_> {
    fn load_settings(&self) -> RepoResult<Option<UserSettings>> {
        self.inner.load_settings()
    }
    fn save_settings(&self, settings: &UserSettings) -> RepoResult<()> {
        if self.fail.get() {
            return Err(offline());
        }
        self.inner.save_settings(settings)
    }
}

#[test]
fn failed_mood_writes_keep_list_and_notify_no_one() {
    let conn = open_db_in_memory().unwrap();
    let fail = Rc::new(Cell::new(false));
    let mut store = MoodStore::load(FailingMoods {
        inner: SqliteMoodRepository::try_new(&conn).unwrap(),
        fail: Rc::clone(&fail),
    });
    let calm = MoodEntry::from_kind(MoodKind::Calm);
    store.insert(calm.clone()).unwrap();

    let notified = Rc::new(Cell::new(0));
    let counter = Rc::clone(&notified);
    store.subscribe(move |_| counter.set(counter.get() + 1));

    fail.set(true);
    assert!(matches!(
        store.insert(MoodEntry::from_kind(MoodKind::Sad)),
        Err(StoreError::Repo(_))
    ));
    let mut edited = calm.clone();
    edited.notes = Some("after bath".to_string());
    assert!(store.update(edited).is_err());
    assert!(store.remove(&calm.id).is_err());

    assert_eq!(store.list(), [calm].as_slice());
    assert_eq!(notified.get(), 0);
    let stored = SqliteMoodRepository::try_new(&conn)
        .unwrap()
        .list_entries()
        .unwrap();
    assert_eq!(store.list(), stored.as_slice());
}

#[test]
fn failed_settings_writes_keep_value_and_notify_no_one() {
    let conn = open_db_in_memory().unwrap();
    let fail = Rc::new(Cell::new(true));
    let mut store = SettingsStore::load(FailingSettings {
        inner: SqliteSettingsRepository::try_new(&conn).unwrap(),
        fail: Rc::clone(&fail),
    });

    let notified = Rc::new(Cell::new(0));
    let counter = Rc::clone(&notified);
    store.subscribe(move |_| counter.set(counter.get() + 1));

    assert!(store
        .update(SettingsPatch {
            theme: Some(Theme::Dark),
            notifications_enabled: Some(false),
        })
        .is_err());
    assert!(store
        .replace(UserSettings {
            theme: Theme::Dark,
            notifications_enabled: true,
        })
        .is_err());

    assert_eq!(store.get(), &UserSettings::default());
    assert_eq!(notified.get(), 0);
    assert_eq!(
        SqliteSettingsRepository::try_new(&conn)
            .unwrap()
            .load_settings()
            .unwrap(),
        None
    );
}
