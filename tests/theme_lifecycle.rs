//! End-to-end tests of a theme manager across sessions.
//!
//! Each "session" builds a fresh manager over the same preference file, the
//! way a page reload would.

use nightshift::{
    set_os_detector, ColorMode, FileStore, FixedClock, ManualSignal, MemoryDocument, OsSignal,
    PreferenceStore, ThemeConfig, ThemeError, ThemeManager, ThemeMode,
};
use serial_test::serial;
use tempfile::TempDir;

fn session(store: &FileStore, hour: u32) -> (ThemeManager, MemoryDocument, ManualSignal) {
    let document = MemoryDocument::new();
    let signal = ManualSignal::new(false);
    let manager = ThemeManager::builder()
        .store(store.clone())
        .signal(signal.clone())
        .document(document.clone())
        .clock(FixedClock(hour))
        .build()
        .unwrap();
    (manager, document, signal)
}

#[test]
fn test_stored_dark_paints_dark_with_light_control() {
    let dir = TempDir::new().unwrap();
    let mut store = FileStore::new(dir.path().join("prefs.json"));
    store.set("theme", "dark").unwrap();

    let (manager, document, _signal) = session(&store, 12);
    manager.initialize();

    assert!(document.has_class("dark-mode"));
    assert_eq!(document.control_icon().as_deref(), Some("☀️"));
    assert_eq!(
        document.control_label().as_deref(),
        Some("Switch to light mode")
    );
}

#[test]
fn test_toggle_survives_reload() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path().join("prefs.json"));

    let (first, _, _) = session(&store, 12);
    assert_eq!(first.initialize(), ColorMode::Light);
    assert_eq!(first.toggle_theme(), ColorMode::Dark);
    drop(first);

    let (second, document, _) = session(&store, 12);
    assert_eq!(second.initialize(), ColorMode::Dark);
    assert_eq!(second.mode(), ThemeMode::Dark);
    assert!(document.has_class("dark-mode"));

    second.toggle_theme();
    second.toggle_theme();
    drop(second);

    let (third, _, _) = session(&store, 12);
    assert_eq!(third.initialize(), ColorMode::Dark);
}

#[test]
fn test_system_mode_across_the_day() {
    let dir = TempDir::new().unwrap();
    let mut store = FileStore::new(dir.path().join("prefs.json"));
    store.set("theme", "system").unwrap();

    let (evening, _, _) = session(&store, 18);
    assert_eq!(evening.initialize(), ColorMode::Dark);

    let (afternoon, document, signal) = session(&store, 17);
    assert_eq!(afternoon.initialize(), ColorMode::Light);

    signal.set(true);
    assert!(document.has_class("dark-mode"));
    assert_eq!(afternoon.mode(), ThemeMode::System);

    // Following the OS never rewrites the stored preference.
    assert_eq!(store.get("theme").unwrap().as_deref(), Some("system"));
}

#[test]
fn test_corrupt_store_degrades_to_default() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prefs.json");
    std::fs::write(&path, "{ not json").unwrap();
    let store = FileStore::new(&path);

    let (manager, document, _) = session(&store, 22);
    assert_eq!(manager.initialize(), ColorMode::Light);
    assert!(!document.has_class("dark-mode"));

    // The toggle replaces the corrupt file with a readable one.
    assert_eq!(manager.toggle_theme(), ColorMode::Dark);
    assert!(document.has_class("dark-mode"));
    assert_eq!(
        FileStore::new(&path).get("theme").unwrap().as_deref(),
        Some("dark")
    );

    let (reloaded, document, _) = session(&store, 12);
    assert_eq!(reloaded.initialize(), ColorMode::Dark);
    assert_eq!(reloaded.mode(), ThemeMode::Dark);
    assert!(document.has_class("dark-mode"));
}

#[test]
fn test_config_from_yaml_drives_manager() {
    let config = ThemeConfig::from_yaml_str(
        "storage_key: site-theme\ndark_class: night\ndark_hours: { start: 20, end: 8 }\n",
    )
    .unwrap();
    let dir = TempDir::new().unwrap();
    let mut store = FileStore::new(dir.path().join("prefs.json"));
    store.set("site-theme", "system").unwrap();

    let document = MemoryDocument::new().with_dark_class(&config.dark_class);
    let manager = ThemeManager::builder()
        .store(store.clone())
        .document(document.clone())
        .config(config)
        .clock(FixedClock(19))
        .build()
        .unwrap();

    assert_eq!(manager.initialize(), ColorMode::Light);
    assert_eq!(manager.toggle_theme(), ColorMode::Dark);
    assert!(document.has_class("night"));
    assert_eq!(store.get("site-theme").unwrap().as_deref(), Some("dark"));
}

#[test]
fn test_missing_document_is_an_error() {
    let result = ThemeManager::builder().clock(FixedClock(1)).build();
    assert!(matches!(result, Err(ThemeError::MissingDocument)));
}

#[test]
#[serial]
fn test_os_signal_drives_system_mode() {
    set_os_detector(|| false);
    let os = OsSignal::new();
    let document = MemoryDocument::new();
    let dir = TempDir::new().unwrap();
    let mut store = FileStore::new(dir.path().join("prefs.json"));
    store.set("theme", "system").unwrap();

    let manager = ThemeManager::builder()
        .store(store)
        .signal(os.clone())
        .document(document.clone())
        .clock(FixedClock(10))
        .build()
        .unwrap();
    manager.initialize();
    assert!(!document.has_class("dark-mode"));

    set_os_detector(|| true);
    assert!(os.poll());
    assert!(document.has_class("dark-mode"));

    manager.shutdown();
    set_os_detector(|| false);
    assert!(os.poll());
    assert!(document.has_class("dark-mode"));
}
