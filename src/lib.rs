//! # Nightshift - light/dark theme preference management
//!
//! Nightshift keeps a page (or any surface with a "dark" switch) in sync with
//! the user's theme preference:
//!
//! - the preference is one of `light`, `dark` or `system` and is persisted
//!   in a key-value store
//! - `system` follows the OS color scheme, starting from a time-of-day guess
//! - a toggle control flips what is shown and pins the preference
//!
//! ## Quick start
//!
//! ```rust
//! use nightshift::{
//!     ColorMode, FixedClock, ManualSignal, MemoryDocument, MemoryStore, ThemeManager,
//! };
//!
//! let store = MemoryStore::with_entry("theme", "system");
//! let os = ManualSignal::new(false);
//! let document = MemoryDocument::new();
//!
//! let manager = ThemeManager::builder()
//!     .store(store.clone())
//!     .signal(os.clone())
//!     .document(document.clone())
//!     .clock(FixedClock(21))
//!     .build()
//!     .unwrap();
//!
//! // 21:00 in system mode starts out dark.
//! assert_eq!(manager.initialize(), ColorMode::Dark);
//!
//! // System mode follows the OS from then on.
//! os.set(true);
//! os.set(false);
//! assert!(!document.has_class("dark-mode"));
//!
//! // A click pins the preference.
//! manager.toggle_theme();
//! assert_eq!(store.value("theme").as_deref(), Some("dark"));
//! ```
//!
//! ## Surfaces
//!
//! The manager talks to the outside world through small traits:
//!
//! - [`PreferenceStore`]: [`MemoryStore`], [`FileStore`], and `localStorage`
//!   under the `web` feature
//! - [`ColorSchemeSignal`]: [`ManualSignal`], [`OsSignal`] (native), and the
//!   `prefers-color-scheme` media query under `web`
//! - [`Document`]: [`MemoryDocument`], and the live DOM under `web`
//! - [`Clock`]: [`SystemClock`], [`FixedClock`]
//!
//! The [`auth`] and [`tooltip`] modules cover the two page-load collaborators
//! that sit next to the theme switcher: the popup sign-in redirect and
//! tooltip attachment.

pub mod auth;
mod config;
mod document;
mod error;
mod manager;
mod mode;
mod schedule;
mod signal;
mod storage;
pub mod tooltip;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub mod web;

pub use config::{ThemeConfig, DEFAULT_STORAGE_KEY};
pub use document::{
    ControlPresentation, Document, MemoryDocument, DEFAULT_DARK_CLASS, DEFAULT_TOGGLE_CONTROL_ID,
};
pub use error::ThemeError;
pub use manager::{ThemeManager, ThemeManagerBuilder};
pub use mode::{ColorMode, ThemeMode};
pub use schedule::{Clock, DarkHours, FixedClock, SystemClock};
#[cfg(not(target_arch = "wasm32"))]
pub use signal::{set_os_detector, OsSignal};
pub use signal::{ColorSchemeSignal, Listener, ManualSignal, Subscription};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStore;
pub use storage::{MemoryStore, PreferenceStore};
