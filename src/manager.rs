//! The theme manager: stored preference in, painted document out.
//!
//! [`ThemeManager`] is built once per session with [`ThemeManager::builder`]
//! and activated with [`ThemeManager::initialize`]. Construction has no side
//! effects; activation reads the stored preference, paints the document and
//! subscribes to the OS color scheme signal.
//!
//! # Resolution
//!
//! | stored mode | at startup                 | on OS signal change |
//! |-------------|----------------------------|---------------------|
//! | `light`     | light                      | ignored             |
//! | `dark`      | dark                       | ignored             |
//! | `system`    | time of day ([`DarkHours`])| follows the signal  |
//!
//! # Toggling
//!
//! [`ThemeManager::toggle_theme`] flips what the document currently shows,
//! not the stored mode. In system mode the visible state may come from the
//! clock or the OS, and a click always inverts what the user sees. The new
//! literal mode is persisted, so toggling leaves system mode for good.
//!
//! # Example
//!
//! ```rust
//! use nightshift::{FixedClock, ManualSignal, MemoryDocument, MemoryStore, ThemeManager};
//!
//! let document = MemoryDocument::new();
//! let manager = ThemeManager::builder()
//!     .store(MemoryStore::with_entry("theme", "dark"))
//!     .signal(ManualSignal::new(false))
//!     .document(document.clone())
//!     .clock(FixedClock(12))
//!     .build()
//!     .unwrap();
//!
//! manager.initialize();
//! assert!(document.has_class("dark-mode"));
//! assert_eq!(document.control_label().as_deref(), Some("Switch to light mode"));
//! ```
//!
//! [`DarkHours`]: crate::DarkHours

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::config::ThemeConfig;
use crate::document::{ControlPresentation, Document};
use crate::error::ThemeError;
use crate::mode::{ColorMode, ThemeMode};
use crate::schedule::{Clock, SystemClock};
use crate::signal::{ColorSchemeSignal, Subscription};
use crate::storage::PreferenceStore;

struct ManagerState {
    config: ThemeConfig,
    mode: ThemeMode,
    resolved: ColorMode,
    initialized: bool,
    store: Option<Box<dyn PreferenceStore>>,
    signal: Option<Box<dyn ColorSchemeSignal>>,
    document: Box<dyn Document>,
    clock: Box<dyn Clock>,
    subscription: Option<Subscription>,
}

impl ManagerState {
    fn stored_mode(&self) -> ThemeMode {
        let default = self.config.default_mode;
        let Some(store) = self.store.as_ref() else {
            return default;
        };
        match store.get(&self.config.storage_key) {
            Ok(Some(raw)) => raw.parse::<ThemeMode>().unwrap_or_else(|err| {
                tracing::warn!(%err, "ignoring stored theme preference");
                default
            }),
            Ok(None) => default,
            Err(err) => {
                tracing::warn!(%err, "theme preference unavailable, using default");
                default
            }
        }
    }

    fn persist(&mut self, mode: ThemeMode) {
        let key = self.config.storage_key.as_str();
        if let Some(store) = self.store.as_mut() {
            if let Err(err) = store.set(key, mode.as_str()) {
                tracing::warn!(%err, %mode, "failed to persist theme preference");
            }
        }
    }

    fn apply(&mut self, resolved: ColorMode) {
        self.document.set_dark_class(resolved.is_dark());
        if !self
            .document
            .update_toggle_control(ControlPresentation::for_applied(resolved))
        {
            tracing::trace!("no toggle control to update");
        }
        self.resolved = resolved;
    }
}

/// Owns the theme preference for one session and keeps the document in sync.
///
/// Cloning is cheap and yields another handle to the same manager, which is
/// how click handlers and other callers share it. The OS signal listener
/// holds only a weak reference, so dropping the last handle ends the
/// subscription.
#[derive(Clone)]
pub struct ThemeManager {
    state: Rc<RefCell<ManagerState>>,
}

impl ThemeManager {
    pub fn builder() -> ThemeManagerBuilder {
        ThemeManagerBuilder::new()
    }

    /// Activates the manager and returns the resolved color mode.
    ///
    /// Reads the stored mode (falling back to the configured default),
    /// applies it, subscribes to the OS signal and, in system mode, resolves
    /// the initial appearance from the local hour. Calling it again is a
    /// no-op that returns the current appearance.
    pub fn initialize(&self) -> ColorMode {
        let mut state = self.state.borrow_mut();
        if state.initialized {
            return state.resolved;
        }

        let mode = state.stored_mode();
        state.mode = mode;
        let resolved = match mode.literal() {
            Some(literal) => literal,
            None => {
                let hour = state.clock.local_hour();
                let resolved = state.config.dark_hours.resolve(hour);
                tracing::debug!(hour, %resolved, "resolved system theme from time of day");
                resolved
            }
        };
        state.apply(resolved);

        let weak = Rc::downgrade(&self.state);
        let subscription = state.signal.as_ref().map(|signal| {
            signal.subscribe(Box::new(move |prefers_dark| {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                let Ok(mut state) = shared.try_borrow_mut() else {
                    tracing::warn!("theme manager busy, dropping color scheme change");
                    return;
                };
                if state.mode.is_system() {
                    let resolved = ColorMode::from_dark(prefers_dark);
                    tracing::debug!(%resolved, "following os color scheme");
                    state.apply(resolved);
                }
            }))
        });
        state.subscription = subscription;
        state.initialized = true;
        tracing::debug!(%mode, %resolved, "theme manager initialized");
        resolved
    }

    /// Paints `resolved` onto the document without persisting anything.
    pub fn apply_theme(&self, resolved: ColorMode) {
        self.state.borrow_mut().apply(resolved);
    }

    /// Inverts the appearance the document currently shows.
    ///
    /// The new literal mode becomes the stored preference. Returns the color
    /// mode now applied.
    pub fn toggle_theme(&self) -> ColorMode {
        let mut state = self.state.borrow_mut();
        let next = ColorMode::from_dark(!state.document.has_dark_class());
        let mode = ThemeMode::from(next);
        state.mode = mode;
        state.persist(mode);
        state.apply(next);
        tracing::debug!(%mode, "theme toggled");
        next
    }

    /// The current preference mode.
    pub fn mode(&self) -> ThemeMode {
        self.state.borrow().mode
    }

    /// The color mode last applied to the document.
    pub fn resolved(&self) -> ColorMode {
        self.state.borrow().resolved
    }

    pub fn is_initialized(&self) -> bool {
        self.state.borrow().initialized
    }

    /// Stops following the OS color scheme signal.
    pub fn shutdown(&self) {
        let subscription = self.state.borrow_mut().subscription.take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
    }
}

impl fmt::Debug for ThemeManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state.try_borrow() {
            Ok(state) => f
                .debug_struct("ThemeManager")
                .field("mode", &state.mode)
                .field("resolved", &state.resolved)
                .field("initialized", &state.initialized)
                .field("has_store", &state.store.is_some())
                .field("subscribed", &state.subscription.is_some())
                .finish(),
            Err(_) => f.write_str("ThemeManager { <busy> }"),
        }
    }
}

/// Builder for [`ThemeManager`].
///
/// Only the document is required. Without a store the preference is neither
/// read nor persisted; without a signal OS changes are not followed; the
/// clock defaults to [`SystemClock`].
#[derive(Default)]
pub struct ThemeManagerBuilder {
    config: Option<ThemeConfig>,
    store: Option<Box<dyn PreferenceStore>>,
    signal: Option<Box<dyn ColorSchemeSignal>>,
    document: Option<Box<dyn Document>>,
    clock: Option<Box<dyn Clock>>,
}

impl ThemeManagerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the storage key, default mode and dark hours.
    ///
    /// `dark_class` and `toggle_control_id` describe the document and only
    /// take effect on documents built from the same config, such as
    /// [`MemoryDocument::from_config`](crate::MemoryDocument::from_config).
    pub fn config(mut self, config: ThemeConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn store(mut self, store: impl PreferenceStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn signal(mut self, signal: impl ColorSchemeSignal + 'static) -> Self {
        self.signal = Some(Box::new(signal));
        self
    }

    pub fn document(mut self, document: impl Document + 'static) -> Self {
        self.document = Some(Box::new(document));
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Builds the manager without touching the document.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::MissingDocument`] if no document was given, or
    /// [`ThemeError::InvalidConfig`] if the config does not validate.
    pub fn build(self) -> Result<ThemeManager, ThemeError> {
        let document = self.document.ok_or(ThemeError::MissingDocument)?;
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let resolved = ColorMode::from_dark(document.has_dark_class());
        let state = ManagerState {
            mode: config.default_mode,
            config,
            resolved,
            initialized: false,
            store: self.store,
            signal: self.signal,
            document,
            clock: self.clock.unwrap_or_else(|| Box::new(SystemClock)),
            subscription: None,
        };
        Ok(ThemeManager {
            state: Rc::new(RefCell::new(state)),
        })
    }
}

impl fmt::Debug for ThemeManagerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeManagerBuilder")
            .field("config", &self.config)
            .field("store", &self.store.is_some())
            .field("signal", &self.signal.is_some())
            .field("document", &self.document.is_some())
            .field("clock", &self.clock.is_some())
            .finish()
    }
}
