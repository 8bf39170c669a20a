//! OS color-scheme signal with a subscribe/unsubscribe contract.
//!
//! A signal exposes the current "prefers dark" flag and delivers every later
//! change to its subscribers. Subscribing never replays the current state.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Callback invoked with the new "prefers dark" flag.
pub type Listener = Box<dyn FnMut(bool)>;

/// Source of the OS-level dark-mode preference.
pub trait ColorSchemeSignal {
    /// Returns the current preference.
    fn prefers_dark(&self) -> bool;

    /// Registers `listener` for future changes.
    ///
    /// The listener stays registered until the returned [`Subscription`] is
    /// dropped or [`Subscription::unsubscribe`] is called.
    fn subscribe(&self, listener: Listener) -> Subscription;
}

/// Handle for a registered listener. Dropping it unsubscribes.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Creates a subscription that runs `cancel` exactly once on unsubscribe.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

struct Entry {
    cancelled: Cell<bool>,
    listener: RefCell<Listener>,
}

/// Shared listener registry used by the signal implementations.
#[derive(Clone, Default)]
pub(crate) struct Listeners {
    entries: Rc<RefCell<Vec<Rc<Entry>>>>,
}

impl Listeners {
    pub(crate) fn add(&self, listener: Listener) -> Subscription {
        let entry = Rc::new(Entry {
            cancelled: Cell::new(false),
            listener: RefCell::new(listener),
        });
        self.entries.borrow_mut().push(Rc::clone(&entry));

        let entries: Weak<RefCell<Vec<Rc<Entry>>>> = Rc::downgrade(&self.entries);
        let entry: Weak<Entry> = Rc::downgrade(&entry);
        Subscription::new(move || {
            let Some(entry) = entry.upgrade() else {
                return;
            };
            entry.cancelled.set(true);
            if let Some(entries) = entries.upgrade() {
                // dropped after the registry borrow is released
                let removed = {
                    let mut entries = entries.borrow_mut();
                    entries
                        .iter()
                        .position(|e| Rc::ptr_eq(e, &entry))
                        .map(|i| entries.remove(i))
                };
                drop(removed);
            }
        })
    }

    /// Calls every live listener with `dark`.
    ///
    /// Dispatch runs over a snapshot, so listeners may subscribe, unsubscribe
    /// or trigger a nested notification. A listener cancelled mid-dispatch is
    /// not called again, and a listener is never re-entered by a nested
    /// notification it caused.
    pub(crate) fn notify(&self, dark: bool) {
        let snapshot: Vec<Rc<Entry>> = self.entries.borrow().clone();
        for entry in snapshot {
            if entry.cancelled.get() {
                continue;
            }
            match entry.listener.try_borrow_mut() {
                Ok(mut listener) => (*listener)(dark),
                Err(_) => tracing::trace!("listener already running, skipped"),
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners").field("len", &self.len()).finish()
    }
}

/// A signal driven by the application.
///
/// Clones share state, so one handle can be given to the manager and another
/// kept to push changes with [`ManualSignal::set`].
#[derive(Debug, Clone, Default)]
pub struct ManualSignal {
    current: Rc<Cell<bool>>,
    listeners: Listeners,
}

impl ManualSignal {
    pub fn new(prefers_dark: bool) -> Self {
        Self {
            current: Rc::new(Cell::new(prefers_dark)),
            listeners: Listeners::default(),
        }
    }

    /// Updates the preference, notifying subscribers if it changed.
    pub fn set(&self, prefers_dark: bool) {
        if self.current.replace(prefers_dark) != prefers_dark {
            self.listeners.notify(prefers_dark);
        }
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl ColorSchemeSignal for ManualSignal {
    fn prefers_dark(&self) -> bool {
        self.current.get()
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        self.listeners.add(listener)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use os::{set_os_detector, OsSignal};

#[cfg(not(target_arch = "wasm32"))]
mod os {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::{Mutex, PoisonError};

    use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};
    use once_cell::sync::Lazy;

    use super::{ColorSchemeSignal, Listener, Listeners, Subscription};

    type OsDetector = fn() -> bool;

    static OS_DETECTOR: Lazy<Mutex<OsDetector>> = Lazy::new(|| Mutex::new(dark_light_detector));

    /// Overrides how [`OsSignal`] reads the OS preference.
    ///
    /// The detector returns true when the OS prefers dark. Useful for tests or
    /// to force a particular answer.
    pub fn set_os_detector(detector: OsDetector) {
        let mut guard = OS_DETECTOR.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = detector;
    }

    fn detect_prefers_dark() -> bool {
        let detector = OS_DETECTOR.lock().unwrap_or_else(PoisonError::into_inner);
        (*detector)()
    }

    fn dark_light_detector() -> bool {
        matches!(detect_os_theme(), OsThemeMode::Dark)
    }

    /// Signal backed by the desktop's color scheme setting.
    ///
    /// Native desktops offer no portable change notification, so the owner
    /// calls [`OsSignal::poll`] from its event loop; changes seen by a poll
    /// are delivered to subscribers.
    #[derive(Debug, Clone)]
    pub struct OsSignal {
        current: Rc<Cell<bool>>,
        listeners: Listeners,
    }

    impl OsSignal {
        pub fn new() -> Self {
            Self {
                current: Rc::new(Cell::new(detect_prefers_dark())),
                listeners: Listeners::default(),
            }
        }

        /// Re-reads the OS preference. Returns true if it changed.
        pub fn poll(&self) -> bool {
            let dark = detect_prefers_dark();
            if self.current.replace(dark) == dark {
                return false;
            }
            tracing::debug!(prefers_dark = dark, "os color scheme changed");
            self.listeners.notify(dark);
            true
        }
    }

    impl Default for OsSignal {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ColorSchemeSignal for OsSignal {
        fn prefers_dark(&self) -> bool {
            self.current.get()
        }

        fn subscribe(&self, listener: Listener) -> Subscription {
            self.listeners.add(listener)
        }
    }
}
