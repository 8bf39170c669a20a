//! The document surface the theme is applied to.
//!
//! A document has a root element carrying an optional dark class and, if the
//! page provides one, a toggle control whose icon and accessible label
//! advertise the state a click would switch to.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::config::ThemeConfig;
use crate::mode::ColorMode;

/// Default class set on the root element while dark is applied.
pub const DEFAULT_DARK_CLASS: &str = "dark-mode";

/// Default element id of the toggle control.
pub const DEFAULT_TOGGLE_CONTROL_ID: &str = "theme-toggle";

/// Icon and accessible label shown on the toggle control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlPresentation {
    pub icon: &'static str,
    pub label: &'static str,
}

impl ControlPresentation {
    /// Presentation for a control while `applied` is showing.
    ///
    /// The control always points at the other mode: dark shows a sun and
    /// offers light, light shows a moon and offers dark.
    pub fn for_applied(applied: ColorMode) -> Self {
        match applied {
            ColorMode::Dark => Self {
                icon: "\u{2600}\u{fe0f}",
                label: "Switch to light mode",
            },
            ColorMode::Light => Self {
                icon: "\u{1f319}",
                label: "Switch to dark mode",
            },
        }
    }
}

/// Mutable view of the page the manager paints.
pub trait Document {
    /// Returns true if the root element currently carries the dark class.
    fn has_dark_class(&self) -> bool;

    /// Adds or removes the dark class on the root element.
    fn set_dark_class(&mut self, dark: bool);

    /// Updates the toggle control's icon and label.
    ///
    /// Returns false, without failing, if the document has no toggle control.
    fn update_toggle_control(&mut self, presentation: ControlPresentation) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ControlState {
    icon: String,
    label: String,
}

#[derive(Debug)]
struct DocumentState {
    root_classes: BTreeSet<String>,
    dark_class: String,
    control: Option<ControlState>,
}

/// Headless document held in memory.
///
/// Clones share state, so tests and native front ends can keep a handle and
/// read back what the manager applied.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    state: Rc<RefCell<DocumentState>>,
}

impl MemoryDocument {
    /// A document with a toggle control and the default dark class.
    pub fn new() -> Self {
        Self::build(DEFAULT_DARK_CLASS, true)
    }

    /// A document that has no toggle control.
    pub fn without_control() -> Self {
        Self::build(DEFAULT_DARK_CLASS, false)
    }

    /// A document with a toggle control, using the configured dark class.
    pub fn from_config(config: &ThemeConfig) -> Self {
        Self::new().with_dark_class(&config.dark_class)
    }

    /// Uses `class` as the dark class instead of the default.
    pub fn with_dark_class(self, class: &str) -> Self {
        self.state.borrow_mut().dark_class = class.to_string();
        self
    }

    fn build(dark_class: &str, with_control: bool) -> Self {
        Self {
            state: Rc::new(RefCell::new(DocumentState {
                root_classes: BTreeSet::new(),
                dark_class: dark_class.to_string(),
                control: with_control.then(ControlState::default),
            })),
        }
    }

    /// Returns true if the root element carries `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.state.borrow().root_classes.contains(class)
    }

    /// Adds an unrelated class to the root element.
    pub fn add_class(&self, class: &str) {
        self.state.borrow_mut().root_classes.insert(class.to_string());
    }

    /// Current icon of the toggle control, if there is one.
    pub fn control_icon(&self) -> Option<String> {
        self.state.borrow().control.as_ref().map(|c| c.icon.clone())
    }

    /// Current accessible label of the toggle control, if there is one.
    pub fn control_label(&self) -> Option<String> {
        self.state.borrow().control.as_ref().map(|c| c.label.clone())
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Document for MemoryDocument {
    fn has_dark_class(&self) -> bool {
        let state = self.state.borrow();
        state.root_classes.contains(&state.dark_class)
    }

    fn set_dark_class(&mut self, dark: bool) {
        let mut state = self.state.borrow_mut();
        let class = state.dark_class.clone();
        if dark {
            state.root_classes.insert(class);
        } else {
            state.root_classes.remove(&class);
        }
    }

    fn update_toggle_control(&mut self, presentation: ControlPresentation) -> bool {
        match self.state.borrow_mut().control.as_mut() {
            Some(control) => {
                control.icon = presentation.icon.to_string();
                control.label = presentation.label.to_string();
                true
            }
            None => false,
        }
    }
}
