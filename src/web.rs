//! Browser implementations backed by `web-sys`.
//!
//! Available on `wasm32` with the `web` feature. [`start`] wires everything
//! for a page: `localStorage`, the `prefers-color-scheme` media query, the
//! root element and the toggle control named in [`ThemeConfig`].

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document as DomDocumentHandle, Element, MediaQueryList, MediaQueryListEvent, Storage};

use crate::auth::Navigator;
use crate::config::ThemeConfig;
use crate::document::{ControlPresentation, Document};
use crate::error::ThemeError;
use crate::manager::ThemeManager;
use crate::schedule::Clock;
use crate::signal::{ColorSchemeSignal, Listener, Listeners, Subscription};
use crate::storage::PreferenceStore;
use crate::tooltip::TooltipHost;

const DARK_QUERY: &str = "(prefers-color-scheme: dark)";

fn js_error(context: &str, value: JsValue) -> ThemeError {
    ThemeError::Browser(format!("{context}: {value:?}"))
}

fn dom() -> Result<(web_sys::Window, DomDocumentHandle), ThemeError> {
    let window = web_sys::window().ok_or_else(|| ThemeError::Browser("no window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| ThemeError::Browser("no document".into()))?;
    Ok((window, document))
}

/// Preference store on `window.localStorage`.
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// Returns `None` when storage is disabled or unavailable.
    pub fn new() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok().flatten()?;
        Some(Self { storage })
    }
}

impl PreferenceStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, ThemeError> {
        self.storage
            .get_item(key)
            .map_err(|e| js_error("localStorage.getItem", e))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ThemeError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| js_error("localStorage.setItem", e))
    }
}

/// Signal on the `prefers-color-scheme: dark` media query.
///
/// One `change` listener is registered on the query for the lifetime of the
/// signal and fans out to subscribers; it is removed on drop.
pub struct MediaQuerySignal {
    query: MediaQueryList,
    listeners: Listeners,
    on_change: Closure<dyn FnMut(MediaQueryListEvent)>,
}

impl MediaQuerySignal {
    pub fn new() -> Result<Self, ThemeError> {
        let (window, _) = dom()?;
        let query = window
            .match_media(DARK_QUERY)
            .map_err(|e| js_error("matchMedia", e))?
            .ok_or_else(|| ThemeError::Browser("matchMedia unsupported".into()))?;

        let listeners = Listeners::default();
        let fan_out = listeners.clone();
        let on_change = Closure::wrap(Box::new(move |event: MediaQueryListEvent| {
            fan_out.notify(event.matches());
        }) as Box<dyn FnMut(_)>);
        query
            .add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())
            .map_err(|e| js_error("addEventListener", e))?;

        Ok(Self {
            query,
            listeners,
            on_change,
        })
    }
}

impl Drop for MediaQuerySignal {
    fn drop(&mut self) {
        let _ = self
            .query
            .remove_event_listener_with_callback("change", self.on_change.as_ref().unchecked_ref());
    }
}

impl ColorSchemeSignal for MediaQuerySignal {
    fn prefers_dark(&self) -> bool {
        self.query.matches()
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        self.listeners.add(listener)
    }
}

/// The live page: `<html>` for the dark class, an element by id for the control.
#[derive(Debug, Clone)]
pub struct DomDocument {
    document: DomDocumentHandle,
    root: Element,
    dark_class: String,
    control_id: String,
}

impl DomDocument {
    pub fn new(config: &ThemeConfig) -> Result<Self, ThemeError> {
        let (_, document) = dom()?;
        let root = document
            .document_element()
            .ok_or_else(|| ThemeError::Browser("no root element".into()))?;
        Ok(Self {
            document,
            root,
            dark_class: config.dark_class.clone(),
            control_id: config.toggle_control_id.clone(),
        })
    }

    fn control(&self) -> Option<Element> {
        self.document.get_element_by_id(&self.control_id)
    }
}

impl Document for DomDocument {
    fn has_dark_class(&self) -> bool {
        self.root.class_list().contains(&self.dark_class)
    }

    fn set_dark_class(&mut self, dark: bool) {
        let classes = self.root.class_list();
        let result = if dark {
            classes.add_1(&self.dark_class)
        } else {
            classes.remove_1(&self.dark_class)
        };
        if let Err(err) = result {
            tracing::warn!(?err, "failed to update root class");
        }
    }

    fn update_toggle_control(&mut self, presentation: ControlPresentation) -> bool {
        let Some(control) = self.control() else {
            return false;
        };
        control.set_inner_html(presentation.icon);
        if let Err(err) = control.set_attribute("aria-label", presentation.label) {
            tracing::warn!(?err, "failed to set toggle label");
        }
        true
    }
}

/// Local hour from the JavaScript `Date`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn local_hour(&self) -> u32 {
        js_sys::Date::new_0().get_hours()
    }
}

/// Navigates by assigning `window.location.href`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationNavigator;

impl Navigator for LocationNavigator {
    fn navigate(&mut self, url: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(err) = window.location().set_href(url) {
            tracing::error!(?err, "navigation failed");
        }
    }
}

/// Tooltip host over the live DOM, attaching widgets through `factory`.
pub struct DomTooltipHost {
    document: DomDocumentHandle,
    factory: Box<dyn FnMut(&Element)>,
}

impl DomTooltipHost {
    pub fn new(factory: impl FnMut(&Element) + 'static) -> Result<Self, ThemeError> {
        let (_, document) = dom()?;
        Ok(Self {
            document,
            factory: Box::new(factory),
        })
    }
}

impl TooltipHost for DomTooltipHost {
    type Element = Element;

    fn flagged_elements(&self, attribute: &str, value: Option<&str>) -> Vec<Element> {
        let selector = match value {
            Some(value) => format!("[{attribute}=\"{value}\"]"),
            None => format!("[{attribute}]"),
        };
        let Ok(nodes) = self.document.query_selector_all(&selector) else {
            tracing::warn!(%selector, "invalid tooltip selector");
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn attach_tooltip(&mut self, element: &Element) {
        (self.factory)(element);
    }
}

/// Builds and initializes a manager for the current page, then wires the
/// toggle control's click handler.
///
/// Missing `localStorage` or `matchMedia` support degrades to running
/// without that piece.
pub fn start(config: ThemeConfig) -> Result<ThemeManager, ThemeError> {
    let mut builder = ThemeManager::builder()
        .document(DomDocument::new(&config)?)
        .clock(BrowserClock);
    match LocalStorageStore::new() {
        Some(store) => builder = builder.store(store),
        None => tracing::warn!("localStorage unavailable, theme will not persist"),
    }
    match MediaQuerySignal::new() {
        Ok(signal) => builder = builder.signal(signal),
        Err(err) => tracing::warn!(%err, "not following os color scheme"),
    }
    let control_id = config.toggle_control_id.clone();
    let manager = builder.config(config).build()?;
    manager.initialize();
    bind_toggle(&manager, &control_id)?;
    Ok(manager)
}

/// Makes clicks on the control with `control_id` toggle the theme.
///
/// The handler lives as long as the page. Does nothing if there is no such
/// control.
pub fn bind_toggle(manager: &ThemeManager, control_id: &str) -> Result<(), ThemeError> {
    let (_, document) = dom()?;
    let Some(control) = document.get_element_by_id(control_id) else {
        return Ok(());
    };
    let handle = manager.clone();
    let on_click = Closure::wrap(Box::new(move |_: web_sys::Event| {
        handle.toggle_theme();
    }) as Box<dyn FnMut(_)>);
    control
        .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
        .map_err(|e| js_error("addEventListener", e))?;
    on_click.forget();
    Ok(())
}
