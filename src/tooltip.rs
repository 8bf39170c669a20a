//! Tooltip boundary: attach a tooltip widget to every flagged element.

use crate::config::ThemeConfig;

/// A page that can list flagged elements and attach tooltip widgets to them.
pub trait TooltipHost {
    type Element;

    /// Elements carrying `attribute`, optionally with exactly `value`.
    fn flagged_elements(&self, attribute: &str, value: Option<&str>) -> Vec<Self::Element>;

    /// Instantiates one tooltip widget for `element`.
    fn attach_tooltip(&mut self, element: &Self::Element);
}

/// Attaches a tooltip to each element flagged per `config.tooltip_attribute`.
///
/// Returns the number of tooltips attached.
pub fn init_tooltips<H: TooltipHost>(host: &mut H, config: &ThemeConfig) -> usize {
    let (attribute, value) = config.tooltip_selector();
    let elements = host.flagged_elements(attribute, value);
    for element in &elements {
        host.attach_tooltip(element);
    }
    tracing::debug!(count = elements.len(), "tooltips initialized");
    elements.len()
}
