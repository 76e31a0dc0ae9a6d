/// PDF download trigger: a click navigates to the trigger's `data-url`

use crate::dom::{Document, NodeId};
use crate::EnhancerConfig;
use log::debug;
use std::sync::Arc;

/// Click listener: returns the navigation target, if the click navigates.
pub type ClickHandler = Arc<dyn Fn(&Document, NodeId) -> Option<String> + Send + Sync>;

/// Locate the download trigger; `None` means no listener should be attached.
pub fn find_trigger(doc: &Document, config: &EnhancerConfig) -> Option<NodeId> {
    let trigger = doc.get_element_by_id(&config.download_trigger_id);
    if trigger.is_none() {
        debug!("no #{} on page; download trigger not wired", config.download_trigger_id);
    }
    trigger
}

/// Listener that reads `data-url` at click time.
///
/// A missing or empty `data-url` makes the click a no-op.
pub fn navigate_to_data_url() -> ClickHandler {
    Arc::new(|doc: &Document, trigger: NodeId| {
        doc.dataset(trigger, "url")
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_reads_current_url() {
        let mut doc = Document::parse(r#"<button id="download-pdf-btn" data-url="/report.pdf">PDF</button>"#);
        let trigger = find_trigger(&doc, &EnhancerConfig::default()).unwrap();
        let handler = navigate_to_data_url();
        assert_eq!(handler(&doc, trigger).as_deref(), Some("/report.pdf"));

        doc.set_attr(trigger, "data-url", "/other.pdf");
        assert_eq!(handler(&doc, trigger).as_deref(), Some("/other.pdf"));

        doc.set_attr(trigger, "data-url", "");
        assert_eq!(handler(&doc, trigger), None);
    }

    #[test]
    fn missing_trigger_is_not_found() {
        let doc = Document::parse("<button>PDF</button>");
        assert!(find_trigger(&doc, &EnhancerConfig::default()).is_none());
    }
}
