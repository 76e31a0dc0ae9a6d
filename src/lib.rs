//! RFox Page Enhancer
//!
//! Headless page-ready enhancement for server-rendered report pages. A page
//! is parsed into an in-memory [`dom::Document`], the page-ready tasks run
//! once against it, and the enhanced document is serialized back to HTML.
//!
//! # Tasks
//!
//! - **Score bars**: `.score-fill[data-value]` gets `width: V%` and text `V%`
//! - **PDF download**: `#download-pdf-btn` navigates to its `data-url` on click
//! - **Inline images**: `img[data-base64]` gets a `data:image/png;base64,` source
//! - **Material chart**: `#materialChart` JSON attributes become a grouped bar
//!   chart config handed to an injected [`ChartRenderer`]
//!
//! # Example
//!
//! ```
//! use rfenhance::{EnhancerConfig, Page, RecordingChartRenderer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let html = r#"<div class="score-fill" data-value="72"></div>
//!     <button id="download-pdf-btn" data-url="/download_pdf">PDF</button>"#;
//!
//! let mut page = Page::from_html(html, Some("http://localhost:5000/recommendation"), EnhancerConfig::default())?;
//! let charts = RecordingChartRenderer::new();
//! let report = page.on_ready(&charts)?;
//! assert_eq!(report.scores_filled, 1);
//!
//! page.click("#download-pdf-btn")?;
//! assert_eq!(page.location(), Some("http://localhost:5000/download_pdf"));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod dom;
pub use dom::{Document, ElementHandle, NodeId};

pub mod enhance;
pub use enhance::chart::{
    ChartConfig, ChartOutcome, ChartRenderer, EmbeddedConfigRenderer, NoopChartRenderer,
    RecordingChartRenderer, RenderedChart,
};

pub mod page;
pub use page::{EnhancementReport, Navigation, Page};

// Async facade over a worker-owned page
pub mod async_api;
pub use async_api::Enhancer;

/// Configuration for the page enhancer
///
/// The defaults match the markup produced by the recommendation templates.
/// Hardening switches (`clamp_scores`, `lenient_chart_json`) are off by
/// default so unvalidated input passes through unchanged.
///
/// # Examples
///
/// ```
/// let cfg = rfenhance::EnhancerConfig::default();
/// assert_eq!(cfg.chart_host_id, "materialChart");
/// assert!(!cfg.clamp_scores);
/// ```
#[derive(Debug, Clone)]
pub struct EnhancerConfig {
    /// Selector for score bar elements
    pub score_selector: String,
    /// Id of the PDF download trigger
    pub download_trigger_id: String,
    /// Selector for images carrying a base64 payload
    pub image_selector: String,
    /// Id of the chart host element
    pub chart_host_id: String,
    /// MIME type used when building image data URIs
    pub image_mime: String,
    /// Clamp numeric score values into [0, 100]
    pub clamp_scores: bool,
    /// Treat malformed chart JSON as an empty series instead of failing
    pub lenient_chart_json: bool,
    /// Title shown above the material chart
    pub chart_title: String,
    /// User agent string sent by `Page::load_url`
    pub user_agent: String,
    /// Timeout for `Page::load_url` in milliseconds
    pub timeout_ms: u64,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            score_selector: ".score-fill".to_string(),
            download_trigger_id: "download-pdf-btn".to_string(),
            image_selector: "img[data-base64]".to_string(),
            chart_host_id: "materialChart".to_string(),
            image_mime: "image/png".to_string(),
            clamp_scores: false,
            lenient_chart_json: false,
            chart_title: "Multi-material Comparison".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/115.0 RFOX/0.3".to_string(),
            timeout_ms: 30000,
        }
    }
}

impl EnhancerConfig {
    /// Check that selectors parse and ids are usable
    pub fn validate(&self) -> Result<()> {
        for (field, selector) in [
            ("score_selector", &self.score_selector),
            ("image_selector", &self.image_selector),
        ] {
            if selector.trim().is_empty() {
                return Err(Error::ConfigError(format!("{} is empty", field)));
            }
            dom::parse_selector(selector)?;
        }

        for (field, id) in [
            ("download_trigger_id", &self.download_trigger_id),
            ("chart_host_id", &self.chart_host_id),
        ] {
            if id.is_empty() || id.chars().any(char::is_whitespace) {
                return Err(Error::ConfigError(format!("{} `{}` is not a valid id", field, id)));
            }
        }

        if self.image_mime.trim().is_empty() {
            return Err(Error::ConfigError("image_mime is empty".into()));
        }
        Ok(())
    }
}

/// A textual snapshot of an enhanced page
#[derive(Debug, Clone)]
pub struct TextSnapshot {
    /// Page title
    pub title: String,
    /// Extracted body text, including text written by the enhancer
    pub text: String,
    /// Current location (after any navigation)
    pub url: String,
}

/// Parse `html`, run the page-ready tasks once and return the enhanced markup.
pub fn enhance_html(html: &str, config: EnhancerConfig, renderer: &dyn ChartRenderer) -> Result<String> {
    let mut page = Page::from_html(html, None, config)?;
    page.on_ready(renderer)?;
    Ok(page.html())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EnhancerConfig::default();
        assert_eq!(config.score_selector, ".score-fill");
        assert_eq!(config.download_trigger_id, "download-pdf-btn");
        assert_eq!(config.image_mime, "image/png");
        assert!(!config.lenient_chart_json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_selector() {
        let config = EnhancerConfig {
            score_selector: "div[".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::SelectorError { .. })));

        let config = EnhancerConfig {
            chart_host_id: "material chart".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_enhance_html_fills_scores() {
        let out = enhance_html(
            r#"<div class="score-fill" data-value="40"></div>"#,
            EnhancerConfig::default(),
            &NoopChartRenderer,
        )
        .unwrap();
        assert!(out.contains(r#"style="width: 40%;""#));
        assert!(out.contains(">40%</div>"));
    }
}
