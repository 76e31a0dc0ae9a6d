//! Page lifecycle: load, page-ready enhancement, clicks and navigation.

use crate::dom::{Document, NodeId};
use crate::enhance::{chart, download, image, score_bar, ChartOutcome, ChartRenderer, ClickHandler};
use crate::{EnhancerConfig, Error, Result, TextSnapshot};
use log::{debug, error, info};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

#[cfg(feature = "fetch")]
use reqwest::blocking::Client;
#[cfg(feature = "fetch")]
use std::time::Duration;

type OnNavigateHandler = Arc<dyn Fn(&Navigation) + Send + Sync>;

/// A navigation performed by a click listener
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    /// Target exactly as read from the page
    pub target: String,
    /// Target resolved against the page URL (equal to `target` without a base)
    pub resolved: String,
}

/// Summary of one `on_ready` run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnhancementReport {
    pub scores_filled: usize,
    pub scores_skipped: usize,
    pub images_embedded: usize,
    pub download_trigger_wired: bool,
    pub chart: ChartOutcome,
}

/// A loaded page and its enhancement state
pub struct Page {
    document: Document,
    config: EnhancerConfig,
    base_url: Option<url::Url>,
    location: Option<String>,
    listeners: HashMap<NodeId, Vec<ClickHandler>>,
    navigations: Vec<Navigation>,
    on_navigate: Option<OnNavigateHandler>,
    // Set once `on_ready` has run; later calls return it unchanged
    report: Option<EnhancementReport>,
}

impl Page {
    /// Parse `html` as a page served from `base_url`.
    pub fn from_html(html: &str, base_url: Option<&str>, config: EnhancerConfig) -> Result<Self> {
        config.validate()?;
        let base_url = match base_url {
            Some(raw) => Some(
                url::Url::parse(raw)
                    .map_err(|e| Error::LoadError(format!("Invalid base URL {}: {}", raw, e)))?,
            ),
            None => None,
        };

        Ok(Self {
            document: Document::parse(html),
            config,
            location: base_url.as_ref().map(|u| u.to_string()),
            base_url,
            listeners: HashMap::new(),
            navigations: Vec::new(),
            on_navigate: None,
            report: None,
        })
    }

    /// Fetch a page over HTTP and parse it; the URL becomes the base URL.
    #[cfg(feature = "fetch")]
    pub fn load_url(url: &str, config: EnhancerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::LoadError(format!("Failed to build HTTP client: {}", e)))?;

        let resp = client
            .get(url)
            .header("User-Agent", config.user_agent.clone())
            .send()
            .map_err(|e| Error::LoadError(format!("Failed to fetch {}: {}", url, e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::LoadError(format!("{} returned {}", url, status)));
        }

        let body = resp.text()?;
        debug!("loaded {} ({} bytes)", url, body.len());
        Self::from_html(&body, Some(url), config)
    }

    /// Run the page-ready tasks once.
    ///
    /// Scores, the download trigger and images are applied before the chart
    /// task runs, so a chart failure leaves them in place; the failure is
    /// recorded in the report and returned. Later calls return the first
    /// report without touching the document.
    pub fn on_ready(&mut self, renderer: &dyn ChartRenderer) -> Result<EnhancementReport> {
        if let Some(report) = &self.report {
            debug!("on_ready already ran; skipping");
            return Ok(report.clone());
        }

        let mut report = EnhancementReport::default();

        let scores = score_bar::fill_score_bars(&mut self.document, &self.config)?;
        report.scores_filled = scores.filled;
        report.scores_skipped = scores.skipped;

        if let Some(trigger) = download::find_trigger(&self.document, &self.config) {
            self.add_click_listener(trigger, download::navigate_to_data_url());
            report.download_trigger_wired = true;
        }

        report.images_embedded = image::embed_images(&mut self.document, &self.config)?;

        let chart = chart::render_chart(&mut self.document, &self.config, renderer);
        match chart {
            Ok(outcome) => {
                report.chart = outcome;
                self.report = Some(report.clone());
                Ok(report)
            }
            Err(e) => {
                error!("chart task failed: {}", e);
                report.chart = ChartOutcome::Failed {
                    message: e.to_string(),
                };
                self.report = Some(report);
                Err(e)
            }
        }
    }

    /// Report of the completed `on_ready` run, if any
    pub fn report(&self) -> Option<&EnhancementReport> {
        self.report.as_ref()
    }

    /// Attach a click listener to an element.
    pub fn add_click_listener(&mut self, target: NodeId, handler: ClickHandler) {
        self.listeners.entry(target).or_default().push(handler);
    }

    /// Click the first element matching `selector`.
    ///
    /// The click bubbles: listeners on the target run first, then those on
    /// each ancestor, each in registration order. Every listener receives the
    /// element it was attached to. The last navigation requested is returned.
    /// Elements without listeners accept the click silently.
    pub fn click(&mut self, selector: &str) -> Result<Option<Navigation>> {
        let target = self
            .document
            .select_first(selector)?
            .ok_or_else(|| Error::ElementNotFound(selector.to_string()))?;

        let mut last = None;
        for current in self.document.event_path(target) {
            let handlers = self.listeners.get(&current).cloned().unwrap_or_default();
            for handler in handlers {
                if let Some(dest) = handler(&self.document, current) {
                    last = Some(self.navigate(&dest)?);
                }
            }
        }
        Ok(last)
    }

    /// Navigate the page to `target`, resolved against the base URL.
    pub fn navigate(&mut self, target: &str) -> Result<Navigation> {
        let resolved = match &self.base_url {
            Some(base) => base
                .join(target)
                .map_err(|e| Error::NavigationError(format!("Cannot resolve {}: {}", target, e)))?
                .to_string(),
            None => target.to_string(),
        };

        let nav = Navigation {
            target: target.to_string(),
            resolved,
        };
        info!("navigating to {}", nav.resolved);
        self.location = Some(nav.resolved.clone());
        self.navigations.push(nav.clone());
        if let Some(cb) = &self.on_navigate {
            cb(&nav);
        }
        Ok(nav)
    }

    /// Register a callback invoked after every navigation.
    pub fn on_navigate<F>(&mut self, cb: F)
    where
        F: Fn(&Navigation) + Send + Sync + 'static,
    {
        self.on_navigate = Some(Arc::new(cb));
    }

    /// Current URL: the last navigation, else the base URL.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn navigations(&self) -> &[Navigation] {
        &self.navigations
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Serialized document with all enhancements applied
    pub fn html(&self) -> String {
        self.document.to_html()
    }

    pub fn text_snapshot(&self) -> TextSnapshot {
        TextSnapshot {
            title: self.document.title(),
            text: self.document.body_text(),
            url: self.location.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NoopChartRenderer, RecordingChartRenderer};
    use std::sync::Mutex;

    const REPORT_PAGE: &str = r#"<html><head><title>Recommendation</title></head><body>
        <div class="score-fill" data-value="91"></div>
        <button id="download-pdf-btn" data-url="/download_pdf">Download PDF</button>
        <div class="chart-container"><img data-base64="iVBORw0KGgo="></div>
        <canvas id="materialChart" data-labels='["Low-E Glass"]' data-suitability='[91]'></canvas>
    </body></html>"#;

    #[test]
    fn on_ready_runs_every_task_once() {
        let mut page = Page::from_html(REPORT_PAGE, None, EnhancerConfig::default()).unwrap();
        let charts = RecordingChartRenderer::new();
        let report = page.on_ready(&charts).unwrap();
        assert_eq!(report.scores_filled, 1);
        assert_eq!(report.images_embedded, 1);
        assert!(report.download_trigger_wired);
        assert_eq!(report.chart, ChartOutcome::Rendered { series: 3, labels: 1 });

        let again = page.on_ready(&charts).unwrap();
        assert_eq!(again, report);
        assert_eq!(charts.charts().len(), 1);
        assert_eq!(page.report(), Some(&report));
    }

    #[test]
    fn click_navigates_relative_to_base() {
        let mut page = Page::from_html(
            REPORT_PAGE,
            Some("http://127.0.0.1:5000/recommendation?floor_count=3"),
            EnhancerConfig::default(),
        )
        .unwrap();
        page.on_ready(&NoopChartRenderer).unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_cb = seen.clone();
        page.on_navigate(move |nav| seen_cb.lock().unwrap().push(nav.resolved.clone()));

        let nav = page.click("#download-pdf-btn").unwrap().unwrap();
        assert_eq!(nav.target, "/download_pdf");
        assert_eq!(nav.resolved, "http://127.0.0.1:5000/download_pdf");
        assert_eq!(page.location(), Some("http://127.0.0.1:5000/download_pdf"));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn click_without_listener_or_url_does_not_navigate() {
        let html = r#"<button id="download-pdf-btn">PDF</button><p id="p">x</p>"#;
        let mut page = Page::from_html(html, None, EnhancerConfig::default()).unwrap();

        // Before on_ready no listener is attached
        assert_eq!(page.click("#download-pdf-btn").unwrap(), None);

        page.on_ready(&NoopChartRenderer).unwrap();
        assert_eq!(page.click("#download-pdf-btn").unwrap(), None);
        assert_eq!(page.click("#p").unwrap(), None);
        assert!(page.navigations().is_empty());
        assert_eq!(page.location(), None);
        assert!(matches!(page.click("#absent"), Err(Error::ElementNotFound(_))));
    }

    #[test]
    fn click_on_trigger_child_bubbles_to_trigger() {
        let html = r#"<button id="download-pdf-btn" data-url="/report.pdf"><span class="label">Download PDF</span></button>"#;
        let mut page = Page::from_html(html, Some("http://localhost/recommendation"), EnhancerConfig::default()).unwrap();
        page.on_ready(&NoopChartRenderer).unwrap();

        let nav = page.click("#download-pdf-btn .label").unwrap().expect("navigation");
        assert_eq!(nav.target, "/report.pdf");
        assert_eq!(page.location(), Some("http://localhost/report.pdf"));
        assert_eq!(page.navigations().len(), 1);
    }

    #[test]
    fn repeated_clicks_reread_the_url() {
        let mut page = Page::from_html(REPORT_PAGE, None, EnhancerConfig::default()).unwrap();
        page.on_ready(&NoopChartRenderer).unwrap();
        page.click("#download-pdf-btn").unwrap();

        let trigger = page.document().get_element_by_id("download-pdf-btn").unwrap();
        page.document_mut().set_attr(trigger, "data-url", "/static/recommendation.pdf");
        page.click("#download-pdf-btn").unwrap();

        let targets: Vec<_> = page.navigations().iter().map(|n| n.resolved.as_str()).collect();
        assert_eq!(targets, ["/download_pdf", "/static/recommendation.pdf"]);
    }

    #[test]
    fn chart_failure_keeps_other_tasks() {
        let html = r#"<div class="score-fill" data-value="12"></div>
            <img data-base64="AAAA">
            <canvas id="materialChart" data-labels="not valid json"></canvas>"#;
        let mut page = Page::from_html(html, None, EnhancerConfig::default()).unwrap();
        let err = page.on_ready(&NoopChartRenderer).unwrap_err();
        assert!(matches!(err, Error::ChartData { .. }));

        let out = page.html();
        assert!(out.contains(">12%</div>"));
        assert!(out.contains("data:image/png;base64,AAAA"));
        assert!(matches!(
            page.report().map(|r| &r.chart),
            Some(ChartOutcome::Failed { .. })
        ));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let res = Page::from_html("<p></p>", Some("not a url"), EnhancerConfig::default());
        assert!(matches!(res, Err(Error::LoadError(_))));
    }

    #[test]
    fn text_snapshot_reflects_enhancements() {
        let mut page = Page::from_html(REPORT_PAGE, Some("http://localhost/r"), EnhancerConfig::default()).unwrap();
        page.on_ready(&NoopChartRenderer).unwrap();
        let snap = page.text_snapshot();
        assert_eq!(snap.title, "Recommendation");
        assert!(snap.text.contains("91%"));
        assert_eq!(snap.url, "http://localhost/r");
    }
}
