//! Material comparison chart
//!
//! The chart host carries four JSON arrays: `data-labels`,
//! `data-suitability`, `data-thermal` and `data-cost`. When labels and
//! suitability values are both present, a grouped bar chart config is built
//! and handed to a [`ChartRenderer`] together with the host element. Drawing
//! the chart is the renderer's business.

use crate::dom::{Document, ElementHandle};
use crate::{EnhancerConfig, Error, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Mutex;

pub const SUITABILITY_COLOR: &str = "rgba(75, 192, 192, 0.7)";
pub const THERMAL_COLOR: &str = "rgba(255, 159, 64, 0.7)";
pub const COST_COLOR: &str = "rgba(54, 162, 235, 0.7)";

/// Bar chart configuration in the shape charting front-ends consume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: BarData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarData {
    pub labels: Vec<Value>,
    pub datasets: Vec<Dataset>,
}

/// One series of the grouped chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<Value>,
    pub background_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub plugins: Plugins,
    pub scales: Scales,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plugins {
    pub legend: Legend,
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub display: bool,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scales {
    pub y: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    pub begin_at_zero: bool,
}

/// The four arrays read from the chart host
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialSeries {
    pub labels: Vec<Value>,
    pub suitability: Vec<Value>,
    pub thermal: Vec<Value>,
    pub cost: Vec<Value>,
}

/// What the chart task did
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChartOutcome {
    /// No chart host on the page
    #[default]
    NoHost,
    /// Host present but labels or suitability values were empty
    Skipped,
    /// A config was handed to the renderer
    Rendered { series: usize, labels: usize },
    /// Chart data could not be read or the renderer failed
    Failed { message: String },
}

/// External charting capability
pub trait ChartRenderer: Send + Sync {
    /// Draw `config` into `host`.
    fn render(&self, config: &ChartConfig, host: &mut ElementHandle<'_>) -> Result<()>;
}

/// Renderer that discards every chart
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopChartRenderer;

impl ChartRenderer for NoopChartRenderer {
    fn render(&self, _config: &ChartConfig, _host: &mut ElementHandle<'_>) -> Result<()> {
        Ok(())
    }
}

/// A chart captured by [`RecordingChartRenderer`]
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    /// `id` attribute of the host element
    pub host_id: Option<String>,
    pub config: ChartConfig,
}

/// Renderer that keeps every config it receives, for tests and reports
#[derive(Debug, Default)]
pub struct RecordingChartRenderer {
    charts: Mutex<Vec<RenderedChart>>,
}

impl RecordingChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn charts(&self) -> Vec<RenderedChart> {
        self.charts.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl ChartRenderer for RecordingChartRenderer {
    fn render(&self, config: &ChartConfig, host: &mut ElementHandle<'_>) -> Result<()> {
        let mut charts = self
            .charts
            .lock()
            .map_err(|_| Error::RenderError("chart recorder lock poisoned".into()))?;
        charts.push(RenderedChart {
            host_id: host.element_id().map(str::to_string),
            config: config.clone(),
        });
        Ok(())
    }
}

/// Renderer that stores the config JSON in the host's `data-chart-config`
/// attribute, leaving the drawing to a client-side bootstrap.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedConfigRenderer;

impl EmbeddedConfigRenderer {
    pub const ATTRIBUTE: &'static str = "data-chart-config";
}

impl ChartRenderer for EmbeddedConfigRenderer {
    fn render(&self, config: &ChartConfig, host: &mut ElementHandle<'_>) -> Result<()> {
        let json = serde_json::to_string(config)
            .map_err(|e| Error::RenderError(format!("Failed to serialize chart config: {}", e)))?;
        host.set_attr(Self::ATTRIBUTE, &json);
        Ok(())
    }
}

/// Parse one chart attribute. Missing and empty attributes read as `[]`.
///
/// Valid JSON that is not an array (`5`, `{}`) is rejected like malformed
/// JSON. This is stricter than a browser bootstrap testing `.length`, which
/// would skip drawing without reporting anything; `lenient` restores that.
pub fn parse_series(attribute: &str, raw: Option<&str>, lenient: bool) -> Result<Vec<Value>> {
    let raw = match raw {
        Some(r) if !r.is_empty() => r,
        _ => "[]",
    };
    match serde_json::from_str::<Vec<Value>>(raw) {
        Ok(values) => Ok(values),
        Err(e) if lenient => {
            warn!("ignoring malformed {}: {}", attribute, e);
            Ok(Vec::new())
        }
        Err(e) => Err(Error::chart_data(attribute, e)),
    }
}

/// Read the four series from the host element.
pub fn read_series(doc: &Document, host: crate::NodeId, lenient: bool) -> Result<MaterialSeries> {
    let read = |attribute: &str| parse_series(attribute, doc.attr(host, attribute), lenient);
    Ok(MaterialSeries {
        labels: read("data-labels")?,
        suitability: read("data-suitability")?,
        thermal: read("data-thermal")?,
        cost: read("data-cost")?,
    })
}

/// Build the grouped bar config, or `None` when there is nothing to plot.
pub fn build_config(series: MaterialSeries, title: &str) -> Option<ChartConfig> {
    if series.labels.is_empty() || series.suitability.is_empty() {
        return None;
    }

    let dataset = |label: &str, data: Vec<Value>, color: &str| Dataset {
        label: label.to_string(),
        data,
        background_color: color.to_string(),
    };

    Some(ChartConfig {
        kind: "bar".to_string(),
        data: BarData {
            labels: series.labels,
            datasets: vec![
                dataset("Suitability", series.suitability, SUITABILITY_COLOR),
                dataset("Thermal Performance", series.thermal, THERMAL_COLOR),
                dataset("Cost", series.cost, COST_COLOR),
            ],
        },
        options: ChartOptions {
            responsive: true,
            maintain_aspect_ratio: false,
            plugins: Plugins {
                legend: Legend {
                    position: "top".to_string(),
                },
                title: Title {
                    display: true,
                    text: title.to_string(),
                },
            },
            scales: Scales {
                y: Axis { begin_at_zero: true },
            },
        },
    })
}

/// Run the chart task against the document.
pub fn render_chart(
    doc: &mut Document,
    config: &EnhancerConfig,
    renderer: &dyn ChartRenderer,
) -> Result<ChartOutcome> {
    let Some(host) = doc.get_element_by_id(&config.chart_host_id) else {
        return Ok(ChartOutcome::NoHost);
    };

    let series = read_series(doc, host, config.lenient_chart_json)?;
    let Some(chart) = build_config(series, &config.chart_title) else {
        debug!("chart host #{} has no data to plot", config.chart_host_id);
        return Ok(ChartOutcome::Skipped);
    };

    let mut handle = doc
        .element_handle(host)
        .ok_or_else(|| Error::RenderError("chart host vanished".into()))?;
    renderer.render(&chart, &mut handle)?;

    debug!(
        "rendered chart into #{} ({} labels)",
        config.chart_host_id,
        chart.data.labels.len()
    );
    Ok(ChartOutcome::Rendered {
        series: chart.data.datasets.len(),
        labels: chart.data.labels.len(),
    })
}
