/// Score bar filler: `data-value` drives the bar width and label

use crate::dom::Document;
use crate::{EnhancerConfig, Result};
use log::{debug, warn};

/// Counts produced by [`fill_score_bars`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreSummary {
    pub filled: usize,
    pub skipped: usize,
}

/// Fill every score bar that carries a non-empty `data-value`.
///
/// The value is written verbatim unless `config.clamp_scores` is set. A value
/// that cannot stand as a single `width` declaration leaves the style
/// untouched; the label is still written.
pub fn fill_score_bars(doc: &mut Document, config: &EnhancerConfig) -> Result<ScoreSummary> {
    let mut summary = ScoreSummary::default();

    for id in doc.select(&config.score_selector)? {
        let value = match doc.dataset(id, "value") {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => {
                summary.skipped += 1;
                continue;
            }
        };

        let shown = if config.clamp_scores {
            clamp_percentage(&value)
        } else {
            value
        };
        let label = format!("{}%", shown);
        if !doc.set_style_property(id, "width", &label) {
            warn!("score value {:?} is not a valid width; style left unchanged", label);
        }
        doc.set_text(id, label);
        summary.filled += 1;
    }

    debug!(
        "score bars: {} filled, {} skipped",
        summary.filled, summary.skipped
    );
    Ok(summary)
}

/// Clamp a numeric percentage into [0, 100].
///
/// In-range values keep their original spelling; non-numeric values are
/// returned unchanged.
pub fn clamp_percentage(value: &str) -> String {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => {
            if n < 0.0 {
                "0".to_string()
            } else if n > 100.0 {
                "100".to_string()
            } else {
                value.to_string()
            }
        }
        _ => {
            warn!("score value {:?} is not numeric; leaving it unclamped", value);
            value.to_string()
        }
    }
}
