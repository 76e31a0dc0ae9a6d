//! Page-ready tasks
//!
//! Each task reads attributes from the [`Document`](crate::dom::Document) and
//! writes its result back to it. Tasks are independent of each other; the
//! [`Page`](crate::page::Page) runs them in a fixed order (scores, download
//! trigger, images, chart) so a chart failure never hides the others.

pub mod chart;
pub mod download;
pub mod image;
pub mod score_bar;

pub use chart::{ChartConfig, ChartOutcome, ChartRenderer};
pub use download::ClickHandler;
pub use image::{data_uri, encode_payload};
pub use score_bar::ScoreSummary;
