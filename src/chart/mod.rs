//! Chart Renderer
//!
//! Hourly risk trend with a fixed decision threshold line.

mod model;
mod renderer;
mod svg;

pub use model::{
    ChartSpec, Series, YAxis, EMPTY_CHART_MESSAGE, RISK_SERIES_LABEL, RISK_THRESHOLD_PERCENT,
    THRESHOLD_SERIES_LABEL,
};
pub use renderer::{ChartHandle, ChartOutcome, ChartRenderer, ChartSurface};
pub use svg::SvgSurface;

#[cfg(test)]
pub(crate) use renderer::tests::RecordingSurface;
