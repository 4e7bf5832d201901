//! Chart Renderer
//!
//! Draws a risk trend onto a [`ChartSurface`], always destroying the previous
//! chart first so repeated renders never overlay each other.

use super::model::{ChartSpec, EMPTY_CHART_MESSAGE};
use crate::api::HourlyMeasurement;

/// Identifies a chart instance drawn on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChartHandle(pub u64);

/// A drawing target (canvas, SVG document, ...)
pub trait ChartSurface {
    /// Draw a chart and return a handle to it
    fn draw(&mut self, spec: &ChartSpec) -> ChartHandle;

    /// Remove a previously drawn chart
    fn destroy(&mut self, handle: ChartHandle);

    /// Show a centered message instead of a chart
    fn draw_placeholder(&mut self, message: &str);
}

/// What a render call produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartOutcome {
    Drawn(ChartHandle),
    Placeholder,
}

/// Renderer owning a surface
#[derive(Debug)]
pub struct ChartRenderer<S> {
    surface: S,
}

impl<S: ChartSurface> ChartRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Render `history`, replacing whatever `current` points at.
    ///
    /// `current` is the caller's chart slot; it holds the new handle afterwards,
    /// or `None` when a placeholder was drawn.
    pub fn render(
        &mut self,
        current: &mut Option<ChartHandle>,
        history: &[HourlyMeasurement],
    ) -> ChartOutcome {
        if let Some(previous) = current.take() {
            self.surface.destroy(previous);
        }

        match ChartSpec::from_history(history) {
            Some(spec) => {
                let handle = self.surface.draw(&spec);
                *current = Some(handle);
                ChartOutcome::Drawn(handle)
            }
            None => {
                self.surface.draw_placeholder(EMPTY_CHART_MESSAGE);
                ChartOutcome::Placeholder
            }
        }
    }

    /// Destroy the current chart without drawing anything
    pub fn clear(&mut self, current: &mut Option<ChartHandle>) {
        if let Some(previous) = current.take() {
            self.surface.destroy(previous);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::VitalSigns;
    use std::collections::BTreeSet;

    /// Surface that records what is on screen
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSurface {
        pub live: BTreeSet<ChartHandle>,
        pub placeholder: Option<String>,
        pub series_drawn: usize,
        next: u64,
    }

    impl ChartSurface for RecordingSurface {
        fn draw(&mut self, spec: &ChartSpec) -> ChartHandle {
            self.next += 1;
            let handle = ChartHandle(self.next);
            self.live.insert(handle);
            self.placeholder = None;
            self.series_drawn += spec.series().len();
            handle
        }

        fn destroy(&mut self, handle: ChartHandle) {
            self.live.remove(&handle);
        }

        fn draw_placeholder(&mut self, message: &str) {
            self.placeholder = Some(message.to_string());
        }
    }

    fn history(n: u32) -> Vec<HourlyMeasurement> {
        (1..=n)
            .map(|hour| HourlyMeasurement {
                id: Some(hour as i64),
                hour,
                vital_signs: VitalSigns::new(),
                prediction: 0.1 * hour as f64,
                risk_level: "Düşük".to_string(),
                timestamp: None,
            })
            .collect()
    }

    #[test]
    fn test_rerender_replaces_previous_chart() {
        let mut renderer = ChartRenderer::new(RecordingSurface::default());
        let mut current = None;

        renderer.render(&mut current, &history(2));
        renderer.render(&mut current, &history(3));
        renderer.render(&mut current, &history(4));

        assert_eq!(renderer.surface().live.len(), 1);
        assert_eq!(renderer.surface().live.iter().next().copied(), current);
    }

    #[test]
    fn test_empty_history_draws_placeholder() {
        let mut renderer = ChartRenderer::new(RecordingSurface::default());
        let mut current = None;

        renderer.render(&mut current, &history(2));
        let outcome = renderer.render(&mut current, &[]);

        assert_eq!(outcome, ChartOutcome::Placeholder);
        assert_eq!(current, None);
        assert!(renderer.surface().live.is_empty());
        assert_eq!(
            renderer.surface().placeholder.as_deref(),
            Some("Veri bekleniyor...")
        );
        assert_eq!(renderer.surface().series_drawn, 2);
    }

    #[test]
    fn test_clear() {
        let mut renderer = ChartRenderer::new(RecordingSurface::default());
        let mut current = None;

        renderer.render(&mut current, &history(1));
        renderer.clear(&mut current);

        assert!(renderer.surface().live.is_empty());
        assert_eq!(current, None);
    }
}
