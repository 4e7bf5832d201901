//! Standalone SVG surface, used to export a patient's risk trend to a file.

use std::fmt::Write;

use super::model::{ChartSpec, Series, YAxis};
use super::renderer::{ChartHandle, ChartSurface};

const PADDING_LEFT: f64 = 56.0;
const PADDING_RIGHT: f64 = 24.0;
const PADDING_TOP: f64 = 40.0;
const PADDING_BOTTOM: f64 = 48.0;

/// SVG document builder implementing [`ChartSurface`]
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    document: Option<String>,
    current: Option<ChartHandle>,
    next_handle: u64,
}

impl Default for SvgSurface {
    fn default() -> Self {
        Self::new(800.0, 400.0)
    }
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            document: None,
            current: None,
            next_handle: 0,
        }
    }

    /// The SVG currently on the surface
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    fn plot_width(&self) -> f64 {
        self.width - PADDING_LEFT - PADDING_RIGHT
    }

    fn plot_height(&self) -> f64 {
        self.height - PADDING_TOP - PADDING_BOTTOM
    }

    fn x_at(&self, index: usize, count: usize) -> f64 {
        if count <= 1 {
            return PADDING_LEFT + self.plot_width() / 2.0;
        }
        PADDING_LEFT + self.plot_width() * index as f64 / (count - 1) as f64
    }

    fn y_at(&self, axis: &YAxis, value: f64) -> f64 {
        PADDING_TOP + self.plot_height() * (1.0 - axis.normalize(value))
    }

    fn open(&self, out: &mut String) {
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="12">"#,
            w = self.width,
            h = self.height
        );
        let _ = writeln!(out, r#"<rect width="100%" height="100%" fill="white"/>"#);
    }

    fn write_axes(&self, out: &mut String, spec: &ChartSpec) {
        let right = PADDING_LEFT + self.plot_width();
        for tick in spec.y_axis.ticks() {
            let y = self.y_at(&spec.y_axis, tick);
            let _ = writeln!(
                out,
                r##"<line x1="{PADDING_LEFT}" y1="{y:.1}" x2="{right:.1}" y2="{y:.1}" stroke="#e5e7eb"/>"##
            );
            let _ = writeln!(
                out,
                r##"<text x="{:.1}" y="{:.1}" text-anchor="end" fill="#6b7280">{}</text>"##,
                PADDING_LEFT - 8.0,
                y + 4.0,
                YAxis::tick_label(tick)
            );
        }

        let baseline = self.height - PADDING_BOTTOM;
        for (i, label) in spec.labels.iter().enumerate() {
            let x = self.x_at(i, spec.len());
            let _ = writeln!(
                out,
                r##"<text x="{x:.1}" y="{:.1}" text-anchor="middle" fill="#6b7280">{}</text>"##,
                baseline + 20.0,
                escape(label)
            );
        }
    }

    fn write_series(&self, out: &mut String, spec: &ChartSpec, series: &Series) {
        let points: Vec<(f64, f64)> = series
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| (self.x_at(i, spec.len()), self.y_at(&spec.y_axis, *v)))
            .collect();
        let path = points
            .iter()
            .map(|(x, y)| format!("{:.1},{:.1}", x, y))
            .collect::<Vec<_>>()
            .join(" ");

        if series.filled && points.len() > 1 {
            let baseline = self.height - PADDING_BOTTOM;
            let (first_x, _) = points[0];
            let (last_x, _) = points[points.len() - 1];
            let _ = writeln!(
                out,
                r#"<polygon points="{first_x:.1},{baseline:.1} {path} {last_x:.1},{baseline:.1}" fill="{}" fill-opacity="0.1"/>"#,
                series.color
            );
        }

        let dash = if series.dashed {
            r#" stroke-dasharray="5,5""#
        } else {
            ""
        };
        let _ = writeln!(
            out,
            r#"<polyline points="{path}" fill="none" stroke="{}" stroke-width="2"{dash}/>"#,
            series.color
        );

        if series.show_points {
            for (i, (x, y)) in points.iter().enumerate() {
                let title = spec
                    .tooltip(i)
                    .map(|lines| lines.join("\n"))
                    .unwrap_or_default();
                let _ = writeln!(
                    out,
                    r#"<circle cx="{x:.1}" cy="{y:.1}" r="4" fill="{}"><title>{}</title></circle>"#,
                    series.color,
                    escape(&title)
                );
            }
        }
    }

    fn write_legend(&self, out: &mut String, spec: &ChartSpec) {
        let mut x = PADDING_LEFT;
        for series in spec.series() {
            let dash = if series.dashed {
                r#" stroke-dasharray="5,5""#
            } else {
                ""
            };
            let _ = writeln!(
                out,
                r#"<line x1="{x:.1}" y1="16" x2="{:.1}" y2="16" stroke="{}" stroke-width="2"{dash}/>"#,
                x + 24.0,
                series.color
            );
            let _ = writeln!(
                out,
                r#"<text x="{:.1}" y="20">{}</text>"#,
                x + 30.0,
                escape(&series.label)
            );
            x += 200.0;
        }
    }
}

impl ChartSurface for SvgSurface {
    fn draw(&mut self, spec: &ChartSpec) -> ChartHandle {
        let mut out = String::new();
        self.open(&mut out);
        self.write_legend(&mut out, spec);
        self.write_axes(&mut out, spec);
        for series in spec.series() {
            self.write_series(&mut out, spec, series);
        }
        out.push_str("</svg>\n");

        self.next_handle += 1;
        let handle = ChartHandle(self.next_handle);
        self.document = Some(out);
        self.current = Some(handle);
        handle
    }

    fn destroy(&mut self, handle: ChartHandle) {
        if self.current == Some(handle) {
            self.document = None;
            self.current = None;
        }
    }

    fn draw_placeholder(&mut self, message: &str) {
        let mut out = String::new();
        self.open(&mut out);
        let _ = writeln!(
            out,
            r##"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="16" fill="#999">{}</text>"##,
            self.width / 2.0,
            self.height / 2.0,
            escape(message)
        );
        out.push_str("</svg>\n");

        self.document = Some(out);
        self.current = None;
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{HourlyMeasurement, VitalSigns};
    use crate::chart::ChartRenderer;

    fn history() -> Vec<HourlyMeasurement> {
        [0.05, 0.21, 0.3]
            .iter()
            .enumerate()
            .map(|(i, p)| HourlyMeasurement {
                id: None,
                hour: i as u32 + 1,
                vital_signs: VitalSigns::new(),
                prediction: *p,
                risk_level: "Orta".to_string(),
                timestamp: None,
            })
            .collect()
    }

    #[test]
    fn test_svg_contains_both_series() {
        let mut renderer = ChartRenderer::new(SvgSurface::default());
        let mut current = None;
        renderer.render(&mut current, &history());

        let svg = renderer.surface().document().unwrap();
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains("stroke-dasharray"));
        assert!(svg.contains("Saat 3"));
        assert!(svg.contains("100%"));
        assert!(svg.contains("Sepsis Riski (%): 21.0%"));
    }

    #[test]
    fn test_placeholder_has_no_series() {
        let mut renderer = ChartRenderer::new(SvgSurface::default());
        let mut current = None;
        renderer.render(&mut current, &history());
        renderer.render(&mut current, &[]);

        let svg = renderer.surface().document().unwrap();
        assert!(svg.contains("Veri bekleniyor..."));
        assert!(!svg.contains("<polyline"));
    }
}
