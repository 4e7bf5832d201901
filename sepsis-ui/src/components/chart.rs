//! Chart Component
//!
//! Risk trend chart drawn on an HTML5 canvas. The canvas element is attached
//! to a shared [`CanvasSlot`] when it mounts; the view controller draws through
//! [`CanvasSurface`] and never touches the DOM itself.

use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use sepsis_dashboard::chart::{ChartHandle, ChartSpec, ChartSurface, Series, YAxis};

use crate::state::global::GlobalState;

const MARGIN_LEFT: f64 = 56.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 48.0;

/// Canvas element plus the chart currently drawn on it
#[derive(Default)]
pub struct CanvasSlot {
    canvas: RefCell<Option<HtmlCanvasElement>>,
    spec: RefCell<Option<ChartSpec>>,
}

impl CanvasSlot {
    pub fn attach(&self, canvas: HtmlCanvasElement) {
        *self.canvas.borrow_mut() = Some(canvas);
    }

    /// Tooltip lines for the point nearest to a horizontal canvas offset
    pub fn tooltip_at(&self, offset_x: f64) -> Option<Vec<String>> {
        let canvas = self.canvas.borrow();
        let canvas = canvas.as_ref()?;
        let spec = self.spec.borrow();
        let spec = spec.as_ref()?;

        let scale = match canvas.client_width() {
            0 => 1.0,
            w => canvas.width() as f64 / w as f64,
        };
        let plot = Plot::new(canvas);
        plot.nearest_index(offset_x * scale, spec.len())
            .and_then(|i| spec.tooltip(i))
    }
}

/// Plot area geometry of a canvas
struct Plot {
    width: f64,
    height: f64,
}

impl Plot {
    fn new(canvas: &HtmlCanvasElement) -> Self {
        Self {
            width: canvas.width() as f64,
            height: canvas.height() as f64,
        }
    }

    fn plot_width(&self) -> f64 {
        self.width - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn plot_height(&self) -> f64 {
        self.height - MARGIN_TOP - MARGIN_BOTTOM
    }

    fn x_at(&self, index: usize, count: usize) -> f64 {
        if count <= 1 {
            return MARGIN_LEFT + self.plot_width() / 2.0;
        }
        MARGIN_LEFT + self.plot_width() * index as f64 / (count - 1) as f64
    }

    fn y_at(&self, axis: &YAxis, value: f64) -> f64 {
        MARGIN_TOP + self.plot_height() * (1.0 - axis.normalize(value))
    }

    fn nearest_index(&self, x: f64, count: usize) -> Option<usize> {
        (0..count).min_by(|a, b| {
            let da = (self.x_at(*a, count) - x).abs();
            let db = (self.x_at(*b, count) - x).abs();
            da.total_cmp(&db)
        })
    }
}

/// [`ChartSurface`] drawing into the canvas held by a [`CanvasSlot`]
pub struct CanvasSurface {
    slot: Rc<CanvasSlot>,
    current: Option<ChartHandle>,
    next_handle: u64,
}

impl CanvasSurface {
    pub fn new(slot: Rc<CanvasSlot>) -> Self {
        Self {
            slot,
            current: None,
            next_handle: 0,
        }
    }

    fn context(&self) -> Option<(CanvasRenderingContext2d, Plot)> {
        let canvas = self.slot.canvas.borrow();
        let canvas = canvas.as_ref()?;
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some((ctx, Plot::new(canvas)))
    }

    fn clear(&self) {
        if let Some((ctx, plot)) = self.context() {
            ctx.clear_rect(0.0, 0.0, plot.width, plot.height);
        }
    }
}

impl ChartSurface for CanvasSurface {
    fn draw(&mut self, spec: &ChartSpec) -> ChartHandle {
        self.next_handle += 1;
        let handle = ChartHandle(self.next_handle);

        match self.context() {
            Some((ctx, plot)) => draw_chart(&ctx, &plot, spec),
            None => web_sys::console::warn_1(&"Chart canvas is not mounted".into()),
        }

        *self.slot.spec.borrow_mut() = Some(spec.clone());
        self.current = Some(handle);
        handle
    }

    fn destroy(&mut self, handle: ChartHandle) {
        if self.current == Some(handle) {
            self.clear();
            *self.slot.spec.borrow_mut() = None;
            self.current = None;
        }
    }

    fn draw_placeholder(&mut self, message: &str) {
        self.clear();
        *self.slot.spec.borrow_mut() = None;
        self.current = None;

        if let Some((ctx, plot)) = self.context() {
            ctx.set_fill_style(&"#6b7280".into());
            ctx.set_font("16px sans-serif");
            ctx.set_text_align("center");
            let _ = ctx.fill_text(message, plot.width / 2.0, plot.height / 2.0);
        }
    }
}

/// Risk trend chart component
#[component]
pub fn RiskChart() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let canvas_ref = create_node_ref::<html::Canvas>();
    let (tooltip, set_tooltip) = create_signal(None::<Vec<String>>);

    let slot = state.canvas.clone();
    canvas_ref.on_load(move |canvas| {
        let element: &HtmlCanvasElement = &canvas;
        slot.attach(element.clone());
    });

    let slot = state.canvas.clone();
    let on_move = move |ev: ev::MouseEvent| {
        set_tooltip.set(slot.tooltip_at(ev.offset_x() as f64));
    };

    view! {
        <div class="chart-container">
            <canvas
                node_ref=canvas_ref
                id="riskChart"
                width="800"
                height="400"
                on:mousemove=on_move
                on:mouseleave=move |_| set_tooltip.set(None)
            />
            {move || {
                tooltip.get().map(|lines| view! {
                    <div class="chart-tooltip">
                        {lines.into_iter().map(|line| view! { <div>{line}</div> }).collect_view()}
                    </div>
                })
            }}
        </div>
    }
}

/// Draw legend, axes and both series
fn draw_chart(ctx: &CanvasRenderingContext2d, plot: &Plot, spec: &ChartSpec) {
    ctx.clear_rect(0.0, 0.0, plot.width, plot.height);
    ctx.set_font("12px sans-serif");

    // Horizontal grid lines with percentage labels
    ctx.set_line_width(1.0);
    ctx.set_text_align("right");
    for tick in spec.y_axis.ticks() {
        let y = plot.y_at(&spec.y_axis, tick);
        ctx.set_stroke_style(&"#e5e7eb".into());
        ctx.begin_path();
        ctx.move_to(MARGIN_LEFT, y);
        ctx.line_to(plot.width - MARGIN_RIGHT, y);
        ctx.stroke();

        ctx.set_fill_style(&"#6b7280".into());
        let _ = ctx.fill_text(&YAxis::tick_label(tick), MARGIN_LEFT - 8.0, y + 4.0);
    }

    // Hour labels
    ctx.set_text_align("center");
    for (i, label) in spec.labels.iter().enumerate() {
        let x = plot.x_at(i, spec.len());
        let _ = ctx.fill_text(label, x, plot.height - MARGIN_BOTTOM + 20.0);
    }

    for series in spec.series() {
        draw_series(ctx, plot, spec, series);
    }

    draw_legend(ctx, spec);
}

fn draw_series(ctx: &CanvasRenderingContext2d, plot: &Plot, spec: &ChartSpec, series: &Series) {
    let count = series.values.len();
    let points: Vec<(f64, f64)> = series
        .values
        .iter()
        .enumerate()
        .map(|(i, v)| (plot.x_at(i, count), plot.y_at(&spec.y_axis, *v)))
        .collect();

    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return;
    };

    if series.filled {
        let baseline = plot.y_at(&spec.y_axis, spec.y_axis.min);
        ctx.set_global_alpha(0.1);
        ctx.set_fill_style(&series.color.into());
        ctx.begin_path();
        ctx.move_to(first.0, baseline);
        for (x, y) in &points {
            ctx.line_to(*x, *y);
        }
        ctx.line_to(last.0, baseline);
        ctx.close_path();
        ctx.fill();
        ctx.set_global_alpha(1.0);
    }

    let dash = if series.dashed {
        js_sys::Array::of2(&JsValue::from(5.0), &JsValue::from(5.0))
    } else {
        js_sys::Array::new()
    };
    let _ = ctx.set_line_dash(&dash);

    ctx.set_stroke_style(&series.color.into());
    ctx.set_line_width(2.0);
    ctx.begin_path();
    for (i, (x, y)) in points.iter().enumerate() {
        if i == 0 {
            ctx.move_to(*x, *y);
        } else {
            ctx.line_to(*x, *y);
        }
    }
    ctx.stroke();
    let _ = ctx.set_line_dash(&js_sys::Array::new());

    if series.show_points {
        ctx.set_fill_style(&series.color.into());
        for (x, y) in &points {
            ctx.begin_path();
            let _ = ctx.arc(*x, *y, 4.0, 0.0, std::f64::consts::PI * 2.0);
            ctx.fill();
        }
    }
}

fn draw_legend(ctx: &CanvasRenderingContext2d, spec: &ChartSpec) {
    ctx.set_text_align("left");
    let mut x = MARGIN_LEFT;
    for series in spec.series() {
        ctx.set_fill_style(&series.color.into());
        ctx.fill_rect(x, 14.0, 12.0, 12.0);
        ctx.set_fill_style(&"#374151".into());
        let _ = ctx.fill_text(&series.label, x + 18.0, 24.0);
        x += 200.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sepsis_dashboard::api::{HourlyMeasurement, VitalSigns};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn measurement(hour: u32, prediction: f64) -> HourlyMeasurement {
        HourlyMeasurement {
            id: None,
            hour,
            vital_signs: VitalSigns::new(),
            prediction,
            risk_level: String::new(),
            timestamp: None,
        }
    }

    #[wasm_bindgen_test]
    fn test_tooltip_follows_nearest_point() {
        let slot = Rc::new(CanvasSlot::default());
        let spec = ChartSpec::from_history(&[measurement(1, 0.12), measurement(2, 0.48)]).unwrap();

        let mut surface = CanvasSurface::new(slot.clone());
        surface.draw(&spec);
        assert!(slot.tooltip_at(60.0).is_none());

        let canvas: HtmlCanvasElement = document()
            .create_element("canvas")
            .unwrap()
            .dyn_into()
            .unwrap();
        canvas.set_width(600);
        canvas.set_height(300);
        slot.attach(canvas);

        let first = slot.tooltip_at(60.0).unwrap();
        assert_eq!(first[0], "Saat 1");
        assert_eq!(first.len(), 3);
        assert_eq!(slot.tooltip_at(570.0).unwrap()[0], "Saat 2");

        surface.draw_placeholder("Veri yok");
        assert!(slot.tooltip_at(60.0).is_none());
    }
}
