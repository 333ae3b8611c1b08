//! Chart Component
//!
//! Moisture and temperature line charts drawn on HTML5 canvases. The
//! controller's chart registry drives [`CanvasCharts`]; the component only
//! lays out the canvases.

use gloo_timers::callback::Timeout;
use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use plantwatch::{ChartBackend, ChartData, ChartKind, PlantId};

const CANVAS_WIDTH: u32 = 600;
const CANVAS_HEIGHT: u32 = 260;
const BACKGROUND: &str = "#1f2937";

/// Canvas element id of one chart
pub fn canvas_id(plant: PlantId, kind: ChartKind) -> String {
    format!("{}-chart-{}", kind.slug(), plant)
}

/// The two chart canvases of a plant card
#[component]
pub fn PlantCharts(plant: PlantId) -> impl IntoView {
    view! {
        <div class="grid md:grid-cols-2 gap-4">
            {ChartKind::ALL
                .into_iter()
                .map(|kind| view! {
                    <div>
                        <h4 class="text-sm text-gray-400 mb-1">{kind.label()}</h4>
                        <canvas
                            id=canvas_id(plant, kind)
                            width=CANVAS_WIDTH.to_string()
                            height=CANVAS_HEIGHT.to_string()
                            class="w-full rounded-lg"
                        />
                    </div>
                })
                .collect_view()}
        </div>
    }
}

/// A chart bound to its canvas
#[derive(Debug)]
pub struct CanvasChart {
    canvas_id: String,
    kind: ChartKind,
}

/// [`ChartBackend`] drawing onto the card canvases
#[derive(Debug, Default, Clone, Copy)]
pub struct CanvasCharts;

impl CanvasCharts {
    /// Draw once the card markup for this render has been mounted
    fn schedule_draw(canvas_id: String, kind: ChartKind, data: Option<ChartData>) {
        Timeout::new(0, move || {
            let Some(canvas) = find_canvas(&canvas_id) else {
                return;
            };
            match data {
                Some(data) => draw_chart(&canvas, kind, &data),
                None => clear_canvas(&canvas),
            }
        })
        .forget();
    }
}

impl ChartBackend for CanvasCharts {
    type Handle = CanvasChart;

    fn create(&self, plant: PlantId, kind: ChartKind, data: &ChartData) -> CanvasChart {
        let chart = CanvasChart {
            canvas_id: canvas_id(plant, kind),
            kind,
        };
        Self::schedule_draw(chart.canvas_id.clone(), kind, Some(data.clone()));
        chart
    }

    fn update(&self, handle: &mut CanvasChart, data: &ChartData) {
        Self::schedule_draw(handle.canvas_id.clone(), handle.kind, Some(data.clone()));
    }

    fn destroy(&self, handle: CanvasChart) {
        Self::schedule_draw(handle.canvas_id, handle.kind, None);
    }
}

fn find_canvas(id: &str) -> Option<HtmlCanvasElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into::<HtmlCanvasElement>()
        .ok()
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()
}

fn clear_canvas(canvas: &HtmlCanvasElement) {
    if let Some(ctx) = context_2d(canvas) {
        ctx.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
    }
}

/// Y range with 10% padding; flat series get a unit band
fn padded_bounds(data: &ChartData) -> Option<(f64, f64)> {
    let (min, max) = data.bounds()?;
    let range = max - min;
    let padding = if range > 0.0 { range * 0.1 } else { 1.0 };
    Some((min - padding, max + padding))
}

/// Horizontal position of point `index` out of `count`
fn x_position(index: usize, count: usize, left: f64, width: f64) -> f64 {
    if count <= 1 {
        left + width / 2.0
    } else {
        left + (index as f64 / (count - 1) as f64) * width
    }
}

/// Indices of the x-axis labels to print: first, middle and last
fn label_indices(count: usize) -> Vec<usize> {
    match count {
        0 => vec![],
        1 => vec![0],
        2 => vec![0, 1],
        n => vec![0, n / 2, n - 1],
    }
}

/// Draw one series on canvas
fn draw_chart(canvas: &HtmlCanvasElement, kind: ChartKind, data: &ChartData) {
    let Some(ctx) = context_2d(canvas) else {
        return;
    };
    let Some((y_min, y_max)) = padded_bounds(data) else {
        clear_canvas(canvas);
        return;
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    let margin_left = 50.0;
    let margin_right = 15.0;
    let margin_top = 15.0;
    let margin_bottom = 30.0;

    let chart_width = width - margin_left - margin_right;
    let chart_height = height - margin_top - margin_bottom;
    let y_of = |value: f64| margin_top + ((y_max - value) / (y_max - y_min)) * chart_height;

    ctx.set_fill_style(&BACKGROUND.into());
    ctx.fill_rect(0.0, 0.0, width, height);

    // Horizontal grid lines with y-axis labels
    ctx.set_stroke_style(&"#374151".into());
    ctx.set_line_width(1.0);
    ctx.set_font("11px sans-serif");
    for i in 0..=4 {
        let y = margin_top + (i as f64 / 4.0) * chart_height;
        ctx.begin_path();
        ctx.move_to(margin_left, y);
        ctx.line_to(width - margin_right, y);
        ctx.stroke();

        let value = y_max - (i as f64 / 4.0) * (y_max - y_min);
        ctx.set_fill_style(&"#9ca3af".into());
        let _ = ctx.fill_text(&format!("{:.1}", value), 5.0, y + 4.0);
    }

    // Series line
    let count = data.values.len();
    let color = kind.color();
    ctx.set_stroke_style(&color.into());
    ctx.set_line_width(2.0);
    ctx.begin_path();
    for (i, value) in data.values.iter().enumerate() {
        let x = x_position(i, count, margin_left, chart_width);
        if i == 0 {
            ctx.move_to(x, y_of(*value));
        } else {
            ctx.line_to(x, y_of(*value));
        }
    }
    ctx.stroke();

    ctx.set_fill_style(&color.into());
    for (i, value) in data.values.iter().enumerate() {
        ctx.begin_path();
        let _ = ctx.arc(
            x_position(i, count, margin_left, chart_width),
            y_of(*value),
            2.5,
            0.0,
            std::f64::consts::PI * 2.0,
        );
        ctx.fill();
    }

    // Time-of-day labels
    ctx.set_fill_style(&"#9ca3af".into());
    for i in label_indices(data.labels.len()) {
        let x = x_position(i, count, margin_left, chart_width);
        let _ = ctx.fill_text(&data.labels[i], x - 22.0, height - 10.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(values: Vec<f64>) -> ChartData {
        ChartData {
            labels: values.iter().map(|_| "00:00:00".to_string()).collect(),
            values,
        }
    }

    #[test]
    fn test_canvas_ids() {
        assert_eq!(canvas_id(3, ChartKind::Moisture), "moisture-chart-3");
        assert_eq!(canvas_id(3, ChartKind::Temperature), "temperature-chart-3");
    }

    #[test]
    fn test_padded_bounds() {
        assert_eq!(padded_bounds(&data(vec![10.0, 20.0])), Some((9.0, 21.0)));
        assert_eq!(padded_bounds(&data(vec![5.0])), Some((4.0, 6.0)));
        assert_eq!(padded_bounds(&data(vec![])), None);
    }

    #[test]
    fn test_x_positions_span_width() {
        assert_eq!(x_position(0, 3, 50.0, 100.0), 50.0);
        assert_eq!(x_position(2, 3, 50.0, 100.0), 150.0);
        assert_eq!(x_position(0, 1, 50.0, 100.0), 100.0);
    }

    #[test]
    fn test_label_indices() {
        assert!(label_indices(0).is_empty());
        assert_eq!(label_indices(1), vec![0]);
        assert_eq!(label_indices(7), vec![0, 3, 6]);
    }
}
