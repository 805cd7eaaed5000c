//! Chart Components
//!
//! Canvas renderings of the donut, bar and line charts held by the
//! dashboard model. Each redraws whenever the model changes.

use faultwatch_core::dashboard::{
    BarChart as BarData, DonutChart as DonutData, LineChart as LineData,
};
use faultwatch_core::sensor::SafeRange;
use leptos::*;
use std::f64::consts::PI;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::state::global::GlobalState;

const BACKGROUND: &str = "#1f2937"; // gray-800
const GRID: &str = "#374151"; // gray-700
const TEXT: &str = "#9ca3af"; // gray-400
const SAFE_SLICE: &str = "#4CAF50";
const RISK_SLICE: &str = "#F44336";
const LINE: &str = "#FF9800";

/// Where a sensor's safe range sits on the bar plot
const SAFE_BAND: (f64, f64) = (0.25, 0.75);

/// Risk donut with the percentage in the hole
#[component]
pub fn DonutChart() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let canvas_ref = create_node_ref::<html::Canvas>();

    create_effect(move |_| {
        let donut = state.dashboard.with(|d| d.charts().donut().clone());
        if let Some(canvas) = canvas_ref.get() {
            draw_donut(&canvas, &donut);
        }
    });

    view! {
        <div class="relative w-64 h-64 mx-auto">
            <canvas
                id="donutChart"
                node_ref=canvas_ref
                width="256"
                height="256"
                class="w-full h-full"
            />
            <span
                id="donutCenter"
                class="absolute inset-0 flex items-center justify-center text-3xl font-bold"
            >
                {move || state.dashboard.with(|d| d.charts().donut().center().to_string())}
            </span>
        </div>
    }
}

/// One bar per sensor, red when outside its safe range
#[component]
pub fn BarChart() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let canvas_ref = create_node_ref::<html::Canvas>();

    create_effect(move |_| {
        let bars = state.dashboard.with(|d| d.charts().bar().clone());
        if let Some(canvas) = canvas_ref.get() {
            draw_bars(&canvas, &bars);
        }
    });

    view! {
        <canvas
            id="barChart"
            node_ref=canvas_ref
            width="800"
            height="320"
            class="w-full h-64 rounded-lg"
        />
    }
}

/// Risk of recent predictions
#[component]
pub fn LineChart() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let canvas_ref = create_node_ref::<html::Canvas>();

    create_effect(move |_| {
        let line = state.dashboard.with(|d| d.charts().line().clone());
        if let Some(canvas) = canvas_ref.get() {
            draw_line(&canvas, &line);
        }
    });

    view! {
        <canvas
            id="logsChart"
            node_ref=canvas_ref
            width="800"
            height="320"
            class="w-full h-64 rounded-lg"
        />
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
}

fn draw_donut(canvas: &HtmlCanvasElement, donut: &DonutData) {
    let Some(ctx) = context_2d(canvas) else { return };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    let (cx, cy) = (width / 2.0, height / 2.0);
    let outer = width.min(height) / 2.0 - 4.0;
    let inner = outer * 0.6;

    ctx.clear_rect(0.0, 0.0, width, height);

    let mut start = -PI / 2.0;
    for (share, color) in donut.slices().into_iter().zip([SAFE_SLICE, RISK_SLICE]) {
        if share == 0 {
            continue;
        }
        let end = start + slice_angle(share);

        ctx.set_fill_style(&color.into());
        ctx.begin_path();
        ctx.move_to(cx, cy);
        let _ = ctx.arc(cx, cy, outer, start, end);
        ctx.close_path();
        ctx.fill();

        start = end;
    }

    // Punch the hole
    ctx.set_fill_style(&BACKGROUND.into());
    ctx.begin_path();
    let _ = ctx.arc(cx, cy, inner, 0.0, 2.0 * PI);
    ctx.fill();
}

fn draw_bars(canvas: &HtmlCanvasElement, bars: &BarData) {
    let Some(ctx) = context_2d(canvas) else { return };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    let margin_top = 20.0;
    let margin_bottom = 40.0;
    let chart_height = height - margin_top - margin_bottom;
    let slot = width / bars.bars().len() as f64;

    ctx.set_fill_style(&BACKGROUND.into());
    ctx.fill_rect(0.0, 0.0, width, height);

    // Safe band shared by every bar
    let (band_low, band_high) = SAFE_BAND;
    ctx.set_fill_style(&GRID.into());
    ctx.fill_rect(
        0.0,
        margin_top + (1.0 - band_high) * chart_height,
        width,
        (band_high - band_low) * chart_height,
    );

    ctx.set_font("12px sans-serif");
    for (i, bar) in bars.bars().iter().enumerate() {
        let x = i as f64 * slot + slot * 0.2;
        let bar_width = slot * 0.6;

        if let Some(value) = bar.value {
            let fraction = bar_fraction(bar.range, value);
            let top = margin_top + (1.0 - fraction) * chart_height;

            ctx.set_fill_style(&bar.color.hex().into());
            ctx.fill_rect(x, top, bar_width, margin_top + chart_height - top);

            ctx.set_fill_style(&TEXT.into());
            let _ = ctx.fill_text(&format_value(value), x, top - 4.0);
        }

        ctx.set_fill_style(&TEXT.into());
        let _ = ctx.fill_text(bar.key.label(), x, height - 16.0);
    }
}

fn draw_line(canvas: &HtmlCanvasElement, line: &LineData) {
    let Some(ctx) = context_2d(canvas) else { return };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    let margin_left = 50.0;
    let margin_right = 20.0;
    let margin_top = 20.0;
    let margin_bottom = 40.0;

    let chart_width = width - margin_left - margin_right;
    let chart_height = height - margin_top - margin_bottom;

    ctx.set_fill_style(&BACKGROUND.into());
    ctx.fill_rect(0.0, 0.0, width, height);

    // Horizontal grid at every 20%
    ctx.set_stroke_style(&GRID.into());
    ctx.set_line_width(1.0);
    ctx.set_font("12px sans-serif");
    for i in 0..=5 {
        let y = margin_top + (i as f64 / 5.0) * chart_height;
        ctx.begin_path();
        ctx.move_to(margin_left, y);
        ctx.line_to(width - margin_right, y);
        ctx.stroke();

        ctx.set_fill_style(&TEXT.into());
        let _ = ctx.fill_text(&format!("{}%", 100 - i * 20), 5.0, y + 4.0);
    }

    if line.is_empty() {
        ctx.set_fill_style(&TEXT.into());
        let _ = ctx.fill_text("No predictions yet", width / 2.0 - 50.0, height / 2.0);
        return;
    }

    let count = line.data().len();
    let point = |i: usize, percent: u8| {
        (
            margin_left + line_x(i, count) * chart_width,
            margin_top + (1.0 - percent as f64 / 100.0) * chart_height,
        )
    };

    ctx.set_stroke_style(&LINE.into());
    ctx.set_line_width(2.0);
    ctx.begin_path();
    for (i, percent) in line.data().iter().enumerate() {
        let (x, y) = point(i, *percent);
        if i == 0 {
            ctx.move_to(x, y);
        } else {
            ctx.line_to(x, y);
        }
    }
    ctx.stroke();

    ctx.set_fill_style(&LINE.into());
    for (i, percent) in line.data().iter().enumerate() {
        let (x, y) = point(i, *percent);
        ctx.begin_path();
        let _ = ctx.arc(x, y, 3.0, 0.0, 2.0 * PI);
        ctx.fill();
    }

    // First and last timestamps only, they are long
    ctx.set_fill_style(&TEXT.into());
    if let Some(first) = line.labels().first() {
        let _ = ctx.fill_text(first, margin_left, height - 16.0);
    }
    if count > 1 {
        if let Some(last) = line.labels().last() {
            let _ = ctx.fill_text(last, width - margin_right - 130.0, height - 16.0);
        }
    }
}

/// Angle of a donut slice given its share out of 100
fn slice_angle(share: u8) -> f64 {
    share as f64 / 100.0 * 2.0 * PI
}

/// Bar height as a fraction of the plot, with the safe range mapped onto
/// [`SAFE_BAND`] and clamped to the plot
fn bar_fraction(range: SafeRange, value: f64) -> f64 {
    let (low, high) = SAFE_BAND;
    if !value.is_finite() {
        return 0.0;
    }

    let width = range.max - range.min;
    if width <= 0.0 {
        return if value < range.min {
            low
        } else if value > range.max {
            high
        } else {
            (low + high) / 2.0
        };
    }
    (low + (value - range.min) / width * (high - low)).clamp(0.0, 1.0)
}

/// Horizontal position of point `i` of `count`, in `[0, 1]`
fn line_x(i: usize, count: usize) -> f64 {
    if count <= 1 {
        0.5
    } else {
        i as f64 / (count - 1) as f64
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value)
    } else {
        format!("{:.2}", value)
    }
}
