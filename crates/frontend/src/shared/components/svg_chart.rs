//! Inline SVG charts, with no charting library involved.

use contracts::shared::ai::render::{ChartKind, ChartSpec, CHART_UNREADABLE};
use contracts::shared::chart::{
    axis_max, bar_layout, line_points, polyline, series_color, short_number, y_ticks, ChartFrame,
};
use leptos::prelude::*;

const TICKS: usize = 4;

/// SVG coordinate attribute
fn n(v: f64) -> String {
    format!("{:.1}", v)
}

/// Axis lines, y tick labels and x labels shared by both chart kinds
fn axes(frame: &ChartFrame, labels: &[String], max: f64) -> impl IntoView {
    let baseline = frame.baseline();
    let left = frame.pad_left;
    let right = frame.width - frame.pad_right;

    let ticks = y_ticks(max, TICKS)
        .into_iter()
        .map(|t| {
            let y = frame.y_of(t, max);
            view! {
                <g>
                    <line x1=n(left) y1=n(y) x2=n(right) y2=n(y) class="chart__grid" />
                    <text x=n(left - 6.0) y=n(y + 4.0) text-anchor="end" class="chart__tick">
                        {short_number(t)}
                    </text>
                </g>
            }
        })
        .collect_view();

    let x_labels = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let x = frame.slot_center(i, labels.len());
            view! {
                <text x=n(x) y=n(baseline + 18.0) text-anchor="middle" class="chart__label">
                    {label.clone()}
                </text>
            }
        })
        .collect_view();

    view! {
        {ticks}
        <line x1=n(left) y1=n(baseline) x2=n(right) y2=n(baseline) class="chart__axis" />
        {x_labels}
    }
}

fn legend(names: Vec<String>) -> impl IntoView {
    view! {
        <div class="chart__legend">
            {names
                .into_iter()
                .enumerate()
                .map(|(i, name)| {
                    view! {
                        <span class="chart__legend-item">
                            <span class="chart__swatch" style=format!("background: {};", series_color(i))></span>
                            {name}
                        </span>
                    }
                })
                .collect_view()}
        </div>
    }
}

/// Grouped bar chart; `series` are `(name, values)` aligned with `labels`
#[component]
pub fn BarChart(labels: Vec<String>, series: Vec<(String, Vec<f64>)>) -> impl IntoView {
    let frame = ChartFrame::default();
    let values: Vec<Vec<f64>> = series.iter().map(|(_, v)| v.clone()).collect();
    let max = axis_max(&values);
    let bars = bar_layout(&frame, labels.len(), &values, max)
        .into_iter()
        .map(|bar| {
            view! {
                <rect
                    x=n(bar.x)
                    y=n(bar.y)
                    width=n(bar.width)
                    height=n(bar.height)
                    fill=series_color(bar.series)
                >
                    <title>{short_number(bar.value)}</title>
                </rect>
            }
        })
        .collect_view();
    let names = series.into_iter().map(|(name, _)| name).collect();

    view! {
        <div class="chart">
            <svg viewBox=frame.view_box() class="chart__svg" preserveAspectRatio="xMidYMid meet">
                {axes(&frame, &labels, max)}
                {bars}
            </svg>
            {legend(names)}
        </div>
    }
}

#[component]
pub fn LineChart(labels: Vec<String>, series: Vec<(String, Vec<f64>)>) -> impl IntoView {
    let frame = ChartFrame::default();
    let values: Vec<Vec<f64>> = series.iter().map(|(_, v)| v.clone()).collect();
    let max = axis_max(&values);
    let lines = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let points = line_points(&frame, labels.len(), v, max);
            let dots = points
                .iter()
                .map(|(x, y)| view! { <circle cx=n(*x) cy=n(*y) r="3" fill=series_color(i) /> })
                .collect_view();
            view! {
                <g>
                    <polyline points=polyline(&points) fill="none" stroke=series_color(i) stroke-width="2" />
                    {dots}
                </g>
            }
        })
        .collect_view();
    let names = series.into_iter().map(|(name, _)| name).collect();

    view! {
        <div class="chart">
            <svg viewBox=frame.view_box() class="chart__svg" preserveAspectRatio="xMidYMid meet">
                {axes(&frame, &labels, max)}
                {lines}
            </svg>
            {legend(names)}
        </div>
    }
}

/// Chart described by the assistant, or a notice when it cannot be drawn
#[component]
pub fn ChartBlock(spec: ChartSpec) -> impl IntoView {
    let title = spec.title.clone();
    let body = match (spec.is_renderable(), spec.data) {
        (true, Some(data)) => {
            let series: Vec<(String, Vec<f64>)> =
                data.datasets.into_iter().map(|d| (d.label, d.data)).collect();
            match spec.kind {
                ChartKind::Bar => view! { <BarChart labels=data.labels series=series /> }.into_any(),
                ChartKind::Line => view! { <LineChart labels=data.labels series=series /> }.into_any(),
            }
        }
        _ => view! { <p class="chart__unreadable">{CHART_UNREADABLE}</p> }.into_any(),
    };

    view! {
        <div class="chart-block">
            <div class="chart-block__title">{title}</div>
            {body}
        </div>
    }
}
