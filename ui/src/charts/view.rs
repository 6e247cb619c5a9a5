use dioxus::prelude::*;

use super::{ChartHandle, Tick};
use crate::config::{Canvas, Margin, StoryConfig};
use crate::core::categories::DiabetesStatus;

/// Everything needed to draw one subplot at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotFrame {
    pub status: DiabetesStatus,
    pub origin: (f64, f64),
    pub width: f64,
    pub height: f64,
    pub path: String,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    pub empty: bool,
}

pub fn plot_frames(
    handles: &[ChartHandle; 3],
    config: &StoryConfig,
    canvas: Canvas,
    now_ms: f64,
) -> Vec<PlotFrame> {
    handles
        .iter()
        .map(|handle| PlotFrame {
            status: handle.status(),
            origin: config.plot_origin(canvas, handle.status().index()),
            width: handle.width(),
            height: handle.height(),
            path: handle.path_data(now_ms),
            x_ticks: handle.x_ticks().to_vec(),
            y_ticks: handle.y_ticks().to_vec(),
            empty: handle.update_count() > 0 && handle.bound_len() == 0,
        })
        .collect()
}

#[component]
pub fn GlucoseCharts(frames: Vec<PlotFrame>, canvas: Canvas, margin: Margin) -> Element {
    let outer_width = canvas.width + margin.left + margin.right;
    let outer_height = canvas.height + margin.top + margin.bottom;
    let left = margin.left;
    let top = margin.top;

    rsx! {
        svg {
            class: "story-chart",
            width: "{outer_width}",
            height: "{outer_height}",
            g { transform: "translate({left},{top})",
                for frame in frames.into_iter() {
                    {render_plot(frame)}
                }
            }
        }
    }
}

fn render_plot(frame: PlotFrame) -> Element {
    let PlotFrame {
        status,
        origin: (ox, oy),
        width,
        height,
        path,
        x_ticks,
        y_ticks,
        empty,
    } = frame;
    let label = status.label();
    let stroke = status.stroke();
    let mid_x = width / 2.0;
    let mid_y = height / 2.0;

    rsx! {
        g {
            key: "{label}",
            class: "story-chart__plot",
            transform: "translate({ox},{oy})",

            text {
                class: "story-chart__title",
                x: "{mid_x}",
                y: "-12",
                text_anchor: "middle",
                "{label}"
            }

            g { class: "story-chart__axis story-chart__axis--x",
                transform: "translate(0,{height})",
                line { x1: "0", y1: "0", x2: "{width}", y2: "0", stroke: "currentColor" }
                for tick in x_ticks.into_iter() {
                    g { transform: "translate({tick.offset},0)",
                        line { y2: "6", stroke: "currentColor" }
                        text { y: "18", text_anchor: "middle", "{tick.label}" }
                    }
                }
            }

            g { class: "story-chart__axis story-chart__axis--y",
                line { x1: "0", y1: "0", x2: "0", y2: "{height}", stroke: "currentColor" }
                for tick in y_ticks.into_iter() {
                    g { transform: "translate(0,{tick.offset})",
                        line { x2: "-6", stroke: "currentColor" }
                        text { x: "-9", dy: "0.32em", text_anchor: "end", "{tick.label}" }
                    }
                }
            }

            path {
                class: "story-chart__line",
                d: "{path}",
                fill: "none",
                stroke: "{stroke}",
                stroke_width: "2",
            }

            if empty {
                text {
                    class: "story-chart__empty",
                    x: "{mid_x}",
                    y: "{mid_y}",
                    text_anchor: "middle",
                    {crate::t!("chart-no-readings")}
                }
            }
        }
    }
}
