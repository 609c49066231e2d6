//! SVG chart adapter.
//!
//! Renders close price, both moving averages, and buy/sell markers as a
//! standalone SVG document. Pure consumer of run output: bars, frame, and
//! signal events go in, an image file comes out.

use std::fs;
use std::path::Path;

use crate::domain::error::TrendsigError;
use crate::domain::indicator::IndicatorFrame;
use crate::domain::ohlcv::PriceBar;
use crate::domain::signal::{Signal, SignalEvent};
use crate::ports::chart_port::ChartPort;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 400.0;
const PADDING: f64 = 50.0;

#[derive(Debug, Default)]
pub struct SvgChartAdapter;

impl SvgChartAdapter {
    pub fn new() -> Self {
        SvgChartAdapter
    }
}

struct Scale {
    min_y: f64,
    scale_x: f64,
    scale_y: f64,
}

impl Scale {
    fn fit(bars: &[PriceBar], frame: &IndicatorFrame) -> Scale {
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for (i, bar) in bars.iter().enumerate() {
            for value in [
                Some(bar.close),
                frame.ma_short.get(i).copied().flatten(),
                frame.ma_long.get(i).copied().flatten(),
            ]
            .into_iter()
            .flatten()
            {
                min_y = min_y.min(value);
                max_y = max_y.max(value);
            }
        }

        let range = max_y - min_y;
        Scale {
            min_y,
            scale_x: if bars.len() > 1 {
                (WIDTH - 2.0 * PADDING) / (bars.len() - 1) as f64
            } else {
                0.0
            },
            scale_y: if range > 0.0 {
                (HEIGHT - 2.0 * PADDING) / range
            } else {
                1.0
            },
        }
    }

    fn x(&self, index: usize) -> f64 {
        PADDING + index as f64 * self.scale_x
    }

    fn y(&self, value: f64) -> f64 {
        HEIGHT - PADDING - (value - self.min_y) * self.scale_y
    }
}

fn polyline(points: &[(f64, f64)], color: &str) -> String {
    if points.is_empty() {
        return String::new();
    }
    let coords: Vec<String> = points
        .iter()
        .map(|(x, y)| format!("{:.1},{:.1}", x, y))
        .collect();
    format!(
        r#"  <polyline fill="none" stroke="{}" stroke-width="1.5" points="{}"/>
"#,
        color,
        coords.join(" ")
    )
}

fn marker(x: f64, y: f64, signal: Signal) -> String {
    // triangles: apex up for buys below the price point, apex down for sells above it
    match signal {
        Signal::Buy => format!(
            r#"  <path d="M {:.1} {:.1} l -5 10 l 10 0 z" fill="green"/>
"#,
            x,
            y + 4.0
        ),
        Signal::Sell => format!(
            r#"  <path d="M {:.1} {:.1} l -5 -10 l 10 0 z" fill="red"/>
"#,
            x,
            y - 4.0
        ),
        Signal::Hold => String::new(),
    }
}

impl ChartPort for SvgChartAdapter {
    fn render(
        &self,
        symbol: &str,
        bars: &[PriceBar],
        frame: &IndicatorFrame,
        signals: &[SignalEvent],
        output: &Path,
    ) -> Result<(), TrendsigError> {
        if bars.is_empty() {
            return Err(TrendsigError::Chart {
                reason: format!("no bars to chart for {}", symbol),
            });
        }

        let scale = Scale::fit(bars, frame);

        let closes: Vec<(f64, f64)> = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| (scale.x(i), scale.y(bar.close)))
            .collect();

        let ma_points = |column: &[Option<f64>]| -> Vec<(f64, f64)> {
            column
                .iter()
                .enumerate()
                .filter_map(|(i, v)| v.map(|value| (scale.x(i), scale.y(value))))
                .collect()
        };

        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
  <rect width="{w}" height="{h}" fill="white"/>
  <text x="{tx}" y="25" font-family="sans-serif" font-size="16" text-anchor="middle">{symbol}</text>
  <line x1="{p}" y1="{p}" x2="{p}" y2="{yb}" stroke="black" stroke-width="1"/>
  <line x1="{p}" y1="{yb}" x2="{xr}" y2="{yb}" stroke="black" stroke-width="1"/>
"#,
            w = WIDTH,
            h = HEIGHT,
            tx = WIDTH / 2.0,
            p = PADDING,
            yb = HEIGHT - PADDING,
            xr = WIDTH - PADDING,
            symbol = symbol,
        ));

        svg.push_str(&polyline(&closes, "steelblue"));
        svg.push_str(&polyline(&ma_points(&frame.ma_short), "orange"));
        svg.push_str(&polyline(&ma_points(&frame.ma_long), "firebrick"));

        for (i, event) in signals.iter().enumerate().take(bars.len()) {
            svg.push_str(&marker(scale.x(i), scale.y(bars[i].close), event.signal));
        }

        svg.push_str("</svg>\n");

        fs::write(output, svg).map_err(|e| TrendsigError::Chart {
            reason: format!("failed to write {}: {}", output.display(), e),
        })
    }
}
