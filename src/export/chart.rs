//! Static PNG chart of a finished session.
//!
//! Successful probes are drawn as a connected latency line with point markers,
//! failed probes as red crosses on the x axis. Dashed reference lines and a
//! small annotation box show min / avg / max. Shapes come from `imageproc`;
//! text uses a built-in 3x5 bitmap font so no font file ships with the binary.

use image::{ImageFormat, ImageResult, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use std::path::Path;

use crate::state::{RunningStatistics, Session};

pub const CHART_WIDTH: u32 = 1200;
pub const CHART_HEIGHT: u32 = 600;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const PLOT_BACKGROUND: Rgb<u8> = Rgb([234, 234, 242]);
const GRID: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([90, 90, 90]);
const TEXT: Rgb<u8> = Rgb([40, 40, 40]);
pub const REPLY_COLOR: Rgb<u8> = Rgb([30, 144, 255]);
pub const LOST_COLOR: Rgb<u8> = Rgb([220, 20, 60]);
const MIN_COLOR: Rgb<u8> = Rgb([46, 139, 87]);
const AVG_COLOR: Rgb<u8> = Rgb([255, 140, 0]);
const MAX_COLOR: Rgb<u8> = Rgb([178, 34, 34]);
const NOTE_BACKGROUND: Rgb<u8> = Rgb([245, 222, 179]);

const MARGIN_LEFT: i64 = 100;
const MARGIN_RIGHT: i64 = 30;
const MARGIN_TOP: i64 = 70;
const MARGIN_BOTTOM: i64 = 70;

/// 3x5 glyphs, one row per byte, leftmost pixel in bit 2
fn glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        '#' => [0b101, 0b111, 0b101, 0b111, 0b101],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        _ => [0; 5],
    }
}

/// Pixel width of `text` drawn at `scale`
fn text_width(text: &str, scale: i64) -> i64 {
    let chars = text.chars().count() as i64;
    if chars == 0 { 0 } else { chars * 4 * scale - scale }
}

struct Canvas {
    img: RgbImage,
}

impl Canvas {
    fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self {
            img: RgbImage::from_pixel(width, height, background),
        }
    }

    fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
        if x1 < x0 || y1 < y0 {
            return;
        }
        let rect = Rect::at(x0 as i32, y0 as i32).of_size((x1 - x0 + 1) as u32, (y1 - y0 + 1) as u32);
        draw_filled_rect_mut(&mut self.img, rect, color);
    }

    /// Line drawn `thickness` times, shifted one pixel across the stroke each pass
    fn line(&mut self, from: (i64, i64), to: (i64, i64), color: Rgb<u8>, thickness: i64) {
        let steep = (to.1 - from.1).abs() > (to.0 - from.0).abs();
        for offset in 0..thickness.max(1) {
            let shift = (offset - thickness / 2) as f32;
            let (dx, dy) = if steep { (shift, 0.0) } else { (0.0, shift) };
            draw_line_segment_mut(
                &mut self.img,
                (from.0 as f32 + dx, from.1 as f32 + dy),
                (to.0 as f32 + dx, to.1 as f32 + dy),
                color,
            );
        }
    }

    fn dashed_hline(&mut self, x0: i64, x1: i64, y: i64, color: Rgb<u8>) {
        let mut x = x0;
        while x <= x1 {
            self.fill_rect(x, y, (x + 9).min(x1), y + 1, color);
            x += 20;
        }
    }

    fn disc(&mut self, cx: i64, cy: i64, radius: i64, color: Rgb<u8>) {
        draw_filled_circle_mut(&mut self.img, (cx as i32, cy as i32), radius as i32, color);
    }

    fn cross(&mut self, cx: i64, cy: i64, radius: i64, color: Rgb<u8>) {
        self.line((cx - radius, cy - radius), (cx + radius, cy + radius), color, 3);
        self.line((cx - radius, cy + radius), (cx + radius, cy - radius), color, 3);
    }

    fn text(&mut self, x: i64, y: i64, text: &str, scale: i64, color: Rgb<u8>) {
        let mut cursor = x;
        for c in text.chars() {
            for (row, bits) in glyph(c).iter().enumerate() {
                for col in 0..3 {
                    if bits & (0b100 >> col) != 0 {
                        let px = cursor + col * scale;
                        let py = y + row as i64 * scale;
                        self.fill_rect(px, py, px + scale - 1, py + scale - 1, color);
                    }
                }
            }
            cursor += 4 * scale;
        }
    }
}

/// Maps data coordinates onto the plot rectangle
struct PlotArea {
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
    x_min: f64,
    x_max: f64,
    y_max: f64,
}

impl PlotArea {
    fn px(&self, x: f64) -> i64 {
        let span = (self.x_max - self.x_min).max(f64::EPSILON);
        self.left + ((x - self.x_min) / span * (self.right - self.left) as f64).round() as i64
    }

    fn py(&self, y: f64) -> i64 {
        let span = self.y_max.max(f64::EPSILON);
        self.bottom - (y.clamp(0.0, span) / span * (self.bottom - self.top) as f64).round() as i64
    }
}

/// Spacing between x tick labels so at most ~12 are drawn
fn x_tick_step(probes: u64) -> u64 {
    probes.div_ceil(12).max(1)
}

/// Draw the session chart in memory
pub fn render_chart(session: &Session) -> RgbImage {
    let stats = RunningStatistics::compute(session.snapshot());
    let probes = session.len() as u64;

    let mut canvas = Canvas::new(CHART_WIDTH, CHART_HEIGHT, BACKGROUND);
    let plot = PlotArea {
        left: MARGIN_LEFT,
        top: MARGIN_TOP,
        right: CHART_WIDTH as i64 - MARGIN_RIGHT,
        bottom: CHART_HEIGHT as i64 - MARGIN_BOTTOM,
        x_min: 0.5,
        x_max: probes.max(1) as f64 + 0.5,
        y_max: stats.plot_ceiling(),
    };

    canvas.fill_rect(plot.left, plot.top, plot.right, plot.bottom, PLOT_BACKGROUND);

    // Horizontal grid with y labels
    for i in 0..=5 {
        let value = plot.y_max * i as f64 / 5.0;
        let y = plot.py(value);
        canvas.line((plot.left, y), (plot.right, y), GRID, 1);
        let label = format!("{:.1}", value);
        canvas.text(plot.left - 10 - text_width(&label, 2), y - 5, &label, 2, TEXT);
    }

    // Vertical grid with x labels
    let step = x_tick_step(probes);
    let mut seq = 1;
    while seq <= probes {
        let x = plot.px(seq as f64);
        canvas.line((x, plot.top), (x, plot.bottom), GRID, 1);
        let label = seq.to_string();
        canvas.text(x - text_width(&label, 2) / 2, plot.bottom + 10, &label, 2, TEXT);
        seq += step;
    }

    // Axes
    canvas.line((plot.left, plot.bottom), (plot.right, plot.bottom), AXIS, 2);
    canvas.line((plot.left, plot.top), (plot.left, plot.bottom), AXIS, 2);

    // Titles
    let title = format!("Ping analysis: {}", session.target);
    let title_x = (CHART_WIDTH as i64 - text_width(&title, 4)) / 2;
    canvas.text(title_x, 20, &title, 4, TEXT);
    let x_title = "Probe #";
    canvas.text(
        (plot.left + plot.right - text_width(x_title, 3)) / 2,
        plot.bottom + 35,
        x_title,
        3,
        TEXT,
    );
    canvas.text(10, plot.top - 20, "Latency (ms)", 2, TEXT);

    // Reference lines
    for (value, color) in [
        (stats.min_ms, MIN_COLOR),
        (stats.avg_ms, AVG_COLOR),
        (stats.max_ms, MAX_COLOR),
    ] {
        if let Some(ms) = value {
            canvas.dashed_hline(plot.left, plot.right, plot.py(ms), color);
        }
    }

    // Latency line and markers
    let replies: Vec<(i64, i64)> = session
        .snapshot()
        .iter()
        .filter_map(|o| o.latency_ms.map(|ms| (plot.px(o.sequence as f64), plot.py(ms))))
        .collect();
    for pair in replies.windows(2) {
        canvas.line(pair[0], pair[1], REPLY_COLOR, 2);
    }
    for &(x, y) in &replies {
        canvas.disc(x, y, 4, REPLY_COLOR);
    }

    // Failed probes on the x axis
    for outcome in session.snapshot().iter().filter(|o| !o.is_success()) {
        canvas.cross(plot.px(outcome.sequence as f64), plot.py(0.0), 7, LOST_COLOR);
    }

    // Legend, top left inside the plot
    let lx = plot.left + 15;
    let ly = plot.top + 15;
    canvas.line((lx, ly + 5), (lx + 30, ly + 5), REPLY_COLOR, 2);
    canvas.disc(lx + 15, ly + 5, 4, REPLY_COLOR);
    canvas.text(lx + 40, ly, "Reply", 2, TEXT);
    canvas.cross(lx + 15, ly + 30, 6, LOST_COLOR);
    canvas.text(lx + 40, ly + 25, "Lost", 2, TEXT);

    // Annotation box, top right inside the plot
    if let (Some(min), Some(avg), Some(max)) = (stats.min_ms, stats.avg_ms, stats.max_ms) {
        let notes = [
            (format!("Avg: {:.2} ms", avg), AVG_COLOR),
            (format!("Min: {:.2} ms", min), MIN_COLOR),
            (format!("Max: {:.2} ms", max), MAX_COLOR),
        ];
        let width = notes
            .iter()
            .map(|(text, _)| text_width(text, 2))
            .max()
            .unwrap_or(0)
            + 40;
        let height = notes.len() as i64 * 20 + 16;
        let bx = plot.right - width - 15;
        let by = plot.top + 15;
        canvas.fill_rect(bx, by, bx + width, by + height, NOTE_BACKGROUND);
        for (i, (text, color)) in notes.iter().enumerate() {
            let y = by + 10 + i as i64 * 20;
            canvas.fill_rect(bx + 10, y + 2, bx + 22, y + 7, *color);
            canvas.text(bx + 30, y, text, 2, TEXT);
        }
    }

    canvas.img
}

/// Render the chart and save it as PNG
pub fn save_chart(session: &Session, path: &Path) -> ImageResult<()> {
    render_chart(session).save_with_format(path, ImageFormat::Png)
}
