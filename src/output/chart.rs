// Grouped bar chart of topic rates, written as a PNG.
//
// One group of bars per topic, one bar per party inside each group, colored
// by party. Drawing is done in pixel space on the bitmap backend so that
// text can be skipped entirely when no font is available.
//
// The image is drawn into a hidden sibling file and renamed over the target
// only after it has been fully written.

use std::collections::HashMap;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex};

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{register_font, FontTransform};
use tracing::{debug, info};

use crate::config::{FALLBACK_COLORS, PARTY_COLORS};
use crate::error::{AnalysisError, Result};
use crate::topics::FrequencyTable;

/// Family name the label font is registered under.
const CHART_FONT: &str = "manifesto-sans";

/// Font files already read, by path. The font registry needs 'static bytes,
/// so each file is leaked at most once per process.
static FONT_BYTES: LazyLock<Mutex<HashMap<PathBuf, &'static [u8]>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn font_bytes(path: &Path) -> Result<&'static [u8]> {
    let mut cache = FONT_BYTES.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(bytes) = cache.get(path) {
        return Ok(*bytes);
    }
    let bytes = std::fs::read(path).map_err(|e| {
        AnalysisError::Config(format!("cannot read font {}: {e}", path.display()))
    })?;
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    cache.insert(path.to_path_buf(), bytes);
    Ok(bytes)
}

/// Parse a `#rrggbb` color.
pub fn parse_hex_color(hex: &str) -> Result<RGBColor> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AnalysisError::Config(format!(
            "invalid color {hex:?}, expected #rrggbb"
        )));
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);
    match (channel(0), channel(2), channel(4)) {
        (Ok(r), Ok(g), Ok(b)) => Ok(RGBColor(r, g, b)),
        _ => Err(AnalysisError::Config(format!("invalid color {hex:?}"))),
    }
}

/// Document id to bar color.
#[derive(Debug, Clone)]
pub struct PartyPalette {
    colors: Vec<(String, RGBColor)>,
    fallback: Vec<RGBColor>,
}

impl PartyPalette {
    /// Build a palette from `(id, "#rrggbb")` pairs plus fallback colors for
    /// documents that have no entry.
    pub fn from_hex<I, K, V>(colors: I, fallback: &[&str]) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let colors = colors
            .into_iter()
            .map(|(id, hex)| Ok((id.into(), parse_hex_color(hex.as_ref())?)))
            .collect::<Result<Vec<_>>>()?;
        let fallback = fallback
            .iter()
            .map(|hex| parse_hex_color(hex))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { colors, fallback })
    }

    /// The UK party colors.
    pub fn standard() -> Result<Self> {
        Self::from_hex(PARTY_COLORS, &FALLBACK_COLORS)
    }

    /// Color for the document in row `index`.
    pub fn color_for(&self, document: &str, index: usize) -> RGBColor {
        self.colors
            .iter()
            .find(|(id, _)| id == document)
            .map(|(_, color)| *color)
            .or_else(|| {
                (!self.fallback.is_empty()).then(|| self.fallback[index % self.fallback.len()])
            })
            .unwrap_or(RGBColor(128, 128, 128))
    }
}

/// Image size and colors.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub spine: RGBColor,
    pub text: RGBColor,
    pub title: String,
    pub y_label: [String; 2],
    pub x_label: String,
    pub source: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 2500,
            height: 1200,
            background: RGBColor(0x2e, 0x2e, 0x2e),
            spine: RGBColor(0x44, 0x44, 0x44),
            text: WHITE,
            title: "What UK Political Parties Emphasise in Their Manifestos?".to_string(),
            y_label: [
                "Number of topic-specific words used".to_string(),
                "per 1000 words in party manifesto".to_string(),
            ],
            x_label: "Topics".to_string(),
            source: "Source: UK party manifestos taken from party websites".to_string(),
        }
    }
}

/// Bar positions in data units.
///
/// Bar `p` of topic `t` sits at `p + (parties + 2) * t` and is one unit wide,
/// leaving a two-bar gap between groups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupLayout {
    pub parties: usize,
    pub topics: usize,
}

impl GroupLayout {
    pub fn new(parties: usize, topics: usize) -> Self {
        Self { parties, topics }
    }

    fn stride(&self) -> usize {
        self.parties + 2
    }

    pub fn bar_x(&self, party: usize, topic: usize) -> f64 {
        (party + self.stride() * topic) as f64
    }

    pub fn group_center(&self, topic: usize) -> f64 {
        (self.stride() * topic) as f64 + (self.parties as f64 - 1.0) / 2.0
    }

    /// Visible x range: one unit of padding on the left, the trailing
    /// group gap trimmed on the right.
    pub fn x_range(&self) -> (f64, f64) {
        (-1.0, (self.stride() * self.topics) as f64 - 2.0)
    }
}

/// Pick a y-axis ceiling and tick step (1, 2 or 5 times a power of ten)
/// that leaves a little headroom above `max`.
pub fn nice_axis(max: f64) -> (f64, f64) {
    if max <= 0.0 || !max.is_finite() {
        return (1.0, 0.2);
    }
    let raw_step = max * 1.05 / 5.0;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw_step)
        .unwrap_or(10.0 * magnitude);
    let ceiling = (max * 1.05 / step).ceil() * step;
    (ceiling, step)
}

fn tick_label(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 {
        0
    } else {
        (-step.log10().floor()) as usize
    };
    format!("{value:.decimals$}")
}

/// Pixel rectangle of the plotting area and the data ranges mapped onto it.
struct PlotFrame {
    left: i32,
    right: i32,
    top: i32,
    bottom: i32,
    x_min: f64,
    x_max: f64,
    y_max: f64,
}

impl PlotFrame {
    fn new(width: u32, height: u32, layout: &GroupLayout, y_max: f64) -> Self {
        let (w, h) = (width as f64, height as f64);
        let (x_min, x_max) = layout.x_range();
        Self {
            left: (w * 0.095) as i32,
            right: (w * 0.97) as i32,
            top: (h * 0.20) as i32,
            bottom: (h * 0.86) as i32,
            x_min,
            x_max,
            y_max,
        }
    }

    fn x(&self, value: f64) -> i32 {
        let span = (self.right - self.left) as f64;
        self.left + ((value - self.x_min) / (self.x_max - self.x_min) * span).round() as i32
    }

    fn y(&self, value: f64) -> i32 {
        let span = (self.bottom - self.top) as f64;
        self.bottom - (value / self.y_max * span).round() as i32
    }

    fn width(&self) -> i32 {
        self.right - self.left
    }
}

fn render_error(path: &Path, err: impl Display) -> AnalysisError {
    AnalysisError::Render {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Hidden sibling of `output` with the same extension, so the bitmap
/// encoder still picks the right format.
fn partial_path(output: &Path) -> Result<PathBuf> {
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| render_error(output, "output path has no file name"))?;
    let ext = output.extension().and_then(|e| e.to_str()).unwrap_or("png");
    Ok(output.with_file_name(format!(".{stem}.partial.{ext}")))
}

/// Draws frequency tables as grouped bar charts.
pub struct ChartRenderer {
    style: ChartStyle,
    labels: bool,
}

impl ChartRenderer {
    /// A renderer that draws bars, axes and legend swatches but no text.
    /// Call `with_font` to enable labels.
    pub fn new(style: ChartStyle) -> Self {
        Self {
            style,
            labels: false,
        }
    }

    /// Load a TrueType font for titles, ticks and the legend.
    pub fn with_font(mut self, path: &Path) -> Result<Self> {
        let bytes = font_bytes(path)?;
        register_font(CHART_FONT, FontStyle::Normal, bytes).map_err(|_| {
            AnalysisError::Config(format!("{} is not a usable TrueType font", path.display()))
        })?;
        debug!(font = %path.display(), "Registered chart font");
        self.labels = true;
        Ok(self)
    }

    pub fn has_labels(&self) -> bool {
        self.labels
    }

    /// Render `table` to `output`.
    ///
    /// On any failure the target is left untouched and no temporary file
    /// remains.
    pub fn render(&self, table: &FrequencyTable, palette: &PartyPalette, output: &Path) -> Result<()> {
        if table.rows.is_empty() || table.topics.is_empty() {
            return Err(render_error(output, "nothing to draw: the table has no rows or no topics"));
        }

        let partial = partial_path(output)?;
        let written = self
            .draw(table, palette, &partial)
            .and_then(|()| std::fs::rename(&partial, output).map_err(|e| render_error(output, e)));

        if let Err(e) = written {
            let _ = std::fs::remove_file(&partial);
            return Err(match e {
                AnalysisError::Render { message, .. } => render_error(output, message),
                other => other,
            });
        }

        info!(path = %output.display(), documents = table.rows.len(), "Wrote chart");
        Ok(())
    }

    fn text_style(&self, size: f64, pos: Pos) -> TextStyle<'_> {
        let scale = self.style.height as f64 / 1200.0;
        FontDesc::new(FontFamily::Name(CHART_FONT), size * scale, FontStyle::Normal)
            .color(&self.style.text)
            .pos(pos)
    }

    fn draw(&self, table: &FrequencyTable, palette: &PartyPalette, path: &Path) -> Result<()> {
        let style = &self.style;
        let (w, h) = (style.width as i32, style.height as i32);
        let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
        let fail = |e: DrawingAreaErrorKind<_>| render_error(path, e);

        root.fill(&style.background).map_err(fail)?;

        let layout = GroupLayout::new(table.rows.len(), table.topics.len());
        let (y_max, step) = nice_axis(table.max_rate());
        let frame = PlotFrame::new(style.width, style.height, &layout, y_max);

        // Bars
        for (t, topic) in table.topics.iter().enumerate() {
            for (p, row) in table.rows.iter().enumerate() {
                let rate = row.rate(topic).unwrap_or(0.0);
                let x = layout.bar_x(p, t);
                let color = palette.color_for(&row.document, p);
                root.draw(&Rectangle::new(
                    [(frame.x(x - 0.5), frame.y(rate)), (frame.x(x + 0.5), frame.y(0.0))],
                    color.filled(),
                ))
                .map_err(fail)?;
            }
        }

        // Spines
        root.draw(&Rectangle::new(
            [(frame.left, frame.top), (frame.right, frame.bottom)],
            style.spine.stroke_width(2),
        ))
        .map_err(fail)?;

        // Y ticks
        let tick_len = (h / 120).max(4);
        let ticks = (y_max / step).round() as usize;
        for i in 0..=ticks {
            let value = step * i as f64;
            let y = frame.y(value);
            root.draw(&PathElement::new(
                vec![(frame.left - tick_len, y), (frame.left, y)],
                style.text.stroke_width(2),
            ))
            .map_err(fail)?;
            if self.labels {
                root.draw(&Text::new(
                    tick_label(value, step),
                    (frame.left - 2 * tick_len, y),
                    self.text_style(28.0, Pos::new(HPos::Right, VPos::Center)),
                ))
                .map_err(fail)?;
            }
        }

        // X ticks, one per topic group
        for (t, topic) in table.topics.iter().enumerate() {
            let x = frame.x(layout.group_center(t));
            root.draw(&PathElement::new(
                vec![(x, frame.bottom), (x, frame.bottom + tick_len)],
                style.text.stroke_width(2),
            ))
            .map_err(fail)?;
            if self.labels {
                root.draw(&Text::new(
                    topic.clone(),
                    (x, frame.bottom + 2 * tick_len),
                    self.text_style(32.0, Pos::new(HPos::Center, VPos::Top)),
                ))
                .map_err(fail)?;
            }
        }

        // Legend: one swatch per party, spread across the plot width above it
        let legend_y = (h as f64 * 0.14) as i32;
        let slot = frame.width() / layout.parties as i32;
        let swatch = (slot / 5).clamp(10, 60);
        for (p, row) in table.rows.iter().enumerate() {
            let center = frame.left + slot * p as i32 + slot / 2;
            let color = palette.color_for(&row.document, p);
            root.draw(&PathElement::new(
                vec![(center - swatch - 10, legend_y), (center - 10, legend_y)],
                color.stroke_width((h / 100).max(4) as u32),
            ))
            .map_err(fail)?;
            if self.labels {
                root.draw(&Text::new(
                    row.document.clone(),
                    (center, legend_y),
                    self.text_style(32.0, Pos::new(HPos::Left, VPos::Center)),
                ))
                .map_err(fail)?;
            }
        }

        if self.labels {
            root.draw(&Text::new(
                style.title.clone(),
                (frame.left, (h as f64 * 0.05) as i32),
                self.text_style(48.0, Pos::new(HPos::Left, VPos::Center)),
            ))
            .map_err(fail)?;

            let mid_y = (frame.top + frame.bottom) / 2;
            let label_x = (w as f64 * 0.03) as i32;
            for (line, text) in style.y_label.iter().enumerate() {
                root.draw(&Text::new(
                    text.clone(),
                    (label_x + line as i32 * (h / 30), mid_y),
                    self.text_style(30.0, Pos::new(HPos::Center, VPos::Center))
                        .transform(FontTransform::Rotate270),
                ))
                .map_err(fail)?;
            }

            root.draw(&Text::new(
                style.x_label.clone(),
                ((frame.left + frame.right) / 2, (h as f64 * 0.925) as i32),
                self.text_style(32.0, Pos::new(HPos::Center, VPos::Center)),
            ))
            .map_err(fail)?;

            root.draw(&Text::new(
                style.source.clone(),
                ((w as f64 * 0.01) as i32, (h as f64 * 0.975) as i32),
                self.text_style(18.0, Pos::new(HPos::Left, VPos::Center)),
            ))
            .map_err(fail)?;
        }

        root.present().map_err(fail)?;
        Ok(())
    }
}
