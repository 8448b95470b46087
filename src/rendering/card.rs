//! Report card layout and rendering
//!
//! [`CardLayout`] is pure geometry: where every string goes, measured with
//! a [`TextMetrics`]. [`CardRenderer`] turns a layout plus the grid image
//! into SVG through a Tera template and rasterizes it with resvg.

use base64::Engine;
use resvg::usvg::{self, fontdb};
use serde::Serialize;
use std::io::Cursor;
use std::sync::Arc;
use swatch_color::Srgb;
use tera::{Context, Tera};
use tiny_skia::{Pixmap, Transform};

use crate::error::RenderError;
use crate::models::{rank_by_allocation, AppConfig, Match};
use crate::rendering::grid::Rotation;
use crate::rendering::text::{FontMetrics, TextMetrics};

const TEMPLATE_NAME: &str = "card.svg";
const TEMPLATE: &str = include_str!("../../templates/card.svg");

/// Leader between a legend name and its share
const LEADER: &str = " . ";
/// Rule drawn under the last share
const CLOSING_RULE: &str = "__";
const CLOSING_TOTAL: &str = "100";

/// Baseline offset from the top of a line, as a fraction of font size
const ASCENT: f32 = 0.8;

/// One positioned string. `y` is the top of its line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextItem {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

impl TextItem {
    fn new(text: impl Into<String>, x: f32, y: f32, size: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            size,
        }
    }
}

/// `name . . . . NN%`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendRow {
    pub name: TextItem,
    pub share: TextItem,
    pub leaders: Vec<TextItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Positions of everything drawn on the card
#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub width: u32,
    pub height: u32,
    pub grid: Placement,
    pub title: Vec<TextItem>,
    pub legend: Vec<LegendRow>,
    /// The `__` rule and the `100` total
    pub closing: Vec<TextItem>,
}

impl CardLayout {
    /// Lay out grid, title and legend.
    ///
    /// The title is upper-cased and centred below the grid. If it is wider
    /// than the card less its margins, it is split once at the middle word
    /// boundary. The legend lists `matches` largest share first.
    pub fn compute(
        config: &AppConfig,
        matches: &[Match],
        title: &str,
        metrics: &dyn TextMetrics,
    ) -> Self {
        let card = &config.card;
        let fonts = &config.fonts;
        let [offset_x, offset_y] = card.grid_offset;

        let grid = Placement {
            x: offset_x as f32,
            y: offset_y as f32,
            width: config.grid.pixel_width().unwrap_or(0) as f32,
            height: config.grid.pixel_height().unwrap_or(0) as f32,
        };

        let card_width = card.width as f32;
        let margin = card.margin as f32;
        let title_top = grid.y + grid.height + margin;
        let title_line_height = metrics.line_height(fonts.header_size);
        let available = card_width - 2.0 * margin;

        let title: Vec<TextItem> = title_lines(title, available, fonts.header_size, metrics)
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                let line_width = metrics.width(&line, fonts.header_size);
                TextItem::new(
                    line,
                    (card_width - line_width) / 2.0,
                    title_top + i as f32 * title_line_height,
                    fonts.header_size,
                )
            })
            .collect();

        let legend_top = title_top + title.len() as f32 * title_line_height + margin;
        let line_height = metrics.line_height(fonts.size);

        let mut ranked = matches.to_vec();
        rank_by_allocation(&mut ranked);

        let legend: Vec<LegendRow> = ranked
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let y = legend_top + i as f32 * line_height;
                legend_row(config, &m.label(), m.allocation, y, metrics)
            })
            .collect();

        let last_top = legend_top + (legend.len() as f32 - 1.0) * line_height;
        let rule_x = card_width - card.table_margin as f32 - metrics.width(CLOSING_RULE, fonts.size);
        let rule_y = last_top + line_height - line_height / 2.0;
        let closing = vec![
            TextItem::new(CLOSING_RULE, rule_x, rule_y, fonts.size),
            TextItem::new(CLOSING_TOTAL, rule_x, rule_y + line_height, fonts.size),
        ];

        Self {
            width: card.width,
            height: card.height,
            grid,
            title,
            legend,
            closing,
        }
    }

    /// Every string on the card, in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &TextItem> {
        self.title
            .iter()
            .chain(
                self.legend
                    .iter()
                    .flat_map(|row| [&row.name, &row.share].into_iter().chain(&row.leaders)),
            )
            .chain(&self.closing)
    }
}

/// One or two title lines; two only when the title is too wide and has
/// at least two words.
fn title_lines(title: &str, available: f32, size: f32, metrics: &dyn TextMetrics) -> Vec<String> {
    let title = title.trim().to_uppercase();
    if title.is_empty() {
        return Vec::new();
    }
    if metrics.width(&title, size) <= available {
        return vec![title];
    }
    let words: Vec<&str> = title.split_whitespace().collect();
    if words.len() < 2 {
        return vec![title];
    }
    let mid = words.len() / 2;
    vec![words[..mid].join(" "), words[mid..].join(" ")]
}

fn legend_row(
    config: &AppConfig,
    name: &str,
    allocation: u32,
    y: f32,
    metrics: &dyn TextMetrics,
) -> LegendRow {
    let size = config.fonts.size;
    let card_width = config.card.width as f32;
    let table_margin = config.card.table_margin as f32;
    let pitch = config.card.leader_pitch.max(1) as f32;

    let share_text = format!("{allocation}%");
    let name_width = metrics.width(name, size);
    let share_width = metrics.width(&share_text, size);
    let share_x = card_width - table_margin - share_width;

    // Leaders start one average character past the name and stop two
    // short of the share.
    let chars = name.chars().count();
    let char_padding = if chars == 0 {
        0.0
    } else {
        (name_width / chars as f32).floor()
    };
    let leader_width = metrics.width(LEADER, size);
    let end = share_x - 2.0 * char_padding;

    let mut leaders = Vec::new();
    if leader_width > 0.0 {
        let mut pos = table_margin + name_width + char_padding;
        let mut previous: Option<f32> = None;
        while pos < end {
            pos = (pos / pitch).round() * pitch;
            // A leader narrower than half the pitch would snap back in place
            if let Some(prev) = previous.filter(|prev| pos <= *prev) {
                pos = prev + pitch;
            }
            leaders.push(TextItem::new(LEADER, pos, y, size));
            previous = Some(pos);
            pos += leader_width;
        }
    }

    LegendRow {
        name: TextItem::new(name, table_margin, y, size),
        share: TextItem::new(share_text, share_x, y, size),
        leaders,
    }
}

/// A full-card image drawn over the background fill
#[derive(Debug, Clone)]
pub struct BackgroundImage {
    pub data: Vec<u8>,
    pub mime: &'static str,
}

#[derive(Serialize)]
struct ImageContext {
    href: String,
    rotation: f32,
}

#[derive(Serialize)]
struct GridContext {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    href: String,
}

#[derive(Serialize)]
struct TextContext<'a> {
    text: &'a str,
    x: f32,
    baseline: f32,
    size: f32,
}

#[derive(Serialize)]
struct CardContext<'a> {
    width: u32,
    height: u32,
    center_x: f32,
    center_y: f32,
    background: String,
    background_image: Option<ImageContext>,
    grid: GridContext,
    font_family: &'a str,
    text_color: String,
    texts: Vec<TextContext<'a>>,
}

/// Draws cards from layouts
pub struct CardRenderer {
    fontdb: Arc<fontdb::Database>,
    tera: Tera,
    font_family: String,
    background: Srgb,
    text_color: Srgb,
}

impl CardRenderer {
    pub fn new(fontdb: Arc<fontdb::Database>, config: &AppConfig) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;

        let background = config.background_color()?;
        let text_color = config.text_color()?;

        Ok(Self {
            fontdb,
            tera,
            font_family: config.fonts.family.clone(),
            background,
            text_color,
        })
    }

    /// Metrics for the card's font family, sharing the render font database
    pub fn metrics(&self) -> FontMetrics {
        FontMetrics::new(self.fontdb.clone(), self.font_family.clone())
    }

    /// Fill the card template.
    pub fn render_svg(
        &self,
        layout: &CardLayout,
        grid_png: &[u8],
        background: Option<(&BackgroundImage, Rotation)>,
    ) -> Result<String, RenderError> {
        let context = CardContext {
            width: layout.width,
            height: layout.height,
            center_x: layout.width as f32 / 2.0,
            center_y: layout.height as f32 / 2.0,
            background: self.background.to_hex(),
            background_image: background.map(|(image, rotation)| ImageContext {
                href: data_uri(image.mime, &image.data),
                rotation: rotation.degrees(),
            }),
            grid: GridContext {
                x: layout.grid.x,
                y: layout.grid.y,
                width: layout.grid.width,
                height: layout.grid.height,
                href: data_uri("image/png", grid_png),
            },
            font_family: &self.font_family,
            text_color: self.text_color.to_hex(),
            texts: layout
                .texts()
                .map(|item| TextContext {
                    text: &item.text,
                    x: item.x,
                    baseline: item.y + item.size * ASCENT,
                    size: item.size,
                })
                .collect(),
        };

        let context = Context::from_serialize(&context)?;
        Ok(self.tera.render(TEMPLATE_NAME, &context)?)
    }

    /// Render the card to a pixmap of the layout's size.
    pub fn render(
        &self,
        layout: &CardLayout,
        grid: &Pixmap,
        background: Option<(&BackgroundImage, Rotation)>,
    ) -> Result<Pixmap, RenderError> {
        let grid_png = grid
            .encode_png()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        let svg = self.render_svg(layout, &grid_png, background)?;
        self.rasterize(svg.as_bytes(), layout.width, layout.height)
    }

    fn rasterize(&self, svg_data: &[u8], width: u32, height: u32) -> Result<Pixmap, RenderError> {
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(svg_data, &options)
            .map_err(|e| RenderError::SvgParse(e.to_string()))?;

        let mut pixmap =
            Pixmap::new(width, height).ok_or(RenderError::UnsupportedDimensions { width, height })?;
        pixmap.fill(tiny_skia::Color::WHITE);
        resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());

        tracing::debug!(width, height, "Rendered card");
        Ok(pixmap)
    }
}

fn data_uri(mime: &str, data: &[u8]) -> String {
    format!(
        "data:{mime};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(data)
    )
}

/// Encode a rendered card as an optimized RGB PNG.
pub fn encode_card_png(card: &Pixmap) -> Result<Vec<u8>, RenderError> {
    let rgb = rgba_to_rgb(card);

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, card.width(), card.height());
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        // Fast settings; oxipng re-compresses
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&rgb)
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
    }
    let png_bytes = buf.into_inner();

    let optimized = oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    )
    .unwrap_or(png_bytes);
    Ok(optimized)
}

/// Flatten a pixmap onto white
fn rgba_to_rgb(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let c = pixel.demultiply();
            let a = u16::from(c.alpha());
            [c.red(), c.green(), c.blue()]
                .map(|v| ((u16::from(v) * a + 255 * (255 - a)) / 255) as u8)
        })
        .collect()
}
