use resvg::usvg::{self, fontdb};
use std::sync::Arc;

/// Measures strings for card layout.
pub trait TextMetrics {
    /// Horizontal advance of `text` at `size` px, including leading and
    /// trailing spaces.
    fn width(&self, text: &str, size: f32) -> f32;

    /// Height of one line of text at `size` px.
    fn line_height(&self, size: f32) -> f32;
}

/// Build the font database shared by measuring and rendering.
///
/// Extra fonts are loaded first, system fonts after as fallback.
pub fn load_fonts(fonts: Vec<(String, Vec<u8>)>) -> Arc<fontdb::Database> {
    let mut db = fontdb::Database::new();

    for (name, data) in fonts {
        db.load_font_data(data);
        tracing::debug!(font = %name, "Loaded font");
    }
    db.load_system_fonts();

    tracing::info!(font_count = db.len(), "Loaded fonts for card text");
    Arc::new(db)
}

/// [`TextMetrics`] backed by real font outlines.
///
/// Each measurement lays the string out as an SVG `<text>` element with
/// `usvg` and reads back the ink extents. When the family cannot be
/// resolved nothing is laid out and every width is zero.
#[derive(Clone)]
pub struct FontMetrics {
    fontdb: Arc<fontdb::Database>,
    family: String,
}

/// Ink between two bars: brackets keep spaces at either end measurable.
const BAR: &str = "|";

/// Cap height plus descenders
const LINE_SAMPLE: &str = "Aygj";

impl FontMetrics {
    pub fn new(fontdb: Arc<fontdb::Database>, family: impl Into<String>) -> Self {
        Self {
            fontdb,
            family: family.into(),
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// Ink bounding box (width, height) of `text`.
    fn ink_extent(&self, text: &str, size: f32) -> (f32, f32) {
        if text.is_empty() {
            return (0.0, 0.0);
        }
        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}"><text x="0" y="{size}" font-family="{family}" font-size="{size}" xml:space="preserve">{text}</text></svg>"#,
            w = (size * 4.0).max(1.0) * (text.chars().count() as f32 + 1.0),
            h = (size * 2.0).max(1.0),
            family = xml_escape(&self.family),
            text = xml_escape(text),
        );
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        match usvg::Tree::from_str(&svg, &options) {
            Ok(tree) if tree.root().has_children() => {
                let bbox = tree.root().abs_bounding_box();
                (bbox.width(), bbox.height())
            }
            Ok(_) => (0.0, 0.0),
            Err(e) => {
                tracing::warn!(%e, "Failed to lay out text for measuring");
                (0.0, 0.0)
            }
        }
    }
}

impl TextMetrics for FontMetrics {
    fn width(&self, text: &str, size: f32) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        let (bracketed, _) = self.ink_extent(&format!("{BAR}{text}{BAR}"), size);
        let (bars, _) = self.ink_extent(&format!("{BAR}{BAR}"), size);
        (bracketed - bars).max(0.0)
    }

    fn line_height(&self, size: f32) -> f32 {
        let (_, height) = self.ink_extent(LINE_SAMPLE, size);
        if height > 0.0 {
            height
        } else {
            size
        }
    }
}

/// Escape text for use inside SVG markup
pub(crate) fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Every character advances by half the font size; lines are one
    /// font size tall.
    pub struct FixedMetrics;

    impl TextMetrics for FixedMetrics {
        fn width(&self, text: &str, size: f32) -> f32 {
            text.chars().count() as f32 * size * 0.5
        }

        fn line_height(&self, size: f32) -> f32 {
            size
        }
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(
            xml_escape(r#"Salt & "Pepper" <b>"#),
            "Salt &amp; &quot;Pepper&quot; &lt;b&gt;"
        );
    }

    #[test]
    fn test_unknown_family_measures_zero() {
        let metrics = FontMetrics::new(Arc::new(fontdb::Database::new()), "No Such Font");
        assert_eq!(metrics.width("Crimson", 20.0), 0.0);
        assert_eq!(metrics.line_height(20.0), 20.0);
        assert_eq!(metrics.family(), "No Such Font");
    }

    #[test]
    fn test_system_font_widths_are_monotonic() {
        let db = load_fonts(Vec::new());
        let Some(family) = db
            .faces()
            .find_map(|face| face.families.first().map(|(name, _)| name.clone()))
        else {
            // No fonts installed; nothing to measure against
            return;
        };
        let metrics = FontMetrics::new(db, family);

        let short = metrics.width("Red", 20.0);
        if short == 0.0 {
            // First family has no Latin glyphs
            return;
        }
        let long = metrics.width("Red Violet", 20.0);
        assert!(long > short);
        // Spaces at the ends count toward the advance
        assert!(metrics.width(" . ", 20.0) > metrics.width(".", 20.0));
        assert!(metrics.width("Red", 40.0) > short);
        assert!(metrics.line_height(20.0) > 0.0);
    }
}
