use std::fs;
use std::path::Path;
use std::sync::Arc;

use rand::Rng;
use resvg::usvg::fontdb;
use tiny_skia::Pixmap;

use crate::error::{AssetError, PipelineError, RenderError};
use crate::models::{AppConfig, ColorSample, Match, SampleRecord};
use crate::rendering::{
    encode_card_png, render_grid, BackgroundImage, CardLayout, CardRenderer, GridPlan, Rotation,
    TextMetrics,
};
use crate::services::allocation::allocate;
use crate::services::name_matcher::{match_names, NamedColorSet};
use crate::services::tile_matcher::{match_tiles, TilePool};

/// Result of one run: the final matches and the rendered card
pub struct CardReport {
    /// Named, allocated matches, largest share first
    pub matches: Vec<Match>,
    pub plan: GridPlan,
    pub card: Pixmap,
}

impl CardReport {
    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        encode_card_png(&self.card)
    }
}

/// Runs the stages from dominant colors to a finished card.
///
/// Stages run strictly in order and the first failure ends the run. The
/// tile and name pools are taken by value, so every run drains its own.
pub struct ReportPipeline {
    config: AppConfig,
    renderer: CardRenderer,
    metrics: Box<dyn TextMetrics>,
    background: Option<BackgroundImage>,
}

impl ReportPipeline {
    pub fn new(config: AppConfig, fontdb: Arc<fontdb::Database>) -> Result<Self, PipelineError> {
        config.validate()?;
        let renderer = CardRenderer::new(fontdb, &config)?;
        let metrics = Box::new(renderer.metrics());
        let background = config
            .card
            .background_image
            .as_deref()
            .map(load_background)
            .transpose()?;

        Ok(Self {
            config,
            renderer,
            metrics,
            background,
        })
    }

    /// Replace the font-backed text measurement
    pub fn with_metrics(mut self, metrics: impl TextMetrics + 'static) -> Self {
        self.metrics = Box::new(metrics);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Match, allocate, name, lay out and draw.
    ///
    /// `samples` are matched to tiles in the order given. `rng` drives
    /// the cosmetic rotations only.
    pub fn run<R: Rng + ?Sized>(
        &self,
        samples: &[ColorSample],
        mut tiles: TilePool,
        mut names: NamedColorSet,
        title: &str,
        rng: &mut R,
    ) -> Result<CardReport, PipelineError> {
        let metric = self.config.metric();
        let grid_config = &self.config.grid;

        let matches = match_tiles(samples, &mut tiles, metric)?;
        let matches = allocate(matches)?;
        let matches = match_names(matches, &mut names, metric)?;

        let plan = GridPlan::build(&matches, grid_config.width, grid_config.height, rng)?;
        let grid = render_grid(&plan, &matches, grid_config.tile_width)?;

        let layout = CardLayout::compute(&self.config, &matches, title, self.metrics.as_ref());
        let background = self
            .background
            .as_ref()
            .map(|image| (image, Rotation::pick(&Rotation::FLIPS, rng)));
        let card = self.renderer.render(&layout, &grid, background)?;

        for m in &matches {
            tracing::info!(
                name = %m.label(),
                allocation = m.allocation,
                tile = %m.tile.path.display(),
                "Card entry"
            );
        }
        tracing::info!(
            colors = matches.len(),
            tiles_left = tiles.len(),
            names_left = names.len(),
            "Report card rendered"
        );

        Ok(CardReport {
            matches,
            plan,
            card,
        })
    }
}

/// Read dominant colors from a JSON array of `{"rgb": [r, g, b], "count": n}`.
///
/// A channel outside 0..=255 fails the whole file with
/// [`PipelineError::InvalidColor`].
pub fn load_samples(path: &Path) -> Result<Vec<ColorSample>, PipelineError> {
    let data = fs::read(path).map_err(|source| AssetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<SampleRecord> = serde_json::from_slice(&data).map_err(AssetError::from)?;
    let samples = records
        .into_iter()
        .map(ColorSample::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    tracing::info!(path = %path.display(), samples = samples.len(), "Loaded color samples");
    Ok(samples)
}

fn load_background(path: &Path) -> Result<BackgroundImage, AssetError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let mime = match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => {
            return Err(AssetError::Decode {
                path: path.to_path_buf(),
                reason: "background image must be PNG or JPEG".to_string(),
            })
        }
    };
    let data = fs::read(path).map_err(|source| AssetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "Loaded background image");
    Ok(BackgroundImage { data, mime })
}
