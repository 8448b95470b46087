//! Test application factory for integration tests.

use rand::rngs::StdRng;
use rand::SeedableRng;
use resvg::usvg::fontdb;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use swatchcard::error::PipelineError;
use swatchcard::models::{AppConfig, ColorSample};
use swatchcard::rendering::TextMetrics;
use swatchcard::services::{CardReport, NamedColorSet, ReportPipeline, TilePool};

use super::fixtures;

/// Font-independent text measurement: every character is half the font
/// size wide, every line one font size tall.
pub struct StubMetrics;

impl TextMetrics for StubMetrics {
    fn width(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * 0.5
    }

    fn line_height(&self, size: f32) -> f32 {
        size
    }
}

/// A tile directory and name file on disk plus a pipeline to run against
/// them
pub struct TestApp {
    dir: TempDir,
    pub config: AppConfig,
}

impl TestApp {
    /// Scenario tiles and names with the default configuration
    pub fn new() -> Self {
        Self::with_pools(&fixtures::tiles::ALL, &fixtures::names::ALL)
    }

    pub fn with_pools(tiles: &[(&str, [u8; 3])], names: &[(&str, [u8; 3])]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("tiles")).unwrap();
        fixtures::write_tiles(&dir.path().join("tiles"), tiles);
        std::fs::write(dir.path().join("colors.json"), fixtures::names_json(names)).unwrap();

        Self {
            dir,
            config: AppConfig::default(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn tiles_dir(&self) -> PathBuf {
        self.dir.path().join("tiles")
    }

    pub fn colors_file(&self) -> PathBuf {
        self.dir.path().join("colors.json")
    }

    /// Fresh tile pool scanned from disk
    pub fn tile_pool(&self) -> TilePool {
        TilePool::scan_dir(&self.tiles_dir()).unwrap()
    }

    /// Fresh name set parsed from disk
    pub fn names(&self) -> NamedColorSet {
        NamedColorSet::from_json(&std::fs::read(self.colors_file()).unwrap()).unwrap()
    }

    /// Pipeline with no fonts and stub metrics
    pub fn pipeline(&self) -> ReportPipeline {
        ReportPipeline::new(self.config.clone(), Arc::new(fontdb::Database::new()))
            .unwrap()
            .with_metrics(StubMetrics)
    }

    /// Run the pipeline over `samples` with fresh pools and a seeded rng
    pub fn run(&self, samples: &[ColorSample], seed: u64) -> Result<CardReport, PipelineError> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.pipeline()
            .run(samples, self.tile_pool(), self.names(), "Test card", &mut rng)
    }
}
