//! Tile grid planning and rasterization
//!
//! Planning is pure: it decides which match fills which cell and how each
//! cell is turned. Rasterizing loads the tile images and draws the plan.

use rand::seq::SliceRandom;
use rand::Rng;
use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::error::{PipelineError, RenderError};
use crate::models::Match;
use crate::services::extractor;

/// Quarter-turn orientation of a tile or of the whole grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Orientations that keep a rectangle's width and height.
    pub const FLIPS: [Rotation; 2] = [Rotation::Deg0, Rotation::Deg180];

    pub fn degrees(self) -> f32 {
        match self {
            Rotation::Deg0 => 0.0,
            Rotation::Deg90 => 90.0,
            Rotation::Deg180 => 180.0,
            Rotation::Deg270 => 270.0,
        }
    }

    /// Uniform pick from `choices`
    pub fn pick<R: Rng + ?Sized>(choices: &[Rotation], rng: &mut R) -> Rotation {
        choices.choose(rng).copied().unwrap_or(Rotation::Deg0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    /// Index into the match list the plan was built from
    pub tile: usize,
    pub rotation: Rotation,
}

/// Which match fills each cell, in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPlan {
    pub width: u32,
    pub height: u32,
    pub cells: Vec<GridCell>,
    /// Applied to the assembled grid
    pub rotation: Rotation,
}

impl GridPlan {
    /// Lay the matches out by allocation.
    ///
    /// Each match contributes `allocation` entries to a weighted sequence
    /// which is consumed from its end, one cell at a time. If the sequence
    /// runs short, its last entry fills the remaining cells. A non-square
    /// grid is only ever turned by 0 or 180 degrees.
    pub fn build<R: Rng + ?Sized>(
        matches: &[Match],
        width: u32,
        height: u32,
        rng: &mut R,
    ) -> Result<Self, PipelineError> {
        let mut sequence: Vec<usize> = matches
            .iter()
            .enumerate()
            .flat_map(|(i, m)| std::iter::repeat(i).take(m.allocation as usize))
            .collect();
        if sequence.is_empty() {
            return Err(PipelineError::EmptyAllocation);
        }

        let capacity = width as usize * height as usize;
        if sequence.len() != capacity {
            tracing::debug!(
                tiles = sequence.len(),
                capacity,
                "Weighted tile sequence does not fill the grid exactly"
            );
        }

        let mut cells = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            let tile = match sequence.len() {
                1 => sequence[0],
                _ => sequence.pop().unwrap_or_default(),
            };
            cells.push(GridCell {
                tile,
                rotation: Rotation::pick(&Rotation::ALL, rng),
            });
        }

        let choices: &[Rotation] = if width == height {
            &Rotation::ALL
        } else {
            &Rotation::FLIPS
        };
        let rotation = Rotation::pick(choices, rng);

        Ok(Self {
            width,
            height,
            cells,
            rotation,
        })
    }

    /// Number of cells showing each match
    pub fn tile_counts(&self, matches: usize) -> Vec<usize> {
        let mut counts = vec![0; matches];
        for cell in &self.cells {
            if let Some(count) = counts.get_mut(cell.tile) {
                *count += 1;
            }
        }
        counts
    }
}

/// Draw the plan, loading each distinct tile image once.
///
/// Tiles are scaled to `tile_width` square and turned about their centre.
pub fn render_grid(
    plan: &GridPlan,
    matches: &[Match],
    tile_width: u32,
) -> Result<Pixmap, PipelineError> {
    let unsupported = RenderError::UnsupportedDimensions {
        width: plan.width,
        height: plan.height,
    };
    let (Some(width), Some(height)) = (
        plan.width.checked_mul(tile_width),
        plan.height.checked_mul(tile_width),
    ) else {
        return Err(unsupported.into());
    };
    let mut grid = Pixmap::new(width, height).ok_or(RenderError::UnsupportedDimensions {
        width,
        height,
    })?;
    grid.fill(tiny_skia::Color::WHITE);

    let mut images: Vec<Option<Pixmap>> = vec![None; matches.len()];
    let paint = PixmapPaint {
        quality: FilterQuality::Bicubic,
        ..Default::default()
    };
    let side = tile_width as f32;

    for (i, cell) in plan.cells.iter().enumerate() {
        let Some(m) = matches.get(cell.tile) else {
            continue;
        };
        if images[cell.tile].is_none() {
            images[cell.tile] = Some(extractor::load_pixmap(&m.tile.path)?);
        }
        let Some(image) = images[cell.tile].as_ref() else {
            continue;
        };

        let x = (i as u32 % plan.width) as f32 * side;
        let y = (i as u32 / plan.width) as f32 * side;
        let transform = Transform::from_scale(
            side / image.width() as f32,
            side / image.height() as f32,
        )
        .post_translate(x, y)
        .post_rotate_at(cell.rotation.degrees(), x + side / 2.0, y + side / 2.0);

        grid.draw_pixmap(0, 0, image.as_ref(), &paint, transform, None);
    }

    if plan.rotation == Rotation::Deg0 {
        return Ok(grid);
    }

    let mut turned = Pixmap::new(width, height).ok_or(RenderError::PixmapAllocation)?;
    turned.fill(tiny_skia::Color::WHITE);
    let transform = Transform::from_rotate_at(
        plan.rotation.degrees(),
        width as f32 / 2.0,
        height as f32 / 2.0,
    );
    turned.draw_pixmap(0, 0, grid.as_ref(), &PixmapPaint::default(), transform, None);
    Ok(turned)
}
