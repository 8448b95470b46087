pub mod card;
pub mod grid;
pub mod text;

pub use card::{encode_card_png, BackgroundImage, CardLayout, CardRenderer};
pub use grid::{render_grid, GridPlan, Rotation};
pub use text::{load_fonts, FontMetrics, TextMetrics};
