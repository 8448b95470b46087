pub mod allocation;
pub mod extractor;
pub mod name_matcher;
pub mod pipeline;
pub mod pool;
pub mod tile_matcher;

pub use allocation::allocate;
pub use name_matcher::{match_names, NamedColorSet};
pub use pipeline::{load_samples, CardReport, ReportPipeline};
pub use pool::Pool;
pub use tile_matcher::{match_tiles, TilePool};
