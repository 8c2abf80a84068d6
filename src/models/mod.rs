pub mod chapter;
pub mod loaders;
pub mod render_job;

pub use chapter::Chapter;
pub use loaders::{load_manifest, parse_manifest};
pub use render_job::{JobTarget, OutputNaming, RenderJob, COVER_INDEX};
