//! Job orchestration: one linear pipeline from news item to MP4 path.

pub mod composite;
pub mod render;

pub use composite::alpha_over;
pub use render::{RenderJob, RenderOpts, Renderer};
