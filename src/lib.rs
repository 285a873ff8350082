//! Newsreel renders short-form vertical news videos from a single source
//! image plus editorially prepared text.
//!
//! The pipeline is linear and synchronous per job:
//!
//! - Fetch and normalize the article image into a 1080x1920 base frame
//! - Compose a transparent text overlay from one of a closed set of skins
//! - Animate the base frame with a pure zoom/pan camera function
//! - Mix an optional mood-matched audio bed
//! - Stream composited frames into `ffmpeg` and produce one MP4
//!
//! News sourcing, copy generation and platform publishing are the caller's
//! concern; this crate only turns `(NewsItem, CopyBundle)` into a file path.
#![forbid(unsafe_code)]

mod foundation;

pub mod assets;
pub mod audio;
pub mod encode;
pub mod layout;
pub mod motion;
pub mod normalize;
pub mod pipeline;
pub mod skin;
pub mod story;

pub use crate::foundation::core::{
    Canvas, Fps, FrameIndex, OUTPUT_CANVAS, Point, Rect, Rgb, SAFE_ZONE_Y, Vec2,
};
pub use crate::foundation::error::{NewsreelError, NewsreelResult};

pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::pipeline::render::{RenderOpts, Renderer};
pub use crate::skin::Skin;
pub use crate::story::{CopyBundle, Mood, MoodTheme, MoodThemes, NewsItem};
