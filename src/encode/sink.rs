use std::path::PathBuf;

use image::RgbaImage;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{NewsreelError, NewsreelResult};

/// Pre-mixed audio handed to a sink: a raw interleaved f32le file.
#[derive(Clone, Debug)]
pub struct AudioInputConfig {
    pub path: PathBuf,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Stream geometry and timing for one encode.
#[derive(Clone, Debug)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    pub audio: Option<AudioInputConfig>,
}

/// Receives fully composited opaque RGBA frames in strictly increasing index
/// order.
pub trait FrameSink {
    fn begin(&mut self, cfg: SinkConfig) -> NewsreelResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbaImage) -> NewsreelResult<()>;
    fn end(&mut self) -> NewsreelResult<()>;
}

/// Sink that buffers frames in memory, for tests and inspection.
#[derive(Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<RgbaImage>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cfg(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    pub fn frames(&self) -> &[RgbaImage] {
        &self.frames
    }

    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> NewsreelResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(NewsreelError::validation("sink width/height must be non-zero"));
        }
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &RgbaImage) -> NewsreelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| NewsreelError::render_failed("sink not started"))?;
        if frame.dimensions() != (cfg.width, cfg.height) {
            return Err(NewsreelError::validation("frame size mismatch"));
        }
        if idx.0 != self.frames.len() as u64 {
            return Err(NewsreelError::render_failed(
                "in-memory sink received out-of-order frame index",
            ));
        }
        self.frames.push(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> NewsreelResult<()> {
        if self.cfg.is_none() {
            return Err(NewsreelError::render_failed("sink not started"));
        }
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_sink_collects_frames_in_order() {
        let mut sink = InMemorySink::new();
        sink.begin(SinkConfig {
            width: 4,
            height: 4,
            fps: Fps::new(24, 1).unwrap(),
            audio: None,
        })
        .unwrap();

        let frame = RgbaImage::new(4, 4);
        sink.push_frame(FrameIndex(0), &frame).unwrap();
        sink.push_frame(FrameIndex(1), &frame).unwrap();
        assert!(sink.push_frame(FrameIndex(5), &frame).is_err());
        sink.end().unwrap();
        assert_eq!(sink.frames().len(), 2);
        assert!(sink.ended());
    }

    #[test]
    fn push_before_begin_fails() {
        let mut sink = InMemorySink::new();
        let frame = RgbaImage::new(4, 4);
        assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    }
}
