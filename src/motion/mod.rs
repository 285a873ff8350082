//! Pseudo-camera motion over a static base frame.
//!
//! `MotionSampler::frame_at` is a pure function of the sample time: no state
//! is carried between frames, so the assembler may evaluate frames out of
//! order or in parallel and always get the same pixels.

mod ease;

pub use ease::Ease;

use image::{RgbaImage, imageops};
use rand::Rng;
use rand::rngs::StdRng;

use crate::foundation::core::{Canvas, OUTPUT_CANVAS, Vec2};
use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::foundation::math::lerp;

/// Parameters of the continuous zoom/pan drift.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct CameraPath {
    /// Zoom factor at `t = 0`; 1.0 shows the base frame exactly.
    pub zoom_from: f64,
    /// Zoom factor at `t = duration`.
    pub zoom_to: f64,
    /// Shape of the zoom ramp.
    pub ease: Ease,
    /// Peak horizontal pan away from center, in pixels.
    pub pan_px: f64,
    /// Number of half sine cycles the pan completes over the clip.
    pub pan_cycles: f64,
}

impl CameraPath {
    /// A slow documentary-style drift with seeded variation.
    pub fn drift(rng: &mut StdRng) -> Self {
        Self {
            zoom_from: 1.0,
            zoom_to: rng.random_range(1.05..1.2),
            ease: Ease::Linear,
            pan_px: rng.random_range(0.0..40.0),
            pan_cycles: rng.random_range(0.5..1.5),
        }
    }

    /// Zoom factor at normalized progress `p`.
    pub fn zoom_at(&self, p: f64) -> f64 {
        lerp(self.zoom_from, self.zoom_to, self.ease.apply(p))
    }

    /// Signed horizontal pan offset at normalized progress `p`.
    pub fn pan_at(&self, p: f64) -> f64 {
        self.pan_px * (std::f64::consts::PI * self.pan_cycles * p.clamp(0.0, 1.0)).sin()
    }
}

/// Turns a 1080x1920 base frame into frames sampled at arbitrary times.
pub struct MotionSampler {
    base: RgbaImage,
    path: CameraPath,
    duration_sec: f64,
    viewport: Canvas,
}

impl MotionSampler {
    pub fn new(base: RgbaImage, path: CameraPath, duration_sec: f64) -> NewsreelResult<Self> {
        let viewport = OUTPUT_CANVAS;
        if base.width() < viewport.width || base.height() < viewport.height {
            return Err(NewsreelError::validation(format!(
                "base frame {}x{} smaller than viewport {}x{}",
                base.width(),
                base.height(),
                viewport.width,
                viewport.height
            )));
        }
        if !(duration_sec.is_finite() && duration_sec > 0.0) {
            return Err(NewsreelError::validation(
                "motion duration must be finite and > 0",
            ));
        }
        if path.zoom_from < 1.0 || path.zoom_to < 1.0 {
            return Err(NewsreelError::validation(
                "zoom factors below 1.0 would sample outside the base frame",
            ));
        }
        Ok(Self {
            base,
            path,
            duration_sec,
            viewport,
        })
    }

    pub fn duration_sec(&self) -> f64 {
        self.duration_sec
    }

    /// Scaled frame size and clamped crop origin for sample time `t`.
    ///
    /// The origin is guaranteed to satisfy
    /// `0 <= x <= scaled_w - viewport_w` and `0 <= y <= scaled_h - viewport_h`.
    pub fn crop_at(&self, t: f64) -> (u32, u32, Vec2) {
        let p = (t / self.duration_sec).clamp(0.0, 1.0);
        let zoom = self.path.zoom_at(p).max(1.0);

        let scaled_w = ((f64::from(self.base.width()) * zoom).round() as u32).max(self.viewport.width);
        let scaled_h =
            ((f64::from(self.base.height()) * zoom).round() as u32).max(self.viewport.height);

        let max_x = f64::from(scaled_w - self.viewport.width);
        let max_y = f64::from(scaled_h - self.viewport.height);

        // Anchor at center, pan horizontally, clamp inside the scaled frame.
        let x = (max_x / 2.0 + self.path.pan_at(p)).clamp(0.0, max_x);
        let y = (max_y / 2.0).clamp(0.0, max_y);

        (scaled_w, scaled_h, Vec2::new(x.floor(), y.floor()))
    }

    /// Render the output frame for sample time `t`.
    pub fn frame_at(&self, t: f64) -> RgbaImage {
        let (scaled_w, scaled_h, origin) = self.crop_at(t);

        let scaled = if (scaled_w, scaled_h) == self.base.dimensions() {
            self.base.clone()
        } else {
            imageops::resize(&self.base, scaled_w, scaled_h, imageops::FilterType::Triangle)
        };
        imageops::crop_imm(
            &scaled,
            origin.x as u32,
            origin.y as u32,
            self.viewport.width,
            self.viewport.height,
        )
        .to_image()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn base_frame() -> RgbaImage {
        RgbaImage::from_fn(1080, 1920, |x, y| {
            image::Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        })
    }

    #[test]
    fn frames_are_viewport_sized() {
        let path = CameraPath {
            zoom_from: 1.0,
            zoom_to: 1.15,
            ease: Ease::Linear,
            pan_px: 40.0,
            pan_cycles: 1.0,
        };
        let sampler = MotionSampler::new(base_frame(), path, 6.0).unwrap();
        for t in [0.0, 1.5, 3.0, 5.999] {
            assert_eq!(sampler.frame_at(t).dimensions(), (1080, 1920));
        }
    }

    #[test]
    fn crop_origin_stays_in_bounds_for_random_paths() {
        let mut rng = StdRng::seed_from_u64(1234);
        for _ in 0..200 {
            let path = CameraPath {
                zoom_from: 1.0,
                zoom_to: rng.random_range(1.0..1.3),
                ease: Ease::Linear,
                pan_px: rng.random_range(0.0..200.0),
                pan_cycles: rng.random_range(0.1..4.0),
            };
            let duration = rng.random_range(1.0..20.0);
            let sampler = MotionSampler::new(base_frame(), path, duration).unwrap();
            for _ in 0..16 {
                let t = rng.random_range(0.0..duration);
                let (sw, sh, origin) = sampler.crop_at(t);
                assert!(origin.x >= 0.0 && origin.y >= 0.0);
                assert!(origin.x as u32 + 1080 <= sw, "x {} sw {sw}", origin.x);
                assert!(origin.y as u32 + 1920 <= sh, "y {} sh {sh}", origin.y);
            }
        }
    }

    #[test]
    fn frame_at_is_pure() {
        let path = CameraPath {
            zoom_from: 1.0,
            zoom_to: 1.1,
            ease: Ease::OutQuad,
            pan_px: 25.0,
            pan_cycles: 1.0,
        };
        let sampler = MotionSampler::new(base_frame(), path, 8.0).unwrap();
        // Same t, out-of-order evaluation, identical pixels.
        let late = sampler.frame_at(7.0);
        let _early = sampler.frame_at(1.0);
        let late_again = sampler.frame_at(7.0);
        assert_eq!(late.as_raw(), late_again.as_raw());
    }

    #[test]
    fn rejects_undersized_base_and_bad_params() {
        let tiny = RgbaImage::new(100, 100);
        let path = CameraPath {
            zoom_from: 1.0,
            zoom_to: 1.1,
            ease: Ease::Linear,
            pan_px: 0.0,
            pan_cycles: 1.0,
        };
        assert!(MotionSampler::new(tiny, path, 6.0).is_err());
        assert!(MotionSampler::new(base_frame(), path, 0.0).is_err());

        let shrink = CameraPath {
            zoom_from: 0.9,
            ..path
        };
        assert!(MotionSampler::new(base_frame(), shrink, 6.0).is_err());
    }
}
