//! Procedural decoration drawn into the overlay: grain, light leaks, dust
//! and chromatic offset. All randomness comes from the injected generator.

use image::RgbaImage;
use rand::Rng;
use rand::rngs::StdRng;

use crate::skin::draw::blend_px;

/// Uniform monochrome noise over the whole canvas at the given opacity.
pub(crate) fn film_grain(img: &mut RgbaImage, opacity: f32, rng: &mut StdRng) {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    if alpha == 0 {
        return;
    }
    for px in img.pixels_mut() {
        let v: u8 = rng.random();
        let sa = f32::from(alpha) / 255.0;
        let da = f32::from(px.0[3]) / 255.0;
        let oa = sa + da * (1.0 - sa);
        for c in 0..3 {
            let dc = f32::from(px.0[c]);
            px.0[c] = ((f32::from(v) * sa + dc * da * (1.0 - sa)) / oa).round() as u8;
        }
        px.0[3] = (oa * 255.0).round() as u8;
    }
}

/// One soft warm radial bloom, placed randomly in the upper half.
pub(crate) fn light_leak(img: &mut RgbaImage, rng: &mut StdRng) {
    let (w, h) = img.dimensions();
    let cx = rng.random_range(0..w) as i64;
    let cy = rng.random_range(0..h / 2) as i64;
    let radius = rng.random_range(260..520) as i64;
    let color = [
        255u8,
        rng.random_range(170u8..230),
        rng.random_range(110u8..180),
    ];
    let max_alpha = 42.0f32;

    for y in (cy - radius).max(0)..(cy + radius).min(i64::from(h)) {
        for x in (cx - radius).max(0)..(cx + radius).min(i64::from(w)) {
            let (dx, dy) = ((x - cx) as f32, (y - cy) as f32);
            let d = (dx * dx + dy * dy).sqrt() / radius as f32;
            if d >= 1.0 {
                continue;
            }
            let falloff = (1.0 - d) * (1.0 - d);
            let a = (max_alpha * falloff).round() as u8;
            if a > 0 {
                blend_px(img, x, y, [color[0], color[1], color[2], a]);
            }
        }
    }
}

/// Scatter faint short vertical specks, an old-print dust texture.
pub(crate) fn dust(img: &mut RgbaImage, count: u32, rng: &mut StdRng) {
    let (w, h) = img.dimensions();
    for _ in 0..count {
        let x = rng.random_range(0..w) as i64;
        let y = rng.random_range(0..h) as i64;
        let len = rng.random_range(1..5) as i64;
        let shade: u8 = rng.random_range(180..255);
        let alpha: u8 = rng.random_range(30..80);
        for dy in 0..len {
            blend_px(img, x, y + dy, [shade, shade, shade, alpha]);
        }
    }
}

/// Shift the red channel horizontally by `dx` pixels, a cheap fringe effect.
pub(crate) fn chromatic_offset(img: &mut RgbaImage, dx: u32) {
    if dx == 0 {
        return;
    }
    let src = img.clone();
    let (w, h) = src.dimensions();
    for y in 0..h {
        for x in 0..w {
            let sx = x.saturating_sub(dx);
            let shifted = src.get_pixel(sx, y);
            let px = img.get_pixel_mut(x, y);
            // Only fringe where the overlay already has content.
            if px.0[3] > 0 && shifted.0[3] > 0 {
                px.0[0] = shifted.0[0];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn grain_is_seed_deterministic() {
        let mut a = RgbaImage::new(32, 32);
        let mut b = RgbaImage::new(32, 32);
        film_grain(&mut a, 0.04, &mut StdRng::seed_from_u64(5));
        film_grain(&mut b, 0.04, &mut StdRng::seed_from_u64(5));
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn zero_opacity_grain_is_a_noop() {
        let mut img = RgbaImage::new(8, 8);
        film_grain(&mut img, 0.0, &mut StdRng::seed_from_u64(1));
        assert!(img.pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn chromatic_offset_leaves_transparent_pixels_alone() {
        let mut img = RgbaImage::new(16, 4);
        blend_px(&mut img, 8, 1, [200, 10, 10, 255]);
        chromatic_offset(&mut img, 2);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn dust_stays_in_bounds() {
        let mut img = RgbaImage::new(16, 16);
        dust(&mut img, 100, &mut StdRng::seed_from_u64(3));
        // Nothing to assert beyond "did not panic" and some specks landed.
        assert!(img.pixels().any(|p| p.0[3] > 0));
    }
}
