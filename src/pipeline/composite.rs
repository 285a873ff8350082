use image::RgbaImage;

use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::foundation::math::mul_div255_u8;

/// Composite a straight-alpha overlay onto an opaque base frame in place.
///
/// The base stays opaque; overlay pixels with zero alpha cost nothing.
pub fn alpha_over(base: &mut RgbaImage, overlay: &RgbaImage) -> NewsreelResult<()> {
    if base.dimensions() != overlay.dimensions() {
        return Err(NewsreelError::validation(format!(
            "composite size mismatch: base {:?}, overlay {:?}",
            base.dimensions(),
            overlay.dimensions()
        )));
    }

    for (b, o) in base.pixels_mut().zip(overlay.pixels()) {
        let a = u16::from(o.0[3]);
        if a == 0 {
            continue;
        }
        if a == 255 {
            b.0 = [o.0[0], o.0[1], o.0[2], 255];
            continue;
        }
        let inv = 255 - a;
        for c in 0..3 {
            b.0[c] = mul_div255_u8(u16::from(o.0[c]), a) + mul_div255_u8(u16::from(b.0[c]), inv);
        }
        b.0[3] = 255;
    }
    Ok(())
}
