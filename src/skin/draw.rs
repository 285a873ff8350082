//! Low-level raster drawing onto a straight-alpha RGBA overlay.

use image::RgbaImage;
use rusttype::{Font, Scale, point};

use crate::layout::FittedText;

/// Source-over blend of one straight-alpha pixel, bounds-checked.
pub(crate) fn blend_px(img: &mut RgbaImage, x: i64, y: i64, rgba: [u8; 4]) {
    if x < 0 || y < 0 || x >= i64::from(img.width()) || y >= i64::from(img.height()) {
        return;
    }
    let sa = f32::from(rgba[3]) / 255.0;
    if sa <= 0.0 {
        return;
    }
    let dst = img.get_pixel_mut(x as u32, y as u32);
    let da = f32::from(dst.0[3]) / 255.0;
    let oa = sa + da * (1.0 - sa);
    if oa <= 0.0 {
        return;
    }
    for i in 0..3 {
        let sc = f32::from(rgba[i]);
        let dc = f32::from(dst.0[i]);
        dst.0[i] = ((sc * sa + dc * da * (1.0 - sa)) / oa).round().clamp(0.0, 255.0) as u8;
    }
    dst.0[3] = (oa * 255.0).round() as u8;
}

/// Fill an axis-aligned rectangle, clipped to the image.
pub(crate) fn fill_rect(img: &mut RgbaImage, x: i64, y: i64, w: u32, h: u32, rgba: [u8; 4]) {
    for dy in 0..i64::from(h) {
        for dx in 0..i64::from(w) {
            blend_px(img, x + dx, y + dy, rgba);
        }
    }
}

/// Fill a rectangle with quarter-circle corners of the given radius.
pub(crate) fn fill_rounded_rect(
    img: &mut RgbaImage,
    x: i64,
    y: i64,
    w: u32,
    h: u32,
    radius: u32,
    rgba: [u8; 4],
) {
    let radius = i64::from(radius.min(w / 2).min(h / 2));
    let (wi, hi) = (i64::from(w), i64::from(h));
    for dy in 0..hi {
        for dx in 0..wi {
            // Distance check only matters inside the four corner squares.
            let cx = if dx < radius {
                Some(radius - 1)
            } else if dx >= wi - radius {
                Some(wi - radius)
            } else {
                None
            };
            let cy = if dy < radius {
                Some(radius - 1)
            } else if dy >= hi - radius {
                Some(hi - radius)
            } else {
                None
            };
            if let (Some(cx), Some(cy)) = (cx, cy) {
                let (ddx, ddy) = (dx - cx, dy - cy);
                if ddx * ddx + ddy * ddy > radius * radius {
                    continue;
                }
            }
            blend_px(img, x + dx, y + dy, rgba);
        }
    }
}

/// Darkening scrim whose alpha ramps linearly from 0 at `y_start` to
/// `max_alpha` at `y_end`.
pub(crate) fn gradient_scrim(
    img: &mut RgbaImage,
    y_start: u32,
    y_end: u32,
    color: [u8; 3],
    max_alpha: u8,
) {
    if y_end <= y_start {
        return;
    }
    let span = ((y_end - y_start) as f32).max(1.0);
    let width = img.width();
    for y in y_start..y_end.min(img.height()) {
        let t = (y - y_start) as f32 / span;
        let alpha = (t * f32::from(max_alpha)).round() as u8;
        for x in 0..width {
            blend_px(img, i64::from(x), i64::from(y), [color[0], color[1], color[2], alpha]);
        }
    }
}

/// Draw one line of text with its top-left corner at `(x, y)`.
pub(crate) fn draw_text(
    img: &mut RgbaImage,
    font: &Font<'_>,
    size: f32,
    x: i64,
    y: i64,
    rgba: [u8; 4],
    text: &str,
) {
    let scale = Scale::uniform(size);
    let vm = font.v_metrics(scale);
    for glyph in font.layout(text, scale, point(x as f32, y as f32 + vm.ascent)) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let px = i64::from(bb.min.x) + i64::from(gx);
            let py = i64::from(bb.min.y) + i64::from(gy);
            let a = (coverage * f32::from(rgba[3])).round().clamp(0.0, 255.0) as u8;
            if a > 0 {
                blend_px(img, px, py, [rgba[0], rgba[1], rgba[2], a]);
            }
        });
    }
}

/// Draw text with a hard drop shadow offset down-right.
pub(crate) fn draw_text_shadowed(
    img: &mut RgbaImage,
    font: &Font<'_>,
    size: f32,
    x: i64,
    y: i64,
    fill: [u8; 4],
    shadow: [u8; 4],
    offset: i64,
    text: &str,
) {
    draw_text(img, font, size, x + offset, y + offset, shadow, text);
    draw_text(img, font, size, x, y, fill, text);
}

/// Draw text with a 1px-step outline stroke in all eight directions.
pub(crate) fn draw_text_stroked(
    img: &mut RgbaImage,
    font: &Font<'_>,
    size: f32,
    x: i64,
    y: i64,
    fill: [u8; 4],
    stroke: [u8; 4],
    stroke_width: i64,
    text: &str,
) {
    for dy in -stroke_width..=stroke_width {
        for dx in -stroke_width..=stroke_width {
            if dx == 0 && dy == 0 {
                continue;
            }
            draw_text(img, font, size, x + dx, y + dy, stroke, text);
        }
    }
    draw_text(img, font, size, x, y, fill, text);
}

/// How each line of a fitted block is painted.
pub(crate) enum LineStyle {
    Plain {
        fill: [u8; 4],
    },
    Shadowed {
        fill: [u8; 4],
        shadow: [u8; 4],
        offset: i64,
    },
    Stroked {
        fill: [u8; 4],
        stroke: [u8; 4],
        width: i64,
    },
}

/// Draw a fitted text block from `(x, y)` downward, stopping before any line
/// would cross `max_y`. Returns the cursor after the last drawn line.
pub(crate) fn draw_block(
    img: &mut RgbaImage,
    font: &Font<'_>,
    fitted: &FittedText,
    x: i64,
    y: i64,
    style: &LineStyle,
    max_y: i64,
) -> i64 {
    // Shadow and stroke ink extends past the glyph box; include it in the
    // boundary check so nothing crosses `max_y`.
    let overhang = match *style {
        LineStyle::Plain { .. } => 0,
        LineStyle::Shadowed { offset, .. } => offset,
        LineStyle::Stroked { width, .. } => width,
    };
    let mut cursor = y;
    for line in &fitted.lines {
        if cursor + fitted.line_height.ceil() as i64 + overhang > max_y {
            tracing::debug!("text block truncated at safe zone");
            break;
        }
        match *style {
            LineStyle::Plain { fill } => draw_text(img, font, fitted.size, x, cursor, fill, line),
            LineStyle::Shadowed {
                fill,
                shadow,
                offset,
            } => draw_text_shadowed(img, font, fitted.size, x, cursor, fill, shadow, offset, line),
            LineStyle::Stroked {
                fill,
                stroke,
                width,
            } => draw_text_stroked(img, font, fitted.size, x, cursor, fill, stroke, width, line),
        }
        cursor += fitted.line_advance().round() as i64;
    }
    cursor
}
