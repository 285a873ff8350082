//! Overlay composition: a closed set of named visual layouts ("skins").
//!
//! Every skin is a pure recipe from `(copy, source name, accent color,
//! jitter)` to a transparent 1080x1920 overlay; nothing is shared between
//! invocations and all variety comes from the injected random generator.

pub(crate) mod decor;
pub(crate) mod draw;

use image::RgbaImage;
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rusttype::Font;

use crate::foundation::core::{Canvas, OUTPUT_CANVAS, Rgb, SAFE_ZONE_Y};
use crate::layout::{FittedText, fit_text, line_height, measure_width};
use crate::skin::draw::LineStyle;
use crate::story::{CopyBundle, Mood};

const BLACK: [u8; 4] = [0, 0, 0, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];

/// The closed set of overlay layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skin {
    /// Bottom gradient scrim, badge top-left, headline + summary low third.
    Classic,
    /// Full-frame dim with a huge centered headline and film grain.
    Poster,
    /// Solid top band holding the headline, summary mid-frame.
    Split,
    /// Headline lines on accent chips, newspaper cut-out style.
    Boxed,
    /// Thin bottom scrim and headline only, no summary.
    Minimal,
    /// Dark vignette, glowing accent headline, chromatic fringe.
    Neon,
}

impl Skin {
    /// Every skin, in declaration order.
    pub const ALL: [Skin; 6] = [
        Skin::Classic,
        Skin::Poster,
        Skin::Split,
        Skin::Boxed,
        Skin::Minimal,
        Skin::Neon,
    ];
}

/// Draws overlays for the fixed output canvas.
pub struct SkinComposer {
    font: Font<'static>,
    canvas: Canvas,
    jitter_px: i64,
}

impl SkinComposer {
    pub fn new(font: Font<'static>) -> Self {
        Self {
            font,
            canvas: OUTPUT_CANVAS,
            jitter_px: 12,
        }
    }

    /// Uniform choice from the enabled skin set; `Classic` if the set is
    /// empty.
    pub fn pick(&self, enabled: &[Skin], rng: &mut StdRng) -> Skin {
        enabled.choose(rng).copied().unwrap_or(Skin::Classic)
    }

    /// Render one overlay. Pure given the rng state; repeated calls with the
    /// same seed produce byte-identical images.
    pub fn compose(
        &self,
        skin: Skin,
        copy: &CopyBundle,
        source_name: &str,
        accent: Rgb,
        rng: &mut StdRng,
    ) -> RgbaImage {
        let mut overlay = RgbaImage::new(self.canvas.width, self.canvas.height);
        let jx = rng.random_range(-self.jitter_px..=self.jitter_px);
        let jy = rng.random_range(-self.jitter_px..=self.jitter_px);

        tracing::debug!(?skin, jx, jy, "composing overlay");
        match skin {
            Skin::Classic => self.classic(&mut overlay, copy, source_name, accent, jx, jy),
            Skin::Poster => self.poster(&mut overlay, copy, accent, jx, jy, rng),
            Skin::Split => self.split(&mut overlay, copy, source_name, accent, jx, jy),
            Skin::Boxed => self.boxed(&mut overlay, copy, source_name, accent, jx, jy, rng),
            Skin::Minimal => self.minimal(&mut overlay, copy, source_name, accent, jx, jy),
            Skin::Neon => self.neon(&mut overlay, copy, source_name, accent, jx, jy, rng),
        }
        overlay
    }

    /// Rounded source pill with inverse-contrast text. Returns its height.
    fn badge(&self, img: &mut RgbaImage, text: &str, x: i64, y: i64, accent: Rgb) -> i64 {
        let size = 35.0;
        let label = format!(" {} ", text.to_uppercase());
        let text_w = measure_width(&self.font, size, &label);
        let h = 60.0f32;
        let w = (text_w + 20.0).ceil() as u32;
        draw::fill_rounded_rect(img, x, y, w, h as u32, 12, accent.with_alpha(255));
        let text_y = y + ((h - line_height(&self.font, size)) / 2.0) as i64;
        draw::draw_text(img, &self.font, size, x + 10, text_y, BLACK, &label);
        h as i64
    }

    fn safe_y(&self) -> i64 {
        i64::from(SAFE_ZONE_Y)
    }

    fn fit(&self, text: &str, max_w: f32, max_h: f32, start: f32) -> FittedText {
        fit_text(&self.font, text, max_w, max_h.max(0.0), start)
    }

    fn classic(
        &self,
        img: &mut RgbaImage,
        copy: &CopyBundle,
        source_name: &str,
        accent: Rgb,
        jx: i64,
        jy: i64,
    ) {
        let h = self.canvas.height;
        draw::gradient_scrim(img, (h as f32 * 0.45) as u32, h, [0, 0, 0], 240);
        self.badge(img, source_name, 60 + jx, 150 + jy, accent);

        let headline = self.fit(&copy.headline.to_uppercase(), 900.0, 600.0, 140.0);
        let mut cy = 600 + jy;
        cy = draw::draw_block(
            img,
            &self.font,
            &headline,
            60 + jx,
            cy,
            &LineStyle::Shadowed {
                fill: accent.with_alpha(255),
                shadow: BLACK,
                offset: 5,
            },
            self.safe_y(),
        );

        cy += 30;
        let summary = self.fit(&copy.summary, 900.0, (self.safe_y() - cy) as f32, 100.0);
        draw::draw_block(
            img,
            &self.font,
            &summary,
            60 + jx,
            cy,
            &LineStyle::Plain { fill: WHITE },
            self.safe_y(),
        );
    }

    fn poster(
        &self,
        img: &mut RgbaImage,
        copy: &CopyBundle,
        accent: Rgb,
        jx: i64,
        jy: i64,
        rng: &mut StdRng,
    ) {
        draw::fill_rect(img, 0, 0, self.canvas.width, self.canvas.height, [0, 0, 0, 80]);

        let headline = self.fit(&copy.headline.to_uppercase(), 950.0, 800.0, 160.0);
        let start_y = ((self.canvas.height as f32 - headline.total_height()) / 2.0) as i64 - 100;
        let mut cy = draw::draw_block(
            img,
            &self.font,
            &headline,
            55 + jx,
            start_y + jy,
            &LineStyle::Shadowed {
                fill: accent.with_alpha(255),
                shadow: BLACK,
                offset: 5,
            },
            self.safe_y(),
        );

        cy += 50;
        let summary = self.fit(&copy.summary, 900.0, (self.safe_y() - cy) as f32, 80.0);
        draw::draw_block(
            img,
            &self.font,
            &summary,
            60 + jx,
            cy,
            &LineStyle::Stroked {
                fill: WHITE,
                stroke: BLACK,
                width: 3,
            },
            self.safe_y(),
        );

        decor::film_grain(img, 0.04, rng);
    }

    fn split(
        &self,
        img: &mut RgbaImage,
        copy: &CopyBundle,
        source_name: &str,
        accent: Rgb,
        jx: i64,
        jy: i64,
    ) {
        let band_color = if copy.mood == Mood::Crisis {
            [139, 0, 0, 230]
        } else {
            [20, 20, 20, 230]
        };
        draw::fill_rect(img, 0, 200 + jy, self.canvas.width, 500, band_color);

        let headline = self.fit(&copy.headline.to_uppercase(), 1000.0, 450.0, 120.0);
        draw::draw_block(
            img,
            &self.font,
            &headline,
            50 + jx,
            250 + jy,
            &LineStyle::Plain { fill: WHITE },
            self.safe_y(),
        );

        let summary = self.fit(&copy.summary, 1000.0, 320.0, 80.0);
        draw::draw_block(
            img,
            &self.font,
            &summary,
            50 + jx,
            1120 + jy,
            &LineStyle::Stroked {
                fill: WHITE,
                stroke: BLACK,
                width: 2,
            },
            self.safe_y(),
        );

        let credit = format!("SOURCE: {}", source_name.to_uppercase());
        draw::draw_text(
            img,
            &self.font,
            40.0,
            50 + jx,
            1430 + jy,
            accent.with_alpha(255),
            &credit,
        );
    }

    fn boxed(
        &self,
        img: &mut RgbaImage,
        copy: &CopyBundle,
        source_name: &str,
        accent: Rgb,
        jx: i64,
        jy: i64,
        rng: &mut StdRng,
    ) {
        draw::fill_rect(img, 0, 0, self.canvas.width, self.canvas.height, [0, 0, 0, 60]);
        self.badge(img, source_name, 60 + jx, 140 + jy, accent);

        // Each headline line sits on its own accent chip.
        let headline = self.fit(&copy.headline.to_uppercase(), 880.0, 700.0, 110.0);
        let mut cy = 520 + jy;
        let pad = 18i64;
        for line in &headline.lines {
            let lh = headline.line_height.ceil() as i64;
            if cy + lh + pad > self.safe_y() {
                break;
            }
            let w = measure_width(&self.font, headline.size, line).ceil() as u32;
            draw::fill_rect(
                img,
                60 + jx - pad,
                cy - pad / 2,
                w + (pad * 2) as u32,
                (lh + pad) as u32,
                accent.with_alpha(235),
            );
            draw::draw_text(img, &self.font, headline.size, 60 + jx, cy, BLACK, line);
            cy += headline.line_advance().round() as i64 + pad / 2;
        }

        cy += 30;
        let summary = self.fit(&copy.summary, 900.0, (self.safe_y() - cy) as f32, 70.0);
        draw::draw_block(
            img,
            &self.font,
            &summary,
            60 + jx,
            cy,
            &LineStyle::Shadowed {
                fill: WHITE,
                shadow: BLACK,
                offset: 2,
            },
            self.safe_y(),
        );

        decor::dust(img, 40, rng);
    }

    fn minimal(
        &self,
        img: &mut RgbaImage,
        copy: &CopyBundle,
        source_name: &str,
        accent: Rgb,
        jx: i64,
        jy: i64,
    ) {
        draw::gradient_scrim(img, 1100, self.canvas.height, [0, 0, 0], 200);
        self.badge(img, source_name, 60 + jx, 1140 + jy, accent);

        let headline = self.fit(&copy.headline.to_uppercase(), 900.0, 250.0, 90.0);
        draw::draw_block(
            img,
            &self.font,
            &headline,
            60 + jx,
            1230 + jy,
            &LineStyle::Shadowed {
                fill: WHITE,
                shadow: BLACK,
                offset: 3,
            },
            self.safe_y(),
        );
    }

    fn neon(
        &self,
        img: &mut RgbaImage,
        copy: &CopyBundle,
        source_name: &str,
        accent: Rgb,
        jx: i64,
        jy: i64,
        rng: &mut StdRng,
    ) {
        let h = self.canvas.height;
        draw::fill_rect(img, 0, 0, self.canvas.width, h, [0, 0, 0, 90]);
        draw::gradient_scrim(img, h / 2, h, [10, 0, 20], 200);
        self.badge(img, source_name, 60 + jx, 150 + jy, accent);

        let headline = self.fit(&copy.headline.to_uppercase(), 900.0, 500.0, 130.0);
        let hx = 60 + jx;
        let hy = 640 + jy;
        // Soft glow: low-alpha accent copies around the fill.
        let glow = accent.with_alpha(90);
        for (dx, dy) in [(-3i64, 0i64), (3, 0), (0, -3), (0, 3)] {
            draw::draw_block(
                img,
                &self.font,
                &headline,
                hx + dx,
                hy + dy,
                &LineStyle::Plain { fill: glow },
                self.safe_y(),
            );
        }
        let mut cy = draw::draw_block(
            img,
            &self.font,
            &headline,
            hx,
            hy,
            &LineStyle::Plain {
                fill: accent.with_alpha(255),
            },
            self.safe_y(),
        );

        cy += 30;
        let summary = self.fit(&copy.summary, 900.0, (self.safe_y() - cy) as f32, 90.0);
        draw::draw_block(
            img,
            &self.font,
            &summary,
            hx,
            cy,
            &LineStyle::Plain { fill: WHITE },
            self.safe_y(),
        );

        decor::chromatic_offset(img, 2);
        decor::dust(img, 24, rng);
        decor::light_leak(img, rng);
    }
}
