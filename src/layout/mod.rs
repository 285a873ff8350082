//! Fit-to-box text sizing and word wrapping.

mod fit;

pub use fit::{
    CHAR_WIDTH_FACTOR, FittedText, LINE_SPACING, MIN_FONT_SIZE, SIZE_STEP, fit_text, line_height,
    measure_width, wrap_words,
};
