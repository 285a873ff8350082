//! Image acquisition and normalization into the fixed 9:16 base frame.

mod frame;

pub use frame::{cover_crop, fetch_and_normalize, fetch_image, grade, normalize};
