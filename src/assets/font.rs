use std::path::{Path, PathBuf};

use rusttype::Font;

use crate::assets::store::AssetStore;
use crate::foundation::error::{NewsreelError, NewsreelResult};

/// System fonts tried when the display font is unavailable, best first.
pub const FALLBACK_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
];

/// Load the display font via the asset store, degrading to a system font.
///
/// Only when neither the fetched asset nor any fallback candidate yields a
/// parseable font does this fail; a missing display font alone must never
/// kill a render.
pub fn load_display_font(store: &AssetStore) -> NewsreelResult<Font<'static>> {
    let primary = store.ensure("Anton.ttf");
    load_font_with_fallbacks(&primary, FALLBACK_FONT_PATHS)
}

/// Try `primary` first, then each fallback path in order.
pub fn load_font_with_fallbacks(
    primary: &Path,
    fallbacks: &[&str],
) -> NewsreelResult<Font<'static>> {
    if let Some(font) = load_font_file(primary) {
        return Ok(font);
    }
    for candidate in fallbacks {
        let path = PathBuf::from(candidate);
        if let Some(font) = load_font_file(&path) {
            tracing::warn!(
                primary = %primary.display(),
                fallback = %path.display(),
                "display font unavailable, using system fallback"
            );
            return Ok(font);
        }
    }
    Err(NewsreelError::asset_unavailable(format!(
        "no usable font: '{}' missing and no system fallback found",
        primary.display()
    )))
}

fn load_font_file(path: &Path) -> Option<Font<'static>> {
    let bytes = std::fs::read(path).ok()?;
    Font::try_from_vec(bytes)
}

/// First available system font, for tests and degraded rendering.
pub fn load_fallback_font() -> NewsreelResult<Font<'static>> {
    load_font_with_fallbacks(Path::new("/nonexistent"), FALLBACK_FONT_PATHS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_primary_falls_through() {
        let tmp = tempfile::tempdir().unwrap();
        let bogus = tmp.path().join("bogus.ttf");
        std::fs::write(&bogus, b"not a font at all").unwrap();

        // With no fallbacks either, loading must fail with AssetUnavailable.
        let err = load_font_with_fallbacks(&bogus, &[]).unwrap_err();
        assert!(matches!(err, NewsreelError::AssetUnavailable(_)));
    }

    #[test]
    fn fallback_chain_recovers_when_a_system_font_exists() {
        // Skip silently on hosts without any of the known system fonts.
        if load_fallback_font().is_err() {
            eprintln!("skipping: no system font available");
            return;
        }
        let font = load_font_with_fallbacks(Path::new("/nonexistent"), FALLBACK_FONT_PATHS);
        assert!(font.is_ok());
    }
}
