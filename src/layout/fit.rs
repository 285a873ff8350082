use rusttype::{Font, Scale, point};

/// Smallest font size the shrink search will return.
pub const MIN_FONT_SIZE: f32 = 25.0;
/// Step between candidate sizes in the shrink search.
pub const SIZE_STEP: f32 = 4.0;
/// Empirical average glyph width as a fraction of the font size, used to
/// derive a wrap column from a pixel width.
pub const CHAR_WIDTH_FACTOR: f32 = 0.55;
/// Fixed spacing between wrapped lines, in pixels.
pub const LINE_SPACING: f32 = 15.0;

/// Result of the fit search: the chosen size and the wrapped lines at that
/// size. Always drawable — at worst the floor size with best-effort wrapping
/// that may visually overflow its box.
#[derive(Clone, Debug)]
pub struct FittedText {
    pub size: f32,
    pub lines: Vec<String>,
    /// Rendered height of one line at `size` (ascent + descent).
    pub line_height: f32,
}

impl FittedText {
    /// Vertical advance from one line's top to the next.
    pub fn line_advance(&self) -> f32 {
        self.line_height + LINE_SPACING
    }

    /// Total height of all lines including inter-line spacing.
    pub fn total_height(&self) -> f32 {
        self.lines.len() as f32 * self.line_advance()
    }
}

/// Height of one rendered line at `size`.
pub fn line_height(font: &Font<'_>, size: f32) -> f32 {
    let vm = font.v_metrics(Scale::uniform(size));
    vm.ascent - vm.descent
}

/// Pixel width of `text` rendered at `size`.
pub fn measure_width(font: &Font<'_>, size: f32, text: &str) -> f32 {
    let scale = Scale::uniform(size);
    let vm = font.v_metrics(scale);
    font.layout(text, scale, point(0.0, vm.ascent))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

/// Greedy word wrap to at most `max_chars` characters per line.
///
/// Words longer than the column are hard-split rather than overflowed. The
/// result is never empty.
pub fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if word_len > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(max_chars) {
                lines.push(chunk.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() {
            word_len
        } else {
            current.chars().count() + 1 + word_len
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Find the largest font size at or below `start_size` whose wrapped
/// rendering of `text` fits `max_width` x `max_height`.
///
/// Monotonic shrink search: candidate sizes descend from `start_size` in
/// `SIZE_STEP` decrements; the first size whose wrapped total height fits is
/// taken. At the `MIN_FONT_SIZE` floor the best-effort wrap is returned
/// regardless of overflow — unfittable text degrades visually, it never
/// errors.
pub fn fit_text(
    font: &Font<'_>,
    text: &str,
    max_width: f32,
    max_height: f32,
    start_size: f32,
) -> FittedText {
    let mut size = start_size.max(MIN_FONT_SIZE);
    while size > MIN_FONT_SIZE {
        let candidate = layout_at(font, text, max_width, size);
        if candidate.total_height() <= max_height {
            return candidate;
        }
        size -= SIZE_STEP;
    }

    let floor = layout_at(font, text, max_width, MIN_FONT_SIZE);
    if floor.total_height() > max_height {
        tracing::debug!(
            text_len = text.len(),
            max_height,
            "layout overflow at floor size, drawing best effort"
        );
    }
    floor
}

fn layout_at(font: &Font<'_>, text: &str, max_width: f32, size: f32) -> FittedText {
    let max_chars = (max_width / (size * CHAR_WIDTH_FACTOR)).floor() as usize;
    FittedText {
        size,
        lines: wrap_words(text, max_chars),
        line_height: line_height(font, size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::font::load_fallback_font;

    #[test]
    fn wrap_packs_greedily() {
        let lines = wrap_words("one two three four", 9);
        assert_eq!(lines, vec!["one two", "three", "four"]);
    }

    #[test]
    fn wrap_hard_splits_long_words() {
        let lines = wrap_words("antidisestablishmentarianism", 10);
        assert_eq!(lines, vec!["antidisest", "ablishment", "arianism"]);
    }

    #[test]
    fn wrap_never_returns_empty() {
        assert_eq!(wrap_words("", 10), vec![String::new()]);
        assert_eq!(wrap_words("   ", 10), vec![String::new()]);
    }

    #[test]
    fn fit_returns_floor_for_impossible_boxes() {
        let Ok(font) = load_fallback_font() else {
            eprintln!("skipping: no system font available");
            return;
        };
        let fitted = fit_text(&font, "completely unfittable headline text", 100.0, 10.0, 140.0);
        assert!(fitted.size >= MIN_FONT_SIZE);
        assert!(!fitted.lines.is_empty());
    }

    #[test]
    fn fit_shrinks_long_headlines_into_narrow_boxes() {
        let Ok(font) = load_fallback_font() else {
            eprintln!("skipping: no system font available");
            return;
        };
        // 40-character headline in a 900px-wide box.
        let headline = "GLOBAL MARKETS RATTLED BY SUDDEN RATE...";
        assert_eq!(headline.len(), 40);
        let fitted = fit_text(&font, headline, 900.0, 600.0, 140.0);
        assert!(!fitted.lines.is_empty());
        assert!(fitted.size >= MIN_FONT_SIZE);
        assert!(fitted.total_height() <= 600.0 || fitted.size == MIN_FONT_SIZE);
    }

    #[test]
    fn fit_size_is_monotone_in_max_height() {
        let Ok(font) = load_fallback_font() else {
            eprintln!("skipping: no system font available");
            return;
        };
        let text = "central bank lowers rates for the third time this year";
        let mut prev = f32::INFINITY;
        for max_h in [800.0, 600.0, 400.0, 200.0, 100.0, 40.0] {
            let fitted = fit_text(&font, text, 900.0, max_h, 120.0);
            assert!(
                fitted.size <= prev,
                "size grew from {prev} to {} when max_height shrank to {max_h}",
                fitted.size
            );
            prev = fitted.size;
        }
    }

    #[test]
    fn measure_width_grows_with_text() {
        let Ok(font) = load_fallback_font() else {
            eprintln!("skipping: no system font available");
            return;
        };
        let short = measure_width(&font, 40.0, "AB");
        let long = measure_width(&font, 40.0, "ABCDEFGH");
        assert!(long > short);
        assert_eq!(measure_width(&font, 40.0, ""), 0.0);
    }
}
