//! Text Measurement
//!
//! Utilities for measuring rendered text in surface pixels.
//!
//! Rendered width depends on Unicode character widths:
//! - ASCII characters: one advance
//! - CJK characters: two advances (fullwidth)
//! - Control characters: zero
//!
//! Hosts with real font rasterization can supply their own [`FontMetrics`];
//! the built-in [`Monospace`] metric uses a fixed advance per glyph, which
//! keeps click-to-cursor mapping and truncation deterministic.

use std::rc::Rc;

// =============================================================================
// FontMetrics
// =============================================================================

/// Glyph measurement contract used by widgets for layout and caret math.
pub trait FontMetrics {
    /// Rendered width of a single character at the given font size.
    fn char_width(&self, ch: char, font_size: f32) -> f32;

    /// Vertical space one text line occupies.
    fn line_height(&self, font_size: f32) -> f32 {
        font_size * 1.2
    }
}

/// Fixed-advance metric: `0.6 em` per glyph, doubled for fullwidth characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Monospace;

/// Advance of one ASCII glyph as a fraction of the font size.
const ADVANCE_EM: f32 = 0.6;

impl FontMetrics for Monospace {
    fn char_width(&self, ch: char, font_size: f32) -> f32 {
        if ch.is_control() {
            return 0.0;
        }
        let advance = font_size * ADVANCE_EM;
        if is_fullwidth(ch) { advance * 2.0 } else { advance }
    }
}

/// Check whether a character renders fullwidth (two advances).
fn is_fullwidth(c: char) -> bool {
    let code = c as u32;
    (0x1100..=0x115F).contains(&code)        // Hangul Jamo
        || (0x2E80..=0x9FFF).contains(&code)   // CJK
        || (0xAC00..=0xD7A3).contains(&code)   // Hangul Syllables
        || (0xF900..=0xFAFF).contains(&code)   // CJK Compatibility
        || (0xFE30..=0xFE6F).contains(&code)   // CJK Compatibility Forms
        || (0xFF00..=0xFF60).contains(&code)   // Fullwidth Forms
        || (0x1F300..=0x1F9FF).contains(&code) // Emoji
        || (0x20000..=0x2FFFF).contains(&code) // CJK Extension B-F
}

/// Shared metrics handle injected through widget options.
pub type MetricsHandle = Rc<dyn FontMetrics>;

// =============================================================================
// Measurement helpers
// =============================================================================

/// Rendered width of a whole string.
pub fn text_width(metrics: &dyn FontMetrics, s: &str, font_size: f32) -> f32 {
    s.chars().map(|c| metrics.char_width(c, font_size)).sum()
}

/// Drop characters from the front until the string fits `max_width`.
///
/// The visible window always shows the tail of overlong text, never the head.
pub fn truncate_front(
    metrics: &dyn FontMetrics,
    s: &str,
    font_size: f32,
    max_width: f32,
) -> String {
    let mut start = 0;
    let mut width = text_width(metrics, s, font_size);
    let chars: Vec<char> = s.chars().collect();

    while width > max_width && start < chars.len() {
        width -= metrics.char_width(chars[start], font_size);
        start += 1;
    }

    chars[start..].iter().collect()
}

/// Greedy word wrap to `max_width`; overlong words are hard-broken.
///
/// Explicit newlines always break. Returns one entry per rendered line
/// (a single empty line for empty input).
pub fn wrap_text(
    metrics: &dyn FontMetrics,
    s: &str,
    font_size: f32,
    max_width: f32,
) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in s.split('\n') {
        let mut line = String::new();
        let mut line_width = 0.0;

        for word in paragraph.split(' ') {
            let word_width = text_width(metrics, word, font_size);
            let space_width = metrics.char_width(' ', font_size);

            let needed = if line.is_empty() {
                word_width
            } else {
                line_width + space_width + word_width
            };
            if needed <= max_width {
                if !line.is_empty() {
                    line.push(' ');
                    line_width += space_width;
                }
                line.push_str(word);
                line_width += word_width;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_width = 0.0;
            }

            if word_width <= max_width {
                line.push_str(word);
                line_width = word_width;
            } else {
                // Hard-break a word wider than the line
                for ch in word.chars() {
                    let w = metrics.char_width(ch, font_size);
                    if line_width + w > max_width && !line.is_empty() {
                        lines.push(std::mem::take(&mut line));
                        line_width = 0.0;
                    }
                    line.push(ch);
                    line_width += w;
                }
            }
        }

        lines.push(line);
    }

    lines
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: f32 = 10.0; // 6.0 px per ASCII glyph under Monospace

    #[test]
    fn test_char_width() {
        let m = Monospace;
        assert_eq!(m.char_width('a', SIZE), 6.0);
        assert_eq!(m.char_width('世', SIZE), 12.0);
        assert_eq!(m.char_width('\n', SIZE), 0.0);
    }

    #[test]
    fn test_text_width() {
        let m = Monospace;
        assert_eq!(text_width(&m, "", SIZE), 0.0);
        assert_eq!(text_width(&m, "abc", SIZE), 18.0);
        assert_eq!(text_width(&m, "a世", SIZE), 18.0);
    }

    #[test]
    fn test_truncate_front_keeps_tail() {
        let m = Monospace;
        // Five glyphs at 6 px; 20 px fits three
        assert_eq!(truncate_front(&m, "abcde", SIZE, 20.0), "cde");
        // Fits untouched
        assert_eq!(truncate_front(&m, "ab", SIZE, 20.0), "ab");
        // Nothing fits
        assert_eq!(truncate_front(&m, "abcde", SIZE, 0.0), "");
    }

    #[test]
    fn test_truncate_front_fullwidth() {
        let m = Monospace;
        // "世界ab" = 12 + 12 + 6 + 6 = 36 px. Dropping 世 leaves 24 px,
        // still over 20, so 界 goes too.
        assert_eq!(truncate_front(&m, "世界ab", SIZE, 20.0), "ab");
    }

    #[test]
    fn test_wrap_text_basic() {
        let m = Monospace;
        // 60 px per line = 10 glyphs
        assert_eq!(
            wrap_text(&m, "hello world again", SIZE, 60.0),
            vec!["hello", "world", "again"]
        );
        assert_eq!(wrap_text(&m, "hi there", SIZE, 60.0), vec!["hi there"]);
    }

    #[test]
    fn test_wrap_text_hard_breaks_long_word() {
        let m = Monospace;
        assert_eq!(
            wrap_text(&m, "abcdefghijkl", SIZE, 30.0),
            vec!["abcde", "fghij", "kl"]
        );
    }

    #[test]
    fn test_wrap_text_newlines_and_empty() {
        let m = Monospace;
        assert_eq!(wrap_text(&m, "", SIZE, 60.0), vec![""]);
        assert_eq!(wrap_text(&m, "a\nb", SIZE, 60.0), vec!["a", "b"]);
    }
}
