use serde::{Deserialize, Serialize};

/// Text measurement supplied by whichever backend will paint the scene.
///
/// Implementations must be deterministic for a fixed font configuration.
/// Scene builders never cache results between builds.
pub trait TextMetrics {
    /// Pixel width of `text` rendered in the default font.
    fn text_width(&self, text: &str) -> f64;

    /// Pixel height of `text` rendered in the default font.
    fn text_height(&self, text: &str) -> f64;
}

impl<T: TextMetrics + ?Sized> TextMetrics for &T {
    fn text_width(&self, text: &str) -> f64 {
        (**self).text_width(text)
    }

    fn text_height(&self, text: &str) -> f64 {
        (**self).text_height(text)
    }
}

/// Fixed advance per character. Good enough for SVG export and tests where
/// no real font is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonospaceMetrics {
    pub char_width: f64,
    pub line_height: f64,
}

impl MonospaceMetrics {
    pub fn new(char_width: f64, line_height: f64) -> Self {
        Self {
            char_width,
            line_height,
        }
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new(7.0, 14.0)
    }
}

impl TextMetrics for MonospaceMetrics {
    fn text_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.char_width
    }

    fn text_height(&self, text: &str) -> f64 {
        if text.is_empty() { 0.0 } else { self.line_height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monospace_counts_chars_not_bytes() {
        let m = MonospaceMetrics::new(10.0, 12.0);
        assert!((m.text_width("abc") - 30.0).abs() < f64::EPSILON);
        assert!((m.text_width("äöü") - 30.0).abs() < f64::EPSILON);
        assert!((m.text_height("x") - 12.0).abs() < f64::EPSILON);
        assert!(m.text_height("").abs() < f64::EPSILON);
    }

    #[test]
    fn references_measure_through() {
        let m = MonospaceMetrics::default();
        let dyn_ref: &dyn TextMetrics = &m;
        assert!((dyn_ref.text_width("mm") - 14.0).abs() < f64::EPSILON);
    }
}
