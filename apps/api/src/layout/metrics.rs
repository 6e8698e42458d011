//! Static page metrics for the single-page layout estimate.
//!
//! All heights are in twips (1/20 pt, 1/1440 inch), the unit the exported
//! Word document uses for spacing. The per-element costs mirror the paragraph
//! sizes and `after` spacings the exporter writes, so the estimate tracks the
//! document a user actually downloads. This is an approximation: there is no
//! glyph measurement, only a fixed characters-per-line budget.

use serde::{Deserialize, Serialize};

/// Twips per inch.
pub const TWIPS_PER_INCH: f32 = 1440.0;
const CM_PER_INCH: f32 = 2.54;

/// Layout constants for one resume page.
///
/// Defaults assume US Letter (8.5" × 11"), 0.5" margins on all sides and an
/// 11pt body font: 10" of usable height (14 400 twips) and 7.5" of text width,
/// which holds roughly 95 characters per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMetrics {
    /// Usable height of one page.
    pub page_capacity: u32,
    pub chars_per_line: u32,
    /// Height of one wrapped line of body text.
    pub line_height: u32,
    /// Name, title and contact lines together.
    pub header_cost: u32,
    /// Rule plus section heading.
    pub section_heading_cost: u32,
    /// Bold title line of an entry (role, project, degree...).
    pub item_heading_cost: u32,
    /// Single-line metadata (company and dates, institution, year...).
    pub detail_line_cost: u32,
    pub paragraph_spacing: u32,
    pub bullet_spacing: u32,
    /// Upper bound (as a page ratio) for the displayed space-used figure.
    pub space_used_cap: f32,
}

/// Returns the default metrics matching the exporter's page setup.
pub fn default_page_metrics() -> PageMetrics {
    PageMetrics {
        page_capacity: 14_400,
        chars_per_line: 95,
        line_height: 276,
        header_cost: 1_240,
        section_heading_cost: 430,
        item_heading_cost: 330,
        detail_line_cost: 300,
        paragraph_spacing: 120,
        bullet_spacing: 60,
        space_used_cap: 1.0,
    }
}

impl PageMetrics {
    /// Number of printed lines `text` wraps to, rounded up. Blank text takes no lines.
    pub fn text_lines(&self, text: &str) -> u32 {
        let chars = text.trim().chars().count() as u32;
        if chars == 0 {
            return 0;
        }
        chars.div_ceil(self.chars_per_line.max(1))
    }

    pub fn text_height(&self, text: &str) -> u32 {
        self.text_lines(text) * self.line_height
    }

    pub fn page_ratio(&self, content_height: u32) -> f32 {
        content_height as f32 / self.page_capacity.max(1) as f32
    }

    pub fn height_to_cm(content_height: u32) -> f32 {
        content_height as f32 / TWIPS_PER_INCH * CM_PER_INCH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity_is_ten_inches() {
        let metrics = default_page_metrics();
        assert_eq!(metrics.page_capacity as f32, 10.0 * TWIPS_PER_INCH);
    }

    #[test]
    fn test_text_lines_rounds_up() {
        let metrics = default_page_metrics();
        assert_eq!(metrics.text_lines(""), 0);
        assert_eq!(metrics.text_lines("   "), 0);
        assert_eq!(metrics.text_lines("a"), 1);
        assert_eq!(metrics.text_lines(&"x".repeat(95)), 1);
        assert_eq!(metrics.text_lines(&"x".repeat(96)), 2);
        assert_eq!(metrics.text_lines(&"x".repeat(190)), 2);
    }

    #[test]
    fn test_text_lines_counts_chars_not_bytes() {
        let metrics = default_page_metrics();
        // 95 two-byte characters still fit on one line.
        assert_eq!(metrics.text_lines(&"é".repeat(95)), 1);
    }

    #[test]
    fn test_height_to_cm() {
        let cm = PageMetrics::height_to_cm(1440);
        assert!((cm - 2.54).abs() < 1e-4);
    }
}
