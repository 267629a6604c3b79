// SPDX-License-Identifier: MIT
//
// Page layout for the print sheet: five cards per landscape-letter page,
// evenly spaced, with a fold line across each card's middle and cut guides
// between neighboring cards.

/// Landscape US letter.
pub const PAGE_WIDTH_MM: f32 = 279.4;
pub const PAGE_HEIGHT_MM: f32 = 215.9;

pub const CARDS_PER_PAGE: usize = 5;

/// Full card height; the fold splits it into two 95mm faces.
pub const CARD_HEIGHT_MM: f32 = 190.0;

/// Nominal spacing used to derive the card width.
pub const BASE_SPACING_MM: f32 = 10.0;

/// Card width ceiling regardless of how much page is available.
pub const MAX_CARD_WIDTH_MM: f32 = 48.0;

/// How far cut guides extend past the card's top and bottom edges.
pub const CUT_GUIDE_OVERHANG_MM: f32 = 5.0;

pub const FOLD_LINE_WIDTH_MM: f32 = 0.2;
pub const CUT_GUIDE_WIDTH_MM: f32 = 0.1;
pub const FOLD_LINE_GRAY: u8 = 200;
pub const CUT_GUIDE_GRAY: u8 = 150;

/// Computed geometry for one export run. All positions in millimetres from
/// the top-left page corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayoutPlan {
    pub card_count: usize,
    pub page_count: usize,
    pub card_width_mm: f32,
    /// Actual spacing after distributing the leftover page width evenly.
    pub spacing_mm: f32,
    /// Top edge of every card; cards are vertically centered.
    pub card_top_mm: f32,
}

impl PageLayoutPlan {
    pub fn compute(card_count: usize) -> Self {
        // Width that five cards could take at nominal spacing, capped at the
        // ceiling, floored to a whole millimetre for clean cutting.
        let usable = PAGE_WIDTH_MM - 2.0 * BASE_SPACING_MM;
        let per_card = (usable - (CARDS_PER_PAGE as f32 - 1.0) * BASE_SPACING_MM)
            / CARDS_PER_PAGE as f32;
        let card_width_mm = per_card.floor().min(MAX_CARD_WIDTH_MM);

        // Redistribute what is left so the margins match the gaps.
        let spacing_mm = (PAGE_WIDTH_MM - CARDS_PER_PAGE as f32 * card_width_mm)
            / (CARDS_PER_PAGE as f32 + 1.0);

        Self {
            card_count,
            page_count: card_count.div_ceil(CARDS_PER_PAGE),
            card_width_mm,
            spacing_mm,
            card_top_mm: (PAGE_HEIGHT_MM - CARD_HEIGHT_MM) / 2.0,
        }
    }

    /// Face height, half the folded card.
    pub fn half_height_mm(&self) -> f32 {
        CARD_HEIGHT_MM / 2.0
    }

    /// Left edge of the card in `slot` (0-based, left to right).
    pub fn card_x(&self, slot: usize) -> f32 {
        self.spacing_mm + slot as f32 * (self.card_width_mm + self.spacing_mm)
    }

    /// Vertical position of the fold line.
    pub fn fold_y(&self) -> f32 {
        self.card_top_mm + CARD_HEIGHT_MM / 2.0
    }

    /// Vertical cut guide between `slot` and its left neighbor.
    pub fn cut_guide_x(&self, slot: usize) -> f32 {
        self.card_x(slot) - self.spacing_mm / 2.0
    }

    /// Number of cards on a given 0-based page.
    pub fn slots_on_page(&self, page: usize) -> usize {
        let placed = page * CARDS_PER_PAGE;
        self.card_count.saturating_sub(placed).min(CARDS_PER_PAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_cards_fill_one_page() {
        let plan = PageLayoutPlan::compute(5);
        assert_eq!(plan.page_count, 1);
        assert_eq!(plan.slots_on_page(0), 5);
    }

    #[test]
    fn twelve_cards_need_three_pages() {
        let plan = PageLayoutPlan::compute(12);
        assert_eq!(plan.page_count, 3);
        assert_eq!(plan.slots_on_page(0), 5);
        assert_eq!(plan.slots_on_page(1), 5);
        assert_eq!(plan.slots_on_page(2), 2);
    }

    #[test]
    fn zero_cards_zero_pages() {
        let plan = PageLayoutPlan::compute(0);
        assert_eq!(plan.page_count, 0);
    }

    #[test]
    fn letter_page_yields_43mm_cards() {
        let plan = PageLayoutPlan::compute(5);
        assert_eq!(plan.card_width_mm, 43.0);
        // Leftover width redistributed: (279.4 - 5 * 43) / 6.
        assert!((plan.spacing_mm - 10.733).abs() < 0.01);
    }

    #[test]
    fn cards_are_vertically_centered() {
        let plan = PageLayoutPlan::compute(1);
        assert!((plan.card_top_mm - 12.95).abs() < 1e-3);
        assert!((plan.fold_y() - 107.95).abs() < 1e-3);
    }

    #[test]
    fn last_card_stays_inside_the_page() {
        let plan = PageLayoutPlan::compute(5);
        let right_edge = plan.card_x(CARDS_PER_PAGE - 1) + plan.card_width_mm;
        assert!(right_edge <= PAGE_WIDTH_MM);
        assert!((PAGE_WIDTH_MM - right_edge - plan.spacing_mm).abs() < 0.01);
    }

    #[test]
    fn cut_guides_sit_between_cards() {
        let plan = PageLayoutPlan::compute(5);
        for slot in 1..CARDS_PER_PAGE {
            let guide = plan.cut_guide_x(slot);
            let left_card_right = plan.card_x(slot - 1) + plan.card_width_mm;
            assert!(guide > left_card_right);
            assert!(guide < plan.card_x(slot));
        }
    }
}
