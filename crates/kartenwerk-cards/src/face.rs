// SPDX-License-Identifier: MIT
//
// Card face composition. Each card prints as two stacked half-faces: the
// event face (photo plus black label banner) and the year face (photo plus
// white date badge), with a faint sequence marker under each banner. The
// year face is rotated 180 degrees so the folded card reads upright on
// both sides.

use ab_glyph::PxScale;
use image::{Rgba, RgbaImage, imageops};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use kartenwerk_core::error::Result;
use tracing::instrument;

use crate::fonts::{Fonts, fonts};
use crate::text_fit::{DATE_CHAR_BUDGET, MonoMetrics, char_budget, truncate_label};

/// Raster resolution of a rendered face, in pixels per millimetre. Three
/// gives ~300 DPI headroom at print size.
pub const FACE_SCALE: f32 = 3.0;

const MARGIN_MM: f32 = 1.5;
const BANNER_HEIGHT_MM: f32 = 20.0;
const BANNER_INSET_MM: f32 = 2.0;
const TEXT_SPACING_MM: f32 = 2.0;
const SEQ_ZONE_MM: f32 = 6.0;
const SEQ_SPACING_MM: f32 = 1.0;
const SEQ_TEXT_MM: f32 = 4.0;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Which half of the folded card a face belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceSide {
    /// Photo with the event label on a black banner.
    Event,
    /// Photo with the date badge; flipped for the fold.
    Year,
}

/// One face render request. `banner_text` is the event label on the event
/// face and the date line on the year face; `event_line` is the optional
/// small label under the date.
pub struct FaceSpec<'a> {
    pub image: &'a RgbaImage,
    pub side: FaceSide,
    pub banner_text: &'a str,
    pub event_line: Option<&'a str>,
    pub sequence_id: usize,
}

/// Renders card faces into pixel buffers at [`FACE_SCALE`]. Owns the font
/// metrics cache, so size lookups amortize across an export run.
pub struct FaceRenderer {
    fonts: &'static Fonts,
    regular_metrics: MonoMetrics,
    bold_metrics: MonoMetrics,
}

impl FaceRenderer {
    pub fn new() -> Result<Self> {
        let loaded = fonts()?;
        Ok(Self {
            fonts: loaded,
            regular_metrics: MonoMetrics::new(loaded.regular.clone()),
            bold_metrics: MonoMetrics::new(loaded.bold.clone()),
        })
    }

    /// Render one face at `card_w_mm` x `half_h_mm` print size. Year faces
    /// come back already rotated for the fold.
    #[instrument(skip_all, fields(side = ?spec.side, seq = spec.sequence_id))]
    pub fn render(&mut self, spec: &FaceSpec<'_>, card_w_mm: f32, half_h_mm: f32) -> RgbaImage {
        let face_w = (card_w_mm * FACE_SCALE).round().max(1.0) as u32;
        let face_h = (half_h_mm * FACE_SCALE).round().max(1.0) as u32;
        let mut face = RgbaImage::from_pixel(face_w, face_h, WHITE);

        let margin = MARGIN_MM * FACE_SCALE;
        let banner_h = BANNER_HEIGHT_MM * FACE_SCALE;
        let text_spacing = TEXT_SPACING_MM * FACE_SCALE;
        let seq_zone = SEQ_ZONE_MM * FACE_SCALE;
        let seq_spacing = SEQ_SPACING_MM * FACE_SCALE;

        // Photo region: whatever is left above the banner and the sequence
        // zone, filled with the largest 3:4 rectangle that fits.
        let avail_w = face_w as f32 - 2.0 * margin;
        let avail_h = face_h as f32 - 2.0 * margin - banner_h - text_spacing - seq_zone - seq_spacing;
        let (img_w, img_h) = if avail_w / avail_h > 0.75 {
            (avail_h * 0.75, avail_h)
        } else {
            (avail_w, avail_w * 4.0 / 3.0)
        };
        let img_x = (face_w as f32 - img_w) / 2.0;
        let img_y = margin;

        if spec.image.width() > 0 && spec.image.height() > 0 && img_w >= 1.0 && img_h >= 1.0 {
            let scaled = imageops::resize(
                spec.image,
                img_w.round() as u32,
                img_h.round() as u32,
                imageops::FilterType::Lanczos3,
            );
            imageops::overlay(&mut face, &scaled, img_x.round() as i64, img_y.round() as i64);
        }

        let banner_w = face_w as f32 - 2.0 * BANNER_INSET_MM * FACE_SCALE;
        let banner_x = (face_w as f32 - banner_w) / 2.0;
        let banner_y = img_y + img_h + text_spacing;

        match spec.side {
            FaceSide::Event => {
                self.draw_event_banner(&mut face, banner_x, banner_y, banner_w, banner_h, spec.banner_text);
            }
            FaceSide::Year => {
                self.draw_date_badge(
                    &mut face,
                    banner_x,
                    banner_y,
                    banner_w,
                    banner_h,
                    spec.banner_text,
                    spec.event_line,
                );
            }
        }

        self.draw_sequence_marker(
            &mut face,
            face_w,
            banner_y + banner_h + seq_spacing,
            spec.sequence_id,
        );

        if spec.side == FaceSide::Year {
            face = imageops::rotate180(&face);
        }
        face
    }

    /// Black banner with the event label in bold white. An empty label
    /// prints as "? ? ?" so a blank banner is visibly intentional.
    fn draw_event_banner(
        &mut self,
        face: &mut RgbaImage,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        label: &str,
    ) {
        draw_filled_rect_mut(
            face,
            Rect::at(x.round() as i32, y.round() as i32).of_size(w.round() as u32, h.round() as u32),
            BLACK,
        );

        let trimmed = label.trim();
        let text = if trimmed.is_empty() {
            "? ? ?"
        } else {
            truncate_label(trimmed)
        };
        let chars = text.chars().count();
        let inset = 2.0 * BANNER_INSET_MM * FACE_SCALE;
        let size = self.bold_metrics.fit_size(w - inset, char_budget(chars));
        let text_w = self.bold_metrics.text_width(size, chars);
        let tx = x + (w - text_w) / 2.0;
        let ty = y + (h - size as f32) / 2.0;
        let bold = self.fonts.bold.clone();
        draw_text_mut(
            face,
            WHITE,
            tx.round() as i32,
            ty.round() as i32,
            PxScale::from(size as f32),
            &bold,
            text,
        );
    }

    /// White badge with a thin black border, the bold date line in the
    /// upper half, and an optional small event line in the lower half.
    fn draw_date_badge(
        &mut self,
        face: &mut RgbaImage,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        date_text: &str,
        event_line: Option<&str>,
    ) {
        let rect =
            Rect::at(x.round() as i32, y.round() as i32).of_size(w.round() as u32, h.round() as u32);
        draw_filled_rect_mut(face, rect, WHITE);
        draw_hollow_rect_mut(face, rect, BLACK);

        let inset = 2.0 * BANNER_INSET_MM * FACE_SCALE;
        let date_chars = date_text.chars().count();
        let date_size = self
            .bold_metrics
            .fit_size(w - inset, DATE_CHAR_BUDGET.max(date_chars));
        let date_w = self.bold_metrics.text_width(date_size, date_chars);
        let bold = self.fonts.bold.clone();
        draw_text_mut(
            face,
            BLACK,
            (x + (w - date_w) / 2.0).round() as i32,
            (y + h / 4.0 - date_size as f32 / 2.0).round() as i32,
            PxScale::from(date_size as f32),
            &bold,
            date_text,
        );

        let Some(line) = event_line.map(str::trim).filter(|l| !l.is_empty()) else {
            return;
        };
        let line = truncate_label(line);
        let chars = line.chars().count();
        let size = self.regular_metrics.fit_size(w - inset, char_budget(chars));
        let line_w = self.regular_metrics.text_width(size, chars);
        let regular = self.fonts.regular.clone();
        draw_text_mut(
            face,
            BLACK,
            (x + (w - line_w) / 2.0).round() as i32,
            (y + 3.0 * h / 4.0 - size as f32 / 2.0).round() as i32,
            PxScale::from(size as f32),
            &regular,
            line,
        );
    }

    /// Sequence id in white under the banner. Invisible on paper, machine
    /// recoverable for re-sorting printed decks.
    fn draw_sequence_marker(&mut self, face: &mut RgbaImage, face_w: u32, y: f32, sequence_id: usize) {
        let text = sequence_id.to_string();
        let size = (SEQ_TEXT_MM * FACE_SCALE).round() as u32;
        let text_w = self.regular_metrics.text_width(size, text.chars().count());
        let regular = self.fonts.regular.clone();
        draw_text_mut(
            face,
            WHITE,
            ((face_w as f32 - text_w) / 2.0).round() as i32,
            y.round() as i32,
            PxScale::from(size as f32),
            &regular,
            &text,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo() -> RgbaImage {
        RgbaImage::from_pixel(150, 200, Rgba([120, 120, 120, 255]))
    }

    fn spec<'a>(image: &'a RgbaImage, side: FaceSide, text: &'a str) -> FaceSpec<'a> {
        FaceSpec {
            image,
            side,
            banner_text: text,
            event_line: None,
            sequence_id: 1,
        }
    }

    fn count_black(face: &RgbaImage) -> usize {
        face.pixels().filter(|p| p.0[0] < 16).count()
    }

    #[test]
    fn face_dimensions_follow_print_size() {
        let mut renderer = FaceRenderer::new().unwrap();
        let img = photo();
        let face = renderer.render(&spec(&img, FaceSide::Event, "Party"), 43.0, 95.0);
        assert_eq!(face.width(), 129); // 43mm * 3 px/mm
        assert_eq!(face.height(), 285); // 95mm * 3 px/mm
    }

    #[test]
    fn event_face_has_black_banner() {
        let mut renderer = FaceRenderer::new().unwrap();
        let img = photo();
        let face = renderer.render(&spec(&img, FaceSide::Event, "Party"), 43.0, 95.0);
        // The banner alone is 60px tall across ~117px, thousands of pixels.
        assert!(count_black(&face) > 3000, "banner fill missing");
    }

    #[test]
    fn empty_label_still_prints_text() {
        let mut renderer = FaceRenderer::new().unwrap();
        let img = photo();
        let blank = renderer.render(&spec(&img, FaceSide::Event, "   "), 43.0, 95.0);
        let labeled = renderer.render(&spec(&img, FaceSide::Event, "Party"), 43.0, 95.0);
        // "? ? ?" punches white pixels into the banner just as a label does.
        let white_in_blank = blank.pixels().filter(|p| p.0[0] > 240).count();
        assert!(white_in_blank > 0);
        assert_ne!(blank.as_raw(), labeled.as_raw());
    }

    #[test]
    fn year_face_is_flipped() {
        let mut renderer = FaceRenderer::new().unwrap();
        let img = photo();
        let face = renderer.render(
            &FaceSpec {
                image: &img,
                side: FaceSide::Year,
                banner_text: "Apr 2019",
                event_line: Some("Party"),
                sequence_id: 3,
            },
            43.0,
            95.0,
        );
        // After the flip the photo sits in the lower half, so the top rows
        // (badge zone margin) are lighter on average than the photo rows.
        let row_mean = |y: u32| {
            let sum: u64 = (0..face.width()).map(|x| face.get_pixel(x, y).0[0] as u64).sum();
            sum / face.width() as u64
        };
        assert!(row_mean(2) > 200, "flipped face should start with margin white");
        let photo_zone: u64 = (face.height() - 60..face.height() - 20).map(row_mean).sum::<u64>() / 40;
        assert!(photo_zone < 200, "photo should land in the lower half after the flip");
    }

    #[test]
    fn long_label_renders_smaller_than_short_label() {
        let mut renderer = FaceRenderer::new().unwrap();
        let short = renderer.bold_metrics.fit_size(200.0, char_budget(4));
        let long = renderer.bold_metrics.fit_size(200.0, char_budget(18));
        assert!(short > long);
    }
}
