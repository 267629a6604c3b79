// SPDX-License-Identifier: MIT
//
// Export orchestration: walks the card list in order, renders both faces of
// each card, and emits layout commands to a document backend. A card whose
// photo fails to decode prints as a placeholder; the run never aborts over
// one bad image.

use std::collections::HashMap;

use image::RgbaImage;
use kartenwerk_core::TimelineCard;
use kartenwerk_core::error::{KartenwerkError, Result};
use kartenwerk_tone::{ToneOptions, crop_to_card_with_options};
use tracing::{info, instrument, warn};

use crate::backend::{DocumentBackend, ImageCmd, LineCmd, PdfBackend};
use crate::date::{format_date_text, year_counts};
use crate::face::{FaceRenderer, FaceSide, FaceSpec};
use crate::layout::{
    CARD_HEIGHT_MM, CARDS_PER_PAGE, CUT_GUIDE_GRAY, CUT_GUIDE_OVERHANG_MM, CUT_GUIDE_WIDTH_MM,
    FOLD_LINE_GRAY, FOLD_LINE_WIDTH_MM, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, PageLayoutPlan,
};
use crate::placeholder::placeholder_raster;

struct CardFaces {
    year: RgbaImage,
    event: RgbaImage,
}

/// Renders timeline cards onto print sheets. Construction parses the
/// embedded fonts, so a missing glyph table fails fast instead of mid-run.
pub struct CardSheetExporter {
    renderer: FaceRenderer,
    tone: ToneOptions,
}

impl CardSheetExporter {
    pub fn new() -> Result<Self> {
        Self::with_tone_options(ToneOptions::card_preset())
    }

    /// Exporter with caller-chosen tone options for the photo stage.
    pub fn with_tone_options(tone: ToneOptions) -> Result<Self> {
        Ok(Self {
            renderer: FaceRenderer::new()?,
            tone,
        })
    }

    /// Export all cards, in input order, as a PDF.
    #[instrument(skip_all, fields(cards = cards.len()))]
    pub fn export(&mut self, cards: &[TimelineCard]) -> Result<Vec<u8>> {
        let backend = PdfBackend::new("Timeline Cards", PAGE_WIDTH_MM, PAGE_HEIGHT_MM);
        self.export_with_backend(cards, backend)
    }

    /// Export against any backend. Used directly by tests and by callers
    /// that want a different output target.
    pub fn export_with_backend<B: DocumentBackend>(
        &mut self,
        cards: &[TimelineCard],
        mut backend: B,
    ) -> Result<Vec<u8>> {
        let plan = PageLayoutPlan::compute(cards.len());
        let counts = year_counts(cards);
        info!(
            cards = cards.len(),
            pages = plan.page_count,
            card_width_mm = plan.card_width_mm,
            "laying out card sheets"
        );

        for page in 0..plan.page_count {
            backend.start_page();
            for slot in 0..plan.slots_on_page(page) {
                let index = page * CARDS_PER_PAGE + slot;
                self.place_card(&mut backend, &plan, &counts, &cards[index], index, slot)?;
            }
        }
        backend.finish()
    }

    fn place_card<B: DocumentBackend>(
        &mut self,
        backend: &mut B,
        plan: &PageLayoutPlan,
        counts: &HashMap<i32, usize>,
        card: &TimelineCard,
        index: usize,
        slot: usize,
    ) -> Result<()> {
        let x = plan.card_x(slot);
        let y = plan.card_top_mm;
        let half = plan.half_height_mm();
        let sequence_id = index + 1;

        // Fold line first so card rasters overprint it inside their bounds.
        backend.draw_line(LineCmd {
            x1: x,
            y1: plan.fold_y(),
            x2: x + plan.card_width_mm,
            y2: plan.fold_y(),
            width_mm: FOLD_LINE_WIDTH_MM,
            gray: FOLD_LINE_GRAY,
        });

        let faces = match self.render_faces(card, counts, sequence_id, plan) {
            Ok(faces) => faces,
            Err(err) => {
                warn!(
                    filename = %card.filename,
                    error = %err,
                    "card image failed, printing placeholder"
                );
                self.render_placeholder_faces(card, counts, sequence_id, plan)?
            }
        };

        backend.place_image(ImageCmd {
            image: &faces.year,
            x,
            y,
            width_mm: plan.card_width_mm,
            height_mm: half,
        })?;
        backend.place_image(ImageCmd {
            image: &faces.event,
            x,
            y: y + half,
            width_mm: plan.card_width_mm,
            height_mm: half,
        })?;

        if slot > 0 {
            backend.draw_line(LineCmd {
                x1: plan.cut_guide_x(slot),
                y1: y - CUT_GUIDE_OVERHANG_MM,
                x2: plan.cut_guide_x(slot),
                y2: y + CARD_HEIGHT_MM + CUT_GUIDE_OVERHANG_MM,
                width_mm: CUT_GUIDE_WIDTH_MM,
                gray: CUT_GUIDE_GRAY,
            });
        }
        Ok(())
    }

    fn render_faces(
        &mut self,
        card: &TimelineCard,
        counts: &HashMap<i32, usize>,
        sequence_id: usize,
        plan: &PageLayoutPlan,
    ) -> Result<CardFaces> {
        let decoded =
            image::load_from_memory(&card.image).map_err(|e| KartenwerkError::ImageDecode {
                filename: card.filename.clone(),
                reason: e.to_string(),
            })?;
        let raster = crop_to_card_with_options(&decoded, &self.tone, &mut rand::rng());
        Ok(self.compose_faces(&raster, card, counts, sequence_id, plan))
    }

    fn render_placeholder_faces(
        &mut self,
        card: &TimelineCard,
        counts: &HashMap<i32, usize>,
        sequence_id: usize,
        plan: &PageLayoutPlan,
    ) -> Result<CardFaces> {
        let raster = placeholder_raster()?;
        Ok(self.compose_faces(&raster, card, counts, sequence_id, plan))
    }

    fn compose_faces(
        &mut self,
        raster: &RgbaImage,
        card: &TimelineCard,
        counts: &HashMap<i32, usize>,
        sequence_id: usize,
        plan: &PageLayoutPlan,
    ) -> CardFaces {
        let half = plan.half_height_mm();
        let label = card.clamped_event_name();
        let date_text = format_date_text(card, counts);

        let year = self.renderer.render(
            &FaceSpec {
                image: raster,
                side: FaceSide::Year,
                banner_text: &date_text,
                event_line: Some(label),
                sequence_id,
            },
            plan.card_width_mm,
            half,
        );
        let event = self.renderer.render(
            &FaceSpec {
                image: raster,
                side: FaceSide::Event,
                banner_text: label,
                event_line: None,
                sequence_id,
            },
            plan.card_width_mm,
            half,
        );
        CardFaces { year, event }
    }
}
