// SPDX-License-Identifier: MIT
//
// Document backend seam. The layout engine emits explicit page, line, and
// image commands; the PDF backend translates them into printpdf operations.
// Commands use millimetres from the top-left page corner, the backend owns
// the flip into PDF's bottom-left coordinate space.

use image::RgbaImage;
use kartenwerk_core::error::Result;
use printpdf::{
    Color, Line, LinePoint, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point,
    RawImage, RawImageData, RawImageFormat, Rgb, XObjectTransform,
};
use tracing::debug;

/// Placement resolution for rasters on the page.
const IMAGE_DPI: f32 = 300.0;

/// A straight guide line, in page millimetres from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineCmd {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub width_mm: f32,
    /// Gray level, 0 black to 255 white.
    pub gray: u8,
}

/// A raster placed on the page, in millimetres from the top-left corner.
pub struct ImageCmd<'a> {
    pub image: &'a RgbaImage,
    pub x: f32,
    pub y: f32,
    pub width_mm: f32,
    pub height_mm: f32,
}

/// Receiver for layout commands. Pages are implicit: `start_page` opens a
/// fresh one, subsequent commands land on it.
pub trait DocumentBackend {
    fn start_page(&mut self);
    fn draw_line(&mut self, cmd: LineCmd);
    fn place_image(&mut self, cmd: ImageCmd<'_>) -> Result<()>;
    fn finish(self) -> Result<Vec<u8>>;
}

/// printpdf-backed document writer.
pub struct PdfBackend {
    doc: PdfDocument,
    pages: Vec<PdfPage>,
    ops: Vec<Op>,
    page_width: Mm,
    page_height: Mm,
    page_open: bool,
}

impl PdfBackend {
    pub fn new(title: &str, page_width_mm: f32, page_height_mm: f32) -> Self {
        Self {
            doc: PdfDocument::new(title),
            pages: Vec::new(),
            ops: Vec::new(),
            page_width: Mm(page_width_mm),
            page_height: Mm(page_height_mm),
            page_open: false,
        }
    }

    fn close_page(&mut self) {
        let ops = std::mem::take(&mut self.ops);
        self.pages
            .push(PdfPage::new(self.page_width, self.page_height, ops));
    }

    /// Flip a top-left y into PDF space, for a box of `height_mm`.
    fn flip_y(&self, y_top_mm: f32, height_mm: f32) -> f32 {
        self.page_height.0 - y_top_mm - height_mm
    }
}

impl DocumentBackend for PdfBackend {
    fn start_page(&mut self) {
        if self.page_open {
            self.close_page();
        }
        self.page_open = true;
    }

    fn draw_line(&mut self, cmd: LineCmd) {
        let level = cmd.gray as f32 / 255.0;
        self.ops.push(Op::SetOutlineColor {
            col: Color::Rgb(Rgb {
                r: level,
                g: level,
                b: level,
                icc_profile: None,
            }),
        });
        self.ops.push(Op::SetOutlineThickness {
            pt: Mm(cmd.width_mm).into_pt(),
        });
        self.ops.push(Op::DrawLine {
            line: Line {
                points: vec![
                    LinePoint {
                        p: Point::new(Mm(cmd.x1), Mm(self.flip_y(cmd.y1, 0.0))),
                        bezier: false,
                    },
                    LinePoint {
                        p: Point::new(Mm(cmd.x2), Mm(self.flip_y(cmd.y2, 0.0))),
                        bezier: false,
                    },
                ],
                is_closed: false,
            },
        });
    }

    fn place_image(&mut self, cmd: ImageCmd<'_>) -> Result<()> {
        let (px_w, px_h) = (cmd.image.width(), cmd.image.height());
        let mut rgb = Vec::with_capacity(px_w as usize * px_h as usize * 3);
        for px in cmd.image.pixels() {
            rgb.extend_from_slice(&px.0[..3]);
        }
        let raw = RawImage {
            pixels: RawImageData::U8(rgb),
            width: px_w as usize,
            height: px_h as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let image_id = self.doc.add_image(&raw);

        // The xobject renders at px / dpi inches natively; scale to the
        // requested millimetre box.
        let native_w_pt = px_w as f32 / IMAGE_DPI * 72.0;
        let native_h_pt = px_h as f32 / IMAGE_DPI * 72.0;
        let transform = XObjectTransform {
            translate_x: Some(Mm(cmd.x).into_pt()),
            translate_y: Some(Mm(self.flip_y(cmd.y, cmd.height_mm)).into_pt()),
            scale_x: Some(Mm(cmd.width_mm).into_pt().0 / native_w_pt),
            scale_y: Some(Mm(cmd.height_mm).into_pt().0 / native_h_pt),
            rotate: None,
            dpi: Some(IMAGE_DPI),
        };
        self.ops.push(Op::UseXobject {
            id: image_id,
            transform,
        });
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        if self.page_open {
            self.close_page();
        }
        if self.pages.is_empty() {
            // A zero-card export still yields a readable document.
            self.pages
                .push(PdfPage::new(self.page_width, self.page_height, Vec::new()));
        }
        debug!(pages = self.pages.len(), "serializing document");
        let pages = std::mem::take(&mut self.pages);
        self.doc.with_pages(pages);
        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        Ok(self.doc.save(&PdfSaveOptions::default(), &mut warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn raster() -> RgbaImage {
        RgbaImage::from_pixel(30, 40, Rgba([80, 80, 80, 255]))
    }

    #[test]
    fn empty_document_still_serializes() {
        let backend = PdfBackend::new("Empty", 279.4, 215.9);
        let bytes = backend.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn pages_and_content_round_trip_through_save() {
        let mut backend = PdfBackend::new("Cards", 279.4, 215.9);
        backend.start_page();
        backend.draw_line(LineCmd {
            x1: 10.0,
            y1: 107.95,
            x2: 53.0,
            y2: 107.95,
            width_mm: 0.2,
            gray: 200,
        });
        let img = raster();
        backend
            .place_image(ImageCmd {
                image: &img,
                x: 10.0,
                y: 12.95,
                width_mm: 43.0,
                height_mm: 95.0,
            })
            .unwrap();
        backend.start_page();
        let bytes = backend.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn flip_maps_top_left_to_pdf_space() {
        let backend = PdfBackend::new("T", 279.4, 215.9);
        // A 95mm box whose top edge sits 12.95mm from the top lands with
        // its bottom edge 107.95mm above the PDF origin.
        let y = backend.flip_y(12.95, 95.0);
        assert!((y - 107.95).abs() < 1e-3);
    }
}
