// SPDX-License-Identifier: MIT
//
// Placeholder raster for cards whose photo cannot be decoded. The export
// keeps going; the broken card prints with a neutral gray frame.

use ab_glyph::PxScale;
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use kartenwerk_core::error::Result;

use crate::fonts::fonts;

const PLACEHOLDER_WIDTH: u32 = 150;
const PLACEHOLDER_HEIGHT: u32 = 200;

/// A light gray 3:4 raster with a centered "Image" caption.
pub fn placeholder_raster() -> Result<RgbaImage> {
    let loaded = fonts()?;
    let mut raster = RgbaImage::from_pixel(
        PLACEHOLDER_WIDTH,
        PLACEHOLDER_HEIGHT,
        Rgba([240, 240, 240, 255]),
    );
    let caption = "Image";
    let size = 20.0;
    // DejaVu mono advance is ~0.60 em, close enough for a caption.
    let text_w = size * 0.6 * caption.len() as f32;
    draw_text_mut(
        &mut raster,
        Rgba([150, 150, 150, 255]),
        ((PLACEHOLDER_WIDTH as f32 - text_w) / 2.0) as i32,
        (PLACEHOLDER_HEIGHT as f32 / 2.0 - size / 2.0) as i32,
        PxScale::from(size),
        &loaded.regular,
        caption,
    );
    Ok(raster)
}
