// SPDX-License-Identifier: MIT
//
// Crop stage — centered 3:4 crop of the source photo, downsized to a
// print-safe resolution and passed through the tone pipeline card preset.
// One raster per card, reused by both faces.

use image::{DynamicImage, RgbaImage, imageops::FilterType};
use rand::Rng;
use tracing::{debug, instrument};

use crate::options::ToneOptions;
use crate::pipeline::TonePipeline;

/// Card image aspect ratio (width / height).
pub const CARD_ASPECT: f32 = 3.0 / 4.0;

/// Print-safe cap, roughly 300 DPI at the printed card width. Larger crops
/// are downsized to this; smaller crops are never upscaled.
pub const PRINT_SAFE_WIDTH: u32 = 600;
pub const PRINT_SAFE_HEIGHT: u32 = 800;

/// Crop the source to the largest centered 3:4 window, cap the resolution,
/// and run the tone pipeline card preset. Grain uses system entropy.
pub fn crop_to_card(source: &DynamicImage) -> RgbaImage {
    crop_to_card_with_rng(source, &mut rand::rng())
}

/// Same as [`crop_to_card`] with an injected random source for the grain stage.
pub fn crop_to_card_with_rng<R: Rng + ?Sized>(source: &DynamicImage, rng: &mut R) -> RgbaImage {
    crop_to_card_with_options(source, &ToneOptions::card_preset(), rng)
}

/// Fully parameterized variant: caller-chosen tone options and random source.
#[instrument(skip_all, fields(src_w = source.width(), src_h = source.height()))]
pub fn crop_to_card_with_options<R: Rng + ?Sized>(
    source: &DynamicImage,
    options: &ToneOptions,
    rng: &mut R,
) -> RgbaImage {
    let (width, height) = (source.width(), source.height());
    if width == 0 || height == 0 {
        return RgbaImage::new(0, 0);
    }

    // Largest centered 3:4 window: crop width when the source is wider than
    // 3:4, otherwise crop height. Never letterbox.
    let source_aspect = width as f32 / height as f32;
    let (crop_x, crop_y, crop_w, crop_h) = if source_aspect > CARD_ASPECT {
        let crop_w = (height as f32 * CARD_ASPECT).round() as u32;
        (((width - crop_w) / 2), 0, crop_w.max(1), height)
    } else {
        let crop_h = (width as f32 / CARD_ASPECT).round() as u32;
        let crop_h = crop_h.min(height).max(1);
        (0, (height - crop_h) / 2, width, crop_h)
    };

    let cropped = source.crop_imm(crop_x, crop_y, crop_w, crop_h);

    // Downsize to the print-safe cap; never upscale.
    let mut raster = if cropped.width() > PRINT_SAFE_WIDTH || cropped.height() > PRINT_SAFE_HEIGHT {
        debug!(
            from_w = cropped.width(),
            from_h = cropped.height(),
            "downsizing crop to print-safe resolution"
        );
        cropped
            .resize_exact(PRINT_SAFE_WIDTH, PRINT_SAFE_HEIGHT, FilterType::Lanczos3)
            .to_rgba8()
    } else {
        cropped.to_rgba8()
    };

    TonePipeline::new(options.clone()).apply_with_rng(&mut raster, rng);
    raster
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn solid(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([90, 140, 200, 255]),
        ))
    }

    fn aspect_error(w: u32, h: u32) -> f32 {
        (w as f32 / h as f32 - CARD_ASPECT).abs()
    }

    #[test]
    fn wide_16x9_source_crops_to_centered_3x4() {
        // 1920x1080: crop window is 810x1080 centered at x=555, which is
        // over the print cap and lands on exactly 600x800.
        let out = crop_to_card_with_rng(&solid(1920, 1080), &mut StdRng::seed_from_u64(1));
        assert!(
            aspect_error(out.width(), out.height()) < 0.01,
            "expected ~3:4, got {}x{}",
            out.width(),
            out.height()
        );
        assert_eq!((out.width(), out.height()), (600, 800));
    }

    #[test]
    fn crop_window_is_horizontally_centered() {
        // Left half black, right half white; a centered crop of a 16:9
        // source straddles the boundary, so both tones must appear.
        let src = DynamicImage::ImageRgba8(RgbaImage::from_fn(1600, 900, |x, _| {
            if x < 800 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        }));
        let out = crop_to_card_with_rng(&src, &mut StdRng::seed_from_u64(2));

        let left = out.get_pixel(0, out.height() / 2).0[0];
        let right = out.get_pixel(out.width() - 1, out.height() / 2).0[0];
        assert!(left < 100, "left edge should come from the dark half");
        assert!(right > 150, "right edge should come from the bright half");
    }

    #[test]
    fn tall_source_crops_height() {
        let out = crop_to_card_with_rng(&solid(600, 2000), &mut StdRng::seed_from_u64(3));
        assert!(aspect_error(out.width(), out.height()) < 0.01);
        assert_eq!(out.width(), 600);
        assert_eq!(out.height(), 800);
    }

    #[test]
    fn oversized_source_is_capped_small_source_is_not_upscaled() {
        let big = crop_to_card_with_rng(&solid(6000, 8000), &mut StdRng::seed_from_u64(4));
        assert_eq!((big.width(), big.height()), (PRINT_SAFE_WIDTH, PRINT_SAFE_HEIGHT));

        let small = crop_to_card_with_rng(&solid(150, 200), &mut StdRng::seed_from_u64(5));
        assert_eq!((small.width(), small.height()), (150, 200));
    }

    #[test]
    fn output_is_monochrome() {
        let out = crop_to_card_with_rng(&solid(400, 400), &mut StdRng::seed_from_u64(6));
        for px in out.pixels() {
            assert_eq!(px.0[0], px.0[1]);
            assert_eq!(px.0[1], px.0[2]);
        }
    }
}
