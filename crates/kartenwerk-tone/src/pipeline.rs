// SPDX-License-Identifier: MIT
//
// Tone pipeline — converts a color photo to a calibrated monochrome raster
// tuned for halftone/ink printing.
//
// Stage order is fixed: BT.709 luminance + histogram → (global auto-levels
// stretch OR tiled local contrast) → gamma LUT → s-curve LUT → grain →
// write-back → vignette → dithering. The global stretch and local contrast
// are alternatives, never combined.

use image::RgbaImage;
use rand::Rng;
use tracing::{debug, instrument};

use crate::dither;
use crate::histogram::LumaHistogram;
use crate::local_contrast;
use crate::options::ToneOptions;
use crate::vignette;

/// ITU-R BT.709 luminance weights.
const LUMA_R: f32 = 0.2126;
const LUMA_G: f32 = 0.7152;
const LUMA_B: f32 = 0.0722;

/// The photo-to-monochrome tone pipeline.
///
/// Holds only configuration; all working state (histogram, LUTs, scratch
/// buffers) lives for a single `apply` call, so one pipeline value can be
/// reused across any number of images.
pub struct TonePipeline {
    options: ToneOptions,
}

impl TonePipeline {
    pub fn new(options: ToneOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ToneOptions {
        &self.options
    }

    /// Apply the pipeline in place using system entropy for grain.
    ///
    /// Grain output is intentionally not bit-reproducible across runs; use
    /// [`TonePipeline::apply_with_rng`] with a seeded RNG when determinism
    /// matters.
    pub fn apply(&self, image: &mut RgbaImage) {
        self.apply_with_rng(image, &mut rand::rng());
    }

    /// Apply the pipeline in place with an injected random source.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn apply_with_rng<R: Rng + ?Sized>(&self, image: &mut RgbaImage, rng: &mut R) {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return;
        }

        // Stage 1: grayscale conversion + histogram, one pass.
        let mut hist = LumaHistogram::new();
        let mut luma = Vec::with_capacity((width * height) as usize);
        for px in image.pixels_mut() {
            let lum = (LUMA_R * px.0[0] as f32
                + LUMA_G * px.0[1] as f32
                + LUMA_B * px.0[2] as f32)
                .round() as u8;
            px.0[0] = lum;
            px.0[1] = lum;
            px.0[2] = lum;
            hist.record(lum);
            luma.push(lum);
        }

        // Stage 2: auto-levels bounds from the 1st/99th percentiles.
        let lo = hist.percentile_index(0.01) as f32;
        let hi = hist.percentile_index(0.99) as f32;
        let median = hist.percentile_index(0.5);
        let scale = 255.0 / (hi - lo).max(1.0);

        // Stage 3: gamma LUT, auto-selected from the median when not overridden.
        let gamma = self
            .options
            .gamma
            .unwrap_or(if median < 128 { 0.8 } else { 1.2 });
        let gamma_lut = build_gamma_lut(gamma);

        // Stage 5: logistic s-curve LUT.
        let s_lut = build_s_curve_lut(self.options.s_curve_strength);

        // Stage 4 (alternative to the global stretch): tiled local contrast.
        let local = if self.options.enable_local_contrast {
            Some(local_contrast::enhance(&luma, width, height))
        } else {
            None
        };

        debug!(lo, hi, median, gamma, "tone analysis complete");

        // Per-pixel processing.
        for (i, px) in image.pixels_mut().enumerate() {
            let mut value = match &local {
                Some(enhanced) => enhanced[i] as f32,
                None => stretch(luma[i] as f32, lo, scale),
            };

            value = gamma_lut[value.round() as usize] as f32;
            value = s_lut[value as usize] as f32;

            if self.options.add_grain {
                let grain = (rng.random::<f32>() - 0.5) * self.options.grain_intensity;
                value = (value + grain).clamp(0.0, 255.0);
            }

            let out = value.round() as u8;
            px.0[0] = out;
            px.0[1] = out;
            px.0[2] = out;
        }

        // Stage 7: radial vignette, multiply-blended over the whole buffer.
        if self.options.add_vignette {
            vignette::apply(image, self.options.vignette_strength);
        }

        // Stage 8: error-diffusion dithering for pure B&W output.
        if self.options.enable_dithering {
            dither::apply(image);
        }
    }
}

/// Linear auto-levels stretch, clamped to the valid range.
#[inline]
pub(crate) fn stretch(value: f32, lo: f32, scale: f32) -> f32 {
    ((value - lo) * scale).clamp(0.0, 255.0)
}

/// `LUT[i] = round(255 * (i/255)^gamma)`.
fn build_gamma_lut(gamma: f32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        *entry = (255.0 * (i as f32 / 255.0).powf(gamma)).round() as u8;
    }
    lut
}

/// `LUT[i] = round(255 / (1 + e^(-k * (i/255 - 0.5))))`.
fn build_s_curve_lut(strength: f32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        let normalized = i as f32 / 255.0;
        let curved = 1.0 / (1.0 + (-strength * (normalized - 0.5)).exp());
        *entry = (255.0 * curved).round() as u8;
    }
    lut
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn gradient_image(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            let v = ((x + y * width) % 256) as u8;
            Rgba([v, v / 2, 255 - v, 200])
        })
    }

    fn options_without_grain() -> ToneOptions {
        ToneOptions {
            add_grain: false,
            ..ToneOptions::default()
        }
    }

    #[test]
    fn luminance_stage_equalizes_channels_and_keeps_alpha() {
        let mut img = gradient_image(64, 48);
        let pipeline = TonePipeline::new(options_without_grain());
        pipeline.apply(&mut img);

        for px in img.pixels() {
            assert_eq!(px.0[0], px.0[1]);
            assert_eq!(px.0[1], px.0[2]);
            assert_eq!(px.0[3], 200, "alpha must pass through untouched");
        }
    }

    #[test]
    fn gamma_lut_is_monotonic_for_valid_gammas() {
        for gamma in [0.2f32, 0.8, 1.0, 1.2, 2.0] {
            let lut = build_gamma_lut(gamma);
            for i in 1..256 {
                assert!(
                    lut[i] >= lut[i - 1],
                    "gamma {gamma} LUT decreases at {i}: {} -> {}",
                    lut[i - 1],
                    lut[i]
                );
            }
            assert_eq!(lut[0], 0);
            assert_eq!(lut[255], 255);
        }
    }

    #[test]
    fn s_curve_lut_is_monotonic_and_fixed_near_midpoint() {
        for strength in [4.0f32, 6.0, 8.0, 12.0] {
            let lut = build_s_curve_lut(strength);
            for i in 1..256 {
                assert!(lut[i] >= lut[i - 1], "s-curve k={strength} not monotonic");
            }
            // The logistic curve crosses its midpoint between bins 127 and 128.
            for mid in [127usize, 128] {
                let delta = (lut[mid] as f32 - 127.5).abs();
                assert!(
                    delta <= 2.0,
                    "s-curve k={strength} maps {mid} to {} (off midpoint by {delta})",
                    lut[mid]
                );
            }
        }
    }

    #[test]
    fn stretch_is_identity_once_range_is_full() {
        // lo = 0 and hi = 255 give scale 1.0: re-applying changes nothing.
        let scale = 255.0 / 255.0f32;
        for v in 0..=255 {
            let once = stretch(v as f32, 0.0, scale);
            let twice = stretch(once, 0.0, scale);
            assert_eq!(once, twice);
            assert_eq!(once, v as f32);
        }
    }

    #[test]
    fn seeded_grain_is_reproducible() {
        let opts = ToneOptions {
            add_grain: true,
            ..ToneOptions::default()
        };
        let pipeline = TonePipeline::new(opts);

        let mut a = gradient_image(32, 32);
        let mut b = a.clone();
        pipeline.apply_with_rng(&mut a, &mut StdRng::seed_from_u64(7));
        pipeline.apply_with_rng(&mut b, &mut StdRng::seed_from_u64(7));
        assert_eq!(a.as_raw(), b.as_raw());

        let mut c = gradient_image(32, 32);
        pipeline.apply_with_rng(&mut c, &mut StdRng::seed_from_u64(8));
        assert_ne!(a.as_raw(), c.as_raw(), "different seeds should differ");
    }

    #[test]
    fn dark_image_gets_brightening_gamma() {
        // A mostly-dark image has median < 128, selecting gamma 0.8 which
        // lifts mid-tones. Compare against a forced 1.2 to see the lift.
        let dark = RgbaImage::from_fn(32, 32, |x, _| {
            let v = (x % 60) as u8;
            Rgba([v, v, v, 255])
        });

        let mut auto = dark.clone();
        TonePipeline::new(options_without_grain()).apply(&mut auto);

        let mut forced = dark.clone();
        TonePipeline::new(ToneOptions {
            gamma: Some(1.2),
            ..options_without_grain()
        })
        .apply(&mut forced);

        let sum = |img: &RgbaImage| -> u64 { img.pixels().map(|p| p.0[0] as u64).sum() };
        assert!(
            sum(&auto) >= sum(&forced),
            "auto gamma on a dark image should not be darker than gamma 1.2"
        );
    }

    #[test]
    fn empty_image_is_a_no_op() {
        let mut img = RgbaImage::new(0, 0);
        TonePipeline::new(ToneOptions::default()).apply(&mut img);
        assert_eq!(img.dimensions(), (0, 0));
    }
}
