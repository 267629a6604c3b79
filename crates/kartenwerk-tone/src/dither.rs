// SPDX-License-Identifier: MIT
//
// Floyd–Steinberg error diffusion to pure black/white for ink printers.

use image::RgbaImage;

/// Quantization threshold between black and white.
const THRESHOLD: f32 = 128.0;

/// Dither the (already grayscale) buffer to pure black/white in place.
///
/// Quantization error diffuses to the right (7/16), bottom-left (3/16),
/// bottom (5/16) and bottom-right (1/16) neighbors, each clamped to the
/// valid range. Alpha is untouched.
pub fn apply(image: &mut RgbaImage) {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return;
    }

    let w = width as usize;
    let h = height as usize;

    // Work on a float copy of the luminance plane so diffused fractions
    // survive until each pixel is quantized.
    let mut plane: Vec<f32> = image.pixels().map(|px| px.0[0] as f32).collect();

    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            let old = plane[idx];
            let new = if old < THRESHOLD { 0.0 } else { 255.0 };
            let error = old - new;
            plane[idx] = new;

            if x + 1 < w {
                let i = idx + 1;
                plane[i] = (plane[i] + error * 7.0 / 16.0).clamp(0.0, 255.0);
            }
            if y + 1 < h {
                if x > 0 {
                    let i = idx + w - 1;
                    plane[i] = (plane[i] + error * 3.0 / 16.0).clamp(0.0, 255.0);
                }
                let i = idx + w;
                plane[i] = (plane[i] + error * 5.0 / 16.0).clamp(0.0, 255.0);
                if x + 1 < w {
                    let i = idx + w + 1;
                    plane[i] = (plane[i] + error * 1.0 / 16.0).clamp(0.0, 255.0);
                }
            }
        }
    }

    for (px, &value) in image.pixels_mut().zip(plane.iter()) {
        let v = value as u8;
        px.0[0] = v;
        px.0[1] = v;
        px.0[2] = v;
    }
}
