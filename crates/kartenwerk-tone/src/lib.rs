// SPDX-License-Identifier: MIT
//
// kartenwerk-tone — Monochrome conversion for print.
//
// Provides the tone pipeline (BT.709 grayscale, auto-levels, gamma and
// s-curve LUTs, optional grain/vignette/dithering) and the crop stage that
// turns an arbitrary photo into a print-safe 3:4 card raster.

pub mod crop;
pub mod dither;
pub mod histogram;
pub mod local_contrast;
pub mod options;
pub mod pipeline;
pub mod vignette;

pub use crop::{crop_to_card, crop_to_card_with_options};
pub use options::ToneOptions;
pub use pipeline::TonePipeline;
