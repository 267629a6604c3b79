// SPDX-License-Identifier: MIT
//
// kartenwerk-intake — Photo intake: capture-date extraction from EXIF with
// filesystem fallbacks, and a persistent cache that remembers event labels
// across sessions.

pub mod label_cache;
pub mod metadata;

pub use label_cache::LabelCache;
pub use metadata::{PhotoDate, photo_date};
