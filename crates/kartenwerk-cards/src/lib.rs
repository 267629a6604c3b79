// SPDX-License-Identifier: MIT
//
// kartenwerk-cards — Card rendering and print layout.
//
// Composes double-sided card faces (photo, text banner, hidden sequence
// marker), tiles them five per landscape-letter page with fold and cut
// guides, and assembles the result into a PDF via a small document-backend
// abstraction.

pub mod backend;
pub mod date;
pub mod export;
pub mod face;
pub mod fonts;
pub mod layout;
pub mod placeholder;
pub mod text_fit;

pub use backend::{DocumentBackend, ImageCmd, LineCmd, PdfBackend};
pub use export::CardSheetExporter;
pub use face::{FaceRenderer, FaceSide};
pub use layout::PageLayoutPlan;
