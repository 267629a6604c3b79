// SPDX-License-Identifier: MIT
//
// Embedded monospace fonts for card text.

use std::sync::OnceLock;

use ab_glyph::FontRef;
use kartenwerk_core::error::{KartenwerkError, Result};

static MONO_REGULAR: &[u8] = include_bytes!("../assets/fonts/DejaVuSansMono.ttf");
static MONO_BOLD: &[u8] = include_bytes!("../assets/fonts/DejaVuSansMono-Bold.ttf");

/// The monospace family used on every card face.
pub struct Fonts {
    pub regular: FontRef<'static>,
    pub bold: FontRef<'static>,
}

impl Fonts {
    fn load() -> Result<Self> {
        Ok(Self {
            regular: FontRef::try_from_slice(MONO_REGULAR)
                .map_err(|e| KartenwerkError::FontError(format!("mono regular: {e}")))?,
            bold: FontRef::try_from_slice(MONO_BOLD)
                .map_err(|e| KartenwerkError::FontError(format!("mono bold: {e}")))?,
        })
    }
}

/// Parse the embedded fonts once per process.
pub fn fonts() -> Result<&'static Fonts> {
    static FONTS: OnceLock<Fonts> = OnceLock::new();
    if let Some(loaded) = FONTS.get() {
        return Ok(loaded);
    }
    let loaded = Fonts::load()?;
    Ok(FONTS.get_or_init(|| loaded))
}
