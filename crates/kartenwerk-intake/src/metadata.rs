// SPDX-License-Identifier: MIT
//
// Capture-date extraction. EXIF date tags are tried in order of trust;
// anything that fails falls back to the file's modification time, so every
// photo gets a usable date and a human-readable note of where it came from.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use exif::{In, Tag, Value};
use tracing::debug;

/// A resolved capture date plus the provenance shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoDate {
    pub taken: DateTime<Utc>,
    pub source: String,
}

/// EXIF date tags in priority order.
const DATE_TAGS: [(Tag, &str); 3] = [
    (Tag::DateTimeOriginal, "EXIF DateTimeOriginal"),
    (Tag::DateTime, "EXIF DateTime"),
    (Tag::DateTimeDigitized, "EXIF DateTimeDigitized"),
];

/// Resolve the capture date for a photo file. Never fails: EXIF first, file
/// modification time second, the current time as a last resort.
pub fn photo_date(path: &Path) -> PhotoDate {
    match read_exif_date(path) {
        Ok(Some(date)) => date,
        Ok(None) => fallback(path, "File modification date"),
        Err(err) => {
            debug!(path = %path.display(), error = %err, "EXIF read failed");
            fallback(path, "File modification date (EXIF error)")
        }
    }
}

fn read_exif_date(path: &Path) -> std::io::Result<Option<PhotoDate>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let parsed = exif::Reader::new()
        .read_from_container(&mut reader)
        .map_err(std::io::Error::other)?;

    for (tag, source) in DATE_TAGS {
        let Some(field) = parsed.get_field(tag, In::PRIMARY) else {
            continue;
        };
        let Some(taken) = parse_exif_datetime(&field.value) else {
            continue;
        };
        return Ok(Some(PhotoDate {
            taken,
            source: source.to_string(),
        }));
    }
    Ok(None)
}

/// EXIF dates are ASCII "YYYY:MM:DD HH:MM:SS".
fn parse_exif_datetime(value: &Value) -> Option<DateTime<Utc>> {
    let Value::Ascii(ref strings) = *value else {
        return None;
    };
    let raw = strings.first()?;
    let text = std::str::from_utf8(raw).ok()?.trim();
    let naive = NaiveDateTime::parse_from_str(text, "%Y:%m:%d %H:%M:%S").ok()?;
    Some(naive.and_utc())
}

fn fallback(path: &Path, source: &str) -> PhotoDate {
    let taken = std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());
    PhotoDate {
        taken,
        source: source.to_string(),
    }
}
