//! EXIF metadata extraction and display formatting.
//!
//! A photo's EXIF block is a sparse, tag-keyed bag of values. This module
//! turns it into a fixed [`Metadata`] record where every field is optional:
//! a missing tag is never an error.
//!
//! ## Resolution rules
//!
//! Several fields can come from more than one tag. The first present one wins:
//!
//! | Field | Preferred tag | Fallback |
//! |---|---|---|
//! | description | `ImageDescription` | `UserComment` |
//! | exposure | `ExposureTime` (seconds) | `ShutterSpeedValue` (APEX, `2^-v`) |
//! | aperture | `FNumber` | `ApertureValue` (APEX, `2^(v/2)`) |
//! | date | `DateTimeOriginal` | `DateTime` |
//!
//! Values read straight from a tag keep their rational form
//! ([`Number::Ratio`]); values computed from APEX are [`Number::Decimal`].
//! The display formatters branch on that distinction, so `1/250` stays `1/250`
//! while an APEX-derived `0.004` becomes `1/250` by rounding.
//!
//! ## Film stock
//!
//! Film photographers record the stock in the description, e.g.
//! `"Film stock: Portra 400"`. Any line containing `film stock:` (case
//! insensitive, the space before `stock` and after the colon are optional)
//! yields the film stock and is removed from the description.

use chrono::NaiveDateTime;
use exif::{In, Tag, Value};

const DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// A numeric EXIF value, either as stored or as computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Ratio { num: u32, denom: u32 },
    Decimal(f64),
}

impl Number {
    pub fn to_f64(self) -> f64 {
        match self {
            Number::Ratio { num, denom } => num as f64 / denom as f64,
            Number::Decimal(v) => v,
        }
    }
}

/// Normalized photo metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub make: Option<String>,
    pub model: Option<String>,
    pub lens_make: Option<String>,
    pub lens_model: Option<String>,
    pub focal_length: Option<Number>,
    pub exposure: Option<Number>,
    pub aperture: Option<Number>,
    pub iso: Option<u32>,
    pub film: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub description: Option<String>,
}

/// Anything that can look up a primary-image EXIF value by tag.
pub trait TagSource {
    fn value(&self, tag: Tag) -> Option<&Value>;
}

impl TagSource for exif::Exif {
    fn value(&self, tag: Tag) -> Option<&Value> {
        self.get_field(tag, In::PRIMARY).map(|f| &f.value)
    }
}

impl TagSource for [(Tag, Value)] {
    fn value(&self, tag: Tag) -> Option<&Value> {
        self.iter().find(|(t, _)| *t == tag).map(|(_, v)| v)
    }
}

impl Metadata {
    pub fn from_tags<S: TagSource + ?Sized>(tags: &S) -> Self {
        let (film, description) =
            match first_text(tags, &[Tag::ImageDescription, Tag::UserComment]) {
                Some(desc) => split_film_stock(&desc),
                None => (None, None),
            };

        let exposure = ratio(tags, Tag::ExposureTime).or_else(|| {
            real(tags, Tag::ShutterSpeedValue).map(|apex| Number::Decimal(2f64.powf(-apex)))
        });

        let aperture = ratio(tags, Tag::FNumber).or_else(|| {
            real(tags, Tag::ApertureValue).map(|apex| Number::Decimal(2f64.powf(apex / 2.0)))
        });

        let date = first_text(tags, &[Tag::DateTimeOriginal, Tag::DateTime]).and_then(|s| {
            let parsed = NaiveDateTime::parse_from_str(&s, DATE_FORMAT).ok();
            if parsed.is_none() {
                tracing::debug!("ignoring unparseable EXIF date {s:?}");
            }
            parsed
        });

        Self {
            make: text(tags, Tag::Make),
            model: text(tags, Tag::Model),
            lens_make: text(tags, Tag::LensMake),
            lens_model: text(tags, Tag::LensModel),
            focal_length: ratio(tags, Tag::FocalLength),
            exposure,
            aperture,
            iso: integer(tags, Tag::PhotographicSensitivity),
            film,
            date,
            description,
        }
    }

    /// Camera name for display: make and model, without the make repeated
    /// when the model already starts with it.
    pub fn camera(&self) -> Option<String> {
        join_make_model(self.make.as_deref(), self.model.as_deref())
    }

    pub fn lens(&self) -> Option<String> {
        join_make_model(self.lens_make.as_deref(), self.lens_model.as_deref())
    }
}

fn join_make_model(make: Option<&str>, model: Option<&str>) -> Option<String> {
    match (make, model) {
        (Some(make), Some(model)) if model.starts_with(make) => Some(model.to_string()),
        (Some(make), Some(model)) => Some(format!("{make} {model}")),
        (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
        (None, None) => None,
    }
}

/// Render an exposure time.
///
/// - decimal below 1/4 s: `1/<round(1/v)>`
/// - other decimals: one decimal place
/// - ratio strictly between 0 and 1: `num/denom` as stored
/// - ratio with denominator 1: the integer numerator
/// - other ratios: one decimal place
pub fn format_exposure(value: Option<Number>) -> Option<String> {
    match value? {
        Number::Decimal(v) if v > 0.0 && v < 0.25001 => {
            Some(format!("1/{}", (0.5 + 1.0 / v) as u64))
        }
        Number::Decimal(v) => Some(format!("{v:.1}")),
        Number::Ratio { denom: 0, .. } => None,
        Number::Ratio { num, denom: 1 } => Some(num.to_string()),
        ratio @ Number::Ratio { num, denom } => {
            let v = ratio.to_f64();
            if v > 0.0 && v < 1.0 {
                Some(format!("{num}/{denom}"))
            } else {
                Some(format!("{v:.1}"))
            }
        }
    }
}

/// Render an f-number: two decimals below 1, one decimal otherwise.
pub fn format_aperture(value: Option<Number>) -> Option<String> {
    let v = value?.to_f64();
    if !v.is_finite() {
        return None;
    }
    if v > 0.0 && v < 1.0 {
        Some(format!("{v:.2}"))
    } else {
        Some(format!("{v:.1}"))
    }
}

pub fn format_focal_length(value: Option<Number>) -> Option<String> {
    let v = value?.to_f64();
    v.is_finite().then(|| format!("{v:.0}mm"))
}

/// Split `film stock: ...` lines out of a description.
///
/// Returns `(film, description)`; either side is `None` when empty.
pub fn split_film_stock(description: &str) -> (Option<String>, Option<String>) {
    let mut film = None;
    let mut kept = Vec::new();

    for line in description.lines() {
        match find_film_marker(line) {
            Some((start, capture)) => {
                if film.is_none() {
                    film = non_empty(&line[capture..]);
                }
                kept.push(line[..start].trim_end());
            }
            None => kept.push(line),
        }
    }

    (film, non_empty(&kept.join("\n")))
}

/// Locate `film[ ]?stock:[ ]?` in a line, case-insensitively.
///
/// Returns the byte offset where the marker starts and where the captured
/// remainder begins.
fn find_film_marker(line: &str) -> Option<(usize, usize)> {
    let lower = line.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    for (start, _) in lower.match_indices("film") {
        let mut pos = start + "film".len();
        if bytes.get(pos) == Some(&b' ') {
            pos += 1;
        }
        if !lower[pos..].starts_with("stock:") {
            continue;
        }
        pos += "stock:".len();
        if bytes.get(pos) == Some(&b' ') {
            pos += 1;
        }
        return Some((start, pos));
    }
    None
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn first_text<S: TagSource + ?Sized>(tags: &S, candidates: &[Tag]) -> Option<String> {
    candidates.iter().find_map(|&tag| text(tags, tag))
}

fn text<S: TagSource + ?Sized>(tags: &S, tag: Tag) -> Option<String> {
    match tags.value(tag)? {
        Value::Ascii(parts) => parts
            .iter()
            .find_map(|p| non_empty(String::from_utf8_lossy(p).trim_end_matches('\0'))),
        Value::Undefined(bytes, _) => decode_user_comment(bytes),
        _ => None,
    }
}

/// Decode a `UserComment`: an 8-byte character code followed by the text.
fn decode_user_comment(bytes: &[u8]) -> Option<String> {
    if bytes.len() < 8 {
        return non_empty(String::from_utf8_lossy(bytes).trim_end_matches('\0'));
    }
    let (code, body) = bytes.split_at(8);
    let decoded = match code {
        b"UNICODE\0" => {
            let big_endian = body.first() == Some(&0);
            let units: Vec<u16> = body
                .chunks_exact(2)
                .map(|c| {
                    if big_endian {
                        u16::from_be_bytes([c[0], c[1]])
                    } else {
                        u16::from_le_bytes([c[0], c[1]])
                    }
                })
                .collect();
            String::from_utf16_lossy(&units)
        }
        b"ASCII\0\0\0" | b"JIS\0\0\0\0\0" | [0, 0, 0, 0, 0, 0, 0, 0] => {
            String::from_utf8_lossy(body).into_owned()
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };
    non_empty(decoded.trim_end_matches(['\0', ' ']))
}

fn ratio<S: TagSource + ?Sized>(tags: &S, tag: Tag) -> Option<Number> {
    match tags.value(tag)? {
        Value::Rational(v) => v.first().map(|r| Number::Ratio {
            num: r.num,
            denom: r.denom,
        }),
        Value::SRational(v) => v
            .first()
            .filter(|r| r.denom != 0)
            .map(|r| Number::Decimal(r.num as f64 / r.denom as f64)),
        Value::Float(v) => v.first().map(|&f| Number::Decimal(f as f64)),
        Value::Double(v) => v.first().map(|&f| Number::Decimal(f)),
        _ => None,
    }
}

fn real<S: TagSource + ?Sized>(tags: &S, tag: Tag) -> Option<f64> {
    ratio(tags, tag)
        .map(Number::to_f64)
        .filter(|v| v.is_finite())
}

fn integer<S: TagSource + ?Sized>(tags: &S, tag: Tag) -> Option<u32> {
    match tags.value(tag)? {
        Value::Short(v) => v.first().map(|&x| x as u32),
        Value::Long(v) => v.first().copied(),
        _ => None,
    }
}
