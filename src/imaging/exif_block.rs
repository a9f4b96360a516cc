//! EXIF block embedded into generated images.
//!
//! Outputs carry only what the site owner publishes: the copyright line and
//! the photo description. Everything else from the source EXIF is dropped.
//! The block is a bare TIFF structure, which is what a PNG `eXIf` chunk holds.

use super::backend::{BackendError, EncodeParams};
use exif::experimental::Writer;
use exif::{Field, In, Tag, Value};
use std::io::Cursor;

/// Serialize `params` as a big-endian EXIF block. `None` when there is
/// nothing to embed.
pub fn build_exif_block(params: &EncodeParams) -> Result<Option<Vec<u8>>, BackendError> {
    let fields: Vec<Field> = [
        (Tag::Copyright, params.copyright.as_deref()),
        (Tag::ImageDescription, params.description.as_deref()),
    ]
    .into_iter()
    .filter_map(|(tag, text)| {
        text.map(|t| Field {
            tag,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![t.as_bytes().to_vec()]),
        })
    })
    .collect();

    if fields.is_empty() {
        return Ok(None);
    }

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut buf = Cursor::new(Vec::new());
    writer
        .write(&mut buf, false)
        .map_err(|e| BackendError::Exif(e.to_string()))?;
    Ok(Some(buf.into_inner()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_back(block: &[u8]) -> exif::Exif {
        exif::Reader::new().read_raw(block.to_vec()).unwrap()
    }

    fn ascii(exif: &exif::Exif, tag: Tag) -> Option<String> {
        match &exif.get_field(tag, In::PRIMARY)?.value {
            Value::Ascii(parts) => parts
                .first()
                .map(|p| String::from_utf8_lossy(p).to_string()),
            _ => None,
        }
    }

    #[test]
    fn empty_params_build_nothing() {
        assert_eq!(build_exif_block(&EncodeParams::default()).unwrap(), None);
    }

    #[test]
    fn copyright_and_description_round_trip() {
        let block = build_exif_block(&EncodeParams {
            copyright: Some("Jo Doe, CC BY-SA 4.0".into()),
            description: Some("Harbour at dusk".into()),
        })
        .unwrap()
        .unwrap();

        let exif = read_back(&block);
        assert_eq!(
            ascii(&exif, Tag::Copyright).as_deref(),
            Some("Jo Doe, CC BY-SA 4.0")
        );
        assert_eq!(
            ascii(&exif, Tag::ImageDescription).as_deref(),
            Some("Harbour at dusk")
        );
    }

    #[test]
    fn block_is_big_endian_tiff() {
        let block = build_exif_block(&EncodeParams {
            copyright: Some("x".into()),
            description: None,
        })
        .unwrap()
        .unwrap();
        assert_eq!(&block[..4], b"MM\0\x2a");
    }
}
