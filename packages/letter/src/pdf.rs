//! PDF layout for the grievance letter.
//!
//! Page 1 carries the letter text; when photo evidence is attached it is
//! embedded on page 2 at a fixed position, mirroring the portal's export.

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use crate::LetterError;

// A4 in points.
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;

const MARGIN_LEFT: i64 = 57;
const FIRST_BASELINE: i64 = PAGE_HEIGHT - 85;
const FONT_SIZE: i64 = 12;
const LEADING: i64 = 16;
const MAX_LINE_CHARS: usize = 90;

// Evidence placement on page 2.
const IMAGE_X: i64 = 57;
const IMAGE_Y: i64 = 389;
const IMAGE_WIDTH: i64 = 454;
const IMAGE_HEIGHT: i64 = 340;

/// Renders the letter, with optional photo evidence, as PDF bytes.
///
/// # Errors
///
/// Returns [`LetterError::Image`] if `evidence` does not decode as an
/// image, or [`LetterError::Pdf`] if serialization fails.
pub fn render(letter: &str, evidence: Option<&[u8]>) -> Result<Vec<u8>, LetterError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Times-Roman",
    });

    let mut page_ids = vec![text_page(&mut doc, pages_id, font_id, letter)?];
    if let Some(bytes) = evidence {
        page_ids.push(image_page(&mut doc, pages_id, bytes)?);
    }

    let count = i64::try_from(page_ids.len()).unwrap_or(i64::MAX);
    let kids: Vec<Object> = page_ids.into_iter().map(Object::Reference).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Renders the letter and writes it to `path`.
///
/// # Errors
///
/// Returns [`LetterError`] if rendering or the write fails.
pub fn export(path: &Path, letter: &str, evidence: Option<&[u8]>) -> Result<(), LetterError> {
    let bytes = render(letter, evidence)?;
    std::fs::write(path, bytes)?;
    log::debug!("Wrote letter PDF to {}", path.display());
    Ok(())
}

fn text_page(
    doc: &mut Document,
    pages_id: lopdf::ObjectId,
    font_id: lopdf::ObjectId,
    letter: &str,
) -> Result<lopdf::ObjectId, LetterError> {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
        Operation::new("TL", vec![LEADING.into()]),
        Operation::new("Td", vec![MARGIN_LEFT.into(), FIRST_BASELINE.into()]),
    ];
    for (i, line) in wrap_letter(letter).into_iter().enumerate() {
        if i > 0 {
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new("Tj", vec![Object::string_literal(line)]));
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        },
    }))
}

fn image_page(
    doc: &mut Document,
    pages_id: lopdf::ObjectId,
    evidence: &[u8],
) -> Result<lopdf::ObjectId, LetterError> {
    let decoded = image::load_from_memory(evidence)
        .map_err(|e| LetterError::Image {
            message: format!("evidence failed to decode: {e}"),
        })?
        .to_rgb8();
    let (width, height) = decoded.dimensions();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        decoded.into_raw(),
    ));

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    IMAGE_WIDTH.into(),
                    0.into(),
                    0.into(),
                    IMAGE_HEIGHT.into(),
                    IMAGE_X.into(),
                    IMAGE_Y.into(),
                ],
            ),
            Operation::new("Do", vec!["Im1".into()]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im1" => image_id },
        },
    }))
}

/// Splits the letter into drawable lines, wrapping long paragraphs on
/// word boundaries.
fn wrap_letter(letter: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in letter.lines() {
        if paragraph.chars().count() <= MAX_LINE_CHARS {
            lines.push(paragraph.to_string());
            continue;
        }

        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if !current.is_empty()
                && current.chars().count() + 1 + word.chars().count() > MAX_LINE_CHARS
            {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter() -> String {
        "To,\nMunicipal Office,\nPune District, Maharashtra\n\n\
         Subject: Complaint Regarding other\n"
            .to_string()
    }

    fn tiny_jpeg() -> Vec<u8> {
        let mut bytes = Vec::new();
        image::codecs::jpeg::JpegEncoder::new(&mut bytes)
            .encode(&[90; 12], 2, 2, image::ExtendedColorType::Rgb8)
            .unwrap();
        bytes
    }

    #[test]
    fn text_only_letter_is_one_page() {
        let bytes = render(&letter(), None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn evidence_gets_its_own_page() {
        let jpeg = tiny_jpeg();
        let bytes = render(&letter(), Some(&jpeg)).unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn junk_evidence_is_rejected() {
        let err = render(&letter(), Some(b"not an image")).unwrap_err();
        assert!(matches!(err, LetterError::Image { .. }));
    }

    #[test]
    fn short_lines_pass_through_wrapping() {
        assert_eq!(
            wrap_letter("To,\nMunicipal Office,"),
            vec!["To,".to_string(), "Municipal Office,".to_string()],
        );
    }

    #[test]
    fn long_paragraphs_wrap_on_word_boundaries() {
        let paragraph = "word ".repeat(40);
        let lines = wrap_letter(paragraph.trim());
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= MAX_LINE_CHARS));
        assert_eq!(lines.join(" "), paragraph.trim());
    }
}
