//! PDF text extraction on top of `lopdf`.
//!
//! The first segment carries the filename and the document-info metadata. Every page
//! then goes through an ordered chain of strategies; the first non-empty result wins
//! and a fixed placeholder covers pages where every strategy comes back empty.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId};
use tracing::debug;

pub const NO_TEXT_PLACEHOLDER: &str = "[No extractable text on this page]";

const METADATA_KEYS: [&str; 5] = ["Title", "Author", "Subject", "Creator", "Producer"];

/// One way of recovering a page's text. Returns an empty string when it finds nothing.
type PageStrategy = fn(&Document, u32, ObjectId) -> String;

const PAGE_STRATEGIES: &[(&str, PageStrategy)] = &[
    ("direct_text", direct_text),
    ("word_join", word_join),
];

pub fn extract_pdf(bytes: &[u8], filename: &str) -> Result<Vec<String>, lopdf::Error> {
    let doc = Document::load_mem(bytes)?;

    let mut segments = vec![metadata_segment(&doc, filename)];

    for (page_number, page_id) in doc.get_pages() {
        let text = PAGE_STRATEGIES
            .iter()
            .find_map(|(name, strategy)| {
                let text = strategy(&doc, page_number, page_id);
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    debug!(page = page_number, strategy = *name, "Page text recovered");
                    Some(trimmed.to_string())
                }
            })
            .unwrap_or_else(|| NO_TEXT_PLACEHOLDER.to_string());
        segments.push(text);
    }

    Ok(segments)
}

fn metadata_segment(doc: &Document, filename: &str) -> String {
    let mut lines = vec![format!("Filename: {}", filename)];

    if let Some(info) = info_dictionary(doc) {
        for key in METADATA_KEYS {
            let value = info
                .get(key.as_bytes())
                .ok()
                .and_then(|obj| obj.as_str().ok())
                .map(decode_pdf_string)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());
            if let Some(value) = value {
                lines.push(format!("{}: {}", key, value));
            }
        }
    }

    lines.join("\n")
}

fn info_dictionary(doc: &Document) -> Option<&lopdf::Dictionary> {
    let info = doc.trailer.get(b"Info").ok()?;
    match info.as_reference() {
        Ok(id) => doc.get_object(id).ok()?.as_dict().ok(),
        Err(_) => info.as_dict().ok(),
    }
}

fn direct_text(doc: &Document, page_number: u32, _page_id: ObjectId) -> String {
    doc.extract_text(&[page_number]).unwrap_or_default()
}

/// Walks the raw content stream and joins every shown string with single spaces.
/// Recovers text from pages whose fonts defeat `extract_text`.
fn word_join(doc: &Document, _page_number: u32, page_id: ObjectId) -> String {
    let Ok(raw) = doc.get_page_content(page_id) else {
        return String::new();
    };
    let Ok(content) = Content::decode(&raw) else {
        return String::new();
    };
    words_from_operations(&content.operations).join(" ")
}

pub(crate) fn words_from_operations(operations: &[Operation]) -> Vec<String> {
    let mut shown = String::new();

    for op in operations {
        let operands: &[Object] = match op.operator.as_str() {
            "Tj" | "TJ" | "'" => &op.operands,
            // `"` takes word spacing and char spacing before the string.
            "\"" => op.operands.get(2..).unwrap_or(&[]),
            _ => continue,
        };
        for operand in operands {
            collect_strings(operand, &mut shown);
        }
        shown.push(' ');
    }

    shown.split_whitespace().map(str::to_string).collect()
}

fn collect_strings(object: &Object, out: &mut String) {
    match object {
        Object::String(bytes, _) => out.push_str(&decode_pdf_string(bytes)),
        Object::Array(items) => {
            for item in items {
                collect_strings(item, out);
            }
        }
        _ => {}
    }
}

/// PDF text strings are UTF-16BE when they start with a byte-order mark, otherwise
/// single-byte. Control characters are replaced with spaces.
pub(crate) fn decode_pdf_string(bytes: &[u8]) -> String {
    let decoded = match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
        },
    };

    decoded
        .chars()
        .map(|c| if c.is_control() && c != '\n' { ' ' } else { c })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::{dictionary, Stream};

    fn text_page(text: &str) -> Vec<Operation> {
        vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ]
    }

    /// Builds a PDF with one page per entry; `None` produces a page without any text.
    pub(crate) fn build_pdf(pages: &[Option<&str>], title: Option<&str>) -> Vec<u8> {
        let pages: Vec<Vec<Operation>> = pages
            .iter()
            .map(|page| page.map(text_page).unwrap_or_default())
            .collect();
        build_pdf_from_operations(pages, title)
    }

    fn build_pdf_from_operations(pages: Vec<Vec<Operation>>, title: Option<&str>) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for operations in pages {
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        if let Some(title) = title {
            let info_id = doc.add_object(dictionary! {
                "Title" => Object::string_literal(title),
                "Producer" => Object::string_literal("study-forge tests"),
            });
            doc.trailer.set("Info", info_id);
        }

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_metadata_segment_comes_first() {
        let bytes = build_pdf(&[Some("Mitochondria")], Some("Cell Biology"));
        let segments = extract_pdf(&bytes, "cells.pdf").unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(
            segments[0],
            "Filename: cells.pdf\nTitle: Cell Biology\nProducer: study-forge tests"
        );
    }

    #[test]
    fn test_metadata_without_info_only_has_filename() {
        let bytes = build_pdf(&[Some("Hello")], None);
        let segments = extract_pdf(&bytes, "plain.pdf").unwrap();
        assert_eq!(segments[0], "Filename: plain.pdf");
    }

    #[test]
    fn test_every_page_segment_is_non_empty() {
        let bytes = build_pdf(&[Some("Photosynthesis basics"), None, Some("Calvin cycle")], None);
        let segments = extract_pdf(&bytes, "bio.pdf").unwrap();

        assert_eq!(segments.len(), 4);
        assert!(segments[1].contains("Photosynthesis"));
        assert_eq!(segments[2], NO_TEXT_PLACEHOLDER);
        assert!(segments[3].contains("Calvin"));
        for segment in &segments {
            assert!(!segment.is_empty());
            assert_eq!(segment.trim(), segment);
        }
    }

    #[test]
    fn test_word_join_recovers_text_direct_extraction_misses() {
        // `F9` is not in the page resources, so `extract_text` has no encoding for it.
        let unknown_font = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F9".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal("Oxidative  phosphorylation")]),
            Operation::new("'", vec![Object::string_literal("in mitochondria")]),
            Operation::new("ET", vec![]),
        ];
        let bytes = build_pdf_from_operations(vec![unknown_font, text_page("Glycolysis")], None);
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(direct_text(&doc, 1, doc.get_pages()[&1]).trim(), "");

        let segments = extract_pdf(&bytes, "energy.pdf").unwrap();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1], "Oxidative phosphorylation in mitochondria");
        assert!(segments[2].contains("Glycolysis"));
    }

    #[test]
    fn test_garbage_bytes_are_an_error() {
        assert!(extract_pdf(b"definitely not a pdf", "broken.pdf").is_err());
    }

    #[test]
    fn test_words_from_operations() {
        let operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tj", vec![Object::string_literal("Krebs")]),
            Operation::new(
                "TJ",
                vec![Object::Array(vec![
                    Object::string_literal("cy"),
                    Object::Integer(-20),
                    Object::string_literal("cle"),
                ])],
            ),
            Operation::new(
                "\"",
                vec![1.into(), 0.into(), Object::string_literal("yields  ATP")],
            ),
            Operation::new("ET", vec![]),
        ];

        assert_eq!(
            words_from_operations(&operations),
            vec!["Krebs", "cycle", "yields", "ATP"]
        );
    }

    #[test]
    fn test_decode_utf16_string() {
        let bytes = [0xFE, 0xFF, 0x00, 0x43, 0x00, 0xE9, 0x00, 0x6C];
        assert_eq!(decode_pdf_string(&bytes), "Cél");
        assert_eq!(decode_pdf_string(b"plain\x00text"), "plain text");
    }
}
