//! Word documents are not paginated: all paragraph texts, in document order, become
//! one newline-joined segment.

use std::io::Cursor;

use docx_rust::document::BodyContent;
use docx_rust::DocxFile;

pub fn extract_docx(bytes: &[u8]) -> Result<Vec<String>, String> {
    let file = DocxFile::from_reader(Cursor::new(bytes)).map_err(|e| e.to_string())?;
    let docx = file.parse().map_err(|e| e.to_string())?;

    let paragraphs: Vec<String> = docx
        .document
        .body
        .content
        .iter()
        .filter_map(|content| match content {
            BodyContent::Paragraph(paragraph) => Some(paragraph.text()),
            _ => None,
        })
        .collect();

    Ok(vec![paragraphs.join("\n")])
}
