//! Paragraph extraction from `word/document.xml`
//!
//! Only paragraphs that are direct children of `w:body` are counted, which
//! keeps paragraph ordinals aligned with what the annotator rewrites.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use shared_types::{Document, Paragraph};
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::DocxError;
use crate::DOCUMENT_PART;

/// Read a `.docx` file from disk
pub fn read_document(path: &Path) -> Result<Document, DocxError> {
    let file = File::open(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    read_from(file_name, BufReader::new(file))
}

/// Read a `.docx` package held in memory
pub fn read_document_bytes(file_name: &str, bytes: &[u8]) -> Result<Document, DocxError> {
    read_from(file_name.to_string(), Cursor::new(bytes))
}

/// Plain text of a `.docx` file, one paragraph per line
pub fn extract_text(path: &Path) -> Result<String, DocxError> {
    Ok(read_document(path)?.full_text())
}

fn read_from<R: Read + Seek>(file_name: String, reader: R) -> Result<Document, DocxError> {
    let mut archive = ZipArchive::new(reader)?;
    let xml = read_part(&mut archive, DOCUMENT_PART)?;
    let (paragraphs, paragraph_count) = parse_body(&xml)?;

    debug!(
        file = %file_name,
        paragraphs = paragraph_count,
        non_empty = paragraphs.len(),
        "Parsed document body"
    );

    Ok(Document::from_paragraphs(file_name, paragraphs, paragraph_count))
}

pub(crate) fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Vec<u8>, DocxError> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Err(DocxError::MissingPart(name.to_string())),
        Err(err) => return Err(err.into()),
    };
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf)?;
    Ok(buf)
}

#[derive(Default)]
struct ParagraphBuf {
    text: String,
    style: Option<String>,
}

/// Parse body-level paragraphs; returns the non-empty ones and the total count
pub(crate) fn parse_body(xml: &[u8]) -> Result<(Vec<Paragraph>, usize), DocxError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    let mut paragraphs = Vec::new();
    let mut ordinal = 0usize;
    let mut depth = 0usize;
    let mut body_depth: Option<usize> = None;
    let mut current: Option<ParagraphBuf> = None;
    let mut in_text = false;

    loop {
        let event = reader.read_event_into(&mut buf).map_err(DocxError::xml)?;
        match event {
            Event::Start(e) => {
                match e.name().as_ref() {
                    b"w:body" => body_depth = Some(depth + 1),
                    b"w:p" if current.is_none() && Some(depth) == body_depth => {
                        current = Some(ParagraphBuf::default());
                    }
                    b"w:t" if current.is_some() => in_text = true,
                    b"w:pStyle" => set_style(&mut current, &e)?,
                    _ => {}
                }
                depth += 1;
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                match e.name().as_ref() {
                    b"w:p" if Some(depth) == body_depth => {
                        if let Some(p) = current.take() {
                            push_paragraph(&mut paragraphs, ordinal, p);
                            ordinal += 1;
                        }
                    }
                    b"w:t" => in_text = false,
                    _ => {}
                }
            }
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" if current.is_none() && Some(depth) == body_depth => ordinal += 1,
                b"w:pStyle" => set_style(&mut current, &e)?,
                b"w:tab" => push_char(&mut current, '\t'),
                b"w:br" | b"w:cr" => push_char(&mut current, '\n'),
                _ => {}
            },
            Event::Text(t) if in_text => {
                if let Some(p) = current.as_mut() {
                    p.text.push_str(&t.unescape().map_err(DocxError::xml)?);
                }
            }
            Event::CData(t) if in_text => {
                if let Some(p) = current.as_mut() {
                    p.text.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if body_depth.is_none() {
        return Err(DocxError::Xml("document has no w:body element".to_string()));
    }

    Ok((paragraphs, ordinal))
}

fn push_paragraph(paragraphs: &mut Vec<Paragraph>, ordinal: usize, p: ParagraphBuf) {
    let text = p.text.trim();
    if !text.is_empty() {
        paragraphs.push(Paragraph::new(ordinal, text, p.style));
    }
}

fn push_char(current: &mut Option<ParagraphBuf>, c: char) {
    if let Some(p) = current.as_mut() {
        p.text.push(c);
    }
}

fn set_style(current: &mut Option<ParagraphBuf>, e: &BytesStart<'_>) -> Result<(), DocxError> {
    let Some(p) = current.as_mut() else {
        return Ok(());
    };
    for attr in e.attributes() {
        let attr = attr.map_err(DocxError::xml)?;
        if attr.key.as_ref() == b"w:val" {
            p.style = Some(attr.unescape_value().map_err(DocxError::xml)?.into_owned());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DocxBuilder;
    use pretty_assertions::assert_eq;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>Board Resolution</w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t xml:space="preserve">The company </w:t></w:r><w:r><w:t>may &amp; shall</w:t></w:r></w:p>
    <w:tbl><w:tr><w:tc><w:p><w:r><w:t>Table cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
    <w:p><w:r><w:t>Name:</w:t><w:tab/><w:t>J. Smith</w:t></w:r></w:p>
    <w:sectPr/>
  </w:body>
</w:document>"#;

    #[test]
    fn test_parse_body_paragraphs() {
        let (paragraphs, count) = parse_body(BODY.as_bytes()).unwrap();

        assert_eq!(count, 4);
        assert_eq!(paragraphs.len(), 3);
        assert_eq!(paragraphs[0].text, "Board Resolution");
        assert_eq!(paragraphs[0].style.as_deref(), Some("Title"));
        assert_eq!(paragraphs[0].index, 0);
        assert_eq!(paragraphs[1].text, "The company may & shall");
        assert_eq!(paragraphs[1].index, 2);
        assert_eq!(paragraphs[2].text, "Name:\tJ. Smith");
        assert_eq!(paragraphs[2].index, 3);
    }

    #[test]
    fn test_table_paragraphs_are_not_body_paragraphs() {
        let (paragraphs, _) = parse_body(BODY.as_bytes()).unwrap();
        assert!(paragraphs.iter().all(|p| p.text != "Table cell"));
    }

    #[test]
    fn test_missing_body_is_an_error() {
        let xml = r#"<w:document xmlns:w="x"></w:document>"#;
        assert!(matches!(parse_body(xml.as_bytes()), Err(DocxError::Xml(_))));
    }

    #[test]
    fn test_read_document_bytes_builds_sections() {
        let bytes = DocxBuilder::new()
            .heading("Articles of Association")
            .paragraph("The company is incorporated in ADGM.")
            .empty_paragraph()
            .heading("Directors")
            .paragraph("There shall be two directors.")
            .build()
            .unwrap();

        let doc = read_document_bytes("aoa.docx", &bytes).unwrap();
        assert_eq!(doc.file_name, "aoa.docx");
        assert_eq!(doc.paragraph_count, 5);
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[1].heading.as_deref(), Some("Directors"));
        assert_eq!(doc.sections[1].paragraphs[1].index, 4);
    }

    #[test]
    fn test_not_a_zip_is_rejected() {
        let err = read_document_bytes("bad.docx", b"plain text, not a package").unwrap_err();
        assert!(matches!(err, DocxError::Zip(_)));
    }

    #[test]
    fn test_zip_without_document_part() {
        use std::io::Write;
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .start_file("other.txt", zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"hello").unwrap();
            writer.finish().unwrap();
        }
        let err = read_document_bytes("x.docx", cursor.get_ref()).unwrap_err();
        assert!(matches!(err, DocxError::MissingPart(_)));
    }
}
