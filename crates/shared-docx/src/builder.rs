//! Minimal `.docx` package writer
//!
//! Produces the three parts Word needs to open a document. Used to generate
//! fixtures and small reference documents.

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::DocxError;
use crate::DOCUMENT_PART;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

#[derive(Debug, Clone, Default)]
pub struct DocxBuilder {
    paragraphs: Vec<(String, Option<String>)>,
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paragraph(mut self, text: &str) -> Self {
        self.paragraphs.push((text.to_string(), None));
        self
    }

    pub fn styled(mut self, text: &str, style: &str) -> Self {
        self.paragraphs
            .push((text.to_string(), Some(style.to_string())));
        self
    }

    pub fn heading(self, text: &str) -> Self {
        self.styled(text, "Heading1")
    }

    pub fn empty_paragraph(mut self) -> Self {
        self.paragraphs.push((String::new(), None));
        self
    }

    pub fn document_xml(&self) -> String {
        let mut body = String::new();
        for (text, style) in &self.paragraphs {
            if text.is_empty() && style.is_none() {
                body.push_str("<w:p/>");
                continue;
            }
            body.push_str("<w:p>");
            if let Some(style) = style {
                body.push_str(&format!(
                    r#"<w:pPr><w:pStyle w:val="{}"/></w:pPr>"#,
                    escape(style.as_str())
                ));
            }
            body.push_str(&format!(
                r#"<w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
                escape(text.as_str())
            ));
        }

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr/></w:body></w:document>"#,
            body
        )
    }

    pub fn build(&self) -> Result<Vec<u8>, DocxError> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut cursor);
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

            zip.start_file("[Content_Types].xml", options)?;
            zip.write_all(CONTENT_TYPES.as_bytes())?;
            zip.start_file("_rels/.rels", options)?;
            zip.write_all(ROOT_RELS.as_bytes())?;
            zip.start_file(DOCUMENT_PART, options)?;
            zip.write_all(self.document_xml().as_bytes())?;
            zip.finish()?;
        }
        Ok(cursor.into_inner())
    }

    pub fn write_to(&self, path: &std::path::Path) -> Result<(), DocxError> {
        std::fs::write(path, self.build()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_xml_escapes_text() {
        let xml = DocxBuilder::new().paragraph("A & B <C>").document_xml();
        assert!(xml.contains("A &amp; B &lt;C&gt;"));
    }

    #[test]
    fn test_empty_paragraph_is_self_closing() {
        let xml = DocxBuilder::new().empty_paragraph().document_xml();
        assert!(xml.contains("<w:p/>"));
    }
}
