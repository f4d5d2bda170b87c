//! Annotated-copy writer
//!
//! Appends a highlighted inline note to each annotated paragraph and a
//! "COMPLIANCE NOTES" appendix listing every note. The source file is only
//! ever read; output is staged next to the target and renamed into place.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, Cursor, Write};
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::DocxError;
use crate::reader::read_part;
use crate::DOCUMENT_PART;

pub const APPENDIX_HEADING: &str = "COMPLIANCE NOTES";

/// A note anchored at a body paragraph ordinal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub paragraph_index: usize,
    pub text: String,
}

impl Annotation {
    pub fn new(paragraph_index: usize, text: impl Into<String>) -> Self {
        Self {
            paragraph_index,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnnotationSummary {
    /// Notes written into the document
    pub applied: usize,
    /// Notes whose paragraph does not exist in the source
    pub skipped: usize,
}

struct NumberedNote<'a> {
    number: usize,
    paragraph_index: usize,
    text: &'a str,
}

/// Write an annotated copy of `source` to `output`
///
/// With no annotations the output is a byte-for-byte copy of the source.
pub fn annotate(
    source: &Path,
    annotations: &[Annotation],
    output: &Path,
) -> Result<AnnotationSummary, DocxError> {
    if is_same_file(source, output) {
        return Err(DocxError::SameOutput(output.display().to_string()));
    }

    let partial = partial_path(output);
    let staged = if annotations.is_empty() {
        fs::copy(source, &partial)
            .map(|_| AnnotationSummary::default())
            .map_err(DocxError::from)
    } else {
        write_annotated(source, annotations, &partial)
    };
    let result = staged.and_then(|summary| {
        fs::rename(&partial, output)?;
        Ok(summary)
    });

    match result {
        Ok(summary) => {
            info!(
                output = %output.display(),
                applied = summary.applied,
                skipped = summary.skipped,
                "Saved annotated document"
            );
            Ok(summary)
        }
        Err(err) => {
            let _ = fs::remove_file(&partial);
            Err(err)
        }
    }
}

fn write_annotated(
    source: &Path,
    annotations: &[Annotation],
    target: &Path,
) -> Result<AnnotationSummary, DocxError> {
    let mut archive = ZipArchive::new(BufReader::new(File::open(source)?))?;
    let xml = read_part(&mut archive, DOCUMENT_PART)?;
    let (rewritten, summary) = rewrite_document_xml(&xml, annotations)?;

    let mut zip = ZipWriter::new(File::create(target)?);
    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i)?;
        if entry.name() == DOCUMENT_PART {
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            zip.start_file(DOCUMENT_PART, options)?;
            zip.write_all(&rewritten)?;
        } else {
            zip.raw_copy_file(entry)?;
        }
    }
    zip.finish()?;

    Ok(summary)
}

/// Rewrite the main document part, returning the new XML and what was applied
pub fn rewrite_document_xml(
    xml: &[u8],
    annotations: &[Annotation],
) -> Result<(Vec<u8>, AnnotationSummary), DocxError> {
    let paragraph_total = count_body_paragraphs(xml)?;

    let mut notes: Vec<NumberedNote<'_>> = Vec::new();
    let mut summary = AnnotationSummary::default();
    for annotation in annotations {
        if annotation.paragraph_index < paragraph_total {
            notes.push(NumberedNote {
                number: notes.len() + 1,
                paragraph_index: annotation.paragraph_index,
                text: &annotation.text,
            });
            summary.applied += 1;
        } else {
            warn!(
                paragraph = annotation.paragraph_index,
                total = paragraph_total,
                "Annotation targets a paragraph outside the document, skipping"
            );
            summary.skipped += 1;
        }
    }

    let mut by_paragraph: BTreeMap<usize, Vec<&NumberedNote<'_>>> = BTreeMap::new();
    for note in &notes {
        by_paragraph.entry(note.paragraph_index).or_default().push(note);
    }

    let mut reader = Reader::from_reader(xml);
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    let mut buf = Vec::new();

    let mut depth = 0usize;
    let mut body_depth: Option<usize> = None;
    let mut ordinal = 0usize;
    let mut open_paragraph: Option<usize> = None;
    let mut appendix_written = false;

    loop {
        let event = reader.read_event_into(&mut buf).map_err(DocxError::xml)?;
        match event {
            Event::Eof => break,
            Event::Start(e) => {
                let at_body = Some(depth) == body_depth;
                match Tag::of(&e) {
                    Tag::Body => body_depth = Some(depth + 1),
                    Tag::Paragraph if at_body && open_paragraph.is_none() => {
                        open_paragraph = Some(ordinal);
                        ordinal += 1;
                    }
                    Tag::SectPr if at_body && !appendix_written => {
                        write_appendix(&mut writer, &notes)?;
                        appendix_written = true;
                    }
                    _ => {}
                }
                emit(&mut writer, Event::Start(e))?;
                depth += 1;
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                let at_body = Some(depth) == body_depth;
                match e.name().as_ref() {
                    b"w:p" if at_body => {
                        if let Some(index) = open_paragraph.take() {
                            write_inline_notes(&mut writer, by_paragraph.get(&index))?;
                        }
                    }
                    b"w:body" if !appendix_written => {
                        write_appendix(&mut writer, &notes)?;
                        appendix_written = true;
                    }
                    _ => {}
                }
                emit(&mut writer, Event::End(e))?;
            }
            Event::Empty(e) => {
                let at_body = Some(depth) == body_depth;
                match Tag::of(&e) {
                    Tag::Paragraph if at_body => {
                        let index = ordinal;
                        ordinal += 1;
                        match by_paragraph.get(&index) {
                            Some(list) => {
                                emit(&mut writer, Event::Start(e.to_owned()))?;
                                write_inline_notes(&mut writer, Some(list))?;
                                emit(&mut writer, Event::End(BytesEnd::new("w:p")))?;
                            }
                            None => emit(&mut writer, Event::Empty(e))?,
                        }
                    }
                    Tag::SectPr if at_body && !appendix_written => {
                        write_appendix(&mut writer, &notes)?;
                        appendix_written = true;
                        emit(&mut writer, Event::Empty(e))?;
                    }
                    _ => emit(&mut writer, Event::Empty(e))?,
                }
            }
            other => emit(&mut writer, other)?,
        }
        buf.clear();
    }

    debug!(notes = notes.len(), paragraphs = paragraph_total, "Rewrote document body");
    Ok((writer.into_inner().into_inner(), summary))
}

/// Body-level elements the rewriter reacts to
#[derive(Clone, Copy, PartialEq, Eq)]
enum Tag {
    Body,
    Paragraph,
    SectPr,
    Other,
}

impl Tag {
    fn of(e: &BytesStart<'_>) -> Self {
        match e.name().as_ref() {
            b"w:body" => Tag::Body,
            b"w:p" => Tag::Paragraph,
            b"w:sectPr" => Tag::SectPr,
            _ => Tag::Other,
        }
    }
}

fn count_body_paragraphs(xml: &[u8]) -> Result<usize, DocxError> {
    crate::reader::parse_body(xml).map(|(_, count)| count)
}

fn write_inline_notes<W: Write>(
    writer: &mut Writer<W>,
    notes: Option<&Vec<&NumberedNote<'_>>>,
) -> Result<(), DocxError> {
    let Some(notes) = notes else {
        return Ok(());
    };
    for note in notes {
        let marker = format!(" [COMPLIANCE NOTE #{}: {}]", note.number, note.text);
        write_run(writer, &marker, RunStyle::Highlight)?;
    }
    Ok(())
}

fn write_appendix<W: Write>(
    writer: &mut Writer<W>,
    notes: &[NumberedNote<'_>],
) -> Result<(), DocxError> {
    if notes.is_empty() {
        return Ok(());
    }

    // Page break
    emit(writer, Event::Start(BytesStart::new("w:p")))?;
    emit(writer, Event::Start(BytesStart::new("w:r")))?;
    emit(
        writer,
        Event::Empty(BytesStart::new("w:br").with_attributes([("w:type", "page")])),
    )?;
    emit(writer, Event::End(BytesEnd::new("w:r")))?;
    emit(writer, Event::End(BytesEnd::new("w:p")))?;

    emit(writer, Event::Start(BytesStart::new("w:p")))?;
    emit(writer, Event::Start(BytesStart::new("w:pPr")))?;
    emit(
        writer,
        Event::Empty(BytesStart::new("w:pStyle").with_attributes([("w:val", "Heading1")])),
    )?;
    emit(writer, Event::End(BytesEnd::new("w:pPr")))?;
    write_run(writer, APPENDIX_HEADING, RunStyle::Plain)?;
    emit(writer, Event::End(BytesEnd::new("w:p")))?;

    for note in notes {
        emit(writer, Event::Start(BytesStart::new("w:p")))?;
        write_run(writer, &format!("[COMPLIANCE NOTE #{}] ", note.number), RunStyle::Bold)?;
        write_run(
            writer,
            &format!("Paragraph index: {}. {}", note.paragraph_index, note.text),
            RunStyle::Plain,
        )?;
        emit(writer, Event::End(BytesEnd::new("w:p")))?;
    }
    Ok(())
}

#[derive(Clone, Copy)]
enum RunStyle {
    Plain,
    Bold,
    Highlight,
}

fn write_run<W: Write>(
    writer: &mut Writer<W>,
    text: &str,
    style: RunStyle,
) -> Result<(), DocxError> {
    emit(writer, Event::Start(BytesStart::new("w:r")))?;
    match style {
        RunStyle::Plain => {}
        RunStyle::Bold => {
            emit(writer, Event::Start(BytesStart::new("w:rPr")))?;
            emit(writer, Event::Empty(BytesStart::new("w:b")))?;
            emit(writer, Event::End(BytesEnd::new("w:rPr")))?;
        }
        RunStyle::Highlight => {
            emit(writer, Event::Start(BytesStart::new("w:rPr")))?;
            emit(
                writer,
                Event::Empty(BytesStart::new("w:highlight").with_attributes([("w:val", "yellow")])),
            )?;
            emit(writer, Event::End(BytesEnd::new("w:rPr")))?;
        }
    }
    emit(
        writer,
        Event::Start(BytesStart::new("w:t").with_attributes([("xml:space", "preserve")])),
    )?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(BytesEnd::new("w:t")))?;
    emit(writer, Event::End(BytesEnd::new("w:r")))?;
    Ok(())
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<(), DocxError> {
    writer.write_event(event).map_err(DocxError::xml)
}

fn partial_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    output.with_file_name(name)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DocxBuilder;
    use crate::reader::read_document;
    use pretty_assertions::assert_eq;

    fn fixture(dir: &Path) -> PathBuf {
        let path = dir.join("source.docx");
        DocxBuilder::new()
            .heading("Employment Contract")
            .paragraph("The employee may work remotely.")
            .empty_paragraph()
            .paragraph("Governed by the laws of England.")
            .write_to(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_no_annotations_copies_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let source = fixture(dir.path());
        let output = dir.path().join("annotated.docx");

        let summary = annotate(&source, &[], &output).unwrap();

        assert_eq!(summary, AnnotationSummary::default());
        assert_eq!(fs::read(&source).unwrap(), fs::read(&output).unwrap());
    }

    #[test]
    fn test_inline_notes_and_appendix() {
        let dir = tempfile::tempdir().unwrap();
        let source = fixture(dir.path());
        let before = fs::read(&source).unwrap();
        let output = dir.path().join("annotated.docx");

        let annotations = vec![
            Annotation::new(1, "Ambiguous language"),
            Annotation::new(3, "Non-ADGM jurisdiction"),
            Annotation::new(3, "Second note"),
        ];
        let summary = annotate(&source, &annotations, &output).unwrap();
        assert_eq!(summary.applied, 3);
        assert_eq!(summary.skipped, 0);

        // Source untouched
        assert_eq!(fs::read(&source).unwrap(), before);

        let doc = read_document(&output).unwrap();
        let texts: Vec<&str> = doc.paragraphs().map(|p| p.text.as_str()).collect();
        assert_eq!(
            texts[1],
            "The employee may work remotely. [COMPLIANCE NOTE #1: Ambiguous language]"
        );
        assert_eq!(
            texts[2],
            "Governed by the laws of England. [COMPLIANCE NOTE #2: Non-ADGM jurisdiction] [COMPLIANCE NOTE #3: Second note]"
        );
        assert!(texts.contains(&APPENDIX_HEADING));
        assert!(texts
            .iter()
            .any(|t| *t == "[COMPLIANCE NOTE #2] Paragraph index: 3. Non-ADGM jurisdiction"));
    }

    #[test]
    fn test_note_on_empty_paragraph() {
        let xml = DocxBuilder::new()
            .paragraph("First")
            .empty_paragraph()
            .document_xml();
        let (out, summary) =
            rewrite_document_xml(xml.as_bytes(), &[Annotation::new(1, "Blank")]).unwrap();
        assert_eq!(summary.applied, 1);
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("[COMPLIANCE NOTE #1: Blank]"));
        assert!(!out.contains("<w:p/>"));
    }

    #[test]
    fn test_out_of_range_annotation_is_skipped() {
        let xml = DocxBuilder::new().paragraph("Only one").document_xml();
        let (_, summary) =
            rewrite_document_xml(xml.as_bytes(), &[Annotation::new(9, "Nowhere")]).unwrap();
        assert_eq!(summary.applied, 0);
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn test_note_text_is_escaped() {
        let xml = DocxBuilder::new().paragraph("Clause").document_xml();
        let (out, _) =
            rewrite_document_xml(xml.as_bytes(), &[Annotation::new(0, "use <shall> & not may")])
                .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("use &lt;shall&gt; &amp; not may"));
    }

    #[test]
    fn test_refuses_to_overwrite_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = fixture(dir.path());
        let err = annotate(&source, &[Annotation::new(0, "x")], &source).unwrap_err();
        assert!(matches!(err, DocxError::SameOutput(_)));
    }

    #[test]
    fn test_unwritable_output_leaves_no_partial() {
        let dir = tempfile::tempdir().unwrap();
        let source = fixture(dir.path());
        let output = dir.path().join("missing-dir").join("annotated.docx");
        let err = annotate(&source, &[Annotation::new(0, "x")], &output).unwrap_err();
        assert!(matches!(err, DocxError::Io(_)));
        assert!(!output.exists());
    }
}
