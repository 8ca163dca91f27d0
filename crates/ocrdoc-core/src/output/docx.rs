//! DOCX output.
//!
//! A DOCX file is a ZIP archive of Open XML parts. The writer emits the
//! smallest package Word accepts: content types, the package relationship
//! and `word/document.xml` holding one paragraph.

use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::OutputWriter;
use crate::error::{OutputError, Result};
use crate::models::transcript::Transcript;

const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Writes the text as a single paragraph of a new Word document.
///
/// Line breaks and tabs inside the text become `<w:br/>` and `<w:tab/>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxWriter;

impl DocxWriter {
    /// Build `word/document.xml` for `text`.
    pub fn document_xml(text: &str) -> std::result::Result<Vec<u8>, OutputError> {
        let mut writer = Writer::new(Vec::new());

        emit(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))),
        )?;
        emit(
            &mut writer,
            Event::Start(BytesStart::new("w:document").with_attributes([("xmlns:w", WORDML_NS)])),
        )?;
        emit(&mut writer, Event::Start(BytesStart::new("w:body")))?;
        emit(&mut writer, Event::Start(BytesStart::new("w:p")))?;
        emit(&mut writer, Event::Start(BytesStart::new("w:r")))?;

        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                emit(&mut writer, Event::Empty(BytesStart::new("w:br")))?;
            }
            for (j, segment) in line.split('\t').enumerate() {
                if j > 0 {
                    emit(&mut writer, Event::Empty(BytesStart::new("w:tab")))?;
                }
                let segment: String = segment.chars().filter(|c| is_xml_char(*c)).collect();
                if segment.is_empty() {
                    continue;
                }
                emit(
                    &mut writer,
                    Event::Start(BytesStart::new("w:t").with_attributes([("xml:space", "preserve")])),
                )?;
                emit(&mut writer, Event::Text(BytesText::new(&segment)))?;
                emit(&mut writer, Event::End(BytesEnd::new("w:t")))?;
            }
        }

        emit(&mut writer, Event::End(BytesEnd::new("w:r")))?;
        emit(&mut writer, Event::End(BytesEnd::new("w:p")))?;
        emit(&mut writer, Event::End(BytesEnd::new("w:body")))?;
        emit(&mut writer, Event::End(BytesEnd::new("w:document")))?;

        Ok(writer.into_inner())
    }
}

impl OutputWriter for DocxWriter {
    fn format(&self) -> &'static str {
        "docx"
    }

    fn render(&self, transcript: &Transcript) -> Result<Vec<u8>> {
        let document = Self::document_xml(&transcript.text)?;

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let parts: [(&str, &[u8]); 3] = [
            ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
            ("_rels/.rels", PACKAGE_RELS.as_bytes()),
            ("word/document.xml", document.as_slice()),
        ];
        for (name, data) in parts {
            zip.start_file(name, options).map_err(docx_error)?;
            zip.write_all(data)?;
        }

        let cursor = zip.finish().map_err(docx_error)?;
        Ok(cursor.into_inner())
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> std::result::Result<(), OutputError> {
    writer.write_event(event).map_err(docx_error)
}

fn docx_error(e: impl std::fmt::Display) -> OutputError {
    OutputError::Docx(e.to_string())
}

/// Characters allowed in XML 1.0 text.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || matches!(c, '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}
