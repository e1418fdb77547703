// file: src/parser/text.rs
// description: resume text extraction dispatched by file extension
// reference: https://docs.rs/pdf-extract, office open xml word/document.xml

use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use crate::utils::patterns::{DOCX_PARAGRAPH_END, DOCX_TEXT_RUN, XML_ENTITY};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};
use zip::ZipArchive;

const DOCX_BODY: &str = "word/document.xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    PlainText,
    Pdf,
    Docx,
    Unknown,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("txt") | Some("md") => Self::PlainText,
            Some("pdf") => Self::Pdf,
            Some("docx") => Self::Docx,
            _ => Self::Unknown,
        }
    }
}

/// Reads a resume file into text. Unknown extensions are decoded as lossy
/// UTF-8.
pub fn extract_text(path: &Path) -> Result<String> {
    Validator::validate_file_path(path)?;

    let format = SourceFormat::from_path(path);
    debug!("Extracting {:?} text from {}", format, path.display());

    let text = match format {
        SourceFormat::PlainText | SourceFormat::Unknown => read_lossy(path)?,
        SourceFormat::Pdf => extract_pdf(path)?,
        SourceFormat::Docx => extract_docx(path)?,
    };

    info!(
        "Extracted {} characters from {}",
        text.chars().count(),
        path.display()
    );
    Ok(text)
}

fn read_lossy(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| PipelineError::file_operation(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn extract_pdf(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| PipelineError::file_operation(path, e))?;
    pdf_extract::extract_text_from_mem(&bytes).map_err(|e| PipelineError::Extraction {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn extract_docx(path: &Path) -> Result<String> {
    let extraction_error = |message: String| PipelineError::Extraction {
        path: path.to_path_buf(),
        message,
    };

    let file = File::open(path).map_err(|e| PipelineError::file_operation(path, e))?;
    let mut archive = ZipArchive::new(file).map_err(|e| extraction_error(e.to_string()))?;
    let mut body = archive
        .by_name(DOCX_BODY)
        .map_err(|e| extraction_error(format!("{}: {}", DOCX_BODY, e)))?;

    let mut xml = String::new();
    body.read_to_string(&mut xml)
        .map_err(|e| extraction_error(e.to_string()))?;

    Ok(docx_xml_to_text(&xml))
}

/// One output line per `<w:p>` paragraph, built from its `<w:t>` runs.
pub fn docx_xml_to_text(xml: &str) -> String {
    let mut paragraphs: Vec<String> = DOCX_PARAGRAPH_END
        .split(xml)
        .map(|paragraph| {
            DOCX_TEXT_RUN
                .captures_iter(paragraph)
                .map(|caps| match caps.get(1) {
                    Some(text) => decode_entities(text.as_str()),
                    None if caps[0].starts_with("<w:tab") => "\t".to_string(),
                    None => "\n".to_string(),
                })
                .collect::<String>()
        })
        .collect();

    // text after the last paragraph end is not a paragraph
    paragraphs.pop();
    paragraphs.join("\n")
}

fn decode_entities(text: &str) -> String {
    XML_ENTITY
        .replace_all(text, |caps: &regex::Captures| {
            let entity = &caps[1];
            match entity {
                "amp" => "&".to_string(),
                "lt" => "<".to_string(),
                "gt" => ">".to_string(),
                "quot" => "\"".to_string(),
                "apos" => "'".to_string(),
                _ => {
                    let code = entity
                        .strip_prefix("#x")
                        .map(|hex| u32::from_str_radix(hex, 16))
                        .unwrap_or_else(|| entity[1..].parse::<u32>());
                    code.ok()
                        .and_then(char::from_u32)
                        .map(String::from)
                        .unwrap_or_else(|| caps[0].to_string())
                }
            }
        })
        .into_owned()
}
