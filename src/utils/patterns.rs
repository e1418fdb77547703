// file: src/utils/patterns.rs
// description: compiled regex patterns for name sanitization and docx text
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Output naming
    pub static ref UNSAFE_NAME_CHARS: Regex = Regex::new(
        r"[^\w\- ]+"
    ).expect("UNSAFE_NAME_CHARS regex is valid");

    // WordprocessingML
    pub static ref DOCX_PARAGRAPH_END: Regex = Regex::new(
        r"</w:p>"
    ).expect("DOCX_PARAGRAPH_END regex is valid");

    pub static ref DOCX_TEXT_RUN: Regex = Regex::new(
        r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|<w:tab/>|<w:br/>"
    ).expect("DOCX_TEXT_RUN regex is valid");

    pub static ref XML_ENTITY: Regex = Regex::new(
        r"&(amp|lt|gt|quot|apos|#[0-9]+|#x[0-9a-fA-F]+);"
    ).expect("XML_ENTITY regex is valid");
}
