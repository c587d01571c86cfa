//! PDF text extraction
//!
//! Pulls text out of uploaded PDF bytes using lopdf. Only literal-string
//! text operators (`Tj`, `TJ`, `'`, `"`) are handled; pages whose content
//! streams cannot be read are skipped with a warning.

use crate::errors::IngestionError;
use tracing::{debug, warn};

/// Extract raw text from PDF bytes.
pub fn extract_text_from_pdf(bytes: &[u8]) -> Result<String, IngestionError> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| IngestionError::PdfParse {
        message: format!("Failed to load PDF: {}", e),
    })?;

    let mut text = String::new();
    let mut page_count = 0usize;

    for (page_index, page_id) in doc.page_iter().enumerate() {
        page_count += 1;
        match doc.get_page_content(page_id) {
            Ok(content) => {
                let page_text = text_from_content_stream(&content);
                if !page_text.trim().is_empty() {
                    text.push_str(&page_text);
                    text.push('\n');
                }
            }
            Err(e) => {
                warn!(page = page_index + 1, error = %e, "Failed to read page content, skipping");
            }
        }
    }

    debug!(page_count, extracted_len = text.len(), "PDF text extraction complete");

    if text.trim().is_empty() {
        return Err(IngestionError::PdfParse {
            message: "No text content extracted from PDF".to_string(),
        });
    }

    Ok(text)
}

/// Walk a page content stream and collect text shown between BT/ET blocks.
fn text_from_content_stream(content: &[u8]) -> String {
    let content = String::from_utf8_lossy(content);
    let mut text = String::new();
    let mut in_text_block = false;

    for line in content.lines() {
        let line = line.trim();
        match line {
            "BT" => in_text_block = true,
            "ET" => {
                in_text_block = false;
                if !text.ends_with(' ') && !text.is_empty() {
                    text.push(' ');
                }
            }
            _ if in_text_block => {
                if let Some(shown) = text_from_operator(line) {
                    text.push_str(&shown);
                }
            }
            _ => {}
        }
    }

    text
}

/// Extract the string arguments of a text-showing operator, if the line
/// ends in one.
fn text_from_operator(line: &str) -> Option<String> {
    let is_show_op = line.ends_with("Tj")
        || line.ends_with("TJ")
        || line.ends_with('\'')
        || line.ends_with('"');
    if !is_show_op {
        return None;
    }

    // Both the single-string and the array forms keep their text in
    // parenthesized literals; collect every literal on the line.
    let mut result = String::new();
    let mut literal = String::new();
    let mut in_literal = false;
    let mut escaped = false;

    for ch in line.chars() {
        if in_literal {
            if escaped {
                literal.push(match ch {
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    other => other,
                });
                escaped = false;
            } else {
                match ch {
                    '\\' => escaped = true,
                    ')' => {
                        in_literal = false;
                        result.push_str(&literal);
                        literal.clear();
                    }
                    other => literal.push(other),
                }
            }
        } else if ch == '(' {
            in_literal = true;
        }
    }

    if result.is_empty() {
        None
    } else {
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tj_operator() {
        let content = b"BT\n(Hello World) Tj\nET\n";
        assert_eq!(text_from_content_stream(content).trim(), "Hello World");
    }

    #[test]
    fn test_tj_array_operator() {
        let content = b"BT\n[(Hel) -20 (lo)] TJ\nET\n";
        assert_eq!(text_from_content_stream(content).trim(), "Hello");
    }

    #[test]
    fn test_escapes() {
        assert_eq!(
            text_from_operator("(line\\none \\(x\\)) Tj").unwrap(),
            "line\none (x)"
        );
    }

    #[test]
    fn test_ignores_positioning_operators() {
        let content = b"BT\n1 0 0 1 50 700 Tm\n/F1 12 Tf\n(Text) Tj\nET\n";
        assert_eq!(text_from_content_stream(content).trim(), "Text");
    }

    #[test]
    fn test_invalid_pdf_rejected() {
        let err = extract_text_from_pdf(b"not a pdf at all").unwrap_err();
        assert!(matches!(err, IngestionError::PdfParse { .. }));
    }
}
