//! Text normalization applied to every extracted document
//!
//! Strips page-number lines and stray symbols, normalizes quotes and
//! dashes, and collapses whitespace while preserving blank-line paragraph
//! boundaries (answer references are paragraph-based).

/// Punctuation retained besides alphanumerics and whitespace
const KEPT_PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '?', '-', '(', ')', '[', ']', '{', '}', '"', '\'',
];

/// Clean and normalize raw extracted text.
pub fn clean_text(text: &str) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        let line = normalize_line(line);
        let trimmed = line.trim();

        if trimmed.is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
            continue;
        }

        // Bare page numbers carry no content
        if trimmed.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(trimmed);
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs.join("\n\n")
}

/// Normalize a single line: map typographic characters, drop the rest of
/// the symbol space, and collapse runs of horizontal whitespace.
fn normalize_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut last_was_space = false;

    for ch in line.chars() {
        let mapped = match ch {
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{2013}' | '\u{2014}' => '-',
            c if c.is_alphanumeric() => c,
            c if c.is_whitespace() => ' ',
            c if KEPT_PUNCTUATION.contains(&c) => c,
            _ => ' ',
        };

        if mapped == ' ' {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(mapped);
            last_was_space = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(clean_text("Hello   \t world."), "Hello world.");
    }

    #[test]
    fn test_preserves_paragraph_breaks() {
        let cleaned = clean_text("First paragraph.\n\n\nSecond\nparagraph.");
        assert_eq!(cleaned, "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn test_drops_page_number_lines() {
        let cleaned = clean_text("Intro text here.\n42\nMore text.");
        assert_eq!(cleaned, "Intro text here. More text.");
    }

    #[test]
    fn test_normalizes_typography() {
        let cleaned = clean_text("\u{201C}quoted\u{201D} \u{2014} it\u{2019}s fine");
        assert_eq!(cleaned, "\"quoted\" - it's fine");
    }

    #[test]
    fn test_strips_odd_symbols() {
        let cleaned = clean_text("value © 2024 ≈ 10%");
        assert_eq!(cleaned, "value 2024 10");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(clean_text("   \n\n  "), "");
    }
}
