use std::path::Path;
use std::{fs::File, io::Read};

use docx_rs::read_docx;

use super::truncate_chars;

/// Extracts text from at most the first `max_paragraphs` non-empty
/// paragraphs, truncated to `max_chars` characters overall.
pub fn extract(path: &Path, max_paragraphs: usize, max_chars: usize) -> anyhow::Result<String> {
    let mut file = File::open(path)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;

    let document = read_docx(&buffer)?;

    let mut paragraphs = Vec::new();
    for child in &document.document.children {
        if let docx_rs::DocumentChild::Paragraph(p) = child {
            let mut text = String::new();
            for run in &p.children {
                if let docx_rs::ParagraphChild::Run(r) = run {
                    for text_node in &r.children {
                        if let docx_rs::RunChild::Text(t) = text_node {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            paragraphs.push(text);
        }
    }

    Ok(assemble_paragraphs(paragraphs, max_paragraphs, max_chars))
}

fn assemble_paragraphs(paragraphs: Vec<String>, max_paragraphs: usize, max_chars: usize) -> String {
    let text = paragraphs
        .iter()
        .take(max_paragraphs)
        .filter(|p| !p.trim().is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n");

    truncate_chars(&text, max_chars).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_caps_paragraph_count() {
        let paragraphs: Vec<String> = (0..50).map(|i| format!("para {}", i)).collect();
        let text = assemble_paragraphs(paragraphs, 30, 8000);
        assert_eq!(text.lines().count(), 30);
        assert!(text.contains("para 29"));
        assert!(!text.contains("para 30"));
    }

    #[test]
    fn test_assemble_skips_blank_paragraphs() {
        let paragraphs = vec![
            "first".to_string(),
            "   ".to_string(),
            String::new(),
            "second".to_string(),
        ];
        let text = assemble_paragraphs(paragraphs, 30, 8000);
        assert_eq!(text, "first\nsecond");
    }

    #[test]
    fn test_assemble_truncates_to_budget() {
        let paragraphs = vec!["y".repeat(10_000)];
        let text = assemble_paragraphs(paragraphs, 30, 8000);
        assert_eq!(text.chars().count(), 8000);
    }
}
