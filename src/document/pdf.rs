use std::path::Path;

use anyhow::Result;
use pdf_extract::extract_text_by_pages;

use super::truncate_chars;

/// Extracts text from at most the first `max_pages` pages, giving each page
/// an equal share of the `max_chars` character budget.
pub fn extract(path: &Path, max_pages: usize, max_chars: usize) -> Result<String> {
    let pages = extract_text_by_pages(path)?;
    Ok(assemble_pages(pages, max_pages, max_chars))
}

fn assemble_pages(pages: Vec<String>, max_pages: usize, max_chars: usize) -> String {
    let pages_read = pages.len().min(max_pages);
    if pages_read == 0 {
        // A PDF can report zero extractable pages; treat it as empty rather
        // than divide the budget by zero.
        return String::new();
    }

    let per_page_budget = max_chars / pages_read;
    let text = pages
        .iter()
        .take(pages_read)
        .map(|page| truncate_chars(page, per_page_budget))
        .collect::<Vec<_>>()
        .join("\n");

    truncate_chars(&text, max_chars).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_reads_at_most_max_pages() {
        let pages: Vec<String> = (0..30).map(|i| format!("page {}", i)).collect();
        let text = assemble_pages(pages, 20, 8000);
        assert!(text.contains("page 19"));
        assert!(!text.contains("page 20"));
        assert_eq!(text.lines().count(), 20);
    }

    #[test]
    fn test_assemble_applies_per_page_budget() {
        let pages = vec!["a".repeat(5000), "b".repeat(5000)];
        let text = assemble_pages(pages, 20, 8000);
        // two pages read, so each is cut to 4000 characters, then the joined
        // text is trimmed back to the total budget
        assert_eq!(text.chars().filter(|c| *c == 'a').count(), 4000);
        assert_eq!(text.chars().filter(|c| *c == 'b').count(), 3999);
        assert_eq!(text.chars().count(), 8000);
    }

    #[test]
    fn test_assemble_total_budget() {
        let pages = vec!["x".repeat(9000)];
        let text = assemble_pages(pages, 20, 8000);
        assert_eq!(text.chars().count(), 8000);
    }

    #[test]
    fn test_assemble_zero_pages_is_empty() {
        assert_eq!(assemble_pages(Vec::new(), 20, 8000), "");
    }
}
