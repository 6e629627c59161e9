/// A bounded piece of document text sent to the generation service.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub content: String,
}

impl Chunk {
    pub fn new(content: String) -> Self {
        Self { content }
    }
}

/// Splits text into chunks on sentence boundaries. Each `.`-terminated
/// fragment keeps its period; fragments accumulate until adding the next one
/// would reach `max_len` characters. A single sentence longer than `max_len`
/// becomes its own oversized chunk. Empty input yields no chunks.
pub fn chunk_text(text: &str, max_len: usize) -> Vec<Chunk> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for sentence in text.split('.') {
        let sentence_chars = sentence.chars().count() + 1;
        if current_chars + sentence_chars >= max_len && !current.is_empty() {
            chunks.push(Chunk::new(std::mem::take(&mut current)));
            current_chars = 0;
        }
        current.push_str(sentence);
        current.push('.');
        current_chars += sentence_chars;
    }

    if !current.is_empty() {
        chunks.push(Chunk::new(current));
    }

    chunks
}

/// Splits an outbound reply into fixed-size pieces for the chat platform,
/// always cutting on char boundaries.
pub fn split_for_delivery(text: &str, piece_len: usize) -> Vec<String> {
    if text.is_empty() || piece_len == 0 {
        return Vec::new();
    }

    let mut pieces = Vec::new();
    let mut piece = String::new();
    for (count, c) in text.chars().enumerate() {
        if count > 0 && count % piece_len == 0 {
            pieces.push(std::mem::take(&mut piece));
        }
        piece.push(c);
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_respects_max_len() {
        let text = "one sentence. two sentence. three sentence. four sentence.";
        let chunks = chunk_text(text, 30);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.content.chars().count() <= 30);
        }
    }

    #[test]
    fn test_chunk_preserves_sentence_content() {
        let text = "alpha beta. gamma delta. epsilon.";
        let chunks = chunk_text(text, 15);
        let rejoined: String = chunks.iter().map(|c| c.content.as_str()).collect();
        for sentence in ["alpha beta.", " gamma delta.", " epsilon."] {
            assert!(rejoined.contains(sentence), "missing {:?}", sentence);
        }
    }

    #[test]
    fn test_chunk_empty_input() {
        assert!(chunk_text("", 100).is_empty());
    }

    #[test]
    fn test_chunk_oversized_sentence_stands_alone() {
        let long = "x".repeat(50);
        let text = format!("short. {}. tail.", long);
        let chunks = chunk_text(&text, 20);
        // the long sentence cannot be split further, so it exceeds the bound
        assert!(chunks.iter().any(|c| c.content.chars().count() > 20));
        // but everything else stays within it
        let oversized = chunks
            .iter()
            .filter(|c| c.content.chars().count() > 20)
            .count();
        assert_eq!(oversized, 1);
    }

    #[test]
    fn test_chunk_never_emits_empty_chunks() {
        let chunks = chunk_text("a..b.", 2);
        for chunk in &chunks {
            assert!(!chunk.content.is_empty());
        }
    }

    #[test]
    fn test_split_for_delivery_is_lossless() {
        let text = "0123456789".repeat(7);
        let pieces = split_for_delivery(&text, 16);
        assert_eq!(pieces.concat(), text);
        for piece in &pieces {
            assert!(piece.chars().count() <= 16);
        }
    }

    #[test]
    fn test_split_for_delivery_char_boundaries() {
        let text = "é".repeat(10);
        let pieces = split_for_delivery(&text, 3);
        assert_eq!(pieces.len(), 4);
        assert_eq!(pieces.concat(), text);
    }

    #[test]
    fn test_split_for_delivery_empty() {
        assert!(split_for_delivery("", 10).is_empty());
    }
}
