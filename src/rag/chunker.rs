//! Fixed-window text chunking.

/// Splits page text into overlapping character windows.
///
/// Windows are measured in characters, not bytes, so multi-byte text never
/// splits inside a code point. Defaults come from configuration (2000/250).
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextChunker {
    /// Creates a chunker. A zero `chunk_size` is bumped to 1, and the
    /// overlap is clamped below the chunk size so the window always advances.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        let chunk_overlap = chunk_overlap.min(chunk_size - 1);
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Splits `text` into chunks of up to `chunk_size` characters, each
    /// sharing `chunk_overlap` characters with its predecessor.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }

        let step = self.chunk_size - self.chunk_overlap;
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            chunks.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += step;
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_a_single_chunk() {
        let chunker = TextChunker::new(2000, 250);
        let chunks = chunker.chunk("short policy note");
        assert_eq!(chunks, vec!["short policy note".to_string()]);
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        let chunker = TextChunker::new(2000, 250);
        assert!(chunker.chunk("").is_empty());
    }

    #[test]
    fn test_chunks_overlap_by_the_configured_amount() {
        let chunker = TextChunker::new(10, 4);
        let text = "abcdefghijklmnopqrst"; // 20 chars
        let chunks = chunker.chunk(text);

        assert_eq!(chunks[0], "abcdefghij");
        assert_eq!(chunks[1], "ghijklmnop");
        assert!(chunks[0].ends_with(&chunks[1][..4]));

        // Every character of the input appears in some chunk.
        let last = chunks.last().unwrap();
        assert!(last.ends_with('t'));
    }

    #[test]
    fn test_window_advances_even_with_degenerate_overlap() {
        let chunker = TextChunker::new(5, 50);
        let chunks = chunker.chunk("abcdefghij");
        assert!(chunks.len() >= 2);
        assert_eq!(chunks[0].len(), 5);
    }

    #[test]
    fn test_multibyte_text_splits_on_character_boundaries() {
        let chunker = TextChunker::new(4, 1);
        let chunks = chunker.chunk("écrêtage été");
        assert!(!chunks.is_empty());
        let total: String = chunks.concat();
        assert!(total.contains('é'));
    }
}
