//! Overlapping text chunker.
//!
//! Splits page text into chunks of bounded size with a fixed overlap,
//! breaking on whitespace where possible. Chunks never span a page
//! boundary, so every chunk carries an exact page reference for
//! citation.

use crate::extract::Page;

/// A chunk of document text awaiting embedding.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Chunk text
    pub text: String,

    /// 1-based page the chunk came from
    pub page: u32,

    /// Position of this chunk in the document's chunk sequence
    pub chunk_index: usize,
}

/// Split extracted pages into overlapping chunks.
///
/// `chunk_size` and `overlap` are measured in characters; callers
/// guarantee `overlap < chunk_size` (enforced by config validation).
pub fn chunk_pages(pages: &[Page], chunk_size: usize, overlap: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();

    for page in pages {
        for text in split_with_overlap(&page.text, chunk_size, overlap) {
            let chunk_index = chunks.len();
            chunks.push(Chunk {
                text,
                page: page.number,
                chunk_index,
            });
        }
    }

    chunks
}

/// Split one text into overlapping windows, preferring to end each
/// window at a whitespace boundary.
fn split_with_overlap(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }
    if chars.len() <= chunk_size {
        return vec![text.to_string()];
    }

    let mut out = Vec::new();
    let mut start = 0usize;

    while start < chars.len() {
        let hard_end = (start + chunk_size).min(chars.len());

        // Back off to the last whitespace inside the window, unless that
        // would shrink the chunk to less than half its target size.
        let end = if hard_end < chars.len() {
            let min_end = start + chunk_size / 2;
            (min_end..hard_end)
                .rev()
                .find(|&i| chars[i].is_whitespace())
                .map(|i| i + 1)
                .unwrap_or(hard_end)
        } else {
            hard_end
        };

        let piece: String = chars[start..end].iter().collect();
        let piece = piece.trim().to_string();
        if !piece.is_empty() {
            out.push(piece);
        }

        if end == chars.len() {
            break;
        }
        // Next window starts `overlap` characters before this one ended,
        // snapped forward to a word boundary so no chunk opens mid-word.
        // Always advances at least one character.
        let raw = end.saturating_sub(overlap).max(start + 1);
        start = if raw == 0 || chars[raw - 1].is_whitespace() || chars[raw].is_whitespace() {
            raw
        } else {
            (raw..end)
                .find(|&i| chars[i].is_whitespace())
                .map(|i| i + 1)
                .unwrap_or(raw)
        };
    }

    out
}
