//! Text extraction from uploaded documents.
//!
//! The upload interface accepts paginated plain text: pages separated
//! by form-feed characters (`\x0C`), the convention used by `pdftotext`
//! and friends. A document without separators is treated as a single
//! page. Binary or empty input is rejected with `UnsupportedDocument`.

use reelclaw_core::error::RetrievalError;

/// One page of extracted text.
#[derive(Debug, Clone)]
pub struct Page {
    /// 1-based page number
    pub number: u32,

    /// Page text, trimmed
    pub text: String,
}

/// Extract pages from raw document bytes.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<Page>, RetrievalError> {
    if bytes.is_empty() {
        return Err(RetrievalError::UnsupportedDocument(
            "document is empty".into(),
        ));
    }

    if bytes.contains(&0) {
        return Err(RetrievalError::UnsupportedDocument(
            "document appears to be binary; expected extracted text \
             (e.g. pdftotext output with form-feed page breaks)"
                .into(),
        ));
    }

    let text = std::str::from_utf8(bytes).map_err(|_| {
        RetrievalError::UnsupportedDocument("document is not valid UTF-8 text".into())
    })?;

    let pages: Vec<Page> = text
        .split('\x0C')
        .enumerate()
        .map(|(i, page)| Page {
            number: (i + 1) as u32,
            text: page.trim().to_string(),
        })
        .filter(|p| !p.text.is_empty())
        .collect();

    if pages.is_empty() {
        return Err(RetrievalError::UnsupportedDocument(
            "document contains no readable text".into(),
        ));
    }

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_page_without_separator() {
        let pages = extract_pages(b"INT. NOSTROMO - MESS HALL\nThe crew eats.").unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].number, 1);
        assert!(pages[0].text.contains("NOSTROMO"));
    }

    #[test]
    fn form_feed_splits_pages() {
        let pages = extract_pages(b"page one text\x0Cpage two text\x0Cpage three").unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[2].number, 3);
        assert_eq!(pages[1].text, "page two text");
    }

    #[test]
    fn blank_pages_skipped_but_numbering_preserved() {
        let pages = extract_pages(b"first\x0C   \x0Cthird").unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[1].number, 3);
    }

    #[test]
    fn empty_input_rejected() {
        let err = extract_pages(b"").unwrap_err();
        assert!(matches!(err, RetrievalError::UnsupportedDocument(_)));
    }

    #[test]
    fn binary_input_rejected() {
        let err = extract_pages(b"%PDF-1.4\x00\x01\x02").unwrap_err();
        assert!(matches!(err, RetrievalError::UnsupportedDocument(_)));
    }

    #[test]
    fn invalid_utf8_rejected() {
        let err = extract_pages(&[0xFF, 0xFE, 0x41]).unwrap_err();
        assert!(matches!(err, RetrievalError::UnsupportedDocument(_)));
    }

    #[test]
    fn whitespace_only_rejected() {
        let err = extract_pages(b"   \n\x0C  \n ").unwrap_err();
        assert!(matches!(err, RetrievalError::UnsupportedDocument(_)));
    }
}
