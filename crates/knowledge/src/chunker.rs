//! Text chunking with configurable window size and overlap.
//!
//! Character-based windows, clamped to UTF-8 boundaries. Defaults elsewhere
//! in the workspace match the original corpus (1000-character windows with
//! 200 characters of overlap).

/// Split text into overlapping windows.
pub fn split_into_windows(text: &str, window_size: usize, overlap: usize) -> Vec<String> {
    if text.is_empty() || window_size == 0 {
        return vec![];
    }

    let mut windows = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = (start + window_size).min(text.len());
        while end > start && !text.is_char_boundary(end) {
            end -= 1;
        }

        let window = text[start..end].trim();

        // Skip tiny trailing fragments, but never drop a short document
        // entirely. A tiny window mid-document (a whitespace-heavy stretch)
        // is skipped without ending the scan.
        let at_tail = start + window_size >= text.len();
        if window.len() < window_size / 10 && !windows.is_empty() {
            if at_tail {
                break;
            }
        } else if !window.is_empty() {
            windows.push(window.to_string());
        }

        let step = if window_size > overlap {
            window_size - overlap
        } else {
            window_size
        };

        let mut next_start = start + step;
        while next_start < text.len() && !text.is_char_boundary(next_start) {
            next_start += 1;
        }
        start = next_start;
    }

    tracing::debug!(
        "Split text into {} windows (size: {}, overlap: {})",
        windows.len(),
        window_size,
        overlap
    );

    windows
}
