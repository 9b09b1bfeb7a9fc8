//! Splitting text into service-sized chunks and on-disk volumes.

/// Greedy word-boundary wrap.
///
/// Words are packed into chunks of at most `max_chars` characters, separated by
/// single spaces. A word longer than `max_chars` is emitted on its own, unbroken.
pub fn wrap_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_len == 0 {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            chunks.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Like [`wrap_chunks`], but a word longer than `max_chars` is cut into
/// `max_chars`-character pieces, so no chunk ever exceeds the bound.
pub fn wrap_chunks_strict(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();

    for chunk in wrap_chunks(text, max_chars) {
        if chunk.chars().count() <= max_chars {
            chunks.push(chunk);
            continue;
        }
        let chars: Vec<char> = chunk.chars().collect();
        chunks.extend(chars.chunks(max_chars).map(|piece| piece.iter().collect::<String>()));
    }

    chunks
}

/// Split text into windows of `max_words` words each.
///
/// Produces `ceil(W / max_words)` volumes; joining them with spaces yields the
/// original word sequence.
pub fn split_volumes(text: &str, max_words: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(max_words.max(1))
        .map(|window| window.join(" "))
        .collect()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// First `max_chars` characters of `text`, cut on a char boundary.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
