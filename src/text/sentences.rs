// Sentence splitter.
//
// Boundaries come from Unicode sentence segmentation (UAX #29). Two kinds of
// boundary it reports are then undone: a period after a known abbreviation or
// a single-letter initial ("Mrs. Smith", "J. R. Tolkien"), and a single line
// break that does not follow terminal punctuation (hard-wrapped prose). A blank
// line always ends a sentence.

use unicode_segmentation::UnicodeSegmentation;

const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "st", "sr", "jr", "fr", "prof", "rev", "msgr", "gen", "col",
    "vs", "etc", "cf", "no", "nos", "vol", "art", "ch", "par", "pp", "p", "e.g", "i.e", "ibid",
    "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec",
];

const CLOSERS: &[char] = &['"', '\'', '”', '’', ')', ']', '»'];

pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut pending_start: Option<usize> = None;

    for (offset, piece) in text.split_sentence_bound_indices() {
        let begin = *pending_start.get_or_insert(offset);
        let pending = &text[begin..offset + piece.len()];
        if continues_sentence(pending) {
            continue;
        }
        push_trimmed(&mut sentences, pending);
        pending_start = None;
    }

    if let Some(begin) = pending_start {
        push_trimmed(&mut sentences, &text[begin..]);
    }
    sentences
}

/// Whether the boundary at the end of `pending` should be merged away.
fn continues_sentence(pending: &str) -> bool {
    let body = pending.trim_end();
    if body.is_empty() {
        return false;
    }
    let trailing = &pending[body.len()..];
    let content = body.trim_end_matches(CLOSERS);

    if let Some(before) = content.strip_suffix('.') {
        if is_abbreviation(before) {
            return true;
        }
    }
    let terminal = content.ends_with(['.', '!', '?', '…']);
    !terminal && trailing.matches('\n').count() == 1
}

/// Whether the word right before a period is an abbreviation or an initial.
fn is_abbreviation(before: &str) -> bool {
    let word = before
        .rsplit(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or("");
    if word.is_empty() {
        return false;
    }
    let lower = word.to_lowercase();
    if ABBREVIATIONS.contains(&lower.as_str()) {
        return true;
    }
    let mut chars = word.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase())
}

fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, candidate: &'a str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed);
    }
}
