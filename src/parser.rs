//! Input-line grammar (§4.2): turns raw text lines into `ParsedSong` values,
//! reporting malformed lines without aborting the stream.

use crate::error::ParseError;
use crate::types::ParsedSong;

/// One grammar-level outcome for a single input line.
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Song(ParsedSong),
    Error(ParseError),
}

/// Parses every line of `text`, skipping empty-after-trim lines, assigning
/// each surviving line a 0-based sequence number shared by `ParsedSong` and
/// `ParseError` alike so the aggregator can restore input order.
pub fn parse_lines(text: &str) -> Vec<ParseOutcome> {
    let mut outcomes = Vec::new();
    let mut sequence = 0usize;
    for (line_number, raw_line) in text.lines().enumerate() {
        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            continue;
        }
        outcomes.push(parse_line(line_number + 1, trimmed, sequence));
        sequence += 1;
    }
    outcomes
}

/// Finds the title/artist delimiter. A line can also open with a bare
/// `"- "` (empty title), which doesn't contain `" - "` as a substring, so
/// that leading form is checked separately from the interior search.
fn find_delimiter(trimmed: &str) -> Option<usize> {
    if let Some(idx) = trimmed.find(" - ") {
        return Some(idx);
    }
    if let Some(rest) = trimmed.strip_prefix("- ") {
        let _ = rest;
        return Some(0);
    }
    None
}

fn parse_line(line_number: usize, trimmed: &str, sequence: usize) -> ParseOutcome {
    match find_delimiter(trimmed) {
        Some(idx) => {
            let delimiter_len = if idx == 0 { 2 } else { 3 };
            let title = trimmed[..idx].trim();
            let artist_string = trimmed[idx + delimiter_len..].trim();
            if title.is_empty() || artist_string.is_empty() {
                return ParseOutcome::Error(ParseError {
                    sequence,
                    line_number,
                    original_line: trimmed.to_string(),
                    reason: "empty title or artist side of ' - '".to_string(),
                });
            }
            ParseOutcome::Song(ParsedSong {
                sequence,
                original_line: trimmed.to_string(),
                title: title.to_string(),
                artists: split_artists(artist_string),
            })
        }
        None => ParseOutcome::Song(ParsedSong {
            sequence,
            original_line: trimmed.to_string(),
            title: trimmed.to_string(),
            artists: Vec::new(),
        }),
    }
}

fn split_artists(artist_string: &str) -> Vec<String> {
    artist_string
        .split(" / ")
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}
