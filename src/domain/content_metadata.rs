use std::fmt;

use super::{BlobLocation, VideoId};

const KEYWORD_TERMINATOR: char = ',';
const ESCAPE: char = '%';
const ESCAPED_TERMINATOR: &str = "%2C";
const ESCAPED_ESCAPE: &str = "%25";

/// Descriptive record for a converted video. Immutable once inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentMetadata {
    pub video_id: VideoId,
    pub title: String,
    pub author: String,
    pub thumbnail_url: String,
    pub length_seconds: i64,
    pub keywords: Vec<String>,
    pub converted_at: i64,
    pub blob_location: BlobLocation,
}

impl fmt::Display for ContentMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} \"{}\" by {} ({} sec, keywords: {}, converted at {}, stored at {})",
            self.video_id,
            self.title,
            self.author,
            self.length_seconds,
            self.keywords.join(", "),
            self.converted_at,
            self.blob_location
        )
    }
}

/// Encodes keywords into a single text column.
///
/// Each keyword is escaped and followed by a `,` terminator, so the empty list
/// and a list holding one empty keyword stay distinguishable.
pub fn encode_keywords(keywords: &[String]) -> String {
    let mut encoded = String::new();
    for keyword in keywords {
        for c in keyword.chars() {
            match c {
                ESCAPE => encoded.push_str(ESCAPED_ESCAPE),
                KEYWORD_TERMINATOR => encoded.push_str(ESCAPED_TERMINATOR),
                other => encoded.push(other),
            }
        }
        encoded.push(KEYWORD_TERMINATOR);
    }
    encoded
}

/// Inverse of [`encode_keywords`]. Also accepts the separator-only form
/// (`a,b` without a trailing comma) written by older rows.
pub fn decode_keywords(encoded: &str) -> Vec<String> {
    let mut pieces: Vec<&str> = encoded.split(KEYWORD_TERMINATOR).collect();
    if pieces.last().is_some_and(|last| last.is_empty()) {
        pieces.pop();
    }
    pieces.into_iter().map(unescape).collect()
}

fn unescape(piece: &str) -> String {
    let mut out = String::with_capacity(piece.len());
    let mut rest = piece;
    while let Some(idx) = rest.find(ESCAPE) {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx..];
        if tail.starts_with(ESCAPED_TERMINATOR) {
            out.push(KEYWORD_TERMINATOR);
            rest = &tail[ESCAPED_TERMINATOR.len()..];
        } else if tail.starts_with(ESCAPED_ESCAPE) {
            out.push(ESCAPE);
            rest = &tail[ESCAPED_ESCAPE.len()..];
        } else {
            // Unknown escape sequence, keep it verbatim.
            out.push(ESCAPE);
            rest = &tail[ESCAPE.len_utf8()..];
        }
    }
    out.push_str(rest);
    out
}
