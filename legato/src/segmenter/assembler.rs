//! Turns a decoded best path into token records: adjacent unknown
//! fallbacks are merged, then boundary masks are assigned.

use crate::common::UNK_PIECE_ID;
use crate::segmenter::lattice::Node;
use crate::token::Mask;

/// One assembled token, stored by character range into the input span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TokenRecord {
    pub start_char: usize,
    pub end_char: usize,
    pub piece_id: u32,
    pub score: f32,
    pub mask: Mask,
}

/// Appends one record per path node to `records`, merging each run of
/// adjacent unknown-piece nodes into a single record marked [`Mask::Unknown`].
///
/// A lone unknown node is not a run; it stays [`Mask::None`] here and gets
/// classified by [`populate_masks`] like any other token.
pub(crate) fn merge_unknowns(path: &[Node], records: &mut Vec<TokenRecord>) {
    let mut prev_unknown = false;
    for node in path {
        let unknown = node.piece_id == UNK_PIECE_ID;
        if unknown && prev_unknown {
            // A run in progress guarantees a preceding record.
            if let Some(prev) = records.last_mut() {
                prev.end_char = node.end_char;
                prev.score = node.score;
                prev.mask = Mask::Unknown;
            }
        } else {
            records.push(TokenRecord {
                start_char: node.start_char,
                end_char: node.end_char,
                piece_id: node.piece_id,
                score: node.score,
                mask: Mask::None,
            });
        }
        prev_unknown = unknown;
    }
}

/// Classifies each record by its boundary role, scanning left to right.
///
/// Single-character punctuation and whitespace short-circuit the scan; a
/// whitespace token leaves `Punctuation` as the remembered state, so the
/// following token is never a continuation. Tokens that do not start with
/// `word_start_marker` and follow a non-boundary token become
/// [`Mask::Continuation`], except merged unknown runs, which keep
/// [`Mask::Unknown`].
pub(crate) fn populate_masks(records: &mut [TokenRecord], chars: &[char], word_start_marker: char) {
    let mut previous_mask = Mask::None;

    for rec in records.iter_mut() {
        if rec.end_char - rec.start_char == 1 {
            let c = chars[rec.start_char];
            if is_punctuation(c) {
                rec.mask = Mask::Punctuation;
                previous_mask = Mask::Punctuation;
                continue;
            }
            if c.is_whitespace() {
                rec.mask = Mask::Whitespace;
                previous_mask = Mask::Punctuation;
                continue;
            }
        }

        if chars[rec.start_char] != word_start_marker
            && previous_mask != Mask::Punctuation
            && previous_mask != Mask::Whitespace
        {
            if rec.mask != Mask::Unknown {
                rec.mask = Mask::Continuation;
            }
            previous_mask = Mask::Continuation;
        } else {
            previous_mask = Mask::None;
        }
    }
}

/// Checks if a character acts as punctuation for mask classification,
/// covering the ASCII ranges and the general and CJK punctuation blocks.
pub(crate) fn is_punctuation(c: char) -> bool {
    let cp = c as u32;
    matches!(cp,
        0x21..=0x2F
        | 0x3A..=0x40
        | 0x5B..=0x60
        | 0x7B..=0x7E
        | 0x00A1..=0x00BF
        | 0x2000..=0x206F
        | 0x2E00..=0x2E7F
        | 0x3000..=0x303F
        | 0xFE30..=0xFE4F
        | 0xFE50..=0xFE6F
        | 0xFF01..=0xFF0F
        | 0xFF1A..=0xFF20
        | 0xFF3B..=0xFF40
        | 0xFF5B..=0xFF65)
}
