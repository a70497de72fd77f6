//! Common settings in Legato.

/// The default word-start marker character (U+2581 LOWER ONE EIGHTH BLOCK).
///
/// Unigram vocabularies prefix pieces that begin a new word with this
/// character; tokens not starting with it, following a non-boundary token,
/// are subword continuations.
pub const WORD_START_MARKER: char = '\u{2581}';

/// The piece id assigned to single-character fallbacks for characters that
/// no vocabulary piece covers.
///
/// By convention, id 0 of a unigram vocabulary is its unknown piece.
pub const UNK_PIECE_ID: u32 = 0;
