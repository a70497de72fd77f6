//! Definitions of tokens produced by segmentation.

use std::fmt;
use std::ops::Range;

use crate::segmenter::worker::Worker;

/// Boundary role of a token within its input span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mask {
    /// No particular role; the token starts a word or needs no flag.
    #[default]
    None,
    /// A merged run of characters no vocabulary piece covers.
    Unknown,
    /// A single whitespace character.
    Whitespace,
    /// A single punctuation character.
    Punctuation,
    /// A subword continuing the word begun by the preceding token.
    Continuation,
}

/// A token borrowed from a [`Worker`](crate::segmenter::worker::Worker).
pub struct Token<'w> {
    worker: &'w Worker,
    index: usize,
}

impl<'w> Token<'w> {
    #[inline(always)]
    pub(crate) const fn new(worker: &'w Worker, index: usize) -> Self {
        Self { worker, index }
    }

    /// Gets the surface text of this token.
    #[inline(always)]
    pub fn surface(&self) -> &'w str {
        let range = self.range_byte();
        &self.worker.span.raw()[range]
    }

    /// Gets the position range of this token in characters.
    #[inline(always)]
    pub fn range_char(&self) -> Range<usize> {
        let rec = &self.worker.records[self.index];
        rec.start_char..rec.end_char
    }

    /// Gets the position range of this token in bytes.
    #[inline(always)]
    pub fn range_byte(&self) -> Range<usize> {
        let rec = &self.worker.records[self.index];
        self.worker.span.byte_position(rec.start_char)..self.worker.span.byte_position(rec.end_char)
    }

    /// Gets the id of the vocabulary piece behind this token.
    #[inline(always)]
    pub fn piece_id(&self) -> u32 {
        self.worker.records[self.index].piece_id
    }

    /// Gets the cumulative score of the best path ending with this token.
    #[inline(always)]
    pub fn total_score(&self) -> f32 {
        self.worker.records[self.index].score
    }

    /// Gets the boundary mask of this token.
    #[inline(always)]
    pub fn mask(&self) -> Mask {
        self.worker.records[self.index].mask
    }

    /// Gets the span-relative offset pair carried by this token.
    ///
    /// Always `(0, 0)`; positions in the original text are reported through
    /// [`Self::original_offsets`] instead.
    #[inline(always)]
    pub fn span_offset(&self) -> (usize, usize) {
        (0, 0)
    }

    /// Gets the original-text offsets of the characters this token covers.
    #[inline(always)]
    pub fn original_offsets(&self) -> &'w [u32] {
        self.worker.span.original_offsets(self.range_char())
    }

    /// Copies this token into an owned [`TokenBuf`].
    pub fn to_buf(&self) -> TokenBuf {
        TokenBuf {
            surface: self.surface().to_string(),
            range_char: self.range_char(),
            range_byte: self.range_byte(),
            piece_id: self.piece_id(),
            total_score: self.total_score(),
            mask: self.mask(),
            span_offset: self.span_offset(),
            original_offsets: self.original_offsets().to_vec(),
        }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Token")
            .field("surface", &self.surface())
            .field("range_char", &self.range_char())
            .field("range_byte", &self.range_byte())
            .field("piece_id", &self.piece_id())
            .field("total_score", &self.total_score())
            .field("mask", &self.mask())
            .finish()
    }
}

/// An owned copy of a [`Token`].
#[derive(Debug, Clone, PartialEq)]
pub struct TokenBuf {
    /// Surface text.
    pub surface: String,
    /// Position range in characters.
    pub range_char: Range<usize>,
    /// Position range in bytes.
    pub range_byte: Range<usize>,
    /// Id of the vocabulary piece.
    pub piece_id: u32,
    /// Cumulative score of the best path ending with this token.
    pub total_score: f32,
    /// Boundary mask.
    pub mask: Mask,
    /// Span-relative offset pair; always `(0, 0)`.
    pub span_offset: (usize, usize),
    /// Original-text offsets of the covered characters.
    pub original_offsets: Vec<u32>,
}

impl From<Token<'_>> for TokenBuf {
    fn from(token: Token<'_>) -> Self {
        token.to_buf()
    }
}

/// An iterator over a worker's tokens.
pub struct TokenIter<'w> {
    worker: &'w Worker,
    i: usize,
}

impl<'w> TokenIter<'w> {
    #[inline(always)]
    pub(crate) const fn new(worker: &'w Worker) -> Self {
        Self { worker, i: 0 }
    }
}

impl<'w> Iterator for TokenIter<'w> {
    type Item = Token<'w>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.i < self.worker.num_tokens() {
            let t = self.worker.token(self.i);
            self.i += 1;
            Some(t)
        } else {
            None
        }
    }
}
