//! Provider of segmentation, holding the reusable working buffers.

use crate::errors::{LegatoError, Result};
use crate::segmenter::Segmenter;
use crate::segmenter::assembler::{self, TokenRecord};
use crate::segmenter::lattice::{Lattice, Node};
use crate::span::InputSpan;
use crate::token::{Token, TokenIter};

/// A worker to segment input spans.
///
/// A worker owns the span buffer, the lattice, and the token records, so
/// repeated segmentations reuse their allocations. Create one worker per
/// thread; the segmenter behind them is shared.
pub struct Worker {
    pub(crate) segmenter: Segmenter,
    pub(crate) span: InputSpan,
    lattice: Lattice,
    best_path: Vec<Node>,
    pub(crate) records: Vec<TokenRecord>,
}

impl Worker {
    pub(crate) fn new(segmenter: Segmenter) -> Self {
        Self {
            segmenter,
            span: InputSpan::new(),
            lattice: Lattice::default(),
            best_path: vec![],
            records: vec![],
        }
    }

    /// Replaces the stored span with `input`, with identity offsets into
    /// the original text. Tokens of the previous span are discarded.
    pub fn reset_span<S>(&mut self, input: S)
    where
        S: AsRef<str>,
    {
        self.best_path.clear();
        self.records.clear();
        self.span.set_span(input);
    }

    /// Replaces the stored span with `input` and caller-supplied offsets
    /// into the original, pre-normalization text. Tokens of the previous
    /// span are discarded.
    ///
    /// # Errors
    ///
    /// [`LegatoError::MalformedOffsets`] is returned when `offsets` holds
    /// fewer entries than `input` has characters; the previous span then
    /// stays in place.
    pub fn reset_span_with_offsets<S>(&mut self, input: S, offsets: &[u32]) -> Result<()>
    where
        S: AsRef<str>,
    {
        self.best_path.clear();
        self.records.clear();
        self.span.set_span_with_offsets(input, offsets)
    }

    /// Segments the stored span into tokens.
    ///
    /// # Errors
    ///
    /// [`LegatoError::EmptySpan`] is returned when the stored span is
    /// empty, and [`LegatoError::NoPathFound`] when decoding cannot reach
    /// the end of the span.
    pub fn segment(&mut self) -> Result<()> {
        self.best_path.clear();
        self.records.clear();
        if self.span.len_char() == 0 {
            return Err(LegatoError::EmptySpan);
        }
        self.segmenter.build_lattice(&self.span, &mut self.lattice);
        self.lattice.append_best_path(&mut self.best_path)?;
        assembler::merge_unknowns(&self.best_path, &mut self.records);
        assembler::populate_masks(
            &mut self.records,
            self.span.chars(),
            self.segmenter.word_start_marker,
        );
        Ok(())
    }

    /// Gets the number of tokens of the segmented span.
    #[inline(always)]
    pub fn num_tokens(&self) -> usize {
        self.records.len()
    }

    /// Gets the `i`-th token of the segmented span.
    ///
    /// # Panics
    ///
    /// Panics when `i` is out of bounds.
    #[inline(always)]
    pub fn token(&self, i: usize) -> Token<'_> {
        debug_assert!(i < self.num_tokens());
        Token::new(self, i)
    }

    /// Returns an iterator over the tokens of the segmented span.
    #[inline(always)]
    pub fn token_iter(&self) -> TokenIter<'_> {
        TokenIter::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use crate::vocab::Vocabulary;

    fn segmenter() -> Segmenter {
        let vocab = Vocabulary::from_pieces([
            ("<unk>", 0.0),
            ("\u{2581}un", -1.0),
            ("able", -1.2),
        ])
        .unwrap();
        Segmenter::from_shared_vocabulary(Arc::new(vocab))
    }

    #[test]
    fn test_empty_span() {
        let mut worker = segmenter().new_worker();
        worker.reset_span("");
        assert!(matches!(
            worker.segment().unwrap_err(),
            LegatoError::EmptySpan
        ));
        assert_eq!(worker.num_tokens(), 0);
    }

    #[test]
    fn test_reset_discards_tokens() {
        let mut worker = segmenter().new_worker();
        worker.reset_span("\u{2581}unable");
        worker.segment().unwrap();
        assert_eq!(worker.num_tokens(), 2);

        worker.reset_span("able");
        assert_eq!(worker.num_tokens(), 0);
    }

    #[test]
    fn test_reset_with_offsets() {
        let mut worker = segmenter().new_worker();
        worker
            .reset_span_with_offsets("able", &[10, 11, 12, 13])
            .unwrap();
        worker.segment().unwrap();
        assert_eq!(worker.token(0).original_offsets(), &[10, 11, 12, 13]);
    }

    #[test]
    fn test_reset_with_malformed_offsets() {
        let mut worker = segmenter().new_worker();
        let e = worker.reset_span_with_offsets("able", &[10]).unwrap_err();
        assert!(matches!(e, LegatoError::MalformedOffsets { .. }));
    }

    #[test]
    fn test_worker_reuse() {
        let mut worker = segmenter().new_worker();
        for _ in 0..3 {
            worker.reset_span("\u{2581}unable");
            worker.segment().unwrap();
            assert_eq!(worker.num_tokens(), 2);
        }
    }
}
