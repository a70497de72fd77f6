//! Segmenter, decoding input spans into scored subword tokens.
pub(crate) mod assembler;
pub(crate) mod lattice;
pub mod worker;

use std::sync::Arc;

use crate::common::WORD_START_MARKER;
use crate::segmenter::lattice::Lattice;
use crate::segmenter::worker::Worker;
use crate::span::InputSpan;
use crate::vocab::Vocabulary;

/// A configured unigram segmenter over a shared vocabulary.
///
/// A segmenter is cheap to clone; clones share the vocabulary. Decoding
/// state lives in the [`Worker`]s a segmenter creates.
#[derive(Clone)]
pub struct Segmenter {
    pub(crate) vocab: Arc<Vocabulary>,
    pub(crate) word_start_marker: char,
}

impl Segmenter {
    /// Creates a segmenter owning its vocabulary.
    pub fn new(vocab: Vocabulary) -> Self {
        Self::from_shared_vocabulary(Arc::new(vocab))
    }

    /// Creates a segmenter over an already shared vocabulary.
    pub fn from_shared_vocabulary(vocab: Arc<Vocabulary>) -> Self {
        Self {
            vocab,
            word_start_marker: WORD_START_MARKER,
        }
    }

    /// Replaces the word-start marker used for mask classification.
    ///
    /// The default is [`WORD_START_MARKER`].
    pub const fn word_start_marker(mut self, marker: char) -> Self {
        self.word_start_marker = marker;
        self
    }

    /// Gets the reference to the vocabulary.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Creates a worker for this segmenter.
    pub fn new_worker(&self) -> Worker {
        Worker::new(self.clone())
    }

    /// Fills `lattice` with every piece occurrence in `span`, relaxing
    /// forward position by position.
    ///
    /// After each start position is processed, the single-character unknown
    /// fallback keeps the next position reachable, so decoding never dead
    /// ends on out-of-vocabulary characters.
    pub(crate) fn build_lattice(&self, span: &InputSpan, lattice: &mut Lattice) {
        lattice.reset(span.len_char());
        let chars = span.chars();
        for start in 0..chars.len() {
            for m in self.vocab.common_prefix_iterator(&chars[start..]) {
                lattice.insert_node(start, start + m.end_char, m.piece_id, m.score);
            }
            lattice.insert_unknown_fallback(start);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::token::Mask;

    fn vocab() -> Vocabulary {
        Vocabulary::from_pieces([
            ("<unk>", 0.0),
            ("\u{2581}un", -1.0),
            ("able", -1.2),
            ("\u{2581}ly", -1.5),
        ])
        .unwrap()
    }

    #[test]
    fn test_best_path() {
        let segmenter = Segmenter::new(vocab());
        let mut worker = segmenter.new_worker();
        worker.reset_span("\u{2581}unable");
        worker.segment().unwrap();

        let surfaces: Vec<&str> = worker.token_iter().map(|t| t.surface()).collect();
        assert_eq!(surfaces, vec!["\u{2581}un", "able"]);
        assert_eq!(worker.token(1).total_score(), -2.2);
    }

    #[test]
    fn test_custom_marker() {
        let vocab = Vocabulary::from_pieces([("<unk>", 0.0), ("_a", -1.0), ("b", -1.0)]).unwrap();
        let segmenter = Segmenter::new(vocab).word_start_marker('_');
        let mut worker = segmenter.new_worker();
        worker.reset_span("_ab");
        worker.segment().unwrap();

        assert_eq!(worker.token(0).mask(), Mask::None);
        assert_eq!(worker.token(1).mask(), Mask::Continuation);
    }

    #[test]
    fn test_clones_share_vocabulary() {
        let segmenter = Segmenter::new(vocab());
        let clone = segmenter.clone();
        assert!(Arc::ptr_eq(&segmenter.vocab, &clone.vocab));
    }
}
