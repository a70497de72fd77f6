use crate::errors::{LegatoError, Result};
use crate::common::UNK_PIECE_ID;

/// One decoded piece occurrence on the best path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    /// Id of the vocabulary piece covering this range.
    pub piece_id: u32,
    /// Cumulative score of the best path ending with this node.
    pub score: f32,
    /// Start position of the range in characters.
    pub start_char: usize,
    /// Exclusive end position of the range in characters.
    pub end_char: usize,
}

/// Viterbi lattice over character positions.
///
/// `scores[p]` holds the best cumulative score of any decoded path reaching
/// position `p`, and `ends[p]` the last node of that path. Both are indexed
/// by position, so they carry one entry past the final character.
#[derive(Default)]
pub struct Lattice {
    scores: Vec<f32>,
    ends: Vec<Option<Node>>,
    len_char: usize,
}

impl Lattice {
    /// Resets the lattice for an input of `len_char` characters.
    ///
    /// Position 0 starts reachable with score 0; everything else starts
    /// unreachable.
    pub fn reset(&mut self, len_char: usize) {
        self.scores.clear();
        self.scores.resize(len_char + 1, f32::NEG_INFINITY);
        self.scores[0] = 0.0;
        self.ends.clear();
        self.ends.resize(len_char + 1, None);
        self.len_char = len_char;
    }

    /// Checks if any decoded path reaches position `pos_char`.
    #[inline(always)]
    pub fn is_reachable(&self, pos_char: usize) -> bool {
        self.scores[pos_char] != f32::NEG_INFINITY
    }

    /// Relaxes the edge covering `[start_char, end_char)` with the given
    /// piece, keeping the higher-scoring path into `end_char`.
    #[inline(always)]
    pub fn insert_node(&mut self, start_char: usize, end_char: usize, piece_id: u32, piece_score: f32) {
        let score = self.scores[start_char] + piece_score;
        if score > self.scores[end_char] {
            self.scores[end_char] = score;
            self.ends[end_char] = Some(Node {
                piece_id,
                score,
                start_char,
                end_char,
            });
        }
    }

    /// Keeps position `pos_char + 1` reachable when no piece covers the
    /// character at `pos_char`, by planting a single-character unknown node.
    ///
    /// The planted node records `f32::MIN` as its score, but the score
    /// propagated forward from it is reset to zero: later pieces resume
    /// competing on their own scores instead of being drowned out by the
    /// penalty.
    pub fn insert_unknown_fallback(&mut self, pos_char: usize) {
        if self.scores[pos_char + 1] <= f32::MIN {
            self.ends[pos_char + 1] = Some(Node {
                piece_id: UNK_PIECE_ID,
                score: f32::MIN,
                start_char: pos_char,
                end_char: pos_char + 1,
            });
            self.scores[pos_char + 1] = 0.0;
        }
    }

    /// Appends the best path to `best_path` in left-to-right order, walking
    /// the `ends` chain backwards from the final position.
    ///
    /// # Errors
    ///
    /// [`LegatoError::NoPathFound`] is returned when the final position was
    /// never reached.
    pub fn append_best_path(&self, best_path: &mut Vec<Node>) -> Result<()> {
        if self.ends[self.len_char].is_none() {
            return Err(LegatoError::NoPathFound);
        }
        let tail = best_path.len();
        let mut pos_char = self.len_char;
        while pos_char > 0 {
            let node = self.ends[pos_char].ok_or(LegatoError::NoPathFound)?;
            best_path.push(node);
            pos_char = node.start_char;
        }
        best_path[tail..].reverse();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_edge() {
        let mut lattice = Lattice::default();
        lattice.reset(2);
        lattice.insert_node(0, 2, 5, -1.5);

        let mut path = vec![];
        lattice.append_best_path(&mut path).unwrap();
        assert_eq!(
            path,
            vec![Node {
                piece_id: 5,
                score: -1.5,
                start_char: 0,
                end_char: 2,
            }]
        );
    }

    #[test]
    fn test_higher_score_wins() {
        let mut lattice = Lattice::default();
        lattice.reset(2);
        // "ab" as one piece beats "a"+"b".
        lattice.insert_node(0, 1, 1, -1.0);
        lattice.insert_node(0, 2, 3, -1.2);
        lattice.insert_node(1, 2, 2, -1.0);

        let mut path = vec![];
        lattice.append_best_path(&mut path).unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path[0].piece_id, 3);
        assert_eq!(path[0].score, -1.2);
    }

    #[test]
    fn test_unreachable_start_not_relaxed() {
        let mut lattice = Lattice::default();
        lattice.reset(2);
        assert!(lattice.is_reachable(0));
        assert!(!lattice.is_reachable(1));

        let mut path = vec![];
        assert!(matches!(
            lattice.append_best_path(&mut path).unwrap_err(),
            LegatoError::NoPathFound
        ));
    }

    #[test]
    fn test_unknown_fallback_resets_score() {
        let mut lattice = Lattice::default();
        lattice.reset(2);
        lattice.insert_unknown_fallback(0);
        assert!(lattice.is_reachable(1));
        // Decoding resumes with a clean slate past the unknown.
        lattice.insert_node(1, 2, 4, -2.0);

        let mut path = vec![];
        lattice.append_best_path(&mut path).unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path[0].piece_id, UNK_PIECE_ID);
        assert_eq!(path[0].score, f32::MIN);
        assert_eq!(path[1].score, -2.0);
    }

    #[test]
    fn test_unknown_fallback_skips_reached_position() {
        let mut lattice = Lattice::default();
        lattice.reset(1);
        lattice.insert_node(0, 1, 7, -0.5);
        lattice.insert_unknown_fallback(0);

        let mut path = vec![];
        lattice.append_best_path(&mut path).unwrap();
        assert_eq!(path[0].piece_id, 7);
    }

    #[test]
    fn test_append_keeps_existing_entries() {
        let mut lattice = Lattice::default();
        lattice.reset(1);
        lattice.insert_node(0, 1, 1, -1.0);

        let mut path = vec![Node {
            piece_id: 9,
            score: 0.0,
            start_char: 0,
            end_char: 0,
        }];
        lattice.append_best_path(&mut path).unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path[0].piece_id, 9);
        assert_eq!(path[1].piece_id, 1);
    }
}
