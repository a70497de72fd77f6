//! Scored piece vocabulary backing the segmenter.
pub(crate) mod trie;

mod special;

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use hashbrown::HashMap;

use crate::errors::{LegatoError, Result};
use crate::utils;
use crate::vocab::trie::Trie;

pub use crate::vocab::special::SpecialTokenMap;

/// One vocabulary entry.
#[derive(Debug)]
struct Piece {
    text: String,
    score: f32,
}

/// An ordered collection of scored subword pieces, indexed for segmentation.
///
/// The id of a piece is its position in the loaded collection. Construction
/// inserts every piece into a prefix trie; the trie is immutable afterwards
/// and safe for unsynchronized concurrent reads.
#[derive(Debug)]
pub struct Vocabulary {
    pieces: Vec<Piece>,
    values: HashMap<String, u32>,
    special_values: HashMap<String, u32>,
    special_indices: HashMap<u32, String>,
    special_tokens: SpecialTokenMap,
    trie: Trie,
}

impl Vocabulary {
    /// Builds a vocabulary from an ordered sequence of `(piece, score)`
    /// pairs, assigning ids by position.
    ///
    /// Duplicate piece text is logged and silently overwritten in the trie
    /// (last write wins); loaders are expected to supply unique pieces.
    ///
    /// # Errors
    ///
    /// [`LegatoError`] is returned when the sequence is empty: an empty trie
    /// is a configuration error at construction time, not at decode time.
    pub fn from_pieces<I, S>(pieces: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f32)>,
        S: AsRef<str>,
    {
        let mut entries: Vec<Piece> = vec![];
        let mut values = HashMap::new();
        let mut trie = Trie::new();

        for (i, (text, score)) in pieces.into_iter().enumerate() {
            let text = text.as_ref();
            let id = u32::try_from(i)?;
            if let Some(prev) = values.insert(text.to_string(), id) {
                log::warn!("duplicate piece {text:?} (ids {prev} and {id}); the last one wins");
            }
            trie.insert(text, id);
            entries.push(Piece {
                text: text.to_string(),
                score,
            });
        }

        if entries.is_empty() {
            return Err(LegatoError::invalid_argument(
                "pieces",
                "the vocabulary must contain at least one piece",
            ));
        }

        log::info!(
            "loaded {} pieces into a trie of {} nodes",
            entries.len(),
            trie.num_nodes()
        );

        Ok(Self {
            pieces: entries,
            values,
            special_values: HashMap::new(),
            special_indices: HashMap::new(),
            special_tokens: SpecialTokenMap::default(),
            trie,
        })
    }

    /// Reads a flat-line vocabulary: one piece per line, id implied by the
    /// line number. Pieces loaded this way carry a uniform score of `0.0`.
    pub fn from_flat_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut pieces = vec![];
        for line in BufReader::new(rdr).lines() {
            let line = line?;
            pieces.push((line.trim().to_string(), 0.0));
        }
        Self::from_pieces(pieces)
    }

    /// Reads a JSON vocabulary: an object mapping piece text to id.
    ///
    /// Entries are reordered by id; pieces loaded this way carry a uniform
    /// score of `0.0`.
    ///
    /// # Errors
    ///
    /// [`LegatoError`] is returned when the ids do not form a contiguous
    /// range starting at zero.
    pub fn from_json_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let map: std::collections::HashMap<String, u32> = serde_json::from_reader(rdr)?;
        let mut entries: Vec<(String, u32)> = map.into_iter().collect();
        entries.sort_by_key(|&(_, id)| id);
        for (pos, (piece, id)) in entries.iter().enumerate() {
            if u64::from(*id) != pos as u64 {
                return Err(LegatoError::invalid_format(
                    "json",
                    format!("piece ids must be contiguous from 0; {piece:?} has id {id} at position {pos}"),
                ));
            }
        }
        Self::from_pieces(entries.into_iter().map(|(piece, _)| (piece, 0.0)))
    }

    /// Reads a columnar model vocabulary: one `piece<TAB>score` row per
    /// line, id implied by the line number.
    ///
    /// ```
    /// use legato::Vocabulary;
    ///
    /// let model = "\u{2581}un\t-1.0\nable\t-1.2";
    /// let vocab = Vocabulary::from_model_reader(model.as_bytes()).unwrap();
    /// assert_eq!(vocab.num_pieces(), 2);
    /// assert_eq!(vocab.score(1), Some(-1.2));
    /// ```
    pub fn from_model_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut pieces = vec![];
        for (i, line) in BufReader::new(rdr).lines().enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let mut cols = utils::parse_tsv_row(&line);
            if cols.len() != 2 {
                return Err(LegatoError::invalid_format(
                    "model",
                    format!(
                        "line {}: expected 2 tab-separated columns, got {}",
                        i + 1,
                        cols.len()
                    ),
                ));
            }
            let score = cols[1].parse::<f32>()?;
            pieces.push((cols.swap_remove(0), score));
        }
        Self::from_pieces(pieces)
    }

    /// Reads a flat-line vocabulary from a file.
    ///
    /// # Errors
    ///
    /// [`LegatoError::FileNotFound`] is returned when `path` does not exist.
    pub fn from_flat_file<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        Self::from_flat_reader(open_vocab_file(path.as_ref())?)
    }

    /// Reads a JSON vocabulary from a file.
    ///
    /// # Errors
    ///
    /// [`LegatoError::FileNotFound`] is returned when `path` does not exist.
    pub fn from_json_file<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        Self::from_json_reader(open_vocab_file(path.as_ref())?)
    }

    /// Reads a columnar model vocabulary from a file.
    ///
    /// # Errors
    ///
    /// [`LegatoError::FileNotFound`] is returned when `path` does not exist.
    pub fn from_model_file<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        Self::from_model_reader(open_vocab_file(path.as_ref())?)
    }

    /// Registers the special tokens of `special_tokens`, resolving each to
    /// its id in this vocabulary.
    ///
    /// # Errors
    ///
    /// [`LegatoError::TokenNotFound`] is returned when a configured token is
    /// absent from the vocabulary.
    pub fn with_special_tokens(mut self, special_tokens: SpecialTokenMap) -> Result<Self> {
        let mut special_values = HashMap::new();
        for token in special_tokens.iter() {
            let id = *self
                .values
                .get(token)
                .ok_or_else(|| LegatoError::TokenNotFound(token.to_string()))?;
            special_values.insert(token.to_string(), id);
        }
        self.special_indices = special_values.iter().map(|(k, v)| (*v, k.clone())).collect();
        self.special_values = special_values;
        self.special_tokens = special_tokens;
        Ok(self)
    }

    /// Returns the number of pieces, including any added after loading.
    #[inline(always)]
    pub fn num_pieces(&self) -> usize {
        self.pieces.len()
    }

    /// Gets the text of the piece with the given id.
    #[inline(always)]
    pub fn piece(&self, id: u32) -> Option<&str> {
        self.pieces.get(id as usize).map(|p| p.text.as_str())
    }

    /// Gets the unigram score of the piece with the given id.
    #[inline(always)]
    pub fn score(&self, id: u32) -> Option<f32> {
        self.pieces.get(id as usize).map(|p| p.score)
    }

    /// Gets the reference to the special-token configuration.
    pub fn special_tokens(&self) -> &SpecialTokenMap {
        &self.special_tokens
    }

    /// Gets the id of the configured unknown token, when registered.
    pub fn unk_id(&self) -> Option<u32> {
        let unk = self.special_tokens.unk_token.as_deref()?;
        self.values.get(unk).copied()
    }

    /// Converts a piece to its id, checking special tokens first and
    /// falling back to the unknown token when one is registered.
    pub fn piece_to_id(&self, piece: &str) -> Option<u32> {
        self.special_values
            .get(piece)
            .or_else(|| self.values.get(piece))
            .copied()
            .or_else(|| self.unk_id())
    }

    /// Converts an id back to its piece text, checking special tokens first.
    pub fn id_to_piece(&self, id: u32) -> Option<&str> {
        if let Some(token) = self.special_indices.get(&id) {
            return Some(token);
        }
        self.piece(id)
    }

    /// Converts a sequence of pieces to ids via [`Self::piece_to_id`].
    ///
    /// # Errors
    ///
    /// [`LegatoError::TokenNotFound`] is returned for a piece absent from
    /// the vocabulary when no unknown token is registered.
    pub fn pieces_to_ids<I, S>(&self, pieces: I) -> Result<Vec<u32>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        pieces
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                self.piece_to_id(p)
                    .ok_or_else(|| LegatoError::TokenNotFound(p.to_string()))
            })
            .collect()
    }

    /// Appends pieces absent from the vocabulary, allocating fresh ids past
    /// the loaded collection.
    ///
    /// Added pieces take part in id lookup only. The trie is fixed at load
    /// time, so they are never produced by segmentation.
    pub fn add_pieces<I, S>(&mut self, pieces: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for piece in pieces {
            let piece = piece.as_ref();
            if self.values.contains_key(piece) {
                continue;
            }
            let id = u32::try_from(self.pieces.len())?;
            self.values.insert(piece.to_string(), id);
            self.pieces.push(Piece {
                text: piece.to_string(),
                score: 0.0,
            });
        }
        Ok(())
    }

    /// Appends `num_extra_ids` sentinel pieces named `<extra_id_N>`,
    /// allocating fresh ids past the loaded collection.
    pub fn add_extra_ids(&mut self, num_extra_ids: u32) -> Result<()> {
        for i in 0..num_extra_ids {
            let text = format!("<extra_id_{i}>");
            let id = u32::try_from(self.pieces.len())?;
            self.values.insert(text.clone(), id);
            self.pieces.push(Piece { text, score: 0.0 });
        }
        Ok(())
    }

    /// Returns an iterator over every piece that is a prefix of `input`,
    /// ordered by increasing length, with its score attached.
    #[inline(always)]
    pub fn common_prefix_iterator<'a>(
        &'a self,
        input: &'a [char],
    ) -> impl Iterator<Item = PieceMatch> + 'a {
        self.trie
            .common_prefix_iterator(input)
            .map(move |m| PieceMatch::new(m.value, self.pieces[m.value as usize].score, m.end_char))
    }
}

/// A scored piece found by [`Vocabulary::common_prefix_iterator`].
#[derive(Debug, PartialEq, Clone)]
pub struct PieceMatch {
    /// Id of the matched piece.
    pub piece_id: u32,
    /// Unigram score of the matched piece.
    pub score: f32,
    /// Exclusive end position of the match in characters.
    pub end_char: usize,
}

impl PieceMatch {
    #[inline(always)]
    pub(crate) const fn new(piece_id: u32, score: f32, end_char: usize) -> Self {
        Self {
            piece_id,
            score,
            end_char,
        }
    }
}

fn open_vocab_file(path: &Path) -> Result<File> {
    if !path.exists() {
        return Err(LegatoError::FileNotFound(path.to_path_buf()));
    }
    Ok(File::open(path)?)
}
