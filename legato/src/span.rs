use crate::errors::{LegatoError, Result};

/// String buffer for an input span, keeping the character decomposition and
/// the character-to-byte mapping alongside the raw text.
///
/// The buffer is reused across segmentations to keep allocations stable.
#[derive(Default)]
pub struct InputSpan {
    input: String,
    chars: Vec<char>,
    c2b: Vec<usize>,
    offsets: Vec<u32>,
}

impl InputSpan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.chars.clear();
        self.c2b.clear();
        self.offsets.clear();
    }

    /// Replaces the stored text with `input`, mapping each character to its
    /// own position in the original text.
    pub fn set_span<S>(&mut self, input: S)
    where
        S: AsRef<str>,
    {
        self.clear();
        self.input.push_str(input.as_ref());
        self.compute_basic();
        for i in 0..self.chars.len() {
            self.offsets.push(i as u32);
        }
    }

    /// Replaces the stored text with `input`, carrying caller-supplied
    /// per-character offsets into the original, pre-normalization text.
    ///
    /// # Errors
    ///
    /// [`LegatoError::MalformedOffsets`] is returned when `offsets` holds
    /// fewer entries than `input` has characters. Nothing is stored in that
    /// case.
    pub fn set_span_with_offsets<S>(&mut self, input: S, offsets: &[u32]) -> Result<()>
    where
        S: AsRef<str>,
    {
        let input = input.as_ref();
        let num_chars = input.chars().count();
        if offsets.len() < num_chars {
            return Err(LegatoError::MalformedOffsets {
                expected: num_chars,
                got: offsets.len(),
            });
        }
        self.clear();
        self.input.push_str(input);
        self.compute_basic();
        self.offsets.extend_from_slice(&offsets[..num_chars]);
        Ok(())
    }

    fn compute_basic(&mut self) {
        for (bi, c) in self.input.char_indices() {
            self.chars.push(c);
            self.c2b.push(bi);
        }
        self.c2b.push(self.input.len());
    }

    /// Gets the raw text.
    #[inline(always)]
    pub fn raw(&self) -> &str {
        &self.input
    }

    /// Gets the character decomposition of the text.
    #[inline(always)]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Returns the length of the text in characters.
    #[inline(always)]
    pub fn len_char(&self) -> usize {
        self.chars.len()
    }

    /// Converts a character position to its byte position in the raw text.
    #[inline(always)]
    pub fn byte_position(&self, pos_char: usize) -> usize {
        self.c2b[pos_char]
    }

    /// Gets the stored original offsets of a character range.
    #[inline(always)]
    pub fn original_offsets(&self, range_char: std::ops::Range<usize>) -> &[u32] {
        &self.offsets[range_char]
    }
}
