//! # Legato
//!
//! Legato is a unigram language-model subword segmenter. A scored piece
//! vocabulary is compiled into a prefix trie, and input spans are decoded
//! with a Viterbi search over the trie's common-prefix matches; characters
//! no piece covers fall back to single-character unknown tokens.
//!
//! ## Examples
//!
//! ```
//! use legato::{Mask, Segmenter, Vocabulary};
//!
//! let model = "<unk>\t0.0\n\u{2581}un\t-1.0\nable\t-1.2\n\u{2581}ly\t-1.5";
//! let vocab = Vocabulary::from_model_reader(model.as_bytes())?;
//!
//! let segmenter = Segmenter::new(vocab);
//! let mut worker = segmenter.new_worker();
//!
//! worker.reset_span("\u{2581}unable");
//! worker.segment()?;
//! assert_eq!(worker.num_tokens(), 2);
//!
//! let t0 = worker.token(0);
//! assert_eq!(t0.surface(), "\u{2581}un");
//! assert_eq!(t0.mask(), Mask::None);
//!
//! let t1 = worker.token(1);
//! assert_eq!(t1.surface(), "able");
//! assert_eq!(t1.mask(), Mask::Continuation);
//! assert_eq!(t1.total_score(), -2.2);
//! # Ok::<(), legato::errors::LegatoError>(())
//! ```
#![deny(missing_docs)]

pub mod common;
pub mod errors;
pub mod segmenter;
mod span;
pub mod token;
mod utils;
pub mod vocab;

#[cfg(test)]
mod tests;

pub use segmenter::Segmenter;
pub use token::Mask;
pub use vocab::Vocabulary;

/// The version number of this library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
