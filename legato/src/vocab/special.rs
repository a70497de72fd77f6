//! Special-token configuration for extended vocabularies.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::errors::{LegatoError, Result};

/// The set of special tokens a vocabulary reserves, read from a JSON
/// mapping file.
///
/// Every configured token must be present in the loaded vocabulary;
/// registration fails with [`LegatoError::TokenNotFound`] otherwise.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpecialTokenMap {
    /// Token substituted for pieces absent from the vocabulary.
    #[serde(default)]
    pub unk_token: Option<String>,

    /// Padding token.
    #[serde(default)]
    pub pad_token: Option<String>,

    /// Beginning-of-sequence token.
    #[serde(default)]
    pub bos_token: Option<String>,

    /// End-of-sequence token.
    #[serde(default)]
    pub eos_token: Option<String>,

    /// Separator token.
    #[serde(default)]
    pub sep_token: Option<String>,

    /// Classification token.
    #[serde(default)]
    pub cls_token: Option<String>,

    /// Mask token.
    #[serde(default)]
    pub mask_token: Option<String>,

    /// Further reserved tokens beyond the named roles.
    #[serde(default)]
    pub additional_special_tokens: HashSet<String>,
}

impl SpecialTokenMap {
    /// Reads a special-token mapping from a JSON reader.
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        Ok(serde_json::from_reader(rdr)?)
    }

    /// Reads a special-token mapping from a JSON file.
    ///
    /// # Errors
    ///
    /// [`LegatoError::FileNotFound`] is returned when `path` does not exist.
    pub fn from_file<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LegatoError::FileNotFound(path.to_path_buf()));
        }
        Self::from_reader(File::open(path)?)
    }

    /// Iterates over every configured token, named roles first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [
            &self.unk_token,
            &self.pad_token,
            &self.bos_token,
            &self.eos_token,
            &self.sep_token,
            &self.cls_token,
            &self.mask_token,
        ]
        .into_iter()
        .filter_map(|t| t.as_deref())
        .chain(self.additional_special_tokens.iter().map(String::as_str))
    }
}
