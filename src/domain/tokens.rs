//! Persisted representation of set-valued and list-valued columns.
//!
//! Sets are stored as a JSON array of tokens in a text column. Image lists are
//! stored as a JSON array of base64 strings so a journal entry stays one row.

use crate::errors::Result;
use base64::{Engine, engine::general_purpose::STANDARD};
use std::collections::BTreeSet;
use tracing::warn;

/// A vocabulary case that round-trips through a string token.
pub trait Token: Sized + Ord + Copy {
    /// Persisted token
    fn token(&self) -> &'static str;
    /// Parse a persisted token
    fn parse_token(token: &str) -> Result<Self>;
}

/// Encodes a set of vocabulary cases as a JSON array of tokens.
pub fn encode_set<T: Token>(values: &BTreeSet<T>) -> Result<String> {
    let tokens: Vec<&str> = values.iter().map(Token::token).collect();
    Ok(serde_json::to_string(&tokens)?)
}

/// Decodes a JSON array of tokens, dropping any token that is not a known case.
pub fn decode_set<T: Token>(raw: &str) -> Result<BTreeSet<T>> {
    let tokens: Vec<String> = serde_json::from_str(raw)?;
    Ok(tokens
        .iter()
        .filter_map(|token| match T::parse_token(token) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Dropping persisted tag: {e}");
                None
            }
        })
        .collect())
}

/// Encodes free-text tags (mood symptoms, medication names).
pub fn encode_strings(values: &BTreeSet<String>) -> Result<String> {
    Ok(serde_json::to_string(values)?)
}

/// Reads a JSON array of free-form strings.
pub fn decode_strings(raw: &str) -> Result<BTreeSet<String>> {
    Ok(serde_json::from_str(raw)?)
}

/// Decodes an optional single-valued token; unknown tokens decode as absent.
pub fn decode_optional<T: Token>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|token| match T::parse_token(token) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Treating persisted value as absent: {e}");
            None
        }
    })
}

/// Stores images as a JSON array of base64 strings.
pub fn encode_images(images: Option<&[Vec<u8>]>) -> Result<Option<String>> {
    images
        .map(|list| {
            let encoded: Vec<String> = list.iter().map(|bytes| STANDARD.encode(bytes)).collect();
            serde_json::to_string(&encoded)
        })
        .transpose()
        .map_err(Into::into)
}

/// Reads a stored image list. Absent stays absent.
///
/// The read is lossy: an entry that is not valid base64 is skipped with a
/// warning, so a damaged row comes back with fewer images rather than failing
/// the whole fetch. A column that is not a JSON array is a `Serialization`
/// error.
pub fn decode_images(raw: Option<&str>) -> Result<Option<Vec<Vec<u8>>>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let encoded: Vec<String> = serde_json::from_str(raw)?;
    let mut images = Vec::with_capacity(encoded.len());
    for item in encoded {
        match STANDARD.decode(item.as_bytes()) {
            Ok(bytes) => images.push(bytes),
            Err(e) => warn!("Skipping undecodable journal image: {e}"),
        }
    }
    Ok(Some(images))
}
