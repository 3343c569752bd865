//! Row tokenization.
//!
//! A row containing a comma is a list of comma-separated tokens
//! (`"WallSteel,.,Door:E"`); any other row is one token per character
//! (`"#..@"`). A token may carry a rotation suffix after a colon.

use crate::symbol::Rotation;

/// Separator between tokens in comma-form rows.
pub const TOKEN_SEPARATOR: char = ',';

/// Separator between a symbol and its rotation suffix.
pub const ROTATION_SEPARATOR: char = ':';

/// A parsed layout token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Token text as written, suffix included.
    pub raw: &'a str,
    /// Symbol name used for resolution.
    pub symbol: &'a str,
    /// Rotation override from the extended form.
    pub rotation: Option<Rotation>,
}

/// Why a token could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Nothing between two separators.
    Empty,
    /// Extended form with no symbol before the colon.
    MissingSymbol,
    /// Suffix is not a rotation.
    BadRotation(String),
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty token"),
            Self::MissingSymbol => write!(f, "rotation suffix without a symbol"),
            Self::BadRotation(suffix) => write!(f, "invalid rotation suffix '{suffix}'"),
        }
    }
}

impl<'a> Token<'a> {
    /// Parse one raw token.
    pub fn parse(raw: &'a str) -> Result<Self, TokenError> {
        if raw.is_empty() {
            return Err(TokenError::Empty);
        }
        // A lone ':' is an ordinary symbol.
        if raw.len() > 1 {
            if let Some((symbol, suffix)) = raw.rsplit_once(ROTATION_SEPARATOR) {
                if symbol.is_empty() {
                    return Err(TokenError::MissingSymbol);
                }
                let rotation = Rotation::from_suffix(suffix)
                    .ok_or_else(|| TokenError::BadRotation(suffix.to_string()))?;
                return Ok(Self {
                    raw,
                    symbol,
                    rotation: Some(rotation),
                });
            }
        }
        Ok(Self {
            raw,
            symbol: raw,
            rotation: None,
        })
    }
}

/// Split a row into raw tokens.
#[must_use]
pub fn split_row(row: &str) -> Vec<&str> {
    if row.contains(TOKEN_SEPARATOR) {
        row.split(TOKEN_SEPARATOR).map(str::trim).collect()
    } else {
        row.char_indices()
            .map(|(i, c)| &row[i..i + c.len_utf8()])
            .collect()
    }
}
