//! Reversible mapping between sequential record identifiers and short tokens.
//!
//! An identifier first has its bits shuffled by a [`PermutationTable`], then
//! the shuffled integer is written in the radix of an [`Alphabet`]. Decoding
//! runs the same two steps backwards. The shuffle hides the sequential nature
//! of identifiers; it is obfuscation, not encryption.

use thiserror::Error;

mod alphabet;
mod permutation;

pub use alphabet::{Alphabet, DEFAULT_ALPHABET};
pub use permutation::{PermutationTable, DEFAULT_BIT_WIDTH, MAX_BIT_WIDTH};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The token contains characters outside the alphabet or is not canonical
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The identifier, or the value a token decodes to, does not fit in `N` bits
    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Invalid permutation table: {0}")]
    InvalidTable(String),

    #[error("Invalid alphabet: {0}")]
    InvalidAlphabet(String),
}

/// Immutable identifier/token codec.
///
/// Built once at startup and shared; every method is a pure function of the
/// table, the alphabet and its argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codec {
    table: PermutationTable,
    alphabet: Alphabet,
}

impl Codec {
    pub fn new(table: PermutationTable, alphabet: Alphabet) -> Self {
        Self { table, alphabet }
    }

    pub fn table(&self) -> &PermutationTable {
        &self.table
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Number of bits in the identifier domain, `N`
    pub fn bit_width(&self) -> usize {
        self.table.width()
    }

    /// Largest encodable identifier, `2^N - 1`
    pub fn max_identifier(&self) -> u64 {
        (1u64 << self.bit_width()) - 1
    }

    /// Encodes an identifier in `0..2^N` as a token
    pub fn token_from_identifier(&self, id: u64) -> Result<String, CodecError> {
        self.check_range(id)?;
        Ok(self.alphabet.enbase(self.table.encode(id)))
    }

    /// Decodes a token produced by [`Codec::token_from_identifier`].
    ///
    /// Only the canonical spelling is accepted: a token of two or more
    /// characters starting with the zero digit (`"ab"` under the default
    /// alphabet) is `InvalidToken`, as is the empty token.
    pub fn identifier_from_token(&self, token: &str) -> Result<u64, CodecError> {
        let permuted = self.alphabet.debase(token)?;
        self.check_range(permuted)?;
        Ok(self.table.decode(permuted))
    }

    fn check_range(&self, value: u64) -> Result<(), CodecError> {
        if value > self.max_identifier() {
            return Err(CodecError::OutOfRange(format!(
                "{} does not fit in {} bits",
                value,
                self.bit_width()
            )));
        }
        Ok(())
    }
}

impl Default for Codec {
    /// Reversed 30-bit table with the default alphabet
    fn default() -> Self {
        let table =
            PermutationTable::reversed(DEFAULT_BIT_WIDTH).expect("default bit width is valid");
        Self::new(table, Alphabet::default())
    }
}
