//! Compound-name contract and its two storage representations
//!
//! A name is an ordered sequence of string components, each stored in
//! masked form (delimiter occurrences escaped). [`ArrayName`] keeps the
//! components as a vector; [`StringName`] keeps them concatenated in one
//! delimited string with a derived boundary cache. Both satisfy the same
//! [`Name`] contract and compare equal component-for-component, regardless
//! of representation or delimiter choice.
//!
//! Every mutator returns a new value and leaves the receiver untouched.

pub mod array;
pub mod string;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::escape::{self, DEFAULT_DELIMITER, ESCAPE_CHARACTER};

pub use array::ArrayName;
pub use string::StringName;

/// Errors raised by name construction and mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    // =========================================================================
    // CALLER ERRORS - recoverable by correcting the input
    // =========================================================================
    /// A component index outside the declared bounds of the operation.
    #[error("component index {index} out of range for a name with {count} components")]
    IndexOutOfRange { index: usize, count: usize },

    /// The delimiter collides with the escape character or is not a
    /// single ASCII character.
    ///
    /// The one-`char` requirement is enforced by the type; the ASCII
    /// restriction keeps the boundary-offset arithmetic of the
    /// string-backed representation exact (one byte per delimiter).
    #[error("delimiter must be a single ASCII character other than the escape character")]
    InvalidDelimiter,

    /// A component carrying an unescaped occurrence of the name's delimiter.
    ///
    /// Components arrive pre-masked; an unescaped delimiter would silently
    /// change the component count, so it is rejected rather than trusted.
    #[error("component {component:?} contains an unescaped {delimiter:?} delimiter")]
    UnescapedDelimiter { component: String, delimiter: char },

    /// An escape character as the final character of the input, with
    /// nothing left to escape.
    #[error("dangling escape character at end of input")]
    TrailingEscape,

    /// `concat` across names with different delimiter characters.
    #[error("cannot concatenate names with delimiters {left:?} and {right:?}")]
    DelimiterMismatch { left: char, right: char },

    // =========================================================================
    // INTERNAL DEFECTS - invariant violations, not caller mistakes
    // =========================================================================
    /// The boundary cache disagrees with a re-scan of the backing string.
    #[error("boundary cache inconsistent with backing string: {0}")]
    CorruptBoundaryCache(String),

    /// A mutation produced a result inconsistent with its intent. The
    /// pre-mutation value is left untouched, so the failed operation is
    /// observably a no-op.
    #[error("{operation} postcondition failed: expected {expected} components, got {actual}")]
    PostconditionFailed {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Reject a delimiter that collides with the escape character or falls
/// outside ASCII.
pub(crate) fn check_delimiter(delimiter: char) -> Result<(), NameError> {
    if delimiter == ESCAPE_CHARACTER || !delimiter.is_ascii() {
        return Err(NameError::InvalidDelimiter);
    }
    Ok(())
}

/// Reject a component that is not properly masked for `delimiter`.
pub(crate) fn check_component(component: &str, delimiter: char) -> Result<(), NameError> {
    if escape::scan_boundaries(component, delimiter)?.is_empty() {
        Ok(())
    } else {
        Err(NameError::UnescapedDelimiter {
            component: component.to_owned(),
            delimiter,
        })
    }
}

/// Split a delimited string back into its masked components.
pub(crate) fn split_components(data: &str, delimiter: char) -> Result<Vec<String>, NameError> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    let boundaries = escape::scan_boundaries(data, delimiter)?;
    let mut components = Vec::with_capacity(boundaries.len() + 1);
    let mut start = 0usize;
    for b in boundaries {
        let b = b as usize;
        components.push(data[start..b].to_owned());
        start = b + 1;
    }
    components.push(data[start..].to_owned());
    Ok(components)
}

/// The shared compound-name contract.
///
/// Required methods expose the stored (masked) components; the rendered
/// string forms, equality, and hashing are provided once on top of them.
pub trait Name {
    /// The delimiter character separating components in textual form.
    fn delimiter(&self) -> char;

    /// Number of components, zero or more.
    fn component_count(&self) -> usize;

    /// Component `i` in masked form.
    fn component(&self, i: usize) -> Result<&str, NameError>;

    /// Whether the name has no components.
    fn is_empty(&self) -> bool {
        self.component_count() == 0
    }

    /// Human-readable form using the name's own delimiter.
    fn as_string(&self) -> String {
        self.as_string_with(self.delimiter())
    }

    /// Human-readable form: components unmasked, joined by `delimiter`.
    ///
    /// Not guaranteed to parse back: a component may itself contain the
    /// substitute delimiter literally.
    fn as_string_with(&self, delimiter: char) -> String {
        let mut parts = Vec::with_capacity(self.component_count());
        for i in 0..self.component_count() {
            if let Ok(component) = self.component(i) {
                parts.push(escape::unmask(component, self.delimiter()));
            }
        }
        parts.join(&delimiter.to_string())
    }

    /// Canonical machine-readable form: the masked components joined by
    /// [`DEFAULT_DELIMITER`], independent of the instance's own delimiter.
    ///
    /// Parsing this with the default delimiter reproduces an equal name of
    /// the same kind, provided the masked components carry no unescaped
    /// default-delimiter occurrence.
    fn as_data_string(&self) -> String {
        let mut parts = Vec::with_capacity(self.component_count());
        for i in 0..self.component_count() {
            if let Ok(component) = self.component(i) {
                parts.push(component);
            }
        }
        parts.join(&DEFAULT_DELIMITER.to_string())
    }

    /// Content equality: same component count and identical masked
    /// components, independent of which delimiter each name uses.
    fn is_equal(&self, other: &dyn Name) -> bool {
        if self.component_count() != other.component_count() {
            return false;
        }
        (0..self.component_count()).all(|i| match (self.component(i), other.component(i)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        })
    }

    /// Polynomial base-31 hash over [`Name::as_data_string`], accumulated
    /// with wraparound arithmetic in a 32-bit signed integer.
    ///
    /// Equal names (per [`Name::is_equal`]) hash equal.
    fn hash_code(&self) -> i32 {
        let mut hash: i32 = 0;
        for c in self.as_data_string().chars() {
            hash = hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(c as i32);
        }
        hash
    }
}

/// Wire form shared by both representations: the masked components joined
/// by the recorded delimiter, plus that delimiter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct NameRepr {
    pub data: String,
    pub delimiter: char,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_component() {
        assert!(check_component("oss", '.').is_ok());
        assert!(check_component("oss\\.cs", '.').is_ok());
        assert_eq!(
            check_component("oss.cs", '.').unwrap_err(),
            NameError::UnescapedDelimiter {
                component: "oss.cs".to_owned(),
                delimiter: '.',
            }
        );
        assert_eq!(
            check_component("oss\\", '.').unwrap_err(),
            NameError::TrailingEscape
        );
    }

    #[test]
    fn test_check_delimiter() {
        assert!(check_delimiter('.').is_ok());
        assert!(check_delimiter('#').is_ok());
        assert_eq!(check_delimiter('\\').unwrap_err(), NameError::InvalidDelimiter);
        assert_eq!(check_delimiter('λ').unwrap_err(), NameError::InvalidDelimiter);
    }

    #[test]
    fn test_split_components() {
        assert_eq!(split_components("", '.').unwrap(), Vec::<String>::new());
        assert_eq!(split_components("oss", '.').unwrap(), vec!["oss"]);
        assert_eq!(
            split_components("oss.cs.fau.de", '.').unwrap(),
            vec!["oss", "cs", "fau", "de"]
        );
        assert_eq!(
            split_components("oss\\.cs.fau", '.').unwrap(),
            vec!["oss\\.cs", "fau"]
        );
        assert_eq!(
            split_components("oss.cs#fau", '#').unwrap(),
            vec!["oss.cs", "fau"]
        );
    }
}
