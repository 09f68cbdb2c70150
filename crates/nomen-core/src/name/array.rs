//! Component-vector representation of a compound name

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::escape::DEFAULT_DELIMITER;
use crate::name::{
    Name, NameError, NameRepr, check_component, check_delimiter, split_components,
};

/// A compound name backed by an ordered vector of masked components.
///
/// All mutators splice the vector and return a new value; the receiver is
/// never changed. The empty component list is legal and denotes the empty
/// name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "NameRepr", into = "NameRepr")]
pub struct ArrayName {
    components: Vec<String>,
    delimiter: char,
}

impl ArrayName {
    /// Build a name from masked components, using the default delimiter.
    pub fn new<I, S>(components: I) -> Result<Self, NameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_delimiter(components, DEFAULT_DELIMITER)
    }

    /// Build a name from masked components and an explicit delimiter.
    ///
    /// Every component is validated against unescaped delimiter
    /// occurrences.
    pub fn with_delimiter<I, S>(components: I, delimiter: char) -> Result<Self, NameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        check_delimiter(delimiter)?;
        let components: Vec<String> = components.into_iter().map(Into::into).collect();
        for component in &components {
            check_component(component, delimiter)?;
        }
        Ok(Self {
            components,
            delimiter,
        })
    }

    /// The empty name for the given delimiter.
    pub fn empty(delimiter: char) -> Result<Self, NameError> {
        Self::with_delimiter(Vec::<String>::new(), delimiter)
    }

    /// Replace component `i`, returning the updated name.
    pub fn with_component(&self, i: usize, c: &str) -> Result<Self, NameError> {
        self.check_index(i)?;
        check_component(c, self.delimiter)?;
        let mut next = self.clone();
        next.components[i] = c.to_owned();
        Ok(next)
    }

    /// Insert a component before position `i` (`i == len` appends),
    /// returning the grown name.
    pub fn insert(&self, i: usize, c: &str) -> Result<Self, NameError> {
        if i > self.components.len() {
            return Err(NameError::IndexOutOfRange {
                index: i,
                count: self.components.len(),
            });
        }
        check_component(c, self.delimiter)?;
        let mut next = self.clone();
        next.components.insert(i, c.to_owned());
        Ok(next)
    }

    /// Append a component, returning the grown name.
    pub fn append(&self, c: &str) -> Result<Self, NameError> {
        self.insert(self.components.len(), c)
    }

    /// Remove component `i`, returning the shrunk name.
    pub fn remove(&self, i: usize) -> Result<Self, NameError> {
        self.check_index(i)?;
        let mut next = self.clone();
        next.components.remove(i);
        Ok(next)
    }

    /// Append every component of `other` after this name's own.
    ///
    /// Fails unless both names use the same delimiter character.
    pub fn concat(&self, other: &dyn Name) -> Result<Self, NameError> {
        if other.delimiter() != self.delimiter {
            return Err(NameError::DelimiterMismatch {
                left: self.delimiter,
                right: other.delimiter(),
            });
        }
        let mut next = self.clone();
        for i in 0..other.component_count() {
            next.components.push(other.component(i)?.to_owned());
        }
        Ok(next)
    }

    fn check_index(&self, i: usize) -> Result<(), NameError> {
        if i >= self.components.len() {
            return Err(NameError::IndexOutOfRange {
                index: i,
                count: self.components.len(),
            });
        }
        Ok(())
    }
}

impl Name for ArrayName {
    fn delimiter(&self) -> char {
        self.delimiter
    }

    fn component_count(&self) -> usize {
        self.components.len()
    }

    fn component(&self, i: usize) -> Result<&str, NameError> {
        self.check_index(i)?;
        Ok(&self.components[i])
    }
}

/// Content equality, independent of the delimiter choice.
impl PartialEq for ArrayName {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for ArrayName {}

impl fmt::Display for ArrayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_data_string())
    }
}

impl From<ArrayName> for NameRepr {
    fn from(name: ArrayName) -> Self {
        NameRepr {
            data: name.components.join(&name.delimiter.to_string()),
            delimiter: name.delimiter,
        }
    }
}

impl TryFrom<NameRepr> for ArrayName {
    type Error = NameError;

    fn try_from(repr: NameRepr) -> Result<Self, Self::Error> {
        Self::with_delimiter(split_components(&repr.data, repr.delimiter)?, repr.delimiter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_validates_components() {
        let err = ArrayName::new(["oss", "cs.fau"]).unwrap_err();
        assert!(matches!(err, NameError::UnescapedDelimiter { .. }));

        let name = ArrayName::new(["oss", "cs\\.fau"]).unwrap();
        assert_eq!(name.component_count(), 2);
    }

    #[test]
    fn test_empty_name_is_legal() {
        let name = ArrayName::empty('.').unwrap();
        assert!(name.is_empty());
        assert_eq!(name.component_count(), 0);
        assert_eq!(name.as_data_string(), "");
    }

    #[test]
    fn test_mutators_leave_receiver_untouched() {
        let name = ArrayName::new(["oss", "fau", "de"]).unwrap();
        let grown = name.insert(1, "cs").unwrap();
        assert_eq!(name.component_count(), 3);
        assert_eq!(grown.component_count(), 4);
        assert_eq!(grown.as_string(), "oss.cs.fau.de");
    }

    #[test]
    fn test_insert_allows_end_position() {
        let name = ArrayName::new(["a"]).unwrap();
        let grown = name.insert(1, "b").unwrap();
        assert_eq!(grown.as_string(), "a.b");
        assert!(matches!(
            name.insert(2, "c").unwrap_err(),
            NameError::IndexOutOfRange { index: 2, count: 1 }
        ));
    }

    #[test]
    fn test_serde_round_trip() {
        let name = ArrayName::with_delimiter(["oss", "cs"], '#').unwrap();
        let json = serde_json::to_string(&name).unwrap();
        let back: ArrayName = serde_json::from_str(&json).unwrap();
        assert!(name.is_equal(&back));
        assert_eq!(back.delimiter(), '#');
    }
}
