//! Single-string representation with a derived boundary cache

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::escape::{self, DEFAULT_DELIMITER};
use crate::name::{Name, NameError, NameRepr, check_component, check_delimiter};

/// A compound name backed by one delimited string.
///
/// All components live concatenated in `name`, separated by unescaped
/// delimiter occurrences. `indices` caches where each boundary sits,
/// giving O(1) component lookup:
///
/// - `indices.len()` equals the component count;
/// - `indices[0]` is the `-1` sentinel preceding the first component;
/// - `indices[k]` for `k > 0` is the byte offset of the k-th unescaped
///   delimiter in `name`.
///
/// Component `i` therefore spans `indices[i] + 1` up to `indices[i + 1]`
/// (or the end of the string). Every mutator rebuilds `name` and `indices`
/// together on a fresh value and re-checks the component count before
/// publishing it; neither field is reachable on its own.
///
/// The empty string denotes the empty name. A single empty component
/// (reachable through `append("")`) renders identically; the cache, not
/// the rendered string, is authoritative for the count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "NameRepr", into = "NameRepr")]
pub struct StringName {
    name: String,
    indices: Vec<isize>,
    delimiter: char,
}

impl StringName {
    /// Parse a delimited string using the default delimiter.
    pub fn new(name: impl Into<String>) -> Result<Self, NameError> {
        Self::with_delimiter(name, DEFAULT_DELIMITER)
    }

    /// Parse a delimited string with an explicit delimiter.
    ///
    /// The input is scanned once; a dangling escape character at the end
    /// is rejected.
    pub fn with_delimiter(name: impl Into<String>, delimiter: char) -> Result<Self, NameError> {
        check_delimiter(delimiter)?;
        let name = name.into();
        let boundaries = escape::scan_boundaries(&name, delimiter)?;
        let indices = if name.is_empty() {
            Vec::new()
        } else {
            std::iter::once(-1).chain(boundaries).collect()
        };
        Ok(Self {
            name,
            indices,
            delimiter,
        })
    }

    /// The empty name for the given delimiter.
    pub fn empty(delimiter: char) -> Result<Self, NameError> {
        Self::with_delimiter(String::new(), delimiter)
    }

    /// Replace component `i`, returning the updated name.
    pub fn with_component(&self, i: usize, c: &str) -> Result<Self, NameError> {
        self.check_index(i)?;
        check_component(c, self.delimiter)?;
        trace!(i, component = c, "set component");

        let (start, end) = self.component_span(i);
        let delta = c.len() as isize - (end - start) as isize;

        let mut next = self.clone();
        next.name.replace_range(start..end, c);
        for offset in next.indices.iter_mut().skip(i + 1) {
            *offset += delta;
        }
        next.verify("set", self.component_count())?;
        Ok(next)
    }

    /// Insert a component before position `i` (`i == len` appends),
    /// returning the grown name.
    pub fn insert(&self, i: usize, c: &str) -> Result<Self, NameError> {
        let count = self.component_count();
        if i == count {
            return self.append(c);
        }
        if i > count {
            return Err(NameError::IndexOutOfRange { index: i, count });
        }
        check_component(c, self.delimiter)?;
        trace!(i, component = c, "insert component");

        // Splice "<c><delimiter>" in right after boundary i. The entry at
        // position i keeps its value (the preceding boundary is unmoved);
        // every later boundary shifts right by the spliced length.
        let pos = (self.indices[i] + 1) as usize;
        let shift = (c.len() + 1) as isize;

        let mut next = self.clone();
        let mut spliced = String::with_capacity(next.name.len() + c.len() + 1);
        spliced.push_str(&next.name[..pos]);
        spliced.push_str(c);
        spliced.push(next.delimiter);
        spliced.push_str(&next.name[pos..]);
        next.name = spliced;

        let placeholder = next.indices[i];
        next.indices.insert(i, placeholder);
        for offset in next.indices.iter_mut().skip(i + 1) {
            *offset += shift;
        }
        next.verify("insert", count + 1)?;
        Ok(next)
    }

    /// Append a component, returning the grown name.
    pub fn append(&self, c: &str) -> Result<Self, NameError> {
        check_component(c, self.delimiter)?;
        trace!(component = c, "append component");

        let mut next = self.clone();
        if next.indices.is_empty() {
            next.name = c.to_owned();
            next.indices.push(-1);
        } else {
            next.indices.push(next.name.len() as isize);
            next.name.push(next.delimiter);
            next.name.push_str(c);
        }
        next.verify("append", self.component_count() + 1)?;
        Ok(next)
    }

    /// Remove component `i`, returning the shrunk name.
    ///
    /// The removed span covers the component and its adjacent delimiter:
    /// the trailing one for interior components, the leading one for the
    /// final component.
    pub fn remove(&self, i: usize) -> Result<Self, NameError> {
        self.check_index(i)?;
        let count = self.component_count();
        trace!(i, "remove component");

        let mut next = self.clone();
        if count == 1 {
            next.name.clear();
            next.indices.clear();
        } else if i == count - 1 {
            let cut = next.indices[i] as usize;
            next.name.truncate(cut);
            next.indices.pop();
        } else {
            let start = (next.indices[i] + 1) as usize;
            let end = next.indices[i + 1] as usize;
            let removed = (end + 1 - start) as isize;
            next.name.replace_range(start..end + 1, "");
            next.indices.remove(i);
            for offset in next.indices.iter_mut().skip(i) {
                *offset -= removed;
            }
        }
        next.verify("remove", count - 1)?;
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
            next = next.append(other.component(i)?)?;
        }
        Ok(next)
    }

    fn check_index(&self, i: usize) -> Result<(), NameError> {
        if i >= self.component_count() {
            return Err(NameError::IndexOutOfRange {
                index: i,
                count: self.component_count(),
            });
        }
        Ok(())
    }

    /// Byte span of component `i` in the backing string. Caller has
    /// checked the index.
    fn component_span(&self, i: usize) -> (usize, usize) {
        let start = (self.indices[i] + 1) as usize;
        let end = if i + 1 == self.indices.len() {
            self.name.len()
        } else {
            self.indices[i + 1] as usize
        };
        (start, end)
    }

    /// Postcondition gate run by every mutator before the new value is
    /// published. A failure leaves the receiver untouched, so the failed
    /// mutation is observably a no-op.
    fn verify(&self, operation: &'static str, expected: usize) -> Result<(), NameError> {
        let actual = self.indices.len();
        if actual != expected {
            return Err(NameError::PostconditionFailed {
                operation,
                expected,
                actual,
            });
        }
        #[cfg(debug_assertions)]
        self.verify_boundaries()?;
        Ok(())
    }

    /// Cross-check the cache against an independent re-scan of the
    /// backing string. Debug builds only.
    #[cfg(debug_assertions)]
    fn verify_boundaries(&self) -> Result<(), NameError> {
        // "" holding a single empty component re-scans to zero boundaries;
        // the cache is authoritative there.
        if self.name.is_empty() && self.indices.len() <= 1 {
            return Ok(());
        }
        let rescan = escape::scan_boundaries(&self.name, self.delimiter).map_err(|_| {
            NameError::CorruptBoundaryCache("dangling escape in backing string".to_owned())
        })?;
        let expected: Vec<isize> = std::iter::once(-1).chain(rescan).collect();
        if self.indices != expected {
            return Err(NameError::CorruptBoundaryCache(format!(
                "cache {:?} disagrees with re-scan {:?} of {:?}",
                self.indices, expected, self.name
            )));
        }
        Ok(())
    }
}

impl Name for StringName {
    fn delimiter(&self) -> char {
        self.delimiter
    }

    fn component_count(&self) -> usize {
        self.indices.len()
    }

    fn component(&self, i: usize) -> Result<&str, NameError> {
        self.check_index(i)?;
        let (start, end) = self.component_span(i);
        Ok(&self.name[start..end])
    }
}

/// Content equality, independent of the delimiter choice.
impl PartialEq for StringName {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

impl Eq for StringName {}

impl fmt::Display for StringName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_data_string())
    }
}

impl From<StringName> for NameRepr {
    fn from(name: StringName) -> Self {
        NameRepr {
            data: name.name,
            delimiter: name.delimiter,
        }
    }
}

impl TryFrom<NameRepr> for StringName {
    type Error = NameError;

    fn try_from(repr: NameRepr) -> Result<Self, Self::Error> {
        Self::with_delimiter(repr.data, repr.delimiter)
    }
}
