//! Locations inside a value, used to attribute encode/decode failures.
use std::fmt;

use serde::{Deserialize, Serialize};

/// One step of descent: an object key or an array/tuple position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self { Segment::Key(key.to_string()) }
}

impl From<String> for Segment {
    fn from(key: String) -> Self { Segment::Key(key) }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self { Segment::Index(index) }
}

/// Ordered segments from the root to a sub-value. Empty at the root.
///
/// Serializes as a plain JSON array, e.g. `["users", 1, "name"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<Segment>);

impl Path {
    pub fn root() -> Self { Self::default() }

    pub fn segments(&self) -> &[Segment] { &self.0 }

    pub fn is_root(&self) -> bool { self.0.is_empty() }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// A new path one segment deeper; `self` is left untouched.
    pub fn child(&self, segment: impl Into<Segment>) -> Self {
        let mut out = self.clone();
        out.0.push(segment.into());
        out
    }

    /// Run `f` one segment deeper. The segment is removed again once `f`
    /// returns, so siblings see the same prefix.
    pub(crate) fn descend<T>(
        &mut self,
        segment: impl Into<Segment>,
        f: impl FnOnce(&mut Path) -> T,
    ) -> T {
        self.0.push(segment.into());
        let out = f(self);
        self.0.pop();
        out
    }
}

impl<S: Into<Segment>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Path(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            match segment {
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mixes_keys_and_indices() {
        let path: Path = [Segment::from("users"), Segment::from(1usize), Segment::from("name")]
            .into_iter()
            .collect();
        assert_eq!(path.to_string(), "$.users[1].name");
        assert_eq!(Path::root().to_string(), "$");
    }

    #[test]
    fn descend_restores_prefix() {
        let mut path = Path::root().child("outer");
        let inner = path.descend(3usize, |p| p.clone());
        assert_eq!(inner.segments(), &[Segment::from("outer"), Segment::from(3usize)]);
        assert_eq!(path.segments(), &[Segment::from("outer")]);
    }

    #[test]
    fn serializes_as_flat_array() {
        let path = Path::root().child("data").child(0usize);
        assert_eq!(serde_json::to_value(&path).unwrap(), serde_json::json!(["data", 0]));
    }
}
