use std::fmt::Display;

use itertools::Itertools;
use thiserror::Error;

/// A store key.
///
/// A key is either an atomic identifier or an ordered tuple of keys (a hierarchical key).
/// Hierarchical keys let stores group related entries under a shared prefix.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum StoreKey {
    /// An atomic key.
    Atomic(String),
    /// A hierarchical key made of ordered components.
    Composite(Vec<StoreKey>),
}

/// A list of [`StoreKey`].
pub type StoreKeys = Vec<StoreKey>;

/// An invalid store key.
#[derive(Clone, Debug, Error)]
pub enum StoreKeyError {
    /// A composite key must have at least one component.
    #[error("a composite store key must have at least one component")]
    EmptyComposite,
}

impl StoreKey {
    /// Create an atomic key.
    pub fn new(key: impl Into<String>) -> Self {
        Self::Atomic(key.into())
    }

    /// Create a hierarchical key from its components.
    ///
    /// # Errors
    /// Returns [`StoreKeyError::EmptyComposite`] if `components` is empty.
    pub fn new_composite(
        components: impl IntoIterator<Item = StoreKey>,
    ) -> Result<Self, StoreKeyError> {
        let components: Vec<_> = components.into_iter().collect();
        if components.is_empty() {
            Err(StoreKeyError::EmptyComposite)
        } else {
            Ok(Self::Composite(components))
        }
    }

    /// Create an atomic key from the canonical string representation of `value`.
    pub fn from_display(value: &impl Display) -> Self {
        Self::Atomic(value.to_string())
    }

    /// Returns true if the key is atomic.
    #[must_use]
    pub const fn is_atomic(&self) -> bool {
        matches!(self, Self::Atomic(_))
    }

    /// Extend the key with `suffix`.
    ///
    /// An atomic key has `suffix` appended.
    /// A hierarchical key keeps every component except the last, which is extended recursively.
    ///
    /// ```
    /// # use parrs_storage::StoreKey;
    /// assert_eq!(StoreKey::from("x").extend(".dtype"), StoreKey::from("x.dtype"));
    /// assert_eq!(
    ///     StoreKey::from(("a", "b", "c")).extend(".dtype"),
    ///     StoreKey::from(("a", "b", "c.dtype"))
    /// );
    /// ```
    #[must_use]
    pub fn extend(&self, suffix: &str) -> Self {
        match self {
            Self::Atomic(key) => Self::Atomic(format!("{key}{suffix}")),
            Self::Composite(components) => {
                let mut components = components.clone();
                match components.pop() {
                    Some(last) => components.push(last.extend(suffix)),
                    None => components.push(Self::Atomic(suffix.to_string())),
                }
                Self::Composite(components)
            }
        }
    }

    /// Return the atomic components of the key in order, flattening nested hierarchical keys.
    #[must_use]
    pub fn components(&self) -> Vec<&str> {
        match self {
            Self::Atomic(key) => vec![key.as_str()],
            Self::Composite(components) => components
                .iter()
                .flat_map(StoreKey::components)
                .collect(),
        }
    }
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Atomic(key) => write!(f, "{key}"),
            Self::Composite(components) => {
                let inner = components
                    .iter()
                    .map(|component| match component {
                        Self::Atomic(key) => format!("'{key}'"),
                        Self::Composite(_) => component.to_string(),
                    })
                    .join(", ");
                if components.len() == 1 {
                    write!(f, "({inner},)")
                } else {
                    write!(f, "({inner})")
                }
            }
        }
    }
}

impl From<&str> for StoreKey {
    fn from(key: &str) -> Self {
        Self::Atomic(key.to_string())
    }
}

impl From<String> for StoreKey {
    fn from(key: String) -> Self {
        Self::Atomic(key)
    }
}

impl From<&StoreKey> for StoreKey {
    fn from(key: &StoreKey) -> Self {
        key.clone()
    }
}

macro_rules! impl_from_display {
    ($($t:ty),*) => {
        $(
            impl From<$t> for StoreKey {
                fn from(key: $t) -> Self {
                    Self::from_display(&key)
                }
            }
        )*
    };
}

impl_from_display!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, char);

impl<A: Into<StoreKey>, B: Into<StoreKey>> From<(A, B)> for StoreKey {
    fn from((a, b): (A, B)) -> Self {
        Self::Composite(vec![a.into(), b.into()])
    }
}

impl<A: Into<StoreKey>, B: Into<StoreKey>, C: Into<StoreKey>> From<(A, B, C)> for StoreKey {
    fn from((a, b, c): (A, B, C)) -> Self {
        Self::Composite(vec![a.into(), b.into(), c.into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_atomic() {
        assert_eq!(StoreKey::from("x").extend(".dtype"), StoreKey::from("x.dtype"));
        assert_eq!(StoreKey::from("").extend(".dtype"), StoreKey::from(".dtype"));
    }

    #[test]
    fn extend_composite() {
        let key = StoreKey::from(("a", "b", "c"));
        assert_eq!(key.extend(".dtype"), StoreKey::from(("a", "b", "c.dtype")));
        assert_eq!(key, StoreKey::from(("a", "b", "c")));
    }

    #[test]
    fn extend_nested_composite() {
        let key = StoreKey::from(("a", ("b", "c")));
        assert_eq!(key.extend(".dtype"), StoreKey::from(("a", ("b", "c.dtype"))));
    }

    #[test]
    fn extend_non_string() {
        assert_eq!(StoreKey::from(5u32).extend(".dtype"), StoreKey::from("5.dtype"));
        assert_eq!(
            StoreKey::from(("x", -3i64)).extend(".dtype"),
            StoreKey::from(("x", "-3.dtype"))
        );
    }

    #[test]
    fn extend_empty_composite() {
        assert_eq!(
            StoreKey::Composite(vec![]).extend(".dtype"),
            StoreKey::Composite(vec![StoreKey::from(".dtype")])
        );
    }

    #[test]
    fn new_composite() {
        assert!(StoreKey::new_composite([]).is_err());
        let key = StoreKey::new_composite([StoreKey::new("a"), StoreKey::new("b")]).unwrap();
        assert_eq!(key, StoreKey::from(("a", "b")));
        assert!(!key.is_atomic());
    }

    #[test]
    fn display() {
        assert_eq!(StoreKey::from("x").to_string(), "x");
        assert_eq!(StoreKey::from(("a", "b")).to_string(), "('a', 'b')");
        assert_eq!(
            StoreKey::from(("a", ("b", "c"))).to_string(),
            "('a', ('b', 'c'))"
        );
        assert_eq!(
            StoreKey::new_composite([StoreKey::new("a")]).unwrap().to_string(),
            "('a',)"
        );
    }

    #[test]
    fn components() {
        assert_eq!(
            StoreKey::from(("a", ("b", "c"))).components(),
            vec!["a", "b", "c"]
        );
    }
}
