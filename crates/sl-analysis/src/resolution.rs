//! Tri-state outcome threaded through every resolver

/// Outcome of resolving something from source.
///
/// Keeps "looked and could not tell" (`Unresolvable`) apart from "nothing to
/// look at" (`NotApplicable`), so callers never have to guess what an empty
/// value meant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    /// Resolved to a value
    Resolved(T),
    /// The construct was recognized but could not be resolved
    Unresolvable,
    /// There was nothing to resolve
    NotApplicable,
}

impl<T> Resolution<T> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    /// Borrow the resolved value
    pub fn as_resolved(&self) -> Option<&T> {
        match self {
            Resolution::Resolved(value) => Some(value),
            _ => None,
        }
    }

    /// Take the resolved value
    pub fn resolved(self) -> Option<T> {
        match self {
            Resolution::Resolved(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolution<U> {
        match self {
            Resolution::Resolved(value) => Resolution::Resolved(f(value)),
            Resolution::Unresolvable => Resolution::Unresolvable,
            Resolution::NotApplicable => Resolution::NotApplicable,
        }
    }
}

impl<T> From<Option<T>> for Resolution<T> {
    /// `None` means the lookup happened and failed
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Resolution::Resolved(value),
            None => Resolution::Unresolvable,
        }
    }
}
