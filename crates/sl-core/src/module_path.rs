//! Strongly-typed module import path wrapper.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Import path of a module (e.g. `github.com/org/helpers/commonschema`).
///
/// Shared schema cache keys are built from this path, so it must never be
/// mixed up with a directory path or a package name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModulePath(String);

impl ModulePath {
    /// Create a new `ModulePath`, panicking in debug builds if the path is empty.
    ///
    /// Prefer [`try_new`](Self::try_new) when handling untrusted input.
    pub fn new(path: impl Into<String>) -> Self {
        let s = path.into();
        debug_assert!(!s.is_empty(), "ModulePath must not be empty");
        Self(s)
    }

    /// Try to create a new `ModulePath`, returning `None` if the path is empty.
    pub fn try_new(path: impl Into<String>) -> Option<Self> {
        let s = path.into();
        if s.is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    /// Return the underlying path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Qualified name of a function declared in this module (`path.Func`).
    pub fn qualify(&self, func: &str) -> String {
        format!("{}.{}", self.0, func)
    }
}

impl TryFrom<String> for ModulePath {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_new(s).ok_or("ModulePath must not be empty")
    }
}

impl From<ModulePath> for String {
    fn from(path: ModulePath) -> Self {
        path.0
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModulePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ModulePath {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ModulePath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ModulePath {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ModulePath {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
