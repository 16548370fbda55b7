//! Change scope: which files and lines findings may be reported for.
//!
//! Findings are always computed; the scope only decides whether they surface.
//! Computing the change set (diffing against a base revision) happens outside
//! schemalint, which consumes either "everything changed" or a static list.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Answers change-membership questions for reporting
pub trait ChangeScope: Send + Sync {
    /// Whether the file has any change at all
    fn is_file_changed(&self, path: &Path) -> bool;

    /// Whether a finding on `line` of `path` may be reported
    fn should_report(&self, path: &Path, line: u32) -> bool;

    /// Whether the file was added by the change
    fn is_new_file(&self, path: &Path) -> bool;
}

/// Scope in which every file is new and every line reportable
#[derive(Debug, Clone, Copy, Default)]
pub struct AllChanged;

impl ChangeScope for AllChanged {
    fn is_file_changed(&self, _path: &Path) -> bool {
        true
    }

    fn should_report(&self, _path: &Path, _line: u32) -> bool {
        true
    }

    fn is_new_file(&self, _path: &Path) -> bool {
        true
    }
}

/// Inclusive range of changed lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    pub fn contains(&self, line: u32) -> bool {
        self.start <= line && line <= self.end
    }
}

/// Change entry for one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    /// File was added (every line is reportable)
    #[serde(default)]
    pub new: bool,
    /// Changed line ranges of a modified file
    #[serde(default)]
    pub lines: Vec<LineRange>,
}

/// Scope loaded from a change list (YAML or JSON).
///
/// ```yaml
/// internal/services/foo/foo_resource.go:
///   new: true
/// internal/services/bar/bar_resource.go:
///   lines: [{start: 10, end: 42}]
/// ```
///
/// Keys may be relative; a file matches a key when its path ends with it.
#[derive(Debug, Clone, Default)]
pub struct StaticChangeScope {
    files: HashMap<PathBuf, FileChange>,
}

impl StaticChangeScope {
    pub fn new(files: HashMap<PathBuf, FileChange>) -> Self {
        Self { files }
    }

    /// Parse a change list document
    pub fn parse(content: &str, origin: &Path) -> CoreResult<Self> {
        let files: HashMap<PathBuf, FileChange> =
            serde_yaml::from_str(content).map_err(|e| CoreError::ChangeListInvalid {
                path: origin.display().to_string(),
                message: e.to_string(),
            })?;
        for (path, change) in &files {
            if let Some(range) = change.lines.iter().find(|r| r.start > r.end) {
                return Err(CoreError::ChangeListInvalid {
                    path: origin.display().to_string(),
                    message: format!(
                        "{}: line range {}-{} is reversed",
                        path.display(),
                        range.start,
                        range.end
                    ),
                });
            }
        }
        Ok(Self { files })
    }

    /// Read a change list from disk
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CoreError::ChangeListInvalid {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Self::parse(&content, path)
    }

    fn lookup(&self, path: &Path) -> Option<&FileChange> {
        self.files.get(path).or_else(|| {
            self.files
                .iter()
                .find(|(key, _)| path.ends_with(key))
                .map(|(_, change)| change)
        })
    }
}

impl ChangeScope for StaticChangeScope {
    fn is_file_changed(&self, path: &Path) -> bool {
        self.lookup(path).is_some()
    }

    fn should_report(&self, path: &Path, line: u32) -> bool {
        match self.lookup(path) {
            Some(change) => change.new || change.lines.iter().any(|r| r.contains(line)),
            None => false,
        }
    }

    fn is_new_file(&self, path: &Path) -> bool {
        self.lookup(path).is_some_and(|change| change.new)
    }
}
