//! Type and syntax facts for one module.
//!
//! The analysis engine never parses or type-checks source itself. It asks a
//! [`FactsProvider`] for the module's syntax tree and, where available, for the
//! static type of an expression or the declaration a call resolves to. The
//! bundled implementation, [`ModuleFacts`], answers from a JSON export.

use crate::error::{CoreError, CoreResult};
use crate::syntax::{Module, Pos, TypeDecl, TypeExpr};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Declaration a call expression resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callee {
    /// Import path of the module declaring the function
    pub module: String,
    /// Function (or method) name
    pub name: String,
    /// Set when the callee is a method rather than a package-level function
    #[serde(default)]
    pub method: bool,
}

/// Read-only facts about one parsed module
pub trait FactsProvider: Send + Sync {
    /// The module's syntax
    fn module(&self) -> &Module;

    /// Static type of the expression at `pos` in `file`, when known.
    ///
    /// Named types carry the full import path in `package`.
    fn type_of(&self, file: &Path, pos: Pos) -> Option<&TypeExpr>;

    /// Declaration the call expression at `pos` in `file` resolves to, when known
    fn callee_of(&self, file: &Path, pos: Pos) -> Option<&Callee>;

    /// Declaration of type `name` from the imported module at `module`, when
    /// the export carries it
    fn imported_type(&self, module: &str, name: &str) -> Option<&TypeDecl>;
}

/// One type fact in a facts export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeFact {
    pub file: PathBuf,
    pub pos: Pos,
    pub ty: TypeExpr,
}

/// One call-resolution fact in a facts export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalleeFact {
    pub file: PathBuf,
    pub pos: Pos,
    pub callee: Callee,
}

/// A type declared in another module and referenced by the exported one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportedType {
    /// Import path of the declaring module
    pub module: String,
    pub decl: TypeDecl,
}

/// On-disk shape of a facts export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactsExport {
    pub module: Module,
    #[serde(default)]
    pub types: Vec<TypeFact>,
    #[serde(default)]
    pub callees: Vec<CalleeFact>,
    #[serde(default)]
    pub imported_types: Vec<ImportedType>,
}

/// Facts provider backed by an exported module description
#[derive(Debug, Clone)]
pub struct ModuleFacts {
    module: Module,
    types: HashMap<(PathBuf, Pos), TypeExpr>,
    callees: HashMap<(PathBuf, Pos), Callee>,
    imported_types: HashMap<(String, String), TypeDecl>,
}

impl ModuleFacts {
    /// Facts for a module with syntax only; every type query falls back to names
    pub fn syntax_only(module: Module) -> Self {
        Self {
            module,
            types: HashMap::new(),
            callees: HashMap::new(),
            imported_types: HashMap::new(),
        }
    }

    /// Index an export for lookup
    pub fn from_export(export: FactsExport) -> Self {
        let types = export
            .types
            .into_iter()
            .map(|fact| ((fact.file, fact.pos), fact.ty))
            .collect();
        let callees = export
            .callees
            .into_iter()
            .map(|fact| ((fact.file, fact.pos), fact.callee))
            .collect();
        let imported_types = export
            .imported_types
            .into_iter()
            .map(|imported| ((imported.module, imported.decl.name.clone()), imported.decl))
            .collect();
        Self {
            module: export.module,
            types,
            callees,
            imported_types,
        }
    }

    /// Parse a JSON facts export
    pub fn from_json(json: &str, origin: &Path) -> CoreResult<Self> {
        let export: FactsExport =
            serde_json::from_str(json).map_err(|e| CoreError::FactsParse {
                path: origin.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(Self::from_export(export))
    }

    /// Read and parse a JSON facts export from disk
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::FactsRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content, path)
    }

    /// Record the static type of an expression
    pub fn insert_type(&mut self, file: impl Into<PathBuf>, pos: Pos, ty: TypeExpr) {
        self.types.insert((file.into(), pos), ty);
    }

    /// Record what a call expression resolves to
    pub fn insert_callee(&mut self, file: impl Into<PathBuf>, pos: Pos, callee: Callee) {
        self.callees.insert((file.into(), pos), callee);
    }

    /// Record a type declared in an imported module
    pub fn insert_imported_type(&mut self, module: impl Into<String>, decl: TypeDecl) {
        self.imported_types
            .insert((module.into(), decl.name.clone()), decl);
    }

    pub fn into_module(self) -> Module {
        self.module
    }
}

impl FactsProvider for ModuleFacts {
    fn module(&self) -> &Module {
        &self.module
    }

    fn type_of(&self, file: &Path, pos: Pos) -> Option<&TypeExpr> {
        if self.types.is_empty() {
            return None;
        }
        self.types.get(&(file.to_path_buf(), pos))
    }

    fn callee_of(&self, file: &Path, pos: Pos) -> Option<&Callee> {
        if self.callees.is_empty() {
            return None;
        }
        self.callees.get(&(file.to_path_buf(), pos))
    }

    fn imported_type(&self, module: &str, name: &str) -> Option<&TypeDecl> {
        self.imported_types
            .get(&(module.to_string(), name.to_string()))
    }
}
