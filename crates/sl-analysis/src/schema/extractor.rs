//! Locates schema map literals in a source file

use sl_core::facts::FactsProvider;
use sl_core::syntax::{
    walk_element, walk_expr, walk_file, Element, Expr, Pos, SourceFile, TypeExpr, Visitor,
};

/// One entry of a schema map before its descriptor is resolved
#[derive(Debug)]
pub(crate) struct RawEntry<'a> {
    /// Key text; for non-constant keys, the identifier or selector written
    pub name: String,
    /// The key is a string constant
    pub constant_key: bool,
    pub value: &'a Expr,
    pub position: Pos,
}

/// A schema map literal found in a file, entries in declaration order
#[derive(Debug)]
pub(crate) struct RawSchemaMap<'a> {
    pub pos: Pos,
    /// Found inside the value of an `Elem` key
    pub nested: bool,
    pub entries: Vec<RawEntry<'a>>,
}

/// Find every schema map literal in `file`, outermost first
pub(crate) fn extract_schema_maps<'a>(
    file: &'a SourceFile,
    facts: &dyn FactsProvider,
    schema_modules: &[String],
) -> Vec<RawSchemaMap<'a>> {
    let mut finder = SchemaMapFinder {
        file,
        facts,
        schema_modules,
        elem_depth: 0,
        maps: Vec::new(),
    };
    walk_file(&mut finder, file);
    finder.maps
}

struct SchemaMapFinder<'a, 'f> {
    file: &'a SourceFile,
    facts: &'f dyn FactsProvider,
    schema_modules: &'f [String],
    elem_depth: usize,
    maps: Vec<RawSchemaMap<'a>>,
}

impl<'a> Visitor<'a> for SchemaMapFinder<'a, '_> {
    fn visit_expr(&mut self, expr: &'a Expr) {
        if let Expr::Composite { ty, elts, pos } = expr {
            if self.is_schema_map(ty.as_ref(), *pos) {
                self.maps.push(RawSchemaMap {
                    pos: *pos,
                    nested: self.elem_depth > 0,
                    entries: elts.iter().filter_map(raw_entry).collect(),
                });
            }
        }
        walk_expr(self, expr);
    }

    fn visit_element(&mut self, element: &'a Element) {
        if element.key_ident() == Some("Elem") {
            self.elem_depth += 1;
            walk_element(self, element);
            self.elem_depth -= 1;
        } else {
            walk_element(self, element);
        }
    }
}

impl SchemaMapFinder<'_, '_> {
    /// Type identity when the facts provider knows the literal's type,
    /// otherwise the written type's shape and names
    fn is_schema_map(&self, written: Option<&TypeExpr>, pos: Pos) -> bool {
        if let Some(ty) = self.facts.type_of(&self.file.path, pos) {
            return is_schema_map_type(ty, Some(self.schema_modules));
        }
        written.is_some_and(|ty| is_schema_map_type(ty, None))
    }
}

/// `map[string]*<pkg>.Schema`.
///
/// With `modules`, the package must be one of them (a resolved type carries
/// the full import path); without, any qualified `Schema` matches.
pub(crate) fn is_schema_map_type(ty: &TypeExpr, modules: Option<&[String]>) -> bool {
    let TypeExpr::Map { key, value } = ty else {
        return false;
    };
    if !key.is_string() {
        return false;
    }
    let TypeExpr::Pointer { elem } = value.as_ref() else {
        return false;
    };
    match elem.as_ref() {
        TypeExpr::Named {
            package: Some(package),
            name,
        } if name == "Schema" => match modules {
            Some(modules) => modules.iter().any(|m| m == package),
            None => true,
        },
        _ => false,
    }
}

fn raw_entry(element: &Element) -> Option<RawEntry<'_>> {
    let key = element.key.as_ref()?;
    let position = key.pos().unwrap_or_default();
    let entry = match key.string_value() {
        Some(name) => RawEntry {
            name: name.to_string(),
            constant_key: true,
            value: &element.value,
            position,
        },
        None => RawEntry {
            name: key.callee_name().unwrap_or("<dynamic>").to_string(),
            constant_key: false,
            value: &element.value,
            position,
        },
    };
    Some(entry)
}

#[cfg(test)]
#[path = "extractor_test.rs"]
mod tests;
