//! Typed-model member → schema field name mapping, from `tfschema` struct tags

use sl_core::syntax::{Decl, Expr, SourceFile, Stmt, StructField, TypeDecl, TypeExpr};
use sl_core::FactsProvider;
use std::collections::HashMap;

const TFSCHEMA_TAG: &str = "tfschema:\"";

/// Member names of a typed resource model mapped to schema field names.
///
/// Built from the model struct returned by the file's `ModelObject` method,
/// declared in the module itself or in an imported module the facts carry.
/// When that method is absent or its type cannot be found, every tagged
/// struct declared in the file contributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelFieldMapping {
    fields: HashMap<String, String>,
}

impl ModelFieldMapping {
    pub fn for_file(file: &SourceFile, facts: &dyn FactsProvider) -> Self {
        let mut mapping = Self::default();
        if let Some(TypeExpr::Struct { fields }) =
            model_object_decl(file, facts).map(|decl| &decl.ty)
        {
            mapping.extend_from(fields);
        }
        if mapping.fields.is_empty() {
            for decl in file.type_decls() {
                if let TypeExpr::Struct { fields } = &decl.ty {
                    mapping.extend_from(fields);
                }
            }
        }
        mapping
    }

    /// Schema field name tagged on a model member
    pub fn schema_name(&self, member: &str) -> Option<&str> {
        self.fields.get(member).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn extend_from(&mut self, fields: &[StructField]) {
        for field in fields {
            if let Some(name) = field.tag.as_deref().and_then(parse_tfschema_tag) {
                self.fields.insert(field.name.clone(), name.to_string());
            }
        }
    }
}

impl FromIterator<(String, String)> for ModelFieldMapping {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Value of the `tfschema` key in a struct tag
pub fn parse_tfschema_tag(tag: &str) -> Option<&str> {
    let start = tag.find(TFSCHEMA_TAG)? + TFSCHEMA_TAG.len();
    let rest = &tag[start..];
    let end = rest.find('"')?;
    let value = &rest[..end];
    (!value.is_empty()).then_some(value)
}

/// Declaration of the type whose literal `ModelObject` returns
fn model_object_decl<'a>(file: &SourceFile, facts: &'a dyn FactsProvider) -> Option<&'a TypeDecl> {
    let func = file.decls.iter().find_map(|decl| match decl {
        Decl::Func(func) if func.name == "ModelObject" => Some(func),
        _ => None,
    })?;
    let (package, name) = func.body.as_ref()?.stmts.iter().find_map(|stmt| match stmt {
        Stmt::Return { results, .. } => results.first().and_then(model_type_name),
        _ => None,
    })?;
    match package {
        None => facts.module().type_decl(name),
        Some(alias) => file
            .import_path(alias)
            .and_then(|path| facts.imported_type(path, name)),
    }
}

/// Package qualifier (local import name) and type name of a model literal
fn model_type_name(expr: &Expr) -> Option<(Option<&str>, &str)> {
    match expr.as_composite()? {
        (Some(TypeExpr::Named { package, name }), _, _) => {
            Some((package.as_deref(), name.as_str()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{method, model_struct, module, ret, source_file};
    use sl_core::syntax::{Import, Pos, UnaryOp};
    use sl_core::ModuleFacts;

    const MODELS_PKG: &str = "example/foo/models";

    fn model_object(type_name: &str) -> Decl {
        qualified_model_object(None, type_name)
    }

    fn qualified_model_object(package: Option<&str>, type_name: &str) -> Decl {
        method(
            "FooResource",
            "ModelObject",
            vec![ret(Expr::Unary {
                op: UnaryOp::Addr,
                x: Box::new(Expr::Composite {
                    ty: Some(TypeExpr::named(package, type_name)),
                    elts: vec![],
                    pos: Pos::default(),
                }),
            })],
        )
    }

    #[test]
    fn test_mapping_from_model_object() {
        let file = source_file(
            "/src/foo/foo_resource.go",
            vec![
                model_struct("OtherModel", &[("Name", "other_name")]),
                model_object("FooModel"),
            ],
        );
        let models = source_file(
            "/src/foo/models.go",
            vec![model_struct(
                "FooModel",
                &[("Name", "name"), ("ResourceGroupName", "resource_group_name")],
            )],
        );
        let facts = ModuleFacts::syntax_only(module(
            "example/foo",
            "/src/foo",
            vec![file.clone(), models],
        ));

        let mapping = ModelFieldMapping::for_file(&file, &facts);
        assert_eq!(mapping.schema_name("Name"), Some("name"));
        assert_eq!(
            mapping.schema_name("ResourceGroupName"),
            Some("resource_group_name")
        );
    }

    #[test]
    fn test_mapping_falls_back_to_file_structs() {
        let file = source_file(
            "/src/foo/foo_resource.go",
            vec![model_struct("FooModel", &[("Name", "name")])],
        );
        let facts = ModuleFacts::syntax_only(module("example/foo", "/src/foo", vec![file.clone()]));

        let mapping = ModelFieldMapping::for_file(&file, &facts);
        assert_eq!(mapping.schema_name("Name"), Some("name"));
        assert_eq!(mapping.schema_name("Location"), None);
    }

    fn imported_model_file() -> SourceFile {
        let mut file = source_file(
            "/src/foo/foo_resource.go",
            vec![
                model_struct("LocalModel", &[("Name", "local_name")]),
                qualified_model_object(Some("models"), "FooModel"),
            ],
        );
        file.imports.push(Import {
            name: None,
            path: MODELS_PKG.to_string(),
        });
        file
    }

    fn foo_model_decl() -> TypeDecl {
        match model_struct("FooModel", &[("Name", "name"), ("Location", "location")]) {
            Decl::Type(decl) => decl,
            _ => unreachable!("model_struct builds a type declaration"),
        }
    }

    #[test]
    fn test_mapping_from_imported_model_type() {
        let file = imported_model_file();
        let mut facts =
            ModuleFacts::syntax_only(module("example/foo", "/src/foo", vec![file.clone()]));
        facts.insert_imported_type(MODELS_PKG, foo_model_decl());

        let mapping = ModelFieldMapping::for_file(&file, &facts);
        assert_eq!(mapping.schema_name("Name"), Some("name"));
        assert_eq!(mapping.schema_name("Location"), Some("location"));
    }

    #[test]
    fn test_unknown_imported_model_falls_back_to_file_structs() {
        let file = imported_model_file();
        let mut facts =
            ModuleFacts::syntax_only(module("example/foo", "/src/foo", vec![file.clone()]));
        // Same type name, different module
        facts.insert_imported_type("example/bar/models", foo_model_decl());

        let mapping = ModelFieldMapping::for_file(&file, &facts);
        assert_eq!(mapping.schema_name("Name"), Some("local_name"));
        assert_eq!(mapping.schema_name("Location"), None);
    }

    #[test]
    fn test_parse_tfschema_tag() {
        assert_eq!(
            parse_tfschema_tag(r#"tfschema:"resource_group_name""#),
            Some("resource_group_name")
        );
        assert_eq!(
            parse_tfschema_tag(r#"json:"x" tfschema:"name""#),
            Some("name")
        );
        assert_eq!(parse_tfschema_tag(r#"json:"name""#), None);
        assert_eq!(parse_tfschema_tag(r#"tfschema:"""#), None);
        assert_eq!(parse_tfschema_tag(r#"tfschema:"unterminated"#), None);
    }
}
