//! Field descriptors read from `Schema` literals

use serde::{Deserialize, Serialize};
use sl_core::syntax::{Element, Expr, Pos};

/// Flags and metadata of one `Schema` literal, without the field name.
///
/// This is the unit stored in the shared schema cache: a helper function in
/// the shared module returns one literal, and every field built from it shares
/// the same flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFlags {
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub force_new: bool,
    /// Selector name of the `Type` key (e.g. `TypeString`)
    pub value_type: Option<String>,
    /// `ValidateFunc` or `ValidateDiagFunc` is present
    pub declares_validation: bool,
    /// `Description` is present
    pub has_description: bool,
    /// String entries of `ExactlyOneOf`
    pub exactly_one_of: Vec<String>,
}

impl SchemaFlags {
    /// Read the flags from the elements of a `Schema` literal.
    ///
    /// Only literal `true` counts for boolean keys; a flag set from a variable
    /// or a call is read as unset.
    pub fn from_literal(elts: &[Element]) -> Self {
        let mut flags = SchemaFlags::default();
        for element in elts {
            let Some(key) = element.key_ident() else {
                continue;
            };
            let value = &element.value;
            match key {
                "Required" => flags.required = value.is_true(),
                "Optional" => flags.optional = value.is_true(),
                "Computed" => flags.computed = value.is_true(),
                "ForceNew" => flags.force_new = value.is_true(),
                "Type" => flags.value_type = value.callee_name().map(str::to_string),
                "ValidateFunc" | "ValidateDiagFunc" => flags.declares_validation = true,
                "Description" => flags.has_description = true,
                "ExactlyOneOf" => flags.exactly_one_of = string_list(value),
                _ => {}
            }
        }
        flags
    }

    /// Computed without being settable
    pub fn is_computed_only(&self) -> bool {
        self.computed && !self.required && !self.optional
    }
}

fn string_list(value: &Expr) -> Vec<String> {
    value
        .as_composite()
        .map(|(_, elts, _)| {
            elts.iter()
                .filter_map(|e| e.value.string_value())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Resolved description of one schema field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub flags: SchemaFlags,
    /// Position of the field's key in the schema map
    pub position: Pos,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, flags: SchemaFlags, position: Pos) -> Self {
        Self {
            name: name.into(),
            flags,
            position,
        }
    }

    pub fn is_computed_only(&self) -> bool {
        self.flags.is_computed_only()
    }
}
