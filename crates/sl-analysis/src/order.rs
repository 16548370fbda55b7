//! Canonical field order of a schema map

use crate::resolution::Resolution;
use crate::schema::FieldDescriptor;
use std::collections::HashMap;

pub(crate) const LOCATION: &str = "location";
pub(crate) const RESOURCE_GROUP_NAME: &str = "resource_group_name";
pub(crate) const TAGS: &str = "tags";

/// Expected order of `fields` (given in declaration order).
///
/// Top-level maps: identifier fields most specific first, then `location`,
/// required fields in declaration order, optional fields, computed fields,
/// and `tags` last. The identifier and `location` groups only exist when
/// `ids` is resolved; otherwise those fields fall into their flag group. A
/// computed-only `location` always leads the computed group.
/// Nested maps: required, optional, computed, each sorted by name.
///
/// The result is always a permutation of the input names.
pub fn expected_order(
    fields: &[&FieldDescriptor],
    ids: &Resolution<Vec<String>>,
    nested: bool,
) -> Vec<String> {
    let groups = if nested {
        Groups::nested(fields)
    } else {
        Groups::top_level(fields, ids.as_resolved())
    };
    groups
        .into_order()
        .into_iter()
        .map(|idx| fields[idx].name.clone())
        .collect()
}

/// Field indexes per category
#[derive(Default)]
struct Groups<'f> {
    fields: &'f [&'f FieldDescriptor],
    /// (rank, index); rank 0 is the most specific identifier field
    ids: Vec<(usize, usize)>,
    location: Vec<usize>,
    required: Vec<usize>,
    optional: Vec<usize>,
    /// Computed-only `location`, ahead of the other computed fields
    computed_location: Vec<usize>,
    computed: Vec<usize>,
    tags: Vec<usize>,
    keep_optional_order: bool,
    nested: bool,
}

impl<'f> Groups<'f> {
    fn nested(fields: &'f [&'f FieldDescriptor]) -> Self {
        let mut groups = Groups {
            fields,
            nested: true,
            ..Groups::default()
        };
        for (idx, field) in fields.iter().enumerate() {
            groups.push_by_flags(idx, field);
        }
        groups.sort_by_name();
        groups
    }

    fn top_level(fields: &'f [&'f FieldDescriptor], ids: Option<&Vec<String>>) -> Self {
        let mut groups = Groups {
            fields,
            ..Groups::default()
        };

        // Tracer order is least specific first
        let id_rank: HashMap<&str, usize> = ids
            .map(|ids| {
                ids.iter()
                    .rev()
                    .enumerate()
                    .map(|(rank, name)| (name.as_str(), rank))
                    .collect()
            })
            .unwrap_or_default();

        for (idx, field) in fields.iter().enumerate() {
            let name = field.name.as_str();
            if name == TAGS {
                groups.tags.push(idx);
                continue;
            }
            if let Some(&rank) = id_rank.get(name) {
                if !field.is_computed_only() {
                    groups.ids.push((rank, idx));
                    continue;
                }
            }
            if name == LOCATION && field.is_computed_only() {
                groups.computed_location.push(idx);
                continue;
            }
            if ids.is_some() && name == LOCATION {
                groups.location.push(idx);
                continue;
            }
            groups.push_by_flags(idx, field);
        }

        groups.ids.sort_unstable();
        // Declared position of the first required field, before any swap
        groups.keep_optional_order = match groups.required.iter().min() {
            Some(&first_required) => groups.optional.iter().any(|&idx| idx < first_required),
            None => false,
        };
        groups.swap_resource_group_and_location();
        groups.sort_by_name();
        groups
    }

    fn push_by_flags(&mut self, idx: usize, field: &FieldDescriptor) {
        if field.is_computed_only() {
            self.computed.push(idx);
        } else if field.flags.required {
            self.required.push(idx);
        } else {
            self.optional.push(idx);
        }
    }

    /// `resource_group_name` goes ahead of a required `location` declared before it
    fn swap_resource_group_and_location(&mut self) {
        let position = |name: &str| {
            self.required
                .iter()
                .position(|&idx| self.fields[idx].name == name)
        };
        if let (Some(location), Some(group)) = (position(LOCATION), position(RESOURCE_GROUP_NAME)) {
            if location < group {
                self.required.swap(location, group);
            }
        }
    }

    fn sort_by_name(&mut self) {
        let fields = self.fields;
        let by_name = |a: &usize, b: &usize| fields[*a].name.cmp(&fields[*b].name);
        if self.nested {
            self.required.sort_by(by_name);
        }
        if !self.keep_optional_order {
            self.optional.sort_by(by_name);
        }
        self.computed.sort_by(by_name);
    }

    fn into_order(self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.fields.len());
        order.extend(self.ids.iter().map(|&(_, idx)| idx));
        order.extend(self.location);
        order.extend(self.required);
        order.extend(self.optional);
        order.extend(self.computed_location);
        order.extend(self.computed);
        order.extend(self.tags);
        order
    }
}

#[cfg(test)]
#[path = "order_test.rs"]
mod tests;
