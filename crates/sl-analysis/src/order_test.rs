use super::*;
use crate::test_utils::descriptor;

fn names(order: &[&str]) -> Vec<String> {
    order.iter().map(|s| s.to_string()).collect()
}

fn ids(fields: &[&str]) -> Resolution<Vec<String>> {
    Resolution::Resolved(names(fields))
}

fn order_of(fields: &[FieldDescriptor], ids: &Resolution<Vec<String>>, nested: bool) -> Vec<String> {
    let refs: Vec<&FieldDescriptor> = fields.iter().collect();
    expected_order(&refs, ids, nested)
}

#[test]
fn test_tags_last() {
    let fields = vec![
        descriptor("b", &["optional"]),
        descriptor("tags", &["optional"]),
        descriptor("a", &["required"]),
    ];
    assert_eq!(
        order_of(&fields, &Resolution::NotApplicable, false),
        names(&["a", "b", "tags"])
    );
}

#[test]
fn test_required_resource_group_swapped_ahead_of_location() {
    let fields = vec![
        descriptor("location", &["required"]),
        descriptor("resource_group_name", &["required"]),
        descriptor("name", &["required"]),
    ];
    assert_eq!(
        order_of(&fields, &Resolution::Unresolvable, false),
        names(&["resource_group_name", "location", "name"])
    );
}

#[test]
fn test_full_canonical_order() {
    let fields = vec![
        descriptor("tags", &["optional"]),
        descriptor("fqdn", &["computed"]),
        descriptor("location", &["required", "force_new"]),
        descriptor("sku", &["required"]),
        descriptor("zone", &["optional"]),
        descriptor("resource_group_name", &["required", "force_new"]),
        descriptor("enabled", &["optional"]),
        descriptor("name", &["required", "force_new"]),
        descriptor("endpoint", &["computed"]),
    ];
    assert_eq!(
        order_of(&fields, &ids(&["resource_group_name", "name"]), false),
        names(&[
            "name",
            "resource_group_name",
            "location",
            "sku",
            "enabled",
            "zone",
            "endpoint",
            "fqdn",
            "tags",
        ])
    );
}

#[test]
fn test_id_fields_missing_from_map_are_ignored() {
    let fields = vec![
        descriptor("name", &["required"]),
        descriptor("sku", &["required"]),
    ];
    assert_eq!(
        order_of(&fields, &ids(&["parent_id", "name"]), false),
        names(&["name", "sku"])
    );
}

#[test]
fn test_computed_only_id_field_sorted_with_computed() {
    let fields = vec![
        descriptor("name", &["required"]),
        descriptor("version", &["computed"]),
        descriptor("alpha", &["computed"]),
        descriptor("sku", &["optional"]),
    ];
    assert_eq!(
        order_of(&fields, &ids(&["version", "name"]), false),
        names(&["name", "sku", "alpha", "version"])
    );
}

#[test]
fn test_computed_only_location_leads_computed_group() {
    let fields = vec![
        descriptor("name", &["required"]),
        descriptor("alpha", &["computed"]),
        descriptor("location", &["computed"]),
    ];
    assert_eq!(
        order_of(&fields, &ids(&["name"]), false),
        names(&["name", "location", "alpha"])
    );
    assert_eq!(
        order_of(&fields, &Resolution::NotApplicable, false),
        names(&["name", "location", "alpha"])
    );
}

#[test]
fn test_computed_only_location_leads_without_ids() {
    let fields = vec![
        descriptor("a_field", &["computed"]),
        descriptor("location", &["computed"]),
    ];
    assert_eq!(
        order_of(&fields, &Resolution::Unresolvable, false),
        names(&["location", "a_field"])
    );
}

#[test]
fn test_swap_does_not_move_first_required_position() {
    // Optional fields follow the first declared required field, so they sort
    let fields = vec![
        descriptor("location", &["required"]),
        descriptor("b", &["optional"]),
        descriptor("a", &["optional"]),
        descriptor("resource_group_name", &["required"]),
    ];
    assert_eq!(
        order_of(&fields, &Resolution::Unresolvable, false),
        names(&["resource_group_name", "location", "a", "b"])
    );
}

#[test]
fn test_location_stays_in_flag_group_without_ids() {
    let fields = vec![
        descriptor("name", &["required"]),
        descriptor("location", &["optional"]),
        descriptor("comment", &["optional"]),
    ];
    assert_eq!(
        order_of(&fields, &Resolution::Unresolvable, false),
        names(&["name", "comment", "location"])
    );
    assert_eq!(
        order_of(&fields, &ids(&["name"]), false),
        names(&["name", "location", "comment"])
    );
}

#[test]
fn test_optional_before_first_required_keeps_declaration_order() {
    let fields = vec![
        descriptor("name", &["required"]),
        descriptor("zeta", &["optional"]),
        descriptor("sku", &["required"]),
        descriptor("alpha", &["optional"]),
    ];
    assert_eq!(
        order_of(&fields, &ids(&["name"]), false),
        names(&["name", "sku", "zeta", "alpha"])
    );
}

#[test]
fn test_field_without_flags_is_optional() {
    let fields = vec![
        descriptor("a", &["required"]),
        descriptor("c", &[]),
        descriptor("b", &["optional"]),
    ];
    assert_eq!(
        order_of(&fields, &Resolution::NotApplicable, false),
        names(&["a", "b", "c"])
    );
}

#[test]
fn test_nested_sorts_every_group() {
    let fields = vec![
        descriptor("tags", &["optional"]),
        descriptor("zone", &["required"]),
        descriptor("location", &["required"]),
        descriptor("name", &["required"]),
        descriptor("id", &["computed"]),
        descriptor("etag", &["computed"]),
    ];
    assert_eq!(
        order_of(&fields, &ids(&["name"]), true),
        names(&["location", "name", "zone", "tags", "etag", "id"])
    );
}

#[test]
fn test_output_is_deterministic_permutation() {
    let fields = vec![
        descriptor("tags", &["optional"]),
        descriptor("name", &["required"]),
        descriptor("location", &["computed"]),
        descriptor("b", &[]),
        descriptor("resource_group_name", &["computed"]),
        descriptor("a", &["optional", "computed"]),
        descriptor("x", &["required"]),
    ];
    let inputs = [
        ids(&["resource_group_name", "name"]),
        Resolution::Unresolvable,
        Resolution::NotApplicable,
    ];
    for id_fields in &inputs {
        for nested in [false, true] {
            let first = order_of(&fields, id_fields, nested);
            let second = order_of(&fields, id_fields, nested);
            assert_eq!(first, second);

            let mut sorted_out = first.clone();
            sorted_out.sort();
            let mut sorted_in: Vec<String> = fields.iter().map(|f| f.name.clone()).collect();
            sorted_in.sort();
            assert_eq!(sorted_out, sorted_in);
        }
    }
}
