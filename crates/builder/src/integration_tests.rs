//! Integration tests for composed value types.
//!
//! Tests: TypeDecl → TypeRegistry → ValueType → Whole
//!
//! Verifies:
//! - Every instance behaves as a whole value object (equality, hashing, diff, copies)
//! - Field lists compose across inheritance layers without duplicates
//! - Freezing follows the most-derived layer's mutability

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use crate::{
        Change, FieldSpec, TypeDecl, TypeRegistry, Value, ValueObject, ValueType, Whole, WholeError,
        fields,
    };

    fn setup() -> (TypeRegistry, Arc<ValueType>) {
        wholeable_observability::init();

        let mut registry = TypeRegistry::new();
        let implementation = registry
            .define(
                TypeDecl::anonymous()
                    .include(fields(["name", "label"]))
                    .default_value("name", "test")
                    .default_value("label", "Test"),
            )
            .unwrap();
        (registry, implementation)
    }

    fn new(ty: &Arc<ValueType>) -> Whole {
        ty.construct(Vec::<(String, Value)>::new()).unwrap()
    }

    fn strs(values: &[&str]) -> Vec<Value> {
        values.iter().map(|v| Value::from(*v)).collect()
    }

    /// Behavior every whole value object shares.
    fn assert_whole_value_object(ty: &Arc<ValueType>, other_type: &Arc<ValueType>) {
        let whole = new(ty);
        let similar = new(ty);
        let different = ty.construct([("name", "odd")]).unwrap();

        // members
        assert_eq!(ty.members(), ["name", "label"]);
        assert_eq!(whole.members(), ["name", "label"]);

        // initialize + frozen
        assert_eq!(whole.get("name"), Some(&Value::from("test")));
        assert_eq!(whole.get("label"), Some(&Value::from("Test")));
        assert!(whole.is_frozen());

        // diff
        let diff = similar.diff(&different);
        assert_eq!(diff.len(), 1);
        assert_eq!(
            diff.get("name"),
            Some(&Change::new(Value::from("test"), Some(Value::from("odd"))))
        );
        let foreign = whole.diff(&new(other_type));
        assert_eq!(foreign.fields().collect::<Vec<_>>(), ["name", "label"]);
        assert_eq!(foreign.get("name"), Some(&Change::new(Value::from("test"), None)));
        assert_eq!(foreign.get("label"), Some(&Change::new(Value::from("Test"), None)));
        assert!(whole.diff(&similar).is_empty());

        // eql?
        assert!(whole.strict_equals(&similar));
        assert!(!whole.strict_equals(&different));
        assert!(!whole.strict_equals_value(&Value::from("other")));

        // equal?
        assert!(whole.same_instance(&whole));
        assert!(!whole.same_instance(&similar));

        // ==
        assert!(whole.loose_equals(&similar));
        assert!(!whole.loose_equals(&different));
        assert!(!whole.loose_equals_value(&Value::from("other")));
        assert_eq!(whole, similar);
        assert_ne!(whole, different);

        // hash
        assert_eq!(whole.structural_hash(), similar.structural_hash());
        assert_ne!(whole.structural_hash(), different.structural_hash());
        assert_ne!(whole.structural_hash(), new(other_type).structural_hash());

        // inspect
        let described = whole.describe();
        assert!(described.starts_with("#<Whole:0x"), "{described}");
        assert!(described.ends_with(r#">(name="test", label="Test")"#), "{described}");
        assert_eq!(format!("{whole}"), described);
        assert_eq!(format!("{whole:?}"), described);

        // to_a / to_h
        assert_eq!(whole.to_a(), strs(&["test", "Test"]));
        let named = whole.to_h();
        assert_eq!(named.keys().collect::<Vec<_>>(), ["name", "label"]);
        assert_eq!(named.values().cloned().collect::<Vec<_>>(), whole.to_a());

        // with
        let copy = whole.with(Vec::<(String, Value)>::new()).unwrap();
        assert!(copy.strict_equals(&whole));
        assert!(!copy.same_instance(&whole));
        assert!(copy.is_frozen());
        let partial = whole.with([("label", "Mod")]).unwrap();
        assert_eq!(partial.to_a(), strs(&["test", "Mod"]));
        let complete = whole.with([("name", "mod"), ("label", "Mod")]).unwrap();
        assert_eq!(complete.to_a(), strs(&["mod", "Mod"]));

        // deconstruct
        assert_eq!(whole.deconstruct(), strs(&["test", "Test"]));
        assert_eq!(whole.deconstruct_keys(), whole.to_h());
    }

    #[test]
    fn implementation_is_a_whole_value_object() {
        let (mut registry, implementation) = setup();
        let other_type = registry.define(TypeDecl::anonymous()).unwrap();
        assert_whole_value_object(&implementation, &other_type);
    }

    #[test]
    fn named_type_describes_with_its_name() {
        let mut registry = TypeRegistry::new();
        let point = registry
            .define(TypeDecl::named("Point").include(FieldSpec::new(["x", "y"])))
            .unwrap();
        let p = point.construct([("x", 1), ("y", 2)]).unwrap();
        assert_eq!(p.describe(), "Point(x=1, y=2)");
    }

    #[test]
    fn duplicate_inheritance_keeps_unique_members() {
        let (mut registry, implementation) = setup();
        let child = registry
            .define(
                TypeDecl::anonymous()
                    .extends(implementation.id())
                    .include(fields(["name", "label"])),
            )
            .unwrap();

        assert_eq!(child.members(), ["name", "label"]);
        assert_eq!(new(&child).members(), ["name", "label"]);
    }

    #[test]
    fn single_level_inheritance_appends_members() {
        let (mut registry, implementation) = setup();
        let child = registry
            .define(
                TypeDecl::anonymous()
                    .extends(implementation.id())
                    .include(fields(["place"]))
                    .default_value("place", Value::Nil),
            )
            .unwrap();

        assert_eq!(child.members(), ["name", "label", "place"]);
        assert_eq!(new(&child).members(), ["name", "label", "place"]);
    }

    #[test]
    fn multiple_level_inheritance_appends_in_order() {
        let (mut registry, implementation) = setup();
        let first = registry
            .define(TypeDecl::anonymous().extends(implementation.id()).include(fields(["latitude"])))
            .unwrap();
        let second = registry
            .define(TypeDecl::anonymous().extends(first.id()).include(fields(["longitude"])))
            .unwrap();
        let third = registry
            .define(TypeDecl::anonymous().extends(second.id()).include(fields(["created_at"])))
            .unwrap();

        assert_eq!(
            third.members(),
            ["name", "label", "latitude", "longitude", "created_at"]
        );
        assert!(third.descends_from(implementation.id()));
        assert_eq!(
            registry.ancestor_members(second.id()).unwrap(),
            ["name", "label", "latitude", "longitude"]
        );
    }

    #[test]
    fn mutable_type_allows_writes_and_never_freezes() {
        let mut registry = TypeRegistry::new();
        let ty = registry
            .define(
                TypeDecl::anonymous()
                    .include(FieldSpec::mutable(["name"]))
                    .default_value("name", "test"),
            )
            .unwrap();

        let mut whole = new(&ty);
        assert!(!whole.is_frozen());
        whole.set("name", "other").unwrap();
        assert_eq!(whole.get("name"), Some(&Value::from("other")));
    }

    #[test]
    fn immutable_parent_with_mutable_child_stays_writable() {
        let (mut registry, implementation) = setup();
        let child = registry
            .define(
                TypeDecl::anonymous()
                    .extends(implementation.id())
                    .include(FieldSpec::mutable(["place"]))
                    .default_value("place", "remote"),
            )
            .unwrap();

        let mut whole = new(&child);
        assert!(!whole.is_frozen());
        whole.set("place", "space").unwrap();
        assert_eq!(whole.get("place"), Some(&Value::from("space")));

        let err = whole.set("name", "other").unwrap_err();
        assert!(matches!(err, WholeError::UndefinedWrite { .. }));
        assert_eq!(whole.get("name"), Some(&Value::from("test")));
    }

    #[test]
    fn mutable_parent_with_immutable_child_freezes() {
        let mut registry = TypeRegistry::new();
        let mutable = registry
            .define(
                TypeDecl::named("Mutable")
                    .include(FieldSpec::mutable(["name"]))
                    .default_value("name", "test"),
            )
            .unwrap();
        let immutable = registry
            .define(
                TypeDecl::named("Immutable")
                    .extends(mutable.id())
                    .include(fields(["label"]))
                    .default_value("label", "Test"),
            )
            .unwrap();

        let mut whole = new(&immutable);
        assert!(whole.is_frozen());

        let err = whole.set("name", "other").unwrap_err();
        assert_eq!(err, WholeError::frozen_state("Immutable", "name"));
        assert!(err.to_string().contains("name="));

        let err = whole.set("label", "other").unwrap_err();
        assert_eq!(err, WholeError::undefined_write("Immutable", "label"));
        assert!(err.to_string().contains("label="));

        assert_eq!(whole.to_a(), vec![Value::from("test"), Value::from("Test")]);
    }

    #[test]
    fn point_scenario() {
        let mut registry = TypeRegistry::new();
        let point = registry
            .define(TypeDecl::named("Point").include(fields(["x", "y"])))
            .unwrap();

        let mut p = registry.construct(point.id(), [("x", 1), ("y", 2)]).unwrap();
        assert!(p.is_frozen());
        assert!(p.set("x", 5).is_err());

        let q = point.construct([("x", 1), ("y", 3)]).unwrap();
        let diff = p.diff(&q);
        assert_eq!(diff.len(), 1);
        assert_eq!(diff.get("y"), Some(&Change::new(Value::Int(2), Some(Value::Int(3)))));

        let moved = p.with([("y", 9)]).unwrap();
        assert!(moved.is_frozen());
        assert_eq!(moved.get("x"), Some(&Value::Int(1)));
        assert_eq!(moved.get("y"), Some(&Value::Int(9)));
    }

    #[test]
    fn subtype_comparisons() {
        let (mut registry, implementation) = setup();
        let child = registry
            .define(
                TypeDecl::anonymous()
                    .extends(implementation.id())
                    .include(fields(["place"]))
                    .default_value("place", "remote"),
            )
            .unwrap();

        let base = new(&implementation);
        let derived = child.construct([("label", "Mod")]).unwrap();

        // diff against a descendant compares the receiver's fields only
        let diff = base.diff(&derived);
        assert_eq!(diff.fields().collect::<Vec<_>>(), ["label"]);

        // diff from the descendant's side treats the base as foreign
        assert_eq!(derived.diff(&base).len(), 3);

        // strict equality needs the exact type
        let same_values = child.construct([("place", "remote")]).unwrap();
        assert!(!base.strict_equals(&same_values));
        assert!(!same_values.loose_equals(&base));
    }

    #[test]
    fn instances_work_as_set_keys() {
        let (_registry, implementation) = setup();
        let mut set = HashSet::new();
        set.insert(new(&implementation));
        set.insert(new(&implementation));
        set.insert(implementation.construct([("name", "odd")]).unwrap());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn nested_value_objects_describe_and_compare() {
        let mut registry = TypeRegistry::new();
        let point = registry
            .define(TypeDecl::named("Point").include(fields(["x", "y"])))
            .unwrap();
        let segment = registry
            .define(TypeDecl::named("Segment").include(fields(["from", "to"])))
            .unwrap();

        let from = point.construct([("x", 0), ("y", 0)]).unwrap();
        let to = point.construct([("x", 3), ("y", 4)]).unwrap();
        let a = segment
            .construct([("from", Value::from(&from)), ("to", Value::from(&to))])
            .unwrap();
        let b = a.with([("to", Value::from(&from))]).unwrap();

        assert_eq!(a.describe(), "Segment(from=Point(x=0, y=0), to=Point(x=3, y=4))");
        assert_eq!(a.diff(&b).fields().collect::<Vec<_>>(), ["to"]);
        assert_eq!(
            a.to_json(),
            serde_json::json!({"from": {"x": 0, "y": 0}, "to": {"x": 3, "y": 4}})
        );
    }

    #[test]
    fn with_rejects_unknown_fields() {
        let (_registry, implementation) = setup();
        let err = new(&implementation).with([("nope", 1)]).unwrap_err();
        assert!(matches!(err, WholeError::UnknownField { .. }));
    }

    #[test]
    fn with_on_mutable_instance_stays_writable() {
        let mut registry = TypeRegistry::new();
        let ty = registry
            .define(
                TypeDecl::named("Draft")
                    .include(FieldSpec::mutable(["name", "label"]))
                    .default_value("label", "Test"),
            )
            .unwrap();
        assert_eq!(ty.writable_fields().collect::<Vec<_>>(), ["name", "label"]);

        let original = ty.construct([("name", "test")]).unwrap();
        let mut copy = original.with([("name", "copy")]).unwrap();
        assert!(!copy.is_frozen());
        assert!(!copy.same_instance(&original));

        copy.set("label", "Mod").unwrap();
        assert_eq!(copy.to_a(), strs(&["copy", "Mod"]));
        assert_eq!(original.to_a(), strs(&["test", "Test"]));
    }

    #[test]
    fn with_on_immutable_child_of_mutable_parent_freezes() {
        let mut registry = TypeRegistry::new();
        let mutable = registry
            .define(TypeDecl::named("Mutable").include(FieldSpec::mutable(["name"])))
            .unwrap();
        let immutable = registry
            .define(
                TypeDecl::named("Immutable")
                    .extends(mutable.id())
                    .include(fields(["label"])),
            )
            .unwrap();
        assert_eq!(immutable.writable_fields().collect::<Vec<_>>(), ["name"]);

        let whole = immutable.construct([("name", "test"), ("label", "Test")]).unwrap();
        let mut copy = whole.with([("label", "Mod")]).unwrap();
        assert!(copy.is_frozen());
        assert_eq!(
            copy.set("name", "other").unwrap_err(),
            WholeError::frozen_state("Immutable", "name")
        );
        assert_eq!(copy.get("label"), Some(&Value::from("Mod")));
    }

    #[test]
    fn diff_against_plain_value_marks_every_field_absent() {
        let (_registry, implementation) = setup();
        let whole = new(&implementation);

        let diff = whole.diff_value(&Value::from("other"));
        let pairs: Vec<(&str, &Change)> = diff.iter().collect();
        assert_eq!(
            pairs,
            [
                ("name", &Change::new(Value::from("test"), None)),
                ("label", &Change::new(Value::from("Test"), None)),
            ]
        );

        let changes = whole.diff_value(&Value::Nil).into_inner();
        assert_eq!(changes.keys().collect::<Vec<_>>(), ["name", "label"]);
        assert!(changes.values().all(|change| change.new.is_none()));
    }

    #[test]
    fn signed_zero_fields_are_equal() {
        let mut registry = TypeRegistry::new();
        let ty = registry
            .define(TypeDecl::named("Reading").include(fields(["x"])))
            .unwrap();

        let positive = ty.construct([("x", 0.0)]).unwrap();
        let negative = ty.construct([("x", -0.0)]).unwrap();
        assert!(positive.strict_equals(&negative));
        assert!(positive.loose_equals(&negative));
        assert!(positive.diff(&negative).is_empty());

        let mut set = HashSet::new();
        set.insert(positive);
        assert!(set.contains(&negative));
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn point_type() -> Arc<ValueType> {
            let mut registry = TypeRegistry::new();
            registry
                .define(TypeDecl::named("Point").include(fields(["x", "y", "label"])))
                .unwrap()
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: ordered and named views agree.
            #[test]
            fn ordered_values_match_named_values(x in any::<i64>(), y in any::<i64>(), label in ".{0,12}") {
                let ty = point_type();
                let p = ty.construct([("x", Value::from(x)), ("y", Value::from(y)), ("label", Value::from(label))]).unwrap();
                let named = p.to_h();
                let by_name: Vec<Value> = ty.members().iter().map(|f| named[f.as_str()].clone()).collect();
                prop_assert_eq!(p.to_a(), by_name);
            }

            /// Property: equal values give equal hashes and an empty diff.
            #[test]
            fn equal_values_are_strictly_equal(x in any::<i64>(), y in any::<i64>()) {
                let ty = point_type();
                let a = ty.construct([("x", Value::from(x)), ("y", Value::from(y)), ("label", Value::Nil)]).unwrap();
                let b = ty.construct([("x", Value::from(x)), ("y", Value::from(y)), ("label", Value::Nil)]).unwrap();
                prop_assert!(a.strict_equals(&b));
                prop_assert_eq!(a.structural_hash(), b.structural_hash());
                prop_assert!(a.diff(&b).is_empty());
            }

            /// Property: changing one field through `with` shows up as exactly that field.
            #[test]
            fn with_changes_exactly_one_field(x in any::<i64>(), y in any::<i64>(), new_y in any::<i64>()) {
                prop_assume!(y != new_y);
                let ty = point_type();
                let a = ty.construct([("x", Value::from(x)), ("y", Value::from(y)), ("label", Value::Nil)]).unwrap();
                let b = a.with([("y", new_y)]).unwrap();

                let diff = a.diff(&b);
                prop_assert_eq!(diff.len(), 1);
                prop_assert_eq!(diff.get("y"), Some(&Change::new(Value::from(y), Some(Value::from(new_y)))));
                prop_assert!(!a.strict_equals(&b));
                prop_assert_eq!(a.get("x"), b.get("x"));
            }
        }
    }
}
