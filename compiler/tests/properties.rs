//! Property-based tests for the layout calculator and the parser.

use brine_proto_compiler::{compile_schema, compute_offsets, TypeLayout};
use proptest::prelude::*;

fn type_layout() -> impl Strategy<Value = TypeLayout> {
    (0u32..5, 1usize..5).prop_map(|(align_pow, multiple)| {
        let align = 1usize << align_pow;
        TypeLayout::new(align * multiple, align)
    })
}

fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

const FIELD_TYPES: [&str; 6] = ["int32", "string", "bytes", "double", "Other", "bool"];

proptest! {
    #[test]
    fn prop_offsets_are_aligned_and_disjoint(types in prop::collection::vec(type_layout(), 0..24)) {
        let offsets = compute_offsets(&types);
        prop_assert_eq!(offsets.len(), types.len());

        for (i, (offset, layout)) in offsets.iter().zip(&types).enumerate() {
            prop_assert_eq!(offset % layout.align, 0);
            if let Some(next) = offsets.get(i + 1) {
                prop_assert!(offset + layout.size <= *next);
            }
        }
    }

    #[test]
    fn prop_offsets_are_deterministic(types in prop::collection::vec(type_layout(), 0..24)) {
        prop_assert_eq!(compute_offsets(&types), compute_offsets(&types));
    }

    #[test]
    fn prop_offsets_add_only_padding(types in prop::collection::vec(type_layout(), 1..24)) {
        // Each gap is strictly smaller than the alignment being padded to.
        let offsets = compute_offsets(&types);
        prop_assert!(offsets[0] == 0);
        for i in 1..types.len() {
            let end = offsets[i - 1] + types[i - 1].size;
            prop_assert!(offsets[i] - end < types[i].align);
        }
    }

    #[test]
    fn prop_parsed_members_keep_source_order(
        fields in prop::collection::vec((0usize..FIELD_TYPES.len(), identifier(), any::<bool>()), 0..12),
        enum_names in prop::collection::vec(identifier(), 0..4),
    ) {
        let mut text = String::from("syntax = \"proto3\";\npackage prop.test;\n");
        text.push_str("message Holder {\n");
        for (i, (type_index, name, repeated)) in fields.iter().enumerate() {
            let label = if *repeated { "repeated " } else { "" };
            text.push_str(&format!("  {}{} {} = {};\n", label, FIELD_TYPES[*type_index], name, i + 1));
        }
        text.push_str("}\n");
        for (i, name) in enum_names.iter().enumerate() {
            text.push_str(&format!("enum E{}{} {{ V = {}; }}\n", i, name, i));
        }

        let schema = compile_schema(&text).unwrap();
        let holder = &schema.messages[0];
        prop_assert_eq!(holder.fields.len(), fields.len());
        for (i, (field, (type_index, name, repeated))) in holder.fields.iter().zip(&fields).enumerate() {
            prop_assert_eq!(&field.name, name);
            prop_assert_eq!(field.type_name.as_str(), FIELD_TYPES[*type_index]);
            prop_assert_eq!(field.tag as usize, i + 1);
            prop_assert_eq!(field.is_repeated, *repeated);
            if *repeated {
                prop_assert!(field.resolved_type().starts_with("std::vector<"));
            }
        }

        let names: Vec<String> = schema.enums.iter().map(|e| e.name.clone()).collect();
        let expected: Vec<String> = enum_names.iter().enumerate().map(|(i, n)| format!("E{}{}", i, n)).collect();
        prop_assert_eq!(names, expected);
    }
}

#[test]
fn test_deep_nesting_recovers_tree() {
    let depth = 6;
    let mut text = String::from("syntax = \"proto3\";\npackage deep;\n");
    for level in 0..depth {
        text.push_str(&format!("message M{} {{\n  int32 before{} = 1;\n  enum E{} {{ Z{} = 0; }}\n", level, level, level, level));
    }
    for level in (0..depth).rev() {
        text.push_str(&format!("  bool after{} = 2;\n}}\n", level));
    }

    let schema = compile_schema(&text).unwrap();
    let mut message = &schema.messages[0];
    for level in 0..depth {
        assert_eq!(message.name, format!("M{}", level));
        let names: Vec<_> = message.fields.iter().map(|f| f.name.clone()).collect();
        assert_eq!(names, [format!("before{}", level), format!("after{}", level)]);
        assert_eq!(message.nested_enums[0].name, format!("E{}", level));
        if level + 1 < depth {
            assert_eq!(message.nested_messages.len(), 1);
            message = &message.nested_messages[0];
        } else {
            assert!(message.nested_messages.is_empty());
        }
    }
}
