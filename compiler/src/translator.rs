use brine_proto_schema::{BaseType, Field, Message, Schema};

/// The C++ spelling of a protobuf scalar. Zig-zag and fixed-width variants
/// share the representation of their plain counterpart.
pub fn cpp_base_type(base: BaseType) -> &'static str {
    match base {
        BaseType::Double   => "double",
        BaseType::Float    => "float",
        BaseType::Int32    => "int32_t",
        BaseType::Int64    => "int64_t",
        BaseType::Uint32   => "uint32_t",
        BaseType::Uint64   => "uint64_t",
        BaseType::Sint32   => "int32_t",
        BaseType::Sint64   => "int64_t",
        BaseType::Fixed32  => "uint32_t",
        BaseType::Fixed64  => "uint64_t",
        BaseType::Sfixed32 => "int32_t",
        BaseType::Sfixed64 => "int64_t",
        BaseType::Bool     => "bool",
        BaseType::String   => "std::string",
        BaseType::Bytes    => "std::vector<uint8_t>",
    }
}

/// C++20 keywords and alternative operator tokens.
const CPP_KEYWORDS: [&str; 92] = [
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor",
    "bool", "break", "case", "catch", "char", "char8_t", "char16_t", "char32_t",
    "class", "compl", "concept", "const", "const_cast", "consteval", "constexpr",
    "constinit", "continue", "co_await", "co_return", "co_yield", "decltype",
    "default", "delete", "do", "double", "dynamic_cast", "else", "enum",
    "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept",
    "not", "not_eq", "nullptr", "operator", "or", "or_eq", "private",
    "protected", "public", "register", "reinterpret_cast", "requires", "return",
    "short", "signed", "sizeof", "static", "static_assert", "static_cast",
    "struct", "switch", "template", "this", "thread_local", "throw", "true",
    "try", "typedef", "typeid", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
];

/// Escapes C++ reserved words by suffixing with an underscore.
pub fn escape_cpp_keyword(s: &str) -> String {
    if CPP_KEYWORDS.contains(&s) {
        format!("{}_", s)
    } else {
        s.to_string()
    }
}

/// Rewrite a dotted schema reference into C++ scope syntax, escaping each
/// segment the way declarations are escaped.
/// `Outer.Inner` becomes `Outer::Inner`, `.pkg.Msg` becomes `::pkg::Msg`.
pub fn to_cpp_scope(type_name: &str) -> String {
    type_name
        .split('.')
        .map(escape_cpp_keyword)
        .collect::<Vec<_>>()
        .join("::")
}

/// Target type for one field. Aggregate references are not checked against
/// the declarations in the file.
pub fn translate_field(field: &Field) -> String {
    let base = if field.is_base_type {
        BaseType::from_name(&field.type_name)
    } else {
        None
    };

    let cpp_type = match base {
        Some(base) => cpp_base_type(base).to_string(),
        None => to_cpp_scope(&field.type_name),
    };

    if field.is_repeated {
        format!("std::vector<{}>", cpp_type)
    } else {
        cpp_type
    }
}

fn translate_message(message: &mut Message) {
    for field in &mut message.fields {
        field.target_type = Some(translate_field(field));
    }
    for nested in &mut message.nested_messages {
        translate_message(nested);
    }
}

/// Fill in `target_type` on every field of every message, nested ones included.
/// The declared type is kept, so translating twice gives the same result.
pub fn translate_schema(schema: &mut Schema) {
    for message in &mut schema.messages {
        translate_message(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("double", "double")]
    #[case("float", "float")]
    #[case("int32", "int32_t")]
    #[case("int64", "int64_t")]
    #[case("uint32", "uint32_t")]
    #[case("uint64", "uint64_t")]
    #[case("sint32", "int32_t")]
    #[case("sint64", "int64_t")]
    #[case("fixed32", "uint32_t")]
    #[case("fixed64", "uint64_t")]
    #[case("sfixed32", "int32_t")]
    #[case("sfixed64", "int64_t")]
    #[case("bool", "bool")]
    #[case("string", "std::string")]
    #[case("bytes", "std::vector<uint8_t>")]
    fn test_base_type_mapping(#[case] schema_type: &str, #[case] cpp_type: &str) {
        let field = Field::new(schema_type, "f", 1, false, 1);
        assert_eq!(translate_field(&field), cpp_type);
    }

    #[rstest]
    #[case("int32", "std::vector<int32_t>")]
    #[case("bytes", "std::vector<std::vector<uint8_t>>")]
    #[case("Corpus", "std::vector<Corpus>")]
    #[case("Outer.Inner", "std::vector<Outer::Inner>")]
    fn test_repeated_fields_are_wrapped(#[case] schema_type: &str, #[case] cpp_type: &str) {
        let field = Field::new(schema_type, "f", 1, true, 1);
        assert_eq!(translate_field(&field), cpp_type);
    }

    #[rstest]
    #[case("SearchResult", "SearchResult")]
    #[case("Outer.Inner", "Outer::Inner")]
    #[case(".pkg.Msg", "::pkg::Msg")]
    #[case("register", "register_")]
    #[case("Outer.class.Inner", "Outer::class_::Inner")]
    #[case(".my.xor.decltype", "::my::xor_::decltype_")]
    fn test_references_pass_through(#[case] schema_type: &str, #[case] cpp_type: &str) {
        let field = Field::new(schema_type, "f", 1, false, 1);
        assert_eq!(translate_field(&field), cpp_type);
    }

    #[rstest]
    #[case("static_assert")]
    #[case("thread_local")]
    #[case("char16_t")]
    #[case("wchar_t")]
    #[case("requires")]
    #[case("reinterpret_cast")]
    #[case("bitand")]
    #[case("compl")]
    fn test_keywords_are_escaped(#[case] word: &str) {
        assert_eq!(escape_cpp_keyword(word), format!("{}_", word));
    }

    #[test]
    fn test_identifiers_are_not_escaped() {
        assert_eq!(escape_cpp_keyword("Register"), "Register");
        assert_eq!(escape_cpp_keyword("classes"), "classes");
    }

    #[test]
    fn test_translate_schema_reaches_nested_messages() {
        let mut inner = Message::new("Inner", 2);
        inner.fields.push(Field::new("sint64", "n", 1, true, 3));
        let mut outer = Message::new("Outer", 1);
        outer.fields.push(Field::new("Inner", "inner", 1, false, 5));
        outer.nested_messages.push(inner);

        let mut schema = Schema {
            syntax:   "proto3".into(),
            package:  "p".into(),
            imports:  Vec::new(),
            messages: vec![outer],
            enums:    Vec::new(),
        };
        translate_schema(&mut schema);
        let once = schema.clone();
        translate_schema(&mut schema);
        assert_eq!(schema, once);

        let outer = &schema.messages[0];
        assert_eq!(outer.fields[0].resolved_type(), "Inner");
        assert_eq!(outer.fields[0].type_name, "Inner");
        assert_eq!(outer.nested_messages[0].fields[0].resolved_type(), "std::vector<int64_t>");
    }
}
