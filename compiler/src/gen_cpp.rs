use brine_proto_schema::{CompilationUnit, Enum, Message, Schema};
use tracing::debug;

use crate::{
    layout::{DataModel, LayoutContext},
    translator::{escape_cpp_keyword, to_cpp_scope, translate_field},
    utils::to_macro_case,
    writer::CodeWriter,
};

/// Knobs for header generation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CppOptions {
    /// Stem for the include guard (`<STEM>_H`). Defaults to the package name.
    pub header_guard: Option<String>,
    /// Data model the precomputed field offsets are valid for.
    pub data_model:   DataModel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CppHeader {
    pub guard:      String,
    pub package:    String,
    pub namespace:  String,
    pub includes:   Vec<String>,
    pub data_model: DataModel,
    pub enums:      Vec<CppEnum>,
    pub classes:    Vec<CppClass>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CppEnum {
    pub name:   String,
    pub values: Vec<CppEnumValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CppEnumValue {
    pub name:  String,
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CppClass {
    pub name:           String,
    pub nested_enums:   Vec<CppEnum>,
    pub nested_classes: Vec<CppClass>,
    pub fields:         Vec<CppField>,
    /// Byte offset of each entry of `fields`.
    pub offsets:        Vec<usize>,
    pub size:           usize,
    pub align:          usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CppField {
    pub name:     String,
    pub cpp_type: String,
}

const STANDARD_INCLUDES: [&str; 5] = ["array", "cstddef", "cstdint", "string", "vector"];

/// `foo/bar.proto` is expected to be generated as `foo/bar.h`.
fn include_for_import(import: &str) -> String {
    format!("{}.h", import.strip_suffix(".proto").unwrap_or(import))
}

fn build_enum(enum_: &Enum) -> CppEnum {
    CppEnum {
        name:   escape_cpp_keyword(&enum_.name),
        values: enum_
            .values
            .iter()
            .map(|v| CppEnumValue { name: escape_cpp_keyword(&v.name), value: v.value })
            .collect(),
    }
}

fn build_class<'s>(
    context:   &LayoutContext<'s>,
    enclosing: &mut Vec<&'s Message>,
    message:   &'s Message,
) -> CppClass {
    let layout = context.message_layout(enclosing, message);

    enclosing.push(message);
    let nested_classes = message
        .nested_messages
        .iter()
        .map(|nested| build_class(context, enclosing, nested))
        .collect();
    enclosing.pop();

    CppClass {
        name: escape_cpp_keyword(&message.name),
        nested_enums: message.nested_enums.iter().map(build_enum).collect(),
        nested_classes,
        fields: message
            .fields
            .iter()
            .map(|f| CppField {
                name:     escape_cpp_keyword(&f.name),
                cpp_type: f.target_type.clone().unwrap_or_else(|| translate_field(f)),
            })
            .collect(),
        offsets: layout.offsets,
        size:    layout.size,
        align:   layout.align,
    }
}

/// Build the rendering model for `schema`: resolved target types and
/// precomputed layouts, no text yet.
pub fn build_header(schema: &Schema, options: &CppOptions) -> CppHeader {
    let context = LayoutContext::new(schema, options.data_model);
    let guard = options.header_guard.as_deref().unwrap_or(schema.package.as_str());

    CppHeader {
        guard:      format!("{}_H", to_macro_case(guard)),
        package:    schema.package.clone(),
        namespace:  to_cpp_scope(&schema.package),
        includes:   schema.imports.iter().map(|i| include_for_import(i)).collect(),
        data_model: options.data_model,
        enums:      schema.enums.iter().map(build_enum).collect(),
        classes:    schema
            .messages
            .iter()
            .map(|m| build_class(&context, &mut Vec::new(), m))
            .collect(),
    }
}

pub fn render_enum(enum_: &CppEnum) -> String {
    let mut w = CodeWriter::default();
    w.block(format!("enum class {} {{", enum_.name), "};", |w| {
        for value in &enum_.values {
            w.line(format!("{} = {},", value.name, value.value));
        }
    });
    w.finish()
}

/// Render one class. Nested declarations are rendered first and embedded
/// as-is.
pub fn render_class(class: &CppClass) -> String {
    let nested: Vec<String> = class
        .nested_enums
        .iter()
        .map(render_enum)
        .chain(class.nested_classes.iter().map(render_class))
        .collect();

    let mut w = CodeWriter::default();
    w.line(format!("class {} {{", class.name));

    w.line("public:");
    w.indent();
    w.line(format!("{}() = default;", class.name));
    w.line(format!("~{}() = default;", class.name));
    w.dedent();

    if !nested.is_empty() {
        w.blank();
        w.line("public:");
        w.indent();
        for (i, fragment) in nested.iter().enumerate() {
            if i > 0 {
                w.blank();
            }
            w.fragment(fragment);
        }
        w.dedent();
    }

    w.blank();
    w.line("public:");
    w.indent();
    w.line("void parseFromStream(std::vector<uint8_t>& stream);");
    w.dedent();

    if !class.fields.is_empty() {
        w.blank();
        w.line("public:");
        w.indent();
        for (i, field) in class.fields.iter().enumerate() {
            if i > 0 {
                w.blank();
            }
            w.line(format!("[[nodiscard]] const {}& get_{}() const;", field.cpp_type, field.name));
            w.line(format!("void set_{}({} value);", field.name, field.cpp_type));
        }
        w.dedent();

        w.blank();
        w.line("private:");
        w.indent();
        for field in &class.fields {
            w.line(format!("{} {};", field.cpp_type, field.name));
        }
        w.dedent();
    }

    let offsets: Vec<String> = class.offsets.iter().map(|o| o.to_string()).collect();
    w.blank();
    w.line("private:");
    w.indent();
    w.line(format!(
        "static constexpr std::array<std::size_t, {}> kFieldOffsets{{{}}};",
        class.offsets.len(),
        offsets.join(", ")
    ));
    w.dedent();

    w.line("};");
    w.finish()
}

pub fn render_header(header: &CppHeader) -> String {
    let mut w = CodeWriter::default();
    w.line(format!("// Generated by bproto from package `{}`. Do not edit.", header.package));
    w.line(format!("// Field offsets assume the {} data model.", header.data_model.name()));
    w.line(format!("#ifndef {}", header.guard));
    w.line(format!("#define {}", header.guard));
    w.blank();
    for include in STANDARD_INCLUDES {
        w.line(format!("#include <{}>", include));
    }
    for include in &header.includes {
        w.line(format!("#include \"{}\"", include));
    }
    w.blank();

    w.line(format!("namespace {} {{", header.namespace));
    let fragments = header
        .enums
        .iter()
        .map(render_enum)
        .chain(header.classes.iter().map(render_class));
    for fragment in fragments {
        w.blank();
        w.fragment(&fragment);
    }
    w.blank();
    w.line(format!("}}  // namespace {}", header.namespace));
    w.blank();
    w.line(format!("#endif  // {}", header.guard));
    w.finish()
}

/// Compiles a parsed schema into a C++ header. Fields that were not run
/// through the translator are translated on the fly.
pub fn compile_schema_to_cpp(schema: &Schema, options: &CppOptions) -> String {
    let header = build_header(schema, options);
    debug!(
        package = %header.package,
        guard = %header.guard,
        enums = header.enums.len(),
        classes = header.classes.len(),
        "rendering header"
    );
    render_header(&header)
}

/// Generate the C++ artifact for any compilation unit kind.
pub fn generate_cpp(unit: &CompilationUnit, options: &CppOptions) -> String {
    match unit {
        CompilationUnit::Protobuf(schema) => compile_schema_to_cpp(schema, options),
    }
}
