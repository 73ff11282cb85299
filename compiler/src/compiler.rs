use std::{path::Path, str::FromStr};

use brine_proto_schema::{CompilationUnit, Schema};
use tracing::debug;

use crate::{
    error::ProtoError,
    gen_cpp::{generate_cpp, CppOptions},
    normalizer::normalize_source,
    parser::parse_schema,
    translator::translate_schema,
    utils::quote,
};

/// The schema languages the front end understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Protobuf,
}

impl FromStr for SourceKind {
    type Err = ProtoError;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        match kind {
            "protobuf" | "proto" => Ok(SourceKind::Protobuf),
            other => Err(ProtoError::InvalidCompilationUnit(format!(
                "unknown source kind {}",
                quote(other)
            ))),
        }
    }
}

impl SourceKind {
    /// Pick the source kind from a file extension (`.proto`).
    pub fn from_path(path: &Path) -> Result<Self, ProtoError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => ext.parse(),
            None => Err(ProtoError::InvalidCompilationUnit(format!(
                "cannot infer source kind of {}",
                quote(&path.display().to_string())
            ))),
        }
    }
}

/// Normalize, parse and translate a proto3 schema.
/// Returns `Err(ProtoError)` if parsing fails; nothing partial is returned.
pub fn compile_schema(text: &str) -> Result<Schema, ProtoError> {
    let lines = normalize_source(text);
    let mut schema = parse_schema(&lines)?;
    translate_schema(&mut schema);

    let mut message_count = 0;
    schema.for_each_message(|_| message_count += 1);
    debug!(
        package = %schema.package,
        lines = lines.len(),
        messages = message_count,
        enums = schema.enums.len(),
        "compiled schema"
    );
    Ok(schema)
}

/// Compile source text of the given kind into a compilation unit.
pub fn compile_unit(text: &str, kind: SourceKind) -> Result<CompilationUnit, ProtoError> {
    match kind {
        SourceKind::Protobuf => compile_schema(text).map(CompilationUnit::Protobuf),
    }
}

/// Compile a proto3 schema straight to C++ header text.
pub fn compile_schema_to_header(text: &str, options: &CppOptions) -> Result<String, ProtoError> {
    let unit = compile_unit(text, SourceKind::Protobuf)?;
    Ok(generate_cpp(&unit, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_parsing() {
        assert_eq!("protobuf".parse::<SourceKind>().unwrap(), SourceKind::Protobuf);
        assert_eq!(SourceKind::from_path(Path::new("a/b.proto")).unwrap(), SourceKind::Protobuf);

        let err = "thrift".parse::<SourceKind>().unwrap_err();
        assert!(matches!(err, ProtoError::InvalidCompilationUnit(_)));
        assert_eq!(err.to_string(), "Invalid compilation unit: unknown source kind \"thrift\"");

        let err = SourceKind::from_path(Path::new("Makefile")).unwrap_err();
        assert!(matches!(err, ProtoError::InvalidCompilationUnit(_)));
    }

    #[test]
    fn test_compile_schema_translates() {
        let schema = compile_schema("syntax = \"proto3\";\npackage p;\nmessage M { uint64 id = 1; }\n").unwrap();
        assert_eq!(schema.messages[0].fields[0].target_type.as_deref(), Some("uint64_t"));
    }

    #[test]
    fn test_compile_unit_wraps_schema() {
        let unit = compile_unit("syntax = \"proto3\";\npackage p;\n", SourceKind::Protobuf).unwrap();
        match unit {
            CompilationUnit::Protobuf(schema) => assert_eq!(schema.package, "p"),
        }
    }
}
