use thiserror::Error;

use crate::utils::quote;

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported syntax version {} at line {}: only \"proto3\" is supported", quote(.version), .line)]
    UnsupportedSyntaxVersion {
        version: String,
        line:    usize,
    },

    #[error("Missing syntax declaration (searched up to line {line})")]
    MissingSyntaxDeclaration { line: usize },

    #[error("Missing package declaration (searched up to line {line})")]
    MissingPackageDeclaration { line: usize },

    #[error("Malformed {} declaration at line {}: {}", .keyword, .line, quote(.text))]
    MalformedDeclaration {
        keyword: &'static str,
        text:    String,
        line:    usize,
    },

    #[error("Value {} of enum value {} at line {} is not an integer", quote(.value), quote(.name), .line)]
    MalformedEnumValue {
        name:  String,
        value: String,
        line:  usize,
    },

    #[error("Tag {} of field {} at line {} is not a positive 32-bit integer", quote(.tag), quote(.field), .line)]
    MalformedFieldTag {
        field: String,
        tag:   String,
        line:  usize,
    },

    #[error("Invalid compilation unit: {0}")]
    InvalidCompilationUnit(String),
}

impl ProtoError {
    /// Source line the error points at, when it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ProtoError::Io(_) | ProtoError::InvalidCompilationUnit(_) => None,
            ProtoError::UnsupportedSyntaxVersion { line, .. }
            | ProtoError::MissingSyntaxDeclaration { line }
            | ProtoError::MissingPackageDeclaration { line }
            | ProtoError::MalformedDeclaration { line, .. }
            | ProtoError::MalformedEnumValue { line, .. }
            | ProtoError::MalformedFieldTag { line, .. } => Some(*line),
        }
    }
}
