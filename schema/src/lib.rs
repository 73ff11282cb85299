//! The abstract syntax tree produced by the Brine Proto compiler for a
//! proto3 schema, plus the fixed table of protobuf base types.
//!
//! A parsed file is a [`Schema`]: a tree of [`Message`]s and [`Enum`]s that is
//! owned exclusively by the compilation call that produced it.
//!
//! ```
//! use brine_proto_schema::*;
//!
//! let field = Field::new("int32", "id", 1, false, 3);
//! assert!(field.is_base_type);
//! assert_eq!(BaseType::from_name("sfixed64"), Some(BaseType::Sfixed64));
//! assert_eq!(field.resolved_type(), "int32");
//! ```

pub mod ast;
pub mod base;

pub use ast::*;
pub use base::*;

/// The only `syntax` literal the compiler accepts.
pub const SUPPORTED_SYNTAX: &str = "proto3";
