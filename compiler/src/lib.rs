//! brine-proto-compiler
//!
//! This crate implements:
//!  1) A line normalizer + recursive-descent parser for proto3 `.proto` files,
//!  2) A type translator from protobuf types to C++ types,
//!  3) A layout calculator that precomputes native field offsets,
//!  4) Code generation (`compile_schema_to_cpp` → `String`),
//!  5) Error types (`ProtoError`).

pub mod error;
pub mod utils;
pub mod normalizer;
pub mod parser;
pub mod translator;
pub mod layout;
pub mod writer;
pub mod gen_cpp;
pub mod compiler;

pub use compiler::{compile_schema, compile_schema_to_header, compile_unit, SourceKind};
pub use error::ProtoError;
pub use gen_cpp::{compile_schema_to_cpp, generate_cpp, CppOptions};
pub use layout::{compute_offsets, DataModel, TypeLayout};
