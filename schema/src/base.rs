use serde::Serialize;

/// Every scalar type name the schema language reserves.
pub const BASE_TYPES: [&str; 15] = [
    "double", "float",
    "int32", "int64", "uint32", "uint64",
    "sint32", "sint64", "fixed32", "fixed64",
    "sfixed32", "sfixed64", "bool", "string", "bytes",
];

/// A protobuf scalar type. Everything else a field can name is an aggregate
/// (a message or an enum declared somewhere in the same file).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseType {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
}

impl BaseType {
    pub fn from_name(name: &str) -> Option<BaseType> {
        let base = match name {
            "double"   => BaseType::Double,
            "float"    => BaseType::Float,
            "int32"    => BaseType::Int32,
            "int64"    => BaseType::Int64,
            "uint32"   => BaseType::Uint32,
            "uint64"   => BaseType::Uint64,
            "sint32"   => BaseType::Sint32,
            "sint64"   => BaseType::Sint64,
            "fixed32"  => BaseType::Fixed32,
            "fixed64"  => BaseType::Fixed64,
            "sfixed32" => BaseType::Sfixed32,
            "sfixed64" => BaseType::Sfixed64,
            "bool"     => BaseType::Bool,
            "string"   => BaseType::String,
            "bytes"    => BaseType::Bytes,
            _ => return None,
        };
        Some(base)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BaseType::Double   => "double",
            BaseType::Float    => "float",
            BaseType::Int32    => "int32",
            BaseType::Int64    => "int64",
            BaseType::Uint32   => "uint32",
            BaseType::Uint64   => "uint64",
            BaseType::Sint32   => "sint32",
            BaseType::Sint64   => "sint64",
            BaseType::Fixed32  => "fixed32",
            BaseType::Fixed64  => "fixed64",
            BaseType::Sfixed32 => "sfixed32",
            BaseType::Sfixed64 => "sfixed64",
            BaseType::Bool     => "bool",
            BaseType::String   => "string",
            BaseType::Bytes    => "bytes",
        }
    }

    /// Width in bits of the in-memory representation, for the numeric types.
    /// `sint*` and `fixed*` differ from `int*`/`uint*` only on the wire.
    pub fn bit_width(self) -> Option<u32> {
        match self {
            BaseType::Bool => Some(8),
            BaseType::Float
            | BaseType::Int32
            | BaseType::Uint32
            | BaseType::Sint32
            | BaseType::Fixed32
            | BaseType::Sfixed32 => Some(32),
            BaseType::Double
            | BaseType::Int64
            | BaseType::Uint64
            | BaseType::Sint64
            | BaseType::Fixed64
            | BaseType::Sfixed64 => Some(64),
            BaseType::String | BaseType::Bytes => None,
        }
    }
}

pub fn is_base_type(name: &str) -> bool {
    BaseType::from_name(name).is_some()
}
