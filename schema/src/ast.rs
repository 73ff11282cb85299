use serde::Serialize;

use crate::base::is_base_type;

/// A parsed `.proto` file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub syntax:   String,
    pub package:  String,
    pub imports:  Vec<String>,
    pub messages: Vec<Message>,
    pub enums:    Vec<Enum>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub name:            String,
    pub line:            usize,
    pub fields:          Vec<Field>,
    pub nested_messages: Vec<Message>,
    pub nested_enums:    Vec<Enum>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    /// The type exactly as written in the schema (`int32`, `Corpus`, `Outer.Inner`).
    pub type_name:    String,
    pub name:         String,
    pub tag:          u32,
    pub line:         usize,
    pub is_base_type: bool,
    pub is_repeated:  bool,
    /// Name of the `oneof` group the field was declared in, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oneof:        Option<String>,
    /// Target-language type, filled in by the translator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_type:  Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enum {
    pub name:   String,
    pub line:   usize,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumValue {
    pub name:  String,
    pub value: i32,
    pub line:  usize,
}

/// Every kind of unit the compiler front end can hand to a generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CompilationUnit {
    Protobuf(Schema),
}

impl Field {
    pub fn new(type_name: &str, name: &str, tag: u32, is_repeated: bool, line: usize) -> Field {
        Field {
            type_name:    type_name.to_string(),
            name:         name.to_string(),
            tag,
            line,
            is_base_type: is_base_type(type_name),
            is_repeated,
            oneof:        None,
            target_type:  None,
        }
    }

    /// The translated type when available, otherwise the declared one.
    pub fn resolved_type(&self) -> &str {
        self.target_type.as_deref().unwrap_or(&self.type_name)
    }
}

impl Message {
    pub fn new(name: &str, line: usize) -> Message {
        Message {
            name:            name.to_string(),
            line,
            fields:          Vec::new(),
            nested_messages: Vec::new(),
            nested_enums:    Vec::new(),
        }
    }

    pub fn nested_message(&self, name: &str) -> Option<&Message> {
        self.nested_messages.iter().find(|m| m.name == name)
    }

    pub fn nested_enum(&self, name: &str) -> Option<&Enum> {
        self.nested_enums.iter().find(|e| e.name == name)
    }
}

impl Enum {
    pub fn new(name: &str, line: usize) -> Enum {
        Enum {
            name:   name.to_string(),
            line,
            values: Vec::new(),
        }
    }
}

impl Schema {
    pub fn message(&self, name: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.name == name)
    }

    pub fn enum_(&self, name: &str) -> Option<&Enum> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Visit every message in the tree, depth first, parents before children.
    pub fn for_each_message<'a>(&'a self, mut visit: impl FnMut(&'a Message)) {
        fn walk<'a>(message: &'a Message, visit: &mut impl FnMut(&'a Message)) {
            visit(message);
            for nested in &message.nested_messages {
                walk(nested, visit);
            }
        }
        for message in &self.messages {
            walk(message, &mut visit);
        }
    }
}
