//! Native memory layout of the generated classes.
//!
//! Fields are laid out in declaration order with natural alignment, exactly as
//! a C++ compiler lays out a standard-layout class. Fields are never reordered
//! to reduce padding.

use std::cell::RefCell;
use std::collections::HashMap;

use brine_proto_schema::{BaseType, Field, Message, Schema};

/// Size and alignment tables for the C++ standard library the generated
/// header is compiled against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataModel {
    /// 64-bit pointers, libstdc++ (x86-64, AArch64 Linux).
    #[default]
    Lp64,
    /// 32-bit pointers, libstdc++.
    Ilp32,
}

impl DataModel {
    pub fn name(self) -> &'static str {
        match self {
            DataModel::Lp64  => "LP64",
            DataModel::Ilp32 => "ILP32",
        }
    }

    pub fn pointer(self) -> TypeLayout {
        match self {
            DataModel::Lp64  => TypeLayout::new(8, 8),
            DataModel::Ilp32 => TypeLayout::new(4, 4),
        }
    }

    /// `std::string`: pointer, length and a 16-byte small-string buffer.
    pub fn string(self) -> TypeLayout {
        match self {
            DataModel::Lp64  => TypeLayout::new(32, 8),
            DataModel::Ilp32 => TypeLayout::new(24, 4),
        }
    }

    /// `std::vector<T>`: three pointers, whatever `T` is.
    pub fn vector(self) -> TypeLayout {
        let pointer = self.pointer();
        TypeLayout::new(pointer.size * 3, pointer.align)
    }

    /// `enum class` with the default `int` underlying type.
    pub fn enumeration(self) -> TypeLayout {
        TypeLayout::new(4, 4)
    }

    pub fn base(self, base: BaseType) -> TypeLayout {
        match base {
            BaseType::String => self.string(),
            BaseType::Bytes  => self.vector(),
            scalar => {
                let bytes = scalar.bit_width().map_or(1, |bits| bits as usize / 8);
                TypeLayout::new(bytes, bytes)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeLayout {
    pub size:  usize,
    pub align: usize,
}

impl TypeLayout {
    pub const fn new(size: usize, align: usize) -> TypeLayout {
        TypeLayout { size, align }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLayout {
    /// One offset per field, in declaration order.
    pub offsets: Vec<usize>,
    pub size:    usize,
    pub align:   usize,
}

/// Byte offset of each member of a sequential record.
///
/// The running cursor is padded up to each member's alignment
/// (`(align - cursor % align) % align`), the padded cursor becomes the
/// member's offset, and the cursor then advances by the member's size.
pub fn compute_offsets(types: &[TypeLayout]) -> Vec<usize> {
    let mut cursor = 0;
    types
        .iter()
        .map(|layout| {
            let align = layout.align.max(1);
            cursor += (align - cursor % align) % align;
            let offset = cursor;
            cursor += layout.size;
            offset
        })
        .collect()
}

/// Offsets plus the size and alignment of the whole record. The size is
/// rounded up to the record's alignment; an empty record occupies one byte.
pub fn record_layout(types: &[TypeLayout]) -> MessageLayout {
    let offsets = compute_offsets(types);
    if types.is_empty() {
        return MessageLayout { offsets, size: 1, align: 1 };
    }

    let align = types.iter().map(|t| t.align.max(1)).max().unwrap_or(1);
    let end = offsets
        .iter()
        .zip(types)
        .map(|(offset, layout)| offset + layout.size)
        .max()
        .unwrap_or(0);
    let size = end + (align - end % align) % align;

    MessageLayout { offsets, size, align }
}

enum Declaration<'s> {
    Message {
        message:   &'s Message,
        enclosing: Vec<&'s Message>,
    },
    Enum,
}

/// Resolves field types against the declarations of one schema and sizes them.
///
/// Layouts that do not depend on a recursion guard are cached per message, so
/// a message referenced from many places is laid out once.
pub struct LayoutContext<'s> {
    schema: &'s Schema,
    model:  DataModel,
    cache:  RefCell<HashMap<*const Message, MessageLayout>>,
}

impl<'s> LayoutContext<'s> {
    pub fn new(schema: &'s Schema, model: DataModel) -> Self {
        LayoutContext { schema, model, cache: RefCell::new(HashMap::new()) }
    }

    /// Layout of `message`, declared inside `enclosing` (outermost first;
    /// empty for a top-level message).
    pub fn message_layout(&self, enclosing: &[&'s Message], message: &'s Message) -> MessageLayout {
        let mut visiting = Vec::new();
        self.layout_message(enclosing, message, &mut visiting).0
    }

    /// Returns the layout and whether it was cut short by the recursion guard.
    /// Only guard-free layouts are cached: the others depend on where the
    /// walk started.
    fn layout_message(
        &self,
        enclosing: &[&'s Message],
        message:   &'s Message,
        visiting:  &mut Vec<&'s Message>,
    ) -> (MessageLayout, bool) {
        let key = message as *const Message;
        if let Some(cached) = self.cache.borrow().get(&key) {
            return (cached.clone(), false);
        }

        visiting.push(message);
        let mut scopes = enclosing.to_vec();
        scopes.push(message);

        let mut guarded = false;
        let types: Vec<TypeLayout> = message
            .fields
            .iter()
            .map(|field| {
                let (layout, hit) = self.field_layout(&scopes, field, visiting);
                guarded |= hit;
                layout
            })
            .collect();

        visiting.pop();
        let layout = record_layout(&types);
        if !guarded {
            self.cache.borrow_mut().insert(key, layout.clone());
        }
        (layout, guarded)
    }

    fn field_layout(
        &self,
        scopes:   &[&'s Message],
        field:    &Field,
        visiting: &mut Vec<&'s Message>,
    ) -> (TypeLayout, bool) {
        if field.is_repeated {
            return (self.model.vector(), false);
        }
        if field.is_base_type {
            if let Some(base) = BaseType::from_name(&field.type_name) {
                return (self.model.base(base), false);
            }
        }

        match self.resolve(scopes, &field.type_name) {
            Some(Declaration::Enum) => (self.model.enumeration(), false),
            Some(Declaration::Message { message, enclosing }) => {
                if visiting.iter().any(|m| std::ptr::eq(*m, message)) {
                    // A class cannot contain itself by value; size it as a handle.
                    (self.model.pointer(), true)
                } else {
                    let (layout, guarded) = self.layout_message(&enclosing, message, visiting);
                    (TypeLayout::new(layout.size, layout.align), guarded)
                }
            }
            None => (self.model.pointer(), false),
        }
    }

    /// Find the declaration `type_name` refers to from inside `scopes`,
    /// innermost scope first, then the top level. Dotted names descend
    /// through nested declarations; a leading `.` starts at the top level.
    fn resolve(&self, scopes: &[&'s Message], type_name: &str) -> Option<Declaration<'s>> {
        let absolute = type_name.starts_with('.');
        let segments: Vec<&str> = type_name.trim_start_matches('.').split('.').collect();
        let package: Vec<&str> = self.schema.package.split('.').collect();

        let search_scopes: &[&'s Message] = if absolute { &[] } else { scopes };
        if let Some(found) = self.resolve_segments(search_scopes, &segments) {
            return Some(found);
        }

        // `pkg.Msg` / `.pkg.Msg` name a top-level declaration of this file.
        if segments.len() > package.len() && segments[..package.len()] == package[..] {
            return self.resolve_segments(&[], &segments[package.len()..]);
        }
        None
    }

    fn resolve_segments(&self, scopes: &[&'s Message], segments: &[&str]) -> Option<Declaration<'s>> {
        let (first, rest) = segments.split_first()?;

        let mut found = None;
        for depth in (0..scopes.len()).rev() {
            let scope = scopes[depth];
            if let Some(message) = scope.nested_message(first) {
                found = Some(Declaration::Message { message, enclosing: scopes[..=depth].to_vec() });
            } else if scope.nested_enum(first).is_some() {
                found = Some(Declaration::Enum);
            }
            if found.is_some() {
                break;
            }
        }
        if found.is_none() {
            if let Some(message) = self.schema.message(first) {
                found = Some(Declaration::Message { message, enclosing: Vec::new() });
            } else if self.schema.enum_(first).is_some() {
                found = Some(Declaration::Enum);
            }
        }

        let mut current = found?;
        for segment in rest {
            current = match current {
                Declaration::Message { message, mut enclosing } => {
                    if let Some(nested) = message.nested_message(segment) {
                        enclosing.push(message);
                        Declaration::Message { message: nested, enclosing }
                    } else if message.nested_enum(segment).is_some() {
                        Declaration::Enum
                    } else {
                        return None;
                    }
                }
                Declaration::Enum => return None,
            };
        }
        Some(current)
    }
}
