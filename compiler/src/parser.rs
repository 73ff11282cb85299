use brine_proto_schema::{Enum, EnumValue, Field, Message, Schema, SUPPORTED_SYNTAX};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use tracing::{debug, trace};

use crate::{error::ProtoError, normalizer::Line};

lazy_static! {
    static ref SYNTAX:       Regex = Regex::new(r#"^syntax\s*=\s*["'](proto2|proto3)["']\s*;"#).unwrap();
    static ref EDITION:      Regex = Regex::new(r#"^edition\s*=\s*["']([^"']*)["']\s*;"#).unwrap();
    static ref PACKAGE:      Regex = Regex::new(r"^package\s+([A-Za-z_][\w.]*)\s*;").unwrap();
    static ref IMPORT:       Regex = Regex::new(r#"^import\s+(?:(?:public|weak)\s+)?["']([^"']+)["']\s*;"#).unwrap();
    static ref MESSAGE_DECL: Regex = Regex::new(r"^message\s+([A-Za-z_]\w*)").unwrap();
    static ref ENUM_DECL:    Regex = Regex::new(r"^enum\s+([A-Za-z_]\w*)").unwrap();
    static ref ONEOF_DECL:   Regex = Regex::new(r"^oneof\s+([A-Za-z_]\w*)").unwrap();
    static ref FIELD:        Regex = Regex::new(
        r"^(?:(repeated|optional)\s+)?(\.?[A-Za-z_]\w*(?:\.[A-Za-z_]\w*)*)\s+([A-Za-z_]\w*)\s*=\s*(\d+)\s*(?:\[[^\]]*\])?\s*;"
    ).unwrap();
    static ref ENUM_VALUE:   Regex = Regex::new(r"^([A-Za-z_]\w*)\s*=\s*([^\s;\[]+)").unwrap();
}

/// Forward-only position over the normalized lines.
struct LineCursor<'a> {
    lines:    &'a [Line],
    position: usize,
}

impl<'a> LineCursor<'a> {
    fn new(lines: &'a [Line], position: usize) -> Self {
        LineCursor { lines, position }
    }

    fn next_line(&mut self) -> Option<&'a Line> {
        let line = self.lines.get(self.position)?;
        self.position += 1;
        Some(line)
    }
}

/// Parse normalized lines into a [`Schema`]. Any failure aborts the whole
/// parse; no partial schema is returned.
pub fn parse_schema(lines: &[Line]) -> Result<Schema, ProtoError> {
    let (syntax_index, syntax)   = parse_syntax(lines)?;
    let (package_index, package) = parse_package(lines)?;
    let imports = parse_imports(lines);

    let mut parser = Parser {
        cursor: LineCursor::new(lines, syntax_index.max(package_index) + 1),
    };
    let (messages, enums) = parser.parse_top_level()?;

    Ok(Schema {
        syntax,
        package,
        imports,
        messages,
        enums,
    })
}

fn end_of_input(lines: &[Line]) -> usize {
    lines.last().map_or(0, |l| l.number)
}

/// Locate the `syntax` declaration. Returns its index in `lines`.
fn parse_syntax(lines: &[Line]) -> Result<(usize, String), ProtoError> {
    for (index, line) in lines.iter().enumerate() {
        if let Some(caps) = SYNTAX.captures(&line.text) {
            let version = &caps[1];
            if version != SUPPORTED_SYNTAX {
                return Err(ProtoError::UnsupportedSyntaxVersion {
                    version: version.to_string(),
                    line:    line.number,
                });
            }
            return Ok((index, version.to_string()));
        }
        if let Some(caps) = EDITION.captures(&line.text) {
            return Err(ProtoError::UnsupportedSyntaxVersion {
                version: format!("edition {}", &caps[1]),
                line:    line.number,
            });
        }
    }

    Err(ProtoError::MissingSyntaxDeclaration { line: end_of_input(lines) })
}

/// Locate the `package` declaration. Returns its index in `lines`.
fn parse_package(lines: &[Line]) -> Result<(usize, String), ProtoError> {
    lines
        .iter()
        .enumerate()
        .find_map(|(index, line)| {
            PACKAGE.captures(&line.text).map(|caps| (index, caps[1].to_string()))
        })
        .ok_or(ProtoError::MissingPackageDeclaration { line: end_of_input(lines) })
}

fn parse_imports(lines: &[Line]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| IMPORT.captures(&line.text).map(|caps| caps[1].to_string()))
        .collect()
}

fn declared_name<'l>(
    pattern: &Regex,
    keyword: &'static str,
    line:    &'l Line,
) -> Result<&'l str, ProtoError> {
    pattern
        .captures(&line.text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| ProtoError::MalformedDeclaration {
            keyword,
            text: line.text.clone(),
            line: line.number,
        })
}

/// Parse a field line. `Ok(None)` means the line is not a field at all and
/// should be skipped.
fn parse_field(line: &Line) -> Result<Option<Field>, ProtoError> {
    let caps: Captures = match FIELD.captures(&line.text) {
        Some(caps) => caps,
        None => return Ok(None),
    };

    let name = &caps[3];
    let tag_text = &caps[4];
    let tag = match tag_text.parse::<u32>() {
        Ok(tag) if tag > 0 => tag,
        _ => {
            return Err(ProtoError::MalformedFieldTag {
                field: name.to_string(),
                tag:   tag_text.to_string(),
                line:  line.number,
            })
        }
    };
    let is_repeated = caps.get(1).map_or(false, |label| label.as_str() == "repeated");

    Ok(Some(Field::new(&caps[2], name, tag, is_repeated, line.number)))
}

fn parse_enum_number(text: &str) -> Option<i32> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (radix, digits) = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => (16, hex),
        None => (10, digits),
    };
    // `from_str_radix` would also take a sign here
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    i32::try_from(if negative { magnitude.checked_neg()? } else { magnitude }).ok()
}

fn parse_enum_value(line: &Line) -> Result<Option<EnumValue>, ProtoError> {
    let caps = match ENUM_VALUE.captures(&line.text) {
        Some(caps) => caps,
        None => return Ok(None),
    };

    let value = parse_enum_number(&caps[2]).ok_or_else(|| ProtoError::MalformedEnumValue {
        name:  caps[1].to_string(),
        value: caps[2].to_string(),
        line:  line.number,
    })?;

    Ok(Some(EnumValue {
        name: caps[1].to_string(),
        value,
        line: line.number,
    }))
}

fn skipped(line: &Line) {
    trace!(line = line.number, text = %line.text, "skipping line");
}

struct Parser<'a> {
    cursor: LineCursor<'a>,
}

impl<'a> Parser<'a> {
    fn parse_top_level(&mut self) -> Result<(Vec<Message>, Vec<Enum>), ProtoError> {
        let mut messages = Vec::new();
        let mut enums    = Vec::new();

        while let Some(line) = self.cursor.next_line() {
            match line.keyword() {
                "message" => messages.push(self.parse_message(line)?),
                "enum"    => enums.push(self.parse_enum(line)?),
                _         => skipped(line),
            }
        }

        Ok((messages, enums))
    }

    /// `decl` is the already-consumed `message` line. Consumes through the
    /// matching `}`.
    fn parse_message(&mut self, decl: &'a Line) -> Result<Message, ProtoError> {
        let name = declared_name(&MESSAGE_DECL, "message", decl)?;
        let mut message = Message::new(name, decl.number);

        while let Some(line) = self.cursor.next_line() {
            if line.closes_scope() {
                break;
            }
            match line.keyword() {
                "message" => message.nested_messages.push(self.parse_message(line)?),
                "enum"    => message.nested_enums.push(self.parse_enum(line)?),
                "oneof"   => self.parse_oneof(line, &mut message.fields)?,
                _ => match parse_field(line)? {
                    Some(field) => message.fields.push(field),
                    None => skipped(line),
                },
            }
        }

        debug!(
            name = %message.name,
            line = decl.number,
            fields = message.fields.len(),
            nested_messages = message.nested_messages.len(),
            nested_enums = message.nested_enums.len(),
            "parsed message"
        );
        Ok(message)
    }

    fn parse_enum(&mut self, decl: &'a Line) -> Result<Enum, ProtoError> {
        let name = declared_name(&ENUM_DECL, "enum", decl)?;
        let mut enum_ = Enum::new(name, decl.number);

        while let Some(line) = self.cursor.next_line() {
            if line.closes_scope() {
                break;
            }
            match parse_enum_value(line)? {
                Some(value) => enum_.values.push(value),
                None => skipped(line),
            }
        }

        debug!(name = %enum_.name, line = decl.number, values = enum_.values.len(), "parsed enum");
        Ok(enum_)
    }

    /// A `oneof` contributes its fields to the enclosing message.
    fn parse_oneof(&mut self, decl: &'a Line, fields: &mut Vec<Field>) -> Result<(), ProtoError> {
        let group = declared_name(&ONEOF_DECL, "oneof", decl)?;

        while let Some(line) = self.cursor.next_line() {
            if line.closes_scope() {
                break;
            }
            match parse_field(line)? {
                Some(mut field) => {
                    field.oneof = Some(group.to_string());
                    fields.push(field);
                }
                None => skipped(line),
            }
        }
        Ok(())
    }
}
