/// One logical line of schema text, trimmed, with the 1-based source line it
/// came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text:   String,
    pub number: usize,
}

impl Line {
    pub fn new(text: &str, number: usize) -> Line {
        Line { text: text.to_string(), number }
    }

    /// First whitespace-delimited word, used to classify declarations.
    pub fn keyword(&self) -> &str {
        self.text.split_whitespace().next().unwrap_or("")
    }

    pub fn closes_scope(&self) -> bool {
        self.text.starts_with('}')
    }
}

/// Split raw schema text into trimmed logical lines.
///
/// Every `}` ends up alone on its line, and a statement is also broken after
/// each `;` and `{`. Comments are dropped and string literals are copied
/// through untouched. Blank lines are not emitted.
pub fn normalize_source(text: &str) -> Vec<Line> {
    let mut lines   = Vec::new();
    let mut current = String::new();
    let mut number  = 1;

    let mut in_string: Option<char> = None;
    let mut in_line_comment  = false;
    let mut in_block_comment = false;

    fn flush(lines: &mut Vec<Line>, current: &mut String, number: usize) {
        let trimmed = current.trim();
        if !trimmed.is_empty() {
            lines.push(Line::new(trimmed, number));
        }
        current.clear();
    }

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\n' {
            flush(&mut lines, &mut current, number);
            number += 1;
            in_line_comment = false;
            in_string = None;
            continue;
        }

        if in_line_comment {
            continue;
        }

        if in_block_comment {
            if c == '*' && chars.peek() == Some(&'/') {
                chars.next();
                in_block_comment = false;
            }
            continue;
        }

        if let Some(quote) = in_string {
            current.push(c);
            if c == '\\' {
                if let Some(&escaped) = chars.peek() {
                    if escaped != '\n' {
                        current.push(escaped);
                        chars.next();
                    }
                }
            } else if c == quote {
                in_string = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => {
                in_string = Some(c);
                current.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                chars.next();
                in_line_comment = true;
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                in_block_comment = true;
            }
            '}' => {
                flush(&mut lines, &mut current, number);
                lines.push(Line::new("}", number));
            }
            ';' | '{' => {
                current.push(c);
                flush(&mut lines, &mut current, number);
            }
            _ => current.push(c),
        }
    }
    flush(&mut lines, &mut current, number);

    lines
}
