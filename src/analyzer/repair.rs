//! Tolerant JSON repair.
//!
//! Models asked for "JSON only" still produce near-misses: trailing commas,
//! single quotes, unquoted keys, Python literals, comments, unescaped inner
//! quotes, or a response cut off mid-object. [`repair_json`] rewrites such
//! text into valid JSON so it can go through the normal `serde_json` parse.
//!
//! Valid JSON passes through unchanged in meaning, so anything the strict
//! parser accepts the repair path accepts too.

use thiserror::Error;

/// Nesting limit; deeper input is rejected instead of recursing further.
const MAX_DEPTH: usize = 256;

/// Errors from the repair pass.
#[derive(Debug, Error)]
pub enum RepairError {
    #[error("no JSON value found in response")]
    NoJson,

    #[error("JSON nesting deeper than {0} levels")]
    TooDeep(usize),

    #[error("repaired text is still not valid JSON: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Rewrite near-JSON `input` into valid JSON text.
///
/// Leading prose is skipped up to the first `{` or `[`; anything after the
/// first complete value is ignored.
pub fn repair_json(input: &str) -> Result<String, RepairError> {
    let chars: Vec<char> = input.chars().collect();
    let start = find_start(&chars).ok_or(RepairError::NoJson)?;

    let mut repairer = Repairer {
        chars,
        pos: start,
        out: String::with_capacity(input.len() + 16),
    };
    repairer.parse_value(0)?;
    Ok(repairer.out)
}

/// Repair then parse into a `serde_json::Value`.
pub fn parse_lenient(input: &str) -> Result<serde_json::Value, RepairError> {
    let repaired = repair_json(input)?;
    Ok(serde_json::from_str(&repaired)?)
}

fn starts_with_literal(chars: &[char]) -> bool {
    ["true", "false", "null"].iter().any(|lit| {
        chars.len() >= lit.len() && lit.chars().zip(chars.iter()).all(|(a, b)| a == *b)
    })
}

fn is_value_start(chars: &[char]) -> bool {
    match chars.first() {
        Some('{' | '[' | '"' | '-') => true,
        Some(c) if c.is_ascii_digit() => true,
        Some(_) => starts_with_literal(chars),
        None => false,
    }
}

fn find_start(chars: &[char]) -> Option<usize> {
    let first = chars.iter().position(|c| !c.is_whitespace())?;
    if is_value_start(&chars[first..]) {
        return Some(first);
    }
    chars.iter().position(|c| *c == '{' || *c == '[')
}

struct Repairer {
    chars: Vec<char>,
    pos: usize,
    out: String,
}

impl Repairer {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    /// Skip whitespace and `//` or `/* */` comments.
    fn skip_insignificant(&mut self) {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(c), _) if c.is_whitespace() => self.pos += 1,
                (Some('/'), Some('/')) => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                (Some('/'), Some('*')) => {
                    self.pos += 2;
                    while self.pos < self.chars.len() {
                        if self.peek() == Some('*') && self.peek_at(1) == Some('/') {
                            self.pos += 2;
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => return,
            }
        }
    }

    /// Next significant char without consuming it.
    fn next_significant(&mut self) -> Option<char> {
        self.skip_insignificant();
        self.peek()
    }

    fn parse_value(&mut self, depth: usize) -> Result<(), RepairError> {
        if depth > MAX_DEPTH {
            return Err(RepairError::TooDeep(MAX_DEPTH));
        }
        match self.next_significant() {
            None => self.out.push_str("null"),
            Some('{') => self.parse_object(depth)?,
            Some('[') => self.parse_array(depth)?,
            Some(c) if is_quote(c) => self.parse_string(),
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
            Some(_) => self.parse_word(),
        }
        Ok(())
    }

    fn parse_object(&mut self, depth: usize) -> Result<(), RepairError> {
        self.pos += 1;
        self.out.push('{');
        let mut members = 0usize;

        loop {
            match self.next_significant() {
                None | Some(']') => break,
                Some('}') => {
                    self.pos += 1;
                    break;
                }
                Some(',') => {
                    self.pos += 1;
                    continue;
                }
                Some(c) => {
                    let key_start = self.out.len();
                    if members > 0 {
                        self.out.push(',');
                    }
                    if is_quote(c) {
                        self.parse_string();
                    } else if !self.parse_bare_key() {
                        // Not a key; drop the stray char
                        self.out.truncate(key_start);
                        self.pos += 1;
                        continue;
                    }
                    members += 1;

                    if self.next_significant() == Some(':') {
                        self.pos += 1;
                    }
                    self.out.push(':');

                    match self.next_significant() {
                        None | Some(',') | Some('}') | Some(']') => self.out.push_str("null"),
                        Some(_) => self.parse_value(depth + 1)?,
                    }
                }
            }
        }

        self.out.push('}');
        Ok(())
    }

    fn parse_array(&mut self, depth: usize) -> Result<(), RepairError> {
        self.pos += 1;
        self.out.push('[');
        let mut items = 0usize;

        loop {
            match self.next_significant() {
                None | Some('}') => break,
                Some(']') => {
                    self.pos += 1;
                    break;
                }
                Some(',') => {
                    self.pos += 1;
                    continue;
                }
                Some(_) => {
                    if items > 0 {
                        self.out.push(',');
                    }
                    self.parse_value(depth + 1)?;
                    items += 1;
                }
            }
        }

        self.out.push(']');
        Ok(())
    }

    /// Unquoted object key. Returns false when nothing key-like was found.
    fn parse_bare_key(&mut self) -> bool {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == ':' || c.is_whitespace() || matches!(c, ',' | '{' | '}' | '[' | ']') || is_quote(c)
            {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return false;
        }
        let key: String = self.chars[start..self.pos].iter().collect();
        push_json_string(&mut self.out, &key);
        true
    }

    /// Whether the quote at the current position closes the string.
    ///
    /// A double quote followed by something other than a structural char is
    /// treated as an unescaped quote inside the text.
    fn is_closing_quote(&self, open: char) -> bool {
        if open == '\'' {
            return true;
        }
        let mut i = self.pos + 1;
        while let Some(c) = self.chars.get(i) {
            if !c.is_whitespace() {
                return matches!(c, ',' | '}' | ']' | ':' | '"');
            }
            i += 1;
        }
        true
    }

    fn parse_string(&mut self) {
        let open = self.chars[self.pos];
        self.pos += 1;
        let mut text = String::new();

        while let Some(c) = self.peek() {
            if c == '\\' {
                self.pos += 1;
                match self.peek() {
                    Some(e @ ('"' | '\\' | '/')) => text.push(e),
                    Some('b') => text.push('\u{0008}'),
                    Some('f') => text.push('\u{000C}'),
                    Some('n') => text.push('\n'),
                    Some('r') => text.push('\r'),
                    Some('t') => text.push('\t'),
                    Some('u') => {
                        let hex: String = self
                            .chars
                            .iter()
                            .skip(self.pos + 1)
                            .take(4)
                            .collect();
                        match u32::from_str_radix(&hex, 16).ok().filter(|_| hex.len() == 4) {
                            Some(code) => {
                                self.pos += 4;
                                self.push_code_unit(&mut text, code);
                            }
                            None => text.push('u'),
                        }
                    }
                    Some(other) => text.push(other),
                    None => break,
                }
                self.pos += 1;
                continue;
            }

            if closes(open, c) && self.is_closing_quote(open) {
                self.pos += 1;
                push_json_string(&mut self.out, &text);
                return;
            }

            text.push(c);
            self.pos += 1;
        }

        // Unterminated string: close it at end of input
        push_json_string(&mut self.out, &text);
    }

    /// Decode a `\uXXXX` escape, pairing UTF-16 surrogates when possible.
    fn push_code_unit(&mut self, text: &mut String, code: u32) {
        if (0xD800..0xDC00).contains(&code)
            && self.peek_at(1) == Some('\\')
            && self.peek_at(2) == Some('u')
        {
            let low: String = self.chars.iter().skip(self.pos + 3).take(4).collect();
            if let Ok(low) = u32::from_str_radix(&low, 16) {
                if (0xDC00..0xE000).contains(&low) {
                    let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                    if let Some(c) = char::from_u32(combined) {
                        text.push(c);
                        self.pos += 6;
                        return;
                    }
                }
            }
        }
        text.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
    }

    fn parse_number(&mut self) {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') {
                self.pos += 1;
            } else {
                break;
            }
        }
        let raw: String = self.chars[start..self.pos].iter().collect();

        if serde_json::from_str::<serde_json::Number>(&raw).is_ok() {
            self.out.push_str(&raw);
            return;
        }
        // Near-miss like `1.` or `01`
        match raw
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
        {
            Some(n) => self.out.push_str(&n.to_string()),
            None => push_json_string(&mut self.out, &raw),
        }
    }

    /// Bare word: a literal, a Python-style literal, or an unquoted string.
    fn parse_word(&mut self) {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, ',' | '}' | ']' | '\n' | '\r') {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            self.pos += 1;
            self.out.push_str("null");
            return;
        }
        let raw: String = self.chars[start..self.pos].iter().collect();
        let word = raw.trim();
        let literal = match word {
            "true" | "True" => Some("true"),
            "false" | "False" => Some("false"),
            "null" | "None" | "undefined" | "NaN" | "Infinity" => Some("null"),
            _ => None,
        };
        match literal {
            Some(lit) => self.out.push_str(lit),
            None => push_json_string(&mut self.out, word),
        }
    }
}

fn is_quote(c: char) -> bool {
    matches!(c, '"' | '\'' | '\u{201C}' | '\u{201D}')
}

fn closes(open: char, c: char) -> bool {
    match open {
        '\'' => c == '\'',
        '\u{201C}' | '\u{201D}' => c == '\u{201D}' || c == '"',
        _ => c == '"',
    }
}

/// Append `text` as a JSON string literal.
fn push_json_string(out: &mut String, text: &str) {
    // serde_json never fails to serialize a str
    match serde_json::to_string(text) {
        Ok(quoted) => out.push_str(&quoted),
        Err(_) => out.push_str("\"\""),
    }
}
