//! Tokenizer for SVG path data strings.
//!
//! Produces a flat list of [`RawCommand`]s with implicit operand repeats
//! already split into separate commands.

use pathforge_core::PathError;

use super::command::CommandType;

/// A command letter with its operands as written (relative values untouched).
#[derive(Debug, Clone, PartialEq)]
pub struct RawCommand {
    pub letter: char,
    pub values: Vec<f64>,
}

impl RawCommand {
    pub fn new(letter: char, values: impl Into<Vec<f64>>) -> Self {
        Self {
            letter,
            values: values.into(),
        }
    }
}

struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn skip_separators(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b.is_ascii_whitespace() || b == b',' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn at_end(&mut self) -> bool {
        self.skip_separators();
        self.pos >= self.bytes.len()
    }

    fn peek_is_number(&mut self) -> bool {
        self.skip_separators();
        matches!(
            self.bytes.get(self.pos),
            Some(b'0'..=b'9' | b'-' | b'+' | b'.')
        )
    }

    fn error(&self, reason: impl Into<String>) -> PathError {
        PathError::Parse {
            offset: self.pos,
            reason: reason.into(),
        }
    }

    fn letter(&mut self) -> Result<char, PathError> {
        self.skip_separators();
        let Some(&b) = self.bytes.get(self.pos) else {
            return Err(self.error("unexpected end of input"));
        };
        let c = b as char;
        if CommandType::from_letter(c).is_none() {
            return Err(self.error(format!("unexpected character '{c}'")));
        }
        self.pos += 1;
        Ok(c)
    }

    /// Arc flags may be packed without separators (`a1 1 0 11 5 5`).
    fn flag(&mut self) -> Result<f64, PathError> {
        self.skip_separators();
        match self.bytes.get(self.pos) {
            Some(b'0') => {
                self.pos += 1;
                Ok(0.0)
            }
            Some(b'1') => {
                self.pos += 1;
                Ok(1.0)
            }
            _ => Err(self.error("expected arc flag")),
        }
    }

    fn number(&mut self) -> Result<f64, PathError> {
        self.skip_separators();
        let start = self.pos;
        let mut end = self.pos;
        let bytes = self.bytes;

        if matches!(bytes.get(end), Some(b'-' | b'+')) {
            end += 1;
        }
        let mut digits = 0;
        while matches!(bytes.get(end), Some(b'0'..=b'9')) {
            end += 1;
            digits += 1;
        }
        if bytes.get(end) == Some(&b'.') {
            end += 1;
            while matches!(bytes.get(end), Some(b'0'..=b'9')) {
                end += 1;
                digits += 1;
            }
        }
        if digits == 0 {
            return Err(self.error("expected number"));
        }
        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            let mut exp = end + 1;
            if matches!(bytes.get(exp), Some(b'-' | b'+')) {
                exp += 1;
            }
            if matches!(bytes.get(exp), Some(b'0'..=b'9')) {
                while matches!(bytes.get(exp), Some(b'0'..=b'9')) {
                    exp += 1;
                }
                end = exp;
            }
        }

        let text = std::str::from_utf8(&bytes[start..end]).map_err(|e| self.error(e.to_string()))?;
        let value = text
            .parse::<f64>()
            .map_err(|e| self.error(format!("invalid number '{text}': {e}")))?;
        self.pos = end;
        Ok(value)
    }

    fn operands(&mut self, kind: CommandType) -> Result<Vec<f64>, PathError> {
        let count = kind.operand_count();
        let mut values = Vec::with_capacity(count);
        for i in 0..count {
            let value = if kind == CommandType::ArcTo && (i == 3 || i == 4) {
                self.flag()?
            } else {
                self.number()?
            };
            values.push(value);
        }
        Ok(values)
    }
}

/// Parses path data, stopping at the first malformed token.
///
/// Returns the commands read so far alongside the error, if any.
fn parse_partial(input: &str) -> (Vec<RawCommand>, Option<PathError>) {
    let mut lexer = Lexer::new(input);
    let mut commands = Vec::new();

    while !lexer.at_end() {
        let letter = match lexer.letter() {
            Ok(letter) => letter,
            Err(e) => return (commands, Some(e)),
        };
        let Some((kind, relative)) = CommandType::from_letter(letter) else {
            return (commands, Some(lexer.error("unknown command")));
        };

        if kind == CommandType::Close {
            commands.push(RawCommand::new(letter, Vec::new()));
            continue;
        }

        let mut current = letter;
        loop {
            match lexer.operands(kind) {
                Ok(values) => commands.push(RawCommand::new(current, values)),
                Err(e) => return (commands, Some(e)),
            }
            if !lexer.peek_is_number() {
                break;
            }
            if kind == CommandType::MoveTo {
                current = if relative { 'l' } else { 'L' };
            }
        }
    }

    (commands, None)
}

/// Strict parse: any malformed token is an error.
pub fn parse_path(input: &str) -> Result<Vec<RawCommand>, PathError> {
    match parse_partial(input) {
        (commands, None) => Ok(commands),
        (_, Some(err)) => Err(err),
    }
}

/// Best-effort parse: keeps everything read before the first bad token.
pub fn parse_path_lossy(input: &str) -> Vec<RawCommand> {
    let (commands, err) = parse_partial(input);
    if let Some(err) = err {
        tracing::warn!(%err, kept = commands.len(), "Malformed path data truncated");
    }
    commands
}
