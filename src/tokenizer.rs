//! Line-oriented tokenizer for the tape-machine program grammar.
//!
//! Strictly one-pass and forward-only: [`Tokenizer::current`] returns
//! whatever [`Tokenizer::next`] last produced, no lookahead or rewinding.
//! Ported from `original_source/day25/tokenizer.cpp`'s seven fixed regexes.

use once_cell::sync::Lazy;
use regex::Regex;
use std::io::BufRead;

/// The kind of a token produced by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    InitialState,
    ChecksumDelay,
    StateDeclaration,
    StateRequirement,
    StateWrite,
    StateMovement,
    StateNext,
    Error,
    EndOfStream,
}

/// A single token: its kind, the captured argument (if any), its 1-based
/// line number, and the raw source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub arg: String,
    pub line_number: u32,
    pub raw_text: String,
}

impl Token {
    fn end_of_stream(line_number: u32) -> Token {
        Token {
            kind: TokenKind::EndOfStream,
            arg: String::new(),
            line_number,
            raw_text: String::new(),
        }
    }
}

struct TokenExpression {
    regex: &'static Regex,
    kind: TokenKind,
}

static INITIAL_STATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Begin in state ([A-Za-z0-9]+)\.$").unwrap());
static CHECKSUM_DELAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Perform a diagnostic checksum after ([0-9]+) steps\.$").unwrap()
});
static STATE_DECLARATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^In state ([A-Za-z0-9]+):$").unwrap());
static STATE_REQUIREMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*If the current value is ([01]):$").unwrap());
static STATE_WRITE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*- Write the value ([01])\.$").unwrap());
static STATE_MOVEMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*- Move one slot to the (left|right)\.$").unwrap());
static STATE_NEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*- Continue with state ([A-Za-z0-9]+)\.$").unwrap());

static TOKEN_EXPRESSIONS: Lazy<Vec<TokenExpression>> = Lazy::new(|| {
    vec![
        TokenExpression {
            regex: &INITIAL_STATE_RE,
            kind: TokenKind::InitialState,
        },
        TokenExpression {
            regex: &CHECKSUM_DELAY_RE,
            kind: TokenKind::ChecksumDelay,
        },
        TokenExpression {
            regex: &STATE_DECLARATION_RE,
            kind: TokenKind::StateDeclaration,
        },
        TokenExpression {
            regex: &STATE_REQUIREMENT_RE,
            kind: TokenKind::StateRequirement,
        },
        TokenExpression {
            regex: &STATE_WRITE_RE,
            kind: TokenKind::StateWrite,
        },
        TokenExpression {
            regex: &STATE_MOVEMENT_RE,
            kind: TokenKind::StateMovement,
        },
        TokenExpression {
            regex: &STATE_NEXT_RE,
            kind: TokenKind::StateNext,
        },
    ]
});

/// Classifies lines read from a `BufRead` source into [`Token`]s.
pub struct Tokenizer<R: BufRead> {
    source: R,
    line_number: u32,
    current: Token,
}

impl<R: BufRead> Tokenizer<R> {
    pub fn new(source: R) -> Self {
        Tokenizer {
            source,
            line_number: 0,
            current: Token::end_of_stream(0),
        }
    }

    /// Reads the next non-empty line and classifies it, advancing the
    /// cursor. Returns the token that [`Tokenizer::current`] will also
    /// return until the next call.
    pub fn next(&mut self) -> &Token {
        let mut line = String::new();
        loop {
            line.clear();
            let bytes_read = self.source.read_line(&mut line).unwrap_or(0);
            if bytes_read == 0 {
                self.current = Token::end_of_stream(self.line_number);
                return &self.current;
            }
            self.line_number += 1;
            let trimmed = line.trim_end_matches(['\n', '\r']);
            if !trimmed.trim().is_empty() {
                line = trimmed.to_string();
                break;
            }
        }

        let mut kind = TokenKind::Error;
        let mut arg = String::new();
        for expr in TOKEN_EXPRESSIONS.iter() {
            if let Some(captures) = expr.regex.captures(&line) {
                kind = expr.kind;
                if let Some(group) = captures.get(1) {
                    arg = group.as_str().to_string();
                }
                break;
            }
        }

        self.current = Token {
            kind,
            arg,
            line_number: self.line_number,
            raw_text: line,
        };
        &self.current
    }

    /// Returns whatever [`Tokenizer::next`] last produced.
    pub fn current(&self) -> &Token {
        &self.current
    }
}
