//! Turns a [`Tokenizer`] stream into a validated [`Program`].
//!
//! A simple pushdown without recursion, ported from
//! `original_source/day25/parser.cpp`. Unlike the original's sentinel
//! `ParserState` object, failures propagate as `Result<Program, ParseError>`.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::io::BufRead;

use crate::program::{Program, State, StateAction};
use crate::tokenizer::{Token, TokenKind, Tokenizer};

/// A parse failure, carrying the 1-based line number of the offending
/// token and a human-readable diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: u32,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl Error for ParseError {}

impl ParseError {
    fn at(token: &Token, message: impl Into<String>) -> ParseError {
        ParseError {
            line: token.line_number,
            message: message.into(),
        }
    }
}

/// Parses a complete program out of `source`.
pub fn parse<R: BufRead>(source: R) -> Result<Program, ParseError> {
    Parser::new(Tokenizer::new(source)).parse()
}

struct Parser<R: BufRead> {
    tokenizer: Tokenizer<R>,
    initial_state: Option<String>,
    checksum_delay: Option<u32>,
    states: BTreeMap<String, State>,
}

impl<R: BufRead> Parser<R> {
    fn new(tokenizer: Tokenizer<R>) -> Self {
        Parser {
            tokenizer,
            initial_state: None,
            checksum_delay: None,
            states: BTreeMap::new(),
        }
    }

    fn parse(mut self) -> Result<Program, ParseError> {
        loop {
            let token = self.tokenizer.next().clone();
            match token.kind {
                TokenKind::EndOfStream => return self.finalize(&token),
                TokenKind::Error => {
                    return Err(ParseError::at(&token, "Invalid token."));
                }
                TokenKind::InitialState => {
                    if self.initial_state.is_some() {
                        return Err(ParseError::at(
                            &token,
                            "Multiple initial state declarations.",
                        ));
                    }
                    self.initial_state = Some(token.arg.clone());
                }
                TokenKind::ChecksumDelay => {
                    if self.checksum_delay.is_some() {
                        return Err(ParseError::at(&token, "Multiple checksum declarations."));
                    }
                    let delay = token.arg.parse::<u32>().map_err(|_| {
                        ParseError::at(&token, "Checksum delay is not a valid number.")
                    })?;
                    self.checksum_delay = Some(delay);
                }
                TokenKind::StateDeclaration => {
                    self.parse_state(&token)?;
                }
                _ => {
                    return Err(ParseError::at(
                        &token,
                        "Syntax error. Expected 'In State...' block.",
                    ));
                }
            }
        }
    }

    fn parse_state(&mut self, declaration: &Token) -> Result<(), ParseError> {
        let name = declaration.arg.clone();
        if self.states.contains_key(&name) {
            return Err(ParseError::at(
                declaration,
                format!("Multiple definitions encountered for state {name}"),
            ));
        }

        let mut actions = BTreeMap::new();
        for slot in 0u8..=1 {
            let requirement = self.tokenizer.next().clone();
            if requirement.kind != TokenKind::StateRequirement {
                return Err(ParseError::at(
                    &requirement,
                    "Expected exactly two 'If the current value is...' blocks after state declaration.",
                ));
            }

            let write = self.tokenizer.next().clone();
            if write.kind != TokenKind::StateWrite {
                return Err(ParseError::at(
                    &write,
                    "Expected '- Write the value...' as first line in action block.",
                ));
            }

            let movement = self.tokenizer.next().clone();
            if movement.kind != TokenKind::StateMovement {
                return Err(ParseError::at(
                    &movement,
                    "Expected '- Move one slot...' as second line in action block.",
                ));
            }

            let next = self.tokenizer.next().clone();
            if next.kind != TokenKind::StateNext {
                return Err(ParseError::at(
                    &next,
                    "Expected '- Continue with state...' as third line in action block.",
                ));
            }

            actions.insert(
                slot,
                StateAction {
                    slot_condition: slot,
                    write_value: write.arg.parse::<u8>().unwrap_or(0),
                    move_direction: if movement.arg == "right" { 1 } else { -1 },
                    next_state: next.arg.clone(),
                },
            );
        }

        self.states.insert(name.clone(), State { name, actions });
        Ok(())
    }

    fn finalize(self, eof_token: &Token) -> Result<Program, ParseError> {
        if self.initial_state.is_none() {
            return Err(ParseError::at(eof_token, "Initial state not defined."));
        }
        if self.checksum_delay.is_none() {
            return Err(ParseError::at(
                eof_token,
                "Delay until checksum not defined.",
            ));
        }

        for state in self.states.values() {
            for action in state.actions.values() {
                if !self.states.contains_key(&action.next_state) {
                    return Err(ParseError::at(
                        eof_token,
                        format!(
                            "Actions for state {} refer to state {}, which is undefined",
                            state.name, action.next_state
                        ),
                    ));
                }
            }
        }

        let initial_state = self.initial_state.unwrap();
        if !self.states.contains_key(&initial_state) {
            return Err(ParseError::at(
                eof_token,
                format!(
                    "Program specifies initial state {initial_state}, which does not exist."
                ),
            ));
        }

        Ok(Program {
            initial_state,
            checksum_delay: self.checksum_delay.unwrap(),
            states: self.states,
        })
    }
}
