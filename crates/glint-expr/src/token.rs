//! Lexical tokens.
//!
//! Every token exposes a short placeholder string; the pattern matcher works
//! entirely on the space-joined placeholders of the current element
//! sequence, never on the raw source. Value-carrying tokens use a
//! type-hierarchy placeholder (`$token>ident` etc.) so grammar patterns can
//! reference them the same way they reference expression kinds; operator
//! tokens are their own placeholder.

use std::fmt;

use glint_data::Value;

/// Reserved words. A keyword identifier exposes the keyword itself as its
/// placeholder instead of the identifier hierarchy, so grammar patterns can
/// match on the literal word.
pub const KEYWORDS: &[&str] = &[
    "if", "else", "while", "for", "return", "break", "continue", "int", "float", "bool",
    "string", "void", "true", "false",
];

/// Placeholder of whitespace tokens; patterns insert `(?:W )*` between parts
/// to tolerate free-form spacing.
pub const WHITESPACE_PLACEHOLDER: char = 'W';

pub(crate) const IDENT_PLACEHOLDER: &str = "$token>ident";
pub(crate) const STRING_PLACEHOLDER: &str = "$token>string";
pub(crate) const NUMBER_PLACEHOLDER: &str = "$token>number";

/// The closed set of single-character operator/punctuation tokens, in
/// declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleChar {
    Plus,
    Minus,
    Mult,
    Divide,
    Modulo,
    Power,
    LParen,
    RParen,
    Assign,
    Greater,
    Smaller,
    And,
    Or,
    Not,
    Dot,
    Cond,
    Alt,
}

impl SingleChar {
    pub const VALUES: [SingleChar; 17] = [
        SingleChar::Plus,
        SingleChar::Minus,
        SingleChar::Mult,
        SingleChar::Divide,
        SingleChar::Modulo,
        SingleChar::Power,
        SingleChar::LParen,
        SingleChar::RParen,
        SingleChar::Assign,
        SingleChar::Greater,
        SingleChar::Smaller,
        SingleChar::And,
        SingleChar::Or,
        SingleChar::Not,
        SingleChar::Dot,
        SingleChar::Cond,
        SingleChar::Alt,
    ];

    pub fn as_char(self) -> char {
        match self {
            SingleChar::Plus => '+',
            SingleChar::Minus => '-',
            SingleChar::Mult => '*',
            SingleChar::Divide => '/',
            SingleChar::Modulo => '%',
            SingleChar::Power => '^',
            SingleChar::LParen => '(',
            SingleChar::RParen => ')',
            SingleChar::Assign => '=',
            SingleChar::Greater => '>',
            SingleChar::Smaller => '<',
            SingleChar::And => '&',
            SingleChar::Or => '|',
            SingleChar::Not => '!',
            SingleChar::Dot => '.',
            SingleChar::Cond => '?',
            SingleChar::Alt => ':',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        Self::VALUES.into_iter().find(|value| value.as_char() == c)
    }
}

/// The closed set of two-character operator tokens, each composed of two
/// `SingleChar`s. Declaration order is the coalescing pass order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiChar {
    Equals,
    NotEquals,
    LogicalAnd,
    LogicalOr,
    GreaterOrEqual,
    SmallerOrEqual,
}

impl MultiChar {
    pub const VALUES: [MultiChar; 6] = [
        MultiChar::Equals,
        MultiChar::NotEquals,
        MultiChar::LogicalAnd,
        MultiChar::LogicalOr,
        MultiChar::GreaterOrEqual,
        MultiChar::SmallerOrEqual,
    ];

    pub fn parts(self) -> (SingleChar, SingleChar) {
        match self {
            MultiChar::Equals => (SingleChar::Assign, SingleChar::Assign),
            MultiChar::NotEquals => (SingleChar::Not, SingleChar::Assign),
            MultiChar::LogicalAnd => (SingleChar::And, SingleChar::And),
            MultiChar::LogicalOr => (SingleChar::Or, SingleChar::Or),
            MultiChar::GreaterOrEqual => (SingleChar::Greater, SingleChar::Assign),
            MultiChar::SmallerOrEqual => (SingleChar::Smaller, SingleChar::Assign),
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            MultiChar::Equals => "==",
            MultiChar::NotEquals => "!=",
            MultiChar::LogicalAnd => "&&",
            MultiChar::LogicalOr => "||",
            MultiChar::GreaterOrEqual => ">=",
            MultiChar::SmallerOrEqual => "<=",
        }
    }
}

/// A lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Bare word: a keyword or a variable name.
    Identifier(String),

    /// Content of a double-quoted literal, quotes stripped, no escape
    /// processing.
    Str(String),

    /// Numeric literal after suffix resolution; the value keeps its exact
    /// numeric kind.
    Number(Value),

    /// A single whitespace character, kept as its own token so patterns can
    /// require or tolerate spacing.
    Whitespace(char),

    Single(SingleChar),

    Multi(MultiChar),
}

impl Token {
    pub fn is_keyword(text: &str) -> bool {
        KEYWORDS.contains(&text)
    }

    /// The placeholder this token contributes to the matching string.
    pub fn placeholder(&self) -> String {
        match self {
            Token::Identifier(text) if Self::is_keyword(text) => text.clone(),
            Token::Identifier(_) => IDENT_PLACEHOLDER.to_string(),
            Token::Str(_) => STRING_PLACEHOLDER.to_string(),
            Token::Number(_) => NUMBER_PLACEHOLDER.to_string(),
            Token::Whitespace(_) => WHITESPACE_PLACEHOLDER.to_string(),
            Token::Single(c) => c.as_char().to_string(),
            Token::Multi(m) => m.text().to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(text) => f.write_str(text),
            Token::Str(value) => write!(f, "\"{value}\""),
            Token::Number(value) => write!(f, "{value}"),
            Token::Whitespace(c) => write!(f, "{c}"),
            Token::Single(c) => write!(f, "{}", c.as_char()),
            Token::Multi(m) => f.write_str(m.text()),
        }
    }
}
