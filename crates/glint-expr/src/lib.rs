//! Glint Expression Engine
//!
//! Parses and evaluates inline expressions like `coins >= price ? "buy" : "save"`.
//! Parsing is pattern-driven: the tokenizer produces a flat element
//! sequence, and the grammar repeatedly rewrites the highest-priority
//! matching span into an expression node until only the root remains.
//! Evaluation walks the finished tree against a chained [`DataContext`].
//!
//! [`DataContext`]: glint_data::DataContext

pub mod expr;
pub mod grammar;
mod matcher;
pub mod parser;
pub mod pattern;
pub mod result;
pub mod token;
pub mod tokenizer;

pub use expr::{Evaluate, EvaluationError, ExprKind, ExprRef, Expression};
pub use parser::{parse, try_parse};
pub use result::{ParseException, ParseMessage, ParseResult, ParsedElement};
pub use token::Token;
pub use tokenizer::tokenize;
