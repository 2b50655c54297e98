//! The parser entry points.
//!
//! Parsing is tokenize-then-reduce: the token sequence is rewritten by the
//! grammar until no production matches, and whatever remains is checked. A
//! clean parse leaves exactly one expression element. Whitespace between
//! operands is consumed by the productions themselves; leading or trailing
//! whitespace has no production to claim it and is reported unresolved.

use crate::expr::ExprRef;
use crate::grammar;
use crate::matcher::reduce_once;
use crate::result::{ParseException, ParseResult};
use crate::tokenizer::tokenize;

/// Parse a source string, keeping the full result for span and position
/// queries. Never panics; failures accumulate on the result. Reduction
/// runs even when tokenization recorded diagnostics, so partially broken
/// input still yields the best tree it can.
pub fn parse(source: &str) -> ParseResult {
    let mut result = tokenize(source);

    let registry = grammar::registry();
    while reduce_once(&mut result, registry) {}

    check_residue(&mut result);
    result
}

/// Parse a source string down to its root expression.
pub fn try_parse(source: &str) -> Result<ExprRef, ParseException> {
    let result = parse(source);
    if let Some(expr) = result.expression() {
        return Ok(ExprRef::clone(expr));
    }
    Err(result
        .exception()
        .cloned()
        .expect("a parse without a root expression records a diagnostic"))
}

/// Diagnose whatever the grammar could not consume. Every leftover token
/// is unresolved; when only expressions remain there are too many of them,
/// reported once from the second expression to the end of the source.
fn check_residue(result: &mut ParseResult) {
    if result.is_empty() {
        let end = result.source().len();
        result.add_exception_message("Empty expression", 0, end);
        return;
    }
    if result.len() == 1 && result.elements()[0].is_expr() {
        return;
    }

    let unresolved: Vec<(usize, usize)> = result
        .elements()
        .iter()
        .enumerate()
        .filter(|(_, element)| !element.is_expr())
        .map(|(i, _)| (result.source_start_index(i), result.source_end_index(i)))
        .collect();

    if unresolved.is_empty() {
        let start = result.source_start_index(1);
        let end = result.source().len();
        result.add_exception_message(
            "Cannot have more than one expression in an expression",
            start,
            end,
        );
    } else {
        for (start, end) in unresolved {
            result.add_exception_message("Unresolved token", start, end);
        }
    }
}
