//! Parse results and parse-time diagnostics.
//!
//! `ParseResult` owns the live element sequence the reducer shrinks, plus
//! the bookkeeping that maps elements back to source offsets after any
//! number of reductions: a parallel start-offset vector (one entry per
//! original token boundary) and a position → expression map for tooling.

use std::collections::HashMap;

use crate::expr::ExprRef;
use crate::token::Token;

/// Anything that can appear in the element sequence during parsing: a raw
/// token, or an expression node produced by a reduction.
#[derive(Debug, Clone)]
pub enum ParsedElement {
    Token(Token),
    Expr(ExprRef),
}

impl ParsedElement {
    /// The placeholder this element contributes to the matching string.
    pub fn placeholder(&self) -> String {
        match self {
            ParsedElement::Token(token) => token.placeholder(),
            ParsedElement::Expr(expr) => expr.placeholder(),
        }
    }

    pub fn is_expr(&self) -> bool {
        matches!(self, ParsedElement::Expr(_))
    }

    pub fn as_expr(&self) -> Option<&ExprRef> {
        match self {
            ParsedElement::Expr(expr) => Some(expr),
            ParsedElement::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            ParsedElement::Token(token) => Some(token),
            ParsedElement::Expr(_) => None,
        }
    }
}

/// Accumulated parse-time diagnostics: an ordered list of messages, each
/// anchored to a source offset range. Collecting a message is never fatal;
/// several may accumulate in one parse attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", self.summary())]
pub struct ParseException {
    messages: Vec<ParseMessage>,
}

/// One diagnostic with its source span (byte offsets).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMessage {
    pub message: String,
    pub start: usize,
    pub end: usize,
}

impl ParseException {
    fn new() -> Self {
        Self { messages: Vec::new() }
    }

    fn add(&mut self, message: String, start: usize, end: usize) {
        self.messages.push(ParseMessage { message, start, end });
    }

    pub fn messages(&self) -> &[ParseMessage] {
        &self.messages
    }

    fn summary(&self) -> String {
        match self.messages.as_slice() {
            [] => "parse failed".to_string(),
            [only] => format!("{} at {}..{}", only.message, only.start, only.end),
            [first, rest @ ..] => format!(
                "{} at {}..{} (and {} more)",
                first.message,
                first.start,
                first.end,
                rest.len()
            ),
        }
    }
}

/// The evolving result of one parse attempt.
///
/// Starts as a flat token sequence and shrinks as reductions replace
/// matched spans with single expression nodes. A fully successful parse
/// ends with exactly one expression element and no exception.
#[derive(Debug)]
pub struct ParseResult {
    source: String,
    elements: Vec<ParsedElement>,
    // Start offsets of the elements in the source. Always one entry longer
    // than `elements`: entry i is where element i starts, entry i+1 where it
    // ends. Reductions collapse interior entries but keep the outer two, so
    // spans stay mappable after any number of reductions.
    source_indexes: Vec<usize>,
    // Which expression owns each source byte; the innermost (first-written)
    // expression wins, used by tooling to resolve the node under a cursor.
    expressions_at: HashMap<usize, ExprRef>,
    exception: Option<ParseException>,
}

impl ParseResult {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            elements: Vec::new(),
            // The first token always starts at offset 0; each add pushes the
            // start of the next token.
            source_indexes: vec![0],
            expressions_at: HashMap::new(),
            exception: None,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[ParsedElement] {
        &self.elements
    }

    /// True iff no diagnostic accumulated.
    pub fn success(&self) -> bool {
        self.exception.is_none()
    }

    /// The single root expression of a successful parse.
    pub fn expression(&self) -> Option<&ExprRef> {
        if self.success() && self.elements.len() == 1 {
            self.elements[0].as_expr()
        } else {
            None
        }
    }

    pub fn exception(&self) -> Option<&ParseException> {
        self.exception.as_ref()
    }

    /// The expression owning a given source byte, for tooling.
    pub fn expression_at(&self, position: usize) -> Option<&ExprRef> {
        self.expressions_at.get(&position)
    }

    /// Start offset of element `index`. Accepts `index == len()` (the end
    /// of the last element).
    pub fn source_start_index(&self, index: usize) -> usize {
        self.source_indexes[index]
    }

    /// Exclusive end offset of element `index`. The last element always
    /// ends at the source length, even when trailing input produced no
    /// token of its own.
    pub fn source_end_index(&self, index: usize) -> usize {
        if index + 1 >= self.elements.len() {
            self.source.len()
        } else {
            self.source_indexes[index + 1]
        }
    }

    /// Append a token during tokenization. `end_index` is the exclusive end
    /// offset of the token, which is also the start of the next one.
    pub(crate) fn add(&mut self, token: Token, end_index: usize) {
        self.elements.push(ParsedElement::Token(token));
        self.source_indexes.push(end_index);
    }

    pub(crate) fn replace(&mut self, index: usize, element: ParsedElement) {
        self.replace_range(index, 1, element);
    }

    /// Replace `count` elements starting at `start_index` with one new
    /// element, collapsing the interior source offsets and updating the
    /// position → expression map.
    pub(crate) fn replace_range(&mut self, start_index: usize, count: usize, element: ParsedElement) {
        self.elements.drain(start_index..start_index + count);
        self.elements.insert(start_index, element);

        // The start of the first element and of the element after the span
        // are unchanged; only interior boundaries disappear.
        self.source_indexes.drain(start_index + 1..start_index + count);

        if let ParsedElement::Expr(expr) = &self.elements[start_index] {
            for position in self.source_indexes[start_index]..self.source_indexes[start_index + 1] {
                // Never overwrite an existing mapping: the innermost
                // expression at each position takes priority, unless the new
                // node hides its children from inspection.
                if expr.hides_inspected_children() || !self.expressions_at.contains_key(&position)
                {
                    self.expressions_at.insert(position, ExprRef::clone(expr));
                }
            }
        }
    }

    pub(crate) fn add_exception_message(
        &mut self,
        message: impl Into<String>,
        start: usize,
        end: usize,
    ) {
        self.exception
            .get_or_insert_with(ParseException::new)
            .add(message.into(), start, end);
    }
}
