//! Pattern matching over the element sequence.
//!
//! The sequence is flattened into its space-joined placeholder string and
//! each compiled pattern is tried in priority order. The first pattern that
//! matches anywhere wins; its matched span is replaced by a single
//! expression node built from the capture groups, and the caller loops
//! until no pattern matches.

use std::ops::Range;
use std::sync::Arc;

use crate::expr::{Arg, Expression};
use crate::pattern::Registry;
use crate::result::{ParseResult, ParsedElement};
use crate::token::Token;

/// Apply the highest-priority matching production once. Returns whether a
/// reduction happened.
pub(crate) fn reduce_once(result: &mut ParseResult, registry: &Registry) -> bool {
    let (haystack, spans) = matching_string(result.elements());

    for pattern in registry.patterns() {
        let Some(caps) = pattern.regex.captures(&haystack) else {
            continue;
        };
        let whole = caps.get(0).expect("group 0 always participates");
        let replaced = elements_in(&spans, whole.range());

        let args = (1..caps.len())
            .filter_map(|i| caps.get(i))
            .map(|group| capture_arg(result.elements(), &spans, group.range()))
            .collect();

        let expr = Arc::new(Expression::build(pattern.kind, args));
        result.replace_range(replaced.start, replaced.len(), ParsedElement::Expr(expr));
        return true;
    }

    false
}

/// The space-joined placeholder string plus the byte span each element's
/// placeholder occupies in it.
fn matching_string(elements: &[ParsedElement]) -> (String, Vec<Range<usize>>) {
    let mut text = String::new();
    let mut spans = Vec::with_capacity(elements.len());
    for element in elements {
        if !text.is_empty() {
            text.push(' ');
        }
        let start = text.len();
        text.push_str(&element.placeholder());
        spans.push(start..text.len());
    }
    (text, spans)
}

/// The range of elements whose placeholders overlap a matched byte range.
fn elements_in(spans: &[Range<usize>], range: Range<usize>) -> Range<usize> {
    let overlaps = |s: &Range<usize>| s.start < range.end && range.start < s.end;
    let start = spans.iter().position(|s| overlaps(s)).unwrap_or(0);
    let end = spans
        .iter()
        .rposition(|s| overlaps(s))
        .map_or(start, |last| last + 1);
    start..end
}

/// Turn one capture group into a build argument. Operator and whitespace
/// tokens inside the group are matching scaffolding, not arguments, and
/// are dropped; a group left with several elements becomes a list.
fn capture_arg(
    elements: &[ParsedElement],
    spans: &[Range<usize>],
    range: Range<usize>,
) -> Arg {
    let captured = elements_in(spans, range);
    let mut args: Vec<Arg> = elements[captured]
        .iter()
        .filter(|element| is_argument(element))
        .map(|element| Arg::Element(element.clone()))
        .collect();
    if args.len() == 1 {
        args.pop().expect("length checked")
    } else {
        Arg::List(args)
    }
}

fn is_argument(element: &ParsedElement) -> bool {
    match element {
        ParsedElement::Expr(_) => true,
        ParsedElement::Token(token) => matches!(
            token,
            Token::Identifier(_) | Token::Str(_) | Token::Number(_)
        ),
    }
}
