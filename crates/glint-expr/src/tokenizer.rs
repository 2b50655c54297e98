//! Tokenizer.
//!
//! Single left-to-right scan with a pending-identifier buffer, followed by
//! two post-passes over the token sequence: multi-character operator
//! coalescing and number literal resolution. Tokenizing never fails; bad
//! input is recorded on the `ParseResult` and the scan completes.

use once_cell::sync::Lazy;
use regex::Regex;

use glint_data::Value;

use crate::result::{ParseResult, ParsedElement};
use crate::token::{MultiChar, SingleChar, Token};

// Integer and fractional literal shapes. The suffix group is deliberately
// wider than the valid suffix letters so `5x` is reported as a bad suffix
// instead of silently staying an identifier.
static INT_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)([a-zA-Z]?)$").expect("literal regex"));
static FRAC_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]*\.[0-9]+)([a-zA-Z]?)$").expect("literal regex"));

/// Tokenize a source string into a fresh `ParseResult` with zero reductions
/// applied.
pub fn tokenize(source: &str) -> ParseResult {
    let mut result = ParseResult::new(source);

    let mut pending = String::new();
    let mut in_string = false;

    for (i, c) in source.char_indices() {
        if c == '"' {
            if in_string {
                // Closing quote: the literal's span includes both quotes.
                result.add(Token::Str(std::mem::take(&mut pending)), i + 1);
                in_string = false;
            } else {
                flush_pending(&mut result, &mut pending, i);
                in_string = true;
            }
        } else if in_string {
            // Everything inside a string accumulates verbatim, no escapes.
            pending.push(c);
        } else if c.is_whitespace() {
            flush_pending(&mut result, &mut pending, i);
            result.add(Token::Whitespace(c), i + c.len_utf8());
        } else if let Some(single) = SingleChar::from_char(c) {
            flush_pending(&mut result, &mut pending, i);
            result.add(Token::Single(single), i + 1);
        } else {
            pending.push(c);
        }
    }

    if in_string {
        // Recoverable: record where the string opened and keep scanning
        // state as-is; the partial content still flushes below.
        let start = result.source_start_index(result.len());
        result.add_exception_message("Unterminated string", start, source.len());
    }
    if !pending.is_empty() {
        result.add(Token::Identifier(std::mem::take(&mut pending)), source.len());
    }

    coalesce_multi_char(&mut result);
    resolve_numbers(&mut result);

    result
}

fn flush_pending(result: &mut ParseResult, pending: &mut String, end_index: usize) {
    if !pending.is_empty() {
        result.add(Token::Identifier(std::mem::take(pending)), end_index);
    }
}

/// Post-pass 1: replace adjacent single-char token pairs with their
/// two-character operator token.
///
/// Operators are processed one at a time in declaration order, each scanned
/// earliest-first and non-overlapping until no pair remains. The order is
/// load-bearing: `===` becomes `==` `=` because `==` is coalesced before
/// anything else gets a look at the middle character.
fn coalesce_multi_char(result: &mut ParseResult) {
    for multi in MultiChar::VALUES {
        let (first, second) = multi.parts();
        let mut i = 0;
        while i + 1 < result.len() {
            let pair = (&result.elements()[i], &result.elements()[i + 1]);
            if let (
                ParsedElement::Token(Token::Single(a)),
                ParsedElement::Token(Token::Single(b)),
            ) = pair
            {
                if *a == first && *b == second {
                    result.replace_range(i, 2, ParsedElement::Token(Token::Multi(multi)));
                }
            }
            i += 1;
        }
    }
}

/// Post-pass 2: resolve identifier tokens that spell number literals.
///
/// Runs a merge step first so fractional literals survive the fact that `.`
/// is a single-char token, then resolves each numeric identifier by suffix.
/// A bad suffix or an out-of-range literal is recorded as a diagnostic and
/// halts resolution for this call; whatever identifiers remain surface later
/// as unresolved tokens.
fn resolve_numbers(result: &mut ParseResult) {
    merge_fractional_literals(result);

    for i in 0..result.len() {
        let text = match result.elements()[i].as_token() {
            Some(Token::Identifier(text)) => text.clone(),
            _ => continue,
        };

        let (fractional, captures) = match FRAC_LITERAL.captures(&text) {
            Some(captures) => (true, captures),
            None => match INT_LITERAL.captures(&text) {
                Some(captures) => (false, captures),
                None => continue,
            },
        };

        let number_text = &captures[1];
        let suffix = captures[2].chars().next();

        // A failed parse here can only mean the literal is out of range;
        // the regexes already fixed its shape.
        let value = match suffix {
            Some('l') | Some('L') => number_text.parse::<i64>().ok().map(Value::I64),
            Some('f') | Some('F') => number_text.parse::<f32>().ok().map(Value::F32),
            Some('d') | Some('D') => number_text.parse::<f64>().ok().map(Value::F64),
            None if fractional => number_text.parse::<f64>().ok().map(narrow_float),
            None => number_text.parse::<i64>().ok().map(narrow_int),
            Some(other) => {
                let (start, end) = (result.source_start_index(i), result.source_end_index(i));
                result.add_exception_message(
                    format!("{other} is not a valid number suffix"),
                    start,
                    end,
                );
                return;
            }
        };

        match value {
            Some(value) => result.replace(i, ParsedElement::Token(Token::Number(value))),
            None => {
                let (start, end) = (result.source_start_index(i), result.source_end_index(i));
                result.add_exception_message(
                    format!("{text} is out of range for a number literal"),
                    start,
                    end,
                );
                return;
            }
        }
    }
}

/// An unsuffixed integer literal narrows to 32 bits when it fits.
fn narrow_int(value: i64) -> Value {
    match i32::try_from(value) {
        Ok(narrowed) => Value::I32(narrowed),
        Err(_) => Value::I64(value),
    }
}

/// An unsuffixed fractional literal narrows to 32 bits when its magnitude
/// fits the f32 range.
fn narrow_float(value: f64) -> Value {
    if value.abs() <= f64::from(f32::MAX) {
        Value::F32(value as f32)
    } else {
        Value::F64(value)
    }
}

/// Merge `digits . digits` (and a leading `. digits` not preceded by a
/// value) back into one identifier, so `2.5f` resolves as a fractional
/// literal. A dot after a non-numeric identifier is left alone: `a.b` and
/// `2.x` stay field accesses.
fn merge_fractional_literals(result: &mut ParseResult) {
    let mut i = 0;
    while i < result.len() {
        if let Some(merged) = fractional_at(result, i) {
            let (text, span) = merged;
            result.replace_range(i, span, ParsedElement::Token(Token::Identifier(text)));
        }
        i += 1;
    }
}

fn fractional_at(result: &ParseResult, i: usize) -> Option<(String, usize)> {
    let elements = result.elements();

    let is_dot = |e: &ParsedElement| {
        matches!(e.as_token(), Some(Token::Single(SingleChar::Dot)))
    };
    let digits_of = |e: &ParsedElement| match e.as_token() {
        Some(Token::Identifier(text)) if text.bytes().all(|b| b.is_ascii_digit()) => {
            Some(text.clone())
        }
        _ => None,
    };
    // The fraction part may carry the suffix letter: `5f` in `2.5f`.
    let fraction_of = |e: &ParsedElement| match e.as_token() {
        Some(Token::Identifier(text)) if INT_LITERAL.is_match(text) => Some(text.clone()),
        _ => None,
    };

    // digits '.' digits[suffix]
    if i + 2 < elements.len() {
        if let (Some(whole), true, Some(fraction)) = (
            digits_of(&elements[i]),
            is_dot(&elements[i + 1]),
            fraction_of(&elements[i + 2]),
        ) {
            return Some((format!("{whole}.{fraction}"), 3));
        }
    }

    // '.' digits[suffix], only where the dot cannot be a field access.
    if i + 1 < elements.len() && is_dot(&elements[i]) {
        let follows_value = i > 0
            && matches!(
                elements[i - 1].as_token(),
                Some(Token::Identifier(_)) | Some(Token::Str(_)) | Some(Token::Number(_))
            );
        if !follows_value {
            if let Some(fraction) = fraction_of(&elements[i + 1]) {
                return Some((format!(".{fraction}"), 2));
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::MultiChar;
    use pretty_assertions::assert_eq;

    fn tokens(source: &str) -> Vec<Token> {
        tokenize(source)
            .elements()
            .iter()
            .map(|e| e.as_token().expect("tokenizer emits only tokens").clone())
            .collect()
    }

    #[test]
    fn test_basic_arithmetic_tokens() {
        assert_eq!(
            tokens("1 + 2"),
            vec![
                Token::Number(Value::I32(1)),
                Token::Whitespace(' '),
                Token::Single(SingleChar::Plus),
                Token::Whitespace(' '),
                Token::Number(Value::I32(2)),
            ]
        );
    }

    #[test]
    fn test_identifiers_and_operators_without_spaces() {
        assert_eq!(
            tokens("a+b"),
            vec![
                Token::Identifier("a".into()),
                Token::Single(SingleChar::Plus),
                Token::Identifier("b".into()),
            ]
        );
    }

    #[test]
    fn test_string_literal_spans_quotes() {
        let result = tokenize("\"hello world\"");
        assert_eq!(result.len(), 1);
        assert_eq!(
            result.elements()[0].as_token(),
            Some(&Token::Str("hello world".into()))
        );
        assert_eq!(result.source_start_index(0), 0);
        assert_eq!(result.source_end_index(0), 13);
    }

    #[test]
    fn test_string_contents_are_verbatim() {
        // No escape processing; operators inside strings stay text.
        assert_eq!(tokens("\"a + b?\""), vec![Token::Str("a + b?".into())]);
    }

    #[test]
    fn test_unterminated_string_is_recorded_not_fatal() {
        let result = tokenize("\"abc");
        assert!(!result.success());
        let messages = result.exception().unwrap().messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message, "Unterminated string");
        assert_eq!(messages[0].start, 0);
        assert_eq!(messages[0].end, 4);
    }

    #[test]
    fn test_multi_char_coalescing() {
        assert_eq!(
            tokens("a==b"),
            vec![
                Token::Identifier("a".into()),
                Token::Multi(MultiChar::Equals),
                Token::Identifier("b".into()),
            ]
        );
        assert_eq!(
            tokens("a>=b"),
            vec![
                Token::Identifier("a".into()),
                Token::Multi(MultiChar::GreaterOrEqual),
                Token::Identifier("b".into()),
            ]
        );
    }

    #[test]
    fn test_triple_equals_quirk() {
        // `==` is coalesced first, earliest occurrence first; the leftover
        // `=` stays a lone assign token.
        assert_eq!(
            tokens("a===b"),
            vec![
                Token::Identifier("a".into()),
                Token::Multi(MultiChar::Equals),
                Token::Single(SingleChar::Assign),
                Token::Identifier("b".into()),
            ]
        );
    }

    #[test]
    fn test_repeated_operator_pairs_all_coalesce() {
        assert_eq!(
            tokens("a == b == c"),
            vec![
                Token::Identifier("a".into()),
                Token::Whitespace(' '),
                Token::Multi(MultiChar::Equals),
                Token::Whitespace(' '),
                Token::Identifier("b".into()),
                Token::Whitespace(' '),
                Token::Multi(MultiChar::Equals),
                Token::Whitespace(' '),
                Token::Identifier("c".into()),
            ]
        );
    }

    #[test]
    fn test_integer_narrowing() {
        assert_eq!(tokens("5"), vec![Token::Number(Value::I32(5))]);
        assert_eq!(
            tokens("3000000000"),
            vec![Token::Number(Value::I64(3_000_000_000))]
        );
    }

    #[test]
    fn test_number_suffixes() {
        assert_eq!(tokens("1L"), vec![Token::Number(Value::I64(1))]);
        assert_eq!(tokens("2f"), vec![Token::Number(Value::F32(2.0))]);
        assert_eq!(tokens("2d"), vec![Token::Number(Value::F64(2.0))]);
    }

    #[test]
    fn test_fractional_literals_merge_across_dot() {
        assert_eq!(tokens("2.5"), vec![Token::Number(Value::F32(2.5))]);
        assert_eq!(tokens("2.5f"), vec![Token::Number(Value::F32(2.5))]);
        assert_eq!(tokens(".5"), vec![Token::Number(Value::F32(0.5))]);
        assert_eq!(tokens("2.5d"), vec![Token::Number(Value::F64(2.5))]);
    }

    #[test]
    fn test_dot_after_identifier_is_field_access_not_number() {
        assert_eq!(
            tokens("a.5"),
            vec![
                Token::Identifier("a".into()),
                Token::Single(SingleChar::Dot),
                Token::Number(Value::I32(5)),
            ]
        );
    }

    #[test]
    fn test_bad_number_suffix_reported_and_halts_resolution() {
        let result = tokenize("5x + 6");
        assert!(!result.success());
        let messages = result.exception().unwrap().messages();
        assert_eq!(messages[0].message, "x is not a valid number suffix");
        assert_eq!(messages[0].start, 0);
        assert_eq!(messages[0].end, 2);
        // Resolution halted: the trailing literal stays an identifier.
        assert_eq!(
            result.elements()[4].as_token(),
            Some(&Token::Identifier("6".into()))
        );
    }

    #[test]
    fn test_out_of_range_literal_reported_and_halts_resolution() {
        // Every suffix arm funnels into the same out-of-range branch.
        let result = tokenize("99999999999999999999L + 1");
        assert!(!result.success());
        let messages = result.exception().unwrap().messages();
        assert_eq!(
            messages[0].message,
            "99999999999999999999L is out of range for a number literal"
        );
        assert_eq!(
            result.elements()[4].as_token(),
            Some(&Token::Identifier("1".into()))
        );
    }

    #[test]
    fn test_keyword_is_plain_identifier_token() {
        assert_eq!(tokens("true"), vec![Token::Identifier("true".into())]);
    }
}
