//! Grammar patterns and their compiled form.
//!
//! A pattern is authored as a regex template over the placeholder alphabet.
//! Braced references expand to placeholder fragments with an optional
//! one-level subtype suffix, so `{expr}` matches `$expr>addition` as well
//! as any other concrete kind; parenthesised groups become the arguments
//! the matched expression is built from. Every literal space widens to
//! ` (?:W )*` so any run of whitespace tokens can sit between parts.
//!
//! Recognised references: `{expr}` for any expression, `{ident}`,
//! `{string}` and `{number}` for value tokens, and any expression kind
//! name (`{variable}`, ...) for one specific kind.

use regex::Regex;

use crate::expr::ExprKind;
use crate::token::{IDENT_PLACEHOLDER, NUMBER_PLACEHOLDER, STRING_PLACEHOLDER};

/// A grammar production: the expression kind it builds, the template it
/// matches, and its priority. Higher priorities reduce first; within one
/// priority, declaration order decides.
#[derive(Debug, Clone, Copy)]
pub struct PatternSpec {
    pub kind: ExprKind,
    pub template: &'static str,
    pub priority: i32,
}

impl PatternSpec {
    pub const fn new(kind: ExprKind, template: &'static str, priority: i32) -> Self {
        Self {
            kind,
            template,
            priority,
        }
    }

    /// Expand the template into the final pattern string.
    fn pattern(&self) -> Result<String, RegistryError> {
        let mut out = String::new();
        let mut chars = self.template.chars();
        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    let name: String = chars.by_ref().take_while(|&c| c != '}').collect();
                    out.push_str(&reference_fragment(&name).ok_or_else(|| {
                        RegistryError::UnknownReference {
                            name: name.clone(),
                            kind: self.kind.name(),
                            template: self.template,
                        }
                    })?);
                }
                ' ' => out.push_str(" (?:W )*"),
                c => out.push(c),
            }
        }
        Ok(out)
    }
}

/// A placeholder reference plus an optional subtype suffix, so `$expr`
/// also matches `$expr>addition`. One `>` level only.
fn subtype_pattern(placeholder: &str) -> String {
    format!("{}(?:>[a-zA-Z0-9_\\.]+)?", regex::escape(placeholder))
}

fn reference_fragment(name: &str) -> Option<String> {
    let placeholder = match name {
        "expr" => ExprKind::BASE_PLACEHOLDER.to_string(),
        "ident" => IDENT_PLACEHOLDER.to_string(),
        "string" => STRING_PLACEHOLDER.to_string(),
        "number" => NUMBER_PLACEHOLDER.to_string(),
        kind => ExprKind::from_name(kind)?.placeholder(),
    };
    Some(subtype_pattern(&placeholder))
}

/// A compiled production ready for matching.
#[derive(Debug)]
pub struct CompiledPattern {
    pub kind: ExprKind,
    pub source: String,
    pub regex: Regex,
    pub priority: i32,
}

/// Grammar registration failure. Raised once at startup, not per parse.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate use of pattern `{pattern}` by {first} and {second}")]
    DuplicatePattern {
        pattern: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("pattern `{template}` for {kind} references unknown `{{{name}}}`")]
    UnknownReference {
        name: String,
        kind: &'static str,
        template: &'static str,
    },

    #[error("pattern `{pattern}` for {kind} failed to compile: {source}")]
    BadPattern {
        pattern: String,
        kind: &'static str,
        source: regex::Error,
    },
}

/// The compiled grammar: every production, sorted by descending priority.
#[derive(Debug)]
pub struct Registry {
    patterns: Vec<CompiledPattern>,
}

impl Registry {
    pub fn new(specs: &[PatternSpec]) -> Result<Self, RegistryError> {
        let mut patterns: Vec<CompiledPattern> = Vec::with_capacity(specs.len());

        for spec in specs {
            let source = spec.pattern()?;
            if let Some(existing) = patterns.iter().find(|p| p.source == source) {
                return Err(RegistryError::DuplicatePattern {
                    pattern: source,
                    first: existing.kind.name(),
                    second: spec.kind.name(),
                });
            }
            let regex = Regex::new(&source).map_err(|err| RegistryError::BadPattern {
                pattern: source.clone(),
                kind: spec.kind.name(),
                source: err,
            })?;
            patterns.push(CompiledPattern {
                kind: spec.kind,
                source,
                regex,
                priority: spec.priority,
            });
        }

        // Stable sort keeps declaration order within one priority.
        patterns.sort_by_key(|p| std::cmp::Reverse(p.priority));

        Ok(Self { patterns })
    }

    /// Productions in match order.
    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_spaces_widen_to_whitespace_runs() {
        let spec = PatternSpec::new(ExprKind::Addition, r"({expr}) \+ ({expr})", -1);
        assert_eq!(
            spec.pattern().unwrap(),
            r"(\$expr(?:>[a-zA-Z0-9_\.]+)?) (?:W )*\+ (?:W )*(\$expr(?:>[a-zA-Z0-9_\.]+)?)"
        );
    }

    #[test]
    fn test_expr_reference_matches_concrete_kinds() {
        let spec = PatternSpec::new(ExprKind::Not, r"! ({expr})", -103);
        let regex = Regex::new(&spec.pattern().unwrap()).unwrap();
        assert!(regex.is_match("! $expr>variable"));
        assert!(regex.is_match("! W $expr>logicaland"));
        assert!(!regex.is_match("! $token>ident"));
    }

    #[test]
    fn test_auto_spaced_pattern_tolerates_whitespace_tokens() {
        let spec = PatternSpec::new(ExprKind::Addition, r"({expr}) \+ ({expr})", -1);
        let regex = Regex::new(&spec.pattern().unwrap()).unwrap();
        assert!(regex.is_match("$expr>number + $expr>number"));
        assert!(regex.is_match("$expr>number W W + W $expr>number"));
    }

    #[test]
    fn test_kind_reference_matches_only_that_kind() {
        let spec = PatternSpec::new(ExprKind::FieldAccess, r"\. ({variable})", 1);
        let regex = Regex::new(&spec.pattern().unwrap()).unwrap();
        assert!(regex.is_match(". $expr>variable"));
        assert!(!regex.is_match(". $expr>number"));
    }

    #[test]
    fn test_registry_sorts_by_descending_priority() {
        let specs = [
            PatternSpec::new(ExprKind::Addition, r"({number})", -1),
            PatternSpec::new(ExprKind::Variable, r"({ident})", 999),
            PatternSpec::new(ExprKind::Conditional, r"({string})", -999),
        ];
        let registry = Registry::new(&specs).unwrap();
        let kinds: Vec<_> = registry.patterns().iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![ExprKind::Variable, ExprKind::Addition, ExprKind::Conditional]
        );
    }

    #[test]
    fn test_registry_rejects_duplicate_patterns() {
        let specs = [
            PatternSpec::new(ExprKind::And, r"({expr})", -101),
            PatternSpec::new(ExprKind::Or, r"({expr})", -102),
        ];
        let err = Registry::new(&specs).unwrap_err();
        assert_eq!(
            err.to_string(),
            r"duplicate use of pattern `(\$expr(?:>[a-zA-Z0-9_\.]+)?)` by and and or"
        );
    }

    #[test]
    fn test_registry_rejects_unknown_reference() {
        let specs = [PatternSpec::new(ExprKind::Variable, r"({nonsense})", 0)];
        assert!(Registry::new(&specs).is_err());
    }
}
