//! The builtin grammar.
//!
//! Productions are a flat priority-ordered table, not a precedence-climbing
//! grammar: the reducer walks the table top priority first and rewrites the
//! first match it finds, so operators of equal priority associate left to
//! right in table order. Literal forms sit at the top so value tokens
//! become expressions before any operator production can see them;
//! conditionals sit at the bottom so both branches are fully reduced before
//! the `?:` form fires.

use once_cell::sync::Lazy;

use crate::expr::ExprKind;
use crate::pattern::{PatternSpec, Registry};

const GRAMMAR: &[PatternSpec] = &[
    // Literal forms.
    PatternSpec::new(ExprKind::Variable, r"({ident})", 999),
    PatternSpec::new(ExprKind::Bracket, r"\( ({expr}) \)", 999),
    PatternSpec::new(ExprKind::StringLit, r"({string})", 999),
    PatternSpec::new(ExprKind::NumberLit, r"({number})", 999),
    PatternSpec::new(ExprKind::BooleanLit, r"(true)", 999),
    PatternSpec::new(ExprKind::BooleanLit, r"(false)", 999),
    // Member access binds tighter than every operator. The tail group
    // captures the whole `.field` run, longest first.
    PatternSpec::new(ExprKind::FieldAccess, r"({expr})((?: \. {variable})+)", 1),
    // Arithmetic, one shared priority.
    PatternSpec::new(ExprKind::Addition, r"({expr}) \+ ({expr})", -1),
    PatternSpec::new(ExprKind::Subtraction, r"({expr}) - ({expr})", -1),
    PatternSpec::new(ExprKind::Multiplication, r"({expr}) \* ({expr})", -1),
    PatternSpec::new(ExprKind::Division, r"({expr}) / ({expr})", -1),
    PatternSpec::new(ExprKind::Modulo, r"({expr}) % ({expr})", -1),
    PatternSpec::new(ExprKind::Power, r"({expr}) \^ ({expr})", -1),
    // Comparisons and equality.
    PatternSpec::new(ExprKind::Equals, r"({expr}) == ({expr})", -100),
    PatternSpec::new(ExprKind::NotEquals, r"({expr}) != ({expr})", -100),
    PatternSpec::new(ExprKind::Greater, r"({expr}) > ({expr})", -100),
    PatternSpec::new(ExprKind::GreaterOrEqual, r"({expr}) >= ({expr})", -100),
    PatternSpec::new(ExprKind::Smaller, r"({expr}) < ({expr})", -100),
    PatternSpec::new(ExprKind::SmallerOrEqual, r"({expr}) <= ({expr})", -100),
    // Boolean operators, loosest binary binding.
    PatternSpec::new(ExprKind::And, r"({expr}) & ({expr})", -101),
    PatternSpec::new(ExprKind::LogicalAnd, r"({expr}) && ({expr})", -101),
    PatternSpec::new(ExprKind::Or, r"({expr}) \| ({expr})", -102),
    PatternSpec::new(ExprKind::LogicalOr, r"({expr}) \|\| ({expr})", -102),
    PatternSpec::new(ExprKind::Not, r"! ({expr})", -103),
    // Last of all, so both branches and the condition are complete.
    PatternSpec::new(ExprKind::Conditional, r"({expr}) \? ({expr}) : ({expr})", -999),
];

static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    Registry::new(GRAMMAR).unwrap_or_else(|err| panic!("builtin grammar is invalid: {err}"))
});

/// The compiled builtin grammar.
pub fn registry() -> &'static Registry {
    &REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_grammar_compiles() {
        let registry = registry();
        assert_eq!(registry.patterns().len(), GRAMMAR.len());
    }

    #[test]
    fn test_literal_forms_come_first() {
        let first: Vec<_> = registry()
            .patterns()
            .iter()
            .take(6)
            .map(|p| p.priority)
            .collect();
        assert_eq!(first, vec![999; 6]);
    }

    #[test]
    fn test_conditional_comes_last() {
        let last = registry().patterns().last().unwrap();
        assert_eq!(last.kind, ExprKind::Conditional);
    }
}
