//! Formula adapter: parsed expression plus its canonical text and references.

use std::collections::BTreeSet;

use super::Position;
use super::parser::{self, Expr, ParseError};
use super::value::{FormulaError, Value};

/// A parsed formula.
#[derive(Clone, Debug, PartialEq)]
pub struct Formula {
    expr: Expr,
    expression: String,
    referenced: Vec<Position>,
}

impl Formula {
    /// Parse formula text (without the leading `=`).
    pub fn parse(expression: &str) -> Result<Formula, ParseError> {
        let expr = parser::parse(expression)?;

        let mut cells = BTreeSet::new();
        expr.collect_cells(&mut cells);

        Ok(Formula {
            expression: expr.to_string(),
            referenced: cells.into_iter().collect(),
            expr,
        })
    }

    /// Evaluate with `lookup` resolving each referenced cell to a number.
    ///
    /// Lookup failures and arithmetic faults come back as [`Value::Error`].
    pub fn evaluate<F>(&self, mut lookup: F) -> Value
    where
        F: FnMut(Position) -> Result<f64, FormulaError>,
    {
        match self.expr.evaluate(&mut lookup) {
            Ok(n) => Value::Number(n),
            Err(e) => Value::Error(e),
        }
    }

    /// Canonical text of the expression, without the leading `=`.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Cells referenced by the formula, sorted and without duplicates.
    pub fn referenced_cells(&self) -> &[Position] {
        &self.referenced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_normalizes_expression() {
        let formula = Formula::parse(" ( A1 + 2 ) * B1 ").unwrap();
        assert_eq!(formula.expression(), "(A1+2)*B1");
        assert_eq!(
            formula.referenced_cells(),
            &[Position::new(0, 0), Position::new(0, 1)]
        );
    }

    #[test]
    fn test_evaluate_uses_lookup() {
        let formula = Formula::parse("A1*2+B1").unwrap();
        let value = formula.evaluate(|pos| match (pos.row, pos.col) {
            (0, 0) => Ok(10.0),
            _ => Ok(1.0),
        });
        assert_eq!(value, Value::Number(21.0));
    }

    #[test]
    fn test_evaluate_converts_errors_to_values() {
        let formula = Formula::parse("A1+1").unwrap();
        assert_eq!(
            formula.evaluate(|_| Err(FormulaError::Arithmetic)),
            Value::Error(FormulaError::Arithmetic)
        );

        let formula = Formula::parse("1/A1").unwrap();
        assert_eq!(
            formula.evaluate(|_| Ok(0.0)),
            Value::Error(FormulaError::Arithmetic)
        );
    }

    #[test]
    fn test_constant_formula_has_no_references() {
        let formula = Formula::parse("1+2").unwrap();
        assert!(formula.referenced_cells().is_empty());
        assert_eq!(formula.evaluate(|_| Ok(f64::NAN)), Value::Number(3.0));
    }

    #[test]
    fn test_parse_error_message() {
        let err = Formula::parse("1+").unwrap_err();
        assert!(err.to_string().starts_with("Formula parse error"));
    }
}
