//! Variable resolution.
//!
//! Turns a literal-or-reference value node into its final string. Runs only
//! while a document is being interpreted; quiz time never resolves anything.

use std::collections::BTreeMap;

use crate::document::ValueNode;
use crate::error::InterpretError;

/// Variable name → literal value.
pub type VariableTable = BTreeMap<String, String>;

/// Resolve a value node against the variable table.
pub fn resolve(value: &ValueNode, variables: &VariableTable) -> Result<String, InterpretError> {
    match value {
        ValueNode::Literal(text) => Ok(text.clone()),
        ValueNode::Reference(reference) => variables
            .get(&reference.name)
            .cloned()
            .ok_or_else(|| InterpretError::UndefinedVariable(reference.name.clone())),
        ValueNode::Unsupported(raw) => Err(InterpretError::UnsupportedValueType(raw.to_string())),
    }
}

/// Resolve every value in order, failing on the first unresolved one.
pub fn resolve_all(
    values: &[ValueNode],
    variables: &VariableTable,
) -> Result<Vec<String>, InterpretError> {
    values.iter().map(|v| resolve(v, variables)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> VariableTable {
        let mut vars = VariableTable::new();
        vars.insert("capital".into(), "Paris".into());
        vars
    }

    #[test]
    fn literal_is_returned_unchanged() {
        let value = ValueNode::literal("  spaced  ");
        assert_eq!(resolve(&value, &table()).unwrap(), "  spaced  ");
    }

    #[test]
    fn reference_resolves_to_bound_value() {
        let value = ValueNode::reference("capital");
        assert_eq!(resolve(&value, &table()).unwrap(), "Paris");
    }

    #[test]
    fn unknown_reference_is_undefined_variable() {
        let value = ValueNode::reference("river");
        let err = resolve(&value, &table()).unwrap_err();
        assert_eq!(err, InterpretError::UndefinedVariable("river".into()));
        assert_eq!(err.to_string(), "variable 'river' is not defined");
    }

    #[test]
    fn other_shapes_are_unsupported() {
        let value = ValueNode::Unsupported(serde_json::json!(42));
        let err = resolve(&value, &table()).unwrap_err();
        assert!(matches!(err, InterpretError::UnsupportedValueType(ref raw) if raw == "42"));
    }

    #[test]
    fn resolve_all_stops_at_first_failure() {
        let values = vec![
            ValueNode::literal("Lyon"),
            ValueNode::reference("missing"),
            ValueNode::Unsupported(serde_json::json!(true)),
        ];
        let err = resolve_all(&values, &table()).unwrap_err();
        assert_eq!(err.variable_name(), Some("missing"));
    }
}
