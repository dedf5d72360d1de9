//! Argument Validation
//!
//! Model-supplied arguments arrive as loosely typed JSON. They are checked
//! against the tool's contract before any handler runs:
//! 1. every required name is present
//! 2. no undeclared names are present
//! 3. every present value matches its declared type
//!
//! Nothing is coerced: `"3"` is not an integer.

use super::{ParameterType, ToolContract, ToolError};
use anyhow::{anyhow, Result};
use serde_json::{Map, Value};

/// Arguments that passed [`validate`] for a specific contract
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidatedArguments {
    values: Map<String, Value>,
}

impl ValidatedArguments {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn integer(&self, name: &str) -> Result<i64> {
        self.values
            .get(name)
            .and_then(as_whole_number)
            .ok_or_else(|| anyhow!("'{}' argument is required and must be an integer", name))
    }

    pub fn number(&self, name: &str) -> Result<f64> {
        self.values
            .get(name)
            .and_then(Value::as_f64)
            .ok_or_else(|| anyhow!("'{}' argument is required and must be a number", name))
    }

    pub fn string(&self, name: &str) -> Result<&str> {
        self.optional_str(name)
            .ok_or_else(|| anyhow!("'{}' argument is required and must be a string", name))
    }

    pub fn optional_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

}

/// Check `raw` against `contract`, rules applied in order
pub fn validate(
    contract: &ToolContract,
    raw: &Map<String, Value>,
) -> Result<ValidatedArguments, ToolError> {
    if let Some(name) = contract.required.iter().find(|name| !raw.contains_key(*name)) {
        return Err(ToolError::MissingRequiredArgument { name: name.clone() });
    }

    if let Some(name) = raw.keys().find(|key| !contract.parameters.contains_key(*key)) {
        return Err(ToolError::UnknownArgument { name: name.clone() });
    }

    for (name, schema) in &contract.parameters {
        let Some(value) = raw.get(name) else {
            continue;
        };
        if !conforms(&schema.param_type, value) {
            return Err(ToolError::TypeMismatch {
                name: name.clone(),
                expected: schema.param_type.to_string(),
                actual: describe_mismatch(&schema.param_type, value),
            });
        }
    }

    Ok(ValidatedArguments {
        values: raw.clone(),
    })
}

fn conforms(param_type: &ParameterType, value: &Value) -> bool {
    match param_type {
        ParameterType::Integer => as_whole_number(value).is_some(),
        ParameterType::Number => value.as_f64().is_some_and(f64::is_finite),
        ParameterType::String => value.is_string(),
        ParameterType::Enum { values } => value
            .as_str()
            .is_some_and(|s| values.iter().any(|allowed| allowed == s)),
    }
}

/// JSON has a single number type; `3` and `3.0` are both whole numbers.
fn as_whole_number(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    let f = value.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn describe_mismatch(param_type: &ParameterType, value: &Value) -> String {
    let whole = value.is_u64() || value.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0);
    if *param_type == ParameterType::Integer && whole {
        format!("{} (outside the 64-bit signed integer range)", value)
    } else {
        describe(value)
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(s) => format!("string \"{}\"", s),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ParameterSchema;
    use serde_json::json;

    fn sum_contract() -> ToolContract {
        ToolContract::new("sum_of_two_numbers", "Calculate the sum of two integers")
            .param("firstNumber", ParameterSchema::integer("The first integer"), true)
            .param("secondNumber", ParameterSchema::integer("The second integer"), true)
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_missing_required_argument() {
        let err = validate(&sum_contract(), &args(json!({"firstNumber": 2}))).unwrap_err();
        assert_eq!(
            err,
            ToolError::MissingRequiredArgument {
                name: "secondNumber".to_string()
            }
        );
    }

    #[test]
    fn test_numeric_string_is_not_coerced() {
        let err = validate(
            &sum_contract(),
            &args(json!({"firstNumber": 2, "secondNumber": "3"})),
        )
        .unwrap_err();

        match err {
            ToolError::TypeMismatch {
                name,
                expected,
                actual,
            } => {
                assert_eq!(name, "secondNumber");
                assert_eq!(expected, "integer");
                assert!(actual.starts_with("string"));
            }
            other => panic!("expected type mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_arguments() {
        let validated = validate(
            &sum_contract(),
            &args(json!({"firstNumber": 2, "secondNumber": 3})),
        )
        .unwrap();

        assert_eq!(validated.integer("firstNumber").unwrap(), 2);
        assert_eq!(validated.integer("secondNumber").unwrap(), 3);
    }

    #[test]
    fn test_unknown_argument_rejected() {
        let err = validate(
            &sum_contract(),
            &args(json!({"firstNumber": 2, "secondNumber": 3, "thirdNumber": 4})),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ToolError::UnknownArgument {
                name: "thirdNumber".to_string()
            }
        );
    }

    #[test]
    fn test_missing_checked_before_unknown() {
        let err = validate(&sum_contract(), &args(json!({"bogus": 1}))).unwrap_err();
        assert_eq!(err.kind(), "missing_required_argument");
    }

    #[test]
    fn test_integer_rules() {
        let contract = sum_contract();
        assert!(validate(&contract, &args(json!({"firstNumber": 2.0, "secondNumber": -7}))).is_ok());
        assert!(validate(&contract, &args(json!({"firstNumber": 2.5, "secondNumber": 1}))).is_err());
        assert!(validate(&contract, &args(json!({"firstNumber": true, "secondNumber": 1}))).is_err());
        assert!(validate(&contract, &args(json!({"firstNumber": null, "secondNumber": 1}))).is_err());
    }

    #[test]
    fn test_integer_beyond_i64_is_reported_as_out_of_range() {
        let err = validate(
            &sum_contract(),
            &args(json!({"firstNumber": u64::MAX, "secondNumber": 1})),
        )
        .unwrap_err();

        match err {
            ToolError::TypeMismatch {
                name,
                expected,
                actual,
            } => {
                assert_eq!(name, "firstNumber");
                assert_eq!(expected, "integer");
                assert_eq!(
                    actual,
                    "18446744073709551615 (outside the 64-bit signed integer range)"
                );
            }
            other => panic!("expected type mismatch, got {other:?}"),
        }

        let err = validate(&sum_contract(), &args(json!({"firstNumber": 1e19, "secondNumber": 1})))
            .unwrap_err();
        assert!(err.to_string().contains("outside the 64-bit signed integer range"));

        // a fractional number is a plain mismatch
        let err = validate(&sum_contract(), &args(json!({"firstNumber": 2.5, "secondNumber": 1})))
            .unwrap_err();
        assert_eq!(err.to_string(), "argument 'firstNumber' expected integer, got number");
    }

    #[test]
    fn test_number_and_enum_rules() {
        let contract = ToolContract::new("weather", "Weather")
            .param("value", ParameterSchema::number("Value"), true)
            .param(
                "unit",
                ParameterSchema::one_of(["celsius", "fahrenheit"], "Unit"),
                false,
            );

        assert!(validate(&contract, &args(json!({"value": 1.5}))).is_ok());
        assert!(validate(&contract, &args(json!({"value": 2, "unit": "celsius"}))).is_ok());

        let err = validate(&contract, &args(json!({"value": 2, "unit": "kelvin"}))).unwrap_err();
        match err {
            ToolError::TypeMismatch { name, expected, .. } => {
                assert_eq!(name, "unit");
                assert_eq!(expected, "one of [celsius, fahrenheit]");
            }
            other => panic!("expected type mismatch, got {other:?}"),
        }

        assert!(validate(&contract, &args(json!({"value": "1.5"}))).is_err());
    }

    #[test]
    fn test_optional_argument_may_be_absent() {
        let contract = ToolContract::new("weather", "Weather")
            .param("location", ParameterSchema::string("City"), true)
            .param("unit", ParameterSchema::one_of(["celsius"], "Unit"), false);

        let validated = validate(&contract, &args(json!({"location": "Paris"}))).unwrap();
        assert_eq!(validated.string("location").unwrap(), "Paris");
        assert!(validated.optional_str("unit").is_none());
    }
}
