//! Unit and currency conversion over fixed tables

use super::{Tool, ToolContract, ValidatedArguments};
use crate::tool_contract;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::collections::HashMap;

#[derive(Clone, Copy)]
enum Conversion {
    Factor(f64),
    Formula(fn(f64) -> f64),
}

impl Conversion {
    fn apply(self, value: f64) -> f64 {
        match self {
            Self::Factor(factor) => value * factor,
            Self::Formula(f) => f(value),
        }
    }
}

/// Source unit -> target unit -> conversion
static UNIT_CONVERSIONS: Lazy<HashMap<&'static str, HashMap<&'static str, Conversion>>> =
    Lazy::new(|| {
        use Conversion::*;
        HashMap::from([
            // length
            ("meters", HashMap::from([("feet", Factor(3.28084)), ("yards", Factor(1.09361))])),
            ("feet", HashMap::from([("meters", Factor(0.3048)), ("yards", Factor(0.333333))])),
            ("yards", HashMap::from([("meters", Factor(0.9144)), ("feet", Factor(3.0))])),
            // weight
            ("kilograms", HashMap::from([("pounds", Factor(2.20462)), ("grams", Factor(1000.0))])),
            ("pounds", HashMap::from([("kilograms", Factor(0.453592)), ("grams", Factor(453.592))])),
            ("grams", HashMap::from([("kilograms", Factor(0.001)), ("pounds", Factor(0.00220462))])),
            // temperature
            ("celsius", HashMap::from([("fahrenheit", Formula(celsius_to_fahrenheit))])),
            ("fahrenheit", HashMap::from([("celsius", Formula(fahrenheit_to_celsius))])),
        ])
    });

fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

/// Units per one USD
static EXCHANGE_RATES: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("USD", 1.0),
        ("EUR", 0.85),
        ("GBP", 0.75),
        ("JPY", 110.0),
        ("AUD", 1.3),
        ("CAD", 1.25),
        ("INR", 75.0),
        ("CNY", 6.5),
        ("MXN", 20.0),
        ("AED", 3.67),
        ("BRL", 5.39),
        ("ZAR", 14.55),
        ("SAR", 3.75),
        ("SEK", 8.77),
        ("CHF", 0.92),
        ("NZD", 1.44),
        ("SGD", 1.33),
        ("HKD", 7.77),
        ("RUB", 74.6),
        ("KRW", 1173.0),
        ("TRY", 14.2),
    ])
});

pub fn convert_units(value: f64, from: &str, to: &str) -> Result<f64> {
    let from = from.trim().to_lowercase();
    let to = to.trim().to_lowercase();

    UNIT_CONVERSIONS
        .get(from.as_str())
        .and_then(|targets| targets.get(to.as_str()))
        .map(|conversion| conversion.apply(value))
        .ok_or_else(|| anyhow!("invalid units for conversion: '{}' to '{}'", from, to))
}

pub fn convert_currency(amount: f64, from: &str, to: &str) -> Result<f64> {
    let from = from.trim().to_uppercase();
    let to = to.trim().to_uppercase();

    match (
        EXCHANGE_RATES.get(from.as_str()),
        EXCHANGE_RATES.get(to.as_str()),
    ) {
        (Some(from_rate), Some(to_rate)) => Ok(amount / from_rate * to_rate),
        _ => Err(anyhow!(
            "invalid currency codes for conversion: '{}' to '{}'",
            from,
            to
        )),
    }
}

/// `unit_conversion`
pub struct UnitConversionTool;

#[async_trait]
impl Tool for UnitConversionTool {
    fn contract(&self) -> ToolContract {
        tool_contract! {
            name: "unit_conversion",
            description: "Convert units from one measurement to another",
            parameters: [
                {
                    name: "value",
                    type: number,
                    description: "The value to convert",
                    required: true
                },
                {
                    name: "fromUnit",
                    type: string,
                    description: "The source unit (e.g., 'meters')",
                    required: true
                },
                {
                    name: "toUnit",
                    type: string,
                    description: "The target unit (e.g., 'feet')",
                    required: true
                }
            ]
        }
    }

    async fn call(&self, args: ValidatedArguments) -> Result<Value> {
        let result = convert_units(
            args.number("value")?,
            args.string("fromUnit")?,
            args.string("toUnit")?,
        )?;
        Ok(json!({ "result": result }))
    }
}

/// `currency_conversion`
pub struct CurrencyConversionTool;

#[async_trait]
impl Tool for CurrencyConversionTool {
    fn contract(&self) -> ToolContract {
        tool_contract! {
            name: "currency_conversion",
            description: "Convert currency from one currency to another",
            parameters: [
                {
                    name: "amount",
                    type: number,
                    description: "The amount to convert",
                    required: true
                },
                {
                    name: "fromCurrency",
                    type: string,
                    description: "The source currency code (e.g., 'USD')",
                    required: true
                },
                {
                    name: "toCurrency",
                    type: string,
                    description: "The target currency code (e.g., 'EUR')",
                    required: true
                }
            ]
        }
    }

    async fn call(&self, args: ValidatedArguments) -> Result<Value> {
        let result = convert_currency(
            args.number("amount")?,
            args.string("fromCurrency")?,
            args.string("toCurrency")?,
        )?;
        Ok(json!({ "result": result }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::validate;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_length_and_weight() {
        assert!(close(convert_units(10.0, "meters", "feet").unwrap(), 32.8084));
        assert!(close(convert_units(2.0, "Kilograms", "grams").unwrap(), 2000.0));
        assert!(close(convert_units(3.0, "yards", "feet").unwrap(), 9.0));
    }

    #[test]
    fn test_temperature_formula() {
        assert!(close(convert_units(100.0, "celsius", "fahrenheit").unwrap(), 212.0));
        assert!(close(convert_units(32.0, "fahrenheit", "celsius").unwrap(), 0.0));
    }

    #[test]
    fn test_unsupported_units() {
        assert!(convert_units(1.0, "bogus", "feet").is_err());
        assert!(convert_units(1.0, "meters", "grams").is_err());
    }

    #[test]
    fn test_currency() {
        assert!(close(convert_currency(100.0, "USD", "EUR").unwrap(), 85.0));
        assert!(close(convert_currency(85.0, "eur", "usd").unwrap(), 100.0));
        assert!(convert_currency(1.0, "USD", "XYZ").is_err());
    }

    #[tokio::test]
    async fn test_unit_tool_failure_surfaces_as_error() {
        let tool = UnitConversionTool;
        let raw = json!({"value": 1, "fromUnit": "bogus", "toUnit": "feet"});
        let args = validate(&tool.contract(), raw.as_object().unwrap()).unwrap();

        let err = tool.call(args).await.unwrap_err();
        assert!(err.to_string().contains("invalid units"));
    }

    #[tokio::test]
    async fn test_currency_tool() {
        let tool = CurrencyConversionTool;
        let raw = json!({"amount": 10, "fromCurrency": "USD", "toCurrency": "JPY"});
        let args = validate(&tool.contract(), raw.as_object().unwrap()).unwrap();

        assert_eq!(tool.call(args).await.unwrap(), json!({"result": 1100.0}));
    }
}
