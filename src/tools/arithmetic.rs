//! Integer tools: sum, parity and primality

use super::{Tool, ToolContract, ValidatedArguments};
use crate::tool_contract;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// `sum_of_two_numbers`
pub struct SumTool;

#[async_trait]
impl Tool for SumTool {
    fn contract(&self) -> ToolContract {
        tool_contract! {
            name: "sum_of_two_numbers",
            description: "Calculate the sum of two integers",
            parameters: [
                {
                    name: "firstNumber",
                    type: integer,
                    description: "The first integer",
                    required: true
                },
                {
                    name: "secondNumber",
                    type: integer,
                    description: "The second integer",
                    required: true
                }
            ]
        }
    }

    async fn call(&self, args: ValidatedArguments) -> Result<Value> {
        let first = args.integer("firstNumber")?;
        let second = args.integer("secondNumber")?;

        let sum = first
            .checked_add(second)
            .ok_or_else(|| anyhow!("sum of {} and {} overflows", first, second))?;

        Ok(json!({ "result": sum }))
    }
}

/// `even_odd_check`
pub struct EvenOddTool;

#[async_trait]
impl Tool for EvenOddTool {
    fn contract(&self) -> ToolContract {
        tool_contract! {
            name: "even_odd_check",
            description: "Check if a number is even or odd",
            parameters: [
                {
                    name: "number",
                    type: integer,
                    description: "The number to check",
                    required: true
                }
            ]
        }
    }

    async fn call(&self, args: ValidatedArguments) -> Result<Value> {
        let number = args.integer("number")?;
        Ok(json!({ "isEven": number % 2 == 0 }))
    }
}

/// `prime_number_check`
pub struct PrimeCheckTool;

#[async_trait]
impl Tool for PrimeCheckTool {
    fn contract(&self) -> ToolContract {
        tool_contract! {
            name: "prime_number_check",
            description: "Check if a number is a prime number",
            parameters: [
                {
                    name: "number",
                    type: integer,
                    description: "The number to check",
                    required: true
                }
            ]
        }
    }

    async fn call(&self, args: ValidatedArguments) -> Result<Value> {
        let number = args.integer("number")?;

        // Trial division can run for seconds; keep it off the runtime workers
        // and stop it once this future is dropped (e.g. on dispatch timeout).
        let cancelled = Arc::new(AtomicBool::new(false));
        let _cancel = CancelOnDrop(Arc::clone(&cancelled));
        let outcome =
            tokio::task::spawn_blocking(move || trial_division(number, &cancelled)).await?;

        let prime = outcome.ok_or_else(|| anyhow!("primality check was cancelled"))?;
        Ok(json!({ "isPrime": prime }))
    }
}

struct CancelOnDrop(Arc<AtomicBool>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// How many divisors are tried between cancellation checks
const CANCEL_CHECK_INTERVAL: i64 = 1 << 16;

/// `None` when `cancelled` was raised before an answer was found
fn trial_division(n: i64, cancelled: &AtomicBool) -> Option<bool> {
    if n <= 1 {
        return Some(false);
    }
    let mut i = 2;
    while i <= n / i {
        if i % CANCEL_CHECK_INTERVAL == 0 && cancelled.load(Ordering::Relaxed) {
            return None;
        }
        if n % i == 0 {
            return Some(false);
        }
        i += 1;
    }
    Some(true)
}
