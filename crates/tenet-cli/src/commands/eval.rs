//! Single expression evaluation command

use crate::checks::{run_check, Outcome};
use anyhow::{Context, Result};
use tenet_constraint::Value;

pub fn run(expr: &str, value_json: &str, format: &str) -> Result<()> {
    let value = Value::from_json_str(value_json).context("Failed to parse --value as JSON")?;

    let outcome = run_check(expr, &value);

    match format {
        "text" => match &outcome {
            Outcome::Pass => println!("PASS"),
            Outcome::Fail(message) => println!("FAIL\n  {}", message),
            Outcome::Error(message) => println!("ERROR\n  {}", message),
        },
        "json" => {
            let output = serde_json::json!({
                "expect": expr,
                "value": value,
                "outcome": outcome.label(),
                "message": outcome.message(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => anyhow::bail!("Unknown format: {}", format),
    }

    if outcome != Outcome::Pass {
        std::process::exit(1);
    }

    Ok(())
}
