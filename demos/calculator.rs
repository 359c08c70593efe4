//! Example-style tests for a tiny calculator.
//!
//! Each example feeds a markdown table to a function and prints the result
//! table; the expected output is shown next to each call.
//!
//! Run with: cargo run --example calculator

use serde::{Deserialize, Serialize};
use serde_mdtable::{run, run_to_string, RunOptions, Transform};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
#[allow(non_snake_case)]
struct Number {
    Number: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[allow(non_snake_case)]
struct Calculation {
    Operand: String,
    Number: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[allow(non_snake_case)]
struct Outcome {
    Result: f64,
}

fn maximum(numbers: Vec<Number>) -> Result<Number, String> {
    numbers
        .into_iter()
        .reduce(|a, b| if b.Number > a.Number { b } else { a })
        .ok_or_else(|| "no numbers provided".to_string())
}

fn calculate(steps: Vec<Calculation>) -> Result<Outcome, String> {
    let mut result = 0.0;
    for step in steps {
        match step.Operand.as_str() {
            "+" => result += step.Number,
            "-" => result -= step.Number,
            "*" => result *= step.Number,
            "/" => result /= step.Number,
            other => return Err(format!("unknown operand `{other}`")),
        }
    }
    Ok(Outcome { Result: result })
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== Maximum ===");
    run(
        Transform::whole_table(maximum),
        "
        | Number |
        |--------|
        | 5      |
        | 6      |
        | 2      |
        ",
        &RunOptions::new(),
    );
    // | Number |
    // |--------|
    // | 6      |

    println!("\n=== Calculate ===");
    let steps = "
        | Operand | Number |
        |---------|--------|
        | +       | 10     |
        | -       | 5      |
        | *       | 4      |
        | /       | 2      |
    ";
    run(Transform::whole_table(calculate), steps, &RunOptions::new());
    // | Result |
    // |--------|
    // | 10     |

    println!("\n=== Calculate, relabelled ===");
    let options = RunOptions::new().with_alias("Total", "Result");
    run(Transform::whole_table(calculate), steps, &options);
    // | Total |
    // |-------|
    // | 10    |

    println!("\n=== Doubling every row ===");
    run(
        Transform::per_row(|n: Number| {
            Ok::<_, String>(Number {
                Number: n.Number * 2.0,
            })
        }),
        "| Number |\n|---|\n| 1.25 |\n| 4 |",
        &RunOptions::new(),
    );
    // | Number |
    // |--------|
    // | 2.5    |
    // | 8      |

    println!("\n=== Unknown operand ===");
    run(
        Transform::whole_table(calculate),
        "| Operand | Number |\n|---|---|\n| % | 3 |",
        &RunOptions::new(),
    );
    // error: transform failed: unknown operand `%`

    // The same run, checked programmatically
    let output = run_to_string(Transform::whole_table(calculate), steps, &RunOptions::new())?;
    assert_eq!(output, "| Result |\n|--------|\n| 10     |\n");
    println!("\n✓ Calculate output verified");

    Ok(())
}
