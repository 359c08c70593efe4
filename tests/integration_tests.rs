use serde::{Deserialize, Serialize};
use serde_mdtable::{
    from_str, run_to_string, run_to_writer, to_string, to_string_with_options, Error, ErrorKind,
    Record, RunOptions, Shape, Transform,
};
use std::cell::Cell;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[allow(non_snake_case)]
struct Number {
    Number: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[allow(non_snake_case)]
struct Calculation {
    Operand: String,
    Number: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[allow(non_snake_case)]
struct Outcome {
    Result: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[allow(non_snake_case)]
struct Labelled {
    Label: String,
    Value: f32,
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

fn run_capture<T: Record, U: Record>(
    transform: Transform<'_, T, U>,
    input: &str,
    options: &RunOptions,
) -> String {
    let mut out = Vec::new();
    run_to_writer(&mut out, transform, input, options).unwrap();
    String::from_utf8(out).unwrap()
}

const CALCULATION: &str = "
    | Operand | Number |
    |---------|--------|
    | +       | 10     |
    | -       | 5      |
    | *       | 4      |
    | /       | 2      |
";

#[test]
fn test_maximum_example() {
    let input = "
        | Number |
        |--------|
        | 5      |
        | 6      |
        | 2      |
    ";
    let output = run_capture(Transform::whole_table(maximum), input, &RunOptions::new());
    assert_eq!(output, "| Number |\n|--------|\n| 6      |\n");
}

#[test]
fn test_calculate_example() {
    let output = run_capture(
        Transform::whole_table(calculate),
        CALCULATION,
        &RunOptions::new(),
    );
    assert_eq!(output, "| Result |\n|--------|\n| 10     |\n");
}

#[test]
fn test_unknown_column_prints_error_only() {
    let input = "
        | Operand | Number | Comment |
        |---------|--------|---------|
        | +       | 1      | first   |
    ";
    let output = run_capture(Transform::whole_table(calculate), input, &RunOptions::new());
    assert_eq!(output.lines().count(), 1);
    assert!(output.starts_with("error: "));
    assert!(output.contains("Comment"));

    let err = run_to_string(Transform::whole_table(calculate), input, &RunOptions::new())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Bind);
    assert_eq!(err, Error::unknown_field("Comment", "Calculation"));
}

#[test]
fn test_non_numeric_cell_is_bind_error() {
    let input = "| Number |\n|--------|\n| 5 |\n| five |";
    let err = run_to_string(Transform::whole_table(maximum), input, &RunOptions::new())
        .unwrap_err();
    assert_eq!(err, Error::invalid_number("Number", "five"));
    assert_eq!(err.kind(), ErrorKind::Bind);
}

#[test]
fn test_empty_numeric_cell_is_bind_error() {
    let input = "| Operand | Number |\n|---|---|\n| + |  |";
    let err = run_to_string(Transform::whole_table(calculate), input, &RunOptions::new())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Bind);
}

#[test]
fn test_missing_columns_get_zero_values() {
    let input = "| Operand |\n|---|\n| + |\n| - |";
    let seen = Cell::new(0);
    let transform = Transform::per_row(|c: Calculation| {
        seen.set(seen.get() + 1);
        assert_eq!(c.Number, 0.0);
        Ok::<_, String>(c)
    });
    let output = run_to_string(transform, input, &RunOptions::new()).unwrap();
    assert_eq!(seen.get(), 2);
    assert_eq!(
        output,
        "| Operand | Number |\n|---------|--------|\n| +       | 0      |\n| -       | 0      |\n"
    );
}

#[test]
fn test_per_row_invoked_once_per_row() {
    let calls = Cell::new(0);
    let transform = Transform::per_row(|n: Number| {
        calls.set(calls.get() + 1);
        Ok::<_, String>(Outcome {
            Result: n.Number * n.Number,
        })
    });
    let output = run_to_string(
        transform,
        "| Number |\n|---|\n| 1 |\n| 2 |\n| 3 |",
        &RunOptions::new(),
    )
    .unwrap();
    assert_eq!(calls.get(), 3);
    assert_eq!(
        output,
        "| Result |\n|--------|\n| 1      |\n| 4      |\n| 9      |\n"
    );
}

#[test]
fn test_whole_table_invoked_once() {
    let calls = Cell::new(0);
    let transform = Transform::whole_table(|steps: Vec<Calculation>| {
        calls.set(calls.get() + 1);
        calculate(steps)
    });
    run_to_string(transform, CALCULATION, &RunOptions::new()).unwrap();
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_collection_outputs_are_flattened() {
    let transform = Transform::per_row_many(|n: Number| {
        Ok::<_, String>(vec![
            Outcome { Result: n.Number },
            Outcome {
                Result: -n.Number,
            },
        ])
    });
    let output = run_to_string(transform, "| Number |\n|---|\n| 1 |\n| 2.5 |", &RunOptions::new())
        .unwrap();
    assert_eq!(
        output,
        "| Result |\n|--------|\n| 1      |\n| -1     |\n| 2.5    |\n| -2.5   |\n"
    );
    let t = Transform::per_row_many(|n: Number| Ok::<_, String>(vec![n]));
    assert_eq!(t.output_shape(), Shape::Collection);
}

#[test]
fn test_whole_table_many_sorts() {
    let transform = Transform::whole_table_many(|mut numbers: Vec<Number>| {
        numbers.sort_by(|a, b| a.Number.total_cmp(&b.Number));
        Ok::<_, String>(numbers)
    });
    let output = run_to_string(
        transform,
        "| Number |\n|---|\n| 3 |\n| -1 |\n| 2 |",
        &RunOptions::new(),
    )
    .unwrap();
    assert_eq!(output, "| Number |\n|--------|\n| -1     |\n| 2      |\n| 3      |\n");
}

#[test]
fn test_transform_failure_produces_no_table() {
    let input = "| Operand | Number |\n|---|---|\n| + | 1 |\n| % | 2 |";
    let output = run_capture(Transform::whole_table(calculate), input, &RunOptions::new());
    assert_eq!(output, "error: transform failed: unknown operand `%`\n");
}

#[test]
fn test_per_row_failure_midway_produces_no_table() {
    let transform = Transform::per_row(|n: Number| {
        if n.Number > 1.0 {
            Err("too big")
        } else {
            Ok(n)
        }
    });
    let output = run_capture(
        transform,
        "| Number |\n|---|\n| 1 |\n| 2 |\n| 0 |",
        &RunOptions::new(),
    );
    assert_eq!(output, "error: transform failed: too big\n");
}

#[test]
fn test_aliases_rename_headers_only() {
    let options = RunOptions::new().with_alias("Total", "Result");
    let output = run_to_string(Transform::whole_table(calculate), CALCULATION, &options).unwrap();
    assert_eq!(output, "| Total |\n|-------|\n| 10    |\n");
}

#[test]
fn test_aliases_do_not_affect_input_binding() {
    let options = RunOptions::new().with_alias("Value", "Number");
    let input = "| Value |\n|---|\n| 1 |";
    let err = run_to_string(Transform::whole_table(maximum), input, &options).unwrap_err();
    assert_eq!(err, Error::unknown_field("Value", "Number"));
}

#[test]
fn test_conflicting_aliases_rejected_before_run() {
    let calls = Cell::new(0);
    let transform = Transform::whole_table(|numbers: Vec<Number>| {
        calls.set(calls.get() + 1);
        maximum(numbers)
    });
    let options = RunOptions::new()
        .with_alias("A", "Number")
        .with_alias("B", "Number");
    let output = run_capture(transform, "| Number |\n|---|\n| 1 |", &options);
    assert_eq!(calls.get(), 0);
    assert!(output.starts_with("error: invalid configuration"));
}

#[test]
fn test_explicit_headers_select_and_order_columns() {
    let transform = Transform::per_row(|c: Calculation| Ok::<_, String>(c));
    let options = RunOptions::new().with_headers(["Number", "Operand"]);
    let output = run_to_string(transform, CALCULATION, &options).unwrap();
    assert_eq!(
        output,
        "| Number | Operand |\n\
         |--------|---------|\n\
         | 10     | +       |\n\
         | 5      | -       |\n\
         | 4      | *       |\n\
         | 2      | /       |\n"
    );
}

#[test]
fn test_explicit_headers_from_table_text() {
    let transform = Transform::per_row(|c: Calculation| Ok::<_, String>(c));
    let options = RunOptions::new()
        .with_headers_table("| Operand |\n|---------|")
        .with_alias("Op", "Operand");
    let output = run_to_string(transform, "| Operand | Number |\n|---|---|\n| + | 1 |", &options)
        .unwrap();
    assert_eq!(output, "| Op |\n|----|\n| +  |\n");
}

#[test]
fn test_explicit_header_not_in_output_record() {
    let options = RunOptions::new().with_headers(["Missing"]);
    let err = run_to_string(Transform::whole_table(calculate), CALCULATION, &options).unwrap_err();
    assert_eq!(err, Error::unknown_field("Missing", "Outcome"));
}

#[test]
fn test_header_only_input() {
    let per_row = Transform::per_row(|n: Number| Ok::<_, String>(n));
    let output = run_to_string(per_row, "| Number |\n|--------|", &RunOptions::new()).unwrap();
    assert_eq!(output, "| Number |\n|--------|\n");

    let output = run_capture(
        Transform::whole_table(maximum),
        "| Number |\n|--------|",
        &RunOptions::new(),
    );
    assert_eq!(output, "error: transform failed: no numbers provided\n");
}

#[test]
fn test_empty_input_is_format_error() {
    let err = run_to_string(Transform::whole_table(maximum), "  \n ", &RunOptions::new())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_headerless_input_is_format_error() {
    let err = run_to_string(
        Transform::whole_table(maximum),
        "| 5 |\n| 6 |",
        &RunOptions::new(),
    )
    .unwrap_err();
    assert_eq!(err, Error::MissingHeader);
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_unsupported_field_type() {
    #[derive(Serialize, Deserialize, Debug)]
    struct Counter {
        count: u32,
    }

    let transform = Transform::per_row(|c: Counter| Ok::<_, String>(c));
    let err = run_to_string(transform, "| count |\n|---|\n| 1 |", &RunOptions::new())
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedKind { .. }));
    assert_eq!(err.kind(), ErrorKind::Bind);
}

#[test]
fn test_f32_fields_and_pipes_in_text() {
    let records = vec![
        Labelled {
            Label: "a|b".to_string(),
            Value: 1.5,
        },
        Labelled {
            Label: "plain".to_string(),
            Value: -3.0,
        },
    ];
    let table = to_string(&records).unwrap();
    assert_eq!(
        table,
        "| Label | Value |\n|-------|-------|\n| a\\|b  | 1.5   |\n| plain | -3    |\n"
    );
    let back: Vec<Labelled> = from_str(&table).unwrap();
    assert_eq!(back, records);
}

#[test]
fn test_to_string_with_options_relabels() {
    let options = RunOptions::new().with_aliases([("Name", "Label")]);
    let table = to_string_with_options(
        &[Labelled {
            Label: "x".to_string(),
            Value: 2.0,
        }],
        &options,
    )
    .unwrap();
    assert_eq!(table, "| Name | Value |\n|------|-------|\n| x    | 2     |\n");
}

#[test]
fn test_renamed_fields_bind_by_serde_name() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Step {
        #[serde(rename = "Operand")]
        operand: String,
        #[serde(rename = "Number")]
        number: f64,
    }

    let steps: Vec<Step> = from_str(CALCULATION).unwrap();
    assert_eq!(steps.len(), 4);
    assert_eq!(steps[3].operand, "/");
    assert_eq!(steps[3].number, 2.0);
}

#[test]
fn test_duplicate_input_column_is_bind_error() {
    let err = from_str::<Number>("| Number | Number |\n|---|---|\n| 5 | x |").unwrap_err();
    assert_eq!(err, Error::duplicate_field("Number", "Number"));
    assert_eq!(err.kind(), ErrorKind::Bind);
}

#[test]
fn test_multi_line_transform_error_is_one_line() {
    let transform = Transform::per_row(|_: Number| Err::<Number, _>("bad\nsecond line"));
    let output = run_capture(transform, "| Number |\n|---|\n| 1 |", &RunOptions::new());
    assert_eq!(output, "error: transform failed: bad second line\n");
    assert_eq!(output.lines().count(), 1);
}

#[test]
fn test_serde_alias_does_not_add_output_column() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Aliased {
        #[serde(alias = "Amount")]
        value: f64,
    }

    let table = to_string(&[Aliased { value: 1.0 }]).unwrap();
    assert_eq!(table, "| value |\n|-------|\n| 1     |\n");
    let back: Vec<Aliased> = from_str("| Amount |\n|---|\n| 2 |").unwrap();
    assert_eq!(back, vec![Aliased { value: 2.0 }]);
}
