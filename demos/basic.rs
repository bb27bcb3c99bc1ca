//! Parse and evaluate a small rule program in one call.
//!
//! Run with: `cargo run --example basic`

use std::collections::HashMap;

use edict::{Function, Value, run};

fn main() {
    let mut funcs = HashMap::new();
    funcs.insert(
        "now".to_owned(),
        Function::new(0, |_: &[Value]| Ok(Value::Number(2_000_000.0))),
    );
    funcs.insert(
        "days".to_owned(),
        Function::new(1, |args: &[Value]| match args[0] {
            Value::Number(n) => Ok(Value::Number(n * 24.0 * 60.0 * 60.0)),
            ref other => Err(format!("days() wants a number, got {other}").into()),
        }),
    );

    let inputs: HashMap<String, Value> =
        [("registered_date".to_owned(), Value::Number(1_000.0))].into();
    let outputs: HashMap<String, Value> =
        [("plan_name".to_owned(), Value::String("premium_1".to_owned()))].into();

    let rules = [
        "now() > registered_date + days(14) && plan_name == \"premium_1\" | plan_name = \"free\"",
        "plan_name == \"free\" | feature_1 = true",
    ];

    match run(&rules, funcs, inputs, outputs) {
        Ok(result) => {
            let mut names: Vec<&String> = result.keys().collect();
            names.sort();
            for name in names {
                println!("{name} = {}", result[name]);
            }
        }
        Err(err) => eprintln!("rule evaluation failed: {err}"),
    }
}
