use std::collections::HashMap;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use edict::{Evaluator, Function, Value, parse};

fn plan_rules() -> Vec<String> {
    vec![
        "now() > registered_date + days(14) && plan_name == \"premium_1\" | plan_name = \"free\""
            .to_owned(),
        "plan_name == \"free\" | feature_1 = true".to_owned(),
        "sales_amount > 1000000 | tier = 2, bonus = sales_amount / 100".to_owned(),
    ]
}

fn plan_funcs() -> HashMap<String, Function> {
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
    funcs
}

fn plan_inputs() -> HashMap<String, Value> {
    [
        ("registered_date".to_owned(), Value::Number(1_000.0)),
        ("sales_amount".to_owned(), Value::Number(2_000_000.0)),
    ]
    .into()
}

fn plan_outputs() -> HashMap<String, Value> {
    [("plan_name".to_owned(), Value::String("premium_1".to_owned()))].into()
}

fn bench_parse(c: &mut Criterion) {
    let lines = plan_rules();
    let funcs = plan_funcs();
    let inputs = plan_inputs();
    let outputs = plan_outputs();

    c.bench_function("parse_plan_rules", |b| {
        b.iter(|| parse(black_box(&lines), &funcs, &inputs, &outputs).unwrap());
    });
}

fn bench_eval(c: &mut Criterion) {
    let lines = plan_rules();
    let funcs = plan_funcs();
    let inputs = plan_inputs();
    let outputs = plan_outputs();

    let engine = parse(&lines, &funcs, &inputs, &outputs).unwrap();
    let evaluator = Evaluator::new(funcs, inputs, outputs);

    c.bench_function("eval_plan_rules", |b| {
        b.iter(|| evaluator.eval(black_box(&engine)).unwrap());
    });
}

criterion_group!(benches, bench_parse, bench_eval);
criterion_main!(benches);
