//! Parse a rule program once, persist it as an ASCII string, and evaluate
//! the restored copy.
//!
//! Run with: `cargo run --example persistence`

use std::collections::HashMap;

use edict::{Evaluator, Value, deserialize, parse, serialize};

fn main() {
    let inputs: HashMap<String, Value> = [("a".to_owned(), Value::Number(7.0))].into();
    let outputs: HashMap<String, Value> = [("x".to_owned(), Value::Number(0.0))].into();

    let engine = parse(
        &["a > 5 | x = a * 2 + 1"],
        &HashMap::new(),
        &inputs,
        &outputs,
    )
    .expect("program should parse");

    let blob = serialize(&engine).expect("program should serialize");
    println!("serialized program: {} ASCII bytes", blob.len());

    let restored = deserialize(&blob).expect("blob should deserialize");
    assert_eq!(restored, engine);

    let evaluator = Evaluator::new(HashMap::new(), inputs, outputs);
    let result = evaluator.eval(&restored).expect("program should evaluate");
    println!("x = {}", result["x"]);
}
