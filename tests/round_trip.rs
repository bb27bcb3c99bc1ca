use std::collections::HashMap;

use edict::{DeserializeError, Evaluator, Function, Value, deserialize, parse, serialize};

fn values(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_owned(), value.clone()))
        .collect()
}

#[test]
fn serialize_then_deserialize_is_identity() {
    let mut funcs = HashMap::new();
    funcs.insert(
        "clamp".to_owned(),
        Function::new(1, |args: &[Value]| Ok(args[0].clone())),
    );
    let inputs = values(&[("a", Value::Number(1.0)), ("s", Value::String("x".into()))]);
    let outputs = values(&[("x", Value::Number(0.0)), ("flag", Value::Bool(false))]);

    let programs: Vec<Vec<&str>> = vec![
        vec!["x = 1"],
        vec!["a > 5 | x = a * 2"],
        vec!["s == \"x\" && a >= 1 | flag = true, x = clamp(a) + 1"],
        vec!["!a | x = 9 % 4", "x == 1 | flag = true"],
    ];

    for lines in programs {
        let engine = parse(&lines, &funcs, &inputs, &outputs)
            .unwrap_or_else(|err| panic!("parse failed for {lines:?}: {err}"));
        let encoded = serialize(&engine).unwrap();
        let decoded = deserialize(&encoded).unwrap();
        assert_eq!(decoded, engine, "round trip changed the AST for {lines:?}");
    }
}

#[test]
fn deserialized_program_evaluates_like_the_original() {
    let inputs = values(&[("a", Value::Number(7.0))]);
    let outputs = values(&[("x", Value::Number(0.0))]);
    let engine = parse(
        &["a > 5 | x = a * 2 + 1"],
        &HashMap::new(),
        &inputs,
        &outputs,
    )
    .unwrap();

    let restored = deserialize(&serialize(&engine).unwrap()).unwrap();

    let direct = Evaluator::new(HashMap::new(), inputs.clone(), outputs.clone())
        .eval(&engine)
        .unwrap();
    let roundabout = Evaluator::new(HashMap::new(), inputs, outputs)
        .eval(&restored)
        .unwrap();
    assert_eq!(direct, roundabout);
    assert_eq!(direct["x"], Value::Number(15.0));
}

#[test]
fn blob_is_ascii_and_opaque() {
    let engine = parse(
        &["x = \"naïve déjà vu\""],
        &HashMap::new(),
        &HashMap::new(),
        &HashMap::new(),
    )
    .unwrap();
    let encoded = serialize(&engine).unwrap();
    assert!(encoded.is_ascii());
    assert_eq!(deserialize(&encoded).unwrap(), engine);
}

#[test]
fn garbage_input_is_rejected() {
    assert!(matches!(
        deserialize("!!! not a blob !!!"),
        Err(DeserializeError::Armor(_))
    ));
    // Valid armor, nonsense contents.
    assert!(deserialize("AAAABBBBCCCCDDDD").is_err());
}
