//! Integration tests for the storekeeper-core literal codec.
//!
//! These tests go through the public API only: build a mapping with the
//! navigator, render it with the writer, and load it back with the reader.

use storekeeper_core::{
    navigator, parse_document, render, LiteralError, Map, PathExpr, Value, MAX_DEPTH,
};

/// Renders `map` and parses the result, asserting the text is accepted.
fn roundtrip(map: &Map) -> Map {
    let text = render(map);
    parse_document(&text).expect("rendered document must parse")
}

fn set(map: &mut Map, path: &str, value: impl Into<Value>) {
    let path = PathExpr::parse(path, '.').expect("valid path");
    navigator::write(map, &path, value.into());
}

#[test]
fn test_roundtrip_reference_configuration() {
    // Arrange: {string: 'value1', array: {index1: 'value1', subarray: {index1: 'value1'}}, boolean: true}
    let mut original = Map::new();
    set(&mut original, "string", "value1");
    set(&mut original, "array.index1", "value1");
    set(&mut original, "array.subarray.index1", "value1");
    set(&mut original, "boolean", true);

    // Act
    let loaded = roundtrip(&original);

    // Assert: same keys, same order, same values
    assert_eq!(loaded, original);
    let keys: Vec<&str> = loaded.keys().map(String::as_str).collect();
    assert_eq!(keys, ["string", "array", "boolean"]);
}

#[test]
fn test_roundtrip_every_value_kind() {
    let mut original = Map::new();
    set(&mut original, "null", Value::Null);
    set(&mut original, "yes", true);
    set(&mut original, "no", false);
    set(&mut original, "zero", 0i64);
    set(&mut original, "min", i64::MIN);
    set(&mut original, "max", i64::MAX);
    set(&mut original, "whole_float", 3.0f64);
    set(&mut original, "fraction", -0.125f64);
    set(&mut original, "huge", 1.5e300f64);
    set(&mut original, "tiny", 2.5e-12f64);
    set(&mut original, "inf", f64::INFINITY);
    set(&mut original, "neg_inf", f64::NEG_INFINITY);
    set(&mut original, "empty_string", "");
    set(&mut original, "unicode", "naïve → ☃");
    set(&mut original, "multiline", "line one\nline two");
    set(&mut original, "double_quote", "say \"hi\"");
    set(&mut original, "empty_map", Map::new());

    assert_eq!(roundtrip(&original), original);
}

#[test]
fn test_roundtrip_deep_nesting() {
    let mut original = Map::new();
    set(&mut original, "a.b.c.d.e.f.g.h", "deep");
    set(&mut original, "a.b.sibling", 1i64);
    set(&mut original, "a.b.c.other", false);

    let loaded = roundtrip(&original);

    assert_eq!(loaded, original);
    let path = PathExpr::parse("a.b.c.d.e.f.g.h", '.').unwrap();
    assert_eq!(navigator::read(&loaded, &path), Ok(&Value::from("deep")));
}

#[test]
fn test_roundtrip_keys_with_spaces_and_symbols() {
    let mut original = Map::new();
    original.insert("with space".to_string(), Value::Int(1));
    original.insert("dash-and_underscore".to_string(), Value::Int(2));
    original.insert("123".to_string(), Value::Int(3));
    original.insert(String::new(), Value::Int(4));

    assert_eq!(roundtrip(&original), original);
}

#[test]
fn test_rendering_is_stable_across_roundtrips() {
    let mut original = Map::new();
    set(&mut original, "server.host", "localhost");
    set(&mut original, "server.port", 8080i64);
    set(&mut original, "debug", false);

    let first = render(&original);
    let second = render(&parse_document(&first).unwrap());

    assert_eq!(first, second);
}

#[test]
fn test_single_quote_in_string_is_a_known_limitation() {
    // The writer does not escape quotes, so the rendered document is malformed.
    let mut original = Map::new();
    set(&mut original, "quote", "it's");

    assert!(parse_document(&render(&original)).is_err());
}

/// A path of `segments` keys, `k0.k1...`.
fn deep_path(segments: usize) -> String {
    (0..segments)
        .map(|i| format!("k{i}"))
        .collect::<Vec<_>>()
        .join(".")
}

#[test]
fn test_roundtrip_at_max_depth() {
    // Arrange: the top-level mapping plus MAX_DEPTH - 1 nested ones
    let mut original = Map::new();
    set(&mut original, &deep_path(MAX_DEPTH), "leaf");

    // Act
    let loaded = roundtrip(&original);

    // Assert
    assert_eq!(loaded, original);
}

#[test]
fn test_rendered_document_beyond_max_depth_fails_to_load() {
    let mut original = Map::new();
    set(&mut original, &deep_path(MAX_DEPTH + 1), "leaf");

    let result = parse_document(&render(&original));

    assert!(matches!(result, Err(LiteralError::TooDeep { .. })));
}
