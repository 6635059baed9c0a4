//! Behavioural checks for query key building through the public API.

use pitch_hub::{build_key, serialize_params, ParamValue, QueryKey, QueryParams};
use std::collections::HashMap;

#[test]
fn test_equal_sets_serialize_identically_regardless_of_construction() {
    let from_builder = QueryParams::new()
        .with("status", "open")
        .with("page", 3)
        .with("archived", false);

    let mut map = HashMap::new();
    map.insert("archived", ParamValue::Bool(false));
    map.insert("page", ParamValue::Integer(3));
    map.insert("status", ParamValue::from("open"));
    map.insert("owner", ParamValue::Null);
    let from_hash_map: QueryParams = map.into_iter().collect();

    let from_json = QueryParams::try_from(serde_json::json!({
        "page": 3,
        "status": "open",
        "archived": false
    }))
    .unwrap();

    let expected = serialize_params(Some(&from_builder)).unwrap();
    assert_eq!(serialize_params(Some(&from_hash_map)).unwrap(), expected);
    assert_eq!(serialize_params(Some(&from_json)).unwrap(), expected);
    assert_eq!(
        expected.as_deref(),
        Some(r#"{"archived":false,"page":3,"status":"open"}"#)
    );
}

#[test]
fn test_absent_inputs_have_no_fragment() {
    assert_eq!(serialize_params(None).unwrap(), None);
    assert_eq!(serialize_params(Some(&QueryParams::new())).unwrap(), None);
    let all_null = QueryParams::new()
        .with("a", ParamValue::Null)
        .with("b", None::<i64>);
    assert_eq!(serialize_params(Some(&all_null)).unwrap(), None);
}

#[test]
fn test_serialization_is_repeatable() {
    let params = QueryParams::new().with("q", "deck").with("limit", 25);
    let first = serialize_params(Some(&params)).unwrap();
    let second = serialize_params(Some(&params)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_integer_and_integral_float_share_a_fragment() {
    let int = QueryParams::new().with("page", 2);
    let float = QueryParams::new().with("page", 2.0);
    assert_eq!(
        serialize_params(Some(&int)).unwrap(),
        serialize_params(Some(&float)).unwrap()
    );
}

#[test]
fn test_strings_are_json_escaped() {
    let params = QueryParams::new().with("q", "say \"hi\"\n");
    assert_eq!(
        serialize_params(Some(&params)).unwrap().as_deref(),
        Some(r#"{"q":"say \"hi\"\n"}"#)
    );
}

#[test]
fn test_build_key_shapes() {
    assert_eq!(
        build_key(["a", "b"], None).unwrap(),
        QueryKey::from(["a", "b"])
    );

    let params = QueryParams::new().with("x", 1);
    let key = build_key(["a", "b"], Some(&params)).unwrap();
    let expected_tail = serialize_params(Some(&params)).unwrap().unwrap();
    assert_eq!(key.tokens(), &["a".to_string(), "b".to_string(), expected_tail]);

    let empty = QueryParams::new().with("x", None::<i32>);
    assert_eq!(
        build_key(["a", "b"], Some(&empty)).unwrap(),
        QueryKey::from(["a", "b"])
    );
}

#[test]
fn test_build_key_leaves_base_untouched() {
    let base = QueryKey::from(["proposals"]);
    let params = QueryParams::new().with("page", 1);
    let key = base.with_params(Some(&params)).unwrap();
    assert_eq!(base.len(), 1);
    assert_eq!(key.len(), 2);
    assert!(key.starts_with(&base));
}

#[test]
fn test_non_finite_values_are_rejected_not_guessed() {
    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let params = QueryParams::new().with("ratio", bad);
        let err = serialize_params(Some(&params)).unwrap_err();
        assert!(err.is_validation(), "{bad} should be rejected");
        assert!(build_key(["x"], Some(&params)).is_err());
    }
}

#[test]
fn test_concurrent_callers_agree() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                let mut params = QueryParams::new();
                // vary insertion order per thread
                if i % 2 == 0 {
                    params.insert("a", 1);
                    params.insert("b", "two");
                } else {
                    params.insert("b", "two");
                    params.insert("a", 1);
                }
                serialize_params(Some(&params)).unwrap()
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_neighbouring_large_unsigned_values_get_distinct_keys() {
    let max = QueryParams::new().with("cursor", u64::MAX);
    let below = QueryParams::new().with("cursor", u64::MAX - 1);
    assert_ne!(
        build_key(["x"], Some(&max)).unwrap(),
        build_key(["x"], Some(&below)).unwrap()
    );
    assert_eq!(
        serialize_params(Some(&max)).unwrap().as_deref(),
        Some(r#"{"cursor":18446744073709551615}"#)
    );

    let from_json_max =
        QueryParams::try_from(serde_json::json!({"id": 18446744073709551615u64})).unwrap();
    let from_json_below =
        QueryParams::try_from(serde_json::json!({"id": 18446744073709551614u64})).unwrap();
    assert_ne!(
        serialize_params(Some(&from_json_max)).unwrap(),
        serialize_params(Some(&from_json_below)).unwrap()
    );
}
