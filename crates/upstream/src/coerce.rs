//! Numeric coercion for provider stat payloads.
//!
//! Providers ship counting stats as a mix of integers and integer-shaped
//! strings. Where an integer was requested: integers and `-?[0-9]+` strings
//! become integers, null and missing stay null, and anything else passes
//! through unchanged rather than being silently zeroed.

use serde_json::Value;

/// Coerce one value according to the integer policy.
pub fn coerce_int(value: Option<&Value>) -> Value {
    match value {
        None | Some(Value::Null) => Value::Null,
        Some(Value::Number(n)) if n.is_i64() || n.is_u64() => Value::Number(n.clone()),
        Some(Value::String(s)) if is_integer_shaped(s) => match s.parse::<i64>() {
            Ok(parsed) => Value::from(parsed),
            Err(_) => Value::String(s.clone()),
        },
        Some(other) => other.clone(),
    }
}

fn is_integer_shaped(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);

    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// The integer-typed samples among `values`, in order.
pub fn int_samples<'a>(values: impl IntoIterator<Item = &'a Value>) -> Vec<i64> {
    values.into_iter().filter_map(Value::as_i64).collect()
}

/// Innings pitched in baseball thirds notation: `"5.2"` is five and two
/// thirds innings. Returns total outs, or `None` for anything unparseable.
pub fn innings_to_outs(value: &Value) -> Option<i64> {
    let raw = match value {
        Value::String(s) => s.as_str(),
        Value::Number(n) => return n.as_f64().map(|ip| (ip.trunc() as i64) * 3 + ((ip.fract() * 10.0).round() as i64)),
        _ => return None,
    };

    let (whole, outs) = match raw.split_once('.') {
        Some((whole, frac)) => (whole, frac.parse::<i64>().ok()?),
        None => (raw, 0),
    };

    if outs > 2 {
        return None;
    }

    Some(whole.parse::<i64>().ok()? * 3 + outs)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn integer_shaped_strings_become_integers() {
        assert_eq!(coerce_int(Some(&json!("12"))), json!(12));
        assert_eq!(coerce_int(Some(&json!("-3"))), json!(-3));
        assert_eq!(coerce_int(Some(&json!(7))), json!(7));
    }

    #[test]
    fn missing_and_null_stay_null() {
        assert_eq!(coerce_int(None), Value::Null);
        assert_eq!(coerce_int(Some(&Value::Null)), Value::Null);
    }

    #[test]
    fn non_integers_pass_through_unchanged() {
        assert_eq!(coerce_int(Some(&json!(".367"))), json!(".367"));
        assert_eq!(coerce_int(Some(&json!("5.2"))), json!("5.2"));
        assert_eq!(coerce_int(Some(&json!(0.5))), json!(0.5));
        assert_eq!(coerce_int(Some(&json!(true))), json!(true));
    }

    #[test]
    fn samples_keep_only_integers() {
        let values = [json!(2), json!("x"), Value::Null, json!(3)];

        assert_eq!(int_samples(values.iter()), vec![2, 3]);
    }

    #[test]
    fn innings_use_thirds_notation() {
        assert_eq!(innings_to_outs(&json!("5.2")), Some(17));
        assert_eq!(innings_to_outs(&json!("6")), Some(18));
        assert_eq!(innings_to_outs(&json!("0.1")), Some(1));
        assert_eq!(innings_to_outs(&json!("4.7")), None);
        assert_eq!(innings_to_outs(&json!(null)), None);
    }
}
