use serde_json::Value;

use super::error::ModelError;
use crate::state_machine::ModelResult;

/// Confidence assumed when the model omits it or sends something non-numeric.
pub const DEFAULT_CONFIDENCE: f64 = 0.7;

/// Extract a [`ModelResult`] from raw assistant text.
///
/// The whole text is tried as JSON first; if that fails, the span from the
/// first `{` to the last `}` is tried instead. The value must be an object.
pub fn parse_model_output(raw: &str) -> Result<ModelResult, ModelError> {
    let value = match serde_json::from_str::<Value>(raw.trim()) {
        Ok(value) => value,
        Err(_) => extract_object(raw)?,
    };

    let Value::Object(map) = value else {
        return Err(ModelError::ParseError(
            "model did not return a JSON object".into(),
        ));
    };

    let text = map
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let confidence = map
        .get("confidence")
        .and_then(numeric)
        .unwrap_or(DEFAULT_CONFIDENCE);
    let title = map
        .get("title")
        .and_then(Value::as_str)
        .filter(|t| !t.trim().is_empty())
        .map(str::to_string);

    if !(0.0..=1.0).contains(&confidence) {
        tracing::warn!(confidence, "model confidence outside [0, 1], keeping raw value");
    }

    Ok(ModelResult {
        text,
        confidence,
        title,
    })
}

fn extract_object(raw: &str) -> Result<Value, ModelError> {
    let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) else {
        return Err(ModelError::ParseError("no JSON object found".into()));
    };
    if end <= start {
        return Err(ModelError::ParseError("no JSON object found".into()));
    }
    serde_json::from_str(&raw[start..=end]).map_err(|e| ModelError::ParseError(e.to_string()))
}

/// Numbers, or strings that parse as finite numbers.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}
