use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// SHA-256 fingerprint of a JSON value, as lowercase hex.
///
/// Object keys are serialized in sorted order, so two values that are equal as JSON always
/// share a fingerprint.
pub fn fingerprint(value: &Value) -> String {
    let canonical = canonical(value).to_string();
    hex::encode(Sha256::digest(canonical.as_bytes()))
}

fn canonical(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries = map.iter().collect::<Vec<_>>();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), canonical(v)))
                    .collect::<Map<_, _>>(),
            )
        }
        Value::Array(values) => Value::Array(values.iter().map(canonical).collect()),
        other => other.clone(),
    }
}
