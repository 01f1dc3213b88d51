//! Kaspi payload signatures.
//!
//! The signature covers every top-level field except `signature` itself:
//! keys sorted ascending, rendered as `key=value`, joined with `&`, with the
//! merchant secret appended, hashed with SHA-256 and hex encoded.
//!
//! Values are rendered the way the gateway's reference client interpolates
//! them into a string: strings raw, `null` literally, arrays comma-joined and
//! nested objects as `[object Object]`.

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Name of the field carrying the signature inside a payload.
pub const SIGNATURE_FIELD: &str = "signature";

/// Signs and verifies gateway payloads with the merchant secret.
#[derive(Clone)]
pub struct PayloadSigner {
    secret: SecretString,
}

impl std::fmt::Debug for PayloadSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadSigner").finish_non_exhaustive()
    }
}

impl PayloadSigner {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Computes the lowercase hex signature for `payload`.
    pub fn sign(&self, payload: &Map<String, Value>) -> String {
        let mut hasher = Sha256::new();
        hasher.update(canonical_string(payload).as_bytes());
        hasher.update(self.secret.expose_secret().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Adds a `signature` field computed over the rest of `payload`.
    pub fn attach_signature(&self, payload: &mut Map<String, Value>) {
        let signature = self.sign(payload);
        payload.insert(SIGNATURE_FIELD.to_string(), Value::String(signature));
    }

    /// Checks `signature` against the expected one in constant time.
    pub fn verify(&self, payload: &Map<String, Value>, signature: &str) -> bool {
        let expected = self.sign(payload);
        constant_time_compare(expected.as_bytes(), signature.as_bytes())
    }
}

/// The string that gets hashed, minus the secret.
pub fn canonical_string(payload: &Map<String, Value>) -> String {
    let mut keys: Vec<&String> = payload
        .keys()
        .filter(|k| k.as_str() != SIGNATURE_FIELD)
        .collect();
    keys.sort();

    keys.iter()
        .map(|k| format!("{}={}", k, render_value(&payload[k.as_str()])))
        .collect::<Vec<_>>()
        .join("&")
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => render_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_array_item)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

// Array joins render null as an empty string.
fn render_array_item(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => render_value(other),
    }
}

fn render_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{}", f as i128),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
