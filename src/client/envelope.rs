//! The backend's response envelope.
//!
//! Success: `{"status": "success", "data": {...}}`.
//! Failure: `{"status": "fail" | "error", "data"?: ..., "error"?: ...}`.
//! Member checks follow the backend's loose conventions: empty strings, zero,
//! `false` and `null` count as absent.

use serde_json::Value;

pub const STATUS_SUCCESS: &str = "success";

#[derive(Debug, Clone)]
pub struct Envelope {
    /// Body text exactly as received.
    pub raw: String,
    pub body: Value,
}

impl Envelope {
    pub fn parse(raw: String) -> Result<Self, serde_json::Error> {
        let body = serde_json::from_str(&raw)?;
        Ok(Self { raw, body })
    }

    fn member(&self, name: &str) -> Option<&Value> {
        self.body.get(name).filter(|v| is_present(v))
    }

    pub fn status(&self) -> Option<&Value> {
        self.member("status")
    }

    pub fn is_success(&self) -> bool {
        self.status().and_then(Value::as_str) == Some(STATUS_SUCCESS)
    }

    /// A status member is present and says something other than success.
    pub fn is_failure(&self) -> bool {
        self.status().is_some() && !self.is_success()
    }

    /// The body carries `data` or `error` worth showing to the operator.
    pub fn has_detail(&self) -> bool {
        self.member("data").is_some() || self.member("error").is_some()
    }

    pub fn data(&self) -> Option<&Value> {
        self.body.get("data")
    }

    /// Compact re-serialization of the body, used in error messages.
    pub fn compact(&self) -> String {
        self.body.to_string()
    }
}

pub fn is_present(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Outcome of an acknowledge-only call (delete, create): `Ok` on success,
/// otherwise the message `"<prefix>: <body>"` or just `<prefix>`.
pub fn acknowledge(raw: String, prefix: &str) -> Result<(), String> {
    match Envelope::parse(raw) {
        Ok(env) if env.is_success() => Ok(()),
        Ok(env) if env.has_detail() => Err(format!("{}: {}", prefix, env.compact())),
        _ => Err(prefix.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(s: &str) -> Envelope {
        Envelope::parse(s.to_string()).unwrap()
    }

    #[test]
    fn test_success_envelope() {
        let e = env(r#"{"status":"success","data":{"x":1}}"#);
        assert!(e.is_success());
        assert!(!e.is_failure());
        assert_eq!(e.data().unwrap()["x"], 1);
    }

    #[test]
    fn test_missing_status_is_not_failure() {
        let e = env(r#"{"data":{"accounts":[]}}"#);
        assert!(!e.is_success());
        assert!(!e.is_failure());
        let e = env(r#"{"status":"","data":{}}"#);
        assert!(!e.is_failure());
    }

    #[test]
    fn test_fail_envelope_detail() {
        let e = env(r#"{"status":"fail","error":"no such domain"}"#);
        assert!(e.is_failure());
        assert!(e.has_detail());
        let e = env(r#"{"status":"fail"}"#);
        assert!(!e.has_detail());
    }

    #[test]
    fn test_acknowledge_messages() {
        assert!(acknowledge(r#"{"status":"success"}"#.into(), "Deletion failed").is_ok());
        let msg = acknowledge(r#"{"status":"fail","error":"nope"}"#.into(), "Deletion failed").unwrap_err();
        assert!(msg.starts_with("Deletion failed: {"));
        assert!(msg.contains(r#""error":"nope""#));
        assert_eq!(
            acknowledge(r#"{"status":"fail"}"#.into(), "Deletion failed").unwrap_err(),
            "Deletion failed"
        );
        assert_eq!(
            acknowledge("<html>oops</html>".into(), "Deletion failed").unwrap_err(),
            "Deletion failed"
        );
    }
}
