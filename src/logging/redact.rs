use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub const TS_ZERO: &str = "1970-01-01T00:00:00Z";

pub fn now_iso() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| TS_ZERO.to_string())
}

/// Return a timestamp for facts emission: constant zero when redacting, else now.
pub fn ts_for(redact: bool) -> String {
    if redact {
        TS_ZERO.to_string()
    } else {
        now_iso()
    }
}

/// Apply redactions to a fact event for comparison and safe logging.
/// Zeroes timestamps, removes timings and hashes, and masks the values that
/// differ on every run (session id, random staging name).
pub fn redact_event(mut v: Value) -> Value {
    if let Some(obj) = v.as_object_mut() {
        obj.insert("ts".into(), Value::String(TS_ZERO.to_string()));
        obj.remove("duration_ms");
        obj.remove("fsync_ms");
        obj.remove("severity");
        obj.remove("content_hash");
        for key in ["write_id", "staging"] {
            if obj.contains_key(key) {
                obj.insert(key.into(), Value::String("***".into()));
            }
        }
    }
    v
}
