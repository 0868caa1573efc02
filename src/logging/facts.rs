use log::Level;
use serde_json::Value;

/// Receives structured facts (one JSON object per session stage).
pub trait FactsEmitter {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value);
}

/// Receives human-readable audit lines.
pub trait AuditSink {
    fn log(&self, level: Level, msg: &str);
}

/// Discards everything; the default sink.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonlSink;

impl FactsEmitter for JsonlSink {
    fn emit(&self, _subsystem: &str, _event: &str, _decision: &str, _fields: Value) {}
}

impl AuditSink for JsonlSink {
    fn log(&self, _level: Level, _msg: &str) {}
}

/// Forwards facts and audit lines to the `log` facade under the `atomwrite` target.
///
/// Facts are logged at DEBUG as a single JSON line, except failures which go to WARN.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl FactsEmitter for LogSink {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value) {
        let level = if decision == "failure" {
            Level::Warn
        } else {
            Level::Debug
        };
        log::log!(target: "atomwrite", level, "{subsystem} {event} {decision} {fields}");
    }
}

impl AuditSink for LogSink {
    fn log(&self, level: Level, msg: &str) {
        log::log!(target: "atomwrite", level, "{msg}");
    }
}
