// Audit helpers that emit facts for the stages of a write session.
//
// Side-effects:
// - Emits JSON facts via `FactsEmitter` for `write.attempt`, `write.commit` and `write.discard`.
// - Ensures a minimal envelope is present on every fact: `schema_version`, `ts`, `write_id`,
//   `path`, `stage`, `decision`.
// - Applies redaction when the policy asks for it.
use serde_json::{json, Value};

use crate::constants::{SCHEMA_VERSION, SUBSYSTEM};
use crate::logging::{redact_event, ts_for, FactsEmitter};

/// Per-session emission context.
pub struct AuditCtx<'a> {
    pub facts: &'a dyn FactsEmitter,
    pub write_id: String,
    pub path: String,
    pub redact: bool,
}

impl<'a> AuditCtx<'a> {
    pub fn new(facts: &'a dyn FactsEmitter, write_id: String, path: String, redact: bool) -> Self {
        Self {
            facts,
            write_id,
            path,
            redact,
        }
    }
}

/// Stage for typed audit emission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    WriteAttempt,
    WriteCommit,
    WriteDiscard,
}

impl Stage {
    #[must_use]
    pub const fn as_event(&self) -> &'static str {
        match self {
            Stage::WriteAttempt => "write.attempt",
            Stage::WriteCommit => "write.commit",
            Stage::WriteDiscard => "write.discard",
        }
    }
}

/// Decision severity for audit events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Success,
    Failure,
    Warn,
}

impl Decision {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Decision::Success => "success",
            Decision::Failure => "failure",
            Decision::Warn => "warn",
        }
    }
}

/// Builder facade over audit emission with centralized envelope+redaction.
pub struct StageLogger<'a> {
    ctx: &'a AuditCtx<'a>,
}

impl<'a> StageLogger<'a> {
    pub fn new(ctx: &'a AuditCtx<'a>) -> Self {
        Self { ctx }
    }

    pub fn attempt(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::WriteAttempt)
    }

    pub fn commit(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::WriteCommit)
    }

    pub fn discard(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::WriteDiscard)
    }
}

pub struct EventBuilder<'a> {
    ctx: &'a AuditCtx<'a>,
    stage: Stage,
    fields: serde_json::Map<String, Value>,
}

impl<'a> EventBuilder<'a> {
    fn new(ctx: &'a AuditCtx<'a>, stage: Stage) -> Self {
        let mut fields = serde_json::Map::new();
        fields.insert("stage".to_string(), json!(stage.as_event()));
        Self { ctx, stage, fields }
    }

    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn merge(mut self, extra: Value) -> Self {
        if let Some(obj) = extra.as_object() {
            for (k, v) in obj {
                self.fields.insert(k.clone(), v.clone());
            }
        }
        self
    }

    pub fn emit(self, decision: Decision) {
        let mut fields = Value::Object(self.fields);
        if let Some(obj) = fields.as_object_mut() {
            obj.entry("decision").or_insert(json!(decision.as_str()));
            obj.entry("schema_version").or_insert(json!(SCHEMA_VERSION));
            obj.entry("ts").or_insert(json!(ts_for(self.ctx.redact)));
            obj.entry("write_id").or_insert(json!(self.ctx.write_id));
            obj.entry("path").or_insert(json!(self.ctx.path));
        }
        let out = if self.ctx.redact {
            redact_event(fields)
        } else {
            fields
        };
        self.ctx
            .facts
            .emit(SUBSYSTEM, self.stage.as_event(), decision.as_str(), out);
    }

    pub fn emit_success(self) {
        self.emit(Decision::Success);
    }

    pub fn emit_failure(self) {
        self.emit(Decision::Failure);
    }

    pub fn emit_warn(self) {
        self.emit(Decision::Warn);
    }
}
