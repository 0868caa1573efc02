use crate::fs::StagingBackend;
use crate::logging::{AuditSink, FactsEmitter};
use crate::policy::Policy;

/// Builder for constructing an `AtomicWriter` with ergonomic chaining.
/// Mirrors `AtomicWriter::new(...).with_*` but avoids duplication at call sites.
pub struct WriterBuilder<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
    policy: Policy,
    backend: Option<Box<dyn StagingBackend>>,
}

impl<E: FactsEmitter, A: AuditSink> WriterBuilder<E, A> {
    pub fn new(facts: E, audit: A) -> Self {
        Self {
            facts,
            audit,
            policy: Policy::default(),
            backend: None,
        }
    }

    #[must_use]
    pub fn policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn backend(mut self, backend: Box<dyn StagingBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn build(self) -> super::AtomicWriter<E, A> {
        let w = super::AtomicWriter::new(self.facts, self.audit, self.policy);
        match self.backend {
            Some(b) => w.with_backend(b),
            None => w,
        }
    }
}
