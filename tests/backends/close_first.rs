//! The close-before-rename backend keeps the same guarantees as the default.

use atomwrite::fs::CloseFirst;
use atomwrite::logging::JsonlSink;
use atomwrite::policy::Policy;
use atomwrite::{WriteOptions, WriterBuilder};

use crate::common::{listing, with_temp_root, BodyError, TestEmitter};

fn close_first_writer() -> atomwrite::AtomicWriter<TestEmitter, JsonlSink> {
    WriterBuilder::new(TestEmitter::default(), JsonlSink)
        .policy(Policy::default())
        .backend(Box::new(CloseFirst))
        .build()
}

#[test]
fn builder_installs_backend() {
    let w = close_first_writer();
    assert_eq!(w.backend().name(), "close_first");
}

#[test]
fn commit_replaces() {
    let w = close_first_writer();
    let td = with_temp_root();
    let out = td.path().join("out.txt");
    std::fs::write(&out, "old").unwrap();

    w.write_text(&out, "new").unwrap();

    assert_eq!(std::fs::read_to_string(&out).unwrap(), "new");
    assert_eq!(listing(td.path()), vec!["out.txt".to_string()]);
}

#[test]
fn error_without_force_keeps_old() {
    let w = close_first_writer();
    let td = with_temp_root();
    let out = td.path().join("out.txt");
    std::fs::write(&out, "old").unwrap();

    let res: Result<(), BodyError> = w.with_atomic_write(&out, "w", WriteOptions::default(), |f| {
        f.write_text("partial")?;
        Err(BodyError::Injected("boom"))
    });

    assert!(res.is_err());
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "old");
    assert_eq!(listing(td.path()), vec!["out.txt".to_string()]);
}

#[test]
fn error_with_force_commits_partial() {
    let w = close_first_writer();
    let td = with_temp_root();
    let out = td.path().join("out.txt");
    std::fs::write(&out, "old").unwrap();

    let res: Result<(), BodyError> =
        w.with_atomic_write(&out, "w", WriteOptions::new().force(true), |f| {
            f.write_text("partial")?;
            Err(BodyError::Injected("boom"))
        });

    assert!(matches!(res, Err(BodyError::Injected(_))));
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "partial");
    assert_eq!(listing(td.path()), vec!["out.txt".to_string()]);
}
