//! With `force`, whatever was written before the failure is committed and the
//! failure still reaches the caller.

use std::io::Write;

use atomwrite::WriteOptions;

use crate::common::{listing, test_writer, with_temp_root, BodyError};

#[test]
fn forced_session_commits_partial_content() {
    let (w, facts, audit) = test_writer();
    let td = with_temp_root();
    let out = td.path().join("out.txt");
    std::fs::write(&out, "old").unwrap();

    let res: Result<(), BodyError> =
        w.with_atomic_write(&out, "w", WriteOptions::new().force(true), |f| {
            f.write_text("partial")?;
            Err(BodyError::Injected("boom"))
        });

    assert!(matches!(res, Err(BodyError::Injected("boom"))));
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "partial");
    assert_eq!(listing(td.path()), vec!["out.txt".to_string()]);

    let stages = facts.stages();
    assert_eq!(
        stages.last().unwrap(),
        &("write.commit".to_string(), "success".to_string())
    );
    let evs = facts.events.lock().unwrap();
    assert_eq!(evs.last().unwrap().3["forced"], serde_json::json!(true));
    assert!(audit
        .lines
        .lock()
        .unwrap()
        .iter()
        .any(|(l, m)| *l == log::Level::Warn && m.contains("force-committing")));
}

#[test]
fn forced_drop_commits_exact_prefix() {
    let (w, _facts, _audit) = test_writer();
    let td = with_temp_root();
    let out = td.path().join("out.bin");
    std::fs::write(&out, b"previous content").unwrap();

    {
        let mut f = w.open(&out, "wb", WriteOptions::new().force(true)).unwrap();
        f.write_all(b"abc").unwrap();
        f.write_all(b"def").unwrap();
    }

    assert_eq!(std::fs::read(&out).unwrap(), b"abcdef");
    assert_eq!(listing(td.path()), vec!["out.bin".to_string()]);
}

#[test]
fn forced_session_with_nothing_written_truncates() {
    let (w, _facts, _audit) = test_writer();
    let td = with_temp_root();
    let out = td.path().join("out.txt");
    std::fs::write(&out, "old").unwrap();

    let res: Result<(), BodyError> = w.with_atomic_write(
        &out,
        "w",
        WriteOptions::new().force(true),
        |_f| Err(BodyError::Injected("before any write")),
    );

    assert!(res.is_err());
    assert_eq!(std::fs::read(&out).unwrap(), b"");
}

#[test]
fn abort_with_force_commits() {
    let (w, _facts, _audit) = test_writer();
    let td = with_temp_root();
    let out = td.path().join("a.txt");

    let mut f = w.open(&out, "w", WriteOptions::new().force(true)).unwrap();
    f.write_text("kept").unwrap();
    f.abort().unwrap();

    assert_eq!(std::fs::read_to_string(&out).unwrap(), "kept");
}
