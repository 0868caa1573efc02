//! Without `force`, a failing session leaves the destination and its directory untouched.

use std::io::Write;

use atomwrite::WriteOptions;

use crate::common::{listing, test_writer, with_temp_root, BodyError};

#[test]
fn body_error_keeps_old_content() {
    let (w, facts, _audit) = test_writer();
    let td = with_temp_root();
    let out = td.path().join("out.txt");
    std::fs::write(&out, "old").unwrap();
    let before = listing(td.path());

    let res: Result<(), BodyError> = w.with_atomic_write(&out, "w", WriteOptions::default(), |f| {
        f.write_text("partial")?;
        Err(BodyError::Injected("boom"))
    });

    assert!(matches!(res, Err(BodyError::Injected("boom"))));
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "old");
    assert_eq!(listing(td.path()), before);
    let stages = facts.stages();
    assert_eq!(stages.last().unwrap().0, "write.discard");
    assert_eq!(stages.last().unwrap().1, "success");
}

#[test]
fn error_at_any_point_leaves_no_trace() {
    let td = with_temp_root();
    let out = td.path().join("blob");
    std::fs::write(&out, b"0123456789").unwrap();

    for fail_after in 0..4 {
        let (w, _facts, _audit) = test_writer();
        let res: Result<(), BodyError> = w.with_atomic_write(&out, "wb", WriteOptions::default(), |f| {
            for i in 0..4 {
                if i == fail_after {
                    return Err(BodyError::Injected("mid-write"));
                }
                f.write_all(&[b'x'; 1000])?;
                f.flush()?;
            }
            Ok(())
        });
        assert!(res.is_err(), "fail_after={fail_after}");
        assert_eq!(std::fs::read(&out).unwrap(), b"0123456789");
        assert_eq!(listing(td.path()), vec!["blob".to_string()]);
    }
}

#[test]
fn missing_destination_stays_missing() {
    let (w, _facts, _audit) = test_writer();
    let td = with_temp_root();
    let out = td.path().join("new.txt");

    let res: Result<(), BodyError> = w.with_atomic_write(&out, "w", WriteOptions::default(), |f| {
        f.write_text("never visible")?;
        Err(BodyError::Injected("no"))
    });

    assert!(res.is_err());
    assert!(!out.exists());
    assert!(listing(td.path()).is_empty());
}

#[test]
fn dropped_handle_discards() {
    let (w, _facts, _audit) = test_writer();
    let td = with_temp_root();
    let out = td.path().join("out.txt");
    std::fs::write(&out, "old").unwrap();

    let staging = {
        let mut f = w.open(&out, "w", WriteOptions::default()).unwrap();
        f.write_text("partial").unwrap();
        f.flush().unwrap();
        assert!(f.staging_path().exists());
        f.staging_path().to_path_buf()
    };

    assert!(!staging.exists());
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "old");
    assert_eq!(listing(td.path()), vec!["out.txt".to_string()]);
}
