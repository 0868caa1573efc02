//! Destination validation and staging placement.

use atomwrite::{ErrorKind, WriteOptions};

use crate::common::{listing, test_writer, with_temp_root};

#[test]
fn directory_target_is_invalid() {
    let (w, facts, _audit) = test_writer();
    let td = with_temp_root();
    std::fs::create_dir(td.path().join("sub")).unwrap();

    let err = w
        .open(td.path().join("sub"), "w", WriteOptions::default())
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::InvalidTarget);
    assert_eq!(listing(td.path()), vec!["sub".to_string()]);
    let evs = facts.events.lock().unwrap();
    assert_eq!(evs[0].3["error_id"], serde_json::json!("E_INVALID_TARGET"));
}

#[cfg(unix)]
#[test]
fn stream_and_device_paths_are_invalid() {
    let (w, _facts, _audit) = test_writer();
    for p in ["-", "/dev/stdout", "/dev/fd/1", "/proc/self/fd/2", "/dev/null"] {
        let err = w.open(p, "w", WriteOptions::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidTarget, "{p}");
    }
}

#[test]
fn missing_parent_is_staging_error() {
    let (w, facts, _audit) = test_writer();
    let td = with_temp_root();

    let err = w
        .open(td.path().join("nope/out.txt"), "w", WriteOptions::default())
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Io);
    assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
    assert!(listing(td.path()).is_empty());
    let evs = facts.events.lock().unwrap();
    assert_eq!(evs[0].3["error_id"], serde_json::json!("E_STAGING"));
}

#[test]
fn staging_lives_next_to_destination() {
    let (w, _facts, _audit) = test_writer();
    let td = with_temp_root();
    let out = td.path().join("report.csv");

    let f = w.open(&out, "w", WriteOptions::default()).unwrap();
    let staging = f.staging_path().to_path_buf();
    assert_eq!(staging.parent().unwrap(), td.path());
    let name = staging.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("report.csv."), "{name}");
    assert!(name.ends_with(atomwrite::constants::STAGING_SUFFIX), "{name}");
    assert_eq!(f.target(), out);
    drop(f);

    assert!(!staging.exists());
}

#[test]
fn relative_target_resolves_against_cwd() {
    let (w, _facts, _audit) = test_writer();
    let td = with_temp_root();
    let out = td.path().join(".").join("rel.txt");

    let f = w.open(&out, "w", WriteOptions::default()).unwrap();
    assert_eq!(f.target(), td.path().join("rel.txt"));
    f.commit().unwrap();
    assert!(td.path().join("rel.txt").exists());
}

#[cfg(unix)]
#[test]
fn symlinked_destination_is_replaced_not_followed() {
    let (w, _facts, _audit) = test_writer();
    let td = with_temp_root();
    let real = td.path().join("real.txt");
    let link = td.path().join("link.txt");
    std::fs::write(&real, "real").unwrap();
    std::os::unix::fs::symlink(&real, &link).unwrap();

    w.write_text(&link, "replaced").unwrap();

    assert_eq!(std::fs::read_to_string(&real).unwrap(), "real");
    assert!(!std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(std::fs::read_to_string(&link).unwrap(), "replaced");
}

#[cfg(unix)]
#[test]
fn symlink_to_directory_is_invalid() {
    let (w, _facts, _audit) = test_writer();
    let td = with_temp_root();
    std::fs::create_dir(td.path().join("d")).unwrap();
    std::os::unix::fs::symlink(td.path().join("d"), td.path().join("dl")).unwrap();

    let err = w
        .open(td.path().join("dl"), "w", WriteOptions::default())
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidTarget);
}

#[cfg(unix)]
#[test]
fn fifo_and_socket_targets_are_invalid() {
    let (w, _facts, _audit) = test_writer();
    let td = with_temp_root();
    let fifo = td.path().join("pipe");
    let status = std::process::Command::new("mkfifo")
        .arg(&fifo)
        .status()
        .expect("run mkfifo");
    assert!(status.success());
    let sock = td.path().join("sock");
    let _listener = std::os::unix::net::UnixListener::bind(&sock).unwrap();
    let before = listing(td.path());
    assert_eq!(before, vec!["pipe".to_string(), "sock".to_string()]);

    for p in [&fifo, &sock] {
        let err = w.open(p, "w", WriteOptions::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidTarget, "{}", p.display());
        assert_eq!(listing(td.path()), before);
    }
    let err = w.write_bytes(&fifo, b"never").unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidTarget);
    assert_eq!(listing(td.path()), before);
}
