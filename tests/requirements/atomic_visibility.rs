//! Readers observe the old content or the new content in full, never a mix.

use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use atomwrite::WriteOptions;

use crate::common::{listing, test_writer, with_temp_root};

const LEN: usize = 64 * 1024;

#[test]
fn concurrent_reader_never_sees_mixed_content() {
    let (w, _facts, _audit) = test_writer();
    let td = with_temp_root();
    let out = td.path().join("data.bin");
    let old = vec![b'a'; LEN];
    let new = vec![b'b'; LEN];
    std::fs::write(&out, &old).unwrap();

    let done = AtomicBool::new(false);
    let reads = AtomicUsize::new(0);
    std::thread::scope(|s| {
        s.spawn(|| {
            while !done.load(Ordering::Acquire) {
                let got = std::fs::read(&out).unwrap();
                assert!(got == old || got == new, "observed {} mixed bytes", got.len());
                reads.fetch_add(1, Ordering::Relaxed);
            }
        });

        let mut f = w
            .open(&out, "wb", WriteOptions::new().buffer_capacity(0))
            .unwrap();
        for chunk in new.chunks(4096) {
            f.write_all(chunk).unwrap();
            std::thread::sleep(Duration::from_millis(1));
            // Until commit, the destination still holds the old bytes.
            assert_eq!(std::fs::read(&out).unwrap(), old);
        }
        f.commit().unwrap();
        done.store(true, Ordering::Release);
    });

    assert!(reads.load(Ordering::Relaxed) > 0);
    assert_eq!(std::fs::read(&out).unwrap(), new);
    assert_eq!(listing(td.path()), vec!["data.bin".to_string()]);
}

#[cfg(unix)]
#[test]
fn handle_opened_before_commit_keeps_old_content() {
    let (w, _facts, _audit) = test_writer();
    let td = with_temp_root();
    let out = td.path().join("out.txt");
    std::fs::write(&out, "old").unwrap();

    let mut reader = std::fs::File::open(&out).unwrap();
    w.write_text(&out, "new").unwrap();

    let mut s = String::new();
    reader.read_to_string(&mut s).unwrap();
    assert_eq!(s, "old");
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "new");
}
