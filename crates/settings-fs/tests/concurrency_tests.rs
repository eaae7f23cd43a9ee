//! Concurrent access tests for write_atomic locking

use settings_fs::{NormalizedPath, RobustnessConfig, io};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_concurrent_writes_no_corruption() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("cypress.json");
    let path = Arc::new(NormalizedPath::new(&file_path));

    let num_threads = 8;
    let writes_per_thread = 10;
    let barrier = Arc::new(Barrier::new(num_threads));

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let path = Arc::clone(&path);
            let barrier = Arc::clone(&barrier);

            thread::spawn(move || {
                barrier.wait();
                for i in 0..writes_per_thread {
                    let content = format!("{{\"writer\": \"{}-{}\"}}\n", thread_id, i);
                    // A lock timeout is acceptable; a torn file is not.
                    let _ = io::write_text(&path, &content);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread should not panic");
    }

    let content = std::fs::read_to_string(&file_path).unwrap();
    let parsed: serde_json::Value =
        serde_json::from_str(&content).expect("file must hold one complete write");
    assert!(parsed["writer"].is_string());
    assert_eq!(content.matches("writer").count(), 1);
}

#[test]
fn test_lock_timeout_is_respected() {
    use fs2::FileExt;

    let dir = tempdir().unwrap();
    let file_path = dir.path().join("locked.json");
    let lock_path = format!("{}.lock", file_path.display());

    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)
        .unwrap();
    lock_file.lock_exclusive().unwrap();

    let path = NormalizedPath::new(&file_path);
    let config = RobustnessConfig {
        lock_timeout: Duration::from_millis(300),
        enable_fsync: false,
    };

    let result = io::write_atomic(&path, b"{}", config);

    drop(lock_file);

    assert!(
        matches!(result, Err(settings_fs::Error::LockFailed { .. })),
        "Write should fail while the lock is held, got {result:?}"
    );
    assert!(!file_path.exists());
}

/// One holder unlinks the sidecar and unlocks while a writer waits on the old
/// inode and another holder has already locked a fresh sidecar. The waiting
/// writer must not proceed until the fresh sidecar is released.
#[cfg(unix)]
#[test]
fn test_waiter_on_unlinked_sidecar_respects_new_holder() {
    use fs2::FileExt;
    use std::fs::{self, OpenOptions};
    use std::time::Instant;

    let dir = tempdir().unwrap();
    let file_path = dir.path().join("cypress.json");
    let lock_path = dir.path().join("cypress.json.lock");
    let open_sidecar = || {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .unwrap()
    };

    let first_holder = open_sidecar();
    first_holder.lock_exclusive().unwrap();

    let path = NormalizedPath::new(&file_path);
    let waiter = thread::spawn(move || {
        let config = RobustnessConfig {
            lock_timeout: Duration::from_secs(10),
            enable_fsync: false,
        };
        io::write_atomic(&path, b"{\"writer\": \"waiter\"}\n", config)
    });

    // Let the waiter open the original sidecar and start retrying on it.
    thread::sleep(Duration::from_millis(150));

    fs::remove_file(&lock_path).unwrap();
    let second_holder = open_sidecar();
    second_holder.lock_exclusive().unwrap();
    FileExt::unlock(&first_holder).unwrap();
    drop(first_holder);

    let held_until = Instant::now() + Duration::from_millis(400);
    while Instant::now() < held_until {
        assert!(
            !file_path.exists(),
            "write must wait for the current sidecar holder"
        );
        thread::sleep(Duration::from_millis(20));
    }

    FileExt::unlock(&second_holder).unwrap();
    drop(second_holder);

    waiter.join().unwrap().unwrap();
    assert_eq!(
        fs::read_to_string(&file_path).unwrap(),
        "{\"writer\": \"waiter\"}\n"
    );
}
