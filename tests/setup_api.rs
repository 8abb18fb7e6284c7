use log::LevelFilter;
use script_utils::{
    common_setup, setup_logging, FileLogger, LogOptions, LogScope, SetupOptions, FILE_ONLY_TARGET,
};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tempfile::tempdir;

static GLOBAL_LOGGER: Mutex<()> = Mutex::new(());

fn lock() -> MutexGuard<'static, ()> {
    GLOBAL_LOGGER.lock().unwrap_or_else(|err| err.into_inner())
}

fn silent_console() -> LogOptions {
    LogOptions {
        console_level: LevelFilter::Off,
        ..LogOptions::default()
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("log file readable")
}

#[test]
fn second_setup_moves_output_to_new_file_once() {
    let _lock = lock();
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.log");
    let second = dir.path().join("second.log");

    setup_logging(&first, &silent_console()).expect("first setup");
    log::info!("before reset");
    setup_logging(&second, &silent_console()).expect("second setup");
    log::info!("after reset");

    let first = read(&first);
    let second = read(&second);
    assert_eq!(first.matches("before reset").count(), 1);
    assert!(!first.contains("after reset"));
    assert_eq!(second.matches("after reset").count(), 1);
    assert!(!second.contains("before reset"));
}

#[test]
fn file_only_target_works_with_plain_macros() {
    let _lock = lock();
    let dir = tempdir().unwrap();
    let path = dir.path().join("target.log");
    let options = LogOptions {
        scope: LogScope::Target("nothing_matches".to_string()),
        ..silent_console()
    };
    let _file_logger: FileLogger = setup_logging(&path, &options).expect("setup");

    log::debug!(target: FILE_ONLY_TARGET, "routed by target");
    log::info!("ordinary record");

    let contents = read(&path);
    assert!(contents.contains("routed by target"));
    assert!(!contents.contains("ordinary record"));
}

#[test]
fn common_setup_names_log_after_script_identifier() {
    let _lock = lock();
    let dir = tempdir().unwrap();
    let options = SetupOptions {
        log: silent_console(),
        save_git_state: false,
        ..SetupOptions::default()
    };

    let file_logger =
        common_setup("/opt/jobs/evaluate.py", dir.path(), None, &options).expect("setup");

    let path = file_logger.path();
    assert_eq!(path.parent(), Some(dir.path()));
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("evaluate.py_"), "unexpected name {name}");
    assert!(name.ends_with(".log"));

    let contents = read(path);
    assert!(contents.contains("Writing log file to"));
    assert!(contents.contains("setup_api.rs, line"));
}
