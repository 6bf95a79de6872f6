use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::sleep;
use std::time::{Duration, Instant};
use tempfile::TempDir;

struct DaemonGuard {
    child: Child,
}

impl Drop for DaemonGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl DaemonGuard {
    fn wait_for_exit(&mut self, timeout: Duration) -> ExitStatus {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Some(status) = self.child.try_wait().expect("Failed to poll daemon") {
                return status;
            }
            sleep(Duration::from_millis(25));
        }
        panic!("Timed out waiting for cfgsnap to exit");
    }
}

fn spawn_daemon(config: &Path) -> DaemonGuard {
    let child = Command::new(env!("CARGO_BIN_EXE_cfgsnap"))
        .arg("--config")
        .arg(config)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to spawn cfgsnap");
    DaemonGuard { child }
}

fn write_config(dir: &Path, debounce_secs: f64, inactivity_secs: f64) -> PathBuf {
    let path = dir.join("config.json");
    let config = serde_json::json!({
        "yamlFilePath": dir.join("app.yml"),
        "baseBackupDirPath": dir.join("backups"),
        "debounceSecs": debounce_secs,
        "inactivitySecs": inactivity_secs,
    });
    fs_err::write(&path, config.to_string()).expect("Failed to write config");
    path
}

fn year_dir(home: &TempDir) -> PathBuf {
    home.path()
        .join("backups")
        .join(chrono::Local::now().format("%Y").to_string())
}

fn wait_for_artifact(dir: &Path, timeout: Duration) -> PathBuf {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if let Ok(mut entries) = std::fs::read_dir(dir) {
            if let Some(Ok(entry)) = entries.next() {
                return entry.path();
            }
        }
        sleep(Duration::from_millis(50));
    }
    panic!("Timed out waiting for backup in {}", dir.display());
}

#[test]
fn missing_config_exits_with_failure() {
    let home = TempDir::new().expect("temp dir");
    let mut daemon = spawn_daemon(&home.path().join("missing.json"));

    let status = daemon.wait_for_exit(Duration::from_secs(5));

    assert_eq!(status.code(), Some(1));
}

#[test]
fn missing_watched_file_exits_with_failure() {
    let home = TempDir::new().expect("temp dir");
    let config = write_config(home.path(), 1.0, 1.0);
    let mut daemon = spawn_daemon(&config);

    let status = daemon.wait_for_exit(Duration::from_secs(5));

    assert_eq!(status.code(), Some(1));
}

#[test]
fn idle_daemon_exits_cleanly_after_inactivity() {
    let home = TempDir::new().expect("temp dir");
    fs_err::write(home.path().join("app.yml"), "a: 1").expect("write watched file");
    let config = write_config(home.path(), 5.0, 0.5);
    let started = Instant::now();
    let mut daemon = spawn_daemon(&config);

    let status = daemon.wait_for_exit(Duration::from_secs(10));

    assert!(status.success());
    assert!(started.elapsed() >= Duration::from_millis(500));
    assert!(!home.path().join("backups").exists());
}

#[test]
fn write_to_watched_file_creates_backup() {
    let home = TempDir::new().expect("temp dir");
    let watched = home.path().join("app.yml");
    fs_err::write(&watched, "a: 1").expect("write watched file");
    let config = write_config(home.path(), 0.3, 10.0);
    let _daemon = spawn_daemon(&config);

    // Give the watch time to register before editing.
    sleep(Duration::from_millis(750));
    fs_err::write(&watched, "a: 2").expect("edit watched file");

    let artifact = wait_for_artifact(&year_dir(&home), Duration::from_secs(10));
    // The artifact may have been observed between create and write.
    sleep(Duration::from_millis(200));
    assert_eq!(
        artifact.extension().and_then(|ext| ext.to_str()),
        Some("yml")
    );
    assert_eq!(
        fs_err::read_to_string(&artifact).expect("read artifact"),
        "a: 2"
    );
}
