use std::path::PathBuf;
use tempfile::TempDir;

/// Write `content` to a fresh temporary directory, returning the dir handle
/// and the report path. The caller must hold onto `TempDir` to keep the
/// file alive.
pub fn write_report(name: &str, content: &[u8]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

/// Assert two percentages agree to within display precision.
#[allow(dead_code)]
pub fn assert_pct(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.005,
        "expected {expected:.2}, got {actual:.4}"
    );
}
