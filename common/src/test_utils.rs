use std::path::PathBuf;
use std::sync::OnceLock;

const OUTPUT_DIR: &str = "test_output";

/// Workspace root, one level above the calling crate's manifest.
fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Ensures the test output directory exists. Safe to call multiple times.
pub fn ensure_test_output_dir() -> PathBuf {
    static DIR: OnceLock<PathBuf> = OnceLock::new();
    DIR.get_or_init(|| {
        let dir = workspace_root().join(OUTPUT_DIR);
        std::fs::create_dir_all(&dir).expect("Failed to create test_output directory");
        dir
    })
    .clone()
}

/// Returns the path to a file inside the test output directory.
pub fn test_output_path(name: &str) -> PathBuf {
    ensure_test_output_dir().join(name)
}
