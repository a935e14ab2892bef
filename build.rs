use std::{env, path::PathBuf};

/// Bakes `.env` entries (CAPTURE_API_URL, CAPTURE_CAMERAS, ...) into the build
/// so web and desktop clients see the same backend settings as the server.
fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let env_path = PathBuf::from(&manifest_dir).join(".env");

    println!("cargo:rerun-if-changed={}", env_path.display());

    if !env_path.exists() {
        eprintln!("Warning: .env file not found at {}, using built-in defaults", env_path.display());
        return;
    }
    for item in dotenvy::from_path_iter(&env_path).expect("Failed to read .env file") {
        let (key, val) = item.expect("Failed to parse .env entry");
        if key.starts_with("CAPTURE_") {
            println!("cargo:rustc-env={}={}", key, val);
        }
    }
}
