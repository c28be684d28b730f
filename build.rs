//! Build script: copies the JSON config template into the user's local data
//! directory so a fresh install has a ready-to-edit example alongside the
//! binary's working-directory default of `./sporl.config.json`.

use std::{env, fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=sporl.config.example.json");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let example_path = manifest_dir.join("sporl.config.example.json");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("sporl");
    fs::create_dir_all(&out_dir)?;

    if example_path.is_file() {
        let contents = fs::read_to_string(&example_path)?;
        fs::write(out_dir.join("sporl.config.example.json"), contents)?;
    } else {
        println!(
            "cargo:warning=sporl.config.example.json not found at {}",
            example_path.display()
        );
    }

    Ok(())
}
