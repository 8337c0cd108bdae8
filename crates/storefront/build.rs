//! Build script for the storefront crate.
//!
//! Fingerprints the static assets so templates can link them with a
//! content-derived `?v=` query and let browsers cache them indefinitely.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

/// Assets to fingerprint: (path under `static/`, env var exposed to the crate).
const ASSETS: &[(&str, &str)] = &[("css/main.css", "CSS_HASH"), ("js/cart.js", "JS_HASH")];

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let static_dir = Path::new(&manifest_dir).join("static");

    for (asset, var) in ASSETS {
        fingerprint(&static_dir.join(asset), var);
    }
}

/// Set `var` to the first 8 hex chars of the SHA-256 of the file at `path`.
///
/// A missing file yields an empty hash rather than failing the build.
fn fingerprint(path: &Path, var: &str) {
    println!("cargo:rerun-if-changed={}", path.display());

    let content = match fs::read(path) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read {}: {e}", path.display());
            println!("cargo:rustc-env={var}=");
            return;
        }
    };

    let digest = format!("{:x}", Sha256::digest(&content));
    let short = digest.get(..8).unwrap_or(&digest);

    println!("cargo:rustc-env={var}={short}");
}
