//! Build script for chatlens - embeds the git commit hash for dev builds
//!
//! When the `release` feature is NOT set (default dev builds):
//! - Emits `VERGEN_GIT_SHA` with the commit hash (or "unknown")
//!
//! When the `release` feature IS set (CI/official builds):
//! - Emits nothing, the version string stays clean

fn main() {
    #[cfg(not(feature = "release"))]
    {
        use vergen_gitcl::{Emitter, GitclBuilder};

        let emitted = GitclBuilder::default()
            .sha(true)
            .build()
            .map_err(|e| e.to_string())
            .and_then(|git| {
                Emitter::default()
                    .add_instructions(&git)
                    .map_err(|e| e.to_string())?
                    .emit()
                    .map_err(|e| e.to_string())
            });

        if let Err(e) = emitted {
            // Not a git checkout (e.g. crates.io tarball)
            println!("cargo:warning=Failed to get git info: {}", e);
            println!("cargo:rustc-env=VERGEN_GIT_SHA=unknown");
        }
    }
}
