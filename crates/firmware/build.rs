//! Puts `memory.x` on the linker search path for hardware builds.

fn main() -> std::io::Result<()> {
    // Only run linker script setup for hardware builds
    #[cfg(feature = "hardware")]
    {
        use std::env;
        use std::fs;
        use std::path::PathBuf;

        let out = env::var_os("OUT_DIR")
            .map(PathBuf::from)
            .ok_or_else(|| std::io::Error::other("OUT_DIR not set"))?;
        fs::write(out.join("memory.x"), include_bytes!("../../memory.x"))?;
        println!("cargo:rustc-link-search={}", out.display());
        println!("cargo:rerun-if-changed=../../memory.x");
    }

    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
