use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;

/// Run the stdin/stdout emulator in the foreground.
pub fn run(release: bool, log: &str) -> Result<()> {
    println!();
    println!("{}", "🖥  Starting pico-pulse emulator (Ctrl-D to quit)...".cyan().bold());
    println!();

    let mut cmd = Command::new("cargo");
    cmd.args(["run", "-q", "-p", "firmware", "--example", "pulse_emulator", "--features", "emulator"]);
    if release {
        cmd.arg("--release");
    }
    let status = cmd
        .env("RUST_LOG", log)
        .status()
        .context("Failed to start the emulator")?;
    if !status.success() {
        anyhow::bail!("Emulator exited with {status}");
    }
    Ok(())
}
