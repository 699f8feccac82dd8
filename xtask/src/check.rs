use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::step::{cargo, OnFailure, TARGET};

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking pico-pulse builds...".cyan().bold());
    println!();

    let start = Instant::now();

    cargo(
        "Hardware target (RP2350)",
        &["check", "-p", "firmware", "--target", TARGET, "--features", "hardware"],
        OnFailure::Bail,
    )?;
    cargo(
        "Emulator target (host)",
        &["check", "-p", "firmware", "--features", "emulator", "--examples"],
        OnFailure::Bail,
    )?;
    // The sequence core and protocol must stay no_std
    for krate in ["platform", "playback", "command"] {
        cargo(
            &format!("{krate} (no_std)"),
            &["check", "-p", krate, "--target", TARGET, "--no-default-features"],
            OnFailure::Bail,
        )?;
    }
    cargo(
        "Clippy",
        &["clippy", "--workspace", "--all-targets", "--features", "firmware/emulator", "--", "-D", "warnings"],
        OnFailure::Warn,
    )?;
    let fmt = cargo("Formatting", &["fmt", "--all", "--check"], OnFailure::Warn)?;
    if !fmt.status.success() {
        eprintln!("     Run 'cargo fmt --all' to fix");
    }

    println!(
        "{}",
        format!("✓ All checks completed in {:.2}s", start.elapsed().as_secs_f64())
            .green()
            .bold()
    );
    println!();
    Ok(())
}
