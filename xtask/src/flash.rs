use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

use crate::step::{cargo, firmware_elf, OnFailure, CHIP, TARGET};

pub fn run(release: bool) -> Result<()> {
    let mode = if release { "release" } else { "debug" };
    println!();
    println!("{}", format!("🔨 Building firmware ({mode})...").cyan().bold());
    println!();

    let mut args = vec!["build", "-p", "firmware", "--target", TARGET, "--features", "hardware"];
    if release {
        args.push("--release");
    }
    cargo("Firmware build", &args, OnFailure::Bail)?;

    show_binary_size(release);

    println!("{}", format!("📡 Flashing {CHIP}...").cyan().bold());
    let start = Instant::now();
    let elf = firmware_elf(release);
    // `probe-rs run` keeps streaming defmt logs until interrupted
    let status = Command::new("probe-rs")
        .args(["run", "--chip", CHIP, &elf])
        .status()
        .context("Failed to run probe-rs. Is probe-rs installed? (cargo install probe-rs-tools)")?;

    if !status.success() {
        anyhow::bail!("Flash failed - check that the Pico 2 is connected through a debug probe");
    }
    println!(
        "{}",
        format!("✓ probe-rs exited after {:.2}s", start.elapsed().as_secs_f64()).green()
    );
    Ok(())
}

fn show_binary_size(release: bool) {
    let Ok(out) = Command::new("rust-size").args([&firmware_elf(release), "-A"]).output() else {
        return;
    };
    if out.status.success() {
        println!("{}", "📊 Binary size:".cyan());
        for line in String::from_utf8_lossy(&out.stdout).lines() {
            println!("   {}", line.dimmed());
        }
        println!();
    }
}
