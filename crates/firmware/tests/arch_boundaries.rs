//! Architecture boundary tests, run with `cargo test -p firmware --test arch_boundaries`
// Architecture test file: expect/unwrap/panic are intentional test mechanisms.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//!
//! Layering rules:
//!   Rule 1: platform (traits + constants) depends on nothing in the workspace
//!   Rule 2: playback depends only on platform
//!   Rule 3: command depends only on platform and playback
//!   Rule 4: none of the library crates pull in embassy or a HAL
//!
//! The dependency graph is the real enforcement; these tests read the
//! manifests so a stray dependency fails CI with a readable message.

const PLATFORM_TOML: &str = include_str!("../../platform/Cargo.toml");
const PLAYBACK_TOML: &str = include_str!("../../playback/Cargo.toml");
const COMMAND_TOML: &str = include_str!("../../command/Cargo.toml");

/// Dependency names declared in the `[dependencies]` tables of a manifest.
fn dependencies(manifest: &str) -> Vec<String> {
    let mut deps = Vec::new();
    let mut in_deps = false;
    for line in manifest.lines().map(str::trim) {
        if let Some(table) = line.strip_prefix('[') {
            let table = table.trim_end_matches(']');
            in_deps = table == "dependencies";
            if let Some(name) = table.strip_prefix("dependencies.") {
                deps.push(name.to_owned());
            }
            continue;
        }
        if in_deps {
            if let Some((name, _)) = line.split_once('=') {
                let name = name.trim();
                if !name.is_empty() && !name.starts_with('#') {
                    deps.push(name.to_owned());
                }
            }
        }
    }
    deps
}

fn assert_only(crate_name: &str, manifest: &str, allowed: &[&str]) {
    for dep in dependencies(manifest) {
        assert!(
            allowed.contains(&dep.as_str()),
            "{crate_name} must not depend on `{dep}` (allowed: {allowed:?})"
        );
    }
}

#[test]
fn platform_is_a_leaf() {
    assert_only("platform", PLATFORM_TOML, &["defmt"]);
}

#[test]
fn playback_depends_only_on_platform() {
    assert_only("playback", PLAYBACK_TOML, &["platform", "defmt"]);
}

#[test]
fn command_sits_above_playback() {
    assert_only("command", COMMAND_TOML, &["platform", "playback", "defmt"]);
}

#[test]
fn library_crates_are_hal_free() {
    for (name, manifest) in [
        ("platform", PLATFORM_TOML),
        ("playback", PLAYBACK_TOML),
        ("command", COMMAND_TOML),
    ] {
        for dep in dependencies(manifest) {
            assert!(
                !dep.starts_with("embassy") && !dep.starts_with("cortex-m"),
                "{name} must stay target-independent, found `{dep}`"
            );
        }
    }
}

/// The sequence core links into a host test binary without firmware types.
#[test]
fn core_types_usable_without_firmware() {
    use platform::mocks::MockEngine;
    use playback::{PlaybackController, SequenceBuffer};

    let mut words = [0u32; 4];
    let controller = PlaybackController::new(MockEngine::new(), SequenceBuffer::new(&mut words))
        .expect("mock engine claims");
    assert_eq!(controller.capacity(), 4);
}

const FIRMWARE_TOML: &str = include_str!("../Cargo.toml");

const FIRMWARE_SOURCES: &[&str] = &[
    include_str!("../src/lib.rs"),
    include_str!("../src/main.rs"),
    include_str!("../src/control.rs"),
    include_str!("../src/indicator.rs"),
    include_str!("../src/serial.rs"),
    include_str!("../src/pio_program.rs"),
    include_str!("../src/exception_handlers.rs"),
    include_str!("../src/hardware/mod.rs"),
    include_str!("../src/hardware/engine.rs"),
    include_str!("../src/emulator/mod.rs"),
    include_str!("../src/emulator/engine.rs"),
    include_str!("../src/emulator/port.rs"),
    include_str!("../examples/pulse_emulator.rs"),
];

#[test]
fn every_firmware_dependency_is_used() {
    for dep in dependencies(FIRMWARE_TOML) {
        let ident = dep.replace('-', "_");
        assert!(
            FIRMWARE_SOURCES
                .iter()
                .any(|src| src.contains(&format!("{ident}::")) || src.contains(&format!("{ident} as"))),
            "firmware declares `{dep}` but no source file uses `{ident}`"
        );
    }
}
