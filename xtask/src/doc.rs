use anyhow::Result;

use crate::step::{cargo, OnFailure};

pub fn run(open: bool) -> Result<()> {
    println!();
    let mut args = vec!["doc", "--workspace", "--no-deps", "--document-private-items"];
    if open {
        args.push("--open");
    }
    cargo("Documentation", &args, OnFailure::Bail)?;
    if !open {
        println!("   Open target/doc/playback/index.html, or run 'cargo xtask doc --open'");
        println!();
    }
    Ok(())
}
