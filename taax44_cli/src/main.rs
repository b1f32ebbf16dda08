use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use argh::FromArgs;
use taax44_emulator::common::logging;
use taax44_emulator::components::nvram::DEFAULT_NVRAM_FILE;
use taax44_emulator::System;

mod script;

/// Replays a port access script against an emulated TA-AX44.
#[derive(FromArgs)]
struct Taax44Args {
    /// script file to replay
    #[argh(positional)]
    script: PathBuf,

    /// NVRAM image to load and save
    #[argh(option, default = "PathBuf::from(DEFAULT_NVRAM_FILE)")]
    nvram: PathBuf,

    /// keep the NVRAM in memory only
    #[argh(switch)]
    no_nvram: bool,

    /// do not print the display at the end
    #[argh(switch)]
    quiet: bool,
}

fn main() -> Result<()> {
    logging::init();
    let args: Taax44Args = argh::from_env();

    let source = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Cannot read script {}", args.script.display()))?;
    let commands = script::parse_script(&source)
        .with_context(|| format!("Cannot parse script {}", args.script.display()))?;

    let mut system = if args.no_nvram {
        System::new()
    } else {
        System::with_nvram_file(&args.nvram)
    };
    for line in script::run_script(&mut system, &commands) {
        println!("{line}");
    }

    if !args.quiet {
        print!("{}", system.composer());
    }
    Ok(())
}
