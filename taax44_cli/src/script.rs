//! Port-access scripts replayed against a `System`.
//!
//! One command per line:
//!
//! ```text
//! # comment
//! w <port> <value>      port write
//! r <port>              port read
//! press <key>           hold a front panel key
//! release <key>         let go of a front panel key
//! show                  print the lit display elements
//! ```
//!
//! Ports are letters `A`-`I` or indices, numbers are decimal or `0x` hex.
use std::str::FromStr;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use itertools::Itertools;
use taax44_emulator::components::front_panel::Key;
use taax44_emulator::components::vfd::legend::lit_elements;
use taax44_emulator::components::vfd::DisplayMatrix;
use taax44_emulator::ports::Port;
use taax44_emulator::System;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Write(Port, u8),
    Read(Port),
    Press(Key),
    Release(Key),
    Show,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let words = line.split_whitespace().collect_vec();
        match words.as_slice() {
            ["w", port, value] => Ok(Command::Write(parse_port(port)?, parse_value(value)?)),
            ["r", port] => Ok(Command::Read(parse_port(port)?)),
            ["press", key] => Ok(Command::Press(parse_key(key)?)),
            ["release", key] => Ok(Command::Release(parse_key(key)?)),
            ["show"] => Ok(Command::Show),
            _ => bail!("Unknown command: {line}"),
        }
    }
}

fn parse_number(word: &str) -> Result<u32> {
    let parsed = match word.strip_prefix("0x").or_else(|| word.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => word.parse::<u32>(),
    };
    parsed.with_context(|| format!("Invalid number: {word}"))
}

fn parse_value(word: &str) -> Result<u8> {
    let value = parse_number(word)?;
    u8::try_from(value).map_err(|_| anyhow!("Value out of range: {word}"))
}

fn parse_port(word: &str) -> Result<Port> {
    if let Ok(port) = Port::from_str(word) {
        return Ok(port);
    }
    parse_number(word)
        .ok()
        .and_then(|index| u8::try_from(index).ok())
        .and_then(Port::from_repr)
        .ok_or_else(|| anyhow!("Invalid port: {word}"))
}

fn parse_key(word: &str) -> Result<Key> {
    Key::from_str(word).with_context(|| format!("Unknown key: {word}"))
}

/// Parses a whole script. Errors name the offending line.
pub fn parse_script(source: &str) -> Result<Vec<(usize, Command)>> {
    source
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.split('#').next().unwrap_or("").trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(line_number, line)| {
            let command = line
                .parse::<Command>()
                .with_context(|| format!("Line {line_number}"))?;
            Ok((line_number, command))
        })
        .collect()
}

/// Runs `commands` against `system` and returns the printed output lines.
pub fn run_script(
    system: &mut System<DisplayMatrix>,
    commands: &[(usize, Command)],
) -> Vec<String> {
    let mut output = Vec::new();
    for (line_number, command) in commands {
        log::trace!(target: "script", "{line_number}: {command:?}");
        match *command {
            Command::Write(port, value) => system.write_port(port, value),
            Command::Read(port) => {
                let value = system.read_port(port);
                output.push(format!("read {port} = 0x{value:X}"));
            }
            Command::Press(key) => system.set_key(key, true),
            Command::Release(key) => system.set_key(key, false),
            Command::Show => {
                let lit = lit_elements(system.composer());
                output.push(format!("display: {}", lit.join(", ")));
            }
        }
        for frame in system.take_asp_frames() {
            output.push(format!("asp 0x{frame:08X}"));
        }
    }
    output
}
