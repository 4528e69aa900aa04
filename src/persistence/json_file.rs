// src/persistence/json_file.rs
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use serde_json::{from_str, to_string};
use crate::domain::commands::Command;

/// Read a command journal: one JSON-encoded command per line.
pub fn read_commands<P: AsRef<Path>>(path: P) -> Result<Vec<Command>, String> {
    let file = File::open(path).map_err(|e| format!("Failed to open journal: {}", e))?;
    let reader = BufReader::new(file);

    let mut commands = Vec::new();

    for line in reader.lines() {
        let line = line.map_err(|e| format!("Failed to read line: {}", e))?;
        if line.trim().is_empty() {
            continue;
        }
        let parsed: Command = from_str(&line)
            .map_err(|e| format!("Failed to parse command: {}", e))?;

        commands.push(parsed);
    }

    Ok(commands)
}

/// Append one command to the journal without rewriting history.
pub fn append_command<P: AsRef<Path>>(path: P, command: &Command) -> Result<(), String> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| format!("Failed to open journal for writing: {}", e))?;

    let json = to_string(command).map_err(|e| format!("Failed to serialize command: {}", e))?;

    writeln!(file, "{}", json)
        .map_err(|e| format!("Failed to write to journal: {}", e))
}

/// Rewrite the whole journal, one command per line.
pub fn write_commands<P: AsRef<Path>>(path: P, commands: &[Command]) -> Result<(), String> {
    let mut file = File::create(path)
        .map_err(|e| format!("Failed to create journal: {}", e))?;

    for command in commands {
        let json = to_string(command)
            .map_err(|e| format!("Failed to serialize command: {}", e))?;
        writeln!(file, "{}", json)
            .map_err(|e| format!("Failed to write to journal: {}", e))?;
    }

    Ok(())
}
