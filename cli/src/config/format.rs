//! Config file reading.
//!
//! New files are TOML. Files written by older bx releases use the INI
//! dialect (`key = value` with bare values), so anything that fails to
//! parse as TOML is read again as INI. Every INI value is a string. The
//! next [`super::ConfigStore::update`] rewrites such a file as TOML.

use std::fs;
use std::path::Path;

use toml::{Table, Value};

use crate::error::{BxError, Result};

/// Read a config file into a table; a missing file reads as empty.
pub fn read_table(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Ok(Table::new());
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| BxError::ConfigRead(format!("{}: {e}", path.display())))?;
    parse_table(&contents)
}

/// Parse TOML, falling back to the legacy INI dialect.
///
/// When both fail the TOML error is reported, since TOML is the documented
/// format.
pub fn parse_table(contents: &str) -> Result<Table> {
    match contents.parse::<Table>() {
        Ok(table) => Ok(table),
        Err(toml_err) => match parse_legacy_ini(contents) {
            Ok(table) => {
                tracing::debug!("Read config in legacy INI format");
                Ok(table)
            },
            Err(ini_err) => {
                tracing::debug!("Config is neither TOML nor INI: {ini_err}");
                Err(toml_err.into())
            },
        },
    }
}

/// Reads `[section]` headers and `key = value` / `key: value` entries.
///
/// Keys are lowercased, `#` and `;` start comment lines, and indented lines
/// continue the previous value.
fn parse_legacy_ini(contents: &str) -> std::result::Result<Table, String> {
    let mut table = Table::new();
    let mut section: Option<String> = None;
    let mut last_key: Option<String> = None;

    for (index, raw) in contents.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if raw.starts_with(char::is_whitespace) {
            let (Some(name), Some(key)) = (section.as_deref(), last_key.as_deref()) else {
                return Err(format!("line {line_no}: continuation without a key"));
            };
            if let Some(Value::String(value)) = section_mut(&mut table, name).get_mut(key) {
                value.push('\n');
                value.push_str(line);
            }
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or_else(|| format!("line {line_no}: unterminated section header"))?
                .trim();
            section_mut(&mut table, name);
            section = Some(name.to_string());
            last_key = None;
            continue;
        }

        let name = section
            .as_deref()
            .ok_or_else(|| format!("line {line_no}: entry before any section header"))?;
        let split = line
            .find(['=', ':'])
            .ok_or_else(|| format!("line {line_no}: expected `key = value`"))?;
        let key = line[..split].trim().to_lowercase();
        let value = line[split + 1..].trim();
        if key.is_empty() {
            return Err(format!("line {line_no}: empty key"));
        }

        section_mut(&mut table, name).insert(key.clone(), Value::String(value.to_string()));
        last_key = Some(key);
    }

    Ok(table)
}

fn section_mut<'a>(table: &'a mut Table, name: &str) -> &'a mut Table {
    let entry = table
        .entry(name)
        .or_insert(Value::Table(Table::new()));
    if !entry.is_table() {
        *entry = Value::Table(Table::new());
    }
    match entry {
        Value::Table(section) => section,
        _ => unreachable!("entry was just made a table"),
    }
}
