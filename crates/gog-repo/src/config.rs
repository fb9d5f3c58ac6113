use std::fmt;
use std::io::{self, Read};

use serde::{Deserialize, Serialize};

/// Repository settings read from `.git/config`.
///
/// Only the three `[core]` keys below are understood. Real config files
/// carry many more keys and sections; those are skipped, as are recognized
/// keys whose value does not parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub repository_format_version: u32,
    pub file_mode: bool,
    pub bare: bool,
}

impl Config {
    /// Settings used when a repository has no config file, and written by `init`.
    pub const DEFAULT: Config = Config {
        repository_format_version: 0,
        file_mode: true,
        bare: false,
    };

    /// Parse config text, starting from [`Config::DEFAULT`].
    pub fn parse(text: &str) -> Self {
        Self::parse_bytes(text.as_bytes())
    }

    /// Parse raw config bytes line by line. Invalid UTF-8 on a line is
    /// replaced rather than rejected, so foreign text in other sections never
    /// fails the whole file.
    pub fn parse_bytes(raw: &[u8]) -> Self {
        let mut config = Self::DEFAULT;
        for line in raw.split(|&b| b == b'\n') {
            let line = String::from_utf8_lossy(line);
            let line = line.trim();
            if line.starts_with("repositoryformatversion") {
                if let Some(v) = setting_value(line).and_then(|v| v.parse().ok()) {
                    config.repository_format_version = v;
                }
            } else if line.starts_with("filemode") {
                if let Some(v) = setting_value(line).and_then(parse_bool) {
                    config.file_mode = v;
                }
            } else if line.starts_with("bare") {
                if let Some(v) = setting_value(line).and_then(parse_bool) {
                    config.bare = v;
                }
            }
        }
        config
    }

    /// Read and parse a config stream.
    pub fn from_reader(mut reader: impl Read) -> io::Result<Self> {
        let mut raw = Vec::new();
        reader.read_to_end(&mut raw)?;
        Ok(Self::parse_bytes(&raw))
    }

    /// Render the `[core]` block written into new repositories.
    pub fn format(&self) -> String {
        format!(
            "[core]\n\trepositoryformatversion = {}\n\tfilemode = {}\n\tbare = {}\n",
            self.repository_format_version, self.file_mode, self.bare
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// Right-hand side of a `key = value` line. Lines with more than one `=`
/// are not settings this reader understands.
fn setting_value(line: &str) -> Option<&str> {
    let mut parts = line.split('=');
    let _key = parts.next()?;
    let value = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some(value.trim())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
