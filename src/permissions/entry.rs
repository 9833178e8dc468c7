/*!
 * Desktop Entry Parsing
 * Key/value groups in freedesktop desktop-entry syntax
 *
 * Only whole lines starting with `#` are comments. A `;` inside a value is
 * plain data (desktop entries use it as the list separator), so values are
 * never truncated at a semicolon.
 */

use crate::core::errors::{PolicyError, PolicyResult};
use std::path::Path;

/// Parsed desktop entry, groups kept in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesktopEntry {
    groups: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Group {
    name: String,
    entries: Vec<(String, String)>,
}

impl DesktopEntry {
    /// Parse desktop-entry text
    pub fn parse(text: &str) -> PolicyResult<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut groups: Vec<Group> = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let name = header.strip_suffix(']').ok_or_else(|| PolicyError::ParseFailure {
                    line: line_no,
                    reason: "unterminated group header".into(),
                })?;
                if name.is_empty() || name.contains(['[', ']']) {
                    return Err(PolicyError::ParseFailure {
                        line: line_no,
                        reason: format!("invalid group name {name:?}"),
                    });
                }
                groups.push(Group {
                    name: name.to_string(),
                    entries: Vec::new(),
                });
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| PolicyError::ParseFailure {
                line: line_no,
                reason: "expected `Key=Value`".into(),
            })?;
            let key = key.trim_end();
            if key.is_empty() {
                return Err(PolicyError::ParseFailure {
                    line: line_no,
                    reason: "empty key".into(),
                });
            }
            let group = groups.last_mut().ok_or_else(|| PolicyError::ParseFailure {
                line: line_no,
                reason: format!("key {key:?} appears before any group header"),
            })?;
            group
                .entries
                .push((key.to_string(), value.trim_start().to_string()));
        }

        Ok(Self { groups })
    }

    /// Read and parse a declaration file
    pub fn load(path: &Path) -> PolicyResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => {
                PolicyError::SourceNotFound(format!("failed to find declaration {}", path.display()))
            }
            _ => PolicyError::io(path, &err),
        })?;
        Self::parse(&text)
    }

    /// Value of `key` in `group`; later occurrences win
    pub fn get(&self, group: &str, key: &str) -> Option<&str> {
        self.groups
            .iter()
            .filter(|g| g.name == group)
            .flat_map(|g| g.entries.iter())
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .last()
    }

    pub fn has_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g.name == group)
    }

    /// `;`-separated list value of `key`, see [`split_list`]
    pub fn get_list(&self, group: &str, key: &str) -> Vec<String> {
        self.get(group, key).map(split_list).unwrap_or_default()
    }
}

/// Split a desktop-entry list.
///
/// Items are trimmed and empty items dropped. `\;` is a literal semicolon
/// inside an item, and the `\s \n \t \r \\` escapes are decoded.
pub fn split_list(value: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(';') => current.push(';'),
                Some('s') => current.push(' '),
                Some('n') => current.push('\n'),
                Some('t') => current.push('\t'),
                Some('r') => current.push('\r'),
                Some('\\') => current.push('\\'),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            ';' => push_item(&mut items, &mut current),
            _ => current.push(c),
        }
    }
    push_item(&mut items, &mut current);
    items
}

fn push_item(items: &mut Vec<String>, current: &mut String) {
    let item = current.trim();
    if !item.is_empty() {
        items.push(item.to_string());
    }
    current.clear();
}
