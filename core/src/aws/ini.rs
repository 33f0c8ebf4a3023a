//! The INI dialect used by `~/.aws/config`.
//!
//! Comments are kept and attached to the section or entry that follows
//! them, so a parsed document can be written back without losing them.
//! A line indented deeper than the entry above it is a nested setting of
//! that entry (`s3 =` followed by `  max_concurrent_requests = 20`).

use std::fmt;

use crate::error::{Error, Result};

/// A parsed config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    pub sections: Vec<Section>,
    /// Comments after the last entry of the file.
    pub trailing_comments: Vec<String>,
}

/// `[header]` followed by its entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub header: String,
    /// 1-based line of the header.
    pub line: usize,
    pub comments: Vec<String>,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
    pub comments: Vec<String>,
    /// Leading whitespace of the key line, in bytes.
    pub indent: usize,
    /// Nested lines, with the key line's indentation removed.
    pub children: Vec<String>,
}

impl Section {
    /// Value of the last entry named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }
}

impl IniDocument {
    /// Parse config text.
    ///
    /// Only relative indentation matters: a uniformly indented file parses
    /// the same as a flush one.
    pub fn parse(source: &str) -> Result<Self> {
        let mut doc = IniDocument::default();
        let mut pending: Vec<String> = Vec::new();

        for (idx, raw) in source.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();

            if line.is_empty() {
                continue;
            }

            let indent = raw.len() - raw.trim_start().len();
            if let Some(entry) = doc
                .sections
                .last_mut()
                .and_then(|section| section.entries.last_mut())
                .filter(|entry| indent > entry.indent)
            {
                let nested = raw.get(entry.indent..).unwrap_or(line).trim_end();
                entry.children.push(nested.to_string());
                continue;
            }

            if line.starts_with('#') || line.starts_with(';') {
                pending.push(line.to_string());
                continue;
            }

            if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                doc.sections.push(Section {
                    header: header.trim().to_string(),
                    line: line_no,
                    comments: std::mem::take(&mut pending),
                    entries: Vec::new(),
                });
                continue;
            }

            let Some(split) = line.find(['=', ':']) else {
                return Err(Error::Parse {
                    line: line_no,
                    message: format!("expected `key = value`, found `{}`", line),
                });
            };

            let key = line[..split].trim();
            if key.is_empty() {
                return Err(Error::Parse {
                    line: line_no,
                    message: "entry without a key".to_string(),
                });
            }

            let Some(section) = doc.sections.last_mut() else {
                return Err(Error::Parse {
                    line: line_no,
                    message: format!("entry `{}` outside of a section", key),
                });
            };

            section.entries.push(Entry {
                key: key.to_string(),
                value: line[split + 1..].trim().to_string(),
                comments: std::mem::take(&mut pending),
                indent,
                children: Vec::new(),
            });
        }

        doc.trailing_comments = pending;
        Ok(doc)
    }

    /// Sort sections by header, then entries by key. Both sorts are stable.
    pub fn sort(&mut self) {
        self.sections.sort_by(|a, b| a.header.cmp(&b.header));
        for section in &mut self.sections {
            section.entries.sort_by(|a, b| a.key.cmp(&b.key));
        }
    }
}

impl fmt::Display for IniDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for comment in &section.comments {
                writeln!(f, "{}", comment)?;
            }
            writeln!(f, "[{}]", section.header)?;
            for entry in &section.entries {
                for comment in &entry.comments {
                    writeln!(f, "{}", comment)?;
                }
                if entry.value.is_empty() {
                    writeln!(f, "{} =", entry.key)?;
                } else {
                    writeln!(f, "{} = {}", entry.key, entry.value)?;
                }
                for nested in &entry.children {
                    writeln!(f, "{}", nested)?;
                }
            }
        }

        if !self.trailing_comments.is_empty() {
            if !self.sections.is_empty() {
                writeln!(f)?;
            }
            for comment in &self.trailing_comments {
                writeln!(f, "{}", comment)?;
            }
        }

        Ok(())
    }
}
