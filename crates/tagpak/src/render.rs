//! Human readable rendering of a tag tree

use owo_colors::OwoColorize;
use std::{
    fmt::{self, Display, Write},
    io::IsTerminal,
};
use tagpak_tree::{Structure, TagValue};

/// Byte arrays longer than this are cut short
const BYTE_PREVIEW: usize = 16;

/// Renders a structure one entry per line, children indented below their parent
pub struct TreeView<'a> {
    root: &'a Structure,
    colored: bool,
}

impl<'a> TreeView<'a> {
    /// Colored when stdout is a terminal
    pub fn new(root: &'a Structure) -> Self {
        TreeView {
            root,
            colored: std::io::stdout().is_terminal(),
        }
    }

    pub fn plain(root: &'a Structure) -> Self {
        TreeView {
            root,
            colored: false,
        }
    }

    fn write_entries(&self, f: &mut fmt::Formatter<'_>, structure: &Structure, depth: usize) -> fmt::Result {
        for (key, value) in structure.iter() {
            let indent = "  ".repeat(depth);
            let kind = value.kind();
            let (kind, key) = if self.colored {
                (kind.dimmed().to_string(), key.bold().to_string())
            } else {
                (kind.to_string(), key.to_owned())
            };

            match value {
                TagValue::Structure(child) if child.is_empty() => {
                    writeln!(f, "{indent}{kind} {key} {{}}")?;
                }
                TagValue::Structure(child) => {
                    writeln!(f, "{indent}{kind} {key}")?;
                    self.write_entries(f, child, depth + 1)?;
                }
                TagValue::List(items) => {
                    writeln!(f, "{indent}{kind} {key} [{}]", items.len())?;
                    for (index, item) in items.iter().enumerate() {
                        let empty = if item.is_empty() { " {}" } else { "" };
                        writeln!(f, "{indent}  [{index}]{empty}")?;
                        self.write_entries(f, item, depth + 2)?;
                    }
                }
                scalar => {
                    let value = format_scalar(scalar);
                    if self.colored {
                        writeln!(f, "{indent}{kind} {key} = {}", value.green())?;
                    } else {
                        writeln!(f, "{indent}{kind} {key} = {value}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl Display for TreeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.root.is_empty() {
            return writeln!(f, "{{}}");
        }
        self.write_entries(f, self.root, 0)
    }
}

fn format_scalar(value: &TagValue) -> String {
    match value {
        TagValue::Bool(v) => v.to_string(),
        TagValue::Byte(v) => v.to_string(),
        TagValue::Int16(v) => v.to_string(),
        TagValue::Int32(v) => v.to_string(),
        TagValue::Int64(v) => v.to_string(),
        TagValue::Float32(v) => format!("{v:?}"),
        TagValue::Float64(v) => format!("{v:?}"),
        TagValue::String(v) => format!("{v:?}"),
        TagValue::ByteArray(v) => {
            let mut out = format!("<{} bytes>", v.len());
            for byte in v.iter().take(BYTE_PREVIEW) {
                let _ = write!(out, " {byte:02X}");
            }
            if v.len() > BYTE_PREVIEW {
                out.push_str(" ...");
            }
            out
        }
        TagValue::Structure(_) | TagValue::List(_) => value.kind().to_string(),
    }
}
