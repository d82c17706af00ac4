//! Placeholder substitution and loop expansion.
//!
//! Templates are plain text with `${identifier}` placeholders. Each line is
//! scanned left to right; the first placeholder found is replaced and the
//! scan resumes after the inserted value, so values are never rescanned.
//!
//! Two identifiers are loop directives. A line containing `${loop1}` or
//! `${loop2}` is a row template: every placeholder is cut out of the line
//! to form a skeleton, and one row per element of the bound collection is
//! written with that element's values inserted at the cut positions. The
//! template line itself produces no output.

use std::collections::{BTreeSet, HashMap};
use std::io::{self, BufRead, Write};
use std::sync::OnceLock;

use regex::Regex;

use crate::types::{AssetBit, FileType};

/// Enumeration directive (assets or frame declarations).
pub const LOOP1: &str = "loop1";
/// Per-frame property directive.
pub const LOOP2: &str = "loop2";

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\$\{.+?\}").expect("placeholder pattern is valid"))
}

/// Strip `${` and `}` from a placeholder token.
fn identifier(token: &str) -> &str {
    &token[2..token.len() - 1]
}

/// Value bound to a placeholder for one emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    /// Discard the whole line containing the placeholder.
    DropLine,
}

/// Placeholder bindings for one emission call.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    values: HashMap<String, Value>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, identifier: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values
            .insert(identifier.into(), Value::Text(value.into()));
        self
    }

    pub fn drop_line(&mut self, identifier: impl Into<String>) -> &mut Self {
        self.values.insert(identifier.into(), Value::DropLine);
        self
    }

    /// Bind `value`, or drop lines using the placeholder when it is empty.
    pub fn set_or_drop(&mut self, identifier: impl Into<String>, value: &str) -> &mut Self {
        if value.is_empty() {
            self.drop_line(identifier)
        } else {
            self.set(identifier, value)
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&Value> {
        self.values.get(identifier)
    }

    fn text(&self, identifier: &str) -> Option<&str> {
        match self.values.get(identifier) {
            Some(Value::Text(text)) => Some(text),
            _ => None,
        }
    }
}

/// A collection driving a loop directive.
pub trait RowSource {
    fn len(&self) -> usize;

    /// Value of `identifier` for row `index`, if this source defines it.
    fn value(&self, index: usize, identifier: &str) -> Option<String>;
}

/// Rows over the names of compiled assets.
pub struct NameRows<'a>(pub &'a [String]);

impl RowSource for NameRows<'_> {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn value(&self, index: usize, identifier: &str) -> Option<String> {
        match identifier {
            "count" => Some(index.to_string()),
            "name" => self.0.get(index).cloned(),
            _ => None,
        }
    }
}

/// Rows over the frames of a sprite.
pub struct FrameRows<'a> {
    frames: &'a [AssetBit],
    defaults: bool,
}

impl<'a> FrameRows<'a> {
    /// Declaration rows: path, mime and the raw frame properties.
    pub fn declarations(frames: &'a [AssetBit]) -> Self {
        Self {
            frames,
            defaults: false,
        }
    }

    /// Property rows: unset `x`, `y`, `alpha`, `visible` fall back to
    /// `0`, `0`, `1.0` and `true`.
    pub fn properties(frames: &'a [AssetBit]) -> Self {
        Self {
            frames,
            defaults: true,
        }
    }
}

impl RowSource for FrameRows<'_> {
    fn len(&self) -> usize {
        self.frames.len()
    }

    fn value(&self, index: usize, identifier: &str) -> Option<String> {
        let frame = self.frames.get(index)?;
        let value = match (identifier, self.defaults) {
            ("count", _) => return Some(index.to_string()),
            ("path", _) => frame.path.as_str(),
            ("mime", _) => FileType::detect(&frame.path).mime(),
            ("name", false) => frame.name.as_str(),
            ("x", true) => frame.x_or_default(),
            ("y", true) => frame.y_or_default(),
            ("alpha", true) => frame.alpha_or_default(),
            ("visible", true) => frame.visible_or_default(),
            ("x", false) => frame.x.as_str(),
            ("y", false) => frame.y.as_str(),
            ("alpha", false) => frame.alpha.as_str(),
            ("visible", false) => frame.visible.as_str(),
            _ => return None,
        };
        Some(value.to_string())
    }
}

/// Result of expanding one line.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Expansion {
    pub text: String,
    /// Placeholder tokens that had no binding.
    pub undefined: Vec<String>,
}

/// Expands template lines against a set of bindings.
pub struct Expander<'a> {
    variables: &'a Variables,
    loop1: Option<&'a dyn RowSource>,
    loop2: Option<&'a dyn RowSource>,
}

impl<'a> Expander<'a> {
    pub fn new(variables: &'a Variables) -> Self {
        Self {
            variables,
            loop1: None,
            loop2: None,
        }
    }

    pub fn with_loop1(mut self, rows: &'a dyn RowSource) -> Self {
        self.loop1 = Some(rows);
        self
    }

    pub fn with_loop2(mut self, rows: &'a dyn RowSource) -> Self {
        self.loop2 = Some(rows);
        self
    }

    /// Expand a whole template, writing the result to `out`.
    ///
    /// Returns the undefined placeholder tokens in order of appearance.
    pub fn expand<R: BufRead, W: Write>(&self, mut reader: R, out: &mut W) -> io::Result<Vec<String>> {
        let mut undefined = Vec::new();
        let mut line = String::new();

        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            let expansion = self.expand_line(&line);
            out.write_all(expansion.text.as_bytes())?;
            undefined.extend(expansion.undefined);
        }

        Ok(undefined)
    }

    /// Expand a single line (including its line terminator, if any).
    pub fn expand_line(&self, line: &str) -> Expansion {
        if let Some(rows) = self.loop1.filter(|_| contains_directive(line, LOOP1)) {
            return self.expand_rows(line, rows);
        }
        if let Some(rows) = self.loop2.filter(|_| contains_directive(line, LOOP2)) {
            return self.expand_rows(line, rows);
        }
        self.substitute(line)
    }

    fn substitute(&self, line: &str) -> Expansion {
        let mut text = line.to_string();
        let mut undefined = Vec::new();
        let mut offset = 0;

        while let Some(found) = placeholder().find_at(&text, offset) {
            let range = found.range();
            let token = found.as_str().to_string();

            match self.variables.get(identifier(&token)) {
                Some(Value::Text(value)) => {
                    text.replace_range(range.clone(), value);
                    offset = range.start + value.len();
                }
                Some(Value::DropLine) => {
                    return Expansion {
                        text: String::new(),
                        undefined,
                    };
                }
                None => {
                    undefined.push(token);
                    offset = range.end;
                }
            }
        }

        Expansion { text, undefined }
    }

    fn expand_rows(&self, line: &str, rows: &dyn RowSource) -> Expansion {
        let mut skeleton = String::with_capacity(line.len());
        let mut slots: Vec<(usize, &str)> = Vec::new();
        let mut last = 0;

        for found in placeholder().find_iter(line) {
            skeleton.push_str(&line[last..found.start()]);
            let id = identifier(found.as_str());
            if id != LOOP1 && id != LOOP2 {
                slots.push((skeleton.len(), id));
            }
            last = found.end();
        }
        skeleton.push_str(&line[last..]);

        let mut text = String::new();
        let mut undefined = BTreeSet::new();

        for index in 0..rows.len() {
            let mut cursor = 0;
            for &(offset, id) in &slots {
                text.push_str(&skeleton[cursor..offset]);
                match rows
                    .value(index, id)
                    .or_else(|| self.variables.text(id).map(str::to_string))
                {
                    Some(value) => text.push_str(&value),
                    None => {
                        undefined.insert(format!("${{{}}}", id));
                    }
                }
                cursor = offset;
            }
            text.push_str(&skeleton[cursor..]);
        }

        Expansion {
            text,
            undefined: undefined.into_iter().collect(),
        }
    }
}

fn contains_directive(line: &str, directive: &str) -> bool {
    placeholder()
        .find_iter(line)
        .any(|found| identifier(found.as_str()) == directive)
}
