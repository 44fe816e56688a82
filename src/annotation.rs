//! Documentation comments preceding a declaration.
//!
//! [`extract`] walks the source backward from a declaration's start offset and
//! collects the doc comment directly above it; [`Annotation::parse`] splits that
//! text into NatSpec tags.

use indexmap::IndexMap;
use serde::Serialize;

/// Recovers the doc comment ending right before `offset` as clean text.
///
/// Lines are accepted bottom-up while they are blank or look like part of a
/// doc comment (`/**`, `*`, `*/`, `///`). Marker characters are stripped and
/// lines left empty are dropped. The first line that is neither ends the scan.
/// An offset outside `source` or inside a character has no comment.
pub fn extract(source: &str, offset: usize) -> String {
    let Some(head) = source.get(..offset) else {
        return String::new();
    };

    let mut lines = Vec::new();
    for line in head.lines().rev() {
        let line = line.trim();
        if !is_comment_line(line) {
            break;
        }
        let text = strip_comment_markers(line);
        if !text.is_empty() {
            lines.push(text);
        }
    }

    lines.reverse();
    lines.join("\n")
}

fn is_comment_line(line: &str) -> bool {
    line.is_empty() || line.starts_with('*') || line.starts_with("/**") || line.starts_with("///")
}

fn strip_comment_markers(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix("///") {
        return rest.trim();
    }
    let line = line.strip_suffix("*/").unwrap_or(line);
    let line = line.strip_prefix("/*").unwrap_or(line);
    line.trim_start_matches('*').trim()
}

/// A doc comment and its NatSpec tags.
///
/// Untagged lines before the first tag form the notice; untagged lines after a
/// tag continue it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Annotation {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub params: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub returns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inheritdoc: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub custom: IndexMap<String, String>,
}

impl Annotation {
    pub fn parse(text: &str) -> Self {
        let mut annotation = Annotation {
            text: text.to_string(),
            ..Default::default()
        };

        let mut current: Option<(String, String)> = None;
        for line in text.lines() {
            if let Some(tagged) = line.strip_prefix('@') {
                if let Some((tag, body)) = current.take() {
                    annotation.apply(&tag, body);
                }
                let (tag, rest) = tagged.split_once(char::is_whitespace).unwrap_or((tagged, ""));
                current = Some((tag.to_string(), rest.trim().to_string()));
                continue;
            }

            match current.as_mut() {
                Some((_, body)) => {
                    if !body.is_empty() {
                        body.push('\n');
                    }
                    body.push_str(line);
                }
                None => current = Some(("notice".to_string(), line.to_string())),
            }
        }
        if let Some((tag, body)) = current {
            annotation.apply(&tag, body);
        }

        annotation
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn apply(&mut self, tag: &str, body: String) {
        match tag {
            "title" => self.title = Some(body),
            "author" => self.author = Some(body),
            "notice" => append(&mut self.notice, body),
            "dev" => append(&mut self.dev, body),
            "param" => {
                let (name, description) = body.split_once(char::is_whitespace).unwrap_or((body.as_str(), ""));
                self.params.insert(name.to_string(), description.trim().to_string());
            }
            "return" => self.returns.push(body),
            "inheritdoc" => self.inheritdoc = Some(body),
            other => {
                self.custom.insert(other.to_string(), body);
            }
        }
    }
}

fn append(slot: &mut Option<String>, body: String) {
    match slot {
        Some(existing) => {
            existing.push('\n');
            existing.push_str(&body);
        }
        None => *slot = Some(body),
    }
}
