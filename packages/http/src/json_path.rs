//! JSON path evaluation over response bodies.
//!
//! Supported syntax:
//!
//! | syntax              | meaning                                   |
//! |---------------------|-------------------------------------------|
//! | `$`                 | root                                      |
//! | `.name`, `['name']` | object member                             |
//! | `[2]`, `[-1]`       | array element, negative counts from end   |
//! | `[*]`, `.*`         | every member / element                    |
//! | `..name`            | member `name` at any depth                |

use serde_json::Value;

use crate::error::{HttpError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Child(String),
    Index(i64),
    Wildcard,
    Descendant(String),
}

/// Select every value `path` matches in `root`, in document order.
pub fn select<'a>(root: &'a Value, path: &str) -> Result<Vec<&'a Value>> {
    let segments = parse(path)?;
    let mut current = vec![root];

    for segment in &segments {
        let mut next = Vec::new();
        for value in current {
            match segment {
                Segment::Child(name) => {
                    if let Some(child) = value.get(name.as_str()) {
                        next.push(child);
                    }
                }
                Segment::Index(index) => {
                    if let Value::Array(items) = value {
                        let resolved = if *index < 0 {
                            items.len() as i64 + index
                        } else {
                            *index
                        };
                        if let Some(item) = usize::try_from(resolved).ok().and_then(|i| items.get(i)) {
                            next.push(item);
                        }
                    }
                }
                Segment::Wildcard => match value {
                    Value::Array(items) => next.extend(items.iter()),
                    Value::Object(map) => next.extend(map.values()),
                    _ => {}
                },
                Segment::Descendant(name) => collect_descendants(value, name, &mut next),
            }
        }
        current = next;
    }

    Ok(current)
}

fn collect_descendants<'a>(value: &'a Value, name: &str, out: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            if let Some(found) = map.get(name) {
                out.push(found);
            }
            for child in map.values() {
                collect_descendants(child, name, out);
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_descendants(child, name, out);
            }
        }
        _ => {}
    }
}

fn parse(path: &str) -> Result<Vec<Segment>> {
    let invalid = |reason: &str| HttpError::InvalidJsonPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = path.trim();
    let rest = trimmed
        .strip_prefix('$')
        .ok_or_else(|| invalid("path must start with '$'"))?;
    let chars: Vec<char> = rest.chars().collect();
    let mut segments = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '.' => {
                let descendant = chars.get(i + 1) == Some(&'.');
                i += if descendant { 2 } else { 1 };
                let start = i;
                while i < chars.len() && chars[i] != '.' && chars[i] != '[' {
                    i += 1;
                }
                let name: String = chars[start..i].iter().collect();
                match (descendant, name.as_str()) {
                    (_, "") => return Err(invalid("empty member name")),
                    (false, "*") => segments.push(Segment::Wildcard),
                    (true, "*") => return Err(invalid("'..*' is not supported")),
                    (false, _) => segments.push(Segment::Child(name)),
                    (true, _) => segments.push(Segment::Descendant(name)),
                }
            }
            '[' => {
                i += 1;
                match chars.get(i).copied() {
                    Some(quote @ ('\'' | '"')) => {
                        i += 1;
                        let start = i;
                        while i < chars.len() && chars[i] != quote {
                            i += 1;
                        }
                        if i >= chars.len() {
                            return Err(invalid("unterminated quoted name"));
                        }
                        let name: String = chars[start..i].iter().collect();
                        i += 1;
                        if chars.get(i) != Some(&']') {
                            return Err(invalid("expected ']' after quoted name"));
                        }
                        segments.push(Segment::Child(name));
                    }
                    Some('*') => {
                        i += 1;
                        if chars.get(i) != Some(&']') {
                            return Err(invalid("expected ']' after '*'"));
                        }
                        segments.push(Segment::Wildcard);
                    }
                    _ => {
                        let start = i;
                        while i < chars.len() && chars[i] != ']' {
                            i += 1;
                        }
                        if i >= chars.len() {
                            return Err(invalid("unterminated index"));
                        }
                        let raw: String = chars[start..i].iter().collect();
                        let index = raw
                            .trim()
                            .parse::<i64>()
                            .map_err(|_| invalid(&format!("invalid index '{raw}'")))?;
                        segments.push(Segment::Index(index));
                    }
                }
                i += 1;
            }
            other => return Err(invalid(&format!("unexpected character '{other}'"))),
        }
    }

    Ok(segments)
}
