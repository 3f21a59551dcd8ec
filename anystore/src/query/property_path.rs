use crate::errors::{ErrorKind, StoreError, StoreResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use smallvec::SmallVec;
use std::fmt::{Display, Formatter};

static SEGMENT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>[A-Za-z_][A-Za-z0-9_]*)(?:\[(?P<index>\d*)\])?$")
        .expect("segment pattern is valid")
});

/// One step of a [`PropertyPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Named property of an object.
    Property(String),
    /// Every element of an array.
    Each,
    /// A single element of an array.
    Index(usize),
}

/// A parsed, dot separated property path such as `Lines[].Product.Name`.
///
/// Resolving a path against a document yields every value it reaches; a
/// path through `[]` can reach many values, a path through a missing
/// property reaches none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    raw: String,
    segments: SmallVec<[PathSegment; 4]>,
}

impl PropertyPath {
    pub fn parse(path: &str) -> StoreResult<PropertyPath> {
        if path.trim().is_empty() {
            log::error!("Property path cannot be empty");
            return Err(StoreError::new(
                "Property path cannot be empty",
                ErrorKind::BadInput,
            ));
        }

        let mut segments = SmallVec::new();
        for part in path.split('.') {
            let captures = match SEGMENT_PATTERN.captures(part) {
                Some(captures) => captures,
                None => {
                    log::error!("Invalid segment '{}' in property path '{}'", part, path);
                    return Err(StoreError::new(
                        &format!("Invalid segment '{}' in property path '{}'", part, path),
                        ErrorKind::BadInput,
                    ));
                }
            };

            segments.push(PathSegment::Property(captures["name"].to_string()));
            if let Some(index) = captures.name("index") {
                if index.as_str().is_empty() {
                    segments.push(PathSegment::Each);
                } else {
                    let position = index.as_str().parse::<usize>().map_err(|_| {
                        log::error!("Array index out of range in property path '{}'", path);
                        StoreError::new(
                            &format!("Array index out of range in property path '{}'", path),
                            ErrorKind::BadInput,
                        )
                    })?;
                    segments.push(PathSegment::Index(position));
                }
            }
        }

        Ok(PropertyPath {
            raw: path.to_string(),
            segments,
        })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Every value this path reaches inside `document`, in document order.
    pub fn resolve<'a>(&self, document: &'a Value) -> Vec<&'a Value> {
        let mut current = vec![document];
        for segment in &self.segments {
            let mut next = Vec::with_capacity(current.len());
            for value in current {
                match (segment, value) {
                    (PathSegment::Property(name), Value::Object(map)) => {
                        if let Some(child) = map.get(name) {
                            next.push(child);
                        }
                    }
                    (PathSegment::Each, Value::Array(items)) => next.extend(items.iter()),
                    (PathSegment::Index(position), Value::Array(items)) => {
                        if let Some(child) = items.get(*position) {
                            next.push(child);
                        }
                    }
                    _ => {}
                }
            }
            if next.is_empty() {
                return next;
            }
            current = next;
        }
        current
    }

    /// The first value this path reaches, used as a sort key.
    pub fn resolve_first<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        self.resolve(document).into_iter().next()
    }
}

impl Display for PropertyPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}
