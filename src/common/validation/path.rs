//! Path represents a path from some root to a particular field.

use std::fmt;

/// Path represents a path from some root to a particular field.
///
/// This is a linked-list structure where each node contains:
/// - `name`: name of this field or empty if this is an index
/// - `index`: if name is empty, this is a subscript (index or map key) of the previous element
/// - `parent`: pointer to parent node, None if this is root
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    pub(crate) name: String,
    pub(crate) index: String,
    pub(crate) parent: Option<Box<Path>>,
}

impl Path {
    /// Creates a root Path object with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            index: String::new(),
            parent: None,
        }
    }

    /// Creates a root Path object with multiple segments.
    pub fn new_with_segments(segments: &[&str]) -> Self {
        let mut segments = segments.iter();
        let mut r = match segments.next() {
            Some(first) => Self::new(first),
            None => Self::new(""),
        };
        for segment in segments {
            r = r.child(segment);
        }
        r
    }

    /// Child creates a new Path that is a child of the receiver.
    pub fn child(&self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            index: String::new(),
            parent: Some(Box::new(self.clone())),
        }
    }

    /// Index indicates that the previous Path is to be subscripted by an int.
    pub fn index(&self, idx: usize) -> Self {
        Self {
            name: String::new(),
            index: idx.to_string(),
            parent: Some(Box::new(self.clone())),
        }
    }

    /// Key indicates that the previous Path is to be subscripted by a string.
    pub fn key(&self, key: &str) -> Self {
        Self {
            name: String::new(),
            index: key.to_string(),
            parent: Some(Box::new(self.clone())),
        }
    }
}

impl Default for Path {
    fn default() -> Self {
        Self::new("")
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Collect all path elements, then render root-first
        let mut elems = Vec::new();
        let mut p = Some(self);
        while let Some(curr) = p {
            elems.push(curr);
            p = curr.parent.as_deref();
        }

        for elem in elems.iter().rev() {
            if elem.name.is_empty() && elem.index.is_empty() {
                continue;
            }
            if elem.parent.is_some() && !elem.name.is_empty() {
                write!(f, ".")?;
            }
            if !elem.name.is_empty() {
                write!(f, "{}", elem.name)?;
            } else {
                write!(f, "[{}]", elem.index)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_display() {
        assert_eq!(Path::new("metadata").to_string(), "metadata");
        assert_eq!(
            Path::new_with_segments(&["metadata", "name"]).to_string(),
            "metadata.name"
        );
        assert_eq!(Path::new("spec").child("ingressPorts").index(2).to_string(), "spec.ingressPorts[2]");
        assert_eq!(
            Path::new("metadata").child("labels").key("app").to_string(),
            "metadata.labels[app]"
        );
    }
}
