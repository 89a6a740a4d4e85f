//! Localisation resource: an ordered map of string id to string content.
//!
//! A resource may carry one reserved metadata entry (by default `@metadata`),
//! which is kept apart from the string entries and written back first.

use std::io::{
    Read,
    Write,
};
use std::path::Path;

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{
    Serialize,
    Serializer,
};
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

use crate::error::TransmergeError;

/// Default key of the metadata entry.
pub const DEFAULT_METADATA_KEY: &str = "@metadata";

/// Path that stands for standard input or standard output.
pub const STDIO_PATH: &str = "-";

/// The reserved metadata entry, carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub key: String,
    pub value: Value,
}

/// Ordered localisation resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resource {
    metadata: Option<Metadata>,
    entries: IndexMap<String, String>,
}

impl Resource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a resource from `(id, content)` pairs, keeping their order.
    ///
    /// # Examples
    /// ```
    /// use transmerge::resource::Resource;
    ///
    /// let resource = Resource::from_entries([("hello", "Hello"), ("bye", "Goodbye")]);
    /// assert_eq!(resource.ids().collect::<Vec<_>>(), ["hello", "bye"]);
    /// ```
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            metadata: None,
            entries: entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata = Some(Metadata { key: key.into(), value });
        self
    }

    #[must_use]
    pub const fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    pub fn set_metadata(&mut self, metadata: Metadata) {
        self.metadata = Some(metadata);
    }

    pub fn take_metadata(&mut self) -> Option<Metadata> {
        self.metadata.take()
    }

    /// Content stored under `id`, or `None` when absent.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Inserts or replaces an entry. A new id is appended; an existing id keeps its position.
    pub fn insert(&mut self, id: impl Into<String>, content: impl Into<String>) -> Option<String> {
        self.entries.insert(id.into(), content.into())
    }

    /// Replaces the content of an existing entry in place.
    ///
    /// Returns the previous content, or `None` (and changes nothing) when `id` is absent.
    pub fn replace(&mut self, id: &str, content: impl Into<String>) -> Option<String> {
        self.entries.get_mut(id).map(|slot| std::mem::replace(slot, content.into()))
    }

    /// Removes and returns an entry, keeping the order of the remaining ones.
    pub fn take(&mut self, id: &str) -> Option<String> {
        self.entries.shift_remove(id)
    }

    /// Keeps only the entries for which `keep` returns true. Returns how many were removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &str) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|id, content| keep(id.as_str(), content.as_str()));
        before - self.entries.len()
    }

    /// Number of string entries, metadata excluded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(id, content)| (id.as_str(), content.as_str()))
    }

    /// Parses a JSON document.
    ///
    /// The top level must be an object. The entry named `metadata_key` may hold any
    /// JSON value; every other entry must be a string.
    ///
    /// # Errors
    /// [`TransmergeError::MalformedDocument`] naming `document` when the text is not
    /// valid JSON or does not have the shape above.
    pub fn parse(text: &str, document: &str, metadata_key: &str) -> Result<Self, TransmergeError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| TransmergeError::malformed(document, e.to_string()))?;
        Self::from_value(value, document, metadata_key)
    }

    /// Converts an already parsed JSON value. See [`Resource::parse`].
    pub fn from_value(
        value: Value,
        document: &str,
        metadata_key: &str,
    ) -> Result<Self, TransmergeError> {
        let Value::Object(map) = value else {
            return Err(TransmergeError::malformed(
                document,
                format!("expected an object of key/value pairs, found {}", kind_of(&value)),
            ));
        };

        let mut resource = Self::new();
        for (key, value) in map {
            if key == metadata_key {
                resource.metadata = Some(Metadata { key, value });
                continue;
            }
            match value {
                Value::String(content) => {
                    resource.entries.insert(key, content);
                }
                other => {
                    return Err(TransmergeError::malformed(
                        document,
                        format!("value of '{key}' must be a string, found {}", kind_of(&other)),
                    ));
                }
            }
        }
        Ok(resource)
    }

    /// Writes the resource as JSON: metadata first, `indent` per level, non-ASCII unescaped.
    pub fn write_json<W: Write>(&self, writer: W, indent: &str) -> serde_json::Result<()> {
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        self.serialize(&mut serializer)
    }

    /// Renders the resource as a JSON document with a trailing newline.
    pub fn to_json_string(&self, indent: &str) -> serde_json::Result<String> {
        let mut buffer = Vec::new();
        self.write_json(&mut buffer, indent)?;
        buffer.push(b'\n');
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.entries.len() + usize::from(self.metadata.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(metadata) = &self.metadata {
            map.serialize_entry(&metadata.key, &metadata.value)?;
        }
        for (id, content) in &self.entries {
            map.serialize_entry(id, content)?;
        }
        map.end()
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO_PATH
}

/// Loads a resource from a file, or from standard input when `path` is `-`.
///
/// # Errors
/// - [`TransmergeError::Io`] if the file cannot be read
/// - [`TransmergeError::MalformedDocument`] if it cannot be parsed
pub fn load_resource(path: &Path, metadata_key: &str) -> Result<Resource, TransmergeError> {
    let document = path.display().to_string();
    tracing::info!(document = %document, "Reading resource");

    let text = if is_stdio(path) {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text).map_err(|e| TransmergeError::io(path, e))?;
        text
    } else {
        std::fs::read_to_string(path).map_err(|e| TransmergeError::io(path, e))?
    };

    let resource = Resource::parse(&text, &document, metadata_key)?;
    tracing::info!(document = %document, count = resource.len(), "strings read");
    Ok(resource)
}

/// Renders a resource for [`write_document`].
///
/// # Errors
/// [`TransmergeError::Io`] naming `path` if serialization fails.
pub fn render_resource(
    resource: &Resource,
    path: &Path,
    indent: &str,
) -> Result<String, TransmergeError> {
    resource.to_json_string(indent).map_err(|e| TransmergeError::io(path, std::io::Error::other(e)))
}

/// Fails early when `path` is a file whose directory does not exist.
///
/// # Errors
/// [`TransmergeError::Io`] with [`std::io::ErrorKind::NotFound`].
pub fn check_destination(path: &Path) -> Result<(), TransmergeError> {
    if is_stdio(path) {
        return Ok(());
    }
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.is_dir() => Err(TransmergeError::io(
            path,
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("directory '{}' does not exist", dir.display()),
            ),
        )),
        _ => Ok(()),
    }
}

/// Writes rendered text to a file, or to standard output when `path` is `-`.
///
/// # Errors
/// [`TransmergeError::Io`] if the file cannot be written.
pub fn write_document(text: &str, path: &Path) -> Result<(), TransmergeError> {
    if is_stdio(path) {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(text.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|e| TransmergeError::io(path, e))
    } else {
        std::fs::write(path, text).map_err(|e| TransmergeError::io(path, e))
    }
}

/// Writes a resource to a file, or to standard output when `path` is `-`.
///
/// # Errors
/// [`TransmergeError::Io`] if the file cannot be written.
pub fn write_resource(resource: &Resource, path: &Path, indent: &str) -> Result<(), TransmergeError> {
    check_destination(path)?;
    let text = render_resource(resource, path, indent)?;
    write_document(&text, path)
}
