//! `multipart/form-data` encoding

use bytes::{BufMut, Bytes, BytesMut};
use serde_json::{Map, Value};

const BOUNDARY_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Ordered text fields encoded as one multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormData {
    boundary: String,
    fields: Vec<(String, String)>,
}

impl FormData {
    #[must_use]
    pub fn new() -> Self {
        FormData::with_boundary(generate_boundary())
    }

    #[must_use]
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        FormData {
            boundary: boundary.into(),
            fields: Vec::new(),
        }
    }

    /// One part per top-level key. Strings are sent as-is, other values as
    /// JSON text, `null` is skipped.
    #[must_use]
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let mut form = FormData::new();
        for (name, value) in object {
            match value {
                Value::Null => {}
                Value::String(text) => form.append(name, text),
                other => form.append(name, &other.to_string()),
            }
        }
        form
    }

    pub fn append(&mut self, name: &str, value: &str) {
        self.fields.push((name.to_string(), value.to_string()));
    }

    #[must_use]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    #[must_use]
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    #[must_use]
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();
        for (name, value) in &self.fields {
            buf.put_slice(b"--");
            buf.put_slice(self.boundary.as_bytes());
            buf.put_slice(b"\r\nContent-Disposition: form-data; name=\"");
            buf.put_slice(escape_name(name).as_bytes());
            buf.put_slice(b"\"\r\n\r\n");
            buf.put_slice(value.as_bytes());
            buf.put_slice(b"\r\n");
        }
        buf.put_slice(b"--");
        buf.put_slice(self.boundary.as_bytes());
        buf.put_slice(b"--\r\n");
        buf.freeze()
    }
}

impl Default for FormData {
    fn default() -> Self {
        FormData::new()
    }
}

fn escape_name(name: &str) -> String {
    name.replace('\r', "%0D")
        .replace('\n', "%0A")
        .replace('"', "%22")
}

fn generate_boundary() -> String {
    let suffix: String = (0..24)
        .map(|_| char::from(BOUNDARY_ALPHABET[fastrand::usize(..BOUNDARY_ALPHABET.len())]))
        .collect();
    format!("----courier-{suffix}")
}
