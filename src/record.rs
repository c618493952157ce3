use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};

/// A single parsed paper.
///
/// Only the fields read by the accessors below are interpreted; the rest of
/// the JSON object is carried along untouched so it can be written back out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    #[serde(skip)]
    source: PathBuf,
    fields: Map<String, Value>,
}

/// One paragraph of an `abstract` or `body_text` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Paragraph {
    pub text: String,
    #[serde(default)]
    pub section: Option<String>,
}

impl Record {
    /// Read and parse the record stored at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading record");
        let bytes = std::fs::read(path)?;
        Self::from_slice(path, &bytes)
    }

    /// Parse a record from raw bytes. `source` is only used for error
    /// reporting and [`Record::source`].
    pub fn from_slice(source: &Path, bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| Error::malformed(source, e.to_string()))?;

        match value {
            Value::Object(fields) => Ok(Self {
                source: source.to_path_buf(),
                fields,
            }),
            other => Err(Error::malformed(
                source,
                format!("expected a JSON object, found {}", kind_of(&other)),
            )),
        }
    }

    /// Path of the file this record was loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Raw access to a top-level field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    fn paragraphs(&self, name: &str) -> Result<Vec<Paragraph>> {
        let value = self.field(name).ok_or_else(|| {
            Error::malformed(&self.source, format!("missing '{name}' field"))
        })?;
        Vec::<Paragraph>::deserialize(value).map_err(|e| {
            Error::malformed(&self.source, format!("field '{name}': {e}"))
        })
    }

    fn str_field<'a>(&'a self, path: &[&str]) -> Result<&'a str> {
        let mut current: Option<&Value> = None;
        for (depth, key) in path.iter().enumerate() {
            let next = match current {
                None => self.fields.get(*key),
                Some(Value::Object(map)) => map.get(*key),
                Some(_) => None,
            };
            current = Some(next.ok_or_else(|| {
                Error::malformed(
                    &self.source,
                    format!("missing '{}' field", path[..=depth].join(".")),
                )
            })?);
        }

        current.and_then(Value::as_str).ok_or_else(|| {
            Error::malformed(
                &self.source,
                format!("field '{}' is not a string", path.join(".")),
            )
        })
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn join_paragraphs(paragraphs: Vec<Paragraph>) -> String {
    paragraphs
        .into_iter()
        .map(|p| p.text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Body text of the paper: every `body_text` paragraph, newline-joined.
pub fn get_text(record: &Record) -> Result<String> {
    record.paragraphs("body_text").map(join_paragraphs)
}

/// Abstract of the paper: every `abstract` paragraph, newline-joined.
pub fn get_abstract(record: &Record) -> Result<String> {
    record.paragraphs("abstract").map(join_paragraphs)
}

/// Identifier used to join against the `sha` column of the metadata table.
pub fn get_paper_id(record: &Record) -> Result<String> {
    record.str_field(&["paper_id"]).map(str::to_string)
}

pub fn get_title(record: &Record) -> Result<String> {
    record.str_field(&["metadata", "title"]).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_support::paper_json;

    fn parse(value: &Value) -> Result<Record> {
        Record::from_slice(
            Path::new("paper.json"),
            value.to_string().as_bytes(),
        )
    }

    #[test]
    fn text_joins_body_paragraphs() {
        let record = parse(&json!({
            "paper_id": "abc",
            "abstract": [],
            "body_text": [
                {"text": "first", "section": "Intro"},
                {"text": "second", "section": "Methods"},
            ],
        }))
        .unwrap();

        assert_eq!(get_text(&record).unwrap(), "first\nsecond");
        assert_eq!(get_abstract(&record).unwrap(), "");
    }

    #[test]
    fn accessors_read_fixture_fields() {
        let record = Record::from_slice(
            Path::new("a1.json"),
            paper_json("a1", "short summary", "hello world").as_bytes(),
        )
        .unwrap();

        assert_eq!(get_paper_id(&record).unwrap(), "a1");
        assert_eq!(get_abstract(&record).unwrap(), "short summary");
        assert_eq!(get_text(&record).unwrap(), "hello world");
        assert_eq!(get_title(&record).unwrap(), "Paper a1");
        assert_eq!(record.source(), Path::new("a1.json"));
    }

    #[test]
    fn nested_title_lookup() {
        let record = parse(&json!({
            "paper_id": "abc",
            "metadata": {"title": "Nested", "authors": []},
        }))
        .unwrap();
        assert_eq!(get_title(&record).unwrap(), "Nested");

        let record = parse(&json!({"metadata": {"authors": []}})).unwrap();
        match get_title(&record).unwrap_err() {
            Error::MalformedRecord { reason, .. } => {
                assert!(reason.contains("metadata.title"), "got: {reason}");
            }
            other => panic!("expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn paragraph_section_may_be_null() {
        let record = parse(&json!({
            "abstract": [{"text": "x", "section": null}],
        }))
        .unwrap();
        assert_eq!(get_abstract(&record).unwrap(), "x");
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = Record::from_slice(Path::new("bad.json"), b"{not json")
            .unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { .. }));
    }

    #[test]
    fn non_object_is_malformed() {
        let err = parse(&json!([1, 2, 3])).unwrap_err();
        match err {
            Error::MalformedRecord { reason, .. } => {
                assert!(reason.contains("an array"), "got: {reason}");
            }
            other => panic!("expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn missing_field_is_malformed() {
        let record = parse(&json!({"paper_id": "abc"})).unwrap();

        let err = get_text(&record).unwrap_err();
        match err {
            Error::MalformedRecord { path, reason } => {
                assert_eq!(path, Path::new("paper.json"));
                assert!(reason.contains("body_text"), "got: {reason}");
            }
            other => panic!("expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let record = parse(&json!({
            "paper_id": 42,
            "body_text": "not a list",
            "metadata": "not an object",
        }))
        .unwrap();

        assert!(matches!(
            get_text(&record),
            Err(Error::MalformedRecord { .. })
        ));
        assert!(matches!(
            get_paper_id(&record),
            Err(Error::MalformedRecord { .. })
        ));
        assert!(matches!(
            get_title(&record),
            Err(Error::MalformedRecord { .. })
        ));
    }

    #[test]
    fn serializes_back_to_original_object() {
        let value = json!({"paper_id": "abc", "extra": {"n": 1}});
        let record = parse(&value).unwrap();
        assert_eq!(serde_json::to_value(&record).unwrap(), value);
    }
}
