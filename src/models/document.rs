use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key holding a project's ordered history entries inside its record
pub const HISTORY_KEY: &str = "history";

/// The parsed history document: an ordered mapping from project identifier
/// (typically an absolute path) to an opaque project record.
///
/// Everything beyond the `history` array inside a record is schema we don't
/// own and must pass through byte-for-byte. Project order and history order
/// are meaningful, so the backing map preserves insertion order
/// (serde_json's `preserve_order` feature).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    root: Map<String, Value>,
}

impl Document {
    pub fn new() -> Self {
        Self { root: Map::new() }
    }

    pub fn from_root(root: Map<String, Value>) -> Self {
        Self { root }
    }

    /// Parse a document from JSON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON or the top level is
    /// not an object.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).context("Failed to parse document JSON")?;
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => bail!("Document root must be a JSON object, found {}", type_name(&other)),
        }
    }

    /// Serialize back to compact JSON, preserving project and key order
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize document")
    }

    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Project identifiers in document order
    pub fn project_ids(&self) -> impl Iterator<Item = &String> {
        self.root.keys()
    }

    /// (identifier, record) pairs in document order
    pub fn projects(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.root.iter()
    }

    pub fn project(&self, id: &str) -> Option<&Value> {
        self.root.get(id)
    }

    pub fn contains_project(&self, id: &str) -> bool {
        self.root.contains_key(id)
    }

    /// The ordered history items of a project, if the record carries any
    pub fn history(&self, id: &str) -> Option<&Vec<Value>> {
        self.root.get(id)?.get(HISTORY_KEY)?.as_array()
    }

    /// Mutable access to a project's history items
    pub fn history_mut(&mut self, id: &str) -> Option<&mut Vec<Value>> {
        self.root.get_mut(id)?.get_mut(HISTORY_KEY)?.as_array_mut()
    }

    /// Insert (or replace) a project record, appended at the end when new
    pub fn insert_project(&mut self, id: String, record: Value) {
        self.root.insert(id, record);
    }

    /// Append items to a project's history, creating the history array when
    /// the record doesn't carry one yet. Returns false (and appends nothing)
    /// when the project is missing or its record is not an object.
    pub fn append_history(&mut self, id: &str, items: impl IntoIterator<Item = Value>) -> bool {
        let Some(record) = self.root.get_mut(id).and_then(Value::as_object_mut) else {
            return false;
        };
        let history = record.entry(HISTORY_KEY).or_insert_with(|| Value::Array(Vec::new()));
        let Some(history) = history.as_array_mut() else {
            return false;
        };
        history.extend(items);
        true
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_iterate_in_order() {
        let doc = Document::parse(
            r#"{"/b/project":{"history":[]},"/a/project":{"history":[{"display":"hi"}]}}"#,
        )
        .unwrap();

        let ids: Vec<&String> = doc.project_ids().collect();
        assert_eq!(ids, ["/b/project", "/a/project"]);
        assert_eq!(doc.history("/a/project").unwrap().len(), 1);
    }

    #[test]
    fn test_parse_rejects_non_object_root() {
        assert!(Document::parse("[1,2,3]").is_err());
        assert!(Document::parse("not json").is_err());
    }

    #[test]
    fn test_history_missing_or_not_array() {
        let doc =
            Document::parse(r#"{"/p1":{"allowedTools":[]},"/p2":{"history":"nope"}}"#).unwrap();
        assert!(doc.history("/p1").is_none());
        assert!(doc.history("/p2").is_none());
        assert!(doc.history("/p3").is_none());
    }

    #[test]
    fn test_serialization_preserves_order() {
        let text = r#"{"/z":{"history":[]},"/a":{"history":[]},"/m":{"history":[]}}"#;
        let doc = Document::parse(text).unwrap();
        assert_eq!(doc.to_json_string().unwrap(), text);
    }
}
