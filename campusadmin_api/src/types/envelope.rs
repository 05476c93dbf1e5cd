use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{probe::lookup, ServerPageMeta};

/// The standard places a list endpoint puts its collection, in lookup order:
/// `data.<name>`, `<name>`, `data`, then the body itself.
pub fn default_collection_paths(collection: &str) -> Vec<String> {
    vec![
        format!("data.{}", collection),
        collection.to_string(),
        "data".to_string(),
        String::new(),
    ]
}

/// A list endpoint's response body, kept as raw JSON.
///
/// Nothing about the shape is assumed up front: the collection and the
/// pagination metadata are located by probing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListBody {
    pub body: Value,
}

impl ListBody {
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// Returns the first array found at one of `paths`, or `None` when no
    /// path leads to an array.
    pub fn items<S: AsRef<str>>(&self, paths: &[S]) -> Option<&[Value]> {
        paths.iter().find_map(|path| {
            lookup(&self.body, path.as_ref())
                .and_then(Value::as_array)
                .map(Vec::as_slice)
        })
    }

    pub fn page_meta(&self) -> ServerPageMeta {
        ServerPageMeta::from_body(&self.body)
    }
}

impl From<Value> for ListBody {
    fn from(body: Value) -> Self {
        Self::new(body)
    }
}
