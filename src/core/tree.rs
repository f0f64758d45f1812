//! Recursive translation of arbitrary JSON documents

use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;

use crate::core::models::SOURCE_LANGUAGE;
use crate::core::orchestrator::Translator;

impl Translator {
    /// Translate every string leaf of `value`, preserving structure.
    ///
    /// Objects keep their key sets, arrays keep their order and non-string
    /// scalars pass through unchanged. Each string leaf is replaced by its
    /// full language map, so a leaf becomes an object. Recursion depth is
    /// bounded only by the call stack.
    pub fn translate_tree<'a>(
        &'a self,
        value: &'a Value,
        target_languages: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Value> + Send + 'a>> {
        Box::pin(async move {
            match value {
                Value::Object(map) => {
                    let mut out = Map::with_capacity(map.len());
                    for (key, child) in map {
                        out.insert(
                            key.clone(),
                            self.translate_tree(child, target_languages).await,
                        );
                    }
                    Value::Object(out)
                }
                Value::Array(items) => {
                    let mut out = Vec::with_capacity(items.len());
                    for item in items {
                        out.push(self.translate_tree(item, target_languages).await);
                    }
                    Value::Array(out)
                }
                Value::String(text) => {
                    let translations = self
                        .translate(text, target_languages, SOURCE_LANGUAGE)
                        .await;
                    Value::Object(
                        translations
                            .into_iter()
                            .map(|(code, translated)| (code, Value::String(translated)))
                            .collect(),
                    )
                }
                other => other.clone(),
            }
        })
    }
}
