use schemars::schema::{ObjectValidation, RootSchema, Schema, SchemaObject};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{
    any::TypeId,
    sync::Arc,
};

/// Cached JSON schema handle associated with a completion type.
#[derive(Clone, Debug)]
pub struct SchemaHandle {
    schema_name: &'static str,
    type_name: &'static str,
    type_id: TypeId,
    schema_json: Arc<Value>,
}

impl SchemaHandle {
    pub fn from_root_schema<T: 'static>(
        schema_name: &'static str,
        type_name: &'static str,
        root: RootSchema,
    ) -> Self {
        // RootSchema is plain data; serializing it into a Value cannot fail.
        let schema_json = serde_json::to_value(root).unwrap_or(Value::Bool(true));

        Self {
            schema_name,
            type_name,
            type_id: TypeId::of::<T>(),
            schema_json: Arc::new(schema_json),
        }
    }

    pub fn schema_name(&self) -> &'static str {
        self.schema_name
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn schema_json(&self) -> &Value {
        self.schema_json.as_ref()
    }

    /// Pretty-printed schema for embedding into a prompt.
    pub fn to_pretty_string(&self) -> String {
        serde_json::to_string_pretty(self.schema_json()).unwrap_or_else(|_| self.schema_json.to_string())
    }
}

/// A type the model is asked to produce, with its schema built once per process.
pub trait CompletionSchema: DeserializeOwned + Send + Sync + 'static {
    fn schema() -> &'static SchemaHandle;
}

/// Apply doc comments captured by `#[completion_schema]` to the generated schema.
pub fn apply_doc_comments(
    root: &mut RootSchema,
    title: &'static str,
    description: Option<&'static str>,
    field_docs: &[(&'static str, &'static str)],
) {
    let schema_object = &mut root.schema;
    apply_struct_metadata(schema_object, title, description);

    if let Some(object_validation) = schema_object.object.as_mut() {
        apply_field_metadata(object_validation.as_mut(), field_docs);
    }
}

fn apply_struct_metadata(
    schema_object: &mut SchemaObject,
    title: &'static str,
    description: Option<&'static str>,
) {
    let metadata = schema_object.metadata();
    metadata.title.get_or_insert_with(|| title.to_string());
    if let Some(description) = description {
        metadata
            .description
            .get_or_insert_with(|| description.to_string());
    }
}

fn apply_field_metadata(
    object_validation: &mut ObjectValidation,
    field_docs: &[(&'static str, &'static str)],
) {
    for (field, doc) in field_docs {
        if let Some(Schema::Object(field_object)) = object_validation.properties.get_mut(*field) {
            field_object
                .metadata()
                .description
                .get_or_insert_with(|| (*doc).to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NormalizedItinerary;

    #[test]
    fn test_itinerary_schema_metadata() {
        let handle = NormalizedItinerary::schema();
        assert_eq!(handle.schema_name(), "NormalizedItinerary");
        assert_eq!(handle.type_name(), "NormalizedItinerary");
        assert_eq!(handle.type_id(), TypeId::of::<NormalizedItinerary>());

        let schema = handle.schema_json();
        assert_eq!(schema["title"], "NormalizedItinerary");
        assert!(schema["description"]
            .as_str()
            .unwrap_or_default()
            .contains("Render-ready"));
        assert!(schema["properties"]["days"]["description"]
            .as_str()
            .unwrap_or_default()
            .contains("one entry per requested day"));
    }

    #[test]
    fn test_day_image_is_not_requested_from_the_model() {
        let rendered = NormalizedItinerary::schema().to_pretty_string();
        assert!(rendered.contains("transport_note_if_long"));
        assert!(!rendered.contains("day_image"));
    }
}
