use std::sync::Arc;

use lazy_static::lazy_static;

use crate::ast::Type;
use crate::execution::CoercedValue;
use crate::types::{ArgumentDescriptor, FieldDescriptor};
use crate::ResolutionError;

lazy_static! {
    /// `__schema`, available on the query root only.
    pub static ref SCHEMA_META_FIELD: Arc<FieldDescriptor> = Arc::new(
        FieldDescriptor::new("__schema", Type::non_null(Type::named("__Schema")))
            .with_description("Access the current type schema of this server.")
            .with_resolver(|repository, _| to_json(repository.introspect()))
    );

    /// `__type(name: String!)`, available on the query root only.
    pub static ref TYPE_META_FIELD: Arc<FieldDescriptor> = Arc::new(
        FieldDescriptor::new("__type", Type::named("__Type"))
            .with_description("Request the type information of a single type.")
            .argument(ArgumentDescriptor::new("name", Type::non_null(Type::named("String"))))
            .with_resolver(|repository, arguments| match arguments.get("name") {
                Some(CoercedValue::String(name)) => to_json(repository.introspect_type(name)),
                _ => Ok(serde_json::Value::Null),
            })
    );
}

fn to_json(value: impl serde::Serialize) -> Result<serde_json::Value, ResolutionError> {
    serde_json::to_value(value).map_err(|err| ResolutionError::HostConversion {
        expected: "JSON".to_string(),
        found: err.to_string(),
    })
}

#[test]
fn meta_fields_resolve_to_introspection_json() {
    use indexmap::IndexMap;

    use crate::schema::{Schema, SchemaRepository};

    let schema = Schema::from_sdl("type Query { name: String }").expect("valid schema");
    let repository = SchemaRepository::new(&schema);

    let introspected = SCHEMA_META_FIELD
        .resolve(&repository, &IndexMap::new())
        .expect("failed to resolve __schema");
    assert_eq!(introspected["queryType"]["name"], "Query");

    let mut arguments = IndexMap::new();
    arguments.insert("name".to_string(), CoercedValue::String("Query".to_string()));
    let query = TYPE_META_FIELD
        .resolve(&repository, &arguments)
        .expect("failed to resolve __type");
    assert_eq!(query["kind"], "OBJECT");
    assert_eq!(query["fields"][0]["name"], "name");

    arguments.insert("name".to_string(), CoercedValue::String("Missing".to_string()));
    assert_eq!(
        TYPE_META_FIELD.resolve(&repository, &arguments),
        Ok(serde_json::Value::Null)
    );
}
