//! Whole-call guarantees of dereferencing: no-ops, equivalence of references
//! and the values they name, precise failures, cycles, and shared tables.

use openapi_types::{
    ComponentKind, Components, ContentType, DereferenceError, Dereferenceable, Document, Example,
    Header, HttpMethod, MediaType, Parameter, Reference, Referenceable, RequestBody, Response,
    Schema, dereference,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn pet_components() -> Components {
    Components::new()
        .with_schema(
            "Pet",
            Schema::object()
                .with_property("name", Schema::string())
                .with_property_reference("tag", "Tag")
                .require_property("name"),
        )
        .with_schema("Tag", Schema::string().with_max_length(32))
        .with_header("RateLimit", Header::with_schema_reference("Limit"))
        .with_schema("Limit", Schema::integer())
        .with_example("Rex", Example::with_value(json!({"name": "Rex"})))
}

#[test]
fn test_inline_tree_resolves_to_itself() {
    init_tracing();
    let response = Response::new("inline")
        .with_header("X-Id", Header::new(Schema::string()))
        .with_content(
            ContentType::json(),
            MediaType::new(Schema::array().with_items(Schema::integer())),
        );

    let resolved = response.dereferenced(&Components::no_components()).unwrap();

    assert_eq!(resolved.underlying_response(), &response);
    let items = resolved.content[&ContentType::json()]
        .schema
        .as_ref()
        .and_then(|schema| schema.items.as_deref())
        .unwrap();
    assert_eq!(items.underlying_schema(), &Schema::integer());
}

#[test]
fn test_reference_resolves_like_the_component_it_names() {
    init_tracing();
    let components = pet_components();

    let by_reference =
        dereference(&Referenceable::<Schema>::component("Pet"), &components).unwrap();
    let by_value = dereference(components.get_schema("Pet").unwrap(), &components).unwrap();
    assert_eq!(by_reference, by_value);

    let by_reference =
        dereference(&Referenceable::<Header>::component("RateLimit"), &components).unwrap();
    let by_value = dereference(components.get_header("RateLimit").unwrap(), &components).unwrap();
    assert_eq!(by_reference, by_value);
}

#[test]
fn test_nested_references_are_resolved_transitively() {
    let resolved =
        dereference(&Referenceable::<Schema>::component("Pet"), &pet_components()).unwrap();

    assert_eq!(resolved.required, vec!["name".to_string()]);
    assert_eq!(resolved.properties["tag"].max_length, Some(32));
    assert_eq!(
        resolved.properties["tag"].underlying_schema(),
        &Schema::string().with_max_length(32)
    );
}

#[test]
fn test_missing_component_names_kind_and_name() {
    let components = pet_components();

    let err = dereference(&Referenceable::<Parameter>::component("Pet"), &components).unwrap_err();
    assert_eq!(err, DereferenceError::missing_component(ComponentKind::Parameters, "Pet"));
    assert_eq!(err.kind(), Some(ComponentKind::Parameters));
    assert_eq!(err.name(), Some("Pet"));
}

#[test]
fn test_first_failure_wins() {
    let media_type = MediaType::with_schema_reference("First")
        .with_named_example("second", Referenceable::<Example>::component("Second"));

    let err = media_type.dereferenced(&Components::no_components()).unwrap_err();
    assert_eq!(err, DereferenceError::missing_component(ComponentKind::Schemas, "First"));
}

#[test]
fn test_failure_is_atomic_and_leaves_input_untouched() {
    let request_body = RequestBody::new()
        .with_content(ContentType::json(), MediaType::with_schema_reference("Pet"))
        .with_content(ContentType::xml(), MediaType::with_schema_reference("Gone"));
    let before = request_body.clone();

    let result = request_body.dereferenced(&pet_components());

    assert_eq!(
        result,
        Err(DereferenceError::missing_component(ComponentKind::Schemas, "Gone"))
    );
    assert_eq!(request_body, before);
}

#[test]
fn test_cycle_is_detected_from_any_entry_point() {
    init_tracing();
    let components = Components::new()
        .with_schema("A", Schema::object().with_property_reference("b", "B"))
        .with_schema("B", Schema::object().with_property_reference("a", "A"));

    assert_eq!(
        dereference(&Referenceable::<Schema>::component("A"), &components),
        Err(DereferenceError::cyclic_reference(ComponentKind::Schemas, "A"))
    );
    assert_eq!(
        dereference(&Referenceable::<Schema>::component("B"), &components),
        Err(DereferenceError::cyclic_reference(ComponentKind::Schemas, "B"))
    );

    let inline = Schema::array().with_items_reference("A");
    assert_eq!(
        dereference(&inline, &components),
        Err(DereferenceError::cyclic_reference(ComponentKind::Schemas, "A"))
    );
}

#[test]
fn test_self_reference_is_a_cycle() {
    let components = Components::new().with_schema(
        "Node",
        Schema::object().with_property_reference("next", "Node"),
    );

    let err = dereference(&Referenceable::<Schema>::component("Node"), &components).unwrap_err();
    assert_eq!(err.to_string(), "Cyclic reference to components/schemas/Node");
}

#[test]
fn test_cycle_spanning_component_kinds() {
    let components = Components::new()
        .with_header(
            "Trace",
            Header::with_content(ContentType::json(), MediaType::with_schema_reference("Span")),
        )
        .with_schema("Span", Schema::object().with_property_reference("parent", "Span"));

    assert_eq!(
        dereference(&Referenceable::<Header>::component("Trace"), &components),
        Err(DereferenceError::cyclic_reference(ComponentKind::Schemas, "Span"))
    );
}

#[test]
fn test_external_reference_is_rejected() {
    let slot =
        Referenceable::Reference(Reference::<Schema>::external("https://example.com/pet.json"));

    let err = dereference(&slot, &pet_components()).unwrap_err();
    assert_eq!(err, DereferenceError::unsupported_external("https://example.com/pet.json"));
    assert_eq!(err.kind(), None);
}

#[test]
fn test_shared_table_across_threads() {
    let components = pet_components();
    let response = Response::new("pet")
        .with_header_reference("X-Rate-Limit", "RateLimit")
        .with_content(ContentType::json(), MediaType::with_schema_reference("Pet"));
    let expected = response.dereferenced(&components).unwrap();
    let (response, components) = (&response, &components);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(move || response.dereferenced(components)))
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().as_ref(), Ok(&expected));
        }
    });
}

#[test]
fn test_decoded_document_dereferences_locally() {
    init_tracing();
    let document: Document = serde_json::from_value(json!({
        "openapi": "3.0.3",
        "info": {"title": "Pets", "version": "1.0.0"},
        "paths": {
            "/pets/{petId}": {
                "parameters": [{"$ref": "#/components/parameters/PetId"}],
                "get": {
                    "operationId": "getPet",
                    "responses": {
                        "200": {"$ref": "#/components/responses/Pet"},
                        "default": {"description": "Unexpected error"}
                    }
                },
                "put": {
                    "operationId": "updatePet",
                    "requestBody": {"$ref": "#/components/requestBodies/Pet"},
                    "responses": {"204": {"description": "Updated"}}
                }
            }
        },
        "components": {
            "schemas": {
                "Pet": {
                    "type": "object",
                    "required": ["name"],
                    "properties": {
                        "name": {"type": "string"},
                        "tag": {"$ref": "#/components/schemas/Tag"}
                    }
                },
                "Tag": {"type": "string"}
            },
            "parameters": {
                "PetId": {
                    "name": "petId",
                    "in": "path",
                    "required": true,
                    "schema": {"type": "integer"}
                }
            },
            "headers": {
                "RateLimit": {"schema": {"type": "integer"}}
            },
            "examples": {
                "Rex": {"value": {"name": "Rex"}}
            },
            "responses": {
                "Pet": {
                    "description": "A pet",
                    "headers": {"X-Rate-Limit": {"$ref": "#/components/headers/RateLimit"}},
                    "content": {
                        "application/json": {
                            "schema": {"$ref": "#/components/schemas/Pet"},
                            "examples": {"rex": {"$ref": "#/components/examples/Rex"}}
                        }
                    }
                }
            },
            "requestBodies": {
                "Pet": {
                    "required": true,
                    "content": {
                        "application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}
                    }
                }
            }
        }
    }))
    .unwrap();

    let resolved = document.locally_dereferenced().unwrap();
    let item = &resolved.paths["/pets/{petId}"];
    assert_eq!(item.parameters[0].name, "petId");

    let get = item.operation(HttpMethod::Get).unwrap();
    let ok = get.response_for("200").unwrap();
    assert_eq!(ok.description, "A pet");
    let content = &ok.content[&ContentType::json()];
    assert_eq!(
        content.schema.as_ref().unwrap().properties["tag"].underlying_schema(),
        &Schema::string()
    );
    assert_eq!(
        content.examples.as_ref().unwrap()["rex"],
        Example::with_value(json!({"name": "Rex"}))
    );
    assert_eq!(
        ok.headers.as_ref().unwrap()["X-Rate-Limit"].underlying_header(),
        &Header::new(Schema::integer())
    );

    assert_eq!(
        item.get.as_ref().map(|get| get.responses["200"].description.as_str()),
        Some("A pet")
    );

    let put = item.operation(HttpMethod::Put).unwrap();
    assert!(put.request_body.as_ref().unwrap().is_required());

    let operation_ids: Vec<_> = resolved
        .paths
        .values()
        .flat_map(|item| item.operations())
        .map(|(_, operation)| operation)
        .filter_map(|operation| operation.operation_id.clone())
        .collect();
    assert_eq!(operation_ids, vec!["getPet", "updatePet"]);
}

#[test]
fn test_properties_keep_document_order() {
    let schema: Schema = serde_json::from_str(
        r##"{
            "type": "object",
            "properties": {
                "zeta": {"$ref": "#/components/schemas/Tag"},
                "alpha": {"type": "string"},
                "mid": {
                    "type": "object",
                    "properties": {"z": {"type": "integer"}, "a": {"type": "integer"}}
                }
            }
        }"##,
    )
    .unwrap();

    let resolved = dereference(&schema, &pet_components()).unwrap();

    let names: Vec<&str> = resolved.properties.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    let nested: Vec<&str> = resolved.properties["mid"]
        .properties
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(nested, vec!["z", "a"]);
}
