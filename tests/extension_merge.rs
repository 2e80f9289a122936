use assert_json_diff::assert_json_eq;
use serde_json::json;
use serde_norway::Value;

use fbp_spec::{Document, Endpoint, ExtensionSet, Parameter, RepoMethod, Warning};

const USER_SERVICE: &str = include_str!("./testdata/user_service.yaml");
const STALE_ENUM: &str = include_str!("./testdata/stale_enum.yaml");

fn schema<'a>(document: &'a Document, name: &str) -> &'a Value {
    &document.as_value()["components"]["schemas"][name]
}

#[test]
fn merge_writes_the_requested_state_into_the_schema() {
    let document = Document::parse(USER_SERVICE).unwrap();
    let extensions = ExtensionSet::builder()
        .root_schema(true)
        .persist(true)
        .business_name("id", "User Id")
        .enum_name(Some("UserStatus"))
        .build();

    let merged = document.apply_extensions("User", &extensions).unwrap();
    assert!(merged.warnings.is_empty());

    let user = schema(&merged.document, "User");
    assert_eq!(user["x-fbp-params"]["rootSchema"].as_bool(), Some(true));
    assert_eq!(user["x-fbp-params"]["persist"].as_bool(), Some(true));
    assert_eq!(
        user["properties"]["id"]["x-fbp-props"]["businessName"].as_str(),
        Some("User Id")
    );
    assert_eq!(
        user["properties"]["status"]["x-fbp-enum-name"].as_str(),
        Some("UserStatus")
    );
}

#[test]
fn enum_name_lands_only_on_the_first_enum_property() {
    let document = Document::parse(USER_SERVICE).unwrap();
    let extensions = ExtensionSet::builder()
        .enum_name(Some("UserStatus"))
        .build();

    let merged = document.apply_extensions("User", &extensions).unwrap();
    let yaml = merged.document.to_yaml().unwrap();

    assert_eq!(yaml.matches("x-fbp-enum-name").count(), 1);
    let user = schema(&merged.document, "User");
    assert_eq!(
        user["properties"]["status"]["x-fbp-enum-name"].as_str(),
        Some("UserStatus")
    );
}

#[test]
fn orphaned_enum_name_warns_and_writes_nothing() {
    let document = Document::parse(USER_SERVICE).unwrap();
    let extensions = ExtensionSet::builder().enum_name(Some("OrderKind")).build();

    let merged = document.apply_extensions("Order", &extensions).unwrap();

    assert_eq!(
        merged.warnings,
        [Warning::OrphanedEnumName {
            schema: String::from("Order"),
            enum_name: String::from("OrderKind"),
        }]
    );
    assert!(!merged.document.to_yaml().unwrap().contains("x-fbp-enum-name"));
}

#[test]
fn missing_params_block_is_created_in_canonical_form() {
    let document = Document::parse(USER_SERVICE).unwrap();
    let extensions = ExtensionSet::builder()
        .persist(true)
        .repo_method(
            RepoMethod::builder()
                .query(Some("findByStatus"))
                .fetch_method(Some("findByStatus"))
                .fetch_params(Some("status"))
                .build(),
        )
        .build();

    let merged = document.apply_extensions("Order", &extensions).unwrap();

    assert_json_eq!(
        &schema(&merged.document, "Order")["x-fbp-params"],
        json!({
            "rootSchema": false,
            "generatePersistenceLayer": false,
            "persist": true,
            "setDefaults": false,
            "isModifiable": true,
            "tableName": null,
            "repoMethods": [{
                "query": "findByStatus",
                "fetchMethod": "findByStatus",
                "fetchParams": "status",
            }],
            "overrideMethods": [],
            "interfaces": [],
            "endPoints": [],
            "nonModifiableAttributes": [],
        })
    );
}

#[test]
fn nested_endpoint_parameters_serialize_with_reserved_key_names() {
    let document = Document::parse(USER_SERVICE).unwrap();
    let extensions = ExtensionSet::builder()
        .end_point(
            Endpoint::builder()
                .path(Some("/users/{id}"))
                .method(Some("GET"))
                .operation_id(Some("getUser"))
                .parameter(
                    Parameter::builder()
                        .name(Some("id"))
                        .parameter_in(Some("path"))
                        .param_type(Some("integer"))
                        .required(Some(true))
                        .build(),
                )
                .build(),
        )
        .build();

    let merged = document.apply_extensions("User", &extensions).unwrap();

    assert_json_eq!(
        &schema(&merged.document, "User")["x-fbp-params"]["endPoints"],
        json!([{
            "path": "/users/{id}",
            "method": "GET",
            "operationId": "getUser",
            "parameters": [{
                "name": "id",
                "in": "path",
                "type": "integer",
                "required": true,
            }],
        }])
    );
}

#[test]
fn omitted_business_names_are_cleared() {
    let document = Document::parse(USER_SERVICE).unwrap();
    let extensions = ExtensionSet::builder().business_name("id", "User Id").build();

    let merged = document.apply_extensions("User", &extensions).unwrap();

    let user = schema(&merged.document, "User");
    assert_eq!(
        user["properties"]["id"]["x-fbp-props"]["businessName"].as_str(),
        Some("User Id")
    );
    assert!(user["properties"]["email"]
        .as_mapping()
        .is_some_and(|email| !email.contains_key("x-fbp-props")));
}

#[test]
fn untouched_schemas_and_document_head_are_preserved() {
    let document = Document::parse(USER_SERVICE).unwrap();
    let extensions = ExtensionSet::builder()
        .persist(true)
        .business_name("id", "User Id")
        .enum_name(Some("UserStatus"))
        .build();

    let merged = document.apply_extensions("User", &extensions).unwrap();

    let order_before = serde_norway::to_string(schema(&document, "Order")).unwrap();
    let order_after = serde_norway::to_string(schema(&merged.document, "Order")).unwrap();
    assert_eq!(order_after, order_before);

    assert_eq!(
        &merged.document.as_value()["info"],
        &document.as_value()["info"]
    );
    assert_eq!(
        &merged.document.as_value()["paths"],
        &document.as_value()["paths"]
    );
}

#[test]
fn merge_is_idempotent() {
    let document = Document::parse(STALE_ENUM).unwrap();
    let extensions = ExtensionSet::builder()
        .persist(true)
        .table_name(Some("shipment"))
        .business_name("mode", "Transport Mode")
        .business_name("reference", "Shipment Reference")
        .enum_name(Some("TransportMode"))
        .build();

    let once = document.apply_extensions("Shipment", &extensions).unwrap();
    let twice = once.document.apply_extensions("Shipment", &extensions).unwrap();

    assert_eq!(
        once.document.to_yaml().unwrap(),
        twice.document.to_yaml().unwrap()
    );
}

#[test]
fn stale_enum_placements_collapse_to_one() {
    let document = Document::parse(STALE_ENUM).unwrap();
    let extensions = ExtensionSet::builder()
        .enum_name(Some("TransportMode"))
        .build();

    let merged = document.apply_extensions("Shipment", &extensions).unwrap();
    let yaml = merged.document.to_yaml().unwrap();

    assert_eq!(yaml.matches("x-fbp-enum-name").count(), 1);
    let shipment = schema(&merged.document, "Shipment");
    assert_eq!(
        shipment["properties"]["mode"]["x-fbp-enum-name"].as_str(),
        Some("TransportMode")
    );
    assert!(shipment["properties"]["state"]
        .as_mapping()
        .is_some_and(|state| !state.contains_key("x-fbp-enum-name")));
}

#[test]
fn merged_state_reads_back_as_submitted() {
    let document = Document::parse(USER_SERVICE).unwrap();
    let extensions = ExtensionSet::builder()
        .root_schema(true)
        .persist(true)
        .table_name(Some("app_user"))
        .repo_method(RepoMethod::builder().query(Some("findByStatus")).build())
        .non_modifiable_attributes(["id"])
        .business_name("id", "User Id")
        .business_name("email", "Email Address")
        .enum_name(Some("UserStatus"))
        .build();

    let merged = document.apply_extensions("User", &extensions).unwrap();
    let state = merged.document.extension_state("User").unwrap();

    assert!(state.warnings.is_empty());
    assert_eq!(state.extensions, extensions);
}

#[test]
fn failed_merge_leaves_the_document_as_parsed() {
    let document = Document::parse(USER_SERVICE).unwrap();

    let error = document
        .apply_extensions("Ghost", &ExtensionSet::default())
        .unwrap_err();

    assert!(matches!(error, fbp_spec::Error::SchemaNotFound(name) if name == "Ghost"));
    assert_eq!(document, Document::parse(USER_SERVICE).unwrap());
}
