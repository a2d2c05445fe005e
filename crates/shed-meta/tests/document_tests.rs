//! Integration tests for metadata document assembly

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use shed_meta::{
    DatatypesConfig, GuidContext, MetadataDocument, ToolParser, parse_datatypes_str,
    parse_workflow,
};
use shed_test_utils::fixtures;

fn parser() -> ToolParser {
    ToolParser::new(GuidContext::new("shed.example.org", "alice", "filtering"))
}

#[test]
fn test_document_round_trips_through_json() {
    let tool = parser()
        .parse_str(&fixtures::simple_tool("filter_tool", "1.0.0", "d"), "filtering.xml")
        .unwrap()
        .unwrap();
    let workflow = parse_workflow(fixtures::workflow("Filter pipeline").as_bytes())
        .unwrap()
        .unwrap();
    let datatypes = parse_datatypes_str(&fixtures::datatypes_conf()).unwrap();

    let mut builder = MetadataDocument::builder();
    builder
        .add_tool(&tool)
        .add_workflow(workflow)
        .add_datatypes(datatypes);
    let document = builder.build();

    let json = serde_json::to_string(&document).unwrap();
    let restored: MetadataDocument = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, document);
    assert!(restored.is_installable());
    assert_eq!(restored.tools()[0].guid, tool.guid);
    assert_eq!(restored.workflows()[0].name(), Some("Filter pipeline"));
    assert_eq!(restored.datatype_files(), ["gmap.py".to_string()]);
}

#[test]
fn test_serialized_keys() {
    let tool = parser()
        .parse_str(&fixtures::simple_tool("filter_tool", "1.0.0", "d"), "filtering.xml")
        .unwrap()
        .unwrap();
    let mut builder = MetadataDocument::builder();
    builder.add_tool(&tool).add_datatypes(DatatypesConfig::default());
    let value = serde_json::to_value(builder.build()).unwrap();

    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["tools"]);
    let entry = &value["tools"][0];
    for key in [
        "id",
        "guid",
        "name",
        "version",
        "description",
        "version_string_cmd",
        "tool_config",
        "requirements",
        "tests",
    ] {
        assert!(entry.get(key).is_some(), "missing {key}");
    }
    assert_eq!(entry["requirements"][0]["type"], "package");
}

#[test]
fn test_normalized_ignores_walk_order() {
    let a = parser()
        .parse_str(&fixtures::simple_tool("a_tool", "1.0.0", "d"), "a.xml")
        .unwrap()
        .unwrap();
    let b = parser()
        .parse_str(&fixtures::simple_tool("b_tool", "1.0.0", "d"), "b.xml")
        .unwrap()
        .unwrap();

    let mut first = MetadataDocument::builder();
    first.add_tool(&a).add_tool(&b);
    let mut second = MetadataDocument::builder();
    second.add_tool(&b).add_tool(&a);

    assert_eq!(first.build().normalized(), second.build().normalized());
}

proptest! {
    #[test]
    fn guid_is_deterministic(
        host in "[a-z]{1,8}",
        owner in "[a-z]{1,8}",
        repo in "[a-z]{1,8}",
        id in "[a-z_]{1,8}",
        version in "[0-9]\\.[0-9]",
    ) {
        let context = GuidContext::new(host.clone(), owner.clone(), repo.clone());
        let again = GuidContext::new(host, owner, repo);
        prop_assert_eq!(context.tool_guid(&id, &version), again.tool_guid(&id, &version));
    }

    #[test]
    fn guid_differs_when_any_part_differs(
        owner in "[a-z]{1,8}",
        id in "[a-z]{1,8}",
        other_id in "[a-z]{1,8}",
        version in "[0-9]\\.[0-9]",
        other_version in "[0-9]\\.[0-9]",
    ) {
        prop_assume!(id != other_id || version != other_version);
        let context = GuidContext::new("shed.example.org", owner, "filtering");
        prop_assert_ne!(
            context.tool_guid(&id, &version),
            context.tool_guid(&other_id, &other_version)
        );
    }
}
