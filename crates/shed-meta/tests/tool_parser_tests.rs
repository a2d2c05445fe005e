//! Integration tests for tool config parsing

use std::fs;

use pretty_assertions::assert_eq;
use rstest::rstest;
use shed_meta::{Error, GuidContext, RequirementDescriptor, ToolParser, ToolType};
use shed_test_utils::fixtures;
use tempfile::TempDir;

fn parser() -> ToolParser {
    ToolParser::new(GuidContext::new("shed.example.org", "alice", "filtering"))
}

fn write(temp: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = temp.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_parse_simple_tool() {
    let temp = TempDir::new().unwrap();
    let path = write(
        &temp,
        "filtering.xml",
        &fixtures::simple_tool("filter_tool", "1.0.0", "data on any column"),
    );

    let tool = parser()
        .parse_file(&path, "filtering.xml")
        .unwrap()
        .expect("filtering.xml is a tool config");

    assert_eq!(tool.id, "filter_tool");
    assert_eq!(tool.name, "Filter");
    assert_eq!(tool.version, "1.0.0");
    assert_eq!(tool.description, "data on any column");
    assert_eq!(
        tool.version_string_cmd.as_deref(),
        Some("python filtering.py --version")
    );
    assert_eq!(tool.guid, "shed.example.org/repos/alice/filtering/filter_tool/1.0.0");
    assert_eq!(tool.tool_config, "filtering.xml");
    assert_eq!(tool.tool_type, ToolType::Generic);
    assert_eq!(
        tool.requirements,
        vec![RequirementDescriptor::Versioned {
            name: "python".into(),
            kind: "package".into(),
            version: Some("2.7".into()),
        }]
    );
}

#[test]
fn test_parse_tool_tests() {
    let tool = parser()
        .parse_str(&fixtures::simple_tool("filter_tool", "1.0.0", "d"), "filtering.xml")
        .unwrap()
        .unwrap();

    assert_eq!(tool.tests.len(), 1);
    let test = &tool.tests[0];
    assert_eq!(test.name, "Test-1");
    assert_eq!(test.required_files, vec!["1.bed".to_string()]);
    assert_eq!(
        test.inputs,
        vec![
            ("input".to_string(), "1.bed".to_string()),
            ("cond".to_string(), "c1=='chr22'".to_string()),
        ]
    );
    assert_eq!(
        test.outputs,
        vec![("out_file1".to_string(), "filter1_test1.bed".to_string())]
    );
}

#[test]
fn test_fabfile_requirement() {
    let tool = parser()
        .parse_str(
            r#"<tool id="t" name="T" version="2.0">
                <requirements>
                    <requirement type="fabfile" fabfile="fabfile.py" method="install_bwa">bwa</requirement>
                </requirements>
            </tool>"#,
            "t.xml",
        )
        .unwrap()
        .unwrap();

    assert_eq!(
        tool.requirements,
        vec![RequirementDescriptor::Fabfile {
            name: "bwa".into(),
            fabfile: "fabfile.py".into(),
            method: Some("install_bwa".into()),
        }]
    );
    let json = serde_json::to_value(&tool.requirements[0]).unwrap();
    assert_eq!(json["type"], "fabfile");
    assert!(json.get("version").is_none());
}

#[test]
fn test_loc_file_parameter_is_dynamic() {
    let tool = parser()
        .parse_str(&fixtures::tool_with_loc_file("lookup", "mydata.loc"), "lookup.xml")
        .unwrap()
        .unwrap();

    let index = tool.inputs.iter().find(|p| p.name == "index").unwrap();
    assert!(index.is_dynamic);
    let options = index.options.as_ref().unwrap();
    assert_eq!(options.missing_index_file.as_deref(), Some("mydata.loc"));
    assert!(!options.needs_data_table());
}

#[test]
fn test_data_table_parameter_nested_in_conditional() {
    let tool = parser()
        .parse_str(&fixtures::tool_with_data_table("mapper", "all_fasta"), "mapper.xml")
        .unwrap()
        .unwrap();

    let reference = tool.inputs.iter().find(|p| p.name == "ref").unwrap();
    let options = reference.options.as_ref().unwrap();
    assert!(options.needs_data_table());
    assert_eq!(options.missing_data_table_name.as_deref(), Some("all_fasta"));
    assert_eq!(options.data_table.as_ref().unwrap().name, "all_fasta");
}

#[rstest]
#[case(r#"<tool id="t" name="T" tool_type="data_source"><inputs action="http://x"/></tool>"#, ToolType::DataSource)]
#[case(r#"<tool id="t" name="T" tool_type="set_metadata"/>"#, ToolType::SetMetadata)]
#[case(r#"<tool id="t" name="T"><type class="ExportHistoryTool" module="galaxy.tools"/></tool>"#, ToolType::ExportHistory)]
#[case(r#"<tool id="t" name="T" tool_type="data_source"><type class="Tool"/></tool>"#, ToolType::Generic)]
fn test_tool_type_resolution(#[case] xml: &str, #[case] expected: ToolType) {
    let tool = parser().parse_str(xml, "t.xml").unwrap().unwrap();
    assert_eq!(tool.tool_type, expected);
}

#[test]
fn test_unknown_tool_type_is_rejected() {
    let err = parser()
        .parse_str(r#"<tool id="t" name="T" tool_type="quantum"/>"#, "t.xml")
        .unwrap_err();
    assert!(matches!(err, Error::UnknownToolType { .. }));
}

#[test]
fn test_data_source_requires_inputs_action() {
    let err = parser()
        .parse_str(
            r#"<tool id="t" name="T" tool_type="data_source"><inputs/></tool>"#,
            "t.xml",
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "Missing inputs 'action'");
}

#[test]
fn test_code_files_are_collected() {
    let tool = parser()
        .parse_str(
            r#"<tool id="t" name="T"><code file="columns.py"/></tool>"#,
            "tools/t.xml",
        )
        .unwrap()
        .unwrap();
    assert_eq!(tool.code_files, vec!["columns.py".to_string()]);
}

#[test]
fn test_malformed_xml_is_an_error() {
    let temp = TempDir::new().unwrap();
    let path = write(&temp, "broken.xml", "<tool id=\"t\" name=\"T\">");
    assert!(matches!(
        parser().parse_file(&path, "broken.xml"),
        Err(Error::Xml { .. })
    ));
}
