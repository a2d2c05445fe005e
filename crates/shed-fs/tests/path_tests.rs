use rstest::rstest;
use shed_fs::NormalizedPath;

#[rstest]
#[case("tools/filter/filtering.xml", "tools/filter/filtering.xml")]
#[case("tools\\filter\\filtering.xml", "tools/filter/filtering.xml")]
#[case("tools/filter\\filtering.xml", "tools/filter/filtering.xml")]
fn test_normalizes_separators(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(NormalizedPath::new(input).as_str(), expected);
}

#[test]
fn test_join_paths() {
    let base = NormalizedPath::new("repos/alice/filtering");
    assert_eq!(base.join("filtering.xml").as_str(), "repos/alice/filtering/filtering.xml");
}

#[test]
fn test_join_onto_empty_path_has_no_leading_slash() {
    let base = NormalizedPath::new("");
    assert_eq!(base.join("filtering.xml").as_str(), "filtering.xml");
}

#[test]
fn test_parent() {
    let path = NormalizedPath::new("tools/filter/filtering.xml");
    assert_eq!(path.parent().unwrap().as_str(), "tools/filter");
    assert!(NormalizedPath::new("filtering.xml").parent().is_none());
}

#[rstest]
#[case("tools/filtering.xml", Some("filtering.xml"), Some("xml"))]
#[case("tool-data/mydata.loc.sample", Some("mydata.loc.sample"), Some("sample"))]
#[case("workflows/.hidden", Some(".hidden"), None)]
#[case("README", Some("README"), None)]
fn test_file_name_and_extension(
    #[case] input: &str,
    #[case] name: Option<&str>,
    #[case] extension: Option<&str>,
) {
    let path = NormalizedPath::new(input);
    assert_eq!(path.file_name(), name);
    assert_eq!(path.extension(), extension);
}

#[test]
fn test_canonical_resolves_existing_directory() {
    let temp = tempfile::TempDir::new().unwrap();
    let canonical = NormalizedPath::canonical(temp.path()).unwrap();
    assert!(canonical.is_dir());
    assert!(!canonical.as_str().contains('\\'));
}

#[test]
fn test_canonical_missing_path_is_io_error() {
    let result = NormalizedPath::canonical("/nonexistent/shed/repo");
    assert!(matches!(result, Err(shed_fs::Error::Io { .. })));
}
