use proptest::prelude::*;
use shed_fs::NormalizedPath;

proptest! {
    #[test]
    fn test_normalization_removes_backslashes(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        prop_assert!(!path.as_str().contains('\\'));

        let roundtripped = NormalizedPath::new(path.to_native());
        prop_assert_eq!(path, roundtripped);
    }

    #[test]
    fn test_join_then_parent_recovers_base(
        base in "[a-z]{1,8}(/[a-z]{1,8}){0,3}",
        name in "[a-z]{1,8}",
    ) {
        let base = NormalizedPath::new(&base);
        let joined = base.join(&name);
        prop_assert_eq!(joined.file_name(), Some(name.as_str()));
        prop_assert_eq!(joined.parent(), Some(base));
    }
}
