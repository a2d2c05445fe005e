use pretty_assertions::assert_eq;
use shed_fs::{ExcludedDirs, NormalizedPath};
use shed_test_utils::ShedRepo;
use shed_vcs::{Error, GitRevisionSource, RevisionSource};

fn two_revision_repo() -> (ShedRepo, String, String) {
    let repo = ShedRepo::new();
    repo.write("filtering.xml", "<tool version=\"1.0.0\"/>");
    repo.write("tool-data/mydata.loc.sample", "#name\tpath\n");
    let first = repo.commit("Uploaded filtering tool");

    repo.write("filtering.xml", "<tool version=\"1.1.0\"/>");
    repo.write("README", "Filtering tool");
    let second = repo.commit("Bumped filtering tool");

    (repo, first, second)
}

fn names(paths: &[NormalizedPath]) -> Vec<&str> {
    paths.iter().map(|p| p.as_str()).collect()
}

#[test]
fn test_changesets_are_ordered_root_to_tip() {
    let (repo, first, second) = two_revision_repo();
    let source = GitRevisionSource::open(repo.root()).unwrap();

    let changesets = source.changesets().unwrap();
    assert_eq!(changesets.len(), 2);
    assert_eq!(changesets[0].revision, first);
    assert_eq!(changesets[0].ordinal, 0);
    assert_eq!(changesets[0].message, "Uploaded filtering tool");
    assert_eq!(changesets[0].author, "Test User");
    assert_eq!(changesets[1].revision, second);
    assert_eq!(changesets[1].ordinal, 1);
}

#[test]
fn test_tip_identification() {
    let (repo, first, second) = two_revision_repo();
    let source = GitRevisionSource::open(repo.root()).unwrap();

    assert_eq!(source.tip().unwrap().unwrap().revision, second);
    assert!(source.is_tip(&second).unwrap());
    assert!(!source.is_tip(&first).unwrap());
}

#[test]
fn test_resolve_carries_tip_flag() {
    let (repo, first, second) = two_revision_repo();
    let source = GitRevisionSource::open(repo.root()).unwrap();

    let old = source.resolve(&first).unwrap();
    assert_eq!(old.revision(), first);
    assert_eq!(old.changeset.ordinal, 0);
    assert!(!old.is_tip);

    let tip = source.resolve(&second).unwrap();
    assert!(tip.is_tip);
}

#[test]
fn test_full_revision_ids_are_accepted() {
    let (repo, first, _) = two_revision_repo();
    let source = GitRevisionSource::open(repo.root()).unwrap();

    let changeset = source.find_changeset(&first).unwrap().unwrap();
    let by_full = source.find_changeset(&changeset.id).unwrap().unwrap();
    assert_eq!(by_full, changeset);
}

#[test]
fn test_revision_ordinal_and_label() {
    let (repo, first, _) = two_revision_repo();
    let source = GitRevisionSource::open(repo.root()).unwrap();

    assert_eq!(source.revision_ordinal(&first).unwrap(), Some(0));
    assert_eq!(source.revision_ordinal("000000000000").unwrap(), None);
    assert_eq!(source.revision_label(&first).unwrap(), format!("0:{first}"));
    assert_eq!(source.revision_label("000000000000").unwrap(), "-1:000000000000");
}

#[test]
fn test_historical_files_come_from_the_changeset() {
    let (repo, first, _) = two_revision_repo();
    let source = GitRevisionSource::open(repo.root()).unwrap();

    let files = source.list_files(&source.resolve(&first).unwrap()).unwrap();
    assert_eq!(names(&files), vec!["filtering.xml", "tool-data/mydata.loc.sample"]);

    let content = source
        .read_file(&source.resolve(&first).unwrap(), &NormalizedPath::new("filtering.xml"))
        .unwrap();
    assert_eq!(content, b"<tool version=\"1.0.0\"/>".to_vec());
}

#[test]
fn test_tip_files_come_from_the_working_copy() {
    let (repo, _, second) = two_revision_repo();
    repo.write("uncommitted.xml", "<tool/>");
    let source = GitRevisionSource::open(repo.root()).unwrap();

    let files = source.list_files(&source.resolve(&second).unwrap()).unwrap();
    assert_eq!(
        names(&files),
        vec!["README", "filtering.xml", "tool-data/mydata.loc.sample", "uncommitted.xml"]
    );
    assert!(!files.iter().any(|p| p.as_str().starts_with(".git")));
}

#[test]
fn test_custom_exclusions_apply_to_working_copy() {
    let (repo, _, second) = two_revision_repo();
    let source = GitRevisionSource::open(repo.root())
        .unwrap()
        .with_excluded_dirs(ExcludedDirs::default().with("tool-data"));

    let files = source.list_files(&source.resolve(&second).unwrap()).unwrap();
    assert_eq!(names(&files), vec!["README", "filtering.xml"]);
}

#[test]
fn test_unknown_revision_is_reported() {
    let (repo, _, _) = two_revision_repo();
    let source = GitRevisionSource::open(repo.root()).unwrap();

    let err = source.resolve("deadbeef0000").unwrap_err();
    assert!(matches!(err, Error::RevisionNotFound { ref revision } if revision == "deadbeef0000"));
    assert!(err.to_string().contains("does not include revision 'deadbeef0000'"));
}

#[test]
fn test_missing_file_at_revision() {
    let (repo, first, _) = two_revision_repo();
    let source = GitRevisionSource::open(repo.root()).unwrap();

    let err = source
        .read_file(&source.resolve(&first).unwrap(), &NormalizedPath::new("README"))
        .unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

#[test]
fn test_materialize_history_uses_scoped_temp_file() {
    let (repo, first, _) = two_revision_repo();
    let source = GitRevisionSource::open(repo.root()).unwrap();

    let materialized = source
        .materialize(&source.resolve(&first).unwrap(), &NormalizedPath::new("filtering.xml"))
        .unwrap();
    assert!(materialized.is_temporary());
    let temp_path = materialized.path().to_path_buf();
    assert_eq!(
        std::fs::read_to_string(&temp_path).unwrap(),
        "<tool version=\"1.0.0\"/>"
    );

    drop(materialized);
    assert!(!temp_path.exists());
}

#[test]
fn test_materialize_tip_reads_in_place() {
    let (repo, _, second) = two_revision_repo();
    let source = GitRevisionSource::open(repo.root()).unwrap();

    let materialized = source
        .materialize(&source.resolve(&second).unwrap(), &NormalizedPath::new("filtering.xml"))
        .unwrap();
    assert!(!materialized.is_temporary());
    assert!(materialized.path().starts_with(source.working_dir().to_native()));
}

#[test]
fn test_empty_repository_has_no_changesets() {
    let repo = ShedRepo::new();
    let source = GitRevisionSource::open(repo.root()).unwrap();

    assert!(source.changesets().unwrap().is_empty());
    assert!(source.tip().unwrap().is_none());
    assert!(!source.is_tip("000000000000").unwrap());
}

#[test]
fn test_open_non_repository_fails() {
    let temp = tempfile::TempDir::new().unwrap();
    assert!(GitRevisionSource::open(temp.path()).is_err());
}
