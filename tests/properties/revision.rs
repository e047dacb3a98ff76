//! Property tests for revision parsing and ref selection.

use proptest::prelude::*;

use capstan::domain::services::{parse_ls_remote, resolution_rules, select_ref};
use capstan::domain::value_objects::{CommitId, RevisionSpec};

fn sha() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[0-9a-f]{40}").unwrap()
}

fn ref_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9._-]{0,15}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: a full SHA is always taken literally.
    #[test]
    fn property_full_sha_is_a_commit(sha in sha()) {
        prop_assert_eq!(RevisionSpec::parse(&sha), RevisionSpec::Commit(CommitId::new(sha.clone())));
    }

    /// PROPERTY: `parse_ls_remote` never panics on arbitrary input.
    #[test]
    fn property_parse_ls_remote_never_panics(input in "(?s).{0,256}") {
        let _ = parse_ls_remote(&input);
    }

    /// PROPERTY: a peeled annotated tag always wins over its tag object.
    #[test]
    fn property_annotated_tag_resolves_to_peeled_commit(
        name in ref_name(),
        tag_object in sha(),
        commit in sha(),
    ) {
        let listing = format!(
            "{tag_object}\trefs/tags/{name}\n{commit}\trefs/tags/{name}^{{}}\n"
        );
        let spec = RevisionSpec::parse(&name);
        let selected = select_ref(&parse_ls_remote(&listing), &resolution_rules(&spec));
        prop_assert_eq!(selected, Ok(CommitId::new(commit)));
    }

    /// PROPERTY: a tag beats a branch of the same name.
    #[test]
    fn property_tag_beats_branch(
        name in ref_name(),
        branch in sha(),
        tag in sha(),
    ) {
        let listing = format!("{branch}\trefs/heads/{name}\n{tag}\trefs/tags/{name}\n");
        let spec = RevisionSpec::parse(&name);
        let selected = select_ref(&parse_ls_remote(&listing), &resolution_rules(&spec));
        prop_assert_eq!(selected, Ok(CommitId::new(tag)));
    }
}
