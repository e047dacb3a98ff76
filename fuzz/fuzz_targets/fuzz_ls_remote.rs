#![no_main]

use libfuzzer_sys::fuzz_target;

use capstan::domain::services::{parse_ls_remote, resolution_rules, select_ref};
use capstan::domain::value_objects::RevisionSpec;

fuzz_target!(|data: &[u8]| {
    if let Ok(listing) = std::str::from_utf8(data) {
        // Arbitrary `git ls-remote` output should never panic
        let refs = parse_ls_remote(listing);
        for revision in ["HEAD", "main", "v1.0.0"] {
            let _ = select_ref(&refs, &resolution_rules(&RevisionSpec::parse(revision)));
        }
    }
});
