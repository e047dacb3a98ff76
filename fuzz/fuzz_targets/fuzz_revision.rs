#![no_main]

use libfuzzer_sys::fuzz_target;

use capstan::domain::services::resolution_rules;
use capstan::domain::value_objects::RevisionSpec;

fuzz_target!(|data: &[u8]| {
    if let Ok(revision) = std::str::from_utf8(data) {
        // Revision parsing should never panic
        let spec = RevisionSpec::parse(revision);
        let _ = spec.search_pattern();
        let _ = resolution_rules(&spec);
    }
});
