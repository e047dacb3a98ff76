#![no_main]

use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Parsing and validating a deploy definition should never panic
        if let Ok((config, _warnings)) =
            capstan::config::parse_with_warnings(content, Path::new("deploy.toml"))
        {
            let _ = config.into_desired(Path::new("/etc/capstan"));
        }
        let _ = toml::from_str::<capstan::DeployConfig>(content);
    }
});
