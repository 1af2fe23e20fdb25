#![no_main]

use libfuzzer_sys::fuzz_target;
use nstest_core::{path_to_namespace, shrink_candidate, test_candidate};

fuzz_target!(|data: &[u8]| {
    if let Ok(path) = std::str::from_utf8(data) {
        let _ = path_to_namespace(path);
        // Shrinking must always terminate
        let candidate = test_candidate(path, "test_", "");
        let mut current = candidate.as_str();
        while let Some(next) = shrink_candidate(current) {
            assert!(next.len() < current.len());
            current = next;
        }
    }
});
