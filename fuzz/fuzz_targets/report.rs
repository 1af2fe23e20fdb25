#![no_main]

use libfuzzer_sys::fuzz_target;
use nstest::report::parse_xunit;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_xunit(s, "fuzz");
    }
});
