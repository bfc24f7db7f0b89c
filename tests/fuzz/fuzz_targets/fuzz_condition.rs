#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = covgate::metrics::cobertura::parse_condition_coverage(s);
        let _ = covgate::metrics::jacoco::parse_percentage(s);
    }
});
