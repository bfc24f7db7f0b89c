#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Counter sums must not overflow on any input either.
    if let Ok(report) = covgate::parsers::jacoco::parse(data) {
        let _ = covgate::metrics::jacoco::aggregate(&report);
    }
});
