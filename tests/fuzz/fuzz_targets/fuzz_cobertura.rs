#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parsing and aggregation must not panic on any input.
    if let Ok(report) = covgate::parsers::cobertura::parse(data) {
        let stats = covgate::metrics::cobertura::aggregate(&report);
        let _ = covgate::evaluate::evaluate(&stats, &Default::default());
    }
});
