#![no_main]
use libfuzzer_sys::fuzz_target;
use osalgo_rs::Scenario;

// Parsing and validation only; engine inputs are covered by the other targets
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(scenario) = Scenario::from_toml_str(text) {
        scenario.validate().unwrap();
    }
    if let Ok(scenario) = Scenario::from_json_str(text) {
        let json = serde_json::to_string(&scenario).unwrap();
        assert_eq!(Scenario::from_json_str(&json).unwrap(), scenario);
    }
});
