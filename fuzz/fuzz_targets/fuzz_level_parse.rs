#![no_main]
use libfuzzer_sys::fuzz_target;
use logship::Level;

fuzz_target!(|data: &str| {
    // Whatever parses must round-trip through its canonical name
    if let Ok(level) = data.parse::<Level>() {
        assert_eq!(level.as_str().parse::<Level>().ok(), Some(level));
    }
});
