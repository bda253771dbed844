#![no_main]
use libfuzzer_sys::fuzz_target;
use logship::Config;

fuzz_target!(|data: &str| {
    // Must not panic on any config content
    if let Ok(config) = Config::parse(data) {
        let _ = config.level();
        let _ = config.stacktrace_level();
        let _ = config.sink_level(config.remote.level.as_deref());
    }
});
