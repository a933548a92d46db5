#![no_main]
use libfuzzer_sys::fuzz_target;
use labtree::quiz_from_platform_xml;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = quiz_from_platform_xml(s);
    }
});
