#![no_main]
use libfuzzer_sys::fuzz_target;
use labtree::parse_problem_markup;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_problem_markup(s);
    }
});
