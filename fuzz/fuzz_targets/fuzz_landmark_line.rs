#![no_main]

use handswarm::input::parse_line;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };
    // Any line either parses into a well-formed frame, "no hand", or an error
    if let Ok(Some(frame)) = parse_line(line) {
        assert_eq!(frame.points().len(), handswarm::game::LANDMARK_COUNT);
    }
});
