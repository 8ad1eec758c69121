#![no_main]
use libfuzzer_sys::fuzz_target;

use bedrocknbt::{from_bytes_with_opts, DecodeOptions, HeaderMode};

fuzz_target!(|data: &[u8]| {
    let _ = from_bytes_with_opts(data, DecodeOptions::new().max_depth(64));
    let _ = from_bytes_with_opts(data, DecodeOptions::new().header_mode(HeaderMode::Validate));
});
