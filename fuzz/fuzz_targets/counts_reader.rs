#![no_main]

use binnacle::bins::ClassifyMode;
use binnacle::counts::CompactReader;
use binnacle::driver::classify_stream;
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Arbitrary count files must produce bins or an error, never a panic
    let mut reader = CompactReader::new(Cursor::new(data));
    let _ = classify_stream(&mut reader, &[1024, 65536, 1048576], ClassifyMode::Strict);
});
