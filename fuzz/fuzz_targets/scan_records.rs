#![no_main]

use libfuzzer_sys::fuzz_target;
use jfr_decoder::EventScanner;
use jfr_wire::IntEncoding;

// Fuzz target: EventScanner over an arbitrary body.
//
// Input format:
//   byte 0: encoding (even = fixed, odd = compressed)
//   bytes 1..: record region
//
// Successful records must tile the region without gaps or overlap.
fuzz_target!(|data: &[u8]| {
    let Some((&mode, body)) = data.split_first() else {
        return;
    };
    let encoding = if mode % 2 == 0 {
        IntEncoding::Fixed
    } else {
        IntEncoding::Compressed
    };

    let Ok(scanner) = EventScanner::new(body, 0, encoding, usize::MAX, usize::MAX) else {
        return;
    };
    let mut expected = 0usize;
    for record in scanner {
        let Ok(record) = record else { break };
        assert_eq!(record.offset, expected);
        assert!(record.size > 0);
        expected = record.offset + record.size as usize;
        assert!(expected <= body.len());
    }
});
