#![no_main]

use libfuzzer_sys::fuzz_target;
use mural_wire::{read_frame, FRAME_DELIMITER};
use tokio::io::BufReader;

const LIMIT: usize = 1024;

fuzz_target!(|data: &[u8]| {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    rt.block_on(async {
        let mut reader = BufReader::with_capacity(16, data);
        while let Ok(Some(frame)) = read_frame(&mut reader, LIMIT).await {
            assert!(!frame.is_empty());
            assert!(frame.len() <= LIMIT);
            assert!(!frame.contains(&FRAME_DELIMITER));
        }
    });
});
