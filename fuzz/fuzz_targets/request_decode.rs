#![no_main]

use libfuzzer_sys::fuzz_target;
use mural_wire::{parse_value, Request, Response};

fuzz_target!(|data: &[u8]| {
    let Ok(value) = parse_value(data) else {
        return;
    };
    match Request::from_value(value) {
        Ok(request) => {
            // Whatever decodes must encode again under the same action
            let encoded = serde_json::to_value(&request).expect("request encodes");
            assert_eq!(encoded["action"], request.action());
        }
        Err(e) => {
            assert!(!e.is_connection_fatal());
            let _ = Response::from_error(&e);
        }
    }
});
