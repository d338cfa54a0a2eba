//! Fuzz target for COCO parsing followed by table extraction.
//!
//! Any bytes that parse as COCO must either extract cleanly or return an
//! error; overflow and zero dimensions must never panic.
//!
//! Run with:
//!   cargo +nightly fuzz run coco_extract

#![no_main]

use cocotab::coco::from_coco_slice;
use cocotab::tables::extract_tables;
use cocotab::writer::{write_table_to_string, WriteOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // 10MB is generous for JSON annotation files.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(dataset) = from_coco_slice(data) else {
        return;
    };
    if let Ok(tables) = extract_tables(&dataset) {
        let _ = write_table_to_string(&tables.images, &WriteOptions::default());
        let _ = write_table_to_string(&tables.objects, &WriteOptions::default());
    }
});
