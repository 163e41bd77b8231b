//! Fuzz target for dataset JSON parsing.
//!
//! Feeds arbitrary byte sequences to the dataset reader, and regroups
//! whatever parses, checking for panics, crashes, or hangs.
//!
//! Run with:
//!   cargo +nightly fuzz run dataset_json_parse

#![no_main]

use coco_regroup::ir::io_coco_json::from_dataset_slice;
use coco_regroup::policy::PolicyRegistry;
use coco_regroup::regroup::run_pipeline;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid OOM on very large inputs.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(dataset) = from_dataset_slice(data) {
        let registry = PolicyRegistry::builtin();
        let _ = run_pipeline(dataset, &registry, "default");
    }
});
