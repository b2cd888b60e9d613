#![no_main]

use libfuzzer_sys::fuzz_target;
use watson_sdk::conversation::{CreateWorkspaceOptions, MessageOptions};
use watson_sdk::visual_recognition::AddImageTrainingDataOptions;

fuzz_target!(|data: &[u8]| {
    // Deserialization goes through the builders, so a success must hold a valid workspace id
    if let Ok(options) = serde_json::from_slice::<MessageOptions>(data) {
        assert!(!options.workspace_id().is_empty());
    }
    let _ = serde_json::from_slice::<CreateWorkspaceOptions>(data);
    let _ = serde_json::from_slice::<AddImageTrainingDataOptions>(data);
});
