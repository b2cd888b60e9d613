#![no_main]

use libfuzzer_sys::fuzz_target;
use watson_sdk::conversation::{MessageResponse, WorkspaceExport};

fuzz_target!(|data: &[u8]| {
    if let Ok(response) = serde_json::from_slice::<MessageResponse>(data) {
        // Whatever parsed must serialize back
        let _ = serde_json::to_vec(&response).expect("parsed response serializes");
        let _ = response.context.system.as_ref().map(|s| s.dialog_stack());
    }
    let _ = serde_json::from_slice::<WorkspaceExport>(data);
});
