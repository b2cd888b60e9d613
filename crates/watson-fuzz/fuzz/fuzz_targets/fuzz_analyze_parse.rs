#![no_main]

use libfuzzer_sys::fuzz_target;
use watson_sdk::visual_recognition::{AnalyzeResponse, ImageDetailsList, TrainingEvents};

fuzz_target!(|data: &[u8]| {
    if let Ok(response) = serde_json::from_slice::<AnalyzeResponse>(data) {
        for image in &response.images {
            let _ = image.detections().count();
        }
    }
    let _ = serde_json::from_slice::<ImageDetailsList>(data);
    let _ = serde_json::from_slice::<TrainingEvents>(data);
});
