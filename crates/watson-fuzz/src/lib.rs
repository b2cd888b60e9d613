//! Fuzzing library for watson-sdk.
//!
//! The targets under `fuzz/` feed arbitrary bytes to the response and
//! options deserializers. Responses must never panic however the payload
//! drifts; options must either build or fail validation.
//!
//! # Usage
//!
//! ```bash
//! cd crates/watson-fuzz
//! cargo +nightly fuzz run fuzz_message_parse -- -max_total_time=60
//! ```

pub use watson_sdk::{conversation, visual_recognition};
