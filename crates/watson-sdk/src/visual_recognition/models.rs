//! Visual Recognition v4 resources.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{lenient, timestamps};

// =============================================================================
// Enumerations
// =============================================================================

/// Analysis feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Objects,
}

/// Format of a downloadable trained model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFormat {
    Rscnn,
}

/// Size of a stored JPEG image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSize {
    #[default]
    Full,
    Thumbnail,
}

/// Where an image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    File,
    Url,
}

/// Outcome of a training event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingEventStatus {
    Failed,
    Succeeded,
}

macro_rules! wire_display {
    ($($ty:ty),+) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    match serde_json::to_value(self) {
                        Ok(serde_json::Value::String(s)) => f.write_str(&s),
                        _ => Err(fmt::Error),
                    }
                }
            }

            impl crate::options::Presence for $ty {}
        )+
    };
}

wire_display!(Feature, ModelFormat, ImageSize);

// =============================================================================
// Collections
// =============================================================================

/// Training state of one feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectTrainingStatus {
    pub ready: Option<bool>,
    pub in_progress: Option<bool>,
    pub data_changed: Option<bool>,
    pub latest_failed: Option<bool>,
    pub rscnn_ready: Option<bool>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingStatus {
    pub objects: Option<ObjectTrainingStatus>,
}

/// A collection of images with object training data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Collection {
    pub collection_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub image_count: Option<i64>,
    pub training_status: Option<TrainingStatus>,
}

impl Collection {
    /// Whether a trained object model is ready for analysis.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.training_status
            .as_ref()
            .and_then(|status| status.objects.as_ref())
            .and_then(|objects| objects.ready)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionsList {
    pub collections: Vec<Collection>,
}

// =============================================================================
// Images
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSource {
    #[serde(rename = "type", deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,
    pub filename: Option<String>,
    pub archive_filename: Option<String>,
    pub source_url: Option<String>,
    pub resolved_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDimensions {
    pub height: Option<i64>,
    pub width: Option<i64>,
}

/// Bounding box in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub top: i64,
    pub left: i64,
    pub width: i64,
    pub height: i64,
}

impl Location {
    #[must_use]
    pub const fn new(top: i64, left: i64, width: i64, height: i64) -> Self {
        Self { top, left, width, height }
    }
}

/// A labelled object used for training.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingDataObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl TrainingDataObject {
    #[must_use]
    pub fn new(object: impl Into<String>, location: Location) -> Self {
        Self { object: Some(object.into()), location: Some(location) }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingDataObjects {
    pub objects: Vec<TrainingDataObject>,
}

/// Where in the request an error applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorTarget {
    #[serde(rename = "type")]
    pub target_type: Option<String>,
    pub name: Option<String>,
}

/// Per-image or per-request error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceError {
    pub code: Option<String>,
    pub message: Option<String>,
    pub more_info: Option<String>,
    pub target: Option<ErrorTarget>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Warning {
    pub code: Option<String>,
    pub message: Option<String>,
    pub more_info: Option<String>,
}

/// A stored image and its training data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDetails {
    pub image_id: Option<String>,
    pub updated: Option<String>,
    pub created: Option<String>,
    pub source: Option<ImageSource>,
    pub dimensions: Option<ImageDimensions>,
    pub errors: Vec<ServiceError>,
    pub training_data: Option<TrainingDataObjects>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDetailsList {
    pub images: Vec<ImageDetails>,
    pub warnings: Vec<Warning>,
    pub trace: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSummary {
    pub image_id: Option<String>,
    pub updated: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSummaryList {
    pub images: Vec<ImageSummary>,
}

// =============================================================================
// Analysis
// =============================================================================

/// One detected object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectDetail {
    pub object: Option<String>,
    pub location: Option<Location>,
    /// Confidence between 0 and 1.
    pub score: Option<f64>,
}

/// Objects detected by the model of one collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionObjects {
    pub collection_id: Option<String>,
    pub objects: Vec<ObjectDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectedObjects {
    pub collections: Vec<CollectionObjects>,
}

/// Analysis result for one image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub source: Option<ImageSource>,
    pub dimensions: Option<ImageDimensions>,
    pub objects: Option<DetectedObjects>,
    pub errors: Vec<ServiceError>,
}

impl Image {
    /// All detected objects across collections.
    pub fn detections(&self) -> impl Iterator<Item = &ObjectDetail> {
        self.objects
            .iter()
            .flat_map(|objects| objects.collections.iter())
            .flat_map(|collection| collection.objects.iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeResponse {
    pub images: Vec<Image>,
    pub warnings: Vec<Warning>,
    pub trace: Option<String>,
}

// =============================================================================
// Objects
// =============================================================================

/// Training object name and how many images it appears in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectMetadata {
    pub object: Option<String>,
    pub count: Option<i64>,
}

/// Result of renaming a training object.
pub type UpdateObjectMetadata = ObjectMetadata;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectMetadataList {
    pub object_count: Option<i64>,
    pub objects: Vec<ObjectMetadata>,
}

// =============================================================================
// Training usage
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingEvent {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub collection_id: Option<String>,
    pub completion_time: Option<String>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub status: Option<TrainingEventStatus>,
    pub image_count: Option<i64>,
}

/// Training activity over a date range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingEvents {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub completed_events: Option<i64>,
    pub trained_images: Option<i64>,
    pub events: Vec<TrainingEvent>,
}

impl TrainingEvents {
    /// Events that ended in failure.
    pub fn failed(&self) -> impl Iterator<Item = &TrainingEvent> {
        self.events
            .iter()
            .filter(|event| event.status == Some(TrainingEventStatus::Failed))
    }
}

/// Parse a `YYYY-MM-DD` date as used by `get_training_usage`.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

timestamps!(Collection, ImageDetails);
