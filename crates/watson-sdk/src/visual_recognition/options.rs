//! Visual Recognition v4 request options.

use chrono::NaiveDate;

use super::models::{Feature, ImageSize, ModelFormat, TrainingDataObject, TrainingStatus};
use crate::error::ValidationError;
use crate::models::FileWithMetadata;
use crate::options::options;

// =============================================================================
// Analysis
// =============================================================================

options! {
    /// Options for `analyze`.
    AnalyzeOptions => AnalyzeOptionsBuilder {
        required {
            /// Collections whose trained models are applied.
            collection_ids: Vec<String>,
            features: Vec<Feature>,
        }
        optional {
            images_file: Vec<FileWithMetadata>,
            image_url: Vec<String>,
            /// Minimum score for a detected object, 0.15 to 1.0.
            threshold: f64,
        }
    }
}

impl AnalyzeOptionsBuilder {
    #[must_use]
    pub fn new(collection_ids: Vec<String>, features: Vec<Feature>) -> Self {
        Self::default().collection_ids(collection_ids).features(features)
    }

    #[must_use]
    pub fn add_collection_id(mut self, collection_id: impl Into<String>) -> Self {
        self.collection_ids.get_or_insert_with(Vec::new).push(collection_id.into());
        self
    }

    #[must_use]
    pub fn add_feature(mut self, feature: Feature) -> Self {
        self.features.get_or_insert_with(Vec::new).push(feature);
        self
    }

    #[must_use]
    pub fn add_images_file(mut self, file: FileWithMetadata) -> Self {
        self.images_file.get_or_insert_with(Vec::new).push(file);
        self
    }

    #[must_use]
    pub fn add_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url.get_or_insert_with(Vec::new).push(url.into());
        self
    }
}

// =============================================================================
// Collections
// =============================================================================

options! {
    /// Options for `create_collection`.
    CreateCollectionOptions => CreateCollectionOptionsBuilder {
        required {}
        optional {
            name: String,
            description: String,
            training_status: TrainingStatus,
        }
    }
}

options! {
    /// Options for `list_collections`.
    ListCollectionsOptions => ListCollectionsOptionsBuilder {
        required {}
        optional {}
    }
}

options! {
    /// Options for `get_collection`.
    GetCollectionOptions => GetCollectionOptionsBuilder {
        required {
            collection_id: String,
        }
        optional {}
    }
}

options! {
    /// Options for `update_collection`.
    UpdateCollectionOptions => UpdateCollectionOptionsBuilder {
        required {
            collection_id: String,
        }
        optional {
            name: String,
            description: String,
            training_status: TrainingStatus,
        }
    }
}

options! {
    /// Options for `delete_collection`.
    DeleteCollectionOptions => DeleteCollectionOptionsBuilder {
        required {
            collection_id: String,
        }
        optional {}
    }
}

options! {
    /// Options for `get_model_file`.
    GetModelFileOptions => GetModelFileOptionsBuilder {
        required {
            collection_id: String,
            feature: Feature,
            model_format: ModelFormat,
        }
        optional {}
    }
}

// =============================================================================
// Images
// =============================================================================

options! {
    /// Options for `add_images`.
    ///
    /// At least one of `images_file`, `image_url` or `training_data` must be
    /// set; the service checks this before sending.
    AddImagesOptions => AddImagesOptionsBuilder {
        required {
            collection_id: String,
        }
        optional {
            images_file: Vec<FileWithMetadata>,
            image_url: Vec<String>,
            /// Training data JSON for a single image, as a string.
            training_data: String,
        }
    }
}

impl AddImagesOptions {
    /// Check that the request carries some image content.
    pub fn check_content(&self) -> Result<(), ValidationError> {
        let has_files = self.images_file().is_some_and(|files| !files.is_empty());
        let has_urls = self.image_url().is_some_and(|urls| !urls.is_empty());
        if has_files || has_urls || self.training_data().is_some() {
            Ok(())
        } else {
            Err(ValidationError::invalid(
                "images_file",
                "At least one of imagesFile, imageUrl, or trainingData must be supplied.",
            ))
        }
    }
}

impl AddImagesOptionsBuilder {
    #[must_use]
    pub fn new(collection_id: impl Into<String>) -> Self {
        Self::default().collection_id(collection_id)
    }

    #[must_use]
    pub fn add_images_file(mut self, file: FileWithMetadata) -> Self {
        self.images_file.get_or_insert_with(Vec::new).push(file);
        self
    }

    #[must_use]
    pub fn add_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url.get_or_insert_with(Vec::new).push(url.into());
        self
    }
}

options! {
    /// Options for `list_images`.
    ListImagesOptions => ListImagesOptionsBuilder {
        required {
            collection_id: String,
        }
        optional {}
    }
}

options! {
    /// Options for `get_image_details`.
    GetImageDetailsOptions => GetImageDetailsOptionsBuilder {
        required {
            collection_id: String,
            image_id: String,
        }
        optional {}
    }
}

options! {
    /// Options for `delete_image`.
    DeleteImageOptions => DeleteImageOptionsBuilder {
        required {
            collection_id: String,
            image_id: String,
        }
        optional {}
    }
}

options! {
    /// Options for `get_jpeg_image`.
    GetJpegImageOptions => GetJpegImageOptionsBuilder {
        required {
            collection_id: String,
            image_id: String,
        }
        optional {
            size: ImageSize,
        }
    }
}

// =============================================================================
// Objects
// =============================================================================

options! {
    /// Options for `list_object_metadata`.
    ListObjectMetadataOptions => ListObjectMetadataOptionsBuilder {
        required {
            collection_id: String,
        }
        optional {}
    }
}

options! {
    /// Options for `update_object_metadata`.
    UpdateObjectMetadataOptions => UpdateObjectMetadataOptionsBuilder {
        required {
            collection_id: String,
            /// Current object name.
            object: String,
            /// Name to rename the object to.
            new_object: String,
        }
        optional {}
    }
}

options! {
    /// Options for `get_object_metadata`.
    GetObjectMetadataOptions => GetObjectMetadataOptionsBuilder {
        required {
            collection_id: String,
            object: String,
        }
        optional {}
    }
}

options! {
    /// Options for `delete_object`.
    DeleteObjectOptions => DeleteObjectOptionsBuilder {
        required {
            collection_id: String,
            object: String,
        }
        optional {}
    }
}

// =============================================================================
// Training
// =============================================================================

options! {
    /// Options for `train`.
    TrainOptions => TrainOptionsBuilder {
        required {
            collection_id: String,
        }
        optional {}
    }
}

options! {
    /// Options for `add_image_training_data`.
    AddImageTrainingDataOptions => AddImageTrainingDataOptionsBuilder {
        required {
            collection_id: String,
            image_id: String,
        }
        optional {
            /// Replaces all training objects of the image.
            objects: Vec<TrainingDataObject>,
        }
    }
}

impl AddImageTrainingDataOptionsBuilder {
    #[must_use]
    pub fn add_object(mut self, object: TrainingDataObject) -> Self {
        self.objects.get_or_insert_with(Vec::new).push(object);
        self
    }
}

options! {
    /// Options for `get_training_usage`.
    GetTrainingUsageOptions => GetTrainingUsageOptionsBuilder {
        required {}
        optional {
            start_time: NaiveDate,
            end_time: NaiveDate,
        }
    }
}

options! {
    /// Options for `delete_user_data`.
    DeleteUserDataOptions => DeleteUserDataOptionsBuilder {
        required {
            /// Customer ID the data was tagged with.
            customer_id: String,
        }
        optional {}
    }
}
