//! Watson Visual Recognition v4.
//!
//! Object detection against custom-trained collections. Images go up as
//! multipart forms; trained models and stored images come back as raw bytes.

mod models;
mod options;

pub use models::*;
pub use options::*;

use reqwest::multipart::Form;

use crate::client::{JsonBody, Query, WatsonClient};
use crate::config::Config;
use crate::error::ClientResult;
use crate::models::FileWithMetadata;

/// Service name used for environment lookup.
pub const SERVICE_NAME: &str = "watson_vision_combined";

/// Default service endpoint.
pub const DEFAULT_SERVICE_URL: &str = "https://api.us-south.visual-recognition.watson.cloud.ibm.com";

pub const VERSION_DATE_2019_02_11: &str = "2019-02-11";

/// Visual Recognition v4 client.
#[derive(Debug, Clone)]
pub struct VisualRecognition {
    client: WatsonClient,
}

impl VisualRecognition {
    /// Create a client from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        Ok(Self { client: WatsonClient::new(config)? })
    }

    /// Create a client from `WATSON_VISION_COMBINED_*` environment variables.
    pub fn from_env(version: &str) -> anyhow::Result<Self> {
        Self::new(Config::from_env(SERVICE_NAME, DEFAULT_SERVICE_URL, version)?)
    }

    #[must_use]
    pub const fn with_client(client: WatsonClient) -> Self {
        Self { client }
    }

    #[must_use]
    pub const fn client(&self) -> &WatsonClient {
        &self.client
    }

    // =========================================================================
    // Analysis
    // =========================================================================

    /// Detect objects in images with the models of the given collections.
    pub async fn analyze(&self, options: &AnalyzeOptions) -> ClientResult<AnalyzeResponse> {
        let url = self.client.endpoint(&["v4", "analyze"])?;

        let mut form = Form::new();
        for collection_id in options.collection_ids() {
            form = form.text("collection_ids", collection_id.clone());
        }
        for feature in options.features() {
            form = form.text("features", feature.to_string());
        }
        form = attach_images(form, options.images_file(), options.image_url())?;
        if let Some(threshold) = options.threshold() {
            form = form.text("threshold", threshold.to_string());
        }

        tracing::debug!(
            collections = options.collection_ids().len(),
            files = options.images_file().map_or(0, Vec::len),
            urls = options.image_url().map_or(0, Vec::len),
            "Analyzing images"
        );
        self.client.post_multipart(url, &Query::new(), form).await
    }

    // =========================================================================
    // Collections
    // =========================================================================

    pub async fn create_collection(&self, options: &CreateCollectionOptions) -> ClientResult<Collection> {
        let url = self.client.endpoint(&["v4", "collections"])?;
        let body = JsonBody::new()
            .set_opt("name", options.name())?
            .set_opt("description", options.description())?
            .set_opt("training_status", options.training_status())?;
        self.client.post(url, &Query::new(), &body.into_value()).await
    }

    pub async fn list_collections(&self, _options: &ListCollectionsOptions) -> ClientResult<CollectionsList> {
        let url = self.client.endpoint(&["v4", "collections"])?;
        self.client.get(url, &Query::new()).await
    }

    pub async fn get_collection(&self, options: &GetCollectionOptions) -> ClientResult<Collection> {
        let url = self.client.endpoint(&["v4", "collections", options.collection_id()])?;
        self.client.get(url, &Query::new()).await
    }

    pub async fn update_collection(&self, options: &UpdateCollectionOptions) -> ClientResult<Collection> {
        let url = self.client.endpoint(&["v4", "collections", options.collection_id()])?;
        let body = JsonBody::new()
            .set_opt("name", options.name())?
            .set_opt("description", options.description())?
            .set_opt("training_status", options.training_status())?;
        self.client.post(url, &Query::new(), &body.into_value()).await
    }

    pub async fn delete_collection(&self, options: &DeleteCollectionOptions) -> ClientResult<()> {
        let url = self.client.endpoint(&["v4", "collections", options.collection_id()])?;
        self.client.delete(url, &Query::new()).await
    }

    /// Download a trained model.
    pub async fn get_model_file(&self, options: &GetModelFileOptions) -> ClientResult<Vec<u8>> {
        let url = self.client.endpoint(&["v4", "collections", options.collection_id(), "model"])?;
        let query = Query::new()
            .push("feature", options.feature())
            .push("model_format", options.model_format());
        self.client.get_bytes(url, &query, "application/octet-stream").await
    }

    // =========================================================================
    // Images
    // =========================================================================

    /// Add images to a collection.
    ///
    /// # Errors
    ///
    /// Returns a validation error without sending anything if the options
    /// carry no files, URLs or training data.
    pub async fn add_images(&self, options: &AddImagesOptions) -> ClientResult<ImageDetailsList> {
        options.check_content()?;
        let url = self.client.endpoint(&["v4", "collections", options.collection_id(), "images"])?;

        let mut form = attach_images(Form::new(), options.images_file(), options.image_url())?;
        if let Some(training_data) = options.training_data() {
            form = form.text("training_data", training_data.clone());
        }
        self.client.post_multipart(url, &Query::new(), form).await
    }

    pub async fn list_images(&self, options: &ListImagesOptions) -> ClientResult<ImageSummaryList> {
        let url = self.client.endpoint(&["v4", "collections", options.collection_id(), "images"])?;
        self.client.get(url, &Query::new()).await
    }

    pub async fn get_image_details(&self, options: &GetImageDetailsOptions) -> ClientResult<ImageDetails> {
        let url = self.client.endpoint(&[
            "v4",
            "collections",
            options.collection_id(),
            "images",
            options.image_id(),
        ])?;
        self.client.get(url, &Query::new()).await
    }

    pub async fn delete_image(&self, options: &DeleteImageOptions) -> ClientResult<()> {
        let url = self.client.endpoint(&[
            "v4",
            "collections",
            options.collection_id(),
            "images",
            options.image_id(),
        ])?;
        self.client.delete(url, &Query::new()).await
    }

    /// Download a stored image as JPEG.
    pub async fn get_jpeg_image(&self, options: &GetJpegImageOptions) -> ClientResult<Vec<u8>> {
        let url = self.client.endpoint(&[
            "v4",
            "collections",
            options.collection_id(),
            "images",
            options.image_id(),
            "jpeg",
        ])?;
        let query = Query::new().push_opt("size", options.size());
        self.client.get_bytes(url, &query, "image/jpeg").await
    }

    // =========================================================================
    // Objects
    // =========================================================================

    pub async fn list_object_metadata(
        &self,
        options: &ListObjectMetadataOptions,
    ) -> ClientResult<ObjectMetadataList> {
        let url = self.client.endpoint(&["v4", "collections", options.collection_id(), "objects"])?;
        self.client.get(url, &Query::new()).await
    }

    /// Rename a training object across all images of a collection.
    pub async fn update_object_metadata(
        &self,
        options: &UpdateObjectMetadataOptions,
    ) -> ClientResult<UpdateObjectMetadata> {
        let url = self.client.endpoint(&[
            "v4",
            "collections",
            options.collection_id(),
            "objects",
            options.object(),
        ])?;
        let body = JsonBody::new().set("object", options.new_object())?;
        self.client.post(url, &Query::new(), &body.into_value()).await
    }

    pub async fn get_object_metadata(&self, options: &GetObjectMetadataOptions) -> ClientResult<ObjectMetadata> {
        let url = self.client.endpoint(&[
            "v4",
            "collections",
            options.collection_id(),
            "objects",
            options.object(),
        ])?;
        self.client.get(url, &Query::new()).await
    }

    pub async fn delete_object(&self, options: &DeleteObjectOptions) -> ClientResult<()> {
        let url = self.client.endpoint(&[
            "v4",
            "collections",
            options.collection_id(),
            "objects",
            options.object(),
        ])?;
        self.client.delete(url, &Query::new()).await
    }

    // =========================================================================
    // Training
    // =========================================================================

    /// Start training the collection's object model.
    pub async fn train(&self, options: &TrainOptions) -> ClientResult<Collection> {
        let url = self.client.endpoint(&["v4", "collections", options.collection_id(), "train"])?;
        tracing::info!(collection_id = %options.collection_id(), "Starting training");
        self.client.post_empty(url, &Query::new()).await
    }

    pub async fn add_image_training_data(
        &self,
        options: &AddImageTrainingDataOptions,
    ) -> ClientResult<TrainingDataObjects> {
        let url = self.client.endpoint(&[
            "v4",
            "collections",
            options.collection_id(),
            "images",
            options.image_id(),
            "training_data",
        ])?;
        let body = JsonBody::new().set_opt("objects", options.objects())?;
        self.client.post(url, &Query::new(), &body.into_value()).await
    }

    pub async fn get_training_usage(&self, options: &GetTrainingUsageOptions) -> ClientResult<TrainingEvents> {
        let url = self.client.endpoint(&["v4", "training_usage"])?;
        let query = Query::new()
            .push_opt("start_time", options.start_time())
            .push_opt("end_time", options.end_time());
        self.client.get(url, &query).await
    }

    /// Delete all data tagged with a customer ID.
    pub async fn delete_user_data(&self, options: &DeleteUserDataOptions) -> ClientResult<()> {
        let url = self.client.endpoint(&["v4", "user_data"])?;
        let query = Query::new().push("customer_id", options.customer_id());
        self.client.delete(url, &query).await
    }
}

/// Append one `images_file` part per file and one `image_url` part per URL.
fn attach_images(
    mut form: Form,
    files: Option<&Vec<FileWithMetadata>>,
    urls: Option<&Vec<String>>,
) -> ClientResult<Form> {
    for file in files.into_iter().flatten() {
        form = form.part("images_file", file.to_part()?);
    }
    for url in urls.into_iter().flatten() {
        form = form.text("image_url", url.clone());
    }
    Ok(form)
}
