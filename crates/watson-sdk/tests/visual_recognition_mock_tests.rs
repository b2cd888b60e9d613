//! Mock-based Visual Recognition tests using wiremock.
//!
//! Multipart calls are checked by part name in the raw request body.

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{
    body_json, body_string_contains, header, header_regex, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

use watson_sdk::config::Config;
use watson_sdk::error::ClientError;
use watson_sdk::models::FileWithMetadata;
use watson_sdk::visual_recognition::*;

const VERSION: &str = "2019-02-11";

fn setup_service(mock_server: &MockServer) -> VisualRecognition {
    VisualRecognition::new(Config::for_testing(&mock_server.uri(), VERSION)).unwrap()
}

fn fixture(name: &str) -> serde_json::Value {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

// =============================================================================
// Analyze
// =============================================================================

#[tokio::test]
async fn test_analyze_sends_repeated_parts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v4/analyze"))
        .and(query_param("version", VERSION))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("name=\"collection_ids\"\r\n\r\nc1"))
        .and(body_string_contains("name=\"collection_ids\"\r\n\r\nc2"))
        .and(body_string_contains("name=\"features\"\r\n\r\nobjects"))
        .and(body_string_contains("name=\"image_url\"\r\n\r\nhttps://example.com/cat.jpg"))
        .and(body_string_contains("name=\"images_file\"; filename=\"dog.png\""))
        .and(body_string_contains("name=\"threshold\"\r\n\r\n0.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixture("analyze_response.json")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = setup_service(&mock_server);
    let options = AnalyzeOptions::builder()
        .add_collection_id("c1")
        .add_collection_id("c2")
        .add_feature(Feature::Objects)
        .add_image_url("https://example.com/cat.jpg")
        .add_images_file(FileWithMetadata::new(b"fake-png-bytes".to_vec(), "dog.png"))
        .threshold(0.5)
        .build()
        .unwrap();

    let response = service.analyze(&options).await.unwrap();

    assert_eq!(response.images.len(), 1);
    let image = &response.images[0];
    assert_eq!(image.source.as_ref().and_then(|s| s.source_type), Some(SourceType::File));
    let detection = image.detections().next().unwrap();
    assert_eq!(detection.object.as_deref(), Some("object"));
    assert_eq!(detection.location, Some(Location::new(3, 4, 5, 6)));
    assert_eq!(response.warnings[0].code.as_deref(), Some("invalid_field"));
    assert_eq!(response.trace.as_deref(), Some("trace"));
}

// =============================================================================
// Collections
// =============================================================================

#[tokio::test]
async fn test_create_collection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v4/collections"))
        .and(body_json(json!({"name": "name", "description": "description"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(fixture("collection.json")))
        .mount(&mock_server)
        .await;

    let service = setup_service(&mock_server);
    let options =
        CreateCollectionOptions::builder().name("name").description("description").build().unwrap();

    let collection = service.create_collection(&options).await.unwrap();
    assert_eq!(collection.collection_id.as_deref(), Some("collectionId"));
    assert_eq!(collection.image_count, Some(10));
    assert!(!collection.is_ready());
    let objects = collection.training_status.and_then(|s| s.objects).unwrap();
    assert_eq!(objects.rscnn_ready, Some(true));
}

#[tokio::test]
async fn test_list_and_delete_collections() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/collections"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"collections": [fixture("collection.json")]})),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v4/collections/collectionId"))
        .and(query_param("version", VERSION))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = setup_service(&mock_server);
    let list = service
        .list_collections(&ListCollectionsOptions::builder().build().unwrap())
        .await
        .unwrap();
    assert_eq!(list.collections.len(), 1);

    let options = DeleteCollectionOptions::builder().collection_id("collectionId").build().unwrap();
    service.delete_collection(&options).await.unwrap();
}

#[tokio::test]
async fn test_get_model_file_returns_bytes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/collections/c1/model"))
        .and(query_param("feature", "objects"))
        .and(query_param("model_format", "rscnn"))
        .and(header("accept", "application/octet-stream"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"This is a mock binary response.".to_vec()))
        .mount(&mock_server)
        .await;

    let service = setup_service(&mock_server);
    let options = GetModelFileOptions::builder()
        .collection_id("c1")
        .feature(Feature::Objects)
        .model_format(ModelFormat::Rscnn)
        .build()
        .unwrap();

    let bytes = service.get_model_file(&options).await.unwrap();
    assert_eq!(bytes, b"This is a mock binary response.");
}

// =============================================================================
// Images
// =============================================================================

#[tokio::test]
async fn test_add_images_multipart() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v4/collections/c1/images"))
        .and(body_string_contains("name=\"image_url\"\r\n\r\nhttps://example.com/a.jpg"))
        .and(body_string_contains("name=\"training_data\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixture("image_details_list.json")))
        .mount(&mock_server)
        .await;

    let service = setup_service(&mock_server);
    let options = AddImagesOptionsBuilder::new("c1")
        .add_image_url("https://example.com/a.jpg")
        .training_data(r#"{"objects":[{"object":"cat","location":{"top":1,"left":2,"width":3,"height":4}}]}"#)
        .build()
        .unwrap();

    let list = service.add_images(&options).await.unwrap();
    let details = &list.images[0];
    assert_eq!(details.image_id.as_deref(), Some("imageId"));
    assert_eq!(details.dimensions.and_then(|d| d.width), Some(5));
    assert_eq!(details.errors[0].target.as_ref().and_then(|t| t.name.as_deref()), Some("name"));
    assert!(details.created_at().is_some());
}

#[tokio::test]
async fn test_add_images_without_content_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = setup_service(&mock_server);
    let options = AddImagesOptionsBuilder::new("c1").build().unwrap();

    let err = service.add_images(&options).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert!(err.to_string().contains("At least one of imagesFile, imageUrl, or trainingData"));
}

#[tokio::test]
async fn test_get_jpeg_image_size() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/collections/c1/images/i1/jpeg"))
        .and(query_param("size", "thumbnail"))
        .and(header("accept", "image/jpeg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF]))
        .mount(&mock_server)
        .await;

    let service = setup_service(&mock_server);
    let options = GetJpegImageOptions::builder()
        .collection_id("c1")
        .image_id("i1")
        .size(ImageSize::Thumbnail)
        .build()
        .unwrap();

    let bytes = service.get_jpeg_image(&options).await.unwrap();
    assert_eq!(bytes, vec![0xFF_u8, 0xD8, 0xFF]);
}

#[tokio::test]
async fn test_list_images() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/collections/c1/images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "images": [{"image_id": "imageId", "updated": "2019-01-01T12:00:00"}]
        })))
        .mount(&mock_server)
        .await;

    let service = setup_service(&mock_server);
    let options = ListImagesOptions::builder().collection_id("c1").build().unwrap();

    let list = service.list_images(&options).await.unwrap();
    assert_eq!(list.images[0].image_id.as_deref(), Some("imageId"));
}

// =============================================================================
// Objects and training
// =============================================================================

#[tokio::test]
async fn test_update_object_metadata_renames() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v4/collections/c1/objects/old%20name"))
        .and(body_json(json!({"object": "new name"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"object": "new name", "count": 5})))
        .mount(&mock_server)
        .await;

    let service = setup_service(&mock_server);
    let options = UpdateObjectMetadataOptions::builder()
        .collection_id("c1")
        .object("old name")
        .new_object("new name")
        .build()
        .unwrap();

    let updated = service.update_object_metadata(&options).await.unwrap();
    assert_eq!(updated.count, Some(5));
}

#[tokio::test]
async fn test_list_object_metadata() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/collections/c1/objects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object_count": 11,
            "objects": [{"object": "object", "count": 5}]
        })))
        .mount(&mock_server)
        .await;

    let service = setup_service(&mock_server);
    let options = ListObjectMetadataOptions::builder().collection_id("c1").build().unwrap();

    let list = service.list_object_metadata(&options).await.unwrap();
    assert_eq!(list.object_count, Some(11));
    assert_eq!(list.objects[0].object.as_deref(), Some("object"));
}

#[tokio::test]
async fn test_train_posts_without_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v4/collections/c1/train"))
        .respond_with(ResponseTemplate::new(202).set_body_json(fixture("collection.json")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = setup_service(&mock_server);
    let options = TrainOptions::builder().collection_id("c1").build().unwrap();

    let collection = service.train(&options).await.unwrap();
    assert_eq!(collection.name.as_deref(), Some("name"));
}

#[tokio::test]
async fn test_add_image_training_data_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v4/collections/c1/images/i1/training_data"))
        .and(body_json(json!({
            "objects": [{"object": "cat", "location": {"top": 26, "left": 26, "width": 26, "height": 26}}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objects": [{"object": "cat", "location": {"top": 26, "left": 26, "width": 26, "height": 26}}]
        })))
        .mount(&mock_server)
        .await;

    let service = setup_service(&mock_server);
    let options = AddImageTrainingDataOptions::builder()
        .collection_id("c1")
        .image_id("i1")
        .add_object(TrainingDataObject::new("cat", Location::new(26, 26, 26, 26)))
        .build()
        .unwrap();

    let objects = service.add_image_training_data(&options).await.unwrap();
    assert_eq!(objects.objects.len(), 1);
}

#[tokio::test]
async fn test_get_training_usage_dates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/training_usage"))
        .and(query_param("start_time", "2019-01-01"))
        .and(query_param("end_time", "2019-01-31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixture("training_events.json")))
        .mount(&mock_server)
        .await;

    let service = setup_service(&mock_server);
    let options = GetTrainingUsageOptions::builder()
        .start_time(NaiveDate::from_ymd_opt(2019, 1, 1).unwrap())
        .end_time(NaiveDate::from_ymd_opt(2019, 1, 31).unwrap())
        .build()
        .unwrap();

    let events = service.get_training_usage(&options).await.unwrap();
    assert_eq!(events.completed_events, Some(15));
    assert_eq!(events.trained_images, Some(13));
    assert_eq!(events.failed().count(), 1);
}

#[tokio::test]
async fn test_delete_user_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v4/user_data"))
        .and(query_param("customer_id", "customer-1"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = setup_service(&mock_server);
    let options = DeleteUserDataOptions::builder().customer_id("customer-1").build().unwrap();
    service.delete_user_data(&options).await.unwrap();
}
