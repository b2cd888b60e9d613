//! In-memory file uploads.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// File contents plus the name and media type sent with a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileWithMetadata {
    /// Raw bytes. Base64 in the JSON representation.
    #[serde(serialize_with = "encode_base64", deserialize_with = "decode_base64")]
    pub data: Vec<u8>,

    /// File name reported to the service.
    pub filename: String,

    /// Media type; guessed from the file extension when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl FileWithMetadata {
    #[must_use]
    pub fn new(data: impl Into<Vec<u8>>, filename: impl Into<String>) -> Self {
        Self { data: data.into(), filename: filename.into(), content_type: None }
    }

    /// Set an explicit media type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read a file from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        Ok(Self::new(data, filename))
    }

    /// Media type to send, falling back to a guess from the extension.
    #[must_use]
    pub fn media_type(&self) -> &str {
        if let Some(content_type) = &self.content_type {
            return content_type;
        }
        mime_guess::from_path(&self.filename).first_raw().unwrap_or("application/octet-stream")
    }

    /// Convert into a multipart part.
    pub(crate) fn to_part(&self) -> reqwest::Result<reqwest::multipart::Part> {
        reqwest::multipart::Part::bytes(self.data.clone())
            .file_name(self.filename.clone())
            .mime_str(self.media_type())
    }
}

impl crate::options::Presence for FileWithMetadata {
    fn is_blank(&self) -> bool {
        self.data.is_empty()
    }
}

fn encode_base64<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(data))
}

fn decode_base64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let encoded = String::deserialize(deserializer)?;
    STANDARD.decode(encoded).map_err(serde::de::Error::custom)
}
