//! Song catalog models
//!
//! `Song` mirrors the JSON records served by the Catalog API. Its cover image
//! is either a path on the asset host (persisted) or a locally selected image
//! that has not been uploaded yet.

use serde::de::Deserializer;
use serde::ser::{Error as _, Serializer};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Result;

/// Fallback MIME type when neither the bytes nor the file extension identify the payload
const OCTET_STREAM: &str = "application/octet-stream";

/// Locally selected cover image, pending upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// File name sent in the multipart `image` part
    pub file_name: String,
    /// MIME type of the payload
    pub content_type: String,
    /// Raw image bytes
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Create an upload, sniffing the content type from the bytes
    ///
    /// Falls back to the file extension when the magic bytes are not recognized.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = sniff_content_type(&file_name, &bytes);
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Create an upload with an explicit content type
    pub fn with_content_type(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read an image file from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("cover")
            .to_string();
        Ok(Self::new(file_name, bytes))
    }

    /// Payload size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True when the content type is `image/*`
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

fn sniff_content_type(file_name: &str, bytes: &[u8]) -> String {
    if let Some(kind) = infer::get(bytes) {
        return kind.mime_type().to_string();
    }

    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => OCTET_STREAM,
    }
    .to_string()
}

/// Cover image of a song
///
/// Serializes as the plain `imageUrl` string used by the Catalog API. An
/// `Upload` has no persisted form and refuses to serialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Path or URL on the asset host; empty when the song has no cover
    Remote(String),
    /// Image selected locally, sent as the multipart `image` part
    Upload(ImageUpload),
}

impl Default for ImageSource {
    fn default() -> Self {
        ImageSource::Remote(String::new())
    }
}

impl ImageSource {
    pub fn as_upload(&self) -> Option<&ImageUpload> {
        match self {
            ImageSource::Upload(upload) => Some(upload),
            ImageSource::Remote(_) => None,
        }
    }

    pub fn remote_path(&self) -> Option<&str> {
        match self {
            ImageSource::Remote(path) => Some(path),
            ImageSource::Upload(_) => None,
        }
    }
}

impl Serialize for ImageSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ImageSource::Remote(path) => serializer.serialize_str(path),
            ImageSource::Upload(upload) => Err(S::Error::custom(format!(
                "image upload '{}' has no persisted URL",
                upload.file_name
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for ImageSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let path = Option::<String>::deserialize(deserializer)?;
        Ok(ImageSource::Remote(path.unwrap_or_default()))
    }
}

/// Song record as held by the Catalog API
///
/// `id` is assigned by the API and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: String,
    pub name: String,
    pub artist: String,
    #[serde(default)]
    pub image_url: ImageSource,
}

impl Song {
    pub fn new(id: impl Into<String>, name: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            artist: artist.into(),
            image_url: ImageSource::default(),
        }
    }

    /// Resolve the cover image against the asset host
    ///
    /// Returns `None` for songs without a cover and for pending uploads.
    pub fn cover_url(&self, asset_base_url: &str) -> Option<String> {
        let path = self.image_url.remote_path()?;
        if path.is_empty() {
            return None;
        }
        if path.starts_with("http://") || path.starts_with("https://") {
            return Some(path.to_string());
        }
        Some(format!(
            "{}/{}",
            asset_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }
}

/// Input for creating a song; never persisted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongFormData {
    pub name: String,
    pub artist: String,
    pub image: Option<ImageUpload>,
}

impl SongFormData {
    pub fn new(name: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artist: artist.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_song_deserializes_api_record() {
        let song: Song = serde_json::from_str(
            r#"{"id":"42","name":"Test Song","artist":"Test Artist","imageUrl":"uploads/cover.png"}"#,
        )
        .unwrap();

        assert_eq!(song.id, "42");
        assert_eq!(song.name, "Test Song");
        assert_eq!(song.artist, "Test Artist");
        assert_eq!(song.image_url, ImageSource::Remote("uploads/cover.png".into()));
    }

    #[test]
    fn test_missing_or_null_image_url_is_empty_remote() {
        let missing: Song = serde_json::from_str(r#"{"id":"1","name":"A","artist":"X"}"#).unwrap();
        let null: Song =
            serde_json::from_str(r#"{"id":"1","name":"A","artist":"X","imageUrl":null}"#).unwrap();

        assert_eq!(missing.image_url, ImageSource::Remote(String::new()));
        assert_eq!(null, missing);
    }

    #[test]
    fn test_upload_refuses_to_serialize() {
        let mut song = Song::new("1", "A", "X");
        song.image_url = ImageSource::Upload(ImageUpload::new("cover.png", PNG_HEADER.to_vec()));

        assert!(serde_json::to_string(&song).is_err());
    }

    #[test]
    fn test_content_type_sniffed_from_bytes() {
        // Magic bytes win over a misleading extension
        let upload = ImageUpload::new("cover.txt", PNG_HEADER.to_vec());
        assert_eq!(upload.content_type, "image/png");
        assert!(upload.is_image());
    }

    #[test]
    fn test_content_type_falls_back_to_extension() {
        let jpeg = ImageUpload::new("cover.JPG", vec![0, 1, 2]);
        assert_eq!(jpeg.content_type, "image/jpeg");

        let unknown = ImageUpload::new("notes", vec![0, 1, 2]);
        assert_eq!(unknown.content_type, OCTET_STREAM);
        assert!(!unknown.is_image());
    }

    #[test]
    fn test_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("art.png");
        std::fs::write(&path, PNG_HEADER).unwrap();

        let upload = ImageUpload::from_path(&path).unwrap();
        assert_eq!(upload.file_name, "art.png");
        assert_eq!(upload.len(), PNG_HEADER.len());
        assert!(upload.is_image());
    }

    #[test]
    fn test_cover_url_resolution() {
        let mut song = Song::new("1", "A", "X");
        assert_eq!(song.cover_url("https://assets.example"), None);

        song.image_url = ImageSource::Remote("/uploads/a.png".into());
        assert_eq!(
            song.cover_url("https://assets.example/").as_deref(),
            Some("https://assets.example/uploads/a.png")
        );

        song.image_url = ImageSource::Remote("https://cdn.example/a.png".into());
        assert_eq!(
            song.cover_url("https://assets.example").as_deref(),
            Some("https://cdn.example/a.png")
        );

        song.image_url = ImageSource::Upload(ImageUpload::new("a.png", PNG_HEADER.to_vec()));
        assert_eq!(song.cover_url("https://assets.example"), None);
    }
}
