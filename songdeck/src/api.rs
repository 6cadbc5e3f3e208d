//! Catalog API transport
//!
//! The four exchanges of the remote song catalog:
//! - `GET /songs` → JSON array of songs
//! - `POST /songs` (multipart `name`, `artist`, `image?`) → created song
//! - `PUT /songs/{id}` (multipart `name`, `artist`, `image?`) → updated song
//! - `DELETE /songs/{id}` → 2xx, body ignored
//!
//! No retries. Timeouts only when configured.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use songdeck_common::config::ClientConfig;
use songdeck_common::{ImageUpload, Song, SongFormData};

use crate::error::ApiError;

/// Catalog API exchanges
///
/// Implemented over HTTP by [`HttpCatalogApi`]; tests substitute in-process fakes.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list_songs(&self) -> Result<Vec<Song>, ApiError>;

    async fn create_song(&self, data: &SongFormData) -> Result<Song, ApiError>;

    async fn update_song(&self, song: &Song) -> Result<Song, ApiError>;

    async fn delete_song(&self, id: &str) -> Result<(), ApiError>;
}

/// reqwest-backed Catalog API client
#[derive(Debug, Clone)]
pub struct HttpCatalogApi {
    /// HTTP client for API requests
    http_client: Client,
    /// Base URL the `songs` path is appended to
    base_url: Url,
}

impl HttpCatalogApi {
    /// Create a client for `base_url` without a request timeout
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::build(base_url, Client::builder())
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Self::build(&config.api_base_url, builder)
    }

    fn build(base_url: &str, builder: reqwest::ClientBuilder) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Encode(format!("Invalid base URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Encode(format!("Not a base URL: {}", base_url)));
        }

        Ok(Self {
            http_client: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/songs[/{id}]`, with `id` percent-encoded as one path segment
    fn songs_url(&self, id: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::Encode(format!("Not a base URL: {}", self.base_url)))?;
            segments.pop_if_empty().push("songs");
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// Multipart body shared by create and update
    fn song_form(name: &str, artist: &str, image: Option<&ImageUpload>) -> Result<Form, ApiError> {
        let form = Form::new()
            .text("name", name.to_string())
            .text("artist", artist.to_string());

        let Some(image) = image else {
            return Ok(form);
        };

        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)
            .map_err(|e| {
                ApiError::Encode(format!("Invalid content type '{}': {}", image.content_type, e))
            })?;
        Ok(form.part("image", part))
    }

    /// Reject non-2xx responses, keeping the body for diagnostics
    async fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let response = Self::check_status(response).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn list_songs(&self) -> Result<Vec<Song>, ApiError> {
        let url = self.songs_url(None)?;
        debug!(url = %url, "Fetching song catalog");

        let response = self.http_client.get(url).send().await?;
        let songs: Vec<Song> = Self::read_json(response).await?;

        debug!(count = songs.len(), "Song catalog fetched");
        Ok(songs)
    }

    async fn create_song(&self, data: &SongFormData) -> Result<Song, ApiError> {
        let url = self.songs_url(None)?;
        debug!(
            url = %url,
            name = %data.name,
            has_image = data.image.is_some(),
            "Creating song"
        );

        let form = Self::song_form(&data.name, &data.artist, data.image.as_ref())?;
        let response = self.http_client.post(url).multipart(form).send().await?;
        Self::read_json(response).await
    }

    async fn update_song(&self, song: &Song) -> Result<Song, ApiError> {
        let url = self.songs_url(Some(&song.id))?;
        let image = song.image_url.as_upload();
        debug!(url = %url, id = %song.id, has_image = image.is_some(), "Updating song");

        let form = Self::song_form(&song.name, &song.artist, image)?;
        let response = self.http_client.put(url).multipart(form).send().await?;
        Self::read_json(response).await
    }

    async fn delete_song(&self, id: &str) -> Result<(), ApiError> {
        let url = self.songs_url(Some(id))?;
        debug!(url = %url, id = %id, "Deleting song");

        let response = self.http_client.delete(url).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_songs_url() {
        let api = HttpCatalogApi::new("http://localhost:3000").unwrap();
        assert_eq!(
            api.songs_url(None).unwrap().as_str(),
            "http://localhost:3000/songs"
        );
        assert_eq!(
            api.songs_url(Some("42")).unwrap().as_str(),
            "http://localhost:3000/songs/42"
        );
    }

    #[test]
    fn test_songs_url_keeps_base_path() {
        let api = HttpCatalogApi::new("https://api.example/v1/").unwrap();
        assert_eq!(
            api.songs_url(Some("a b/c")).unwrap().as_str(),
            "https://api.example/v1/songs/a%20b%2Fc"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(
            HttpCatalogApi::new("not a url"),
            Err(ApiError::Encode(_))
        ));
        assert!(matches!(
            HttpCatalogApi::new("mailto:someone@example.com"),
            Err(ApiError::Encode(_))
        ));
    }

    #[test]
    fn test_song_form_rejects_bad_content_type() {
        let image = ImageUpload::with_content_type("a.png", "not a mime", vec![1, 2, 3]);
        assert!(matches!(
            HttpCatalogApi::song_form("A", "X", Some(&image)),
            Err(ApiError::Encode(_))
        ));
        assert!(HttpCatalogApi::song_form("A", "X", None).is_ok());
    }
}
