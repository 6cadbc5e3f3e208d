//! In-process Catalog API for integration tests
//!
//! Serves the four catalog routes from an in-memory song list on an
//! ephemeral localhost port. Failures can be injected per test.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use uuid::Uuid;

use songdeck_common::{ImageSource, Song};

/// How the mock answers the next requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FailureMode {
    /// Normal operation
    None = 0,
    /// 500 Internal Server Error
    Status = 1,
    /// 200 with a body that is not JSON
    Malformed = 2,
}

/// Image part received by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedImage {
    pub file_name: String,
    pub content_type: String,
    pub len: usize,
}

#[derive(Clone, Default)]
struct MockState {
    songs: Arc<Mutex<Vec<Song>>>,
    failure: Arc<AtomicU8>,
    images: Arc<Mutex<Vec<ReceivedImage>>>,
}

impl MockState {
    fn failure(&self) -> Option<Response> {
        match self.failure.load(Ordering::SeqCst) {
            1 => Some((StatusCode::INTERNAL_SERVER_ERROR, "injected failure").into_response()),
            2 => Some((StatusCode::OK, "<html>not json</html>").into_response()),
            _ => None,
        }
    }
}

/// Running mock Catalog API
pub struct MockCatalogApi {
    addr: SocketAddr,
    state: MockState,
    handle: JoinHandle<()>,
}

impl MockCatalogApi {
    pub async fn start() -> Self {
        Self::start_with(Vec::new()).await
    }

    /// Start with a pre-populated catalog
    pub async fn start_with(songs: Vec<Song>) -> Self {
        let state = MockState {
            songs: Arc::new(Mutex::new(songs)),
            ..Default::default()
        };

        let router = Router::new()
            .route("/songs", get(list_songs).post(create_song))
            .route("/songs/:id", axum::routing::put(update_song).delete(delete_song))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock Catalog API");
        let addr = listener.local_addr().expect("Mock API has no address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Mock API failed");
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn set_failure(&self, mode: FailureMode) {
        self.state.failure.store(mode as u8, Ordering::SeqCst);
    }

    /// Server-side catalog contents
    pub fn songs(&self) -> Vec<Song> {
        self.state.songs.lock().unwrap().clone()
    }

    pub fn received_images(&self) -> Vec<ReceivedImage> {
        self.state.images.lock().unwrap().clone()
    }
}

impl Drop for MockCatalogApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Fields of a create/update form
#[derive(Default)]
struct SongForm {
    name: Option<String>,
    artist: Option<String>,
    image: Option<ReceivedImage>,
}

async fn read_form(mut multipart: Multipart) -> Result<SongForm, StatusCode> {
    let mut form = SongForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
                form.image = Some(ReceivedImage {
                    file_name,
                    content_type,
                    len: bytes.len(),
                });
            }
            "name" => form.name = Some(field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?),
            "artist" => {
                form.artist = Some(field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?)
            }
            _ => return Err(StatusCode::BAD_REQUEST),
        }
    }

    Ok(form)
}

fn stored_image(state: &MockState, image: &Option<ReceivedImage>) -> Option<ImageSource> {
    let image = image.as_ref()?;
    state.images.lock().unwrap().push(image.clone());
    Some(ImageSource::Remote(format!("uploads/{}", image.file_name)))
}

async fn list_songs(State(state): State<MockState>) -> Response {
    if let Some(failure) = state.failure() {
        return failure;
    }
    Json(state.songs.lock().unwrap().clone()).into_response()
}

async fn create_song(State(state): State<MockState>, multipart: Multipart) -> Response {
    if let Some(failure) = state.failure() {
        return failure;
    }
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(status) => return status.into_response(),
    };
    let (Some(name), Some(artist)) = (form.name.clone(), form.artist.clone()) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let song = Song {
        id: Uuid::new_v4().to_string(),
        name,
        artist,
        image_url: stored_image(&state, &form.image).unwrap_or_default(),
    };
    state.songs.lock().unwrap().push(song.clone());
    (StatusCode::CREATED, Json(song)).into_response()
}

async fn update_song(
    State(state): State<MockState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Response {
    if let Some(failure) = state.failure() {
        return failure;
    }
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(status) => return status.into_response(),
    };
    let image = stored_image(&state, &form.image);

    let mut songs = state.songs.lock().unwrap();
    let Some(song) = songs.iter_mut().find(|s| s.id == id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if let Some(name) = form.name {
        song.name = name;
    }
    if let Some(artist) = form.artist {
        song.artist = artist;
    }
    if let Some(image) = image {
        song.image_url = image;
    }
    Json(song.clone()).into_response()
}

async fn delete_song(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    if let Some(failure) = state.failure() {
        return failure;
    }
    let mut songs = state.songs.lock().unwrap();
    let before = songs.len();
    songs.retain(|s| s.id != id);
    if songs.len() == before {
        return StatusCode::NOT_FOUND.into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}
