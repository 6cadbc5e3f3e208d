//! Song form validation
//!
//! Rules shared by the add and edit forms:
//! - `name` and `artist` must not be empty
//! - a cover image is optional, at most [`MAX_COVER_BYTES`], and must be `image/*`

use std::fmt;

use crate::i18n::{Language, MessageKey};
use crate::models::{ImageSource, ImageUpload, Song, SongFormData};

/// Maximum accepted cover image size (2 MiB)
pub const MAX_COVER_BYTES: usize = 2 * 1024 * 1024;

/// Form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Artist,
    Cover,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Name => "name",
            Field::Artist => "artist",
            Field::Cover => "cover",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: MessageKey,
}

/// All field errors of one form submission
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", describe(.0))]
pub struct ValidationErrors(Vec<FieldError>);

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message.key()))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// First error for `field`, if any
    pub fn for_field(&self, field: Field) -> Option<MessageKey> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }

    /// Localized `(field, message)` pairs
    pub fn localized(&self, language: Language) -> Vec<(Field, &'static str)> {
        self.0
            .iter()
            .map(|e| (e.field, e.message.text(language)))
            .collect()
    }
}

/// Check a cover image against the size and type limits
pub fn validate_cover(image: &ImageUpload) -> Result<(), MessageKey> {
    if image.len() > MAX_COVER_BYTES {
        return Err(MessageKey::FileSizeError);
    }
    if !image.is_image() {
        return Err(MessageKey::FileTypeError);
    }
    Ok(())
}

fn collect(name: &str, artist: &str, cover: Option<&ImageUpload>) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    if name.is_empty() {
        errors.push(FieldError {
            field: Field::Name,
            message: MessageKey::RequiredField,
        });
    }
    if artist.is_empty() {
        errors.push(FieldError {
            field: Field::Artist,
            message: MessageKey::RequiredField,
        });
    }
    if let Some(image) = cover {
        if let Err(message) = validate_cover(image) {
            errors.push(FieldError {
                field: Field::Cover,
                message,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

/// Form-level validation
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

impl Validate for SongFormData {
    fn validate(&self) -> Result<(), ValidationErrors> {
        collect(&self.name, &self.artist, self.image.as_ref())
    }
}

impl Validate for Song {
    fn validate(&self) -> Result<(), ValidationErrors> {
        collect(&self.name, &self.artist, self.image_url.as_upload())
    }
}

/// Edit form state for an existing song
///
/// Without a new cover the song keeps its current `imageUrl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSongForm {
    pub name: String,
    pub artist: String,
    pub cover: Option<ImageUpload>,
}

impl EditSongForm {
    pub fn from_song(song: &Song) -> Self {
        Self {
            name: song.name.clone(),
            artist: song.artist.clone(),
            cover: None,
        }
    }

    /// Build the updated song, keyed by the original `id`
    pub fn apply(&self, song: &Song) -> Result<Song, ValidationErrors> {
        collect(&self.name, &self.artist, self.cover.as_ref())?;

        let image_url = match &self.cover {
            Some(cover) => ImageSource::Upload(cover.clone()),
            None => song.image_url.clone(),
        };

        Ok(Song {
            id: song.id.clone(),
            name: self.name.clone(),
            artist: self.artist.clone(),
            image_url,
        })
    }
}
