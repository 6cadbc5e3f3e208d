//! User-facing message catalog
//!
//! Two languages are shipped: English (default) and Spanish.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Display language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

impl Language {
    /// ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }

    /// The other supported language
    pub fn toggle(self) -> Self {
        match self {
            Language::En => Language::Es,
            Language::Es => Language::En,
        }
    }

    /// Look up a message in this language
    pub fn text(self, key: MessageKey) -> &'static str {
        key.text(self)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = Error;

    /// Accepts bare codes and locale tags (`es`, `es-MX`, `en_US.UTF-8`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s
            .split(['-', '_', '.'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match code.as_str() {
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            _ => Err(Error::InvalidInput(format!("Unsupported language: {}", s))),
        }
    }
}

/// Message identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    SongAdded,
    SongEdited,
    SongDeleted,
    FailedToAdd,
    FailedToEdit,
    FailedToDelete,
    RequiredField,
    FileSizeError,
    FileTypeError,
    EmptyLibrary,
    LanguageEn,
    LanguageEs,
}

impl MessageKey {
    /// Dotted catalog key
    pub fn key(&self) -> &'static str {
        match self {
            MessageKey::SongAdded => "messages.songAdded",
            MessageKey::SongEdited => "messages.songEdited",
            MessageKey::SongDeleted => "messages.songDeleted",
            MessageKey::FailedToAdd => "messages.failedToAdd",
            MessageKey::FailedToEdit => "messages.failedToEdit",
            MessageKey::FailedToDelete => "messages.failedToDelete",
            MessageKey::RequiredField => "messages.requiredField",
            MessageKey::FileSizeError => "messages.fileSizeError",
            MessageKey::FileTypeError => "messages.fileTypeError",
            MessageKey::EmptyLibrary => "app.emptyLibrary",
            MessageKey::LanguageEn => "language.en",
            MessageKey::LanguageEs => "language.es",
        }
    }

    pub fn text(&self, language: Language) -> &'static str {
        match language {
            Language::En => self.english(),
            Language::Es => self.spanish(),
        }
    }

    fn english(&self) -> &'static str {
        match self {
            MessageKey::SongAdded => "Song added successfully",
            MessageKey::SongEdited => "Song updated successfully",
            MessageKey::SongDeleted => "Song deleted successfully",
            MessageKey::FailedToAdd => "Failed to add song",
            MessageKey::FailedToEdit => "Failed to update song",
            MessageKey::FailedToDelete => "Failed to delete song",
            MessageKey::RequiredField => "This field is required",
            MessageKey::FileSizeError => "File size must be less than 2MB",
            MessageKey::FileTypeError => "File must be an image",
            MessageKey::EmptyLibrary => "Your library is empty. Add your first song!",
            MessageKey::LanguageEn => "English",
            MessageKey::LanguageEs => "Spanish",
        }
    }

    fn spanish(&self) -> &'static str {
        match self {
            MessageKey::SongAdded => "Canción añadida correctamente",
            MessageKey::SongEdited => "Canción actualizada correctamente",
            MessageKey::SongDeleted => "Canción eliminada correctamente",
            MessageKey::FailedToAdd => "Error al añadir la canción",
            MessageKey::FailedToEdit => "Error al actualizar la canción",
            MessageKey::FailedToDelete => "Error al eliminar la canción",
            MessageKey::RequiredField => "Este campo es obligatorio",
            MessageKey::FileSizeError => "El archivo debe pesar menos de 2MB",
            MessageKey::FileTypeError => "El archivo debe ser una imagen",
            MessageKey::EmptyLibrary => "Tu biblioteca está vacía. ¡Añade tu primera canción!",
            MessageKey::LanguageEn => "Inglés",
            MessageKey::LanguageEs => "Español",
        }
    }
}
