//! Shared helpers for songdeck integration tests

#![allow(dead_code)]

pub mod mock_api;

use songdeck::{CatalogClient, HttpCatalogApi};
use songdeck_common::Language;

pub use mock_api::{FailureMode, MockCatalogApi, ReceivedImage};

/// HTTP catalog client pointed at `mock`
pub fn client_for(mock: &MockCatalogApi) -> CatalogClient<HttpCatalogApi> {
    let api = HttpCatalogApi::new(&mock.base_url()).expect("Failed to build HTTP client");
    CatalogClient::new(api, Language::En)
}

/// Smallest payload recognized as PNG
pub fn png_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.resize(len.max(bytes.len()), 0);
    bytes
}
