//! New-listing editor state.
//!
//! The editor starts waiting for a photo. Choosing one shows a preview and
//! unlocks the form. Entered data survives failed submissions; it is only
//! discarded when the editor closes.

use axum::body::Bytes;
use base64::Engine;
use chrono::{DateTime, Utc};

use crate::models::{Condition, NewListing};

/// Fields typed into the editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingForm {
    pub name: String,
    pub year: String,
    pub price: String,
    pub condition: Condition,
}

impl ListingForm {
    /// The row to insert, pointing at `image_url`.
    pub fn to_new_listing(&self, image_url: String) -> NewListing {
        NewListing {
            name: self.name.clone(),
            price: self.price.clone(),
            year: self.year.clone(),
            condition: self.condition.clone(),
            image_url,
        }
    }
}

/// A local image picked for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl PhotoUpload {
    /// Inline preview of the picked image.
    pub fn preview_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    /// Bucket key: upload time in milliseconds plus the sanitized file name.
    pub fn storage_key(&self, now: DateTime<Utc>) -> String {
        format!(
            "{}-{}",
            now.timestamp_millis(),
            sanitize_file_name(&self.file_name)
        )
    }
}

/// Replace whitespace and path separators with underscores.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_whitespace() || c == '/' || c == '\\' {
                '_'
            } else {
                c
            }
        })
        .collect();

    if cleaned.is_empty() {
        "photo".to_string()
    } else {
        cleaned
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorStage {
    PhotoPending,
    FormActive,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingEditor {
    photo: Option<PhotoUpload>,
    pub form: ListingForm,
}

impl ListingEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> EditorStage {
        if self.photo.is_some() {
            EditorStage::FormActive
        } else {
            EditorStage::PhotoPending
        }
    }

    /// Take a picked file and move to the form. An empty pick is ignored.
    pub fn select_photo(&mut self, photo: PhotoUpload) {
        if photo.bytes.is_empty() {
            return;
        }
        self.photo = Some(photo);
    }

    pub fn photo(&self) -> Option<&PhotoUpload> {
        self.photo.as_ref()
    }
}
