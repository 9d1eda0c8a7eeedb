use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Canonical artwork identifier as issued by the collection API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtworkId(u64);

impl ArtworkId {
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if value <= 0 {
            return Err(ValidationError::InvalidArtworkId { value });
        }
        Ok(Self(value as u64))
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl Display for ArtworkId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to an image served through the collection's IIIF endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    image_id: String,
    iiif_base: String,
}

const DEFAULT_IIIF_BASE: &str = "https://www.artic.edu/iiif/2";

impl ImageRef {
    pub fn new(image_id: impl Into<String>) -> Result<Self, ValidationError> {
        Self::with_base(image_id, DEFAULT_IIIF_BASE)
    }

    pub fn with_base(
        image_id: impl Into<String>,
        iiif_base: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let image_id = image_id.into();
        if image_id.trim().is_empty() {
            return Err(ValidationError::EmptyImageId);
        }
        Ok(Self {
            image_id,
            iiif_base: iiif_base.into(),
        })
    }

    pub fn image_id(&self) -> &str {
        &self.image_id
    }

    /// Grid-sized rendition, 400px wide.
    pub fn thumbnail_url(&self) -> String {
        format!(
            "{}/{}/full/400,/0/default.jpg",
            self.iiif_base, self.image_id
        )
    }

    /// Detail-view rendition, 843px wide (the largest size the API
    /// guarantees for every image).
    pub fn full_url(&self) -> String {
        format!(
            "{}/{}/full/843,/0/default.jpg",
            self.iiif_base, self.image_id
        )
    }
}

/// Summary record rendered in a result grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtworkCard {
    pub id: ArtworkId,
    pub title: String,
    pub artist: String,
    pub date_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<ImageRef>,
}

/// Full record rendered in a detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtworkDetail {
    pub id: ArtworkId,
    pub title: String,
    pub artist: String,
    pub date_line: String,
    pub medium: String,
    pub credit_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub terms: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

impl ArtworkDetail {
    /// The grid summary for this record.
    pub fn to_card(&self) -> ArtworkCard {
        ArtworkCard {
            id: self.id,
            title: self.title.clone(),
            artist: self.artist.clone(),
            date_line: self.date_line.clone(),
            thumbnail: self.image.clone(),
        }
    }
}

/// Fallback applied when upstream omits or blanks a display field.
pub fn display_or(value: Option<String>, fallback: &str) -> String {
    match value {
        Some(text) if !text.trim().is_empty() => text,
        _ => fallback.to_owned(),
    }
}
