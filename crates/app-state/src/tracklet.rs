//! Tracklet and image types, plus the tracklet id policy.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A single image reference inside a tracklet.
///
/// The name is the only identity the store knows about. Display metadata
/// (file blob, shape, color) is owned by the rendering layer, keyed by name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackletImage {
    pub name: String,
}

impl TrackletImage {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A named, ordered group of images.
///
/// The image list sits behind an `Arc` so that cloning a tracklet (and
/// therefore snapshotting a whole grouping) shares storage. Mutation goes
/// through [`Tracklet::images_mut`], which copies on write when a snapshot
/// still holds the old list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracklet {
    /// Unique tracklet identifier.
    pub id: String,
    /// Optional cosmetic display name. Never used for identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    images: Arc<Vec<TrackletImage>>,
}

impl Tracklet {
    /// Create an empty tracklet with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            alias: None,
            images: Arc::new(Vec::new()),
        }
    }

    /// Create a tracklet holding the given image names, in order.
    pub fn with_images<I, S>(id: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            alias: None,
            images: Arc::new(names.into_iter().map(TrackletImage::new).collect()),
        }
    }

    /// Builder-style alias setter.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// The images of this tracklet in display order.
    pub fn images(&self) -> &[TrackletImage] {
        &self.images
    }

    /// Image names in display order.
    pub fn image_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.images.iter().map(|img| img.name.as_str())
    }

    /// Mutable access to the image list, copying it first if it is shared.
    pub(crate) fn images_mut(&mut self) -> &mut Vec<TrackletImage> {
        Arc::make_mut(&mut self.images)
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn contains_image(&self, name: &str) -> bool {
        self.images.iter().any(|img| img.name == name)
    }

    /// Position of an image within this tracklet.
    pub fn image_position(&self, name: &str) -> Option<usize> {
        self.images.iter().position(|img| img.name == name)
    }

    /// Name shown to the user: the alias when set, otherwise the id.
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.id)
    }

    /// Whether two tracklets share the same image storage.
    pub fn shares_images_with(&self, other: &Tracklet) -> bool {
        Arc::ptr_eq(&self.images, &other.images)
    }
}

/// Next free numeric tracklet id.
///
/// Collects every id made only of ASCII digits and returns one greater than
/// the largest, or `"0"` when there is none. Other ids (signed, partly
/// numeric, empty) are ignored. The arithmetic works on the decimal digits,
/// so ids of any length get a successor that no existing id can equal.
pub fn next_tracklet_id(tracklets: &[Tracklet]) -> String {
    tracklets
        .iter()
        .filter_map(|t| canonical_digits(&t.id))
        .max_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
        .map(decimal_successor)
        .unwrap_or_else(|| "0".to_string())
}

/// The id's digits without leading zeros ("" for zero), if it is all digits.
fn canonical_digits(id: &str) -> Option<&str> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(id.trim_start_matches('0'))
}

fn decimal_successor(digits: &str) -> String {
    let mut out: Vec<char> = digits.chars().collect();
    let mut carry = true;
    for digit in out.iter_mut().rev() {
        if *digit == '9' {
            *digit = '0';
        } else {
            *digit = char::from(*digit as u8 + 1);
            carry = false;
            break;
        }
    }
    if carry {
        out.insert(0, '1');
    }
    out.into_iter().collect()
}

/// Whether no tracklet in the list uses `id`.
pub fn is_tracklet_id_unique(id: &str, tracklets: &[Tracklet]) -> bool {
    !tracklets.iter().any(|t| t.id == id)
}
