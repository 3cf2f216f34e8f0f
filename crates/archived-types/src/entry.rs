use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::name::{self, EntryName};

/// Whether an entry is a leaf or may hold children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Item,
    Container,
}

impl EntryKind {
    /// The literal last segment of an encoded name of this kind.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Container => "container",
        }
    }

    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "item" => Some(Self::Item),
            "container" => Some(Self::Container),
            _ => None,
        }
    }

    pub fn is_container(self) -> bool {
        self == Self::Container
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Supported image formats.
///
/// The discriminants are the wire values clients send.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg = 0,
    Png = 1,
    Gif = 2,
    Svg = 3,
}

impl ImageFormat {
    /// All formats in the order they are probed when reading an entry.
    pub const ALL: [ImageFormat; 4] = [Self::Jpeg, Self::Png, Self::Gif, Self::Svg];

    /// File extension used for `image.<ext>`.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Svg => "svg",
        }
    }

    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Svg => "image/svg+xml",
        }
    }

    /// Map a file extension (case-insensitive) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    pub const fn wire_value(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for ImageFormat {
    type Error = TypeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|f| f.wire_value() == value)
            .ok_or_else(|| TypeError::InvalidImageFormat(format!("unknown format value {value}")))
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Image bytes together with their format. The two are never set apart.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub format: ImageFormat,
    pub data: Vec<u8>,
}

impl Image {
    pub fn new(format: ImageFormat, data: Vec<u8>) -> Self {
        Self { format, data }
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("format", &self.format)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Everything the archive knows about one entry.
///
/// `id`, `tags` and `kind` come from the directory name; `description` and
/// `image` come from files inside the directory. A missing description is
/// different from an empty one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMetadata {
    pub id: String,
    pub tags: Vec<String>,
    pub kind: EntryKind,
    pub description: Option<String>,
    pub image: Option<Image>,
}

impl EntryMetadata {
    pub fn new(id: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            id: id.into(),
            tags: Vec::new(),
            kind,
            description: None,
            image: None,
        }
    }

    pub fn item(id: impl Into<String>) -> Self {
        Self::new(id, EntryKind::Item)
    }

    pub fn container(id: impl Into<String>) -> Self {
        Self::new(id, EntryKind::Container)
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image(mut self, image: Image) -> Self {
        self.image = Some(image);
        self
    }

    /// Build metadata with no auxiliary fields from a decoded name.
    pub fn from_name(name: EntryName) -> Self {
        Self {
            id: name.id,
            tags: name.tags,
            kind: name.kind,
            description: None,
            image: None,
        }
    }

    /// The directory name this entry is stored under.
    pub fn encoded_name(&self) -> String {
        name::encode(&self.id, &self.tags, self.kind)
    }

    /// Check the id and every tag against the naming rules for new entries.
    pub fn validate(&self) -> Result<(), TypeError> {
        name::validate_id(&self.id)?;
        for tag in &self.tags {
            name::validate_tag(tag)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_suffixes() {
        assert_eq!(EntryKind::Item.suffix(), "item");
        assert_eq!(EntryKind::Container.to_string(), "container");
        assert_eq!(EntryKind::from_suffix("container"), Some(EntryKind::Container));
        assert_eq!(EntryKind::from_suffix("Container"), None);
        assert!(EntryKind::Container.is_container());
        assert!(!EntryKind::Item.is_container());
    }

    #[test]
    fn image_format_probe_order() {
        let exts: Vec<&str> = ImageFormat::ALL.iter().map(|f| f.extension()).collect();
        assert_eq!(exts, vec!["jpg", "png", "gif", "svg"]);
    }

    #[test]
    fn image_format_from_extension() {
        assert_eq!(ImageFormat::from_extension("JPEG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("jpg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("svg"), Some(ImageFormat::Svg));
        assert_eq!(ImageFormat::from_extension("bmp"), None);
    }

    #[test]
    fn image_format_wire_values() {
        assert_eq!(ImageFormat::try_from(0).unwrap(), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::try_from(3).unwrap(), ImageFormat::Svg);
        assert!(matches!(
            ImageFormat::try_from(4),
            Err(TypeError::InvalidImageFormat(_))
        ));
        assert!(ImageFormat::try_from(-1).is_err());
    }

    #[test]
    fn image_debug_and_mime() {
        let img = Image::new(ImageFormat::Png, vec![1, 2, 3]);
        assert_eq!(img.format.mime_type(), "image/png");
        assert_eq!(format!("{img:?}"), "Image { format: Png, len: 3 }");
    }

    #[test]
    fn metadata_builders() {
        let meta = EntryMetadata::item("apple")
            .with_tags(["fruit", "red"])
            .with_description("crisp");
        assert_eq!(meta.encoded_name(), "apple.fruit.red.item");
        assert_eq!(meta.description.as_deref(), Some("crisp"));
        assert!(meta.image.is_none());
        assert!(meta.validate().is_ok());
    }

    #[test]
    fn metadata_validate_rejects_bad_tag() {
        let meta = EntryMetadata::container("shelf").with_tags(["top.left"]);
        assert!(matches!(meta.validate(), Err(TypeError::InvalidName { .. })));
    }

    #[test]
    fn metadata_serde_roundtrip() {
        let meta = EntryMetadata::container("box")
            .with_image(Image::new(ImageFormat::Gif, vec![0x47, 0x49, 0x46]));
        let json = serde_json::to_string(&meta).unwrap();
        let back: EntryMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, meta);
    }
}
