use serde::{Deserialize, Serialize};

use archived_store::{Children, ReadResult, SearchHit};
use archived_types::{EntryKind, EntryMetadata, Image, ImageFormat, TypeError};

/// Entry metadata as it appears on the wire.
///
/// Unlike [`EntryMetadata`] there is no kind; it is implied by the encoded
/// name or, for creation, by [`CreateRequest::create_container`]. The image
/// and its format travel as two fields and must be set together.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryMetadataMsg {
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Vec<u8>>,
    /// JPEG=0, PNG=1, GIF=2, SVG=3.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_format: Option<i32>,
}

impl EntryMetadataMsg {
    /// Convert to domain metadata of the given kind.
    ///
    /// Image bytes without a format, or a format value outside the supported
    /// set, fail with [`TypeError::InvalidImageFormat`]. A format without
    /// image bytes, or empty image bytes, mean "no image".
    pub fn into_metadata(self, kind: EntryKind) -> Result<EntryMetadata, TypeError> {
        let image = match (self.image, self.image_format) {
            (Some(data), Some(format)) if !data.is_empty() => {
                Some(Image::new(ImageFormat::try_from(format)?, data))
            }
            (Some(data), None) if !data.is_empty() => {
                return Err(TypeError::InvalidImageFormat(
                    "image data supplied without a format".into(),
                ));
            }
            _ => None,
        };

        Ok(EntryMetadata {
            id: self.id,
            tags: self.tags,
            kind,
            description: self.description,
            image,
        })
    }
}

impl From<EntryMetadata> for EntryMetadataMsg {
    fn from(meta: EntryMetadata) -> Self {
        let (image, image_format) = match meta.image {
            Some(img) => (Some(img.data), Some(img.format.wire_value())),
            None => (None, None),
        };
        Self {
            id: meta.id,
            tags: meta.tags,
            description: meta.description,
            image,
            image_format,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildrenMsg {
    #[serde(default)]
    pub item_names: Vec<String>,
    #[serde(default)]
    pub container_names: Vec<String>,
}

impl From<Children> for ChildrenMsg {
    fn from(children: Children) -> Self {
        Self {
            item_names: children.items,
            container_names: children.containers,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRequest {
    #[serde(default)]
    pub path: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadResponse {
    pub metadata: EntryMetadataMsg,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<ChildrenMsg>,
}

impl From<ReadResult> for ReadResponse {
    fn from(result: ReadResult) -> Self {
        Self {
            metadata: result.metadata.into(),
            children: result.children.map(Into::into),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub metadata: EntryMetadataMsg,
    /// The parent container; the new entry's own name is derived from
    /// `metadata`.
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default)]
    pub create_container: bool,
}

impl CreateRequest {
    pub fn kind(&self) -> EntryKind {
        if self.create_container {
            EntryKind::Container
        } else {
            EntryKind::Item
        }
    }

    /// Split into the parent path and the domain metadata to write.
    pub fn into_parts(self) -> Result<(Vec<String>, EntryMetadata), TypeError> {
        let kind = self.kind();
        Ok((self.path, self.metadata.into_metadata(kind)?))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateResponse {}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub src: Vec<String>,
    pub dest: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub path: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntryMsg {
    pub path: Vec<String>,
    pub meta: EntryMetadataMsg,
}

impl From<SearchHit> for SearchEntryMsg {
    fn from(hit: SearchHit) -> Self {
        Self {
            path: hit.path,
            meta: hit.metadata.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub entries: Vec<SearchEntryMsg>,
}

impl FromIterator<SearchHit> for SearchResponse {
    fn from_iter<I: IntoIterator<Item = SearchHit>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}
