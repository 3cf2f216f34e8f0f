//! Request and response payloads for the item archive.
//!
//! These are the shapes exchanged by clients and the server, independent of
//! how they travel. Field names are camelCase on the wire. Conversions to and
//! from the domain types in `archived-types` and `archived-store` live here
//! so the transport never handles raw wire values.

pub mod endpoint;
pub mod error;
pub mod message;

pub use endpoint::{endpoints, HealthResponse, PROTOCOL_VERSION};
pub use error::{ErrorBody, ErrorCode};
pub use message::{
    ChildrenMsg, CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, EntryMetadataMsg,
    MoveRequest, MoveResponse, ReadRequest, ReadResponse, SearchEntryMsg, SearchRequest,
    SearchResponse,
};
