//! # Search Service Shared
//!
//! Types shared by every crate of the search service: the three indexed
//! entity domains, the documents they are projected into, and the request and
//! response shapes of the search operations.

mod documents;
mod entities;
mod kind;
mod search;

pub use documents::{AddressDocument, HardwareDocument, NodeDocument, SearchDocument};
pub use entities::{Address, EmbeddedAddress, Hardware, Node};
pub use kind::IndexKind;
pub use search::{AddressQuery, HardwareFilter, NodeFilter, SearchHits, SearchQuery};
