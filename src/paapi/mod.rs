//! Product Advertising API plumbing: signing, transport, and operations.

pub mod client;
pub mod models;
pub mod operation;
pub mod params;
pub mod regions;
pub mod signer;
pub mod transport;
pub mod xml;

pub use client::{PaapiClient, ProductAdvertising, SearchQuery};
pub use models::{BrowseNode, CartItem, CartModification, CartSnapshot, Item, Price};
pub use operation::Operation;
pub use params::{ItemIdType, ItemIds, Quantities};
pub use regions::Region;
