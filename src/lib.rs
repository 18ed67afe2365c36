//! pinseed: Content-Addressed Directory Seeding with Recursive Pinning
//!
//! Adds named byte assets to a content-addressed store, links them into a
//! canonical directory node, commits that directory to obtain a root key and
//! pins the root recursively so the whole tree survives garbage collection.

pub mod cli;
pub mod config;
pub mod dag;
pub mod error;
pub mod logging;
pub mod node;
pub mod pin;
pub mod seed;
pub mod store;
pub mod types;

pub use error::{ApiError, ErrorKind, SeedError, SeedPhase};
pub use node::Node;
pub use pin::{PinManager, PinMode};
pub use seed::{seed_assets, Asset, AssetList, AssetSeeder};
pub use store::ContentStore;
pub use types::ContentId;
