//! Asset bundles embedded in the binary at build time and seeded on `pinseed init`

use crate::error::SeedError;
use crate::node::Node;
use crate::seed::{seed_assets, Asset, AssetList};
use crate::types::ContentId;

/// An embedded asset: logical path plus contents
pub struct BundledAsset {
    pub path: &'static str,
    pub bytes: &'static [u8],
}

/// Introductory documentation
pub const INIT_DOCS: &[BundledAsset] = &[
    BundledAsset {
        path: "init-doc/about",
        bytes: include_bytes!("../../assets/init-doc/about"),
    },
    BundledAsset {
        path: "init-doc/readme",
        bytes: include_bytes!("../../assets/init-doc/readme"),
    },
    BundledAsset {
        path: "init-doc/help",
        bytes: include_bytes!("../../assets/init-doc/help"),
    },
    BundledAsset {
        path: "init-doc/contact",
        bytes: include_bytes!("../../assets/init-doc/contact"),
    },
    BundledAsset {
        path: "init-doc/security-notes",
        bytes: include_bytes!("../../assets/init-doc/security-notes"),
    },
    BundledAsset {
        path: "init-doc/quick-start",
        bytes: include_bytes!("../../assets/init-doc/quick-start"),
    },
];

/// Directory listing template and its icon names
pub const DIR_INDEX: &[BundledAsset] = &[
    BundledAsset {
        path: "dir-index-html/knownIcons.txt",
        bytes: include_bytes!("../../assets/dir-index-html/knownIcons.txt"),
    },
    BundledAsset {
        path: "dir-index-html/dir-index.html",
        bytes: include_bytes!("../../assets/dir-index-html/dir-index.html"),
    },
];

pub fn to_asset_list(bundle: &[BundledAsset]) -> AssetList {
    bundle
        .iter()
        .map(|asset| Asset::new(asset.path, asset.bytes))
        .collect()
}

/// Seed the init documentation and return its root key
pub fn seed_init_docs(node: &Node) -> Result<ContentId, SeedError> {
    seed_assets(node, &to_asset_list(INIT_DOCS))
}

/// Seed the directory index template and return its root key
pub fn seed_init_dir_index(node: &Node) -> Result<ContentId, SeedError> {
    seed_assets(node, &to_asset_list(DIR_INDEX))
}
