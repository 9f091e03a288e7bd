//! Error types shared by the asset layer.

use thiserror::Error;

/// A sprite or sound that could not be loaded.
///
/// Never fatal: `AssetStore` logs it and hands out an absent handle.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("could not read asset {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("asset {0} contains no glyph rows")]
    Empty(String),

    #[error("asset {name} names unknown colour {colour:?}")]
    UnknownColour { name: String, colour: String },
}
