//! Error types for puppet setup and host interaction.

use serde::{Deserialize, Serialize};

/// Errors reported by the session. Runtime conditions such as a missing joint or a
/// click while a trick is playing are not errors; they are skipped or ignored.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PuppetError {
    /// Configuration failed validation
    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// The model has no clip with the configured idle name
    #[error("Idle clip '{name}' not found in model")]
    MissingIdleClip { name: String },

    /// The model has no clips to play on click
    #[error("Model has no trick clips besides idle clip '{idle}'")]
    NoTrickClips { idle: String },

    /// The playback host refused to create an action for a clip
    #[error("Playback host rejected clip '{name}'")]
    ClipRejected { name: String },

    /// An operation needed a bound model
    #[error("No model is bound to this session")]
    NotBound,

    /// The host failed to load the model asset
    #[error("Asset load failed: {reason}")]
    AssetLoad { reason: String },
}

pub type Result<T> = std::result::Result<T, PuppetError>;
