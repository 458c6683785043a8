use thiserror::Error;

use crate::index::BoxDim_u;

#[derive(Error, Debug)]
pub enum Error {

    #[error("volume has dimensions {found:?}, projector was configured for {expected:?}")]
    VolumeDimensions { expected: BoxDim_u, found: BoxDim_u },

    #[error("geometry describes {geometry} views, detector stack holds {detector}")]
    ViewCount { geometry: usize, detector: usize },

    #[error("view {view}: source position is at infinity (projection matrix has no finite null vector)")]
    CameraAtInfinity { view: usize },

    #[error("expected {expected} values, found {found}")]
    DataLength { expected: usize, found: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
