use thiserror::Error;

/// Cue-ball respawn could not find an open slot on the search line
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacementError {
    #[error("no free slot for ball {id} after {tried} slots")]
    NoFreeSlot { id: u32, tried: u32 },
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid scale ratio: {0}")]
    InvalidScale(f32),

    #[error("Invalid setting {field}: {value}")]
    Invalid { field: &'static str, value: f32 },
}
