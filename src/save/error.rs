use std::fmt;

/// Errors raised by the snapshot codec, the store backends and post-save
/// validation. None of them escape into the transition orchestrator; the
/// systems that call into `save` log them and carry on.
#[derive(Debug)]
pub enum SaveError {
    /// I/O error from the file-backed store.
    Io(std::io::Error),
    /// The snapshot could not be serialized.
    Encode(String),
    /// Stored bytes were not a valid snapshot.
    Decode(String),
    /// The backing store refused an operation (e.g. browser storage quota).
    Storage(String),
    /// The read-back snapshot did not match what was written.
    Validation { expected: String, found: String },
    /// A collaborator the operation needs is not present in the world.
    MissingCollaborator(&'static str),
    /// No plant template matched a persisted plant type.
    UnresolvedPrefab(String),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "I/O error: {e}"),
            SaveError::Encode(msg) => write!(f, "Encoding error: {msg}"),
            SaveError::Decode(msg) => write!(f, "Decoding error: {msg}"),
            SaveError::Storage(msg) => write!(f, "Storage error: {msg}"),
            SaveError::Validation { expected, found } => {
                write!(f, "Validation failed: wrote {expected}, read back {found}")
            }
            SaveError::MissingCollaborator(name) => {
                write!(f, "Missing collaborator: {name}")
            }
            SaveError::UnresolvedPrefab(plant_type) => {
                write!(f, "No plant template for type '{plant_type}'")
            }
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(e: serde_json::Error) -> Self {
        SaveError::Decode(e.to_string())
    }
}
