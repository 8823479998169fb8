use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Round Robin quantum must be at least 1")]
    ZeroQuantum,

    #[error("Round Robin requires a quantum")]
    MissingQuantum,

    #[error("Page replacement needs at least one frame")]
    ZeroFrameCapacity,

    #[error("Disk size must be at least 1 track")]
    ZeroDiskSize,

    #[error("Disk policy {0} requires a disk size")]
    MissingDiskSize(String),

    #[error("Track {track} is outside the disk (valid tracks 0..{disk_size})")]
    TrackOutOfRange { track: u64, disk_size: u64 },

    #[error("Dimension mismatch for {what}: expected {expected} entries, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error(
        "Negative need for process {process}, resource {resource}: max {max} < allocation {allocation}"
    )]
    NegativeNeed {
        process: usize,
        resource: usize,
        max: u32,
        allocation: u32,
    },

    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: u32 },

    #[error("Process {process} does not exist (state has {count} processes)")]
    ProcessOutOfRange { process: usize, count: usize },

    #[error(
        "Process {process} requested {requested} of resource {resource}, exceeding its need of {need}"
    )]
    RequestExceedsNeed {
        process: usize,
        resource: usize,
        requested: u32,
        need: u32,
    },

    #[error("Arithmetic overflow while computing {0}")]
    Overflow(&'static str),

    #[error("Unknown policy: {0}")]
    UnknownPolicy(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Scenario validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_track_out_of_range() {
        let e = EngineError::TrackOutOfRange {
            track: 250,
            disk_size: 200,
        };
        assert_eq!(
            e.to_string(),
            "Track 250 is outside the disk (valid tracks 0..200)"
        );
    }

    #[test]
    fn test_error_display_negative_need() {
        let e = EngineError::NegativeNeed {
            process: 2,
            resource: 1,
            max: 3,
            allocation: 5,
        };
        let s = e.to_string();
        assert!(s.contains("process 2"));
        assert!(s.contains("max 3 < allocation 5"));
    }

    #[test]
    fn test_error_display_overflow() {
        let e = EngineError::Overflow("seek total");
        assert_eq!(e.to_string(), "Arithmetic overflow while computing seek total");
    }

    #[test]
    fn test_error_from_json() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        let e: EngineError = err.into();
        assert!(matches!(e, EngineError::Serialization(_)));
    }

    #[test]
    fn test_error_is_std_error() {
        let e: Box<dyn std::error::Error> = Box::new(EngineError::ZeroQuantum);
        assert!(!e.to_string().is_empty());
    }
}
