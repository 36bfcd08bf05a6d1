/// Load-time failures.
///
/// Anything that can go wrong before a level is playable is reported here
/// instead of silently defaulting (e.g. a player parked at the origin).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level file {} could not be read: {source}", path.display())]
    MissingLevelFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("level \"{name}\" has no tiles")]
    EmptyOrMalformedGrid { name: String },

    #[error("level \"{name}\" has no player start ('P')")]
    NoPlayerStart { name: String },

    #[error("level \"{name}\" has no goal ('G')")]
    NoGoal { name: String },

    #[error("level index {index} out of range (level set has {total})")]
    LevelOutOfRange { index: usize, total: usize },
}
