mod gate;
mod job;
mod state;

pub use gate::{DEFAULT_GATE, decide};
pub use job::{
    InputRef, Job, ModelResult, NOTE_LIMIT, ProofArtifact, PublishMode, StatusUpdate,
    truncate_chars,
};
pub use state::{JobStatus, StateMachine, TransitionError};
