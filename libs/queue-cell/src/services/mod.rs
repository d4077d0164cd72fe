pub mod lifecycle;
pub mod sequencer;

pub use lifecycle::{default_transitions, QueueWorkflow};
pub use sequencer::{sort_for_display, QueueSequencer};
