pub mod error;
pub mod prompts;
pub mod remixer;
pub mod transcript;

pub use error::{RemixError, Result};
pub use remixer::{RemixKind, Remixer};
pub use transcript::{ApifyTranscripts, TranscriptSource};
