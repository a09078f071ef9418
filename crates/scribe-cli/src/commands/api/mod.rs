//! Subcommands that call the scribe API.

pub mod profile;
pub mod request;
pub mod transcribe;
pub mod transcriptions;

pub use profile::ProfileArgs;
pub use request::RequestArgs;
pub use transcribe::TranscribeArgs;
pub use transcriptions::TranscriptionsArgs;
