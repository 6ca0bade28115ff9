pub mod artifacts;
pub mod outcome;
pub mod record;
pub mod status;

pub use artifacts::PageArtifacts;
pub use outcome::{JobTitleSource, NameSource, VerificationOutcome};
pub use record::ContactRecord;
pub use status::RecordStatus;
