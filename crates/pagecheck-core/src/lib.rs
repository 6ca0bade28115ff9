pub mod domain;
pub mod error;
pub mod matching;
pub mod translate;
pub mod verify;

pub use domain::*;
pub use error::CoreError;
pub use matching::{
    aggregate_image_text, match_phone, normalize_phone, NormalizedPhone, PhonePolicy, TextMatcher,
};
pub use translate::{resolve_job_title, NoTranslation, Translator};
pub use verify::{verify, Verifier};
