pub mod image;
pub mod phone;
pub mod text;

pub use image::aggregate_image_text;
pub use phone::{match_phone, normalize_phone, NormalizedPhone, PhonePolicy};
pub use text::TextMatcher;
