pub const IMAGE_TEXT_SEPARATOR: char = '\n';

/// Joins per-image OCR text in page order. Blank results are kept so the
/// separator count still reflects the number of images.
pub fn aggregate_image_text<S>(image_texts: &[S]) -> String
where
    S: AsRef<str>,
{
    let mut out = String::new();
    for (index, text) in image_texts.iter().enumerate() {
        if index > 0 {
            out.push(IMAGE_TEXT_SEPARATOR);
        }
        out.push_str(text.as_ref());
    }
    out
}
