//! Prompt assembly for chat requests.
//!
//! A prompt is an ordered list of [`Segment`]s: the instructional preamble
//! with the topic, then any images followed by a short note, then the
//! follow-up message. Gemini is sensitive to this order, so nothing here
//! reorders, merges or truncates segments.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod request;

pub use request::to_gemini_request;

use crate::vision::ImagePayload;

/// Instructions sent ahead of the user's topic.
pub const PREAMBLE: &str = "You are a medical information assistant that provides general health information. \
Present information in a professional, doctor-like manner, focusing on educational content. \
Explain general concepts about conditions, common symptoms, and when someone should consider seeking medical care. \
Always clarify that you're providing general information, not personalized medical advice. \
Use a supportive tone and provide general wellness information that's backed by medical consensus. \
Format your response in markdown with relevant emojis for readability. ";

/// Text segment appended after the user's images.
pub const FILES_NOTE: &str = "\n(Files provided by user.)";

/// One unit of model input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Image(ImagePayload),
}

impl Segment {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Segment::Text(text) => Some(text),
            Segment::Image(_) => None,
        }
    }
}

pub type PromptSegments = Vec<Segment>;

/// Build the segment list for one chat request.
///
/// Empty strings count as absent. With no topic, images or message the
/// result is empty.
pub fn build_prompt(
    topic: Option<&str>,
    images: Vec<ImagePayload>,
    message: Option<&str>,
) -> PromptSegments {
    let mut segments = Vec::with_capacity(images.len() + 3);

    if let Some(topic) = topic.filter(|t| !t.is_empty()) {
        segments.push(Segment::Text(format!(
            "{}\nTopic for discussion: {}",
            PREAMBLE, topic
        )));
    }

    if !images.is_empty() {
        segments.extend(images.into_iter().map(Segment::Image));
        segments.push(Segment::Text(FILES_NOTE.to_string()));
    }

    if let Some(message) = message.filter(|m| !m.is_empty()) {
        segments.push(Segment::Text(format!(
            "\nUser's follow up message: {}",
            message
        )));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::validate_image;
    use base64::Engine;

    fn png() -> ImagePayload {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode("iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==")
            .unwrap();
        validate_image(bytes).unwrap()
    }

    #[test]
    fn test_topic_only() {
        let segments = build_prompt(Some("flu symptoms"), vec![], Some(""));
        assert_eq!(segments.len(), 1);
        let text = segments[0].as_text().unwrap();
        assert!(text.starts_with(PREAMBLE));
        assert!(text.contains("flu symptoms"));
        assert!(text.contains("not personalized medical advice"));
    }

    #[test]
    fn test_image_only() {
        let img = png();
        let segments = build_prompt(Some(""), vec![img.clone()], None);
        assert_eq!(
            segments,
            vec![Segment::Image(img), Segment::Text(FILES_NOTE.to_string())]
        );
    }

    #[test]
    fn test_all_empty() {
        assert!(build_prompt(Some(""), vec![], Some("")).is_empty());
        assert!(build_prompt(None, vec![], None).is_empty());
    }

    #[test]
    fn test_full_ordering() {
        let first = png();
        let second = png();
        let segments = build_prompt(
            Some("rash"),
            vec![first.clone(), second.clone()],
            Some("it itches"),
        );

        assert_eq!(segments.len(), 5);
        assert!(segments[0].as_text().unwrap().contains("Topic for discussion: rash"));
        assert_eq!(segments[1], Segment::Image(first));
        assert_eq!(segments[2], Segment::Image(second));
        assert_eq!(segments[3].as_text(), Some(FILES_NOTE));
        assert_eq!(
            segments[4].as_text(),
            Some("\nUser's follow up message: it itches")
        );
    }

    #[test]
    fn test_message_only() {
        let segments = build_prompt(None, vec![], Some("and fever?"));
        assert_eq!(segments.len(), 1);
        assert!(segments[0].as_text().unwrap().ends_with("and fever?"));
    }
}
