use serde::{Deserialize, Serialize};

use crate::model::LessonItemId;

//
// ─── GENERATED PAYLOADS ────────────────────────────────────────────────────────
//

/// Structured text returned by the lesson generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedLesson {
    /// Simplest displayable form of the concept, also the expected answer.
    pub concept: String,
    pub question: String,
    pub image_prompt: String,
}

/// Encoded image as returned by the image generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    mime_type: String,
    base64: String,
}

impl ImageData {
    #[must_use]
    pub fn new(mime_type: impl Into<String>, base64: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            base64: base64.into(),
        }
    }

    /// PNG payload, the generator's default output.
    #[must_use]
    pub fn png(base64: impl Into<String>) -> Self {
        Self::new("image/png", base64)
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    #[must_use]
    pub fn base64(&self) -> &str {
        &self.base64
    }
}

/// Base64-encoded speech clip (16-bit little-endian mono PCM at 24 kHz).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioData(String);

impl AudioData {
    #[must_use]
    pub fn new(base64: impl Into<String>) -> Self {
        Self(base64.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//
// ─── LESSON ITEM ───────────────────────────────────────────────────────────────
//

/// One fully generated flashcard.
///
/// Items are immutable once built. The concept cache owns them first and the
/// session history shares the same allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonItem {
    id: LessonItemId,
    concept: String,
    question_text: String,
    image: Option<ImageData>,
    question_audio: Option<AudioData>,
}

impl LessonItem {
    #[must_use]
    pub fn new(
        id: LessonItemId,
        concept: impl Into<String>,
        question_text: impl Into<String>,
        image: Option<ImageData>,
        question_audio: Option<AudioData>,
    ) -> Self {
        Self {
            id,
            concept: concept.into(),
            question_text: question_text.into(),
            image,
            question_audio,
        }
    }

    /// Assemble an item from a generator round-trip with a fresh id.
    #[must_use]
    pub fn from_generated(
        lesson: GeneratedLesson,
        image: Option<ImageData>,
        question_audio: Option<AudioData>,
    ) -> Self {
        Self::new(
            LessonItemId::new_random(),
            lesson.concept,
            lesson.question,
            image,
            question_audio,
        )
    }

    #[must_use]
    pub fn id(&self) -> LessonItemId {
        self.id
    }

    #[must_use]
    pub fn concept(&self) -> &str {
        &self.concept
    }

    #[must_use]
    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    #[must_use]
    pub fn image(&self) -> Option<&ImageData> {
        self.image.as_ref()
    }

    #[must_use]
    pub fn question_audio(&self) -> Option<&AudioData> {
        self.question_audio.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_lesson_reads_camel_case_json() {
        let raw = r#"{"concept":"Horse","question":"What is this?","imagePrompt":"A horse"}"#;
        let lesson: GeneratedLesson = serde_json::from_str(raw).unwrap();
        assert_eq!(lesson.concept, "Horse");
        assert_eq!(lesson.image_prompt, "A horse");
    }

    #[test]
    fn from_generated_assigns_distinct_ids() {
        let lesson = GeneratedLesson {
            concept: "5".into(),
            question: "How many?".into(),
            image_prompt: "five apples".into(),
        };
        let a = LessonItem::from_generated(lesson.clone(), None, None);
        let b = LessonItem::from_generated(lesson, None, None);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.concept(), "5");
        assert!(a.image().is_none());
    }
}
