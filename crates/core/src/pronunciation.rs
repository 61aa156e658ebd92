use crate::model::Topic;

/// Text sent to the speech generator when the child asks to hear a concept.
///
/// Alphabet concepts shaped like "S for Sun" get the letter spelled out first:
/// "S... S for Sun".
#[must_use]
pub fn speech_text(topic: Option<Topic>, concept: &str) -> String {
    if topic == Some(Topic::Alphabet) && concept.contains(" for ") {
        let letter = concept.split(' ').next().unwrap_or_default();
        return format!("{letter}... {concept}");
    }
    concept.to_string()
}
