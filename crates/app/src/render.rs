use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use lesson_core::model::{ImageData, LessonItem, Topic};
use services::{LessonView, SessionPhase};

/// Home screen: numbered topic list.
#[must_use]
pub fn topics() -> String {
    let mut out = String::from("Pick a topic:\n");
    for (index, topic) in Topic::ALL.iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. {:<16} ({})", index + 1, topic.label(), topic.slug());
    }
    out
}

#[must_use]
pub fn help() -> &'static str {
    "Commands:\n  \
     topics            list topics\n  \
     select <n|name>   start a topic\n  \
     next, n           next card\n  \
     previous, p       previous card\n  \
     reveal, r         show or hide the answer\n  \
     listen, l         hear the answer (after reveal)\n  \
     exit, home        back to the topic list\n  \
     quit, q           leave\n"
}

/// Lesson screen for one view snapshot.
#[must_use]
pub fn lesson(view: &LessonView, image_path: Option<&Path>) -> String {
    let Some(topic) = view.topic else {
        return topics();
    };

    let mut out = String::new();
    let _ = writeln!(out, "── {} ──", topic.label());

    match (view.phase, view.item.as_deref()) {
        (SessionPhase::Loading, _) => out.push_str("Loading…\n"),
        (_, Some(item)) => card(&mut out, view, item, image_path),
        (_, None) => {}
    }

    if let Some(error) = &view.last_error {
        let _ = writeln!(out, "Something went wrong: {error}");
        out.push_str("Type `next` to try again.\n");
    }
    out
}

fn card(out: &mut String, view: &LessonView, item: &LessonItem, image_path: Option<&Path>) {
    let _ = writeln!(out, "Card {} of {}", view.position + 1, view.history_len);
    match (item.image(), image_path) {
        (Some(_), Some(path)) => {
            let _ = writeln!(out, "[picture: {}]", path.display());
        }
        (Some(image), None) => {
            let _ = writeln!(out, "[picture: {}]", image.mime_type());
        }
        (None, _) => out.push_str("[no picture]\n"),
    }
    let _ = writeln!(out, "{}", item.question_text());
    if view.revealed {
        let _ = writeln!(out, "Answer: {}", item.concept());
    } else {
        out.push_str("(reveal to see the answer)\n");
    }
    if view.playing {
        out.push_str("♪ speaking\n");
    }
}

/// File extension for an image MIME type.
fn extension(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    }
}

/// Write a card's picture under `dir`, named after the item id.
///
/// Existing files are reused, so revisiting a card does not rewrite it.
///
/// # Errors
///
/// Fails when the payload is not valid base64 or the file cannot be written.
pub fn save_image(dir: &Path, item: &LessonItem, image: &ImageData) -> anyhow::Result<PathBuf> {
    let path = dir.join(format!("{}.{}", item.id(), extension(image.mime_type())));
    if !path.exists() {
        let bytes = STANDARD.decode(image.base64().trim())?;
        std::fs::write(&path, bytes)?;
    }
    Ok(path)
}
