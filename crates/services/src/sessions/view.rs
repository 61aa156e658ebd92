use std::sync::Arc;

use lesson_core::model::{ImageData, LessonItem, Topic};

/// Coarse state of a lesson session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// No topic selected.
    #[default]
    Idle,
    /// Waiting on the next generated item; nothing is shown.
    Loading,
    /// An item (or a recoverable error) is on screen.
    Ready,
}

/// Snapshot handed to the presentation layer after every transition.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LessonView {
    pub topic: Option<Topic>,
    pub phase: SessionPhase,
    pub item: Option<Arc<LessonItem>>,
    pub position: usize,
    pub history_len: usize,
    pub has_previous: bool,
    pub revealed: bool,
    pub playing: bool,
    pub last_error: Option<String>,
}

impl LessonView {
    #[must_use]
    pub fn loading(&self) -> bool {
        self.phase == SessionPhase::Loading
    }

    #[must_use]
    pub fn concept(&self) -> Option<&str> {
        self.item.as_deref().map(LessonItem::concept)
    }

    #[must_use]
    pub fn question_text(&self) -> Option<&str> {
        self.item.as_deref().map(LessonItem::question_text)
    }

    #[must_use]
    pub fn image(&self) -> Option<&ImageData> {
        self.item.as_deref().and_then(LessonItem::image)
    }
}
