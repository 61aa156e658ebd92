mod ids;
mod lesson;
mod topic;

pub use ids::LessonItemId;
pub use lesson::{AudioData, GeneratedLesson, ImageData, LessonItem};
pub use topic::{Topic, TopicParseError};
