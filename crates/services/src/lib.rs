#![forbid(unsafe_code)]

pub mod cache;
pub mod error;
pub mod loader;
pub mod playback;
pub mod provider;
pub mod sessions;

pub use cache::{ConceptCache, DEFAULT_CAPACITY};
pub use error::{LoadError, PlaybackError, ProviderError, SessionError};
pub use loader::{ConceptPicker, LookaheadLoader, load_item, random_concept};
pub use playback::{ActiveStream, AudioSink, Completion, FinishHook, PlaybackController};
pub use provider::{ContentProvider, GeminiConfig, GeminiProvider};
pub use sessions::{LessonSession, LessonView, SessionPhase};
