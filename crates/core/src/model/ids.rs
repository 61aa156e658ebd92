use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a generated lesson item
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LessonItemId(Uuid);

impl LessonItemId {
    /// Creates a fresh random `LessonItemId`
    #[must_use]
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Debug for LessonItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LessonItemId({})", self.0)
    }
}

impl fmt::Display for LessonItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_ids_are_distinct_and_display_as_uuid() {
        let a = LessonItemId::new_random();
        let b = LessonItemId::new_random();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a.to_string()).is_ok());
        assert_eq!(format!("{a:?}"), format!("LessonItemId({a})"));
    }
}
