use super::StudentId;
use serde::{Deserialize, Serialize};

/// Represents a student requesting a lesson
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    /// Lesson length in minutes; must be a positive multiple of the slot length
    #[serde(default = "default_lesson_length")]
    pub lesson_length: u32,
}

fn default_lesson_length() -> u32 {
    30
}

impl Student {
    /// Number of contiguous teacher slots this student's lesson occupies
    pub fn required_slots(&self, slot_minutes: i64) -> u32 {
        debug_assert!(slot_minutes > 0);
        self.lesson_length.div_ceil(slot_minutes as u32)
    }
}
