use super::StudentId;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One assigned lesson in the generated schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub student_id: StudentId,
    pub student_name: String,
    pub day: NaiveDate,
    pub start_time: NaiveDateTime,
    /// `start_time + lesson_length + buffer`
    pub end_time: NaiveDateTime,
}

/// The full engine output for one run.
///
/// For a fixed input this value is byte-identical across runs: lessons are
/// sorted by `(day, start, student name)` and unscheduled ids keep input
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSchedule {
    pub lessons: Vec<Lesson>,
    pub unscheduled_student_ids: Vec<StudentId>,
    pub scheduled_count: usize,
    pub objective_cost: i64,
}

impl GeneratedSchedule {
    /// Empty outcome: nothing scheduled, every student reported back
    pub fn empty(unscheduled_student_ids: Vec<StudentId>) -> Self {
        Self {
            lessons: Vec::new(),
            unscheduled_student_ids,
            scheduled_count: 0,
            objective_cost: 0,
        }
    }

    /// Distinct days that carry at least one lesson
    pub fn used_days(&self) -> Vec<NaiveDate> {
        let mut days: Vec<NaiveDate> = self.lessons.iter().map(|l| l.day).collect();
        days.dedup();
        days
    }
}
