use super::{Availability, ScheduleId, Student, StudentId, TeacherId};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A schedule as loaded from the persistence collaborator: the teacher's
/// offering plus every student and availability row attached to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub id: ScheduleId,
    pub slug: String,
    pub title: String,
    pub teacher_id: TeacherId,
    /// Allowed calendar days; empty means "infer from teacher availability"
    #[serde(default)]
    pub dates: Vec<NaiveDate>,
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub availabilities: Vec<Availability>,
    #[serde(default)]
    pub is_finalized: bool,
    #[serde(default)]
    pub finalized_at: Option<NaiveDateTime>,
}

impl ScheduleRecord {
    /// Look up a student by id
    pub fn student(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    /// Student ids in input order
    pub fn student_ids(&self) -> Vec<StudentId> {
        self.students.iter().map(|s| s.id).collect()
    }
}
