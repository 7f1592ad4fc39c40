use crate::error::Result;
use crate::types::{ScheduleRecord, StudentId};
use std::collections::HashSet;

/// Validation result with collected errors
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }
}

/// Validate a loaded schedule record before solving
pub fn validate_record(record: &ScheduleRecord) -> Result<ValidationResult> {
    let mut result = ValidationResult::default();

    let mut seen: HashSet<StudentId> = HashSet::new();
    for student in &record.students {
        if !seen.insert(student.id) {
            result.add_error(format!("Duplicate student ID: '{}'", student.id));
        }
        if student.name.trim().is_empty() {
            result.add_warning(format!("Student '{}' has an empty name", student.id));
        }
    }

    for row in &record.availabilities {
        match (row.student_id, row.teacher_id) {
            (Some(_), Some(_)) => result.add_error(format!(
                "Availability at {} is both teacher- and student-typed",
                row.start_time
            )),
            (None, None) => result.add_warning(format!(
                "Availability at {} belongs to nobody and is ignored",
                row.start_time
            )),
            (Some(student_id), None) => {
                if !seen.contains(&student_id) {
                    result.add_error(format!(
                        "Availability at {} references unknown student '{}'",
                        row.start_time, student_id
                    ));
                }
            }
            (None, Some(teacher_id)) => {
                if teacher_id != record.teacher_id {
                    result.add_warning(format!(
                        "Availability at {} belongs to teacher '{}', not the schedule owner",
                        row.start_time, teacher_id
                    ));
                }
                if !record.dates.is_empty() && !record.dates.contains(&row.start_time.date()) {
                    result.add_warning(format!(
                        "Teacher availability at {} falls outside the allowed days",
                        row.start_time
                    ));
                }
            }
        }
    }

    if !result.is_valid() {
        return Err(anyhow::anyhow!(
            "Validation failed with {} errors:\n{}",
            result.errors.len(),
            result.errors.join("\n")
        ));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Availability, ScheduleId, Student, TeacherId};
    use chrono::NaiveDate;

    fn base_record() -> ScheduleRecord {
        ScheduleRecord {
            id: ScheduleId(1),
            slug: "test".to_string(),
            title: "Test".to_string(),
            teacher_id: TeacherId(7),
            dates: Vec::new(),
            students: vec![Student {
                id: StudentId(1),
                name: "Ada".to_string(),
                lesson_length: 30,
            }],
            availabilities: Vec::new(),
            is_finalized: false,
            finalized_at: None,
        }
    }

    fn at(hour: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_accepts_clean_record() {
        let mut record = base_record();
        record.availabilities = vec![
            Availability::teacher(at(9), TeacherId(7)),
            Availability::student(at(9), StudentId(1)),
        ];

        let result = validate_record(&record).unwrap();

        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_rejects_unknown_student_reference() {
        let mut record = base_record();
        record.availabilities = vec![Availability::student(at(9), StudentId(99))];

        assert!(validate_record(&record).is_err());
    }

    #[test]
    fn test_rejects_duplicate_student_ids() {
        let mut record = base_record();
        record.students.push(Student {
            id: StudentId(1),
            name: "Ada again".to_string(),
            lesson_length: 30,
        });

        assert!(validate_record(&record).is_err());
    }

    #[test]
    fn test_warns_on_foreign_teacher_rows() {
        let mut record = base_record();
        record.availabilities = vec![Availability::teacher(at(9), TeacherId(8))];

        let result = validate_record(&record).unwrap();

        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
    }
}
