use crate::scheduler::{build_slot_grid, resolve_slot_minutes};
use crate::types::{GeneratedSchedule, ScheduleRecord, SolverOptions};
use chrono::Duration;
use std::collections::HashSet;

/// Result of validating a generated schedule against its input record
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub violations: Vec<Violation>,
    pub statistics: LessonStatistics,
}

/// A broken invariant
#[derive(Debug, Clone)]
pub struct Violation {
    pub constraint: String,
    pub message: String,
}

/// Headline numbers for reporting
#[derive(Debug, Clone)]
pub struct LessonStatistics {
    pub total_students: usize,
    pub scheduled: usize,
    pub unscheduled: usize,
    pub days_used: usize,
}

/// Validate a generated schedule: conservation, disjointness, and slot and
/// availability membership for every lesson including block interiors
pub fn validate_lessons(
    result: &GeneratedSchedule,
    record: &ScheduleRecord,
    options: &SolverOptions,
) -> ValidationReport {
    let mut violations = Vec::new();

    violations.extend(check_student_conservation(result, record));
    violations.extend(check_lesson_overlaps(result, record));
    violations.extend(check_end_times(result, record, options.buffer_minutes));

    if !result.lessons.is_empty() {
        match resolve_slot_minutes(options, &record.students) {
            Ok(slot_minutes) => {
                violations.extend(check_slot_membership(result, record, slot_minutes));
            }
            Err(e) => violations.push(Violation {
                constraint: "SlotLength".to_string(),
                message: e.to_string(),
            }),
        }
    }

    let statistics = LessonStatistics {
        total_students: record.students.len(),
        scheduled: result.scheduled_count,
        unscheduled: result.unscheduled_student_ids.len(),
        days_used: result.used_days().len(),
    };

    ValidationReport {
        is_valid: violations.is_empty(),
        violations,
        statistics,
    }
}

/// Every student lands in exactly one bucket, and no student twice
fn check_student_conservation(
    result: &GeneratedSchedule,
    record: &ScheduleRecord,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    if result.scheduled_count + result.unscheduled_student_ids.len() != record.students.len() {
        violations.push(Violation {
            constraint: "StudentConservation".to_string(),
            message: format!(
                "{} scheduled + {} unscheduled != {} students",
                result.scheduled_count,
                result.unscheduled_student_ids.len(),
                record.students.len()
            ),
        });
    }

    let mut seen = HashSet::new();
    for lesson in &result.lessons {
        if !seen.insert(lesson.student_id) {
            violations.push(Violation {
                constraint: "OneLessonPerStudent".to_string(),
                message: format!("Student '{}' has more than one lesson", lesson.student_id),
            });
        }
        if record.student(lesson.student_id).is_none() {
            violations.push(Violation {
                constraint: "KnownStudent".to_string(),
                message: format!("Lesson for unknown student '{}'", lesson.student_id),
            });
        }
    }

    violations
}

/// Teaching intervals on the same day are pairwise disjoint. The interval is
/// `[start, start + lesson_length)`; the buffer only pads the reported end.
fn check_lesson_overlaps(result: &GeneratedSchedule, record: &ScheduleRecord) -> Vec<Violation> {
    let mut violations = Vec::new();

    let intervals: Vec<_> = result
        .lessons
        .iter()
        .filter_map(|lesson| {
            let student = record.student(lesson.student_id)?;
            let end = lesson.start_time + Duration::minutes(student.lesson_length as i64);
            Some((lesson.day, lesson.start_time, end, lesson.student_id))
        })
        .collect();

    for i in 0..intervals.len() {
        for j in (i + 1)..intervals.len() {
            let (day_a, start_a, end_a, id_a) = intervals[i];
            let (day_b, start_b, end_b, id_b) = intervals[j];
            if day_a == day_b && start_a < end_b && start_b < end_a {
                violations.push(Violation {
                    constraint: "DisjointLessons".to_string(),
                    message: format!(
                        "Lessons of '{id_a}' and '{id_b}' overlap on {day_a}"
                    ),
                });
            }
        }
    }

    violations
}

fn check_end_times(
    result: &GeneratedSchedule,
    record: &ScheduleRecord,
    buffer_minutes: i64,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for lesson in &result.lessons {
        let Some(student) = record.student(lesson.student_id) else {
            continue;
        };
        let expected =
            lesson.start_time + Duration::minutes(student.lesson_length as i64 + buffer_minutes);
        if lesson.end_time != expected {
            violations.push(Violation {
                constraint: "EndTime".to_string(),
                message: format!(
                    "Lesson of '{}' ends {} instead of {}",
                    lesson.student_id, lesson.end_time, expected
                ),
            });
        }
    }

    violations
}

/// Every lesson start is a teacher slot for its day, every occupied block
/// instant is both teacher-offered and inside the student's availability
fn check_slot_membership(
    result: &GeneratedSchedule,
    record: &ScheduleRecord,
    slot_minutes: i64,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let grid = build_slot_grid(&record.availabilities, &record.dates, record.teacher_id);
    let step = Duration::minutes(slot_minutes);

    for lesson in &result.lessons {
        let Some(student) = record.student(lesson.student_id) else {
            continue;
        };
        let slots = student.required_slots(slot_minutes);
        let day_slots = grid.teacher_slots.get(&lesson.day);
        let accepts = grid.student_slots.get(&lesson.student_id);

        for j in 0..slots {
            let instant = lesson.start_time + step * j as i32;
            if !day_slots.is_some_and(|s| s.contains(&instant)) {
                violations.push(Violation {
                    constraint: "TeacherSlot".to_string(),
                    message: format!(
                        "Lesson instant {} of '{}' is not teacher-offered",
                        instant, lesson.student_id
                    ),
                });
            }
            if !accepts.is_some_and(|s| s.contains(&instant)) {
                violations.push(Violation {
                    constraint: "StudentAvailability".to_string(),
                    message: format!(
                        "Lesson instant {} of '{}' is outside the student's availability",
                        instant, lesson.student_id
                    ),
                });
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::generate_lessons;
    use crate::types::{
        Availability, Lesson, ScheduleId, Student, StudentId, TeacherId,
    };
    use chrono::{NaiveDate, NaiveDateTime, Timelike};

    const TEACHER: TeacherId = TeacherId(42);

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn sample_record() -> ScheduleRecord {
        ScheduleRecord {
            id: ScheduleId(1),
            slug: "test".to_string(),
            title: "Test".to_string(),
            teacher_id: TEACHER,
            dates: Vec::new(),
            students: vec![
                Student {
                    id: StudentId(1),
                    name: "Ada".to_string(),
                    lesson_length: 60,
                },
                Student {
                    id: StudentId(2),
                    name: "Grace".to_string(),
                    lesson_length: 60,
                },
            ],
            availabilities: vec![
                Availability::teacher(at(1, 9), TEACHER),
                Availability::teacher(at(1, 10), TEACHER),
                Availability::student(at(1, 9), StudentId(1)),
                Availability::student(at(1, 10), StudentId(2)),
            ],
            is_finalized: false,
            finalized_at: None,
        }
    }

    #[test]
    fn test_accepts_engine_output() {
        let record = sample_record();
        let options = SolverOptions::default();
        let result = generate_lessons(&record, &options, true).unwrap();

        let report = validate_lessons(&result, &record, &options);

        assert!(report.is_valid, "violations: {:?}", report.violations);
        assert_eq!(report.statistics.scheduled, 2);
        assert_eq!(report.statistics.days_used, 1);
    }

    #[test]
    fn test_detects_overlap_and_bad_start() {
        let record = sample_record();
        let lessons = vec![
            Lesson {
                student_id: StudentId(1),
                student_name: "Ada".to_string(),
                day: at(1, 9).date(),
                start_time: at(1, 9),
                end_time: at(1, 10),
            },
            Lesson {
                student_id: StudentId(2),
                student_name: "Grace".to_string(),
                day: at(1, 9).date(),
                start_time: at(1, 9).with_minute(30).unwrap(),
                end_time: at(1, 10).with_minute(30).unwrap(),
            },
        ];
        let result = GeneratedSchedule {
            lessons,
            unscheduled_student_ids: Vec::new(),
            scheduled_count: 2,
            objective_cost: 0,
        };

        let report = validate_lessons(&result, &record, &SolverOptions::default());

        assert!(!report.is_valid);
        let constraints: Vec<&str> = report
            .violations
            .iter()
            .map(|v| v.constraint.as_str())
            .collect();
        assert!(constraints.contains(&"DisjointLessons"));
        assert!(constraints.contains(&"TeacherSlot"));
    }

    #[test]
    fn test_detects_duplicate_student() {
        let record = sample_record();
        let lesson = Lesson {
            student_id: StudentId(1),
            student_name: "Ada".to_string(),
            day: at(1, 9).date(),
            start_time: at(1, 9),
            end_time: at(1, 10),
        };
        let result = GeneratedSchedule {
            lessons: vec![lesson.clone(), lesson],
            unscheduled_student_ids: vec![StudentId(2)],
            scheduled_count: 2,
            objective_cost: 0,
        };

        let report = validate_lessons(&result, &record, &SolverOptions::default());

        assert!(report
            .violations
            .iter()
            .any(|v| v.constraint == "OneLessonPerStudent"));
    }
}
