use super::{StudentId, TeacherId};
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// One availability row: a teacher-offered or student-accepted start instant.
///
/// Exactly one of `teacher_id` / `student_id` is expected to be set; rows
/// with neither are ignored by the grid builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Availability {
    #[serde(deserialize_with = "deserialize_instant")]
    pub start_time: NaiveDateTime,
    #[serde(default)]
    pub student_id: Option<StudentId>,
    #[serde(default)]
    pub teacher_id: Option<TeacherId>,
}

/// Accept plain ISO-8601 instants as well as `Z`/offset-suffixed ones,
/// normalizing the latter to UTC
fn deserialize_instant<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    if let Ok(aware) = DateTime::parse_from_rfc3339(&value) {
        return Ok(aware.naive_utc());
    }
    value.parse::<NaiveDateTime>().map_err(serde::de::Error::custom)
}

impl Availability {
    pub fn teacher(start_time: NaiveDateTime, teacher_id: TeacherId) -> Self {
        Self {
            start_time,
            student_id: None,
            teacher_id: Some(teacher_id),
        }
    }

    pub fn student(start_time: NaiveDateTime, student_id: StudentId) -> Self {
        Self {
            start_time,
            student_id: Some(student_id),
            teacher_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_zulu_suffixed_instants() {
        let row: Availability = serde_json::from_str(
            r#"{"start_time": "2024-01-01T09:00:00Z", "teacher_id": 7}"#,
        )
        .unwrap();
        let plain: Availability =
            serde_json::from_str(r#"{"start_time": "2024-01-01T09:00:00", "teacher_id": 7}"#)
                .unwrap();

        assert_eq!(row.start_time, plain.start_time);
        assert_eq!(row.teacher_id, Some(TeacherId(7)));
    }
}

