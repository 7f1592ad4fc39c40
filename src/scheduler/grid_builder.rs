use crate::types::{Availability, StudentId, TeacherId};
use chrono::{NaiveDate, NaiveDateTime};
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Per-day teacher offering and per-student acceptance sets, built from raw
/// availability rows
#[derive(Debug, Clone)]
pub struct SlotGrid {
    /// day -> ascending unique teacher-offered start instants
    pub teacher_slots: BTreeMap<NaiveDate, Vec<NaiveDateTime>>,
    /// student -> set of acceptable start instants (not filtered by day)
    pub student_slots: HashMap<StudentId, BTreeSet<NaiveDateTime>>,
    /// allowed calendar days; empty set means "infer from teacher rows"
    pub allowed_days: BTreeSet<NaiveDate>,
}

impl SlotGrid {
    pub fn is_empty(&self) -> bool {
        self.teacher_slots.is_empty()
    }

    /// Largest teacher-slot count across days
    pub fn max_day_slots(&self) -> usize {
        self.teacher_slots.values().map(Vec::len).max().unwrap_or(0)
    }
}

/// Phase 1: collapse availability rows into the slot grid.
///
/// Teacher rows whose teacher id does not match are ignored, duplicates
/// within a day collapse, and days outside a non-empty allowed set are
/// dropped entirely.
pub fn build_slot_grid(
    availabilities: &[Availability],
    allowed_days: &[NaiveDate],
    teacher_id: TeacherId,
) -> SlotGrid {
    let allowed_days: BTreeSet<NaiveDate> = allowed_days.iter().copied().collect();

    let mut teacher_slots: BTreeMap<NaiveDate, Vec<NaiveDateTime>> = BTreeMap::new();
    for (day, rows) in &availabilities
        .iter()
        .filter(|a| a.teacher_id == Some(teacher_id))
        .map(|a| a.start_time)
        .sorted()
        .dedup()
        .group_by(|start| start.date())
    {
        if !allowed_days.is_empty() && !allowed_days.contains(&day) {
            continue;
        }
        teacher_slots.insert(day, rows.collect());
    }

    let mut student_slots: HashMap<StudentId, BTreeSet<NaiveDateTime>> = HashMap::new();
    for row in availabilities {
        if let Some(student_id) = row.student_id {
            student_slots
                .entry(student_id)
                .or_default()
                .insert(row.start_time);
        }
    }

    log::debug!(
        "slot grid: {} day(s), {} teacher slot(s), {} student(s) with availability",
        teacher_slots.len(),
        teacher_slots.values().map(Vec::len).sum::<usize>(),
        student_slots.len()
    );

    SlotGrid {
        teacher_slots,
        student_slots,
        allowed_days,
    }
}
