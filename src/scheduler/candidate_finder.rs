use super::grid_builder::SlotGrid;
use crate::error::{Result, SchedulerError};
use crate::types::{SlotId, SolverOptions, Student};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, BTreeSet};

/// A day that kept at least one surviving candidate slot
#[derive(Debug, Clone)]
pub struct DayMeta {
    pub date: NaiveDate,
    pub slot_count: usize,
}

/// One surviving teacher slot
#[derive(Debug, Clone)]
pub struct SlotMeta {
    /// index into the surviving-day list
    pub day: usize,
    pub start: NaiveDateTime,
    /// zero-indexed rank among the day's surviving slots; drives the gap cost
    pub position: usize,
}

/// A (slot, student, extras) triple: the student can start a lesson at the
/// slot, occupying the extras as the rest of a contiguous block
#[derive(Debug, Clone)]
pub struct Candidate {
    pub slot: SlotId,
    /// index into the input student list
    pub student: usize,
    pub extras: Vec<SlotId>,
}

/// Output of phase 2: the surviving slot table plus every candidate
#[derive(Debug, Clone)]
pub struct CandidatePlan {
    pub days: Vec<DayMeta>,
    pub slots: Vec<SlotMeta>,
    pub candidates: Vec<Candidate>,
}

impl CandidatePlan {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn max_day_slots(&self) -> usize {
        self.days.iter().map(|d| d.slot_count).max().unwrap_or(0)
    }
}

/// Resolve the uniform slot length: explicit `slot_minutes`, or inferred
/// when every student shares one lesson length
pub fn resolve_slot_minutes(options: &SolverOptions, students: &[Student]) -> Result<i64> {
    if let Some(minutes) = options.slot_minutes {
        if minutes <= 0 {
            return Err(SchedulerError::InvalidSlotGranularity(format!(
                "slot length must be positive, got {minutes}"
            ))
            .into());
        }
        return Ok(minutes);
    }

    let lengths: BTreeSet<u32> = students.iter().map(|s| s.lesson_length).collect();
    match lengths.len() {
        1 => Ok(*lengths.iter().next().expect("non-empty") as i64),
        _ => Err(SchedulerError::AmbiguousSlotLength {
            lengths: lengths.into_iter().collect(),
        }
        .into()),
    }
}

/// Per-student contiguous slot counts, failing on lesson lengths that are
/// not positive multiples of the slot length
pub fn required_slot_counts(students: &[Student], slot_minutes: i64) -> Result<Vec<usize>> {
    students
        .iter()
        .map(|student| {
            let length = student.lesson_length as i64;
            if length <= 0 || length % slot_minutes != 0 {
                return Err(SchedulerError::InvalidSlotGranularity(format!(
                    "lesson length {} of student '{}' is not a positive multiple of the {}-minute slot",
                    student.lesson_length, student.id, slot_minutes
                ))
                .into());
            }
            Ok((length / slot_minutes) as usize)
        })
        .collect()
}

/// Phase 2: enumerate candidates, drop slot positions no candidate touches,
/// and assign stable slot ids over the survivors.
///
/// The build is two passes: pass 1 finds candidate positions on the per-day
/// time lists, pass 2 translates positions into ids from the completed slot
/// table.
pub fn enumerate_candidates(
    grid: &SlotGrid,
    students: &[Student],
    required_slots: &[usize],
    slot_minutes: i64,
) -> CandidatePlan {
    let step = Duration::minutes(slot_minutes);

    // Pass 1: candidate positions per day, in (position, student) order
    let mut raw: BTreeMap<NaiveDate, Vec<(usize, usize, usize)>> = BTreeMap::new();
    for (&date, times) in &grid.teacher_slots {
        let day_raw = raw.entry(date).or_default();
        for (p, &start) in times.iter().enumerate() {
            for (s, student) in students.iter().enumerate() {
                let r = required_slots[s];
                if p + r > times.len() {
                    continue;
                }
                let Some(accepts) = grid.student_slots.get(&student.id) else {
                    continue;
                };
                let fits = (0..r).all(|j| {
                    let expected = start + step * j as i32;
                    times[p + j] == expected && accepts.contains(&expected)
                });
                if fits {
                    day_raw.push((p, s, r));
                }
            }
        }
    }

    // Drop slot positions no candidate references, propagating until stable
    fn referenced_positions(
        raw: &BTreeMap<NaiveDate, Vec<(usize, usize, usize)>>,
    ) -> BTreeMap<NaiveDate, BTreeSet<usize>> {
        let mut map: BTreeMap<NaiveDate, BTreeSet<usize>> = BTreeMap::new();
        for (&date, day_raw) in raw {
            let positions = map.entry(date).or_default();
            for &(p, _, r) in day_raw {
                positions.extend(p..p + r);
            }
        }
        map
    }

    let mut alive = referenced_positions(&raw);
    loop {
        for (date, day_raw) in raw.iter_mut() {
            let empty = BTreeSet::new();
            let positions = alive.get(date).unwrap_or(&empty);
            day_raw.retain(|&(p, _, r)| (p..p + r).all(|q| positions.contains(&q)));
        }
        let next = referenced_positions(&raw);
        if next == alive {
            break;
        }
        alive = next;
    }

    // Pass 2: number the survivors and resolve candidate extras
    let mut days = Vec::new();
    let mut slots = Vec::new();
    let mut candidates = Vec::new();
    for (&date, day_raw) in &raw {
        let Some(referenced) = alive.get(&date) else {
            continue;
        };
        if referenced.is_empty() {
            continue;
        }

        let day_index = days.len();
        let times = &grid.teacher_slots[&date];
        let mut position_ids: BTreeMap<usize, SlotId> = BTreeMap::new();
        for (rank, &p) in referenced.iter().enumerate() {
            let id = SlotId(slots.len());
            position_ids.insert(p, id);
            slots.push(SlotMeta {
                day: day_index,
                start: times[p],
                position: rank,
            });
        }
        days.push(DayMeta {
            date,
            slot_count: referenced.len(),
        });

        for &(p, s, r) in day_raw {
            candidates.push(Candidate {
                slot: position_ids[&p],
                student: s,
                extras: (p + 1..p + r).map(|q| position_ids[&q]).collect(),
            });
        }
    }

    log::debug!(
        "candidates: {} over {} surviving slot(s) on {} day(s)",
        candidates.len(),
        slots.len(),
        days.len()
    );

    CandidatePlan {
        days,
        slots,
        candidates,
    }
}
