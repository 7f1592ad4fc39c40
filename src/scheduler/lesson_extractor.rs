use super::candidate_finder::CandidatePlan;
use super::flow_network::FlowNetwork;
use crate::types::{Lesson, SlotId, Student, StudentId};
use chrono::Duration;
use std::cmp::Reverse;
use std::collections::BTreeSet;

/// Phase 5: turn saturated slot -> student edges into the final lesson list.
///
/// Tentatives are ordered multi-slot blocks first, then chronologically,
/// then by student name; the occupied-slot walk drops anything whose block
/// overlaps an earlier acceptance. Reads the network, never mutates it.
pub fn extract_lessons(
    network: &FlowNetwork,
    plan: &CandidatePlan,
    students: &[Student],
    buffer_minutes: i64,
) -> (Vec<Lesson>, Vec<StudentId>) {
    let mut tentatives: Vec<(SlotId, usize, &[SlotId])> = network.fired_assignments();
    tentatives.sort_by_key(|&(slot, student, extras)| {
        let meta = &plan.slots[slot.0];
        (
            Reverse(1 + extras.len()),
            plan.days[meta.day].date,
            meta.start,
            students[student].name.clone(),
        )
    });

    let mut occupied: BTreeSet<SlotId> = BTreeSet::new();
    let mut lessons = Vec::new();
    let mut assigned: BTreeSet<usize> = BTreeSet::new();

    for (slot, student, extras) in tentatives {
        let conflict =
            occupied.contains(&slot) || extras.iter().any(|extra| occupied.contains(extra));
        if conflict {
            continue;
        }
        occupied.insert(slot);
        occupied.extend(extras.iter().copied());

        let meta = &plan.slots[slot.0];
        let record = &students[student];
        lessons.push(Lesson {
            student_id: record.id,
            student_name: record.name.clone(),
            day: plan.days[meta.day].date,
            start_time: meta.start,
            end_time: meta.start + Duration::minutes(record.lesson_length as i64 + buffer_minutes),
        });
        assigned.insert(student);
    }

    lessons.sort_by(|a, b| {
        (a.day, a.start_time, &a.student_name).cmp(&(b.day, b.start_time, &b.student_name))
    });

    let unscheduled = students
        .iter()
        .enumerate()
        .filter(|(s, _)| !assigned.contains(s))
        .map(|(_, student)| student.id)
        .collect();

    (lessons, unscheduled)
}
