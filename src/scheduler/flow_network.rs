use super::candidate_finder::CandidatePlan;
use crate::error::{Result, SchedulerError};
use crate::types::{SlotId, SolverOptions};

/// Metadata carried by a forward edge; the solver matches on it when
/// dispatching the augmentation callback
#[derive(Debug, Clone)]
pub enum EdgeTag {
    /// source -> day, capacity 1, carries the day-open cost
    Open { day: usize },
    /// source -> day, zero-cost capacity raised once the day is opened
    Throughput { day: usize },
    /// day -> slot, carries the quadratic gap cost
    DaySlot { day: usize, slot: SlotId },
    /// slot -> student, with the interior slots of a multi-slot block
    SlotStudent {
        slot: SlotId,
        student: usize,
        extras: Vec<SlotId>,
    },
    /// student -> sink
    StudentSink { student: usize },
    /// reverse arc created for residual bookkeeping
    Residual,
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub to: usize,
    /// index of the paired reverse edge in `to`'s adjacency list
    pub rev: usize,
    /// residual capacity
    pub cap: i64,
    pub cost: i64,
    pub tag: EdgeTag,
}

/// Bookkeeping for one day node, reconciled after every augmentation
#[derive(Debug, Clone)]
pub struct DayState {
    pub total_slots: i64,
    pub opened: bool,
    pub assignments_made: i64,
    open_edge_idx: usize,
    through_edge_idx: usize,
}

impl DayState {
    pub fn remaining(&self) -> i64 {
        (self.total_slots - self.assignments_made).max(0)
    }
}

/// The layered assignment network: source -> days -> slots -> students -> sink
pub struct FlowNetwork {
    graph: Vec<Vec<Edge>>,
    pub source: usize,
    pub sink: usize,
    pub day_states: Vec<DayState>,
    /// slot id -> node
    slot_nodes: Vec<usize>,
    /// slot id -> day index
    slot_days: Vec<usize>,
    /// slot id -> handle of its day -> slot edge
    day_slot_edges: Vec<(usize, usize)>,
}

impl FlowNetwork {
    pub fn node_count(&self) -> usize {
        self.graph.len()
    }

    pub fn edges(&self, node: usize) -> &[Edge] {
        &self.graph[node]
    }

    pub(crate) fn edge_mut(&mut self, node: usize, idx: usize) -> &mut Edge {
        &mut self.graph[node][idx]
    }

    fn add_edge(&mut self, from: usize, to: usize, cap: i64, cost: i64, tag: EdgeTag) -> usize {
        let idx = self.graph[from].len();
        let rev = self.graph[to].len();
        self.graph[from].push(Edge {
            to,
            rev,
            cap,
            cost,
            tag,
        });
        self.graph[to].push(Edge {
            to: from,
            rev: idx,
            cap: 0,
            cost: -cost,
            tag: EdgeTag::Residual,
        });
        idx
    }

    /// Zero an edge and its paired reverse
    fn zero_pair(&mut self, node: usize, idx: usize) {
        let (to, rev) = {
            let edge = &self.graph[node][idx];
            (edge.to, edge.rev)
        };
        self.graph[node][idx].cap = 0;
        self.graph[to][rev].cap = 0;
    }

    /// Record `delta` consumed slot resources on a day
    pub(crate) fn credit_day(&mut self, day: usize, delta: i64) -> Result<()> {
        let state = &mut self.day_states[day];
        state.assignments_made += delta;
        if state.assignments_made > state.total_slots {
            return Err(SchedulerError::InternalInvariantViolation(format!(
                "day {} holds {} assignments over {} slots",
                day, state.assignments_made, state.total_slots
            ))
            .into());
        }
        Ok(())
    }

    /// First unit of flow reached the day: unlock its remaining throughput
    /// and pin the open edge so the day cannot be de-opened
    pub(crate) fn open_day(&mut self, day: usize) {
        let (open_idx, through_idx, remaining) = {
            let state = &mut self.day_states[day];
            state.opened = true;
            (state.open_edge_idx, state.through_edge_idx, state.remaining())
        };
        self.graph[self.source][through_idx].cap = remaining;
        let (to, rev) = {
            let edge = &self.graph[self.source][open_idx];
            (edge.to, edge.rev)
        };
        self.graph[to][rev].cap = 0;
    }

    /// Keep an opened day's throughput residual within its remaining slots
    pub(crate) fn clamp_day_throughput(&mut self, day: usize) {
        let state = &self.day_states[day];
        if !state.opened {
            return;
        }
        let remaining = state.remaining();
        let through_idx = state.through_edge_idx;
        if self.graph[self.source][through_idx].cap > remaining {
            self.graph[self.source][through_idx].cap = remaining;
        }
    }

    pub(crate) fn is_day_opened(&self, day: usize) -> bool {
        self.day_states[day].opened
    }

    pub(crate) fn slot_day(&self, slot: SlotId) -> usize {
        self.slot_days[slot.0]
    }

    /// Remove a slot consumed as the interior of a multi-slot block: its
    /// day -> slot edge and every slot -> student edge vanish from the
    /// residual graph in both directions
    pub(crate) fn block_slot(&mut self, slot: SlotId) {
        let (day_node, idx) = self.day_slot_edges[slot.0];
        self.zero_pair(day_node, idx);

        let slot_node = self.slot_nodes[slot.0];
        for idx in 0..self.graph[slot_node].len() {
            if matches!(self.graph[slot_node][idx].tag, EdgeTag::SlotStudent { .. }) {
                self.zero_pair(slot_node, idx);
            }
        }
    }

    /// Saturated slot -> student edges that actually carry flow, in slot-id
    /// then insertion order
    pub fn fired_assignments(&self) -> Vec<(SlotId, usize, &[SlotId])> {
        let mut fired = Vec::new();
        for &slot_node in &self.slot_nodes {
            for edge in &self.graph[slot_node] {
                if let EdgeTag::SlotStudent {
                    slot,
                    student,
                    ref extras,
                } = edge.tag
                {
                    let carries_flow = edge.cap == 0 && self.graph[edge.to][edge.rev].cap > 0;
                    if carries_flow {
                        fired.push((slot, student, extras.as_slice()));
                    }
                }
            }
        }
        fired
    }
}

/// Phase 3: build the layered network from the candidate plan.
///
/// Edge insertion order is fixed (days, then slots, then candidates, then
/// student sinks) so Dijkstra traversal and extraction are deterministic.
pub fn assemble_network(
    plan: &CandidatePlan,
    student_count: usize,
    options: &SolverOptions,
) -> FlowNetwork {
    let day_count = plan.days.len();
    let slot_count = plan.slots.len();

    let source = 0;
    let day_node = |d: usize| 1 + d;
    let slot_node = |i: usize| 1 + day_count + i;
    let student_node = |s: usize| 1 + day_count + slot_count + s;
    let sink = 1 + day_count + slot_count + student_count;

    let m_max = plan.max_day_slots() as i64;
    let dominating = options
        .gap_penalty
        .saturating_mul(m_max.saturating_mul(m_max).saturating_mul(m_max));
    if options.day_open_cost < dominating {
        log::warn!(
            "day_open_cost {} is below the gap-dominating bound {}; day consolidation may lose to intra-day packing",
            options.day_open_cost,
            dominating
        );
    }

    let mut network = FlowNetwork {
        graph: vec![Vec::new(); sink + 1],
        source,
        sink,
        day_states: Vec::with_capacity(day_count),
        slot_nodes: (0..slot_count).map(slot_node).collect(),
        slot_days: plan.slots.iter().map(|s| s.day).collect(),
        day_slot_edges: Vec::with_capacity(slot_count),
    };

    for (d, day) in plan.days.iter().enumerate() {
        let open_edge_idx =
            network.add_edge(source, day_node(d), 1, options.day_open_cost, EdgeTag::Open { day: d });
        let through_edge_idx =
            network.add_edge(source, day_node(d), 0, 0, EdgeTag::Throughput { day: d });
        network.day_states.push(DayState {
            total_slots: day.slot_count as i64,
            opened: false,
            assignments_made: 0,
            open_edge_idx,
            through_edge_idx,
        });
    }

    for (i, slot) in plan.slots.iter().enumerate() {
        let position = slot.position as i64;
        let cost = options.gap_penalty * position * position;
        let idx = network.add_edge(
            day_node(slot.day),
            slot_node(i),
            1,
            cost,
            EdgeTag::DaySlot {
                day: slot.day,
                slot: SlotId(i),
            },
        );
        network.day_slot_edges.push((day_node(slot.day), idx));
    }

    for candidate in &plan.candidates {
        // Extra-position gap cost, minus one per extra so longer contiguous
        // blocks win cost ties
        let bonus: i64 = candidate
            .extras
            .iter()
            .map(|extra| {
                let position = plan.slots[extra.0].position as i64;
                options.gap_penalty * position * position
            })
            .sum::<i64>()
            - candidate.extras.len() as i64;
        network.add_edge(
            slot_node(candidate.slot.0),
            student_node(candidate.student),
            1,
            bonus,
            EdgeTag::SlotStudent {
                slot: candidate.slot,
                student: candidate.student,
                extras: candidate.extras.clone(),
            },
        );
    }

    for s in 0..student_count {
        network.add_edge(student_node(s), sink, 1, 0, EdgeTag::StudentSink { student: s });
    }

    network
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::candidate_finder::{Candidate, DayMeta, SlotMeta};
    use chrono::NaiveDate;

    fn sample_plan() -> CandidatePlan {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let start = |hour| date.and_hms_opt(hour, 0, 0).unwrap();
        CandidatePlan {
            days: vec![DayMeta {
                date,
                slot_count: 2,
            }],
            slots: vec![
                SlotMeta {
                    day: 0,
                    start: start(9),
                    position: 0,
                },
                SlotMeta {
                    day: 0,
                    start: start(10),
                    position: 1,
                },
            ],
            candidates: vec![
                Candidate {
                    slot: SlotId(0),
                    student: 0,
                    extras: vec![SlotId(1)],
                },
                Candidate {
                    slot: SlotId(1),
                    student: 1,
                    extras: vec![],
                },
            ],
        }
    }

    #[test]
    fn test_layered_edges_and_costs() {
        let network = assemble_network(&sample_plan(), 2, &SolverOptions::default());

        let source_edges = network.edges(network.source);
        assert_eq!(source_edges.len(), 2, "open + throughput per day");
        assert!(matches!(source_edges[0].tag, EdgeTag::Open { day: 0 }));
        assert_eq!(source_edges[0].cap, 1);
        assert_eq!(source_edges[0].cost, 10_000);
        assert!(matches!(source_edges[1].tag, EdgeTag::Throughput { day: 0 }));
        assert_eq!(source_edges[1].cap, 0);

        // Block candidate at position 0 with one extra at position 1
        let slot0_edges = network.edges(2);
        let block = slot0_edges
            .iter()
            .find(|e| matches!(e.tag, EdgeTag::SlotStudent { .. }))
            .unwrap();
        assert_eq!(block.cost, 5 * 1 - 1);
    }

    #[test]
    fn test_block_slot_removes_every_touching_edge() {
        let mut network = assemble_network(&sample_plan(), 2, &SolverOptions::default());

        network.block_slot(SlotId(1));

        let day_edges = network.edges(1);
        let day_slot1 = day_edges
            .iter()
            .find(|e| matches!(e.tag, EdgeTag::DaySlot { slot: SlotId(1), .. }))
            .unwrap();
        assert_eq!(day_slot1.cap, 0);

        let slot1_node = 3;
        for edge in network.edges(slot1_node) {
            if matches!(edge.tag, EdgeTag::SlotStudent { .. }) {
                assert_eq!(edge.cap, 0);
            }
        }
    }
}
