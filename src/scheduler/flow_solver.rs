use super::flow_network::{EdgeTag, FlowNetwork};
use crate::error::{Result, SchedulerError};
use crate::types::SlotId;
use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

/// Total flow pushed and accumulated edge cost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowOutcome {
    pub flow: i64,
    pub cost: i64,
}

const UNREACHED: i64 = i64::MAX;

/// Phase 4: successive shortest paths with vertex potentials.
///
/// Repeats Dijkstra over reduced costs until the sink is unreachable or
/// `target_flow` units have been pushed. Every augmentation reconciles the
/// day states and blocks the interior slots of multi-slot assignments.
pub fn solve(network: &mut FlowNetwork, target_flow: i64) -> Result<FlowOutcome> {
    let n = network.node_count();
    let mut potential = vec![0i64; n];
    let mut flow = 0i64;
    let mut cost = 0i64;
    let mut augmentations = 0usize;

    while flow < target_flow {
        let (dist, prev) = shortest_path(network, &potential);
        if dist[network.sink] == UNREACHED {
            break;
        }

        for v in 0..n {
            if dist[v] != UNREACHED {
                potential[v] += dist[v];
            }
        }

        // Path from source to sink as (node, edge index) hops
        let mut path = Vec::new();
        let mut v = network.sink;
        while v != network.source {
            let (u, i) = prev[v].ok_or_else(|| {
                SchedulerError::InternalInvariantViolation(format!(
                    "reached node {v} has no predecessor"
                ))
            })?;
            path.push((u, i));
            v = u;
        }
        path.reverse();

        let delta = path
            .iter()
            .map(|&(u, i)| network.edges(u)[i].cap)
            .min()
            .unwrap_or(0);
        if delta <= 0 {
            return Err(SchedulerError::InternalInvariantViolation(format!(
                "bottleneck {delta} on augmenting path"
            ))
            .into());
        }

        for &(u, i) in &path {
            cost += network.edges(u)[i].cost * delta;
            let (to, rev) = {
                let edge = network.edge_mut(u, i);
                edge.cap -= delta;
                if edge.cap < 0 {
                    return Err(SchedulerError::InternalInvariantViolation(format!(
                        "negative residual on edge {u}->{}",
                        edge.to
                    ))
                    .into());
                }
                (edge.to, edge.rev)
            };
            network.edge_mut(to, rev).cap += delta;
        }

        reconcile(network, &path, delta)?;

        flow += delta;
        augmentations += 1;
    }

    log::debug!("flow solved: {flow} unit(s) over {augmentations} augmentation(s), cost {cost}");

    Ok(FlowOutcome { flow, cost })
}

/// Dijkstra over edges with positive residual capacity, using reduced costs
/// `cost + potential(u) - potential(v)`. Ties pop the smallest node id.
fn shortest_path(
    network: &FlowNetwork,
    potential: &[i64],
) -> (Vec<i64>, Vec<Option<(usize, usize)>>) {
    let n = network.node_count();
    let mut dist = vec![UNREACHED; n];
    let mut prev: Vec<Option<(usize, usize)>> = vec![None; n];
    let mut heap = BinaryHeap::new();

    dist[network.source] = 0;
    heap.push(Reverse((0i64, network.source)));

    while let Some(Reverse((d, u))) = heap.pop() {
        if d > dist[u] {
            continue;
        }
        for (i, edge) in network.edges(u).iter().enumerate() {
            if edge.cap <= 0 {
                continue;
            }
            let next = d + edge.cost + potential[u] - potential[edge.to];
            if dist[edge.to] == UNREACHED || next < dist[edge.to] {
                dist[edge.to] = next;
                prev[edge.to] = Some((u, i));
                heap.push(Reverse((next, edge.to)));
            }
        }
    }

    (dist, prev)
}

/// Post-augmentation bookkeeping: day-state reconciliation followed by the
/// multi-slot blocking callback
fn reconcile(network: &mut FlowNetwork, path: &[(usize, usize)], delta: i64) -> Result<()> {
    let mut slot_days: BTreeSet<usize> = BTreeSet::new();
    let mut opened_days: BTreeSet<usize> = BTreeSet::new();
    let mut blocks: Vec<(usize, Vec<SlotId>)> = Vec::new();

    for &(u, i) in path {
        match network.edges(u)[i].tag {
            EdgeTag::DaySlot { day, .. } => {
                slot_days.insert(day);
            }
            EdgeTag::Open { day } => {
                opened_days.insert(day);
            }
            EdgeTag::SlotStudent { slot, ref extras, .. } if !extras.is_empty() => {
                blocks.push((network.slot_day(slot), extras.clone()));
            }
            _ => {}
        }
    }

    for &day in &slot_days {
        network.credit_day(day, delta)?;
    }
    for &day in &slot_days {
        if opened_days.contains(&day) && !network.is_day_opened(day) {
            network.open_day(day);
        } else {
            network.clamp_day_throughput(day);
        }
    }

    for (day, extras) in blocks {
        for extra in &extras {
            network.block_slot(*extra);
        }
        network.credit_day(day, extras.len() as i64 * delta)?;
        network.clamp_day_throughput(day);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::candidate_finder::{Candidate, CandidatePlan, DayMeta, SlotMeta};
    use crate::scheduler::flow_network::assemble_network;
    use crate::types::SolverOptions;
    use chrono::NaiveDate;

    fn plan_with(candidates: Vec<Candidate>, slot_count: usize) -> CandidatePlan {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        CandidatePlan {
            days: vec![DayMeta {
                date,
                slot_count,
            }],
            slots: (0..slot_count)
                .map(|p| SlotMeta {
                    day: 0,
                    start: date.and_hms_opt(9 + p as u32, 0, 0).unwrap(),
                    position: p,
                })
                .collect(),
            candidates,
        }
    }

    #[test]
    fn test_two_students_share_one_day() {
        let plan = plan_with(
            vec![
                Candidate {
                    slot: SlotId(0),
                    student: 0,
                    extras: vec![],
                },
                Candidate {
                    slot: SlotId(1),
                    student: 1,
                    extras: vec![],
                },
            ],
            2,
        );
        let mut network = assemble_network(&plan, 2, &SolverOptions::default());

        let outcome = solve(&mut network, 2).unwrap();

        assert_eq!(outcome.flow, 2);
        // One opening plus the second slot's gap cost
        assert_eq!(outcome.cost, 10_000 + 5);
        let day = &network.day_states[0];
        assert!(day.opened);
        assert_eq!(day.assignments_made, 2);
        assert_eq!(day.remaining(), 0);
    }

    #[test]
    fn test_block_consumes_interior_slot() {
        // Student 0 needs both slots as a block; student 1 could only use
        // the interior slot, which the block removes
        let plan = plan_with(
            vec![
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
            2,
        );
        let mut network = assemble_network(&plan, 2, &SolverOptions::default());

        let outcome = solve(&mut network, 2).unwrap();

        assert_eq!(outcome.flow, 1);
        assert_eq!(outcome.cost, 10_000 + 5 - 1);
        assert_eq!(network.day_states[0].assignments_made, 2);

        let fired = network.fired_assignments();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].0, SlotId(0));
        assert_eq!(fired[0].1, 0);
    }

    #[test]
    fn test_terminates_when_sink_unreachable() {
        let plan = plan_with(
            vec![
                Candidate {
                    slot: SlotId(0),
                    student: 0,
                    extras: vec![],
                },
                Candidate {
                    slot: SlotId(0),
                    student: 1,
                    extras: vec![],
                },
            ],
            1,
        );
        let mut network = assemble_network(&plan, 2, &SolverOptions::default());

        let outcome = solve(&mut network, 2).unwrap();

        assert_eq!(outcome.flow, 1, "one slot cannot host two students");
    }

    #[test]
    fn test_zero_target_flow() {
        let plan = plan_with(vec![], 0);
        let mut network = assemble_network(&plan, 0, &SolverOptions::default());

        let outcome = solve(&mut network, 0).unwrap();

        assert_eq!(outcome, FlowOutcome { flow: 0, cost: 0 });
    }
}
