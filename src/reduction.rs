//! Orchestrates initialization (quadrics + edges), the contraction loop, and
//! surfel-set finalization.
use std::fmt::{self, Display};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::constants::{Real, DEFAULT_NEIGHBORS};
use crate::contraction::{build_contraction, Contraction, Edge};
use crate::contraction_index::ContractionIndex;
use crate::error::{ReductionError, Result};
use crate::knn::local_nearest_neighbors;
use crate::priority_queue::ContractionQueue;
use crate::quadric::edge_quadric;
use crate::surfel::{Surfel, SurfelId, SurfelNode};
use crate::vector::Mat4;

const STEP_SIZE: f64 = 5.0;

/// Builder-style parameters threaded into [`create_lod`], mirroring
/// `ContractionParams`'s chainable `with_*` style.
#[derive(Debug, Clone, Copy)]
pub struct ReductionParams {
    target_count: usize,
    neighbors: usize,
    log_progress: bool,
}

impl ReductionParams {
    pub fn new(target_count: usize) -> Self {
        ReductionParams {
            target_count,
            neighbors: DEFAULT_NEIGHBORS,
            log_progress: true,
        }
    }

    pub fn target_count(mut self, target_count: usize) -> Self {
        self.target_count = target_count;
        self
    }

    pub fn neighbors(mut self, neighbors: usize) -> Self {
        self.neighbors = neighbors;
        self
    }

    pub fn log_progress(mut self, log_progress: bool) -> Self {
        self.log_progress = log_progress;
        self
    }
}

/// Summary of one [`create_lod`] call, mirroring `ConstructionStats`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReductionStats {
    pub init_time: Duration,
    pub contraction_time: Duration,
    pub total_time: Duration,
    pub contractions_performed: usize,
    /// Contractions that were built and then discarded because the
    /// combined quadric or its resulting error came out non-finite.
    pub contractions_dropped: usize,
    /// Edge-quadric contributions that never made it into a surfel's
    /// accumulated quadric because the edge itself was numerically
    /// degenerate (zero-length, cancelling normals, ...). Distinct from
    /// `contractions_dropped`: a surfel can lose one neighbor's
    /// contribution here and still go on to form a perfectly good
    /// contraction with its other neighbors.
    pub degenerate_quadric_contributions: usize,
}

impl Display for ReductionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---Reduction Stats---")?;
        writeln!(f, "Initialization      : {:?}", self.init_time)?;
        writeln!(f, "Contraction         : {:?}", self.contraction_time)?;
        writeln!(f, "---------------------")?;
        writeln!(f, "Total time          : {:?}", self.total_time)?;
        writeln!(f, "Contractions done   : {}", self.contractions_performed)?;
        writeln!(f, "Contractions dropped: {}", self.contractions_dropped)?;
        writeln!(f, "Degenerate edges    : {}", self.degenerate_quadric_contributions)
    }
}

/// Reads the current surfel stored for `id` across the per-node vectors,
/// including the output node, which grows over the course of the loop.
fn read_current(node_surfels: &[Vec<Surfel>], id: SurfelId) -> Surfel {
    node_surfels[id.node][id.index]
}

/// Reduces the union of `input`'s surfels down to at most
/// `params.target_count` surfels via greedy pair contraction, ordered by
/// ascending quadric error.
///
/// Returns the compacted output surfels, the summary `reduction_error`
/// (the sum of realized contraction errors), and [`ReductionStats`].
///
/// # Errors
/// Returns [`ReductionError::InvalidInput`] if `input` is empty, if
/// `params.target_count()` is not strictly less than the total input
/// surfel count, or if `params.neighbors()` is zero.
pub fn create_lod(input: &[SurfelNode], params: ReductionParams) -> Result<(Vec<Surfel>, Real, ReductionStats)> {
    let fan_in = input.len();
    if fan_in == 0 {
        return Err(ReductionError::InvalidInput(
            "input fan-in must be non-empty".into(),
        ));
    }

    let total_count: usize = input.iter().map(SurfelNode::length).sum();
    if params.target_count >= total_count {
        return Err(ReductionError::InvalidInput(format!(
            "target_count ({}) must be strictly less than total input surfel count ({})",
            params.target_count, total_count
        )));
    }
    if params.neighbors == 0 {
        return Err(ReductionError::InvalidInput(
            "neighbors (k) must be greater than zero".into(),
        ));
    }

    let start = Instant::now();
    info!(
        "BEGIN surfel reduction: {total_count} -> {} surfels ({fan_in} input nodes, k={})",
        params.target_count, params.neighbors
    );

    let out_node = fan_in;
    let num_to_contract = total_count - params.target_count;

    // node_surfels[0..fan_in] mirror the inputs (mutated in place to mark
    // removed endpoints); node_surfels[out_node] accumulates newly created
    // merged surfels, appended rather than pre-sized so early termination
    // never leaves default-constructed gaps behind.
    let mut node_surfels: Vec<Vec<Surfel>> = input.iter().map(|n| n.as_slice().to_vec()).collect();
    node_surfels.push(Vec::with_capacity(num_to_contract));

    let mut quadrics: FxHashMap<SurfelId, Mat4> = FxHashMap::default();
    let mut edges: FxHashSet<Edge> = FxHashSet::default();
    let mut dropped = 0usize;
    let mut degenerate_quadric_contributions = 0usize;

    for node_idx in 0..fan_in {
        for surfel_idx in 0..input[node_idx].length() {
            let curr_id = SurfelId::new(node_idx, surfel_idx);
            let curr_surfel = input[node_idx].read_surfel(surfel_idx);

            let neighbors = local_nearest_neighbors(input, curr_id, params.neighbors);
            let mut quadric_sum = Mat4::zero();

            for (neighbor_id, _sq_dist) in &neighbors {
                edges.insert(Edge::new(curr_id, *neighbor_id));

                let neighbor_surfel = input[neighbor_id.node].read_surfel(neighbor_id.index);
                match edge_quadric(curr_surfel.position, curr_surfel.normal, neighbor_surfel.position, neighbor_surfel.normal) {
                    Some(q) => quadric_sum = quadric_sum + q,
                    None => degenerate_quadric_contributions += 1,
                }
            }

            quadrics.insert(curr_id, quadric_sum);
        }
    }

    let mut index = ContractionIndex::new();
    let mut queue = ContractionQueue::new();

    for edge in &edges {
        if index.has_edge(edge.a, edge.b) {
            continue;
        }
        let s_a = read_current(&node_surfels, edge.a);
        let s_b = read_current(&node_surfels, edge.b);
        let q_a = *quadrics.get(&edge.a).expect("every live surfel has a quadric");
        let q_b = *quadrics.get(&edge.b).expect("every live surfel has a quadric");

        match build_contraction(*edge, s_a, q_a, s_b, q_b) {
            Some(c) => {
                let handle = index.insert(c);
                queue.push(handle, c.error);
            }
            None => dropped += 1,
        }
    }

    debug!(
        "initialization done: {} surfels, {} candidate edges, {} queued contractions, {} degenerate edge quadrics",
        total_count,
        edges.len(),
        queue.len(),
        degenerate_quadric_contributions,
    );
    let init_time = start.elapsed();

    let progress = if params.log_progress {
        let bar = ProgressBar::new(num_to_contract as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {human_pos}/{human_len} ({eta})",
            )
            .unwrap()
            .progress_chars("#>-"),
        );
        Some(bar)
    } else {
        None
    };

    let loop_start = Instant::now();
    let mut contractions_performed = 0usize;
    let mut reduction_error: Real = 0.0;
    let mut step_size = STEP_SIZE;
    let mut next_goal = step_size;

    for i in 0..num_to_contract {
        let (handle, _error) = match queue.pop_min() {
            Some(entry) => entry,
            None => {
                warn!(
                    "contraction queue emptied after {i} of {num_to_contract} contractions; \
                     returning {} surfels live",
                    total_count - contractions_performed
                );
                break;
            }
        };

        let contraction: Contraction = *index.contraction(handle);
        let Edge { a: old_a, b: old_b } = contraction.edge;

        let new_id = SurfelId::new(out_node, node_surfels[out_node].len());
        node_surfels[out_node].push(contraction.new_surfel);

        node_surfels[old_a.node][old_a.index] = node_surfels[old_a.node][old_a.index].removed();
        node_surfels[old_b.node][old_b.index] = node_surfels[old_b.node][old_b.index].removed();

        quadrics.insert(new_id, contraction.merged_quadric);
        quadrics.remove(&old_a);
        quadrics.remove(&old_b);

        reduction_error += contraction.error;
        contractions_performed += 1;

        debug!("=> contracting edge {old_a:?}--{old_b:?} into {new_id:?} (error={:.6})", contraction.error);

        // Rewire neighborhood: endpoint a first, reusing each neighbor's
        // queue slot in place.
        let mut adopted: FxHashSet<SurfelId> = FxHashSet::default();
        for (neighbor, h) in index.take_neighbors(old_a) {
            if neighbor == old_b {
                // this is the contraction just performed; its slot was
                // already popped from the queue, nothing left to retire.
                continue;
            }
            index.remove_mirror(neighbor, old_a);

            let s_nb = read_current(&node_surfels, neighbor);
            let q_nb = *quadrics.get(&neighbor).expect("every live surfel has a quadric");
            let new_edge = Edge::new(new_id, neighbor);

            match build_contraction(new_edge, contraction.new_surfel, contraction.merged_quadric, s_nb, q_nb) {
                Some(c) => {
                    index.rekey(old_a, new_id, neighbor, h, c);
                    queue.rekey(h, c.error);
                    adopted.insert(neighbor);
                }
                None => {
                    queue.invalidate(h);
                    dropped += 1;
                }
            }
        }

        // Endpoint b: any neighbor already adopted via a is a duplicate
        // proposal — discard it and invalidate its (now-orphaned) slot.
        for (neighbor, h) in index.take_neighbors(old_b) {
            if neighbor == old_a {
                continue;
            }
            if adopted.contains(&neighbor) {
                index.remove_mirror(neighbor, old_b);
                queue.invalidate(h);
                continue;
            }
            index.remove_mirror(neighbor, old_b);

            let s_nb = read_current(&node_surfels, neighbor);
            let q_nb = *quadrics.get(&neighbor).expect("every live surfel has a quadric");
            let new_edge = Edge::new(new_id, neighbor);

            match build_contraction(new_edge, contraction.new_surfel, contraction.merged_quadric, s_nb, q_nb) {
                Some(c) => {
                    index.rekey(old_b, new_id, neighbor, h, c);
                    queue.rekey(h, c.error);
                }
                None => {
                    queue.invalidate(h);
                    dropped += 1;
                }
            }
        }

        #[cfg(debug_assertions)]
        index.check_consistency()?;

        if let Some(bar) = &progress {
            bar.inc(1);
        }
        let done = (i + 1) as f64 / num_to_contract as f64 * 100.0;
        if done >= next_goal {
            info!("progress: {done:.2}%, contractions: {contractions_performed}, dropped: {dropped}");
            if done >= 95.0 {
                step_size = 0.5;
            }
            next_goal += step_size;
        }
    }

    if let Some(bar) = progress {
        bar.finish_with_message("done contracting surfels");
    }

    let contraction_time = loop_start.elapsed();

    let mut output = Vec::with_capacity(params.target_count.max(contractions_performed));
    for node in &node_surfels {
        for &surfel in node {
            if surfel.is_live() {
                output.push(surfel);
            }
        }
    }

    let stats = ReductionStats {
        init_time,
        contraction_time,
        total_time: start.elapsed(),
        contractions_performed,
        contractions_dropped: dropped,
        degenerate_quadric_contributions,
    };

    info!("{stats}");
    if params.log_progress {
        println!("{stats}");
    }

    Ok((output, reduction_error, stats))
}
