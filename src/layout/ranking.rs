use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::model::{FlowEdge, Scene};

/// Dependency index over scene ids, built once per layout call.
///
/// Scenes occupy slots `0..scene_count` in document order; ids that only
/// appear on edges are appended after them in the order they are met.
pub(super) struct DependencyIndex<'a> {
    ids: Vec<&'a str>,
    scene_count: usize,
    parents: Vec<Vec<usize>>,
    children: Vec<Vec<usize>>,
    indegree: Vec<usize>,
}

impl<'a> DependencyIndex<'a> {
    pub(super) fn build(scenes: &'a [Scene], edges: &'a [FlowEdge]) -> Self {
        let mut index = DependencyIndex {
            ids: Vec::with_capacity(scenes.len()),
            scene_count: 0,
            parents: Vec::with_capacity(scenes.len()),
            children: Vec::with_capacity(scenes.len()),
            indegree: Vec::with_capacity(scenes.len()),
        };
        let mut lookup: HashMap<&'a str, usize> = HashMap::new();
        for scene in scenes {
            index.intern(&mut lookup, scene.id.as_str());
        }
        index.scene_count = index.ids.len();

        for edge in edges {
            let from = index.intern(&mut lookup, edge.from.as_str());
            let to = index.intern(&mut lookup, edge.to.as_str());
            index.indegree[to] += 1;
            index.parents[to].push(from);
            index.children[from].push(to);
        }
        index
    }

    fn intern(&mut self, lookup: &mut HashMap<&'a str, usize>, id: &'a str) -> usize {
        if let Some(&slot) = lookup.get(id) {
            return slot;
        }
        let slot = self.ids.len();
        lookup.insert(id, slot);
        self.ids.push(id);
        self.parents.push(Vec::new());
        self.children.push(Vec::new());
        self.indegree.push(0);
        slot
    }

    pub(super) fn scene_count(&self) -> usize {
        self.scene_count
    }

    pub(super) fn id(&self, slot: usize) -> &'a str {
        self.ids[slot]
    }

    pub(super) fn parents(&self, slot: usize) -> &[usize] {
        &self.parents[slot]
    }

    pub(super) fn children(&self, slot: usize) -> &[usize] {
        &self.children[slot]
    }
}

/// Longest-path level per slot via breadth-first relaxation.
///
/// Every slot with no incoming edge seeds the queue; a fully cyclic graph
/// seeds from the first scene instead. A slot is expanded at most once and
/// is queued when its remaining in-degree reaches zero, so every edge is
/// consumed once and cycles terminate. Slots never reached stay at 0.
pub(super) fn compute_levels(index: &DependencyIndex<'_>) -> Vec<usize> {
    let slots = index.ids.len();
    let mut remaining = index.indegree.clone();
    let mut level: Vec<Option<usize>> = vec![None; slots];
    let mut expanded = vec![false; slots];
    let mut queue: VecDeque<usize> = (0..slots).filter(|&slot| remaining[slot] == 0).collect();
    if queue.is_empty() && index.scene_count > 0 {
        queue.push_back(0);
    }
    for &slot in &queue {
        level[slot] = Some(0);
    }

    while let Some(slot) = queue.pop_front() {
        if std::mem::replace(&mut expanded[slot], true) {
            continue;
        }
        let next_level = level[slot].unwrap_or(0) + 1;
        for &child in index.children(slot) {
            if level[child].is_none_or(|current| current < next_level) {
                level[child] = Some(next_level);
            }
            if remaining[child] > 0 {
                remaining[child] -= 1;
                if remaining[child] == 0 {
                    queue.push_back(child);
                }
            }
        }
    }

    level.into_iter().map(|lv| lv.unwrap_or(0)).collect()
}

/// Scene slots grouped by level, each group in document order.
pub(super) fn group_levels(
    index: &DependencyIndex<'_>,
    levels: &[usize],
) -> BTreeMap<usize, Vec<usize>> {
    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for slot in 0..index.scene_count() {
        groups.entry(levels[slot]).or_default().push(slot);
    }
    groups
}

fn respace(group: &[usize], order: &mut [f64], gap: f64) {
    for (idx, &slot) in group.iter().enumerate() {
        order[slot] = idx as f64 * gap;
    }
}

fn mean_or(neighbors: &[usize], order: &[f64], fallback: f64) -> f64 {
    if neighbors.is_empty() {
        return fallback;
    }
    neighbors.iter().map(|&n| order[n]).sum::<f64>() / neighbors.len() as f64
}

fn sort_group_by_neighbors<'n>(
    group: &mut [usize],
    order: &[f64],
    neighbors: impl Fn(usize) -> &'n [usize],
) {
    let keys: HashMap<usize, f64> = group
        .iter()
        .map(|&slot| (slot, mean_or(neighbors(slot), order, order[slot])))
        .collect();
    group.sort_by(|a, b| keys[a].total_cmp(&keys[b]));
}

/// Provisional spacing followed by a downward sweep toward parents and an
/// upward sweep toward children. Returns the vertical position per slot.
pub(super) fn order_levels(
    index: &DependencyIndex<'_>,
    groups: &mut BTreeMap<usize, Vec<usize>>,
    gap: f64,
) -> Vec<f64> {
    let mut order = vec![0.0; index.ids.len()];
    for group in groups.values() {
        respace(group, &mut order, gap);
    }

    for group in groups.values_mut() {
        sort_group_by_neighbors(group, &order, |slot| index.parents(slot));
        respace(group, &mut order, gap);
    }
    for group in groups.values_mut().rev() {
        sort_group_by_neighbors(group, &order, |slot| index.children(slot));
        respace(group, &mut order, gap);
    }
    order
}

fn push_apart(group: &mut [usize], order: &mut [f64], min_gap: f64) {
    group.sort_by(|a, b| order[*a].total_cmp(&order[*b]));
    let mut cursor: Option<f64> = None;
    for &slot in group.iter() {
        let target = match cursor {
            None => order[slot],
            Some(prev) => order[slot].max(prev + min_gap),
        };
        order[slot] = target;
        cursor = Some(target);
    }
}

/// Enforce `min_gap` inside each level and centre each level around zero.
pub(super) fn resolve_level_collisions(
    groups: &mut BTreeMap<usize, Vec<usize>>,
    order: &mut [f64],
    min_gap: f64,
) {
    for group in groups.values_mut() {
        if group.is_empty() {
            continue;
        }
        push_apart(group, order, min_gap);
        let mean = group.iter().map(|&slot| order[slot]).sum::<f64>() / group.len() as f64;
        for &slot in group.iter() {
            order[slot] -= mean;
        }
        push_apart(group, order, min_gap);
    }
}
