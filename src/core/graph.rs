//! The target dependency graph.
//!
//! Edge `A -> B` means "A depends on B". Construction resolves every
//! dependency spelling against the declared target set; unresolved
//! references are collected instead of short-circuiting so `check` can
//! report all of them, each with a nearest-name suggestion.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::core::address::Address;
use crate::core::workspace::Workspace;

/// A dependency reference that did not resolve to a declared target.
#[derive(Debug, Clone)]
pub struct UnresolvedDep {
    /// The declaring target
    pub from: Address,
    /// The spelling as written in the build file
    pub spec: String,
    /// Parse error, when the spelling itself was malformed
    pub parse_error: Option<String>,
    /// Closest declared address, when one is plausible
    pub suggestion: Option<Address>,
}

/// Directed dependency graph over declared addresses.
#[derive(Debug)]
pub struct TargetGraph {
    graph: DiGraph<Address, ()>,
    nodes: BTreeMap<Address, NodeIndex>,
    unresolved: Vec<UnresolvedDep>,
}

impl TargetGraph {
    /// Build the graph for a scanned workspace.
    pub fn build(ws: &Workspace) -> Self {
        let mut graph = DiGraph::new();
        let mut nodes = BTreeMap::new();

        for (address, _) in ws.targets() {
            let idx = graph.add_node(address);
            nodes.insert(address, idx);
        }

        let mut unresolved = Vec::new();
        for bf in ws.build_files() {
            for (from, target) in bf.addressed_targets() {
                for spec in &target.dependencies {
                    match Address::parse_spec(spec, bf.dir()) {
                        Ok(to) => {
                            if let Some(&to_idx) = nodes.get(&to) {
                                graph.update_edge(nodes[&from], to_idx, ());
                            } else {
                                unresolved.push(UnresolvedDep {
                                    from,
                                    spec: spec.clone(),
                                    parse_error: None,
                                    suggestion: nearest_address(&nodes, &to),
                                });
                            }
                        }
                        Err(e) => unresolved.push(UnresolvedDep {
                            from,
                            spec: spec.clone(),
                            parse_error: Some(e.to_string()),
                            suggestion: None,
                        }),
                    }
                }
            }
        }

        TargetGraph {
            graph,
            nodes,
            unresolved,
        }
    }

    /// Whether `address` is a declared target.
    pub fn contains(&self, address: &Address) -> bool {
        self.nodes.contains_key(address)
    }

    /// Dependency references that failed to resolve.
    pub fn unresolved(&self) -> &[UnresolvedDep] {
        &self.unresolved
    }

    /// Direct dependencies of `address`, sorted.
    pub fn deps(&self, address: &Address) -> Vec<Address> {
        self.neighbors(address, Direction::Outgoing)
    }

    /// Direct dependents of `address`, sorted.
    pub fn rdeps(&self, address: &Address) -> Vec<Address> {
        self.neighbors(address, Direction::Incoming)
    }

    /// Transitive dependency closure of `address`, sorted, excluding itself.
    pub fn transitive_deps(&self, address: &Address) -> Vec<Address> {
        self.closure(address, Direction::Outgoing)
    }

    /// Transitive dependent closure of `address`, sorted, excluding itself.
    pub fn transitive_rdeps(&self, address: &Address) -> Vec<Address> {
        self.closure(address, Direction::Incoming)
    }

    /// Dependency cycles, one concrete path per strongly connected
    /// component, rotated so the smallest address comes first.
    pub fn cycles(&self) -> Vec<Vec<Address>> {
        let mut cycles = Vec::new();

        for scc in kosaraju_scc(&self.graph) {
            let is_cycle = scc.len() > 1
                || (scc.len() == 1 && self.graph.contains_edge(scc[0], scc[0]));
            if !is_cycle {
                continue;
            }

            let mut members: Vec<Address> =
                scc.iter().map(|&idx| self.graph[idx]).collect();
            members.sort();

            let set: BTreeSet<Address> = members.iter().copied().collect();
            cycles.push(self.cycle_through(members[0], &set));
        }

        cycles.sort();
        cycles
    }

    fn neighbors(&self, address: &Address, dir: Direction) -> Vec<Address> {
        let Some(&idx) = self.nodes.get(address) else {
            return Vec::new();
        };
        let mut out: Vec<Address> = self
            .graph
            .neighbors_directed(idx, dir)
            .map(|n| self.graph[n])
            .collect();
        out.sort();
        out
    }

    /// Shortest cycle through `start` using only edges inside `set`.
    ///
    /// Every member of a strongly connected component lies on at least one
    /// cycle, so the breadth-first search always closes back to `start`;
    /// every consecutive hop in the returned path is a real edge.
    fn cycle_through(&self, start: Address, set: &BTreeSet<Address>) -> Vec<Address> {
        if self.deps(&start).contains(&start) {
            return vec![start];
        }

        let mut parent: BTreeMap<Address, Address> = BTreeMap::new();
        let mut queue = VecDeque::new();
        for next in self.deps(&start) {
            if set.contains(&next) && !parent.contains_key(&next) {
                parent.insert(next, start);
                queue.push_back(next);
            }
        }

        while let Some(node) = queue.pop_front() {
            for next in self.deps(&node) {
                if next == start {
                    let mut path = vec![node];
                    let mut current = node;
                    while current != start {
                        current = parent[&current];
                        path.push(current);
                    }
                    path.reverse();
                    return path;
                }
                if set.contains(&next) && !parent.contains_key(&next) {
                    parent.insert(next, node);
                    queue.push_back(next);
                }
            }
        }

        vec![start]
    }

    fn closure(&self, address: &Address, dir: Direction) -> Vec<Address> {
        let Some(&start) = self.nodes.get(address) else {
            return Vec::new();
        };
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([start]);
        while let Some(idx) = queue.pop_front() {
            for next in self.graph.neighbors_directed(idx, dir) {
                if seen.insert(self.graph[next]) {
                    queue.push_back(next);
                }
            }
        }
        seen.remove(address);
        seen.into_iter().collect()
    }
}

/// Find the closest declared address to a missing one.
///
/// Prefers targets in the same directory with a similar name; falls back
/// to a same-named target in another directory (a likely stale path).
fn nearest_address(nodes: &BTreeMap<Address, NodeIndex>, missing: &Address) -> Option<Address> {
    let mut best: Option<(usize, Address)> = None;
    for candidate in nodes.keys() {
        if candidate.dir() == missing.dir() {
            let distance = edit_distance(candidate.name(), missing.name());
            if distance <= 2 && best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, *candidate));
            }
        }
    }
    if best.is_none() {
        best = nodes
            .keys()
            .find(|c| c.name() == missing.name())
            .map(|c| (0, *c));
    }
    best.map(|(_, addr)| addr)
}

fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    for (i, &ca) in a.iter().enumerate() {
        let mut row = vec![i + 1];
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            row.push((prev[j] + cost).min(prev[j + 1] + 1).min(row[j] + 1));
        }
        prev = row;
    }
    prev[b.len()]
}
