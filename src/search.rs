//! A* search over the squares of a [`Map`].
//!
//! Nodes live in a dense arena indexed like the map itself, parents are arena
//! indices. Closed nodes are never reopened.

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    error,
    fmt::Display,
};

use log::{debug, warn};

use crate::{
    heuristic::Heuristic,
    map::{Map, Position},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    PositionOutsideMap(Position),
    IterationCapExceeded(usize),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::PositionOutsideMap(pos) => {
                write!(f, "Position {} is outside of the map.", pos)
            }
            SearchError::IterationCapExceeded(cap) => write!(
                f,
                "Search expanded more than {} node(s), which is more than the map has.",
                cap
            ),
        }
    }
}

impl error::Error for SearchError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum NodeState {
    #[default]
    Unseen,
    Open,
    Closed,
}

#[derive(Debug, Clone, Default)]
struct Node {
    state: NodeState,
    g: usize,
    h: f64,
    parent: Option<usize>,
}

impl Node {
    fn f(&self) -> f64 {
        self.g as f64 + self.h
    }
}

// Lower f first, then the earlier pushed one.
#[derive(Debug)]
struct OpenEntry {
    f: f64,
    order: usize,
    ind: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .total_cmp(&other.f)
            .then_with(|| self.order.cmp(&other.order))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

#[derive(Debug, Clone)]
pub struct SearchReport {
    path: Option<Vec<Position>>,
    expanded_n: usize,
}

impl SearchReport {
    /// Found path including both ends.
    pub fn path(&self) -> Option<&[Position]> {
        self.path.as_deref()
    }

    pub fn into_path(self) -> Option<Vec<Position>> {
        self.path
    }

    pub fn steps_n(&self) -> Option<usize> {
        self.path.as_ref().map(|path| path.len() - 1)
    }

    pub fn expanded_n(&self) -> usize {
        self.expanded_n
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PathFinder<'a> {
    map: &'a Map,
    heuristic: Heuristic,
}

impl<'a> PathFinder<'a> {
    pub fn new(map: &'a Map, heuristic: Heuristic) -> Self {
        Self { map, heuristic }
    }

    pub fn search(&self, from: &Position, to: &Position) -> Result<SearchReport, SearchError> {
        let start_ind = self
            .map
            .pos_to_ind(from)
            .ok_or(SearchError::PositionOutsideMap(*from))?;
        let goal_ind = self
            .map
            .pos_to_ind(to)
            .ok_or(SearchError::PositionOutsideMap(*to))?;

        let iteration_cap = self.map.cell_n();
        let mut nodes = vec![Node::default(); iteration_cap];
        let mut open_entries = BinaryHeap::new();
        let mut pushed_n = 0;
        if self.map.elevation(from).is_some_and(|elev| elev.is_passable()) {
            let start_node = &mut nodes[start_ind];
            start_node.state = NodeState::Open;
            start_node.h = self.heuristic.estimate(from, to);
            open_entries.push(Reverse(OpenEntry {
                f: start_node.f(),
                order: pushed_n,
                ind: start_ind,
            }));
            pushed_n += 1;
        }

        let mut expanded_n = 0;
        while let Some(Reverse(entry)) = open_entries.pop() {
            let cur_ind = entry.ind;
            // An improved node is pushed again, its older entry pops after it got closed.
            if nodes[cur_ind].state != NodeState::Open {
                continue;
            }

            expanded_n += 1;
            if expanded_n > iteration_cap {
                warn!(
                    "Search from {} to {} expanded more than {} node(s).",
                    from, to, iteration_cap
                );
                return Err(SearchError::IterationCapExceeded(iteration_cap));
            }
            nodes[cur_ind].state = NodeState::Closed;

            if cur_ind == goal_ind {
                let path = self.reconstruct_path(&nodes, goal_ind);
                debug!(
                    "Found path of {} step(s) from {} to {} after expanding {} node(s).",
                    path.len() - 1,
                    from,
                    to,
                    expanded_n
                );
                return Ok(SearchReport {
                    path: Some(path),
                    expanded_n,
                });
            }

            let cur_pos = self.map.ind_to_pos(cur_ind);
            let next_g = nodes[cur_ind].g + 1;
            for next_pos in self.map.next_positions(&cur_pos) {
                let Some(next_ind) = self.map.pos_to_ind(&next_pos) else {
                    continue;
                };
                let next_node = &mut nodes[next_ind];
                match next_node.state {
                    NodeState::Closed => continue,
                    NodeState::Open if next_g >= next_node.g => continue,
                    NodeState::Open => (),
                    NodeState::Unseen => {
                        next_node.state = NodeState::Open;
                        next_node.h = self.heuristic.estimate(&next_pos, to);
                    }
                }

                next_node.g = next_g;
                next_node.parent = Some(cur_ind);
                open_entries.push(Reverse(OpenEntry {
                    f: next_node.f(),
                    order: pushed_n,
                    ind: next_ind,
                }));
                pushed_n += 1;
            }
        }

        debug!(
            "No path from {} to {} after expanding {} node(s).",
            from, to, expanded_n
        );
        Ok(SearchReport {
            path: None,
            expanded_n,
        })
    }

    fn reconstruct_path(&self, nodes: &[Node], goal_ind: usize) -> Vec<Position> {
        let mut path = vec![self.map.ind_to_pos(goal_ind)];
        let mut cur_ind = goal_ind;
        while let Some(parent_ind) = nodes[cur_ind].parent {
            path.push(self.map.ind_to_pos(parent_ind));
            cur_ind = parent_ind;
        }
        path.reverse();

        path
    }
}
