use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use fnv::FnvHashMap;

use crate::solver::heuristic::Heuristic;
use crate::state::State;

/// States waiting to be expanded.
///
/// Keeps a count of every queued state so `contains` is a hash lookup
/// and queuing the same state twice doesn't break it.
#[derive(Debug)]
pub struct Frontier<'a> {
    store: Store<'a>,
    members: FnvHashMap<&'a State<'a>, u32>,
    added: u64,
}

#[derive(Debug)]
enum Store<'a> {
    Fifo(VecDeque<&'a State<'a>>),
    Lifo(Vec<&'a State<'a>>),
    BestFirst {
        heap: BinaryHeap<Entry<'a>>,
        heuristic: Heuristic,
    },
}

#[derive(Debug)]
struct Entry<'a> {
    f: u64,
    seq: u64,
    state: &'a State<'a>,
}

impl PartialEq for Entry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}

impl Eq for Entry<'_> {}

impl PartialOrd for Entry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // intentionally reversed for BinaryHeap, ties go to the older entry
        other.f.cmp(&self.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<'a> Frontier<'a> {
    fn with_store(store: Store<'a>) -> Self {
        Frontier {
            store,
            members: FnvHashMap::default(),
            added: 0,
        }
    }

    /// First in, first out.
    pub fn bfs() -> Self {
        Self::with_store(Store::Fifo(VecDeque::new()))
    }

    /// Last in, first out.
    pub fn dfs() -> Self {
        Self::with_store(Store::Lifo(Vec::new()))
    }

    /// Lowest `f` first.
    pub fn best_first(heuristic: Heuristic) -> Self {
        Self::with_store(Store::BestFirst {
            heap: BinaryHeap::new(),
            heuristic,
        })
    }

    pub fn add(&mut self, state: &'a State<'a>) {
        match self.store {
            Store::Fifo(ref mut queue) => queue.push_back(state),
            Store::Lifo(ref mut stack) => stack.push(state),
            Store::BestFirst {
                ref mut heap,
                ref heuristic,
            } => heap.push(Entry {
                f: heuristic.f(state),
                seq: self.added,
                state,
            }),
        }
        self.added += 1;
        *self.members.entry(state).or_insert(0) += 1;
    }

    pub fn pop(&mut self) -> Option<&'a State<'a>> {
        let state = match self.store {
            Store::Fifo(ref mut queue) => queue.pop_front(),
            Store::Lifo(ref mut stack) => stack.pop(),
            Store::BestFirst { ref mut heap, .. } => heap.pop().map(|entry| entry.state),
        }?;

        let remaining = self
            .members
            .get_mut(state)
            .map(|count| {
                *count -= 1;
                *count
            })
            .unwrap_or(0);
        if remaining == 0 {
            self.members.remove(state);
        }
        Some(state)
    }

    pub fn contains(&self, state: &State<'_>) -> bool {
        self.members.contains_key(state)
    }

    pub fn len(&self) -> usize {
        match self.store {
            Store::Fifo(ref queue) => queue.len(),
            Store::Lifo(ref stack) => stack.len(),
            Store::BestFirst { ref heap, .. } => heap.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn name(&self) -> String {
        match self.store {
            Store::Fifo(_) => "breadth-first search".to_string(),
            Store::Lifo(_) => "depth-first search".to_string(),
            Store::BestFirst { ref heuristic, .. } => {
                format!("best-first search using {}", heuristic)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeuristicKind;
    use crate::level::Level;
    use crate::solver::heuristic::Evaluation;

    const LEVEL: &str = r"#domain
hospital
#levelname
frontier
#colors
red: 0
#initial
+++++
+0  +
+   +
+++++
#goal
+++++
+   +
+ 0 +
+++++
#end
";

    fn all_frontiers<'a>() -> Vec<Frontier<'a>> {
        vec![
            Frontier::bfs(),
            Frontier::dfs(),
            Frontier::best_first(Heuristic::new(HeuristicKind::GoalCount, Evaluation::AStar)),
            Frontier::best_first(Heuristic::new(HeuristicKind::BoxDistance, Evaluation::Greedy)),
        ]
    }

    #[test]
    fn contains_follows_add_and_pop() {
        let level: Level = LEVEL.parse().unwrap();
        let initial = level.initial_state();
        for mut frontier in all_frontiers() {
            assert!(frontier.is_empty());
            assert!(!frontier.contains(&initial));

            frontier.add(&initial);
            assert!(frontier.contains(&initial));
            assert_eq!(frontier.len(), 1);

            let popped = frontier.pop().unwrap();
            assert_eq!(popped, &initial);
            assert!(!frontier.contains(&initial));
            assert!(frontier.is_empty());
            assert!(frontier.pop().is_none());
        }
    }

    #[test]
    fn contains_uses_equality() {
        let level: Level = LEVEL.parse().unwrap();
        let initial = level.initial_state();
        let copy = level.initial_state();
        for mut frontier in all_frontiers() {
            frontier.add(&initial);
            assert!(frontier.contains(&copy));

            // the same state twice stays a member until both are popped
            frontier.add(&copy);
            assert_eq!(frontier.len(), 2);
            frontier.pop();
            assert!(frontier.contains(&initial));
            frontier.pop();
            assert!(!frontier.contains(&initial));
        }
    }

    #[test]
    fn pop_order() {
        let level: Level = LEVEL.parse().unwrap();
        let initial = level.initial_state();
        let children: Vec<_> = initial.expand().collect();
        // NoOp, S, E
        assert_eq!(children.len(), 3);

        let mut bfs = Frontier::bfs();
        let mut dfs = Frontier::dfs();
        for child in &children {
            bfs.add(child);
            dfs.add(child);
        }
        for child in children.iter() {
            assert_eq!(bfs.pop().unwrap().agents(), child.agents());
        }
        for child in children.iter().rev() {
            assert_eq!(dfs.pop().unwrap().agents(), child.agents());
        }
    }

    #[test]
    fn best_first_ties_are_fifo() {
        let level: Level = LEVEL.parse().unwrap();
        let initial = level.initial_state();
        let children: Vec<_> = initial.expand().collect();
        let grandchildren: Vec<_> = children.iter().flat_map(|c| c.expand()).collect();

        let heuristic = Heuristic::new(HeuristicKind::GoalCount, Evaluation::AStar);
        let mut frontier = Frontier::best_first(heuristic);
        for state in &grandchildren {
            frontier.add(state);
        }
        frontier.add(&initial);

        // f = g + 1 for everything except the two grandchildren on the goal
        let solved: Vec<_> = grandchildren.iter().filter(|s| s.is_goal()).collect();
        assert_eq!(solved.len(), 2);
        assert_eq!(frontier.pop().unwrap(), &initial);
        assert!(ptr_eq(frontier.pop().unwrap(), solved[0]));
        assert!(ptr_eq(frontier.pop().unwrap(), solved[1]));

        let rest: Vec<_> = grandchildren.iter().filter(|s| !s.is_goal()).collect();
        for expected in rest {
            assert!(ptr_eq(frontier.pop().unwrap(), expected));
        }
        assert!(frontier.is_empty());
    }

    fn ptr_eq(a: &State<'_>, b: &State<'_>) -> bool {
        std::ptr::eq(a, b)
    }

    #[test]
    fn names() {
        assert_eq!(Frontier::bfs().name(), "breadth-first search");
        assert_eq!(Frontier::dfs().name(), "depth-first search");
        let heuristic = Heuristic::new(HeuristicKind::GoalCount, Evaluation::WeightedAStar(3));
        assert_eq!(
            Frontier::best_first(heuristic).name(),
            "best-first search using WA*(3) evaluation, goal count"
        );
    }
}
