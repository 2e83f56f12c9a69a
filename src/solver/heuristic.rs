use std::fmt::{self, Display, Formatter};

use crate::config::HeuristicKind;
use crate::data::Goal;
use crate::state::State;

/// How `g` and `h` combine into the ordering key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Evaluation {
    AStar,
    WeightedAStar(u32),
    Greedy,
}

impl Display for Evaluation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Evaluation::AStar => write!(f, "A* evaluation"),
            Evaluation::WeightedAStar(w) => write!(f, "WA*({}) evaluation", w),
            Evaluation::Greedy => write!(f, "greedy evaluation"),
        }
    }
}

/// Orders states for best-first search, lower is explored first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Heuristic {
    kind: HeuristicKind,
    evaluation: Evaluation,
}

impl Heuristic {
    pub fn new(kind: HeuristicKind, evaluation: Evaluation) -> Self {
        Heuristic { kind, evaluation }
    }

    /// Estimate of the remaining cost.
    pub fn h(&self, state: &State<'_>) -> u32 {
        match self.kind {
            HeuristicKind::GoalCount => state.unsatisfied_goals() as u32,
            HeuristicKind::BoxDistance => box_distance(state),
            HeuristicKind::MovePenalty => {
                // inadmissible
                state.unsatisfied_goals() as u32 + state.move_penalties().max(0) as u32
            }
        }
    }

    pub fn f(&self, state: &State<'_>) -> u64 {
        let g = u64::from(state.g());
        let h = u64::from(self.h(state));
        match self.evaluation {
            Evaluation::AStar => g + h,
            Evaluation::WeightedAStar(w) => g + u64::from(w) * h,
            Evaluation::Greedy => h,
        }
    }
}

impl Display for Heuristic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.evaluation, self.kind)
    }
}

/// Sum over unsatisfied goals of the distance to the nearest item that can satisfy them.
fn box_distance(state: &State<'_>) -> u32 {
    let mut sum = 0;
    for &(pos, goal) in state.map().goal_cells() {
        if state.satisfies(pos, goal) {
            continue;
        }
        sum += match goal {
            Goal::Agent(agent) => state.agents()[agent].dist(pos),
            Goal::Box(letter) => state
                .boxes()
                .iter()
                .filter(|&&(_, l)| l == letter)
                .map(|&(box_pos, _)| box_pos.dist(pos))
                .min()
                .unwrap_or(0),
        };
    }
    sum
}
