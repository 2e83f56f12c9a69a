use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::solver::heuristic::{Evaluation, Heuristic};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    Bfs,
    Dfs,
    AStar,
    WeightedAStar(u32),
    Greedy,
}

impl Strategy {
    /// `None` for the uninformed strategies.
    pub fn evaluation(self) -> Option<Evaluation> {
        match self {
            Strategy::Bfs | Strategy::Dfs => None,
            Strategy::AStar => Some(Evaluation::AStar),
            Strategy::WeightedAStar(w) => Some(Evaluation::WeightedAStar(w)),
            Strategy::Greedy => Some(Evaluation::Greedy),
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Strategy::Bfs => write!(f, "bfs"),
            Strategy::Dfs => write!(f, "dfs"),
            Strategy::AStar => write!(f, "astar"),
            Strategy::WeightedAStar(w) => write!(f, "wastar-{}", w),
            Strategy::Greedy => write!(f, "greedy"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeuristicKind {
    GoalCount,
    BoxDistance,
    MovePenalty,
}

impl Display for HeuristicKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            HeuristicKind::GoalCount => write!(f, "goal count"),
            HeuristicKind::BoxDistance => write!(f, "box distance"),
            HeuristicKind::MovePenalty => write!(f, "move penalty"),
        }
    }
}

impl FromStr for HeuristicKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "goal-count" => Ok(HeuristicKind::GoalCount),
            "box-distance" => Ok(HeuristicKind::BoxDistance),
            "move-penalty" => Ok(HeuristicKind::MovePenalty),
            _ => Err(format!("Unknown heuristic: {}", s)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuccessorOrder {
    /// Agent 0's action changes fastest, each agent's actions in catalog order.
    Fixed,
    /// The fixed order shuffled by a generator seeded once per search.
    Shuffled { seed: u64 },
}

impl Display for SuccessorOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            SuccessorOrder::Fixed => write!(f, "fixed"),
            SuccessorOrder::Shuffled { seed } => write!(f, "shuffled (seed {})", seed),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub strategy: Strategy,
    pub heuristic: HeuristicKind,
    pub successor_order: SuccessorOrder,
    /// Give up after creating this many states.
    pub max_states: Option<u64>,
    /// Give up when resident memory exceeds this many MiB.
    pub memory_limit: Option<u64>,
    /// Expansions between progress reports and memory checks.
    pub progress_interval: u64,
    pub print_status: bool,
}

impl SearchConfig {
    pub fn new(strategy: Strategy) -> Self {
        SearchConfig {
            strategy,
            ..SearchConfig::default()
        }
    }

    /// `None` for the uninformed strategies.
    pub fn heuristic(&self) -> Option<Heuristic> {
        self.strategy
            .evaluation()
            .map(|evaluation| Heuristic::new(self.heuristic, evaluation))
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            strategy: Strategy::Bfs,
            heuristic: HeuristicKind::GoalCount,
            successor_order: SuccessorOrder::Shuffled { seed: 1 },
            max_states: None,
            memory_limit: None,
            progress_interval: 10_000,
            print_status: false,
        }
    }
}

impl Display for SearchConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.strategy)?;
        if self.strategy.evaluation().is_some() {
            write!(f, " ({})", self.heuristic)?;
        }
        write!(f, ", {} successors", self.successor_order)
    }
}
