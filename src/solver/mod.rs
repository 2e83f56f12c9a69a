pub mod frontier;
pub mod heuristic;
pub mod stats;

use std::fmt::{self, Debug, Display, Formatter};
use std::time::{Duration, Instant};

use fnv::FnvHashSet;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use separator::Separatable;
use typed_arena::Arena;

use crate::config::{SearchConfig, Strategy, SuccessorOrder};
use crate::level::Level;
use crate::memory;
use crate::plan::Plan;
use crate::state::State;
use crate::Solve;

use self::frontier::Frontier;
use self::stats::Stats;

/// Which budget ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    States(u64),
    /// MiB
    Memory(u64),
}

impl Display for Limit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Limit::States(n) => write!(f, "needed more than {} states", n.separated_string()),
            Limit::Memory(mib) => write!(f, "more than {} MiB of memory used", mib.separated_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Solved(Plan),
    /// Every reachable state was expanded without finding a goal.
    Unsolvable,
    ResourceExhausted(Limit),
}

pub struct SolverOk {
    pub outcome: Outcome,
    pub stats: Stats,
    pub elapsed: Duration,
    pub(crate) search_name: String,
}

impl SolverOk {
    fn new(outcome: Outcome, stats: Stats, elapsed: Duration, search_name: String) -> Self {
        Self {
            outcome,
            stats,
            elapsed,
            search_name,
        }
    }

    pub fn plan(&self) -> Option<&Plan> {
        match self.outcome {
            Outcome::Solved(ref plan) => Some(plan),
            _ => None,
        }
    }
}

impl Debug for SolverOk {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.outcome {
            Outcome::Solved(ref plan) => writeln!(f, "{}: {}", self.search_name, plan.len())?,
            Outcome::Unsolvable => writeln!(f, "No solution")?,
            Outcome::ResourceExhausted(limit) => writeln!(f, "Gave up: {}", limit)?,
        }
        write!(f, "{:?}", self.stats)
    }
}

impl Solve for Level {
    fn solve(&self, config: &SearchConfig) -> SolverOk {
        search(self, config)
    }
}

pub fn search(level: &Level, config: &SearchConfig) -> SolverOk {
    // declared first so it outlives everything pointing into it
    let arena = Arena::new();

    let mut frontier = match config.heuristic() {
        Some(heuristic) => Frontier::best_first(heuristic),
        None if config.strategy == Strategy::Dfs => Frontier::dfs(),
        None => Frontier::bfs(),
    };
    let search_name = frontier.name();
    debug!("Search called: {}, {}", search_name, config);

    let mut rng = match config.successor_order {
        SuccessorOrder::Fixed => None,
        SuccessorOrder::Shuffled { seed } => Some(StdRng::seed_from_u64(seed)),
    };
    let progress_interval = config.progress_interval.max(1);

    let started = Instant::now();
    let mut stats = Stats::new();
    let mut explored = FnvHashSet::default();

    // a state is only created while the budget has room for it,
    // so at most `max_states` ever exist
    let outcome = if config.max_states == Some(0) {
        Outcome::ResourceExhausted(Limit::States(0))
    } else {
        let initial: &State<'_> = arena.alloc(level.initial_state());
        stats.add_created(initial);
        frontier.add(initial);

        let mut iterations: u64 = 0;
        'search: loop {
            if iterations > 0 && iterations % progress_interval == 0 {
                let kib = memory::resident_kib();
                if config.print_status {
                    log_progress(explored.len(), frontier.len(), started, kib);
                }
                if let Some(limit) = memory_exceeded(config.memory_limit, kib) {
                    break Outcome::ResourceExhausted(limit);
                }
            }
            iterations += 1;

            let cur = match frontier.pop() {
                Some(state) => state,
                None => break Outcome::Unsolvable,
            };

            if cur.is_goal() {
                debug!("Solved at depth {}, extracting plan", cur.g());
                break Outcome::Solved(cur.extract_plan());
            }

            explored.insert(cur);
            if stats.add_expanded(cur) && config.print_status {
                debug!("Expanding new depth: {}", cur.g());
            }

            let children = match rng {
                Some(ref mut rng) => cur.expand_shuffled(rng),
                None => cur.expand(),
            };
            for child in children {
                if explored.contains(&child) || frontier.contains(&child) {
                    stats.add_reached_duplicate(&child);
                    continue;
                }
                if let Some(max_states) = config.max_states {
                    if stats.total_created() >= max_states {
                        break 'search Outcome::ResourceExhausted(Limit::States(max_states));
                    }
                }
                let child: &State<'_> = arena.alloc(child);
                stats.add_created(child);
                frontier.add(child);

                // one expansion can create a huge number of states
                if config.memory_limit.is_some() && stats.total_created() % progress_interval == 0 {
                    if let Some(limit) = memory_exceeded(config.memory_limit, memory::resident_kib()) {
                        break 'search Outcome::ResourceExhausted(limit);
                    }
                }
            }
        }
    };

    if config.print_status {
        log_progress(explored.len(), frontier.len(), started, memory::resident_kib());
    }
    SolverOk::new(outcome, stats, started.elapsed(), search_name)
}

fn memory_exceeded(limit: Option<u64>, kib: Option<u64>) -> Option<Limit> {
    match (limit, kib) {
        (Some(limit), Some(kib)) if kib / 1024 > limit => Some(Limit::Memory(limit)),
        _ => None,
    }
}

fn log_progress(explored: usize, frontier: usize, started: Instant, kib: Option<u64>) {
    info!(
        "#Expanded: {:>11}, #Frontier: {:>11}, #Generated: {:>11}, Time: {:>8.3} s, Memory: {}",
        explored.separated_string(),
        frontier.separated_string(),
        (explored + frontier).separated_string(),
        started.elapsed().as_secs_f64(),
        memory::format_mib(kib),
    );
}
