use std::error::Error;
use std::io::{self, Read};
use std::process;

use clap::{App, AppSettings, Arg, ArgGroup, ArgMatches, ErrorKind};
use env_logger::Env;
use log::{error, info};
use separator::Separatable;

use multi_sokoban_solver::client;
use multi_sokoban_solver::config::{HeuristicKind, SearchConfig, Strategy, SuccessorOrder};
use multi_sokoban_solver::level::Level;
use multi_sokoban_solver::solver::Outcome;
use multi_sokoban_solver::{LoadLevel, Solve};

const EXIT_UNSOLVED: i32 = 1;
const EXIT_BAD_INPUT: i32 = 2;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let matches = App::new("multi-sokoban-solver")
        .author("martin-t")
        .version("0.1")
        .about("Plans joint actions for colored agents pushing and pulling boxes onto goals")
        .setting(AppSettings::ColoredHelp)
        .arg(Arg::with_name("bfs").long("bfs").help("Breadth-first search (default)"))
        .arg(Arg::with_name("dfs").long("dfs").help("Depth-first search"))
        .arg(Arg::with_name("astar").long("astar").help("Best-first search with A* evaluation"))
        .arg(
            Arg::with_name("wastar")
                .long("wastar")
                .takes_value(true)
                .value_name("W")
                .help("Best-first search with weighted A* evaluation"),
        )
        .arg(Arg::with_name("greedy").long("greedy").help("Best-first search with greedy evaluation"))
        .group(
            ArgGroup::with_name("strategy")
                .args(&["bfs", "dfs", "astar", "wastar", "greedy"]),
        )
        .arg(
            Arg::with_name("heuristic")
                .long("heuristic")
                .takes_value(true)
                .possible_values(&["goal-count", "box-distance", "move-penalty"])
                .help("Heuristic for the best-first strategies (default goal-count)"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .value_name("N")
                .help("Seed for shuffling successors (default 1)"),
        )
        .arg(
            Arg::with_name("no-shuffle")
                .long("no-shuffle")
                .conflicts_with("seed")
                .help("Expand successors in a fixed order"),
        )
        .arg(
            Arg::with_name("max-states")
                .long("max-states")
                .takes_value(true)
                .value_name("N")
                .help("Give up when the search needs more states than this"),
        )
        .arg(
            Arg::with_name("memory-limit")
                .long("memory-limit")
                .takes_value(true)
                .value_name("MiB")
                .help("Give up when using more memory"),
        )
        .arg(
            Arg::with_name("server")
                .long("server")
                .conflicts_with("file")
                .help("Communicate with the server over stdin and stdout"),
        )
        .arg(Arg::with_name("file").help("Level file, stdin when missing"))
        .get_matches_safe()
        .unwrap_or_else(|err| match err.kind {
            ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed => err.exit(),
            _ => {
                eprintln!("{}", err.message);
                process::exit(EXIT_BAD_INPUT);
            }
        });

    let config = parse_config(&matches).unwrap_or_else(|err| {
        error!("Invalid arguments: {}", err);
        process::exit(EXIT_BAD_INPUT);
    });

    if matches.is_present("server") {
        run_server(&config);
    } else {
        run_offline(matches.value_of("file"), &config);
    }
}

fn parse_config(matches: &ArgMatches<'_>) -> Result<SearchConfig, Box<dyn Error>> {
    let strategy = if matches.is_present("dfs") {
        Strategy::Dfs
    } else if matches.is_present("astar") {
        Strategy::AStar
    } else if let Some(w) = matches.value_of("wastar") {
        Strategy::WeightedAStar(w.parse()?)
    } else if matches.is_present("greedy") {
        Strategy::Greedy
    } else {
        Strategy::Bfs
    };

    let mut config = SearchConfig::new(strategy);
    config.print_status = true;
    if let Some(heuristic) = matches.value_of("heuristic") {
        config.heuristic = heuristic.parse::<HeuristicKind>()?;
    }
    if matches.is_present("no-shuffle") {
        config.successor_order = SuccessorOrder::Fixed;
    } else if let Some(seed) = matches.value_of("seed") {
        config.successor_order = SuccessorOrder::Shuffled { seed: seed.parse()? };
    }
    if let Some(max_states) = matches.value_of("max-states") {
        config.max_states = Some(max_states.parse()?);
    }
    if let Some(memory_limit) = matches.value_of("memory-limit") {
        config.memory_limit = Some(memory_limit.parse()?);
    }
    Ok(config)
}

fn load(path: Option<&str>) -> Result<Level, Box<dyn Error>> {
    match path {
        Some(path) => path.load_level(),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text.parse()?)
        }
    }
}

fn run_offline(path: Option<&str>, config: &SearchConfig) {
    let level = load(path).unwrap_or_else(|err| {
        error!("Can't load level {}: {}", path.unwrap_or("from stdin"), err);
        process::exit(EXIT_BAD_INPUT);
    });

    info!("Solving {} using {}...", level.name, config);
    let solver_ok = level.solve(config);
    info!("{}", solver_ok.stats);
    info!("Time: {:.3} s", solver_ok.elapsed.as_secs_f64());

    match solver_ok.outcome {
        Outcome::Solved(ref plan) => {
            info!(
                "Found solution of length {} with {} box actions",
                plan.len().separated_string(),
                plan.box_action_cnt().separated_string()
            );
            let stdout = io::stdout();
            let mut stdout = stdout.lock();
            if let Err(err) = client::write_plan(&mut stdout, plan) {
                error!("Can't write plan: {}", err);
                process::exit(EXIT_UNSOLVED);
            }
        }
        Outcome::Unsolvable => {
            info!("No solution");
            process::exit(EXIT_UNSOLVED);
        }
        Outcome::ResourceExhausted(limit) => {
            info!("Gave up: {}", limit);
            process::exit(EXIT_UNSOLVED);
        }
    }
}

fn run_server(config: &SearchConfig) {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let result = client::run_with_server(&mut stdin.lock(), &mut stdout.lock(), config);
    match result {
        Ok(solver_ok) => {
            info!("{}", solver_ok.stats);
            if solver_ok.plan().is_none() {
                info!("No plan sent");
                process::exit(EXIT_UNSOLVED);
            }
        }
        Err(err) => {
            error!("Server session failed: {}", err);
            process::exit(EXIT_BAD_INPUT);
        }
    }
}
