use std::error::Error;
use std::io::{self, BufRead, Write};

use log::{info, warn};

use crate::config::SearchConfig;
use crate::level::Level;
use crate::plan::Plan;
use crate::solver::SolverOk;
use crate::Solve;

pub const CLIENT_NAME: &str = "multi-sokoban-solver";

/// Reads lines up to and including `#end` and parses them as a level.
pub fn read_level<R: BufRead>(input: &mut R) -> Result<Level, Box<dyn Error>> {
    let mut text = String::new();
    loop {
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let end = line.trim_end() == "#end";
        text.push_str(&line);
        if end {
            break;
        }
    }
    Ok(text.parse::<Level>()?)
}

/// One joint action per line.
pub fn write_plan<W: Write>(output: &mut W, plan: &Plan) -> io::Result<()> {
    write!(output, "{}", plan)?;
    output.flush()
}

/// Talks to the server: sends our name, receives the level, solves it
/// and then sends the plan step by step, reading one response per step.
pub fn run_with_server<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    config: &SearchConfig,
) -> Result<SolverOk, Box<dyn Error>> {
    writeln!(output, "{}", CLIENT_NAME)?;
    output.flush()?;

    let level = read_level(input)?;
    info!(
        "Received level {} ({}x{}) with {} agents",
        level.name,
        level.map.rows(),
        level.map.cols(),
        level.map.agent_cnt()
    );

    let solver_ok = level.solve(config);
    let plan = match solver_ok.plan() {
        Some(plan) => plan,
        None => return Ok(solver_ok),
    };
    info!("Sending plan with {} steps", plan.len());

    for (step, joint_action) in plan.iter().enumerate() {
        writeln!(output, "{}", joint_action)?;
        output.flush()?;

        let mut response = String::new();
        if input.read_line(&mut response)? == 0 {
            warn!("Server stopped responding at step {}", step);
            break;
        }
        // the server didn't apply the step so the rest of the plan no longer fits
        if response.contains("false") {
            warn!(
                "Server rejected step {} ({}): {}, not sending the rest",
                step,
                joint_action,
                response.trim_end()
            );
            break;
        }
    }
    Ok(solver_ok)
}
