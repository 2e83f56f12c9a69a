use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};

use crate::data::{BoxLetter, Pos, MAX_AGENTS};
use crate::map::Map;
use crate::map_formatter::MapFormatter;
use crate::state::State;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelErr {
    DimensionMismatch,
    TooManyAgents(usize),
    NoAgents,
    AgentColors { agents: usize, colors: usize },
    BoxWithoutColor(char),
    GoalForMissingAgent(usize),
    GoalForUnknownBox(char),
    OutOfBounds(Pos),
    OnWall(Pos),
    Overlap(Pos),
}

impl Display for LevelErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            LevelErr::DimensionMismatch => {
                write!(f, "Initial and goal grids have different dimensions")
            }
            LevelErr::TooManyAgents(n) => {
                write!(f, "{} agents - at most {} allowed", n, MAX_AGENTS)
            }
            LevelErr::NoAgents => write!(f, "No agents"),
            LevelErr::AgentColors { agents, colors } => write!(
                f,
                "{} agents but {} agent colors - every agent needs exactly one color",
                agents, colors
            ),
            LevelErr::BoxWithoutColor(c) => write!(f, "Box {} has no color", c),
            LevelErr::GoalForMissingAgent(agent) => {
                write!(f, "Goal for agent {} which doesn't exist", agent)
            }
            LevelErr::GoalForUnknownBox(c) => write!(f, "Goal for box {} which has no color", c),
            LevelErr::OutOfBounds(pos) => write!(f, "Position [{}, {}] is outside the map", pos.r, pos.c),
            LevelErr::OnWall(pos) => write!(f, "Item on wall at [{}, {}]", pos.r, pos.c),
            LevelErr::Overlap(pos) => write!(f, "Multiple items at [{}, {}]", pos.r, pos.c),
        }
    }
}

impl Error for LevelErr {}

/// A parsed level: the static map and where agents and boxes start.
#[derive(Clone)]
pub struct Level {
    pub domain: String,
    pub name: String,
    pub map: Map,
    agents: Vec<Pos>,
    boxes: Vec<(Pos, BoxLetter)>,
}

impl Level {
    /// `agents[i]` is the position of agent `i`.
    pub fn new(
        domain: String,
        name: String,
        map: Map,
        agents: Vec<Pos>,
        mut boxes: Vec<(Pos, BoxLetter)>,
    ) -> Result<Self, LevelErr> {
        if agents.is_empty() {
            return Err(LevelErr::NoAgents);
        }
        if agents.len() != map.agent_cnt() {
            return Err(LevelErr::AgentColors {
                agents: agents.len(),
                colors: map.agent_cnt(),
            });
        }

        let mut occupied = map.walls().scratchpad::<bool>();
        let items = agents.iter().cloned().chain(boxes.iter().map(|&(pos, _)| pos));
        for pos in items {
            if !map.walls().contains(pos) {
                return Err(LevelErr::OutOfBounds(pos));
            }
            if map.is_wall(pos) {
                return Err(LevelErr::OnWall(pos));
            }
            if occupied[pos] {
                return Err(LevelErr::Overlap(pos));
            }
            occupied[pos] = true;
        }
        for &(_, letter) in &boxes {
            if map.box_color(letter).is_none() {
                return Err(LevelErr::BoxWithoutColor(letter.to_char()));
            }
        }

        boxes.sort();
        Ok(Level {
            domain,
            name,
            map,
            agents,
            boxes,
        })
    }

    pub fn agents(&self) -> &[Pos] {
        &self.agents
    }

    /// Sorted by position.
    pub fn boxes(&self) -> &[(Pos, BoxLetter)] {
        &self.boxes
    }

    pub fn initial_state(&self) -> State<'_> {
        State::initial(&self.map, self.agents.clone(), self.boxes.clone())
    }

    pub fn format_initial(&self) -> MapFormatter<'_> {
        self.map.format_with(&self.agents, &self.boxes)
    }
}

/// Writes the level back in the file format it was parsed from.
impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "#domain")?;
        writeln!(f, "{}", self.domain)?;
        writeln!(f, "#levelname")?;
        writeln!(f, "{}", self.name)?;
        writeln!(f, "#colors")?;

        let mut colors = Vec::new();
        let declared = self.map.agent_colors().iter().chain(self.map.box_colors().iter().flatten());
        for &color in declared {
            if !colors.contains(&color) {
                colors.push(color);
            }
        }
        for color in colors {
            let mut items = Vec::new();
            for (agent, &agent_color) in self.map.agent_colors().iter().enumerate() {
                if agent_color == color {
                    items.push(agent.to_string());
                }
            }
            for (i, &box_color) in self.map.box_colors().iter().enumerate() {
                if box_color == Some(color) {
                    items.push(char::from(b'A' + i as u8).to_string());
                }
            }
            writeln!(f, "{}: {}", color, items.join(", "))?;
        }

        writeln!(f, "#initial")?;
        write!(f, "{}", self.format_initial())?;
        writeln!(f, "#goal")?;
        write!(f, "{}", self.map.format_goals())?;
        writeln!(f, "#end")
    }
}

impl Debug for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = r"#domain
hospital
#levelname
formatting
#colors
red: 0, A
blue: 1, B
#initial
+++++++
+0A  1+
+  B  +
+++++++
#goal
+++++++
+ 1  A+
+ B  0+
+++++++
#end
";

    #[test]
    fn formatting_level() {
        let level: Level = LEVEL.parse().unwrap();
        assert_eq!(level.to_string(), LEVEL);
        assert_eq!(format!("{:?}", level), LEVEL);
        assert_eq!(
            level.format_initial().to_string(),
            "+++++++\n+0A  1+\n+  B  +\n+++++++\n"
        );
        assert_eq!(
            format!("{}", level.map),
            "+++++++\n+ 1  A+\n+ B  0+\n+++++++\n"
        );
    }

    #[test]
    fn initial_placement() {
        let level: Level = LEVEL.parse().unwrap();
        assert_eq!(level.agents(), &[Pos::new(1, 1), Pos::new(1, 5)]);
        let letters: String = level.boxes().iter().map(|&(_, l)| l.to_char()).collect();
        assert_eq!(letters, "AB");
        assert_eq!(level.domain, "hospital");
        assert_eq!(level.name, "formatting");
    }
}
