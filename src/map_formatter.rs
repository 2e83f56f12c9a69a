use std::fmt::{self, Debug, Display, Formatter};

use crate::data::{BoxLetter, Goal, Pos};
use crate::map::Map;

#[derive(Clone, Copy)]
pub(crate) enum Layer<'a> {
    Items {
        agents: &'a [Pos],
        boxes: &'a [(Pos, BoxLetter)],
    },
    Goals,
}

/// Writes a grid in the level file notation: `+` for walls, digits for agents, letters for boxes.
pub struct MapFormatter<'a> {
    map: &'a Map,
    layer: Layer<'a>,
}

impl<'a> MapFormatter<'a> {
    pub(crate) fn new(map: &'a Map, layer: Layer<'a>) -> Self {
        Self { map, layer }
    }

    fn write_to_formatter(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut grid = self.map.walls().scratchpad_with_default(' ');
        for pos in grid.positions() {
            if self.map.is_wall(pos) {
                grid[pos] = '+';
            }
        }

        match self.layer {
            Layer::Items { agents, boxes } => {
                for &(pos, letter) in boxes {
                    grid[pos] = letter.to_char();
                }
                for (agent, &pos) in agents.iter().enumerate() {
                    grid[pos] = Self::agent_char(agent);
                }
            }
            Layer::Goals => {
                for &(pos, goal) in self.map.goal_cells() {
                    grid[pos] = match goal {
                        Goal::Box(letter) => letter.to_char(),
                        Goal::Agent(agent) => Self::agent_char(agent),
                    };
                }
            }
        }

        for r in 0..grid.rows() {
            for c in 0..grid.cols() {
                write!(f, "{}", grid[Pos::new(r, c)])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }

    fn agent_char(agent: usize) -> char {
        std::char::from_digit(agent as u32, 10).unwrap_or('?')
    }
}

impl<'a> Display for MapFormatter<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.write_to_formatter(f)
    }
}

impl<'a> Debug for MapFormatter<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
