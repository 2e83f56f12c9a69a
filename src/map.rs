use std::fmt::{self, Debug, Display, Formatter};

use crate::data::{BoxLetter, Color, Dir, Goal, Pos, MAX_AGENTS};
use crate::level::LevelErr;
use crate::map_formatter::{Layer, MapFormatter};
use crate::vec2d::Vec2d;

/// Everything about a level that doesn't change during search.
/// Shared by reference between all states.
#[derive(Clone, PartialEq, Eq)]
pub struct Map {
    walls: Vec2d<bool>,
    goals: Vec2d<Option<Goal>>,
    goal_cells: Vec<(Pos, Goal)>,
    box_goals: Vec<Vec<Pos>>,
    agent_colors: Vec<Color>,
    box_colors: [Option<Color>; BoxLetter::COUNT],
}

impl Map {
    pub(crate) fn new(
        walls: Vec2d<bool>,
        goals: Vec2d<Option<Goal>>,
        agent_colors: Vec<Color>,
        box_colors: [Option<Color>; BoxLetter::COUNT],
    ) -> Result<Self, LevelErr> {
        if walls.rows() != goals.rows() || walls.cols() != goals.cols() {
            return Err(LevelErr::DimensionMismatch);
        }
        if agent_colors.len() > MAX_AGENTS {
            return Err(LevelErr::TooManyAgents(agent_colors.len()));
        }

        let mut goal_cells = Vec::new();
        let mut box_goals = vec![Vec::new(); BoxLetter::COUNT];
        for pos in goals.positions() {
            let goal = match goals[pos] {
                None => continue,
                Some(goal) => goal,
            };
            if walls[pos] {
                return Err(LevelErr::OnWall(pos));
            }
            match goal {
                Goal::Agent(agent) if agent >= agent_colors.len() => {
                    return Err(LevelErr::GoalForMissingAgent(agent));
                }
                Goal::Box(letter) if box_colors[letter.index()].is_none() => {
                    return Err(LevelErr::GoalForUnknownBox(letter.to_char()));
                }
                Goal::Box(letter) => box_goals[letter.index()].push(pos),
                Goal::Agent(_) => {}
            }
            goal_cells.push((pos, goal));
        }

        Ok(Map {
            walls,
            goals,
            goal_cells,
            box_goals,
            agent_colors,
            box_colors,
        })
    }

    pub fn rows(&self) -> u8 {
        self.walls.rows()
    }

    pub fn cols(&self) -> u8 {
        self.walls.cols()
    }

    pub fn agent_cnt(&self) -> usize {
        self.agent_colors.len()
    }

    /// Anything outside the grid counts as a wall.
    pub fn is_wall(&self, pos: Pos) -> bool {
        self.walls.get(pos).cloned().unwrap_or(true)
    }

    /// The neighbor of `pos` in `dir` if it's inside the grid.
    pub fn step(&self, pos: Pos, dir: Dir) -> Option<Pos> {
        pos.step(dir).filter(|&next| self.walls.contains(next))
    }

    pub fn goal_at(&self, pos: Pos) -> Option<Goal> {
        self.goals.get(pos).cloned().flatten()
    }

    /// Goal cells in row-major order.
    pub fn goal_cells(&self) -> &[(Pos, Goal)] {
        &self.goal_cells
    }

    pub fn box_goals(&self, letter: BoxLetter) -> &[Pos] {
        &self.box_goals[letter.index()]
    }

    pub fn agent_color(&self, agent: usize) -> Color {
        self.agent_colors[agent]
    }

    pub fn box_color(&self, letter: BoxLetter) -> Option<Color> {
        self.box_colors[letter.index()]
    }

    pub fn format_with<'a>(
        &'a self,
        agents: &'a [Pos],
        boxes: &'a [(Pos, BoxLetter)],
    ) -> MapFormatter<'a> {
        MapFormatter::new(self, Layer::Items { agents, boxes })
    }

    pub fn format_goals(&self) -> MapFormatter<'_> {
        MapFormatter::new(self, Layer::Goals)
    }

    pub(crate) fn walls(&self) -> &Vec2d<bool> {
        &self.walls
    }

    pub(crate) fn agent_colors(&self) -> &[Color] {
        &self.agent_colors
    }

    pub(crate) fn box_colors(&self) -> &[Option<Color>; BoxLetter::COUNT] {
        &self.box_colors
    }
}

impl Display for Map {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_goals())
    }
}

impl Debug for Map {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dir;

    fn small_map(goal: Goal) -> Result<Map, LevelErr> {
        let walls = Vec2d::new(
            &[
                vec![true, true, true, true],
                vec![true, false, false, true],
                vec![true, true, true, true],
            ],
            true,
        );
        let mut goals = walls.scratchpad();
        goals[Pos::new(1, 2)] = Some(goal);
        let mut box_colors = [None; BoxLetter::COUNT];
        box_colors[0] = Some(Color::Red);
        Map::new(walls, goals, vec![Color::Red], box_colors)
    }

    #[test]
    fn goal_markers() {
        let a = BoxLetter::from_char('A').unwrap();
        let map = small_map(Goal::Box(a)).unwrap();
        assert_eq!(map.goal_cells(), &[(Pos::new(1, 2), Goal::Box(a))]);
        assert_eq!(map.box_goals(a), &[Pos::new(1, 2)]);
        assert_eq!(map.goal_at(Pos::new(1, 1)), None);
        assert_eq!(map.goal_at(Pos::new(7, 7)), None);

        assert_eq!(
            small_map(Goal::Agent(1)).unwrap_err(),
            LevelErr::GoalForMissingAgent(1)
        );
        assert_eq!(
            small_map(Goal::Box(BoxLetter::from_char('B').unwrap())).unwrap_err(),
            LevelErr::GoalForUnknownBox('B')
        );
    }

    #[test]
    fn outside_is_wall() {
        let map = small_map(Goal::Agent(0)).unwrap();
        assert!(!map.is_wall(Pos::new(1, 1)));
        assert!(map.is_wall(Pos::new(0, 1)));
        assert!(map.is_wall(Pos::new(3, 1)));
        assert_eq!(map.step(Pos::new(2, 3), Dir::E), None);
        assert_eq!(map.step(Pos::new(2, 3), Dir::S), None);
        assert_eq!(map.step(Pos::new(1, 1), Dir::E), Some(Pos::new(1, 2)));
    }
}
