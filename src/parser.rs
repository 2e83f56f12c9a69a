use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::data::{BoxLetter, Color, Goal, Pos, MAX_AGENTS, MAX_SIZE};
use crate::level::{Level, LevelErr};
use crate::map::Map;
use crate::vec2d::Vec2d;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserErr {
    MissingSection(&'static str),
    UnknownColor(String),
    ColorLine(usize),
    ColoredTwice(char),
    Pos(usize, usize),
    TooLarge,
    DuplicateAgent(usize),
    MissingAgent(usize),
    AgentWithoutColor(usize),
    Level(LevelErr),
}

impl Display for ParserErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            ParserErr::MissingSection(s) => write!(f, "Missing section {}", s),
            ParserErr::UnknownColor(ref s) => write!(f, "Unknown color: {}", s),
            ParserErr::ColorLine(l) => write!(f, "Malformed color definition on line {}", l),
            ParserErr::ColoredTwice(c) => write!(f, "{} has more than one color", c),
            ParserErr::Pos(r, c) => write!(f, "Invalid cell at pos: [{}, {}]", r, c),
            ParserErr::TooLarge => write!(f, "Map larger than {} rows/columns", MAX_SIZE),
            ParserErr::DuplicateAgent(a) => write!(f, "Agent {} appears more than once", a),
            ParserErr::MissingAgent(a) => {
                write!(f, "Agent {} is missing - agents must be numbered from 0", a)
            }
            ParserErr::AgentWithoutColor(a) => write!(f, "Agent {} has no color", a),
            ParserErr::Level(ref err) => write!(f, "{}", err),
        }
    }
}

impl Error for ParserErr {}

impl From<LevelErr> for ParserErr {
    fn from(err: LevelErr) -> Self {
        ParserErr::Level(err)
    }
}

impl FromStr for Level {
    type Err = ParserErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Line iterator that remembers line numbers for error messages.
struct Lines<'a> {
    lines: std::iter::Peekable<std::iter::Enumerate<std::str::Lines<'a>>>,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Lines {
            lines: text.lines().enumerate().peekable(),
        }
    }

    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        self.lines
            .next()
            .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
    }

    fn expect_header(&mut self, header: &'static str) -> Result<(), ParserErr> {
        match self.next_line() {
            Some((_, line)) if line.trim_end() == header => Ok(()),
            _ => Err(ParserErr::MissingSection(header)),
        }
    }

    /// Lines up to (not including) the next section header.
    fn section_body(&mut self) -> Vec<(usize, &'a str)> {
        let mut body = Vec::new();
        while let Some(&(_, line)) = self.lines.peek() {
            if line.starts_with('#') {
                break;
            }
            body.extend(self.next_line());
        }
        body
    }
}

pub(crate) fn parse(level: &str) -> Result<Level, ParserErr> {
    // so we can specify levels using raw strings more easily
    let level = level.trim_start_matches(|c: char| c == '\n' || c == '\r');
    let mut lines = Lines::new(level);

    lines.expect_header("#domain")?;
    let domain = join_body(lines.section_body());
    lines.expect_header("#levelname")?;
    let name = join_body(lines.section_body());

    lines.expect_header("#colors")?;
    let (agent_colors, box_colors) = parse_colors(&lines.section_body())?;

    lines.expect_header("#initial")?;
    let initial = lines.section_body();
    lines.expect_header("#goal")?;
    let goal = lines.section_body();
    lines.expect_header("#end")?;

    let (walls, agent_slots, boxes) = parse_initial(&initial)?;
    let goals = parse_goals(&goal)?;

    let agent_cnt = agent_slots.iter().filter(|a| a.is_some()).count();
    let mut agents = Vec::with_capacity(agent_cnt);
    let mut colors = Vec::with_capacity(agent_cnt);
    for agent in 0..agent_cnt {
        let pos = agent_slots[agent].ok_or(ParserErr::MissingAgent(agent))?;
        let color = agent_colors[agent].ok_or(ParserErr::AgentWithoutColor(agent))?;
        agents.push(pos);
        colors.push(color);
    }

    let walls = Vec2d::new(&walls, true);
    let goals = Vec2d::new(&goals, None);
    let map = Map::new(walls, goals, colors, box_colors)?;
    Ok(Level::new(domain, name, map, agents, boxes)?)
}

fn join_body(body: Vec<(usize, &str)>) -> String {
    body.iter()
        .map(|&(_, line)| line.trim())
        .collect::<Vec<_>>()
        .join("\n")
}

type Colors = (
    [Option<Color>; MAX_AGENTS],
    [Option<Color>; BoxLetter::COUNT],
);

/// `<color>: <item>, <item>, ...`
fn parse_colors(body: &[(usize, &str)]) -> Result<Colors, ParserErr> {
    let mut agent_colors = [None; MAX_AGENTS];
    let mut box_colors = [None; BoxLetter::COUNT];

    for &(line_nr, line) in body {
        if line.trim().is_empty() {
            continue;
        }
        let mut parts = line.splitn(2, ':');
        let (color, items) = match (parts.next(), parts.next()) {
            (Some(color), Some(items)) => (color, items),
            _ => return Err(ParserErr::ColorLine(line_nr)),
        };
        let color: Color = color.parse().map_err(ParserErr::UnknownColor)?;

        for item in items.split(',') {
            let mut chars = item.trim().chars();
            let c = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => return Err(ParserErr::ColorLine(line_nr)),
            };
            let slot = if let Some(digit) = c.to_digit(10) {
                &mut agent_colors[digit as usize]
            } else if let Some(letter) = BoxLetter::from_char(c) {
                &mut box_colors[letter.index()]
            } else {
                return Err(ParserErr::ColorLine(line_nr));
            };
            if slot.is_some() {
                return Err(ParserErr::ColoredTwice(c));
            }
            *slot = Some(color);
        }
    }

    Ok((agent_colors, box_colors))
}

type Initial = (
    Vec<Vec<bool>>,
    [Option<Pos>; MAX_AGENTS],
    Vec<(Pos, BoxLetter)>,
);

fn parse_initial(body: &[(usize, &str)]) -> Result<Initial, ParserErr> {
    let mut walls = Vec::new();
    let mut agents = [None; MAX_AGENTS];
    let mut boxes = Vec::new();

    for (r, &(_, line)) in body.iter().enumerate() {
        if r >= MAX_SIZE {
            return Err(ParserErr::TooLarge);
        }
        let mut row = Vec::new();
        for (c, cur_char) in line.chars().enumerate() {
            if c >= MAX_SIZE {
                return Err(ParserErr::TooLarge);
            }
            let pos = Pos::new(r as u8, c as u8);

            let wall = match cur_char {
                '+' => true,
                ' ' => false,
                '0'..='9' => {
                    let agent = cur_char as usize - '0' as usize;
                    if agents[agent].is_some() {
                        return Err(ParserErr::DuplicateAgent(agent));
                    }
                    agents[agent] = Some(pos);
                    false
                }
                'A'..='Z' => {
                    let letter = BoxLetter::from_char(cur_char).ok_or(ParserErr::Pos(r, c))?;
                    boxes.push((pos, letter));
                    false
                }
                _ => return Err(ParserErr::Pos(r, c)),
            };
            row.push(wall);
        }
        walls.push(row);
    }

    Ok((walls, agents, boxes))
}

fn parse_goals(body: &[(usize, &str)]) -> Result<Vec<Vec<Option<Goal>>>, ParserErr> {
    let mut goals = Vec::new();

    for (r, &(_, line)) in body.iter().enumerate() {
        if r >= MAX_SIZE {
            return Err(ParserErr::TooLarge);
        }
        let mut row = Vec::new();
        for (c, cur_char) in line.chars().enumerate() {
            if c >= MAX_SIZE {
                return Err(ParserErr::TooLarge);
            }
            let goal = match cur_char {
                '+' | ' ' => None,
                '0'..='9' | 'A'..='Z' => Goal::from_char(cur_char),
                _ => return Err(ParserErr::Pos(r, c)),
            };
            row.push(goal);
        }
        goals.push(row);
    }

    Ok(goals)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_text(colors: &str, initial: &str, goal: &str) -> String {
        format!(
            "#domain\nhospital\n#levelname\ntest\n#colors\n{}#initial\n{}#goal\n{}#end\n",
            colors, initial, goal
        )
    }

    #[test]
    fn simplest() {
        let text = level_text("blue: 0, A\n", "+++++\n+0A +\n+++++\n", "+++++\n+  A+\n+++++\n");
        assert_success(&text);
    }

    #[test]
    fn multiple_agents_and_colors() {
        let text = level_text(
            "red: 0, A, B\nblue: 1, C\n",
            "++++++++\n+0AB  1+\n+   C  +\n++++++++\n",
            "++++++++\n+1  BA0+\n+C     +\n++++++++\n",
        );
        let level = assert_success(&text);
        assert_eq!(level.map.agent_cnt(), 2);
        assert_eq!(level.map.agent_color(1), Color::Blue);
        assert_eq!(
            level.map.box_color(BoxLetter::from_char('B').unwrap()),
            Some(Color::Red)
        );
        assert_eq!(level.map.goal_cells().len(), 5);
    }

    #[test]
    fn windows_line_endings() {
        let text = level_text("blue: 0, A\n", "+++++\n+0A +\n+++++\n", "+++++\n+  A+\n+++++\n");
        let text = text.replace('\n', "\r\n");
        let level: Level = text.parse().unwrap();
        assert_eq!(level.agents(), &[Pos::new(1, 1)]);
    }

    #[test]
    fn ragged_rows_are_padded_with_walls() {
        let text = level_text("blue: 0\n", "+++++\n+0 +\n+++++\n", "+++++\n+ 0+\n+++++\n");
        let level: Level = text.parse().unwrap();
        assert!(level.map.is_wall(Pos::new(1, 4)));
        assert_eq!(level.map.rows(), 3);
        assert_eq!(level.map.cols(), 5);
    }

    #[test]
    fn fail_missing_section() {
        let text = "#domain\nhospital\n#levelname\ntest\n#initial\n+0+\n#goal\n+0+\n#end\n";
        assert_failure(text, ParserErr::MissingSection("#colors"));

        let text = level_text("blue: 0\n", "+0+\n", "+0+\n").replace("#end\n", "");
        assert_failure(&text, ParserErr::MissingSection("#end"));
    }

    #[test]
    fn fail_colors() {
        let text = level_text("magenta: 0\n", "+0+\n", "+ +\n");
        assert_failure(&text, ParserErr::UnknownColor("magenta".to_string()));

        let text = level_text("blue 0\n", "+0+\n", "+ +\n");
        assert_failure(&text, ParserErr::ColorLine(6));

        let text = level_text("blue: 0, a\n", "+0+\n", "+ +\n");
        assert_failure(&text, ParserErr::ColorLine(6));

        let text = level_text("blue: 0\nred: 0\n", "+0+\n", "+ +\n");
        assert_failure(&text, ParserErr::ColoredTwice('0'));
    }

    #[test]
    fn fail_pos() {
        let text = level_text("blue: 0\n", "++++\n+0x+\n++++\n", "++++\n+  +\n++++\n");
        assert_failure(&text, ParserErr::Pos(1, 2));

        let text = level_text("blue: 0\n", "++++\n+0 +\n++++\n", "++++\n+ *+\n++++\n");
        assert_failure(&text, ParserErr::Pos(1, 2));
    }

    #[test]
    fn fail_agents() {
        let text = level_text("blue: 0\n", "++++\n+00+\n++++\n", "++++\n+  +\n++++\n");
        assert_failure(&text, ParserErr::DuplicateAgent(0));

        let text = level_text("blue: 0, 1\n", "++++\n+1 +\n++++\n", "++++\n+  +\n++++\n");
        assert_failure(&text, ParserErr::MissingAgent(0));

        let text = level_text("blue: 0\n", "++++\n+01+\n++++\n", "++++\n+  +\n++++\n");
        assert_failure(&text, ParserErr::AgentWithoutColor(1));
    }

    #[test]
    fn fail_level_checks() {
        let text = level_text("blue: 0\n", "++++\n+0A+\n++++\n", "++++\n+  +\n++++\n");
        assert_failure(&text, ParserErr::Level(LevelErr::BoxWithoutColor('A')));

        let text = level_text("blue: 0\n", "++++\n+0 +\n++++\n", "++++\n+ 3+\n++++\n");
        assert_failure(&text, ParserErr::Level(LevelErr::GoalForMissingAgent(3)));

        let text = level_text("blue: 0\n", "++++\n+0 +\n++++\n", "++++\n+ B+\n++++\n");
        assert_failure(&text, ParserErr::Level(LevelErr::GoalForUnknownBox('B')));

        let text = level_text("blue: 0\n", "++++\n+0 +\n++++\n", "++++\n+  +\n+  +\n++++\n");
        assert_failure(&text, ParserErr::Level(LevelErr::DimensionMismatch));

        let text = level_text("blue: 0\n", "++++\n+  +\n++++\n", "++++\n+  +\n++++\n");
        assert_failure(&text, ParserErr::Level(LevelErr::NoAgents));
    }

    fn assert_failure(input_level: &str, expected_err: ParserErr) {
        assert_eq!(input_level.parse::<Level>().unwrap_err(), expected_err);
    }

    fn assert_success(input_level: &str) -> Level {
        let level = parse(input_level).unwrap();
        assert_eq!(level.to_string(), input_level);
        level
    }
}
