use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

// the level format only has digits for agents
pub const MAX_AGENTS: usize = 10;
pub const MAX_SIZE: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub r: u8,
    pub c: u8,
}

impl Pos {
    pub fn new(r: u8, c: u8) -> Pos {
        Pos { r, c }
    }

    pub fn dist(self, other: Pos) -> u32 {
        let dr = (i32::from(self.r) - i32::from(other.r)).abs();
        let dc = (i32::from(self.c) - i32::from(other.c)).abs();
        (dr + dc) as u32
    }

    /// The neighboring position in `dir`, `None` when that would leave the `u8` range.
    /// Callers still have to check the upper bound against the grid.
    pub fn step(self, dir: Dir) -> Option<Pos> {
        let (dr, dc) = dir.delta();
        let r = i32::from(self.r) + dr;
        let c = i32::from(self.c) + dc;
        if r < 0 || c < 0 || r > MAX_SIZE as i32 || c > MAX_SIZE as i32 {
            None
        } else {
            Some(Pos::new(r as u8, c as u8))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    N,
    S,
    E,
    W,
}

pub const DIRECTIONS: [Dir; 4] = [Dir::N, Dir::S, Dir::E, Dir::W];

impl Dir {
    /// (row, column) delta
    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir::N => (-1, 0),
            Dir::S => (1, 0),
            Dir::E => (0, 1),
            Dir::W => (0, -1),
        }
    }

    pub fn inverse(self) -> Dir {
        match self {
            Dir::N => Dir::S,
            Dir::S => Dir::N,
            Dir::E => Dir::W,
            Dir::W => Dir::E,
        }
    }
}

impl Display for Dir {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Dir::N => "N",
            Dir::S => "S",
            Dir::E => "E",
            Dir::W => "W",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Blue,
    Red,
    Cyan,
    Purple,
    Green,
    Orange,
    Pink,
    Grey,
    Lightblue,
    Brown,
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "blue" => Ok(Color::Blue),
            "red" => Ok(Color::Red),
            "cyan" => Ok(Color::Cyan),
            "purple" => Ok(Color::Purple),
            "green" => Ok(Color::Green),
            "orange" => Ok(Color::Orange),
            "pink" => Ok(Color::Pink),
            "grey" | "gray" => Ok(Color::Grey),
            "lightblue" => Ok(Color::Lightblue),
            "brown" => Ok(Color::Brown),
            other => Err(other.to_string()),
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Color::Blue => "blue",
            Color::Red => "red",
            Color::Cyan => "cyan",
            Color::Purple => "purple",
            Color::Green => "green",
            Color::Orange => "orange",
            Color::Pink => "pink",
            Color::Grey => "grey",
            Color::Lightblue => "lightblue",
            Color::Brown => "brown",
        };
        write!(f, "{}", s)
    }
}

/// One of the box letters `A` to `Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoxLetter(u8);

impl BoxLetter {
    pub const COUNT: usize = 26;

    pub fn from_char(c: char) -> Option<BoxLetter> {
        if c.is_ascii_uppercase() {
            Some(BoxLetter(c as u8 - b'A'))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    pub fn to_char(self) -> char {
        char::from(b'A' + self.0)
    }
}

impl Display for BoxLetter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Goal {
    Box(BoxLetter),
    Agent(usize),
}

impl Goal {
    pub fn from_char(c: char) -> Option<Goal> {
        if let Some(letter) = BoxLetter::from_char(c) {
            Some(Goal::Box(letter))
        } else {
            c.to_digit(10).map(|d| Goal::Agent(d as usize))
        }
    }
}
