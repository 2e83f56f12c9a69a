use std::fmt::{self, Debug, Display, Formatter};

use crate::data::Dir::{self, E, N, S, W};

/// What a single agent does during one joint step.
///
/// `Push(a, b)`: the box is at agent + `a`, the agent steps into its cell and the box moves by `b`.
/// `Pull(a, b)`: the box is at agent - `b`, the agent steps by `a` and the box follows into the
/// cell the agent left.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    NoOp,
    Move(Dir),
    Push(Dir, Dir),
    Pull(Dir, Dir),
}

/// All actions in the order successors are enumerated.
pub const ALL_ACTIONS: [Action; 29] = [
    Action::NoOp,
    Action::Move(N),
    Action::Move(S),
    Action::Move(E),
    Action::Move(W),
    Action::Push(N, N),
    Action::Push(N, E),
    Action::Push(N, W),
    Action::Push(S, S),
    Action::Push(S, E),
    Action::Push(S, W),
    Action::Push(E, N),
    Action::Push(E, S),
    Action::Push(E, E),
    Action::Push(W, N),
    Action::Push(W, S),
    Action::Push(W, W),
    Action::Pull(N, N),
    Action::Pull(N, E),
    Action::Pull(N, W),
    Action::Pull(S, S),
    Action::Pull(S, E),
    Action::Pull(S, W),
    Action::Pull(E, N),
    Action::Pull(E, S),
    Action::Pull(E, E),
    Action::Pull(W, N),
    Action::Pull(W, S),
    Action::Pull(W, W),
];

impl Action {
    /// Direction the agent moves in, `None` for `NoOp`.
    pub fn agent_dir(self) -> Option<Dir> {
        match self {
            Action::NoOp => None,
            Action::Move(dir) | Action::Push(dir, _) | Action::Pull(dir, _) => Some(dir),
        }
    }

    /// Direction the box moves in, `None` unless this is a push or a pull.
    pub fn box_dir(self) -> Option<Dir> {
        match self {
            Action::NoOp | Action::Move(_) => None,
            Action::Push(_, dir) | Action::Pull(_, dir) => Some(dir),
        }
    }

    pub fn is_box_action(self) -> bool {
        self.box_dir().is_some()
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Action::NoOp => write!(f, "NoOp"),
            Action::Move(dir) => write!(f, "Move({})", dir),
            Action::Push(agent, boxx) => write!(f, "Push({},{})", agent, boxx),
            Action::Pull(agent, boxx) => write!(f, "Pull({},{})", agent, boxx),
        }
    }
}

impl Debug for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
