use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::ptr;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::actions::{Action, ALL_ACTIONS};
use crate::data::{BoxLetter, Dir, Goal, Pos};
use crate::map::Map;
use crate::plan::{JointAction, Plan};

/// A node of the search tree.
///
/// Equality and hashing only look at agent and box positions (and the map),
/// never at depth or how the state was reached.
#[derive(Clone)]
pub struct State<'a> {
    map: &'a Map,
    agents: Vec<Pos>,
    // sorted by position so equal layouts compare equal
    boxes: Vec<(Pos, BoxLetter)>,
    g: u32,
    parent: Option<&'a State<'a>>,
    joint_action: Option<JointAction>,
    move_penalties: i32,
}

/// Cells touched by one agent's action, used for conflict detection.
#[derive(Debug, Clone, Copy)]
struct Footprint {
    /// Cell the agent ends up in.
    dest: Pos,
    /// Cell the moved box ends up in, or the cell the agent leaves for plain moves.
    second: Pos,
    /// Cell of the box before the action.
    box_src: Option<Pos>,
}

impl<'a> State<'a> {
    pub(crate) fn initial(map: &'a Map, agents: Vec<Pos>, mut boxes: Vec<(Pos, BoxLetter)>) -> Self {
        boxes.sort_unstable();
        State {
            map,
            agents,
            boxes,
            g: 0,
            parent: None,
            joint_action: None,
            move_penalties: 0,
        }
    }

    pub fn map(&self) -> &'a Map {
        self.map
    }

    pub fn agents(&self) -> &[Pos] {
        &self.agents
    }

    pub fn boxes(&self) -> &[(Pos, BoxLetter)] {
        &self.boxes
    }

    /// Number of joint actions since the initial state.
    pub fn g(&self) -> u32 {
        self.g
    }

    pub fn parent(&self) -> Option<&'a State<'a>> {
        self.parent
    }

    pub fn joint_action(&self) -> Option<&JointAction> {
        self.joint_action.as_ref()
    }

    /// Running total of the move penalty bookkeeping, see `MovePenalty` heuristic.
    pub fn move_penalties(&self) -> i32 {
        self.move_penalties
    }

    pub fn box_at(&self, pos: Pos) -> Option<BoxLetter> {
        self.boxes
            .binary_search_by_key(&pos, |&(p, _)| p)
            .ok()
            .map(|i| self.boxes[i].1)
    }

    pub fn agent_at(&self, pos: Pos) -> Option<usize> {
        self.agents.iter().position(|&p| p == pos)
    }

    pub fn is_goal(&self) -> bool {
        self.unsatisfied_goals() == 0
    }

    pub fn unsatisfied_goals(&self) -> usize {
        self.map
            .goal_cells()
            .iter()
            .filter(|&&(pos, goal)| !self.satisfies(pos, goal))
            .count()
    }

    pub(crate) fn satisfies(&self, pos: Pos, goal: Goal) -> bool {
        match goal {
            Goal::Box(letter) => self.box_at(pos) == Some(letter),
            Goal::Agent(agent) => self.agents[agent] == pos,
        }
    }

    fn cell_is_free(&self, pos: Pos) -> bool {
        !self.map.is_wall(pos) && self.box_at(pos).is_none() && self.agent_at(pos).is_none()
    }

    /// Whether the agent can perform the action in this state, ignoring what other agents do.
    pub fn is_applicable(&self, agent: usize, action: Action) -> bool {
        let agent_pos = self.agents[agent];
        let color = Some(self.map.agent_color(agent));
        let box_matches = |pos: Pos| self.box_at(pos).map(|letter| self.map.box_color(letter)) == Some(color);

        match action {
            Action::NoOp => true,
            Action::Move(dir) => self
                .map
                .step(agent_pos, dir)
                .map_or(false, |dest| self.cell_is_free(dest)),
            Action::Push(agent_dir, box_dir) => {
                let box_pos = match self.map.step(agent_pos, agent_dir) {
                    Some(pos) => pos,
                    None => return false,
                };
                box_matches(box_pos)
                    && self
                        .map
                        .step(box_pos, box_dir)
                        .map_or(false, |dest| self.cell_is_free(dest))
            }
            Action::Pull(agent_dir, box_dir) => {
                let box_pos = self.map.step(agent_pos, box_dir.inverse());
                let dest = self.map.step(agent_pos, agent_dir);
                match (box_pos, dest) {
                    (Some(box_pos), Some(dest)) => box_matches(box_pos) && self.cell_is_free(dest),
                    _ => false,
                }
            }
        }
    }

    pub fn applicable_actions(&self, agent: usize) -> Vec<Action> {
        ALL_ACTIONS
            .iter()
            .cloned()
            .filter(|&action| self.is_applicable(agent, action))
            .collect()
    }

    fn neighbor(&self, pos: Pos, dir: Dir) -> Pos {
        self.map
            .step(pos, dir)
            .unwrap_or_else(|| panic!("applicable action leaves the grid at {:?} going {}", pos, dir))
    }

    /// Precondition: the action is applicable.
    fn footprint(&self, agent: usize, action: Action) -> Option<Footprint> {
        let agent_pos = self.agents[agent];
        match action {
            Action::NoOp => None,
            Action::Move(dir) => Some(Footprint {
                dest: self.neighbor(agent_pos, dir),
                second: agent_pos,
                box_src: None,
            }),
            Action::Push(agent_dir, box_dir) => {
                let box_pos = self.neighbor(agent_pos, agent_dir);
                Some(Footprint {
                    dest: box_pos,
                    second: self.neighbor(box_pos, box_dir),
                    box_src: Some(box_pos),
                })
            }
            Action::Pull(agent_dir, box_dir) => Some(Footprint {
                dest: self.neighbor(agent_pos, agent_dir),
                second: agent_pos,
                box_src: Some(self.neighbor(agent_pos, box_dir.inverse())),
            }),
        }
    }

    /// Whether individually applicable actions collide when performed together.
    /// Precondition: every action in `joint_action` is applicable for its agent.
    pub fn is_conflicting(&self, joint_action: &[Action]) -> bool {
        let footprints: Vec<_> = joint_action
            .iter()
            .enumerate()
            .map(|(agent, &action)| self.footprint(agent, action))
            .collect();

        for (a1, fp1) in footprints.iter().enumerate() {
            let fp1 = match fp1 {
                Some(fp) => fp,
                None => continue,
            };
            for fp2 in footprints[a1 + 1..].iter().flatten() {
                if fp1.dest == fp2.dest
                    || fp1.dest == fp2.second
                    || fp1.second == fp2.dest
                    || fp1.second == fp2.second
                {
                    return true;
                }
                // two agents grabbing the same box
                if fp1.box_src.is_some() && fp1.box_src == fp2.box_src {
                    return true;
                }
            }
        }
        false
    }

    /// All states reachable by one non-conflicting joint action,
    /// in a fixed order where agent 0's action changes fastest.
    ///
    /// Children are created lazily so the caller can stop mid-expansion.
    pub fn expand(&'a self) -> Successors<'a> {
        let agent_cnt = self.agents.len();
        Successors {
            state: self,
            applicable: (0..agent_cnt).map(|agent| self.applicable_actions(agent)).collect(),
            digits: (0..agent_cnt).collect(),
            permutation: vec![0; agent_cnt],
            done: false,
        }
    }

    /// Same as `expand` but each agent's actions and the order in which
    /// agents advance come from `rng`.
    pub fn expand_shuffled<R: Rng + ?Sized>(&'a self, rng: &mut R) -> Successors<'a> {
        let mut successors = self.expand();
        for actions in &mut successors.applicable {
            actions.shuffle(rng);
        }
        successors.digits.shuffle(rng);
        successors
    }

    /// The state after `joint_action`, or `None` if it's not applicable or conflicting.
    pub fn apply(&'a self, joint_action: &JointAction) -> Option<State<'a>> {
        let actions = joint_action.actions();
        if actions.len() != self.agents.len() {
            return None;
        }
        let applicable = actions
            .iter()
            .enumerate()
            .all(|(agent, &action)| self.is_applicable(agent, action));
        if !applicable || self.is_conflicting(actions) {
            return None;
        }
        Some(self.child(actions))
    }

    /// Precondition: the joint action is applicable and not conflicting.
    fn child(&'a self, joint_action: &[Action]) -> State<'a> {
        let mut agents = self.agents.clone();
        let mut boxes = self.boxes.clone();
        let mut move_penalties = self.move_penalties;

        for (agent, &action) in joint_action.iter().enumerate() {
            let agent_pos = self.agents[agent];
            match action {
                Action::NoOp => {}
                Action::Move(dir) => {
                    agents[agent] = self.neighbor(agent_pos, dir);
                    move_penalties += 1;
                }
                Action::Push(agent_dir, box_dir) => {
                    let box_pos = self.neighbor(agent_pos, agent_dir);
                    let box_dest = self.neighbor(box_pos, box_dir);
                    let letter = self.move_box(&mut boxes, box_pos, box_dest);
                    agents[agent] = box_pos;
                    move_penalties += self.box_progress_penalty(letter, box_pos, box_dest);
                }
                Action::Pull(agent_dir, box_dir) => {
                    let box_pos = self.neighbor(agent_pos, box_dir.inverse());
                    let letter = self.move_box(&mut boxes, box_pos, agent_pos);
                    agents[agent] = self.neighbor(agent_pos, agent_dir);
                    move_penalties += self.box_progress_penalty(letter, box_pos, agent_pos);
                }
            }
        }
        boxes.sort_unstable();

        State {
            map: self.map,
            agents,
            boxes,
            g: self.g + 1,
            parent: Some(self),
            joint_action: Some(JointAction::new(joint_action.to_vec())),
            move_penalties,
        }
    }

    /// `boxes` must still be in the same order as `self.boxes`.
    fn move_box(&self, boxes: &mut [(Pos, BoxLetter)], from: Pos, to: Pos) -> BoxLetter {
        let index = self
            .boxes
            .binary_search_by_key(&from, |&(p, _)| p)
            .unwrap_or_else(|_| panic!("no box to move at {:?}", from));
        boxes[index].0 = to;
        boxes[index].1
    }

    /// -1 if the box got closer to the nearest goal for its letter, +1 if it got farther.
    fn box_progress_penalty(&self, letter: BoxLetter, from: Pos, to: Pos) -> i32 {
        let nearest = |pos: Pos| self.map.box_goals(letter).iter().map(|&goal| goal.dist(pos)).min();
        match (nearest(from), nearest(to)) {
            (Some(before), Some(after)) if after < before => -1,
            (Some(before), Some(after)) if after > before => 1,
            _ => 0,
        }
    }

    /// Joint actions from the initial state to this one.
    pub fn extract_plan(&self) -> Plan {
        let mut steps = Vec::with_capacity(self.g as usize);
        let mut cur = self;
        while let (Some(joint_action), Some(parent)) = (&cur.joint_action, cur.parent) {
            steps.push(joint_action.clone());
            cur = parent;
        }
        steps.reverse();
        Plan::new(steps)
    }
}

/// Iterator over the children of a state, see `State::expand`.
#[derive(Debug)]
pub struct Successors<'a> {
    state: &'a State<'a>,
    applicable: Vec<Vec<Action>>,
    /// Agents from the fastest changing to the slowest.
    digits: Vec<usize>,
    permutation: Vec<usize>,
    done: bool,
}

impl Successors<'_> {
    /// Advance like an odometer, returns false after the last combination.
    fn advance(&mut self) -> bool {
        for &agent in &self.digits {
            if self.permutation[agent] + 1 < self.applicable[agent].len() {
                self.permutation[agent] += 1;
                return true;
            }
            self.permutation[agent] = 0;
        }
        false
    }
}

impl<'a> Iterator for Successors<'a> {
    type Item = State<'a>;

    fn next(&mut self) -> Option<State<'a>> {
        let mut joint_action = vec![Action::NoOp; self.permutation.len()];
        while !self.done {
            for (agent, action) in joint_action.iter_mut().enumerate() {
                *action = self.applicable[agent][self.permutation[agent]];
            }
            self.done = !self.advance();
            if !self.state.is_conflicting(&joint_action) {
                return Some(self.state.child(&joint_action));
            }
        }
        None
    }
}

impl PartialEq for State<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.agents == other.agents
            && self.boxes == other.boxes
            && (ptr::eq(self.map, other.map) || self.map == other.map)
    }
}

impl Eq for State<'_> {}

impl Hash for State<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // the map is the same for all states of a search
        self.agents.hash(state);
        self.boxes.hash(state);
    }
}

impl Display for State<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.map.format_with(&self.agents, &self.boxes))
    }
}

impl Debug for State<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "g: {}", self.g)?;
        write!(f, "{}", self)
    }
}
