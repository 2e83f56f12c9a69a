use std::fmt::{self, Debug, Display, Formatter};

use crate::actions::Action;

/// One action per agent, indexed by agent number.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct JointAction(Vec<Action>);

impl JointAction {
    pub fn new(actions: Vec<Action>) -> Self {
        JointAction(actions)
    }

    pub fn actions(&self) -> &[Action] {
        &self.0
    }

    pub fn agent_cnt(&self) -> usize {
        self.0.len()
    }

    pub fn box_action_cnt(&self) -> usize {
        self.0.iter().filter(|a| a.is_box_action()).count()
    }
}

impl Display for JointAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, action) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "|")?;
            }
            write!(f, "{}", action)?;
        }
        Ok(())
    }
}

impl Debug for JointAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Plan(Vec<JointAction>);

impl Plan {
    pub fn new(steps: Vec<JointAction>) -> Self {
        Plan(steps)
    }

    /// Number of joint steps, equal to the depth of the goal state.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn box_action_cnt(&self) -> usize {
        self.0.iter().map(JointAction::box_action_cnt).sum()
    }

    pub fn iter(&self) -> ::std::slice::Iter<'_, JointAction> {
        self.0.iter()
    }
}

impl IntoIterator for Plan {
    type Item = JointAction;
    type IntoIter = ::std::vec::IntoIter<JointAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a JointAction;
    type IntoIter = ::std::slice::Iter<'a, JointAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One joint action per line, the way the server expects them.
impl Display for Plan {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for step in self {
            writeln!(f, "{}", step)?;
        }
        Ok(())
    }
}

impl Debug for Plan {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dir::*;

    #[test]
    fn formatting_plan() {
        let plan = Plan::new(vec![
            JointAction::new(vec![Action::Move(E), Action::NoOp]),
            JointAction::new(vec![Action::Push(E, E), Action::Pull(W, N)]),
        ]);
        assert_eq!(plan.to_string(), "Move(E)|NoOp\nPush(E,E)|Pull(W,N)\n");
        assert_eq!(format!("{:?}", plan), plan.to_string());
    }

    #[test]
    fn counting() {
        let plan = Plan::new(vec![
            JointAction::new(vec![Action::Move(N), Action::Push(S, E)]),
            JointAction::new(vec![Action::Pull(N, N), Action::Pull(W, W)]),
            JointAction::new(vec![Action::NoOp, Action::NoOp]),
        ]);
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.box_action_cnt(), 3);
        assert_eq!(plan.iter().map(JointAction::agent_cnt).sum::<usize>(), 6);
        assert!(Plan::default().is_empty());

        let mut steps = Vec::new();
        for step in &plan {
            steps.push(step.clone());
        }
        for step in plan.clone() {
            steps.push(step);
        }
        assert_eq!(steps.len(), 6);
        assert_eq!(steps[0], steps[3]);
    }
}
