use std::fmt::{self, Debug, Display, Formatter};

use prettytable::format::consts::FORMAT_CLEAN;
use prettytable::{Cell, Row, Table};
use separator::Separatable;

use crate::state::State;

/// Per-depth counts of what happened to states during a search.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Stats {
    created_states: Vec<u64>,
    duplicate_states: Vec<u64>,
    expanded_states: Vec<u64>,
}

impl Stats {
    pub fn new() -> Self {
        Stats::default()
    }

    pub fn total_created(&self) -> u64 {
        self.created_states.iter().sum()
    }

    pub fn total_reached_duplicates(&self) -> u64 {
        self.duplicate_states.iter().sum()
    }

    pub fn total_expanded(&self) -> u64 {
        self.expanded_states.iter().sum()
    }

    /// Deepest level where anything was created.
    pub fn max_depth(&self) -> usize {
        self.created_states.len().saturating_sub(1)
    }

    pub fn add_created(&mut self, state: &State<'_>) -> bool {
        Self::add(&mut self.created_states, state)
    }

    pub fn add_reached_duplicate(&mut self, state: &State<'_>) -> bool {
        Self::add(&mut self.duplicate_states, state)
    }

    pub fn add_expanded(&mut self, state: &State<'_>) -> bool {
        Self::add(&mut self.expanded_states, state)
    }

    /// Returns true when the state is the first one at its depth.
    fn add(counts: &mut Vec<u64>, state: &State<'_>) -> bool {
        let depth = state.g() as usize;
        let mut ret = false;

        // while because depths can be skipped, e.g. duplicates only start at depth 1
        while depth >= counts.len() {
            counts.push(0);
            ret = true;
        }
        counts[depth] += 1;
        ret
    }

    fn at(counts: &[u64], depth: usize) -> u64 {
        counts.get(depth).cloned().unwrap_or(0)
    }

    fn depth_table(&self) -> Table {
        let mut table = Table::new();
        table.set_format(*FORMAT_CLEAN);
        table.set_titles(Row::new(vec![
            Cell::new("Depth"),
            Cell::new("Created"),
            Cell::new("Expanded"),
            Cell::new("Duplicates"),
            Cell::new("Not expanded"),
        ]));

        let depths = self
            .created_states
            .len()
            .max(self.duplicate_states.len())
            .max(self.expanded_states.len());
        for depth in 0..depths {
            let created = Self::at(&self.created_states, depth);
            let expanded = Self::at(&self.expanded_states, depth);
            let duplicates = Self::at(&self.duplicate_states, depth);
            table.add_row(Row::new(vec![
                Cell::new(&format!("{}:", depth)),
                Cell::new(&created.separated_string()),
                Cell::new(&expanded.separated_string()),
                Cell::new(&duplicates.separated_string()),
                Cell::new(&(created - expanded).separated_string()),
            ]));
        }
        table
    }
}

impl Debug for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "created by depth: {:?}", self.created_states)?;
        writeln!(f, "reached duplicates by depth: {:?}", self.duplicate_states)?;
        writeln!(f, "expanded by depth: {:?}", self.expanded_states)?;
        writeln!(f, "total created: {}", self.total_created().separated_string())?;
        writeln!(
            f,
            "total reached duplicates: {}",
            self.total_reached_duplicates().separated_string()
        )?;
        writeln!(f, "total expanded: {}", self.total_expanded().separated_string())
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let created = self.total_created();
        let expanded = self.total_expanded();
        writeln!(f, "States created total: {}", created.separated_string())?;
        writeln!(f, "States expanded total: {}", expanded.separated_string())?;
        writeln!(
            f,
            "Reached duplicates total: {}",
            self.total_reached_duplicates().separated_string()
        )?;
        writeln!(
            f,
            "Created but not expanded total: {}",
            (created - expanded).separated_string()
        )?;
        writeln!(f)?;
        write!(f, "{}", self.depth_table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;

    const LEVEL: &str = r"#domain
hospital
#levelname
stats
#colors
red: 0
#initial
++++
+0 +
++++
#goal
++++
+ 0+
++++
#end
";

    #[test]
    fn counting_by_depth() {
        let level: Level = LEVEL.parse().unwrap();
        let initial = level.initial_state();
        let children: Vec<_> = initial.expand().collect();
        assert_eq!(children.len(), 2);

        let mut stats = Stats::new();
        assert!(stats.add_created(&initial));
        assert!(stats.add_expanded(&initial));
        assert!(stats.add_created(&children[1]));
        assert!(!stats.add_created(&children[1]));
        // duplicates skip depth 0
        assert!(stats.add_reached_duplicate(&children[0]));

        assert_eq!(stats.total_created(), 3);
        assert_eq!(stats.total_expanded(), 1);
        assert_eq!(stats.total_reached_duplicates(), 1);
        assert_eq!(stats.max_depth(), 1);
        assert_eq!(
            format!("{:?}", stats),
            "created by depth: [1, 2]
reached duplicates by depth: [0, 1]
expanded by depth: [1]
total created: 3
total reached duplicates: 1
total expanded: 1
"
        );
    }

    #[test]
    fn display() {
        let level: Level = LEVEL.parse().unwrap();
        let initial = level.initial_state();
        let mut stats = Stats::new();
        for _ in 0..1234 {
            stats.add_created(&initial);
        }
        stats.add_expanded(&initial);

        let out = stats.to_string();
        assert!(out.starts_with(
            "States created total: 1,234
States expanded total: 1
Reached duplicates total: 0
Created but not expanded total: 1,233

"
        ));
        assert!(out.contains("Depth"));
        assert!(out.contains("Not expanded"));
        assert!(out.contains("0:"));
    }
}
