//! Map access gate.

use std::fmt;

use fab_core::{FlagStore, MapNode, StoreResult};

/// How a map node may be used right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// Left out of listings but otherwise open; still enterable through
    /// `next` or an option.
    Hidden,
    /// Listed but greyed out.
    Disabled,
    /// Listed but closed, by its lock or its condition.
    Locked,
    /// Listed and enterable.
    Open,
}

impl Access {
    /// Whether the player may enter the node.
    pub fn is_enterable(self) -> bool {
        matches!(self, Access::Open | Access::Hidden)
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Hidden => write!(f, "hidden"),
            Access::Disabled => write!(f, "disabled"),
            Access::Locked => write!(f, "locked"),
            Access::Open => write!(f, "open"),
        }
    }
}

/// Evaluate a node's lock, condition and visibility against the flags.
///
/// Visibility only matters for nodes that pass every gate: a hidden node
/// that is disabled or locked reports that, not [`Access::Hidden`].
pub fn access(node: &MapNode, flags: &dyn FlagStore) -> StoreResult<Access> {
    if node.is_disabled {
        return Ok(Access::Disabled);
    }
    if node.is_locked {
        return Ok(Access::Locked);
    }
    let met = match &node.condition {
        Some(condition) => condition.evaluate(flags)?,
        None => true,
    };
    if !met {
        return Ok(Access::Locked);
    }
    if node.is_show {
        Ok(Access::Open)
    } else {
        Ok(Access::Hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fab_core::{Condition, Level, MemoryFlags, NodeId};

    fn node() -> MapNode {
        MapNode {
            id: NodeId::new(Level::Building, "inn"),
            pid: NodeId::root(),
            name: "inn".into(),
            level: Level::Building,
            title: String::new(),
            text: String::new(),
            cover: String::new(),
            options: Vec::new(),
            icon: None,
            is_disabled: false,
            is_show: true,
            order: None,
            is_locked: false,
            condition: None,
            next: None,
        }
    }

    #[test]
    fn plain_node_is_open() {
        assert_eq!(access(&node(), &MemoryFlags::new()).unwrap(), Access::Open);
        assert!(Access::Open.is_enterable());
    }

    #[test]
    fn hidden_open_node_is_enterable() {
        let mut n = node();
        n.is_show = false;
        let access = access(&n, &MemoryFlags::new()).unwrap();
        assert_eq!(access, Access::Hidden);
        assert!(access.is_enterable());
    }

    #[test]
    fn hidden_does_not_bypass_lock_or_condition() {
        let mut n = node();
        n.is_show = false;
        n.is_locked = true;
        assert_eq!(access(&n, &MemoryFlags::new()).unwrap(), Access::Locked);

        n.is_locked = false;
        n.condition = Some(Condition::FlagSet("game-story.finished.intro".into()));
        assert_eq!(access(&n, &MemoryFlags::new()).unwrap(), Access::Locked);

        n.is_disabled = true;
        let access = access(&n, &MemoryFlags::new()).unwrap();
        assert_eq!(access, Access::Disabled);
        assert!(!access.is_enterable());
    }

    #[test]
    fn disabled_and_locked() {
        let mut n = node();
        n.is_locked = true;
        assert_eq!(access(&n, &MemoryFlags::new()).unwrap(), Access::Locked);
        n.is_disabled = true;
        assert_eq!(access(&n, &MemoryFlags::new()).unwrap(), Access::Disabled);
    }

    #[test]
    fn condition_gates_entry() {
        let mut n = node();
        n.condition = Some(Condition::FlagSet("game-story.finished.intro".into()));
        let mut flags = MemoryFlags::new();
        assert_eq!(access(&n, &flags).unwrap(), Access::Locked);
        flags.set("game-story.finished.intro", "1").unwrap();
        assert_eq!(access(&n, &flags).unwrap(), Access::Open);
    }

    #[test]
    fn display() {
        assert_eq!(Access::Locked.to_string(), "locked");
    }
}
