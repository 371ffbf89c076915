//! Flag predicates for gating locations.

use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::store::FlagStore;

/// A predicate evaluated against the flag store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// The flag exists with a non-empty value other than `"0"`.
    FlagSet(String),
    /// The flag equals a value.
    FlagEquals {
        /// Flag key.
        key: String,
        /// Expected value.
        value: String,
    },
    /// Logical NOT.
    Not(Box<Condition>),
    /// Logical AND.
    All(Vec<Condition>),
    /// Logical OR.
    Any(Vec<Condition>),
    /// Always true.
    #[default]
    Always,
}

impl Condition {
    /// Evaluate the condition against the current flags.
    pub fn evaluate(&self, flags: &dyn FlagStore) -> StoreResult<bool> {
        match self {
            Condition::FlagSet(key) => {
                Ok(flags.get(key)?.is_some_and(|v| !v.is_empty() && v != "0"))
            }
            Condition::FlagEquals { key, value } => {
                Ok(flags.get(key)?.is_some_and(|v| &v == value))
            }
            Condition::Not(inner) => Ok(!inner.evaluate(flags)?),
            Condition::All(conditions) => {
                for c in conditions {
                    if !c.evaluate(flags)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Condition::Any(conditions) => {
                for c in conditions {
                    if c.evaluate(flags)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Condition::Always => Ok(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryFlags;

    fn flags() -> MemoryFlags {
        let mut flags = MemoryFlags::new();
        flags.set("game-story.finished.intro", "1").unwrap();
        flags.set("game-story.mood", "grim").unwrap();
        flags.set("game-story.cleared", "0").unwrap();
        flags
    }

    #[test]
    fn flag_set() {
        let flags = flags();
        let cond = Condition::FlagSet("game-story.finished.intro".into());
        assert!(cond.evaluate(&flags).unwrap());

        let cond = Condition::FlagSet("game-story.finished.outro".into());
        assert!(!cond.evaluate(&flags).unwrap());

        let cond = Condition::FlagSet("game-story.cleared".into());
        assert!(!cond.evaluate(&flags).unwrap());
    }

    #[test]
    fn flag_equals() {
        let flags = flags();
        let cond = Condition::FlagEquals {
            key: "game-story.mood".into(),
            value: "grim".into(),
        };
        assert!(cond.evaluate(&flags).unwrap());

        let cond = Condition::FlagEquals {
            key: "game-story.mood".into(),
            value: "cheerful".into(),
        };
        assert!(!cond.evaluate(&flags).unwrap());
    }

    #[test]
    fn logical_combinators() {
        let flags = flags();
        let set = Condition::FlagSet("game-story.finished.intro".into());
        let unset = Condition::FlagSet("game-story.finished.outro".into());

        assert!(Condition::Not(Box::new(unset.clone())).evaluate(&flags).unwrap());
        assert!(!Condition::All(vec![set.clone(), unset.clone()]).evaluate(&flags).unwrap());
        assert!(Condition::Any(vec![unset, set]).evaluate(&flags).unwrap());
        assert!(Condition::All(vec![]).evaluate(&flags).unwrap());
        assert!(Condition::Always.evaluate(&flags).unwrap());
    }

    #[test]
    fn json_shape() {
        let cond: Condition = serde_json::from_str(
            r#"{ "all": [ { "flag_set": "a" }, { "not": { "flag_equals": { "key": "b", "value": "1" } } } ] }"#,
        )
        .unwrap();
        assert!(matches!(cond, Condition::All(ref v) if v.len() == 2));
    }
}
