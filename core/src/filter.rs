use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::Todo;

/// Which part of the list the user is looking at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !todo.completed,
            Filter::Completed => todo.completed,
        }
    }

    pub fn apply(self, todos: &[Todo]) -> impl Iterator<Item = &Todo> {
        todos.iter().filter(move |todo| self.matches(todo))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter {0:?}")]
pub struct UnknownFilter(pub String);

impl FromStr for Filter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" => Ok(Filter::Completed),
            other => Err(UnknownFilter(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: i64, completed: bool) -> Todo {
        Todo {
            id,
            title: format!("todo {id}"),
            completed,
            user_id: 1,
        }
    }

    #[test]
    fn counts_per_filter() {
        let todos = vec![todo(1, false), todo(2, true), todo(3, true)];
        let counts: Vec<usize> = Filter::ALL
            .iter()
            .map(|filter| filter.apply(&todos).count())
            .collect();
        assert_eq!(counts, vec![3, 1, 2]);
    }

    #[test]
    fn apply_keeps_list_order() {
        let todos = vec![todo(5, true), todo(2, false), todo(9, true)];
        let ids: Vec<i64> = Filter::Completed.apply(&todos).map(|t| t.id).collect();
        assert_eq!(ids, vec![5, 9]);
    }

    #[test]
    fn parses_its_own_display() {
        for filter in Filter::ALL {
            assert_eq!(filter.to_string().parse::<Filter>(), Ok(filter));
        }
        assert_eq!(
            "done".parse::<Filter>(),
            Err(UnknownFilter("done".to_string()))
        );
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Filter::Active).unwrap(), r#""active""#);
    }
}
