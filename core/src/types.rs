//! Domain DTOs for the todo collection API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch any schema drift between the two crates. The wire
//! format uses camelCase, so `user_id` travels as `userId`.

use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a todo.
pub type TodoId = i64;

/// Id carried by the optimistic placeholder shown while a create is pending.
/// The server never assigns it.
pub const PLACEHOLDER_ID: TodoId = 0;

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
    pub user_id: i64,
}

impl Todo {
    /// Unsaved item rendered while its create request is in flight.
    pub fn placeholder(title: &str, user_id: i64) -> Self {
        Self {
            id: PLACEHOLDER_ID,
            title: title.to_string(),
            completed: false,
            user_id,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id == PLACEHOLDER_ID
    }
}

/// Request payload for creating a new todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    pub user_id: i64,
}
