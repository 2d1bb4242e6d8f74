//! The in-memory todo store.
//!
//! The store is an explicitly owned object injected into handler construction
//! so tests can instantiate isolated stores per test case. The standalone
//! server handles connections concurrently, so the map sits behind a mutex;
//! a `BTreeMap` keeps listing order deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

/// Payload for creating a todo
#[derive(Debug, Deserialize)]
pub struct CreateTodo {
    pub title: String,
}

/// Partial-update payload; absent fields keep their current value
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Default)]
pub struct TodoStore {
    todos: Mutex<BTreeMap<String, Todo>>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a todo with a generated unique id and `completed = false`
    pub fn create(&self, title: String) -> Todo {
        let todo = Todo { id: Uuid::new_v4().to_string(), title, completed: false };
        self.lock().insert(todo.id.clone(), todo.clone());
        todo
    }

    pub fn get(&self, id: &str) -> Option<Todo> {
        self.lock().get(id).cloned()
    }

    pub fn list(&self) -> Vec<Todo> {
        self.lock().values().cloned().collect()
    }

    /// Merges partial fields into an existing todo
    pub fn update(&self, id: &str, patch: UpdateTodo) -> Option<Todo> {
        let mut todos = self.lock();
        let todo = todos.get_mut(id)?;
        if let Some(title) = patch.title {
            todo.title = title;
        }
        if let Some(completed) = patch.completed {
            todo.completed = completed;
        }
        Some(todo.clone())
    }

    /// Removes a todo, returning whether it existed
    pub fn remove(&self, id: &str) -> bool {
        self.lock().remove(id).is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Todo>> {
        self.todos.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
