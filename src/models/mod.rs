use serde::{Deserialize, Serialize};

/// A stored list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

/// Fields for a record about to be created. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub completed: bool,
}
impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            completed: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TodoPatch {
    pub completed: bool,
}

/// Wire shape of a todo; `text` mirrors `title` and is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoResponse {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub text: String,
}
impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self {
            text: todo.title.clone(),
            id: todo.id,
            title: todo.title,
            completed: todo.completed,
        }
    }
}
