//! Persistence client for todo records.
//!
//! Handlers only see [`TodoRepository`]; the sled-backed implementation is built
//! once at startup and shared for the life of the process.

use uuid::Uuid;

use crate::{
    db::Db,
    models::{NewTodo, Todo, TodoPatch},
};

const KEY_PREFIX: &str = "todo:";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record exists under the given id.
    #[error("record {0} not found")]
    RecordNotFound(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Typed CRUD access to the todo records.
pub trait TodoRepository: Send + Sync {
    fn find_many(&self) -> StoreResult<Vec<Todo>>;
    fn find_unique(&self, id: &str) -> StoreResult<Option<Todo>>;
    fn create(&self, new: NewTodo) -> StoreResult<Todo>;
    fn update(&self, id: &str, patch: TodoPatch) -> StoreResult<Todo>;
    /// Flips `completed` in a single atomic step against the stored value.
    fn toggle(&self, id: &str) -> StoreResult<Todo>;
    fn delete(&self, id: &str) -> StoreResult<()>;
}

#[derive(Debug)]
pub struct SledTodoRepository {
    db: Db,
}
impl SledTodoRepository {
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

fn key(id: &str) -> String {
    format!("{KEY_PREFIX}{id}")
}

impl TodoRepository for SledTodoRepository {
    fn find_many(&self) -> StoreResult<Vec<Todo>> {
        let mut todos = Vec::new();
        for item in self.db.iter_prefix::<Todo>(KEY_PREFIX)? {
            let (_, todo) = item?;
            todos.push(todo);
        }
        Ok(todos)
    }

    fn find_unique(&self, id: &str) -> StoreResult<Option<Todo>> {
        Ok(self.db.get(key(id))?)
    }

    fn create(&self, new: NewTodo) -> StoreResult<Todo> {
        // v7 ids sort by creation time, so prefix scans list oldest first
        let todo = Todo {
            id: Uuid::now_v7().to_string(),
            title: new.title,
            completed: new.completed,
        };
        self.db.insert(key(&todo.id), &todo)?;
        Ok(todo)
    }

    fn update(&self, id: &str, patch: TodoPatch) -> StoreResult<Todo> {
        let updated = self.db.update(key(id), |mut todo: Todo| {
            todo.completed = patch.completed;
            todo
        })?;
        updated.ok_or_else(|| StoreError::RecordNotFound(id.to_string()))
    }

    fn toggle(&self, id: &str) -> StoreResult<Todo> {
        let toggled = self.db.update(key(id), |mut todo: Todo| {
            todo.completed = !todo.completed;
            todo
        })?;
        toggled.ok_or_else(|| StoreError::RecordNotFound(id.to_string()))
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        if self.db.remove(key(id))? {
            Ok(())
        } else {
            Err(StoreError::RecordNotFound(id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use super::*;

    fn repository() -> Result<SledTodoRepository> {
        Ok(SledTodoRepository::new(Db::temporary()?))
    }

    #[test]
    fn create_assigns_distinct_ids() -> Result<()> {
        let repo = repository()?;
        let first = repo.create(NewTodo::new("one"))?;
        let second = repo.create(NewTodo::new("one"))?;
        assert_ne!(first.id, second.id);
        assert!(!first.completed);
        assert_eq!(first.title, "one");
        Ok(())
    }

    #[test]
    fn find_many_lists_in_creation_order() -> Result<()> {
        let repo = repository()?;
        assert!(repo.find_many()?.is_empty());
        let titles = ["first", "second", "third"];
        for title in titles {
            repo.create(NewTodo::new(title))?;
        }
        let found: Vec<_> = repo.find_many()?.into_iter().map(|t| t.title).collect();
        assert_eq!(found, titles);
        Ok(())
    }

    #[test]
    fn find_unique_and_update() -> Result<()> {
        let repo = repository()?;
        let todo = repo.create(NewTodo::new("flip me"))?;
        let updated = repo.update(&todo.id, TodoPatch { completed: true })?;
        assert!(updated.completed);
        assert_eq!(updated.title, "flip me");
        assert_eq!(repo.find_unique(&todo.id)?, Some(updated));
        assert!(repo.find_unique("nope")?.is_none());
        Ok(())
    }

    #[test]
    fn toggle_flips_stored_value() -> Result<()> {
        let repo = repository()?;
        let todo = repo.create(NewTodo::new("flip"))?;
        assert!(repo.toggle(&todo.id)?.completed);
        assert!(!repo.toggle(&todo.id)?.completed);
        assert_eq!(repo.find_unique(&todo.id)?.map(|t| t.completed), Some(false));
        let err = repo.toggle("nope").unwrap_err();
        assert!(matches!(err, StoreError::RecordNotFound(_)));
        Ok(())
    }

    #[test]
    fn concurrent_toggles_are_not_lost() -> Result<()> {
        let repo = std::sync::Arc::new(repository()?);
        let todo = repo.create(NewTodo::new("contended"))?;
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let repo = repo.clone();
                let id = todo.id.clone();
                std::thread::spawn(move || -> Result<()> {
                    for _ in 0..25 {
                        repo.toggle(&id)?;
                    }
                    Ok(())
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap()?;
        }
        // 8 * 25 flips is even
        assert_eq!(repo.find_unique(&todo.id)?.map(|t| t.completed), Some(false));
        Ok(())
    }

    #[test]
    fn update_missing_record() -> Result<()> {
        let repo = repository()?;
        let err = repo
            .update("nope", TodoPatch { completed: true })
            .unwrap_err();
        assert!(matches!(err, StoreError::RecordNotFound(id) if id == "nope"));
        Ok(())
    }

    #[test]
    fn delete_then_delete_again() -> Result<()> {
        let repo = repository()?;
        let todo = repo.create(NewTodo::new("short lived"))?;
        repo.delete(&todo.id)?;
        assert!(repo.find_many()?.is_empty());
        let err = repo.delete(&todo.id).unwrap_err();
        assert!(matches!(err, StoreError::RecordNotFound(_)));
        Ok(())
    }
}
