//! In-memory doubles for the repository and cache seams.
//!
//! Compiled for unit tests and, through the `test-utils` feature, for the
//! integration tests under `tests/`.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tasklane_cache::{CacheError, CacheStore};
use tasklane_models::todos::{DEFAULT_STATUS, NewTodo, Todo};

use crate::modules::todos::repository::{RepoError, TodoRepository};

/// Repository operations, for injecting failures into one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoOp {
    Create,
    FindById,
    FindAll,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy)]
enum Injected {
    Database,
    NotFound,
}

/// Vec-backed repository with soft deletes and a call counter.
#[derive(Default)]
pub struct InMemoryTodoRepository {
    todos: Mutex<Vec<Todo>>,
    calls: AtomicUsize,
    failing: AtomicBool,
    injected: Mutex<Vec<(RepoOp, Injected)>>,
}

impl InMemoryTodoRepository {
    /// Every call fails with a database error.
    pub fn failing() -> Self {
        let repo = Self::default();
        repo.failing.store(true, Ordering::SeqCst);
        repo
    }

    /// `op` fails with a database error; every other operation works.
    pub fn failing_on(self, op: RepoOp) -> Self {
        self.injected.lock().unwrap().push((op, Injected::Database));
        self
    }

    /// `op` reports [`RepoError::NotFound`] as if the row vanished after
    /// an earlier lookup.
    pub fn not_found_on(self, op: RepoOp) -> Self {
        self.injected.lock().unwrap().push((op, Injected::NotFound));
        self
    }

    /// Number of repository calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every stored row, soft-deleted ones included.
    pub fn rows(&self) -> Vec<Todo> {
        self.todos.lock().unwrap().clone()
    }

    fn enter(&self, op: RepoOp) -> Result<(), RepoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepoError::Database(sqlx::Error::PoolTimedOut));
        }
        let injected = self
            .injected
            .lock()
            .unwrap()
            .iter()
            .find(|(target, _)| *target == op)
            .map(|(_, kind)| *kind);
        match injected {
            Some(Injected::Database) => Err(RepoError::Database(sqlx::Error::PoolTimedOut)),
            Some(Injected::NotFound) => Err(RepoError::NotFound),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn create(&self, todo: NewTodo) -> Result<Todo, RepoError> {
        self.enter(RepoOp::Create)?;
        let mut todos = self.todos.lock().unwrap();
        let now = Utc::now();
        let created = Todo {
            id: todos.len() as i64 + 1,
            name: todo.name,
            description: todo.description,
            status: DEFAULT_STATUS.to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        todos.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Todo, RepoError> {
        self.enter(RepoOp::FindById)?;
        self.todos
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id && t.deleted_at.is_none())
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn find_all(&self) -> Result<Vec<Todo>, RepoError> {
        self.enter(RepoOp::FindAll)?;
        Ok(self
            .todos
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.deleted_at.is_none())
            .cloned()
            .collect())
    }

    async fn update(&self, todo: &Todo) -> Result<Todo, RepoError> {
        self.enter(RepoOp::Update)?;
        let mut todos = self.todos.lock().unwrap();
        let stored = todos
            .iter_mut()
            .find(|t| t.id == todo.id && t.deleted_at.is_none())
            .ok_or(RepoError::NotFound)?;
        stored.name = todo.name.clone();
        stored.description = todo.description.clone();
        stored.status = todo.status.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.enter(RepoOp::Delete)?;
        let mut todos = self.todos.lock().unwrap();
        let stored = todos
            .iter_mut()
            .find(|t| t.id == id && t.deleted_at.is_none())
            .ok_or(RepoError::NotFound)?;
        stored.deleted_at = Some(Utc::now());
        Ok(())
    }
}

/// HashMap-backed cache that records each operation as `"<OP> <key>"`.
#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, String>>,
    ops: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl InMemoryCache {
    /// Every operation fails as if the server were unreachable.
    pub fn failing() -> Self {
        let cache = Self::default();
        cache.failing.store(true, Ordering::SeqCst);
        cache
    }

    pub fn ops(&self) -> Vec<String> {
        self.ops.lock().unwrap().clone()
    }

    pub fn entry(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    /// Seeds an entry without recording an operation.
    pub fn seed(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn enter(&self, op: &str, key: &str) -> Result<(), CacheError> {
        self.ops.lock().unwrap().push(format!("{op} {key}"));
        if self.failing.load(Ordering::SeqCst) {
            let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "cache down");
            return Err(CacheError::Redis(io.into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    async fn set(&self, key: &str, value: String) -> Result<String, CacheError> {
        self.enter("SET", key)?;
        self.entries.lock().unwrap().insert(key.to_string(), value);
        Ok("OK".to_string())
    }

    async fn get(&self, key: &str) -> Result<String, CacheError> {
        self.enter("GET", key)?;
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or(CacheError::Miss)
    }

    async fn delete(&self, key: &str) -> Result<i64, CacheError> {
        self.enter("DEL", key)?;
        Ok(self.entries.lock().unwrap().remove(key).map_or(0, |_| 1))
    }
}
