//! Collaborator traits the host routes component intents to.

pub mod memory;

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;

use crate::types::{Comment, Credentials, Task, TaskId};

pub use memory::{MemoryAuth, MemoryComments, MemoryTasks};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Source of the comment list shown by the comments panel.
pub trait CommentSource: Send + Sync {
    fn load(&self) -> BoxFuture<'_, Result<Vec<Comment>>>;
    fn submit(&self, text: &str) -> Result<Comment>;
}

/// Account operations for the registration, login and logout controls.
pub trait AuthService {
    fn register(&mut self, credentials: Credentials) -> Result<()>;
    /// Returns the name of the signed-in user.
    fn login(&mut self, credentials: Credentials) -> Result<String>;
    fn logout(&mut self) -> Result<()>;
    fn current_user(&self) -> Option<&str>;
}

/// Task storage behind the tracker and the task manager.
pub trait TaskService {
    fn tasks(&self) -> Vec<Task>;
    fn create(&mut self, name: &str) -> Result<Task>;
    fn edit(&mut self, id: &TaskId, name: &str) -> Result<()>;
    fn delete(&mut self, id: &TaskId) -> Result<()>;
    fn assign(&mut self, id: &TaskId, user_id: Option<&str>) -> Result<()>;
    /// Returns the new completion flag.
    fn toggle(&mut self, id: &TaskId) -> Result<bool>;
}
