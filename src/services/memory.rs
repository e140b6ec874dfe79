//! In-memory collaborators used by the demo host and the tests.

use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Result, anyhow, bail};
use tracing::{debug, info};
use uuid::Uuid;

use super::{AuthService, BoxFuture, CommentSource, TaskService};
use crate::types::{Comment, Credentials, Task, TaskId};

pub struct MemoryComments {
    comments: Mutex<Vec<Comment>>,
    delay: Duration,
    failure: Option<String>,
}

impl MemoryComments {
    pub fn new(comments: Vec<Comment>) -> Self {
        Self {
            comments: Mutex::new(comments),
            delay: Duration::ZERO,
            failure: None,
        }
    }

    /// Simulated latency applied to every load.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Every load rejects with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            comments: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
            failure: Some(message.into()),
        }
    }

    pub fn snapshot(&self) -> Result<Vec<Comment>> {
        self.comments
            .lock()
            .map(|comments| comments.clone())
            .map_err(|_| anyhow!("comment store lock poisoned"))
    }
}

impl CommentSource for MemoryComments {
    fn load(&self) -> BoxFuture<'_, Result<Vec<Comment>>> {
        Box::pin(async move {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if let Some(message) = &self.failure {
                bail!("{message}");
            }
            let comments = self.snapshot()?;
            debug!("loaded {} comments", comments.len());
            Ok(comments)
        })
    }

    fn submit(&self, text: &str) -> Result<Comment> {
        let comment = Comment::new(Uuid::new_v4().to_string(), text);
        self.comments
            .lock()
            .map_err(|_| anyhow!("comment store lock poisoned"))?
            .push(comment.clone());
        Ok(comment)
    }
}

#[derive(Default)]
pub struct MemoryAuth {
    users: Vec<Credentials>,
    session: Option<String>,
}

impl MemoryAuth {
    pub fn new(users: Vec<Credentials>) -> Self {
        Self {
            users,
            session: None,
        }
    }

    pub fn is_registered(&self, username: &str) -> bool {
        self.users.iter().any(|user| user.username == username)
    }
}

impl AuthService for MemoryAuth {
    fn register(&mut self, credentials: Credentials) -> Result<()> {
        if self.is_registered(&credentials.username) {
            bail!("Username already registered");
        }
        info!("registered user {}", credentials.username);
        self.users.push(credentials);
        Ok(())
    }

    fn login(&mut self, credentials: Credentials) -> Result<String> {
        let matches = self.users.iter().any(|user| {
            user.username == credentials.username && user.password == credentials.password
        });
        if !matches {
            bail!("Invalid username or password");
        }
        info!("user {} signed in", credentials.username);
        self.session = Some(credentials.username.clone());
        Ok(credentials.username)
    }

    fn logout(&mut self) -> Result<()> {
        match self.session.take() {
            Some(username) => {
                info!("user {username} signed out");
                Ok(())
            }
            None => bail!("no user is signed in"),
        }
    }

    fn current_user(&self) -> Option<&str> {
        self.session.as_deref()
    }
}

#[derive(Default)]
pub struct MemoryTasks {
    tasks: Vec<Task>,
}

impl MemoryTasks {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    fn find_mut(&mut self, id: &TaskId) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|task| &task.id == id)
            .ok_or_else(|| anyhow!("task {id} not found"))
    }
}

impl TaskService for MemoryTasks {
    fn tasks(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    fn create(&mut self, name: &str) -> Result<Task> {
        let task = Task::new(TaskId::new(Uuid::new_v4().to_string()), name);
        self.tasks.push(task.clone());
        Ok(task)
    }

    fn edit(&mut self, id: &TaskId, name: &str) -> Result<()> {
        self.find_mut(id)?.name = name.to_string();
        Ok(())
    }

    fn delete(&mut self, id: &TaskId) -> Result<()> {
        let before = self.tasks.len();
        self.tasks.retain(|task| &task.id != id);
        if self.tasks.len() == before {
            bail!("task {id} not found");
        }
        Ok(())
    }

    fn assign(&mut self, id: &TaskId, user_id: Option<&str>) -> Result<()> {
        self.find_mut(id)?.user_id = user_id.map(str::to_string);
        Ok(())
    }

    fn toggle(&mut self, id: &TaskId) -> Result<bool> {
        let task = self.find_mut(id)?;
        task.status = !task.status;
        Ok(task.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn comments_load_returns_seeded_order() {
        let source = MemoryComments::new(vec![
            Comment::new("1", "first"),
            Comment::new("2", "second"),
        ]);
        let loaded = source.load().await.expect("load should succeed");
        let texts: Vec<_> = loaded.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn failing_comments_reject_with_message() {
        let source = MemoryComments::failing("Failed to fetch");
        let error = source.load().await.expect_err("load should fail");
        assert_eq!(error.to_string(), "Failed to fetch");
    }

    #[test]
    fn submitted_comment_is_appended() {
        let source = MemoryComments::new(vec![Comment::new("1", "first")]);
        let comment = source.submit("New comment").expect("submit should succeed");
        assert_eq!(comment.text, "New comment");
        let snapshot = source.snapshot().expect("snapshot should succeed");
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[1].text, "New comment");
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut auth = MemoryAuth::default();
        auth.register(Credentials::new("testUser", "testPass"))
            .expect("first registration should succeed");
        let error = auth
            .register(Credentials::new("testUser", "other"))
            .expect_err("duplicate registration should fail");
        assert!(error.to_string().contains("already registered"));
    }

    #[test]
    fn login_requires_matching_pair() {
        let mut auth = MemoryAuth::new(vec![Credentials::new("testUser", "testPass")]);
        assert!(auth.login(Credentials::new("testUser", "wrong")).is_err());
        assert!(auth.login(Credentials::new("nobody", "testPass")).is_err());
        assert_eq!(auth.current_user(), None);

        let user = auth
            .login(Credentials::new("testUser", "testPass"))
            .expect("matching pair should sign in");
        assert_eq!(user, "testUser");
        assert_eq!(auth.current_user(), Some("testUser"));

        auth.logout().expect("logout should succeed");
        assert_eq!(auth.current_user(), None);
        assert!(auth.logout().is_err(), "second logout has no session");
    }

    #[test]
    fn task_operations_work_by_id() {
        let mut tasks = MemoryTasks::new(vec![Task::new(1u64, "Test task")]);
        let id = TaskId::from(1u64);

        assert!(tasks.toggle(&id).expect("toggle should succeed"));
        assert!(!tasks.toggle(&id).expect("toggle should succeed"));

        tasks.edit(&id, "Renamed").expect("edit should succeed");
        tasks.assign(&id, Some("7")).expect("assign should succeed");
        let task = &tasks.tasks()[0];
        assert_eq!(task.name, "Renamed");
        assert_eq!(task.user_id.as_deref(), Some("7"));

        let created = tasks.create("Another").expect("create should succeed");
        assert_eq!(tasks.tasks().len(), 2);
        tasks.delete(&created.id).expect("delete should succeed");
        assert_eq!(tasks.tasks().len(), 1);
    }

    #[test]
    fn unknown_task_id_is_an_error() {
        let mut tasks = MemoryTasks::default();
        let missing = TaskId::from("missing");
        assert!(tasks.toggle(&missing).is_err());
        assert!(tasks.edit(&missing, "x").is_err());
        assert!(tasks.delete(&missing).is_err());
        assert!(tasks.assign(&missing, None).is_err());
    }
}
