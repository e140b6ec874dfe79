use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{error, info};
use tuirealm::Update;

use crate::fixtures::Fixtures;
use crate::services::{
    AuthService, CommentSource, MemoryAuth, MemoryComments, MemoryTasks, TaskService,
};
use crate::types::{Credentials, Task, TaskId};

use super::ComponentId;
use super::messages::{Field, Msg, View};

/// Which signed-out form the account view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountForm {
    #[default]
    Register,
    Login,
}

pub struct Model {
    pub comments: Arc<dyn CommentSource>,
    pub auth: Box<dyn AuthService>,
    pub tasks: Box<dyn TaskService>,
    pub view: View,
    pub account_form: AccountForm,
    pub tracker_pane: ComponentId,
    pub selected_task: usize,
    pub manager_focus: Field,
    pub notice: Option<String>,
    pub last_error: Option<String>,
    pub quit: bool,
    stale: HashSet<ComponentId>,
    focus_changed: bool,
}

impl Model {
    pub fn new(
        comments: Arc<dyn CommentSource>,
        auth: Box<dyn AuthService>,
        tasks: Box<dyn TaskService>,
    ) -> Self {
        Self {
            comments,
            auth,
            tasks,
            view: View::default(),
            account_form: AccountForm::default(),
            tracker_pane: ComponentId::TaskList,
            selected_task: 0,
            manager_focus: Field::NewTaskName,
            notice: None,
            last_error: None,
            quit: false,
            stale: HashSet::new(),
            focus_changed: true,
        }
    }

    /// Model backed by the in-memory collaborators seeded from `fixtures`.
    pub fn from_fixtures(fixtures: Fixtures, comment_delay: Duration) -> Self {
        Self::new(
            Arc::new(MemoryComments::new(fixtures.comments).with_delay(comment_delay)),
            Box::new(MemoryAuth::new(fixtures.users)),
            Box::new(MemoryTasks::new(fixtures.tasks)),
        )
    }

    pub fn with_view(mut self, view: View) -> Self {
        self.view = view;
        self
    }

    pub fn task_snapshot(&self) -> Vec<Task> {
        self.tasks.tasks()
    }

    pub fn current_user(&self) -> Option<String> {
        self.auth.current_user().map(str::to_string)
    }

    /// Component that should hold focus for the current view.
    pub fn focus_target(&self) -> ComponentId {
        match self.view {
            View::Comments => ComponentId::Comments,
            View::Account => {
                if self.auth.current_user().is_some() {
                    ComponentId::Logout
                } else {
                    match self.account_form {
                        AccountForm::Register => ComponentId::Registration,
                        AccountForm::Login => ComponentId::Login,
                    }
                }
            }
            View::Tracker => {
                if self.tracker_pane == ComponentId::TaskItem && self.task_snapshot().is_empty() {
                    ComponentId::TaskList
                } else {
                    self.tracker_pane
                }
            }
            View::Manager => ComponentId::TaskManager,
        }
    }

    /// Components whose mounted copy no longer matches the model.
    pub fn take_stale(&mut self) -> HashSet<ComponentId> {
        std::mem::take(&mut self.stale)
    }

    pub fn take_focus_change(&mut self) -> bool {
        std::mem::take(&mut self.focus_changed)
    }

    fn mark_task_views_stale(&mut self) {
        self.stale.insert(ComponentId::TaskList);
        self.stale.insert(ComponentId::TaskItem);
        self.stale.insert(ComponentId::TaskManager);
    }

    fn succeed(&mut self, notice: String) -> Option<Msg> {
        info!("{notice}");
        self.notice = Some(notice);
        self.last_error = None;
        None
    }

    fn show_error(&mut self, error: anyhow::Error) -> Option<Msg> {
        let detail = format!("{error:#}");
        self.last_error = Some(detail.clone());
        Some(Msg::ShowError(detail))
    }

    fn submit_comment(&mut self, text: &str) -> Result<String> {
        self.comments
            .submit(text)
            .context("failed to submit comment")?;
        self.stale.insert(ComponentId::Comments);
        Ok("Comment posted".to_string())
    }

    fn register(&mut self, credentials: Credentials) -> Result<String> {
        let username = credentials.username.clone();
        self.auth
            .register(credentials)
            .context("registration failed")?;
        self.account_form = AccountForm::Login;
        self.stale.insert(ComponentId::Registration);
        self.focus_changed = true;
        Ok(format!("Registered {username}, sign in to continue"))
    }

    fn login(&mut self, credentials: Credentials) -> Result<String> {
        let username = self.auth.login(credentials).context("login failed")?;
        self.stale.insert(ComponentId::Login);
        self.stale.insert(ComponentId::Logout);
        self.focus_changed = true;
        Ok(format!("Signed in as {username}"))
    }

    fn logout(&mut self) -> Result<String> {
        self.auth.logout().context("logout failed")?;
        self.account_form = AccountForm::Login;
        self.focus_changed = true;
        Ok("Signed out".to_string())
    }

    fn toggle_task(&mut self, id: &TaskId) -> Result<String> {
        let done = self
            .tasks
            .toggle(id)
            .with_context(|| format!("failed to toggle task {id}"))?;
        if let Some(index) = self.task_snapshot().iter().position(|task| &task.id == id) {
            self.selected_task = index;
        }
        self.mark_task_views_stale();
        let state = if done { "done" } else { "open" };
        Ok(format!("Task {id} marked {state}"))
    }

    fn create_task(&mut self, name: &str) -> Result<String> {
        let task = self.tasks.create(name).context("failed to create task")?;
        self.mark_task_views_stale();
        Ok(format!("Created task \"{}\"", task.name))
    }

    fn edit_task(&mut self, id: &TaskId, name: &str) -> Result<String> {
        self.tasks
            .edit(id, name)
            .with_context(|| format!("failed to rename task {id}"))?;
        self.mark_task_views_stale();
        Ok(format!("Renamed task {id}"))
    }

    fn delete_task(&mut self, id: &TaskId) -> Result<String> {
        self.tasks
            .delete(id)
            .with_context(|| format!("failed to delete task {id}"))?;
        let remaining = self.task_snapshot().len();
        self.selected_task = self.selected_task.min(remaining.saturating_sub(1));
        self.mark_task_views_stale();
        self.focus_changed = true;
        Ok(format!("Deleted task {id}"))
    }

    fn assign_task(&mut self, id: &TaskId, user_id: Option<&str>) -> Result<String> {
        self.tasks
            .assign(id, user_id)
            .with_context(|| format!("failed to assign task {id}"))?;
        self.mark_task_views_stale();
        Ok(match user_id {
            Some(user_id) => format!("Assigned task {id} to {user_id}"),
            None => format!("Task {id} is unassigned"),
        })
    }

    fn track_focus(&mut self, field: Field) {
        match field {
            Field::TaskRow(index) => {
                self.selected_task = index;
                self.stale.insert(ComponentId::TaskItem);
            }
            Field::NewTaskName
            | Field::CreateTask
            | Field::TaskName(_)
            | Field::DeleteTask(_)
            | Field::AssignTask(_) => self.manager_focus = field,
            _ => {}
        }
    }

    fn outcome(&mut self, result: Result<String>) -> Option<Msg> {
        match result {
            Ok(notice) => self.succeed(notice),
            Err(error) => self.show_error(error),
        }
    }
}

impl Update<Msg> for Model {
    fn update(&mut self, msg: Option<Msg>) -> Option<Msg> {
        match msg {
            Some(Msg::SubmitComment(text)) => {
                let result = self.submit_comment(&text);
                self.outcome(result)
            }
            Some(Msg::CommentsLoaded(count)) => {
                self.notice = Some(format!("Loaded {count} comments"));
                None
            }
            Some(Msg::CommentsLoadFailed(message)) => {
                error!("comment load failed: {message}");
                None
            }
            Some(Msg::Register(credentials)) => {
                let result = self.register(credentials);
                self.outcome(result)
            }
            Some(Msg::Login(credentials)) => {
                let result = self.login(credentials);
                self.outcome(result)
            }
            Some(Msg::Logout) => {
                let result = self.logout();
                self.outcome(result)
            }
            Some(Msg::ToggleTask(id)) => {
                let result = self.toggle_task(&id);
                self.outcome(result)
            }
            Some(Msg::CreateTask(name)) => {
                let result = self.create_task(&name);
                self.outcome(result)
            }
            Some(Msg::EditTask { id, name, focus }) => {
                self.track_focus(focus);
                let result = self.edit_task(&id, &name);
                self.outcome(result)
            }
            Some(Msg::DeleteTask(id)) => {
                let result = self.delete_task(&id);
                self.outcome(result)
            }
            Some(Msg::AssignTask { id, user_id }) => {
                let result = self.assign_task(&id, user_id.as_deref());
                self.outcome(result)
            }
            Some(Msg::FocusField(field)) => {
                self.track_focus(field);
                None
            }
            Some(Msg::FocusNextPane) => {
                if self.view == View::Tracker {
                    self.tracker_pane = match self.tracker_pane {
                        ComponentId::TaskList => ComponentId::TaskItem,
                        _ => ComponentId::TaskList,
                    };
                    self.focus_changed = true;
                }
                None
            }
            Some(Msg::SwitchView(view)) => {
                self.view = view;
                self.focus_changed = true;
                None
            }
            Some(Msg::CycleAccountForm) => {
                if self.auth.current_user().is_none() {
                    self.account_form = match self.account_form {
                        AccountForm::Register => AccountForm::Login,
                        AccountForm::Login => AccountForm::Register,
                    };
                    self.focus_changed = true;
                }
                None
            }
            Some(Msg::ShowError(detail)) => {
                error!("{detail}");
                self.last_error = Some(detail);
                None
            }
            Some(Msg::Quit) => {
                self.quit = true;
                None
            }
            None => None,
        }
    }
}
