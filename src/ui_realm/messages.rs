//! Semantic user action messages for tui-realm UI components.
//!
//! Components never call collaborators directly. Each user intent becomes one
//! `Msg` value that the host model routes to the matching service.

use std::fmt;
use std::str::FromStr;

use crate::types::{Credentials, TaskId};

/// Top-level screens selectable from the nav bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Comments,
    Account,
    Tracker,
    Manager,
}

impl View {
    pub const ALL: [View; 4] = [View::Comments, View::Account, View::Tracker, View::Manager];

    pub fn as_str(self) -> &'static str {
        match self {
            View::Comments => "comments",
            View::Account => "account",
            View::Tracker => "tracker",
            View::Manager => "manager",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Comments => "Comments",
            View::Account => "Account",
            View::Tracker => "Tracker",
            View::Manager => "Manager",
        }
    }

    /// F-key number that selects this view.
    pub fn hotkey(self) -> u8 {
        match self {
            View::Comments => 1,
            View::Account => 2,
            View::Tracker => 3,
            View::Manager => 4,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "comments" => Ok(View::Comments),
            "account" | "auth" => Ok(View::Account),
            "tracker" | "tasks" => Ok(View::Tracker),
            "manager" => Ok(View::Manager),
            _ => Err(()),
        }
    }
}

/// Focusable element inside a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Username,
    Password,
    Submit,
    CommentInput,
    CommentSubmit,
    NewTaskName,
    CreateTask,
    TaskName(usize),
    DeleteTask(usize),
    AssignTask(usize),
    TaskRow(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Comment text exactly as typed.
    SubmitComment(String),
    /// The panel finished loading this many comments.
    CommentsLoaded(usize),
    CommentsLoadFailed(String),

    Register(Credentials),
    Login(Credentials),
    Logout,

    ToggleTask(TaskId),
    CreateTask(String),
    /// A committed rename. `focus` is the manager field focused once the
    /// draft was reported, so a remount lands where the user moved to.
    EditTask {
        id: TaskId,
        name: String,
        focus: Field,
    },
    DeleteTask(TaskId),
    AssignTask {
        id: TaskId,
        user_id: Option<String>,
    },

    FocusField(Field),
    /// Move focus to the other component of a two-pane view.
    FocusNextPane,
    SwitchView(View),
    /// Cycle between the registration and login forms.
    CycleAccountForm,
    ShowError(String),
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_parses_aliases() {
        assert_eq!(View::from_str("Comments"), Ok(View::Comments));
        assert_eq!(View::from_str(" auth "), Ok(View::Account));
        assert_eq!(View::from_str("tasks"), Ok(View::Tracker));
        assert_eq!(View::from_str("manager"), Ok(View::Manager));
        assert_eq!(View::from_str("calendar"), Err(()));
    }

    #[test]
    fn hotkeys_are_sequential() {
        let keys: Vec<u8> = View::ALL.iter().map(|view| view.hotkey()).collect();
        assert_eq!(keys, vec![1, 2, 3, 4]);
    }
}
