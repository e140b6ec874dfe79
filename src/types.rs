use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Task identifier.
///
/// Fixtures and collaborators hand out ids either as JSON numbers or strings,
/// so both forms deserialize into the same textual id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for TaskId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        string_or_number(deserializer).map(Self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(value) => value.to_string(),
            RawId::Text(value) => value,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawId>::deserialize(deserializer).map(|raw| raw.map(String::from))
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Comment {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub text: String,
}

impl Comment {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub status: bool,
    #[serde(
        default,
        alias = "userId",
        deserialize_with = "optional_string_or_number"
    )]
    pub user_id: Option<String>,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: false,
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_status(mut self, status: bool) -> Self {
        self.status = status;
        self
    }
}

#[derive(Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_accepts_numbers_and_strings() {
        let numeric: Task =
            serde_json::from_str(r#"{"id":1,"name":"Test task","status":false}"#).unwrap();
        let textual: Task = serde_json::from_str(r#"{"id":"1","name":"Test task"}"#).unwrap();

        assert_eq!(numeric.id, TaskId::from(1u64));
        assert_eq!(textual.id, TaskId::from("1"));
        assert_eq!(numeric.id, textual.id);
        assert!(!textual.status, "missing status should default to not done");
    }

    #[test]
    fn task_user_id_accepts_camel_case_alias() {
        let task: Task =
            serde_json::from_str(r#"{"id":"1","name":"Test task","userId":7}"#).unwrap();
        assert_eq!(task.user_id.as_deref(), Some("7"));

        let task: Task =
            serde_json::from_str(r#"{"id":"2","name":"Other","user_id":"abc"}"#).unwrap();
        assert_eq!(task.user_id.as_deref(), Some("abc"));
    }

    #[test]
    fn credentials_debug_hides_password() {
        let credentials = Credentials::new("testUser", "testPass");
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("testUser"));
        assert!(!rendered.contains("testPass"));
    }
}
