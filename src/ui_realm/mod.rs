//! tui-realm UI components and types
//!
//! Every component here is a thin view layer: it renders from the data it was
//! mounted with and reports user intent as [`messages::Msg`] values. The host
//! model decides what those intents mean.

#[cfg(test)]
pub mod tests;

pub mod application;
pub mod components;
pub mod messages;
pub mod model;

/// Component identifier enum for tui-realm Application.
///
/// - `NavBar`: view tabs and status line, always mounted
/// - `Comments`: comment list with input and submit control
/// - `Registration` / `Login` / `Logout`: account controls
/// - `TaskItem`: single task, also used by the tracker for the focused task
/// - `TaskList`: tracker list of every task
/// - `TaskManager`: create/edit/delete/assign form
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ComponentId {
    NavBar,
    Comments,
    Registration,
    Login,
    Logout,
    TaskItem,
    TaskList,
    TaskManager,
}

#[cfg(test)]
mod component_id {
    use super::ComponentId;
    use std::collections::HashSet;

    #[test]
    fn variants_are_distinct() {
        let ids: HashSet<ComponentId> = [
            ComponentId::NavBar,
            ComponentId::Comments,
            ComponentId::Registration,
            ComponentId::Login,
            ComponentId::Logout,
            ComponentId::TaskItem,
            ComponentId::TaskList,
            ComponentId::TaskManager,
        ]
        .into_iter()
        .collect();

        assert_eq!(ids.len(), 8);
    }
}
