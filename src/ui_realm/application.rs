use std::sync::Arc;
use std::time::Duration;

use tuirealm::application::ApplicationResult;
use tuirealm::event::{Key, KeyEvent, KeyModifiers};
use tuirealm::listener::EventListenerCfg;
use tuirealm::ratatui::layout::{Constraint, Layout};
use tuirealm::{
    Application, Frame, NoUserEvent, PollStrategy, Sub, SubClause, SubEventClause, Update,
};

use super::ComponentId;
use super::components::{
    CommentsPanel, CredentialsForm, LogoutButton, NavBar, TaskItem, TaskList, TaskManager,
};
use super::messages::{Msg, View};
use super::model::Model;

const MOUNT_ORDER: [ComponentId; 8] = [
    ComponentId::Comments,
    ComponentId::Registration,
    ComponentId::Login,
    ComponentId::Logout,
    ComponentId::TaskList,
    ComponentId::TaskItem,
    ComponentId::TaskManager,
    ComponentId::NavBar,
];

pub struct TuiApplication {
    app: Application<ComponentId, Msg, NoUserEvent>,
}

impl Default for TuiApplication {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiApplication {
    pub fn new() -> Self {
        Self::with_listener(EventListenerCfg::default())
    }

    pub fn with_listener(listener_cfg: EventListenerCfg<NoUserEvent>) -> Self {
        Self {
            app: Application::init(listener_cfg),
        }
    }

    /// Crossterm-backed listener ticking every `tick_interval`.
    pub fn listener_cfg(tick_interval: Duration) -> EventListenerCfg<NoUserEvent> {
        EventListenerCfg::default()
            .crossterm_input_listener(Duration::from_millis(20), 3)
            .poll_timeout(Duration::from_millis(10))
            .tick_interval(tick_interval)
    }

    pub fn tick(&mut self, strategy: PollStrategy) -> ApplicationResult<Vec<Msg>> {
        self.app.tick(strategy)
    }

    /// Polls events, feeds every message through the model and brings the
    /// mounted components back in line with it. Returns the message count.
    pub fn tick_and_update(
        &mut self,
        model: &mut Model,
        strategy: PollStrategy,
    ) -> ApplicationResult<usize> {
        let messages = self.tick(strategy)?;
        let count = messages.len();
        for msg in messages {
            let mut next = Some(msg);
            while next.is_some() {
                next = model.update(next);
            }
        }
        if count > 0 {
            self.sync(model)?;
        }
        Ok(count)
    }

    pub fn app(&self) -> &Application<ComponentId, Msg, NoUserEvent> {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut Application<ComponentId, Msg, NoUserEvent> {
        &mut self.app
    }

    pub fn mount_all_components(&mut self, model: &mut Model) -> ApplicationResult<()> {
        for id in MOUNT_ORDER {
            self.remount_component(id, model)?;
        }
        model.take_stale();
        model.take_focus_change();
        self.app.active(&model.focus_target())
    }

    /// Remounts whatever the model marked stale, refreshes the nav bar and
    /// moves focus to the component the current view wants.
    pub fn sync(&mut self, model: &mut Model) -> ApplicationResult<()> {
        let mut stale = model.take_stale();
        stale.insert(ComponentId::NavBar);
        for id in MOUNT_ORDER.into_iter().filter(|id| stale.contains(id)) {
            self.remount_component(id, model)?;
        }

        let target = model.focus_target();
        if model.take_focus_change() || self.app.focus() != Some(&target) {
            self.app.active(&target)?;
        }
        Ok(())
    }

    fn remount_component(&mut self, id: ComponentId, model: &Model) -> ApplicationResult<()> {
        match id {
            ComponentId::NavBar => self.app.remount(
                id,
                Box::new(
                    NavBar::new(model.view)
                        .with_notice(model.notice.clone())
                        .with_error(model.last_error.clone())
                        .with_user(model.current_user()),
                ),
                nav_subscriptions(),
            ),
            ComponentId::Comments => self.app.remount(
                id,
                Box::new(CommentsPanel::new(Arc::clone(&model.comments))),
                vec![Sub::new(SubEventClause::Tick, SubClause::Always)],
            ),
            ComponentId::Registration => {
                self.app
                    .remount(id, Box::new(CredentialsForm::registration()), vec![])
            }
            ComponentId::Login => self
                .app
                .remount(id, Box::new(CredentialsForm::login()), vec![]),
            ComponentId::Logout => self.app.remount(
                id,
                Box::new(LogoutButton::new().with_user(model.current_user())),
                vec![],
            ),
            ComponentId::TaskList => self.app.remount(
                id,
                Box::new(TaskList::new(model.task_snapshot()).with_selected(model.selected_task)),
                vec![],
            ),
            ComponentId::TaskItem => match model.task_snapshot().get(model.selected_task) {
                Some(task) => self
                    .app
                    .remount(id, Box::new(TaskItem::new(task.clone())), vec![]),
                None if self.app.mounted(&id) => self.app.umount(&id),
                None => Ok(()),
            },
            ComponentId::TaskManager => self.app.remount(
                id,
                Box::new(TaskManager::new(model.task_snapshot()).with_focus(model.manager_focus)),
                vec![],
            ),
        }
    }

    pub fn view(&mut self, frame: &mut Frame<'_>, model: &Model) {
        let [nav_area, body] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(frame.area());
        self.app.view(&ComponentId::NavBar, frame, nav_area);

        match model.view {
            View::Tracker => {
                let [list_area, detail_area] =
                    Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                        .areas(body);
                self.app.view(&ComponentId::TaskList, frame, list_area);
                if self.app.mounted(&ComponentId::TaskItem) {
                    let [detail_area, _] =
                        Layout::vertical([Constraint::Length(3), Constraint::Min(0)])
                            .areas(detail_area);
                    self.app.view(&ComponentId::TaskItem, frame, detail_area);
                }
            }
            View::Account => {
                let [form_area, _] =
                    Layout::vertical([Constraint::Length(7), Constraint::Min(0)]).areas(body);
                self.app.view(&model.focus_target(), frame, form_area);
            }
            View::Comments | View::Manager => {
                self.app.view(&model.focus_target(), frame, body);
            }
        }
    }
}

fn nav_subscriptions() -> Vec<Sub<ComponentId, NoUserEvent>> {
    let mut subs: Vec<_> = View::ALL
        .into_iter()
        .map(|view| {
            Sub::new(
                SubEventClause::Keyboard(KeyEvent::new(
                    Key::Function(view.hotkey()),
                    KeyModifiers::NONE,
                )),
                SubClause::Always,
            )
        })
        .collect();
    subs.push(Sub::new(
        SubEventClause::Keyboard(KeyEvent::new(Key::Char('q'), KeyModifiers::CONTROL)),
        SubClause::Always,
    ));
    subs
}
