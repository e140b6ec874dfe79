use tracing::warn;
use tuirealm::command::{Cmd, CmdResult};
use tuirealm::event::{Key, KeyEvent};
use tuirealm::props::{AttrValue, Attribute, Props};
use tuirealm::ratatui::layout::Rect;
use tuirealm::ratatui::text::{Line, Span};
use tuirealm::ratatui::widgets::{Block, Borders, Paragraph};
use tuirealm::{Component, Event, Frame, MockComponent, NoUserEvent, State, StateValue};

use super::text_field::{TextField, button};
use crate::types::Credentials;
use crate::ui_realm::messages::{Field, Msg};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Register,
    Login,
}

impl FormKind {
    fn title(self) -> &'static str {
        match self {
            FormKind::Register => " Register ",
            FormKind::Login => " Login ",
        }
    }

    fn action(self) -> &'static str {
        match self {
            FormKind::Register => "Register",
            FormKind::Login => "Login",
        }
    }

    fn message(self, credentials: Credentials) -> Msg {
        match self {
            FormKind::Register => Msg::Register(credentials),
            FormKind::Login => Msg::Login(credentials),
        }
    }
}

/// Username/password form shared by registration and login.
pub struct CredentialsForm {
    props: Props,
    kind: FormKind,
    username: TextField,
    password: TextField,
    focused_field: Field,
}

impl CredentialsForm {
    pub fn new(kind: FormKind) -> Self {
        Self {
            props: Props::default(),
            kind,
            username: TextField::new(),
            password: TextField::new().masked(),
            focused_field: Field::Username,
        }
    }

    pub fn registration() -> Self {
        Self::new(FormKind::Register)
    }

    pub fn login() -> Self {
        Self::new(FormKind::Login)
    }

    fn focus_order() -> &'static [Field] {
        &[Field::Username, Field::Password, Field::Submit]
    }

    fn focused_index(&self) -> usize {
        Self::focus_order()
            .iter()
            .position(|field| field == &self.focused_field)
            .unwrap_or(0)
    }

    fn focus_next(&mut self) -> Field {
        let order = Self::focus_order();
        self.focused_field = order[(self.focused_index() + 1) % order.len()];
        self.focused_field
    }

    fn focus_previous(&mut self) -> Field {
        let order = Self::focus_order();
        let current = self.focused_index();
        let previous = if current == 0 {
            order.len() - 1
        } else {
            current - 1
        };
        self.focused_field = order[previous];
        self.focused_field
    }

    fn active_input_mut(&mut self) -> Option<&mut TextField> {
        match self.focused_field {
            Field::Username => Some(&mut self.username),
            Field::Password => Some(&mut self.password),
            _ => None,
        }
    }

    fn submit(&self) -> Option<Msg> {
        if self.username.is_empty() || self.password.is_empty() {
            warn!("{} attempt dropped: all fields are required", self.kind.action());
            return None;
        }
        Some(self.kind.message(Credentials::new(
            self.username.value(),
            self.password.value(),
        )))
    }
}

impl MockComponent for CredentialsForm {
    fn view(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.kind.title());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let lines = vec![
            self.username
                .line("Username", self.focused_field == Field::Username),
            self.password
                .line("Password", self.focused_field == Field::Password),
            Line::default(),
            Line::from(vec![
                Span::raw("  "),
                button(self.kind.action(), self.focused_field == Field::Submit),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn query(&self, attr: Attribute) -> Option<AttrValue> {
        self.props.get(attr)
    }

    fn attr(&mut self, attr: Attribute, value: AttrValue) {
        self.props.set(attr, value);
    }

    fn state(&self) -> State {
        State::One(StateValue::Usize(self.focused_index()))
    }

    fn perform(&mut self, _cmd: Cmd) -> CmdResult {
        CmdResult::None
    }
}

impl Component<Msg, NoUserEvent> for CredentialsForm {
    fn on(&mut self, ev: Event<NoUserEvent>) -> Option<Msg> {
        let Event::Keyboard(key) = ev else {
            return None;
        };
        match key {
            KeyEvent { code: Key::Tab, .. } | KeyEvent { code: Key::Down, .. } => {
                Some(Msg::FocusField(self.focus_next()))
            }
            KeyEvent {
                code: Key::BackTab, ..
            }
            | KeyEvent { code: Key::Up, .. } => Some(Msg::FocusField(self.focus_previous())),
            KeyEvent {
                code: Key::Enter, ..
            } => match self.focused_field {
                Field::Username => Some(Msg::FocusField(self.focus_next())),
                _ => self.submit(),
            },
            KeyEvent {
                code: Key::Char(' '),
                ..
            } if self.focused_field == Field::Submit => self.submit(),
            _ => {
                if let Some(input) = self.active_input_mut() {
                    input.handle_key(&key);
                }
                None
            }
        }
    }
}

#[cfg(test)]
use crate::ui_realm::ComponentId;
#[cfg(test)]
use crate::ui_realm::tests::harness::EventDriver;
#[cfg(test)]
use crate::ui_realm::tests::helpers::{
    mount_component_for_test, render_simple_component, send_key_to_component, type_into,
};
#[cfg(test)]
use crossterm::event::KeyCode;

#[cfg(test)]
#[test]
fn renders() {
    let driver = EventDriver::default();
    let mut app = mount_component_for_test(
        &driver,
        ComponentId::Registration,
        Box::new(CredentialsForm::registration()),
    );

    let output = render_simple_component(&mut app, ComponentId::Registration);
    assert!(output.contains("Register"), "form title should render");
    assert!(output.contains("Username:"), "username field should render");
    assert!(output.contains("Password:"), "password field should render");
    assert!(output.contains("[ Register ]"), "submit action should render");
}

#[cfg(test)]
#[test]
fn password_is_masked() {
    let driver = EventDriver::default();
    let mut app = mount_component_for_test(
        &driver,
        ComponentId::Login,
        Box::new(CredentialsForm::login()),
    );

    send_key_to_component(&driver, &mut app, &[KeyCode::Tab], 1);
    type_into(&driver, &mut app, "testPass");

    let output = render_simple_component(&mut app, ComponentId::Login);
    assert!(!output.contains("testPass"), "password should not render in clear");
    assert!(output.contains("********"), "password should render masked");
}

#[cfg(test)]
fn fill_and_submit(
    driver: &EventDriver,
    app: &mut tuirealm::Application<ComponentId, Msg, NoUserEvent>,
    username: &str,
    password: &str,
) -> Vec<Msg> {
    let mut messages = type_into(driver, app, username);
    messages.extend(send_key_to_component(driver, app, &[KeyCode::Tab], 1));
    messages.extend(type_into(driver, app, password));
    messages.extend(send_key_to_component(
        driver,
        app,
        &[KeyCode::Tab, KeyCode::Enter],
        1,
    ));
    messages
}

#[cfg(test)]
#[test]
fn register_emits_credentials_once() {
    let driver = EventDriver::default();
    let mut app = mount_component_for_test(
        &driver,
        ComponentId::Registration,
        Box::new(CredentialsForm::registration()),
    );

    let messages = fill_and_submit(&driver, &mut app, "testUser", "testPass");
    let submitted: Vec<_> = messages
        .iter()
        .filter(|msg| matches!(msg, Msg::Register(_)))
        .collect();
    assert_eq!(
        submitted,
        vec![&Msg::Register(Credentials::new("testUser", "testPass"))],
        "register should be emitted exactly once with the typed pair"
    );
}

#[cfg(test)]
#[test]
fn login_emits_credentials_once() {
    let driver = EventDriver::default();
    let mut app = mount_component_for_test(
        &driver,
        ComponentId::Login,
        Box::new(CredentialsForm::login()),
    );

    let messages = fill_and_submit(&driver, &mut app, "testUser", "testPass");
    let submitted: Vec<_> = messages
        .iter()
        .filter(|msg| matches!(msg, Msg::Login(_)))
        .collect();
    assert_eq!(
        submitted,
        vec![&Msg::Login(Credentials::new("testUser", "testPass"))]
    );

    let output = render_simple_component(&mut app, ComponentId::Login);
    assert!(
        output.contains("testUser"),
        "fields should keep their values after submit"
    );
}

#[cfg(test)]
#[test]
fn empty_field_emits_nothing() {
    let driver = EventDriver::default();
    let mut app = mount_component_for_test(
        &driver,
        ComponentId::Login,
        Box::new(CredentialsForm::login()),
    );

    let messages = fill_and_submit(&driver, &mut app, "testUser", "");
    assert!(
        !messages
            .iter()
            .any(|msg| matches!(msg, Msg::Login(_) | Msg::Register(_))),
        "missing password should not submit"
    );

    let driver = EventDriver::default();
    let mut app = mount_component_for_test(
        &driver,
        ComponentId::Registration,
        Box::new(CredentialsForm::registration()),
    );
    let messages = send_key_to_component(
        &driver,
        &mut app,
        &[KeyCode::BackTab, KeyCode::Enter],
        1,
    );
    assert_eq!(
        messages,
        vec![Msg::FocusField(Field::Submit)],
        "empty form should only move focus"
    );
}
