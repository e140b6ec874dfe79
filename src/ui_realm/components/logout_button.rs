use tuirealm::command::{Cmd, CmdResult};
use tuirealm::event::{Key, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use tuirealm::props::{AttrValue, Attribute, Props};
use tuirealm::ratatui::layout::{Position, Rect};
use tuirealm::ratatui::style::{Color, Style};
use tuirealm::ratatui::text::{Line, Span};
use tuirealm::ratatui::widgets::{Block, Borders, Paragraph};
use tuirealm::{Component, Event, Frame, MockComponent, NoUserEvent, State};

use super::text_field::button;
use crate::ui_realm::messages::Msg;

pub struct LogoutButton {
    props: Props,
    button_area: Option<Rect>,
}

impl LogoutButton {
    pub fn new() -> Self {
        Self {
            props: Props::default(),
            button_area: None,
        }
    }

    /// Shows who is signed in above the control.
    pub fn with_user(mut self, username: Option<String>) -> Self {
        if let Some(username) = username {
            self.props.set(Attribute::Text, AttrValue::String(username));
        }
        self
    }

    fn username(&self) -> Option<String> {
        self.props.get(Attribute::Text).and_then(|value| match value {
            AttrValue::String(name) if !name.is_empty() => Some(name),
            _ => None,
        })
    }

    fn clicked(&self, mouse: &MouseEvent) -> bool {
        self.button_area
            .is_some_and(|area| area.contains(Position::new(mouse.column, mouse.row)))
    }
}

impl Default for LogoutButton {
    fn default() -> Self {
        Self::new()
    }
}

impl MockComponent for LogoutButton {
    fn view(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(" Account ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = Vec::new();
        if let Some(name) = self.username() {
            lines.push(Line::from(Span::styled(
                format!("Signed in as {name}"),
                Style::default().fg(Color::Green),
            )));
            lines.push(Line::default());
        }
        let row = inner.y + lines.len() as u16;
        let label = button("Logout", true);
        let width = (label.content.chars().count() as u16 + 2).min(inner.width);
        self.button_area = (row < inner.bottom()).then_some(Rect {
            y: row,
            width,
            height: 1,
            ..inner
        });
        lines.push(Line::from(vec![Span::raw("  "), label]));
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn query(&self, attr: Attribute) -> Option<AttrValue> {
        self.props.get(attr)
    }

    fn attr(&mut self, attr: Attribute, value: AttrValue) {
        self.props.set(attr, value);
    }

    fn state(&self) -> State {
        State::None
    }

    fn perform(&mut self, _cmd: Cmd) -> CmdResult {
        CmdResult::None
    }
}

impl Component<Msg, NoUserEvent> for LogoutButton {
    fn on(&mut self, ev: Event<NoUserEvent>) -> Option<Msg> {
        match ev {
            Event::Keyboard(KeyEvent {
                code: Key::Enter, ..
            })
            | Event::Keyboard(KeyEvent {
                code: Key::Char(' '),
                ..
            }) => Some(Msg::Logout),
            Event::Mouse(
                mouse @ MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    ..
                },
            ) => self.clicked(&mouse).then_some(Msg::Logout),
            _ => None,
        }
    }
}

#[cfg(test)]
use crate::ui_realm::ComponentId;
#[cfg(test)]
use crate::ui_realm::tests::harness::EventDriver;
#[cfg(test)]
use crate::ui_realm::tests::helpers::{
    mount_component_for_test, render_simple_component, send_key_to_component,
};
#[cfg(test)]
use crossterm::event::KeyCode;

#[cfg(test)]
#[test]
fn renders() {
    let driver = EventDriver::default();
    let mut app = mount_component_for_test(
        &driver,
        ComponentId::Logout,
        Box::new(LogoutButton::new().with_user(Some("testUser".to_string()))),
    );

    let output = render_simple_component(&mut app, ComponentId::Logout);
    assert!(output.contains("[ Logout ]"), "logout control should render");
    assert!(
        output.contains("Signed in as testUser"),
        "signed-in user should render"
    );
}

#[cfg(test)]
#[test]
fn activation_emits_logout_once() {
    let driver = EventDriver::default();
    let mut app =
        mount_component_for_test(&driver, ComponentId::Logout, Box::new(LogoutButton::new()));

    let messages = send_key_to_component(&driver, &mut app, &[KeyCode::Enter], 1);
    assert_eq!(messages, vec![Msg::Logout], "one activation, one logout");

    render_simple_component(&mut app, ComponentId::Logout);
    driver.send_click(3, 1);
    let messages = send_key_to_component(&driver, &mut app, &[], 1);
    assert_eq!(messages, vec![Msg::Logout], "click should also log out");
}

#[cfg(test)]
#[test]
fn clicks_outside_the_button_are_ignored() {
    let driver = EventDriver::default();
    let mut app = mount_component_for_test(
        &driver,
        ComponentId::Logout,
        Box::new(LogoutButton::new().with_user(Some("testUser".to_string()))),
    );

    driver.send_click(3, 3);
    assert!(
        send_key_to_component(&driver, &mut app, &[], 1).is_empty(),
        "nothing is clickable before the first render"
    );

    render_simple_component(&mut app, ComponentId::Logout);
    for (column, row) in [(3, 1), (40, 3), (3, 10), (0, 0)] {
        driver.send_click(column, row);
    }
    assert!(send_key_to_component(&driver, &mut app, &[], 1).is_empty());

    driver.send_click(5, 3);
    let messages = send_key_to_component(&driver, &mut app, &[], 1);
    assert_eq!(messages, vec![Msg::Logout]);
}

#[cfg(test)]
#[test]
fn other_keys_are_ignored() {
    let driver = EventDriver::default();
    let mut app =
        mount_component_for_test(&driver, ComponentId::Logout, Box::new(LogoutButton::new()));

    let messages = send_key_to_component(
        &driver,
        &mut app,
        &[KeyCode::Tab, KeyCode::Char('x'), KeyCode::Esc],
        1,
    );
    assert!(messages.is_empty());
}
