use tuirealm::command::{Cmd, CmdResult};
use tuirealm::event::{Key, KeyEvent, KeyModifiers};
use tuirealm::props::{AttrValue, Attribute, Props};
use tuirealm::ratatui::layout::Rect;
use tuirealm::ratatui::style::{Color, Modifier, Style};
use tuirealm::ratatui::text::{Line, Span};
use tuirealm::ratatui::widgets::{Block, Borders, Paragraph};
use tuirealm::{Component, Event, Frame, MockComponent, NoUserEvent, State};

use crate::ui_realm::messages::{Msg, View};

const HINTS: &str = "Tab: next field  Enter: activate  Ctrl+Q: quit";

/// View tabs plus a one-line status area.
pub struct NavBar {
    props: Props,
    view: View,
    notice: Option<String>,
    error: Option<String>,
    user: Option<String>,
}

impl NavBar {
    pub fn new(view: View) -> Self {
        Self {
            props: Props::default(),
            view,
            notice: None,
            error: None,
            user: None,
        }
    }

    pub fn with_notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice;
        self
    }

    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }

    pub fn with_user(mut self, user: Option<String>) -> Self {
        self.user = user;
        self
    }

    fn tabs_line(&self) -> Line<'static> {
        let mut spans = Vec::new();
        for view in View::ALL {
            let style = if view == self.view {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan)
            };
            spans.push(Span::styled(
                format!(" F{} {} ", view.hotkey(), view.title()),
                style,
            ));
            spans.push(Span::raw(" "));
        }
        if let Some(user) = &self.user {
            spans.push(Span::styled(
                format!(" {user} "),
                Style::default().fg(Color::Green),
            ));
        }
        Line::from(spans)
    }

    fn status_line(&self) -> Line<'static> {
        match (&self.error, &self.notice) {
            (Some(error), _) => Line::from(Span::styled(
                format!(" Error: {error}"),
                Style::default().fg(Color::Red),
            )),
            (None, Some(notice)) => Line::from(Span::styled(
                format!(" {notice}"),
                Style::default().fg(Color::Blue),
            )),
            (None, None) => Line::from(Span::styled(
                format!(" {HINTS}"),
                Style::default().fg(Color::DarkGray),
            )),
        }
    }
}

impl MockComponent for NavBar {
    fn view(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::Blue));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new(vec![self.tabs_line(), self.status_line()]),
            inner,
        );
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

impl Component<Msg, NoUserEvent> for NavBar {
    fn on(&mut self, ev: Event<NoUserEvent>) -> Option<Msg> {
        match ev {
            Event::Keyboard(KeyEvent {
                code: Key::Function(index),
                ..
            }) => {
                let view = View::ALL
                    .into_iter()
                    .find(|view| view.hotkey() == index)?;
                if view == View::Account && self.view == View::Account {
                    Some(Msg::CycleAccountForm)
                } else {
                    Some(Msg::SwitchView(view))
                }
            }
            Event::Keyboard(KeyEvent {
                code: Key::Char('q') | Key::Char('Q'),
                modifiers,
            }) if modifiers.contains(KeyModifiers::CONTROL) => Some(Msg::Quit),
            _ => None,
        }
    }
}

#[cfg(test)]
use crate::ui_realm::ComponentId;
#[cfg(test)]
use crate::ui_realm::tests::harness::{EventDriver, MockTerminal};
#[cfg(test)]
use crate::ui_realm::tests::helpers::{
    collect_messages, mount_component_for_test, render_component, send_key_to_component,
};
#[cfg(test)]
use crossterm::event::{KeyCode, KeyEvent as CrosstermKeyEvent, KeyModifiers as CrosstermModifiers};

#[cfg(test)]
#[test]
fn renders_tabs_and_hints() {
    let driver = EventDriver::default();
    let mut app = mount_component_for_test(
        &driver,
        ComponentId::NavBar,
        Box::new(NavBar::new(View::Tracker).with_user(Some("testUser".to_string()))),
    );
    let mut terminal = MockTerminal::new(100, 3);
    let output = render_component(&mut app, ComponentId::NavBar, &mut terminal);

    assert!(output.contains("F1 Comments"), "comments tab should render");
    assert!(output.contains("F4 Manager"), "manager tab should render");
    assert!(output.contains("testUser"), "signed-in user should render");
    assert!(output.contains("Ctrl+Q: quit"), "hints should render by default");
}

#[cfg(test)]
#[test]
fn error_takes_precedence_over_notice() {
    let driver = EventDriver::default();
    let mut app = mount_component_for_test(
        &driver,
        ComponentId::NavBar,
        Box::new(
            NavBar::new(View::Comments)
                .with_notice(Some("Comment posted".to_string()))
                .with_error(Some("task 9 not found".to_string())),
        ),
    );
    let mut terminal = MockTerminal::new(100, 3);
    let output = render_component(&mut app, ComponentId::NavBar, &mut terminal);

    assert!(output.contains("Error: task 9 not found"));
    assert!(!output.contains("Comment posted"));
}

#[cfg(test)]
#[test]
fn function_keys_switch_views() {
    let driver = EventDriver::default();
    let mut app = mount_component_for_test(
        &driver,
        ComponentId::NavBar,
        Box::new(NavBar::new(View::Comments)),
    );

    let messages = send_key_to_component(
        &driver,
        &mut app,
        &[KeyCode::F(3), KeyCode::F(2), KeyCode::F(9)],
        1,
    );
    assert_eq!(
        messages,
        vec![Msg::SwitchView(View::Tracker), Msg::SwitchView(View::Account)]
    );
}

#[cfg(test)]
#[test]
fn account_hotkey_cycles_forms_when_active() {
    let driver = EventDriver::default();
    let mut app = mount_component_for_test(
        &driver,
        ComponentId::NavBar,
        Box::new(NavBar::new(View::Account)),
    );

    let messages = send_key_to_component(&driver, &mut app, &[KeyCode::F(2)], 1);
    assert_eq!(messages, vec![Msg::CycleAccountForm]);
}

#[cfg(test)]
#[test]
fn ctrl_q_quits() {
    let driver = EventDriver::default();
    let mut app = mount_component_for_test(
        &driver,
        ComponentId::NavBar,
        Box::new(NavBar::new(View::Comments)),
    );

    driver.send_key_event(CrosstermKeyEvent::new(
        KeyCode::Char('q'),
        CrosstermModifiers::CONTROL,
    ));
    assert_eq!(collect_messages(&mut app, 1), vec![Msg::Quit]);

    let messages = send_key_to_component(&driver, &mut app, &[KeyCode::Char('q')], 1);
    assert!(messages.is_empty(), "plain q is not a quit chord");
}
