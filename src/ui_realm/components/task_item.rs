use tuirealm::command::{Cmd, CmdResult};
use tuirealm::event::{Key, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use tuirealm::props::{AttrValue, Attribute, Props};
use tuirealm::ratatui::layout::{Position, Rect};
use tuirealm::ratatui::style::{Color, Modifier, Style};
use tuirealm::ratatui::text::{Line, Span};
use tuirealm::ratatui::widgets::{Block, Borders, Paragraph};
use tuirealm::{Component, Event, Frame, MockComponent, NoUserEvent, State, StateValue};

use crate::types::Task;
use crate::ui_realm::messages::Msg;

/// One task row: completion box, name, and the assignee if any.
///
/// Done tasks are struck through and dimmed.
pub fn task_row(task: &Task, selected: bool) -> Line<'static> {
    let marker = if selected { "> " } else { "  " };
    let check = if task.status { "[x] " } else { "[ ] " };
    let mut name_style = if task.status {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };
    if selected {
        name_style = name_style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
    }

    let mut spans = vec![
        Span::raw(marker),
        Span::styled(check, Style::default().fg(Color::Cyan)),
        Span::styled(task.name.clone(), name_style),
    ];
    if let Some(user_id) = &task.user_id {
        spans.push(Span::styled(
            format!("  @{user_id}"),
            Style::default().fg(Color::Magenta),
        ));
    }
    Line::from(spans)
}

/// A single task that flips its own completion flag when activated.
pub struct TaskItem {
    props: Props,
    task: Task,
    area: Option<Rect>,
}

impl TaskItem {
    pub fn new(task: Task) -> Self {
        Self {
            props: Props::default(),
            task,
            area: None,
        }
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    fn toggle(&mut self) -> Option<Msg> {
        self.task.status = !self.task.status;
        Some(Msg::ToggleTask(self.task.id.clone()))
    }

    fn clicked(&self, mouse: &MouseEvent) -> bool {
        self.area
            .is_some_and(|area| area.contains(Position::new(mouse.column, mouse.row)))
    }
}

impl MockComponent for TaskItem {
    fn view(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(" Task ");
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.area = Some(area);

        if inner.height == 0 || inner.width == 0 {
            return;
        }
        frame.render_widget(Paragraph::new(task_row(&self.task, false)), inner);
    }

    fn query(&self, attr: Attribute) -> Option<AttrValue> {
        self.props.get(attr)
    }

    fn attr(&mut self, attr: Attribute, value: AttrValue) {
        self.props.set(attr, value);
    }

    fn state(&self) -> State {
        State::One(StateValue::Bool(self.task.status))
    }

    fn perform(&mut self, _cmd: Cmd) -> CmdResult {
        CmdResult::None
    }
}

impl Component<Msg, NoUserEvent> for TaskItem {
    fn on(&mut self, ev: Event<NoUserEvent>) -> Option<Msg> {
        match ev {
            Event::Keyboard(KeyEvent {
                code: Key::Enter, ..
            })
            | Event::Keyboard(KeyEvent {
                code: Key::Char(' '),
                ..
            }) => self.toggle(),
            Event::Keyboard(KeyEvent { code: Key::Tab, .. })
            | Event::Keyboard(KeyEvent {
                code: Key::BackTab, ..
            }) => Some(Msg::FocusNextPane),
            Event::Mouse(
                mouse @ MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    ..
                },
            ) if self.clicked(&mouse) => self.toggle(),
            _ => None,
        }
    }
}

#[cfg(test)]
use crate::types::TaskId;
#[cfg(test)]
use crate::ui_realm::ComponentId;
#[cfg(test)]
use crate::ui_realm::tests::harness::EventDriver;
#[cfg(test)]
use crate::ui_realm::tests::helpers::{
    collect_messages, mount_component_for_test, render_simple_component, send_key_to_component,
};
#[cfg(test)]
use crossterm::event::KeyCode;

#[cfg(test)]
fn sample_task() -> Task {
    Task::new(1u64, "Test task")
}

#[cfg(test)]
#[test]
fn renders() {
    let driver = EventDriver::default();
    let mut app = mount_component_for_test(
        &driver,
        ComponentId::TaskItem,
        Box::new(TaskItem::new(sample_task().with_user("1"))),
    );

    let output = render_simple_component(&mut app, ComponentId::TaskItem);
    assert!(output.contains("[ ] Test task"), "open task should render");
    assert!(output.contains("@1"), "assignee should render");
}

#[cfg(test)]
#[test]
fn activation_toggles_and_emits_id() {
    let driver = EventDriver::default();
    let mut app = mount_component_for_test(
        &driver,
        ComponentId::TaskItem,
        Box::new(TaskItem::new(sample_task())),
    );

    let messages = send_key_to_component(&driver, &mut app, &[KeyCode::Enter], 1);
    assert_eq!(messages, vec![Msg::ToggleTask(TaskId::from(1u64))]);
    let output = render_simple_component(&mut app, ComponentId::TaskItem);
    assert!(output.contains("[x] Test task"), "task should render as done");

    let messages = send_key_to_component(&driver, &mut app, &[KeyCode::Char(' ')], 1);
    assert_eq!(messages, vec![Msg::ToggleTask(TaskId::from(1u64))]);
    let output = render_simple_component(&mut app, ComponentId::TaskItem);
    assert!(output.contains("[ ] Test task"), "second toggle restores state");
}

#[cfg(test)]
#[test]
fn click_inside_toggles_click_outside_does_not() {
    let driver = EventDriver::default();
    let mut app = mount_component_for_test(
        &driver,
        ComponentId::TaskItem,
        Box::new(TaskItem::new(sample_task())),
    );
    let mut terminal = crate::ui_realm::tests::harness::MockTerminal::new(60, 12);
    terminal.draw(|frame| {
        app.view(&ComponentId::TaskItem, frame, Rect::new(0, 0, 30, 3));
    });

    driver.send_click(50, 10);
    assert!(collect_messages(&mut app, 1).is_empty());

    driver.send_click(5, 1);
    assert_eq!(
        collect_messages(&mut app, 1),
        vec![Msg::ToggleTask(TaskId::from(1u64))]
    );
}
