use tuirealm::command::{Cmd, CmdResult};
use tuirealm::event::{Key, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use tuirealm::props::{AttrValue, Attribute, Props};
use tuirealm::ratatui::layout::{Position, Rect};
use tuirealm::ratatui::style::{Color, Style};
use tuirealm::ratatui::text::Line;
use tuirealm::ratatui::widgets::{Block, Borders, Paragraph};
use tuirealm::{Component, Event, Frame, MockComponent, NoUserEvent, State, StateValue};

use super::task_item::task_row;
use crate::types::{Task, TaskId};
use crate::ui_realm::messages::{Field, Msg};

/// Tracker list. Owns the task collection and flips flags by id.
pub struct TaskList {
    props: Props,
    tasks: Vec<Task>,
    selected: usize,
    rows_area: Option<Rect>,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            props: Props::default(),
            tasks,
            selected: 0,
            rows_area: None,
        }
    }

    pub fn with_selected(mut self, index: usize) -> Self {
        self.selected = index.min(self.tasks.len().saturating_sub(1));
        self
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Inverts the flag of the task with `id`, if present.
    pub fn toggle(&mut self, id: &TaskId) -> bool {
        match self.tasks.iter_mut().find(|task| &task.id == id) {
            Some(task) => {
                task.status = !task.status;
                true
            }
            None => false,
        }
    }

    fn activate(&mut self, index: usize) -> Option<Msg> {
        let id = self.tasks.get(index)?.id.clone();
        self.selected = index;
        self.toggle(&id);
        Some(Msg::ToggleTask(id))
    }

    fn move_selection(&mut self, forward: bool) -> Option<Msg> {
        if self.tasks.is_empty() {
            return None;
        }
        let last = self.tasks.len() - 1;
        let next = if forward {
            (self.selected + 1).min(last)
        } else {
            self.selected.saturating_sub(1)
        };
        if next == self.selected {
            return None;
        }
        self.selected = next;
        Some(Msg::FocusField(Field::TaskRow(next)))
    }

    fn row_at(&self, mouse: &MouseEvent) -> Option<usize> {
        let area = self.rows_area?;
        if !area.contains(Position::new(mouse.column, mouse.row)) {
            return None;
        }
        let index = usize::from(mouse.row - area.y);
        (index < self.tasks.len()).then_some(index)
    }

    fn title(&self) -> String {
        let done = self.tasks.iter().filter(|task| task.status).count();
        format!(" Tasks {done}/{} ", self.tasks.len())
    }
}

impl MockComponent for TaskList {
    fn view(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(self.title());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.rows_area = Some(inner);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if self.tasks.is_empty() {
            frame.render_widget(
                Paragraph::new("No tasks").style(Style::default().fg(Color::DarkGray)),
                inner,
            );
            return;
        }

        let lines: Vec<Line> = self
            .tasks
            .iter()
            .enumerate()
            .map(|(index, task)| task_row(task, index == self.selected))
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn query(&self, attr: Attribute) -> Option<AttrValue> {
        self.props.get(attr)
    }

    fn attr(&mut self, attr: Attribute, value: AttrValue) {
        self.props.set(attr, value);
    }

    fn state(&self) -> State {
        State::One(StateValue::Usize(self.selected))
    }

    fn perform(&mut self, _cmd: Cmd) -> CmdResult {
        CmdResult::None
    }
}

impl Component<Msg, NoUserEvent> for TaskList {
    fn on(&mut self, ev: Event<NoUserEvent>) -> Option<Msg> {
        match ev {
            Event::Keyboard(KeyEvent { code: Key::Down, .. })
            | Event::Keyboard(KeyEvent {
                code: Key::Char('j'),
                ..
            }) => self.move_selection(true),
            Event::Keyboard(KeyEvent { code: Key::Up, .. })
            | Event::Keyboard(KeyEvent {
                code: Key::Char('k'),
                ..
            }) => self.move_selection(false),
            Event::Keyboard(KeyEvent {
                code: Key::Enter, ..
            })
            | Event::Keyboard(KeyEvent {
                code: Key::Char(' '),
                ..
            }) => self.activate(self.selected),
            Event::Keyboard(KeyEvent { code: Key::Tab, .. })
            | Event::Keyboard(KeyEvent {
                code: Key::BackTab, ..
            }) => Some(Msg::FocusNextPane),
            Event::Mouse(
                mouse @ MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    ..
                },
            ) => {
                let index = self.row_at(&mouse)?;
                self.activate(index)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use super::*;
    use crate::ui_realm::ComponentId;
    use crate::ui_realm::tests::harness::{EventDriver, MockTerminal};
    use crate::ui_realm::tests::helpers::{
        collect_messages, mount_component_for_test, render_component, render_simple_component,
        send_key_to_component,
    };

    fn single_task() -> Vec<Task> {
        vec![Task::new(1u64, "Test task")]
    }

    #[test]
    fn renders_one_row_per_task() {
        let driver = EventDriver::default();
        let mut app = mount_component_for_test(
            &driver,
            ComponentId::TaskList,
            Box::new(TaskList::new(vec![
                Task::new(1u64, "First"),
                Task::new(2u64, "Second").with_status(true),
            ])),
        );

        let output = render_simple_component(&mut app, ComponentId::TaskList);
        assert!(output.contains("Tasks 1/2"), "title should count done tasks");
        assert!(output.contains("[ ] First"));
        assert!(output.contains("[x] Second"));
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let driver = EventDriver::default();
        let mut app = mount_component_for_test(
            &driver,
            ComponentId::TaskList,
            Box::new(TaskList::new(Vec::new())),
        );

        let output = render_simple_component(&mut app, ComponentId::TaskList);
        assert!(output.contains("No tasks"));
        let messages = send_key_to_component(&driver, &mut app, &[KeyCode::Enter], 1);
        assert!(messages.is_empty(), "nothing to toggle in an empty list");
    }

    #[test]
    fn activation_toggles_back_and_forth() {
        let driver = EventDriver::default();
        let mut app = mount_component_for_test(
            &driver,
            ComponentId::TaskList,
            Box::new(TaskList::new(single_task())),
        );

        let messages = send_key_to_component(&driver, &mut app, &[KeyCode::Enter], 1);
        assert_eq!(messages, vec![Msg::ToggleTask(TaskId::from(1u64))]);
        let output = render_simple_component(&mut app, ComponentId::TaskList);
        assert!(output.contains("[x] Test task"), "task should be done");

        let messages = send_key_to_component(&driver, &mut app, &[KeyCode::Enter], 1);
        assert_eq!(messages, vec![Msg::ToggleTask(TaskId::from(1u64))]);
        let output = render_simple_component(&mut app, ComponentId::TaskList);
        assert!(output.contains("[ ] Test task"), "task should be open again");
    }

    #[test]
    fn selection_moves_and_clamps() {
        let driver = EventDriver::default();
        let mut app = mount_component_for_test(
            &driver,
            ComponentId::TaskList,
            Box::new(TaskList::new(vec![
                Task::new(1u64, "First"),
                Task::new(2u64, "Second"),
            ])),
        );

        let messages = send_key_to_component(
            &driver,
            &mut app,
            &[KeyCode::Up, KeyCode::Down, KeyCode::Down, KeyCode::Enter],
            1,
        );
        assert_eq!(
            messages,
            vec![
                Msg::FocusField(Field::TaskRow(1)),
                Msg::ToggleTask(TaskId::from(2u64)),
            ]
        );
    }

    #[test]
    fn clicking_a_row_toggles_that_task() {
        let driver = EventDriver::default();
        let mut app = mount_component_for_test(
            &driver,
            ComponentId::TaskList,
            Box::new(TaskList::new(vec![
                Task::new(1u64, "First"),
                Task::new(2u64, "Second"),
            ])),
        );
        let mut terminal = MockTerminal::new(60, 12);
        render_component(&mut app, ComponentId::TaskList, &mut terminal);

        // Rows start inside the border, so row 2 is the second task.
        driver.send_click(6, 2);
        driver.send_click(6, 9);
        let messages = collect_messages(&mut app, 1);
        assert_eq!(messages, vec![Msg::ToggleTask(TaskId::from(2u64))]);

        let output = render_component(&mut app, ComponentId::TaskList, &mut terminal);
        assert!(output.contains("[x] Second"));
    }

    #[test]
    fn toggle_by_id_ignores_unknown() {
        let mut list = TaskList::new(single_task());
        assert!(!list.toggle(&TaskId::from("missing")));
        assert!(list.toggle(&TaskId::from(1u64)));
        assert!(list.tasks()[0].status);
    }
}
