use tuirealm::command::{Cmd, CmdResult};
use tuirealm::event::{Key, KeyEvent};
use tuirealm::props::{AttrValue, Attribute, Props};
use tuirealm::ratatui::layout::Rect;
use tuirealm::ratatui::style::{Color, Style};
use tuirealm::ratatui::text::{Line, Span};
use tuirealm::ratatui::widgets::{Block, Borders, Paragraph};
use tuirealm::{Component, Event, Frame, MockComponent, NoUserEvent, State, StateValue};

use super::text_field::{TextField, button};
use crate::types::Task;
use crate::ui_realm::messages::{Field, Msg};

struct EditDraft {
    index: usize,
    field: TextField,
}

/// Create, rename, delete and assign tasks.
///
/// Renaming goes through a draft: Enter on a name starts editing, and the
/// draft is reported once on Enter or when focus leaves the field. Esc drops
/// the draft.
pub struct TaskManager {
    props: Props,
    tasks: Vec<Task>,
    new_task: TextField,
    focused_field: Field,
    draft: Option<EditDraft>,
}

impl TaskManager {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            props: Props::default(),
            tasks,
            new_task: TextField::new().with_placeholder("New task name"),
            focused_field: Field::NewTaskName,
            draft: None,
        }
    }

    /// Restores focus after a remount. Falls back to the new-task input when
    /// the field no longer exists.
    pub fn with_focus(mut self, field: Field) -> Self {
        if self.focus_order().contains(&field) {
            self.focused_field = field;
        }
        self
    }

    pub fn focused_field(&self) -> Field {
        self.focused_field
    }

    fn focus_order(&self) -> Vec<Field> {
        let mut order = vec![Field::NewTaskName, Field::CreateTask];
        for index in 0..self.tasks.len() {
            order.push(Field::TaskName(index));
            order.push(Field::DeleteTask(index));
            order.push(Field::AssignTask(index));
        }
        order
    }

    fn move_focus(&mut self, forward: bool) -> Option<Msg> {
        let order = self.focus_order();
        let current = order
            .iter()
            .position(|field| field == &self.focused_field)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % order.len()
        } else if current == 0 {
            order.len() - 1
        } else {
            current - 1
        };
        self.focused_field = order[next];
        // Blur commits the draft; the edit carries the new focus with it.
        self.commit_draft()
            .or(Some(Msg::FocusField(self.focused_field)))
    }

    fn is_editing(&self, index: usize) -> bool {
        self.draft.as_ref().is_some_and(|draft| draft.index == index)
    }

    fn begin_edit(&mut self, index: usize) {
        if let Some(task) = self.tasks.get(index) {
            self.draft = Some(EditDraft {
                index,
                field: TextField::new().with_value(task.name.clone()),
            });
        }
    }

    fn commit_draft(&mut self) -> Option<Msg> {
        let draft = self.draft.take()?;
        let task = self.tasks.get(draft.index)?;
        if draft.field.value() == task.name {
            return None;
        }
        Some(Msg::EditTask {
            id: task.id.clone(),
            name: draft.field.value().to_string(),
            focus: self.focused_field,
        })
    }

    fn create(&mut self) -> Option<Msg> {
        let name = self.new_task.value().to_string();
        self.new_task.clear();
        Some(Msg::CreateTask(name))
    }

    fn activate(&mut self) -> Option<Msg> {
        match self.focused_field {
            Field::NewTaskName | Field::CreateTask => self.create(),
            Field::TaskName(index) => {
                if self.is_editing(index) {
                    self.commit_draft()
                } else {
                    self.begin_edit(index);
                    None
                }
            }
            Field::DeleteTask(index) => self
                .tasks
                .get(index)
                .map(|task| Msg::DeleteTask(task.id.clone())),
            Field::AssignTask(index) => self.tasks.get(index).map(|task| Msg::AssignTask {
                id: task.id.clone(),
                user_id: task.user_id.clone(),
            }),
            _ => None,
        }
    }

    fn edit_text(&mut self, key: &KeyEvent) {
        match self.focused_field {
            Field::NewTaskName => {
                self.new_task.handle_key(key);
            }
            Field::TaskName(index) => {
                if !self.is_editing(index) {
                    self.begin_edit(index);
                }
                if let Some(draft) = self.draft.as_mut() {
                    draft.field.handle_key(key);
                }
            }
            _ => {}
        }
    }

    fn on_button(&self) -> bool {
        matches!(
            self.focused_field,
            Field::CreateTask | Field::DeleteTask(_) | Field::AssignTask(_)
        )
    }

    fn task_line(&self, index: usize, task: &Task) -> Line<'static> {
        let name_focused = self.focused_field == Field::TaskName(index);
        let mut line = match self.draft.as_ref().filter(|draft| draft.index == index) {
            Some(draft) => draft.field.line("Name", true),
            None => {
                let marker = if name_focused { ">" } else { " " };
                let style = if name_focused {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::styled(format!("{marker} Name: "), style),
                    Span::styled(task.name.clone(), style),
                ])
            }
        };

        line.spans.push(Span::raw("  "));
        line.spans.push(button(
            "Delete",
            self.focused_field == Field::DeleteTask(index),
        ));
        line.spans.push(Span::raw(" "));
        line.spans.push(button(
            "Assign",
            self.focused_field == Field::AssignTask(index),
        ));
        let assignee = match &task.user_id {
            Some(user_id) => format!("  @{user_id}"),
            None => "  unassigned".to_string(),
        };
        line.spans.push(Span::styled(
            assignee,
            Style::default().fg(Color::Magenta),
        ));
        line
    }
}

impl MockComponent for TaskManager {
    fn view(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Task Manager ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let mut lines = vec![
            self.new_task
                .line("New task", self.focused_field == Field::NewTaskName),
            Line::from(vec![
                Span::raw("  "),
                button("Create task", self.focused_field == Field::CreateTask),
            ]),
            Line::default(),
        ];
        if self.tasks.is_empty() {
            lines.push(Line::from(Span::styled(
                "  No tasks yet",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for (index, task) in self.tasks.iter().enumerate() {
            lines.push(self.task_line(index, task));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn query(&self, attr: Attribute) -> Option<AttrValue> {
        self.props.get(attr)
    }

    fn attr(&mut self, attr: Attribute, value: AttrValue) {
        self.props.set(attr, value);
    }

    fn state(&self) -> State {
        State::One(StateValue::String(self.new_task.value().to_string()))
    }

    fn perform(&mut self, _cmd: Cmd) -> CmdResult {
        CmdResult::None
    }
}

impl Component<Msg, NoUserEvent> for TaskManager {
    fn on(&mut self, ev: Event<NoUserEvent>) -> Option<Msg> {
        let Event::Keyboard(key) = ev else {
            return None;
        };
        match key.code {
            Key::Tab | Key::Down => self.move_focus(true),
            Key::BackTab | Key::Up => self.move_focus(false),
            Key::Enter => self.activate(),
            Key::Char(' ') if self.on_button() => self.activate(),
            Key::Esc => {
                self.draft = None;
                None
            }
            _ => {
                self.edit_text(&key);
                None
            }
        }
    }
}
