use std::sync::Arc;

use tracing::{debug, warn};
use tuirealm::command::{Cmd, CmdResult};
use tuirealm::event::{Key, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use tuirealm::props::{AttrValue, Attribute, Props};
use tuirealm::ratatui::layout::{Constraint, Layout, Position, Rect};
use tuirealm::ratatui::style::{Color, Style};
use tuirealm::ratatui::text::Line;
use tuirealm::ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};
use tuirealm::{Component, Event, Frame, MockComponent, NoUserEvent, State, StateValue};

use super::text_field::{TextField, button};
use crate::load::{CommentLoad, LoadOutcome};
use crate::services::CommentSource;
use crate::types::Comment;
use crate::ui_realm::messages::{Field, Msg};

pub const LOADING_TEXT: &str = "Loading comments...";
pub const PLACEHOLDER: &str = "Add a comment";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

pub struct CommentsPanel {
    props: Props,
    loader: Arc<dyn CommentSource>,
    load: Option<CommentLoad>,
    state: LoadState,
    comments: Vec<Comment>,
    input: TextField,
    focused_field: Field,
    submit_area: Option<Rect>,
}

impl CommentsPanel {
    /// Creates the panel and immediately starts loading from `loader`.
    pub fn new(loader: Arc<dyn CommentSource>) -> Self {
        let mut panel = Self {
            props: Props::default(),
            loader,
            load: None,
            state: LoadState::Idle,
            comments: Vec::new(),
            input: TextField::new().with_placeholder(PLACEHOLDER),
            focused_field: Field::CommentInput,
            submit_area: None,
        };
        panel.start_load();
        panel
    }

    /// Reloads only when `loader` is a different source than the current one.
    pub fn set_loader(&mut self, loader: Arc<dyn CommentSource>) {
        if Arc::ptr_eq(&self.loader, &loader) {
            return;
        }
        self.loader = loader;
        self.start_load();
    }

    pub fn load_state(&self) -> &LoadState {
        &self.state
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    fn start_load(&mut self) {
        // Replacing the handle cancels any load still in flight.
        self.load = None;
        match CommentLoad::spawn(Arc::clone(&self.loader)) {
            Ok(load) => {
                debug!("comment load started");
                self.load = Some(load);
                self.state = LoadState::Loading;
            }
            Err(error) => {
                warn!("failed to start comment load: {error:#}");
                self.state = LoadState::Failed(error.to_string());
            }
        }
    }

    fn poll_load(&mut self) -> Option<Msg> {
        let outcome = self.load.as_mut()?.poll()?;
        self.load = None;
        match outcome {
            LoadOutcome::Loaded(comments) => {
                let count = comments.len();
                self.comments = comments;
                self.state = LoadState::Ready;
                Some(Msg::CommentsLoaded(count))
            }
            LoadOutcome::Failed(message) => {
                self.state = LoadState::Failed(message.clone());
                Some(Msg::CommentsLoadFailed(message))
            }
        }
    }

    fn submit(&mut self) -> Option<Msg> {
        let text = self.input.value().to_string();
        self.input.clear();
        self.focused_field = Field::CommentInput;
        Some(Msg::SubmitComment(text))
    }

    fn toggle_focus(&mut self) -> Option<Msg> {
        self.focused_field = match self.focused_field {
            Field::CommentInput => Field::CommentSubmit,
            _ => Field::CommentInput,
        };
        Some(Msg::FocusField(self.focused_field))
    }

    fn handle_ready_key(&mut self, key: KeyEvent) -> Option<Msg> {
        match key.code {
            Key::Tab | Key::BackTab | Key::Down | Key::Up => self.toggle_focus(),
            Key::Enter => match self.focused_field {
                Field::CommentSubmit => self.submit(),
                _ => self.toggle_focus(),
            },
            Key::Char(' ') if self.focused_field == Field::CommentSubmit => self.submit(),
            _ => {
                if self.focused_field == Field::CommentInput {
                    self.input.handle_key(&key);
                }
                None
            }
        }
    }

    fn handle_click(&mut self, mouse: MouseEvent) -> Option<Msg> {
        let area = self.submit_area?;
        if area.contains(Position::new(mouse.column, mouse.row)) {
            self.submit()
        } else {
            None
        }
    }

    fn render_ready(&mut self, frame: &mut Frame, area: Rect) {
        let [input_area, submit_area, _, list_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(
                self.input
                    .line("Comment", self.focused_field == Field::CommentInput),
            ),
            input_area,
        );

        let label = button("Submit", self.focused_field == Field::CommentSubmit);
        let width = (label.content.chars().count() as u16 + 2).min(submit_area.width);
        frame.render_widget(Paragraph::new(Line::from(vec!["  ".into(), label])), submit_area);
        self.submit_area = Some(Rect {
            width,
            ..submit_area
        });

        let items: Vec<ListItem> = self
            .comments
            .iter()
            .map(|comment| ListItem::new(format!("• {}", comment.text)))
            .collect();
        frame.render_widget(List::new(items), list_area);
    }
}

impl MockComponent for CommentsPanel {
    fn view(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(" Comments ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        match &self.state {
            LoadState::Idle | LoadState::Loading => {
                self.submit_area = None;
                frame.render_widget(Paragraph::new(LOADING_TEXT), inner);
            }
            LoadState::Failed(message) => {
                self.submit_area = None;
                frame.render_widget(
                    Paragraph::new(format!("Error loading comments: {message}"))
                        .style(Style::default().fg(Color::Red))
                        .wrap(Wrap { trim: true }),
                    inner,
                );
            }
            LoadState::Ready => self.render_ready(frame, inner),
        }
    }

    fn query(&self, attr: Attribute) -> Option<AttrValue> {
        self.props.get(attr)
    }

    fn attr(&mut self, attr: Attribute, value: AttrValue) {
        self.props.set(attr, value);
    }

    fn state(&self) -> State {
        State::One(StateValue::String(self.input.value().to_string()))
    }

    fn perform(&mut self, _cmd: Cmd) -> CmdResult {
        CmdResult::None
    }
}

impl Component<Msg, NoUserEvent> for CommentsPanel {
    fn on(&mut self, ev: Event<NoUserEvent>) -> Option<Msg> {
        match ev {
            Event::Tick => self.poll_load(),
            Event::Keyboard(key) if self.state == LoadState::Ready => self.handle_ready_key(key),
            Event::Mouse(
                mouse @ MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    ..
                },
            ) if self.state == LoadState::Ready => self.handle_click(mouse),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::KeyCode;

    use super::*;
    use crate::services::MemoryComments;
    use crate::ui_realm::ComponentId;
    use crate::ui_realm::tests::harness::EventDriver;
    use crate::ui_realm::tests::helpers::{
        mount_component_for_test, render_simple_component, send_key_to_component, tick_until,
        type_into,
    };

    fn source(comments: Vec<Comment>) -> Arc<dyn CommentSource> {
        Arc::new(MemoryComments::new(comments))
    }

    fn loaded(msg: &Msg) -> bool {
        matches!(msg, Msg::CommentsLoaded(_) | Msg::CommentsLoadFailed(_))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn pending_load_renders_only_loading_text() {
        let slow: Arc<dyn CommentSource> = Arc::new(
            MemoryComments::new(vec![Comment::new("1", "Comment 1")])
                .with_delay(Duration::from_secs(5)),
        );
        let driver = EventDriver::default();
        let mut app = mount_component_for_test(
            &driver,
            ComponentId::Comments,
            Box::new(CommentsPanel::new(slow)),
        );

        let output = render_simple_component(&mut app, ComponentId::Comments);
        assert!(output.contains(LOADING_TEXT), "loading text should render");
        assert!(!output.contains("Comment 1"), "no comment should render yet");
        assert!(!output.contains(PLACEHOLDER), "input should not render yet");
        assert!(!output.contains("[ Submit ]"), "submit should not render yet");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn resolved_load_renders_comments_in_order() {
        let driver = EventDriver::default();
        let mut app = mount_component_for_test(
            &driver,
            ComponentId::Comments,
            Box::new(CommentsPanel::new(source(vec![
                Comment::new("1", "Comment 1"),
                Comment::new("2", "Comment 2"),
            ]))),
        );

        let messages = tick_until(&driver, &mut app, Duration::from_secs(2), loaded);
        assert!(messages.contains(&Msg::CommentsLoaded(2)));

        let output = render_simple_component(&mut app, ComponentId::Comments);
        assert!(!output.contains(LOADING_TEXT), "loading text should be gone");
        assert_eq!(output.matches("Comment 1").count(), 1);
        assert_eq!(output.matches("Comment 2").count(), 1);
        let first = output.find("Comment 1").expect("first comment should render");
        let second = output.find("Comment 2").expect("second comment should render");
        assert!(first < second, "comments should keep supplied order");
        assert!(output.contains(PLACEHOLDER), "input placeholder should render");
        assert!(output.contains("[ Submit ]"), "submit control should render");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn rejected_load_renders_error_only() {
        let driver = EventDriver::default();
        let mut app = mount_component_for_test(
            &driver,
            ComponentId::Comments,
            Box::new(CommentsPanel::new(Arc::new(MemoryComments::failing(
                "Failed to fetch",
            )))),
        );

        let messages = tick_until(&driver, &mut app, Duration::from_secs(2), loaded);
        assert!(messages.contains(&Msg::CommentsLoadFailed("Failed to fetch".to_string())));

        let output = render_simple_component(&mut app, ComponentId::Comments);
        assert!(
            output.contains("Error loading comments: Failed to fetch"),
            "error message should render"
        );
        assert!(!output.contains(LOADING_TEXT));
        assert!(!output.contains(PLACEHOLDER), "input should not render");
        assert!(!output.contains("[ Submit ]"), "submit should not render");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn submit_emits_text_once_and_clears_input() {
        let driver = EventDriver::default();
        let mut app = mount_component_for_test(
            &driver,
            ComponentId::Comments,
            Box::new(CommentsPanel::new(source(vec![Comment::new(
                "1",
                "Comment 1",
            )]))),
        );
        tick_until(&driver, &mut app, Duration::from_secs(2), loaded);

        let typed = type_into(&driver, &mut app, "New comment");
        assert!(typed.is_empty(), "typing should not emit messages");

        let messages = send_key_to_component(&driver, &mut app, &[KeyCode::Tab, KeyCode::Enter], 1);
        let submits: Vec<_> = messages
            .iter()
            .filter(|msg| matches!(msg, Msg::SubmitComment(_)))
            .collect();
        assert_eq!(submits, vec![&Msg::SubmitComment("New comment".to_string())]);

        let output = render_simple_component(&mut app, ComponentId::Comments);
        assert!(output.contains(PLACEHOLDER), "input should be cleared");
        assert!(
            !output.contains("New comment"),
            "submitted text should not be inserted into the list"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn empty_submission_is_forwarded() {
        let driver = EventDriver::default();
        let mut app = mount_component_for_test(
            &driver,
            ComponentId::Comments,
            Box::new(CommentsPanel::new(source(Vec::new()))),
        );
        tick_until(&driver, &mut app, Duration::from_secs(2), loaded);

        let messages = send_key_to_component(&driver, &mut app, &[KeyCode::Enter, KeyCode::Enter], 1);
        assert_eq!(
            messages,
            vec![
                Msg::FocusField(Field::CommentSubmit),
                Msg::SubmitComment(String::new()),
            ]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn set_loader_reloads_only_for_new_source() {
        let first = source(vec![Comment::new("1", "Comment 1")]);
        let mut panel = CommentsPanel::new(Arc::clone(&first));
        for _ in 0..200 {
            if panel.poll_load().is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(panel.load_state(), &LoadState::Ready);

        panel.set_loader(Arc::clone(&first));
        assert_eq!(
            panel.load_state(),
            &LoadState::Ready,
            "same loader should not trigger a reload"
        );

        panel.set_loader(source(vec![Comment::new("9", "Other")]));
        assert_eq!(panel.load_state(), &LoadState::Loading);
        for _ in 0..200 {
            if panel.poll_load().is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(panel.comments(), &[Comment::new("9", "Other")]);
    }

    #[test]
    fn missing_runtime_is_reported_as_failure() {
        let panel = CommentsPanel::new(source(Vec::new()));
        assert!(matches!(panel.load_state(), LoadState::Failed(_)));
    }
}
