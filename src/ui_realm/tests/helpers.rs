use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use tuirealm::{Application, NoUserEvent, PollStrategy};

use crate::ui_realm::tests::harness::{
    EventDriver, MockTerminal, send_keys as harness_send_keys, send_text,
};

/// Render a mounted component to a String.
///
/// This is a thin wrapper around `MockTerminal::buffer_as_string()` that handles
/// the component view rendering first.
pub fn render_component<I: Clone + Eq + PartialEq + std::hash::Hash, M: Clone + PartialEq>(
    app: &mut Application<I, M, NoUserEvent>,
    id: I,
    terminal: &mut MockTerminal,
) -> String {
    terminal.draw(|frame| {
        app.view(&id, frame, frame.area());
    });
    terminal.buffer_as_string()
}

/// Drains up to `poll_count` batches of pending events and returns the messages.
pub fn collect_messages<I: Clone + Eq + PartialEq + std::hash::Hash, M: Clone + PartialEq>(
    app: &mut Application<I, M, NoUserEvent>,
    poll_count: usize,
) -> Vec<M> {
    let mut messages = Vec::new();
    for _ in 0..poll_count {
        if let Ok(msgs) = app.tick(PollStrategy::UpTo(8)) {
            messages.extend(msgs);
        }
    }
    messages
}

/// Send keys to an application and collect the resulting messages.
///
/// # Arguments
/// * `driver` - The EventDriver to inject keys into
/// * `app` - The mounted tui-realm Application
/// * `keys` - Slice of KeyCode to send sequentially
/// * `poll_count` - Number of poll iterations
pub fn send_key_to_component<I: Clone + Eq + PartialEq + std::hash::Hash, M: Clone + PartialEq>(
    driver: &EventDriver,
    app: &mut Application<I, M, NoUserEvent>,
    keys: &[KeyCode],
    poll_count: usize,
) -> Vec<M> {
    harness_send_keys(driver, keys);
    collect_messages(app, poll_count)
}

/// Type `text` into the focused component and process every key.
pub fn type_into<I: Clone + Eq + PartialEq + std::hash::Hash, M: Clone + PartialEq>(
    driver: &EventDriver,
    app: &mut Application<I, M, NoUserEvent>,
    text: &str,
) -> Vec<M> {
    send_text(driver, text);
    collect_messages(app, text.chars().count() / 8 + 2)
}

/// Feeds ticks until `predicate` matches a produced message or `timeout` elapses.
///
/// Used for components that wait on background work.
pub fn tick_until<I, M, F>(
    driver: &EventDriver,
    app: &mut Application<I, M, NoUserEvent>,
    timeout: Duration,
    predicate: F,
) -> Vec<M>
where
    I: Clone + Eq + PartialEq + std::hash::Hash,
    M: Clone + PartialEq,
    F: Fn(&M) -> bool,
{
    let deadline = Instant::now() + timeout;
    let mut messages = Vec::new();
    while Instant::now() < deadline {
        driver.send_tick();
        let batch = collect_messages(app, 1);
        let done = batch.iter().any(&predicate);
        messages.extend(batch);
        if done {
            break;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    messages
}

/// Mount a component for testing with default setup.
///
/// Creates an Application with the given EventDriver listener config, mounts
/// the component with empty props and gives it focus.
pub fn mount_component_for_test<I, M>(
    driver: &EventDriver,
    id: I,
    component: Box<dyn tuirealm::Component<M, NoUserEvent>>,
) -> Application<I, M, NoUserEvent>
where
    I: Clone + Eq + PartialEq + std::hash::Hash + 'static,
    M: Clone + PartialEq + 'static,
{
    let mut app: Application<I, M, NoUserEvent> = Application::init(driver.listener_cfg());
    app.mount(id.clone(), component, vec![])
        .expect("component should mount");
    app.active(&id).expect("component should become active");
    app
}

/// Render a simple component to string for quick testing (60x12 terminal).
pub fn render_simple_component<
    I: Clone + Eq + PartialEq + std::hash::Hash,
    M: Clone + PartialEq,
>(
    app: &mut Application<I, M, NoUserEvent>,
    id: I,
) -> String {
    let mut terminal = MockTerminal::new(60, 12);
    render_component(app, id, &mut terminal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui_realm::ComponentId;
    use crate::ui_realm::components::LogoutButton;
    use crate::ui_realm::messages::Msg;

    #[test]
    fn mount_render_and_send() {
        let driver = EventDriver::default();
        let mut app =
            mount_component_for_test(&driver, ComponentId::Logout, Box::new(LogoutButton::new()));

        let output = render_simple_component(&mut app, ComponentId::Logout);
        assert!(output.contains("Logout"), "render should contain the label");

        let messages = send_key_to_component(
            &driver,
            &mut app,
            &[KeyCode::Enter, KeyCode::Enter, KeyCode::Enter],
            1,
        );
        assert_eq!(
            messages,
            vec![Msg::Logout, Msg::Logout, Msg::Logout],
            "three activations should produce three Logout messages"
        );
    }

    #[test]
    fn render_with_custom_dimensions() {
        let driver = EventDriver::default();
        let mut app =
            mount_component_for_test(&driver, ComponentId::Logout, Box::new(LogoutButton::new()));

        let mut terminal = MockTerminal::new(80, 24);
        let output = render_component(&mut app, ComponentId::Logout, &mut terminal);
        assert_eq!(output.lines().count(), 24);
    }

    #[test]
    fn tick_until_gives_up_after_timeout() {
        let driver = EventDriver::default();
        let mut app =
            mount_component_for_test(&driver, ComponentId::Logout, Box::new(LogoutButton::new()));

        let started = Instant::now();
        let messages = tick_until(&driver, &mut app, Duration::from_millis(30), |msg| {
            msg == &Msg::Quit
        });
        assert!(messages.is_empty());
        assert!(started.elapsed() >= Duration::from_millis(30));
    }
}
