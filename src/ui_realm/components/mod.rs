pub mod comments_panel;
pub mod credentials_form;
pub mod logout_button;
pub mod nav_bar;
pub mod task_item;
pub mod task_list;
pub mod task_manager;
pub mod text_field;

pub use comments_panel::{CommentsPanel, LoadState};
pub use credentials_form::{CredentialsForm, FormKind};
pub use logout_button::LogoutButton;
pub use nav_bar::NavBar;
pub use task_item::{TaskItem, task_row};
pub use task_list::TaskList;
pub use task_manager::TaskManager;
pub use text_field::TextField;
