pub mod fixtures;
pub mod load;
pub mod logging;
pub mod services;
pub mod settings;
pub mod types;
pub mod ui_realm;
