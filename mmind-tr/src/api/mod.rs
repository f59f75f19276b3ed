//! HTTP API handlers for mmind-tr

pub mod health;
pub mod transcribe;
pub mod ui;

pub use health::health_routes;
pub use transcribe::transcribe_routes;
pub use ui::ui_routes;
