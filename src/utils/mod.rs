pub mod api;
pub mod prompt;
pub mod view;
