pub mod app;
pub mod edit_form;
pub mod input;
pub mod render;
pub mod theme;

pub use app::run;
