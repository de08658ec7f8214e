mod app;
mod input;
pub mod view;

pub use app::App;
