//! Full-screen classification form.

pub mod app;
pub mod events;
pub mod rendering;
pub mod utils;

pub use app::{FormApp, FormOutcome, FormRow};
pub use events::run_form;
