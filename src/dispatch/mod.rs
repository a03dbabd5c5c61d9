pub mod mailer;
pub mod renderer;
pub mod service;

mod tests;
