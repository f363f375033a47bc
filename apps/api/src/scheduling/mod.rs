pub mod handlers;
pub mod mailer;
pub mod pipeline;
