pub mod mailer;
pub mod repositories;

pub use mailer::LogMailer;
