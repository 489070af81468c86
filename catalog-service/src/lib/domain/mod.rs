pub mod access;
pub mod errors;
pub mod movie;
pub mod notification;
pub mod permission;
pub mod token;
pub mod user;
