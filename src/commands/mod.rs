pub mod chat;
pub mod init;
pub mod notifications;
pub mod outbox;
