/// Database models for TaskBoard
///
/// # Models
///
/// - `user`: user accounts (the credential store)
/// - `task`: task records, their status machine, and user relationships

pub mod task;
pub mod user;
