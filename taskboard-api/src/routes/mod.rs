/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login)
/// - `users`: User listing
/// - `tasks`: Task creation, listing, status, assignment, and updates

pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;
