/// Authentication utilities
///
/// This module provides the secure authentication primitives for TaskBoard:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: signed bearer token generation and validation
/// - [`middleware`]: request auth context and bearer extraction helpers
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Bearer Tokens**: HS256 signing, fixed 7-day lifetime
/// - **Constant-time Comparison**: verification uses constant-time operations

pub mod jwt;
pub mod middleware;
pub mod password;
