/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Service banner and health check endpoints
/// - `auth`: Authentication endpoints (register, login)
/// - `tasks`: Per-user task CRUD and listing

pub mod auth;
pub mod health;
pub mod tasks;
