/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication and profile endpoints
/// - `tasks`: Task CRUD, derived listings, and export
/// - `categories`: Category CRUD and derived listings

pub mod auth;
pub mod categories;
pub mod health;
pub mod tasks;
