/// Response middleware for the API server
///
/// - `security`: OWASP security headers on every response

pub mod security;
