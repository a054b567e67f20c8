// Authentication: form validation, password hashing, the credential store
// and cookie-carried sessions.

pub mod handlers;
pub mod password;
pub mod session;
pub mod store;
pub mod validation;
