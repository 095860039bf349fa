//! Response bodies shared by several handler modules.

use serde::Serialize;

/// `{ "message": "..." }`, the body of every write that returns nothing else.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}
