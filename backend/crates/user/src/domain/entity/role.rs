//! Role Entity

/// Row of the `roles` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: i32,
    pub code: String,
}

impl Role {
    pub fn new(id: i32, code: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
        }
    }

    /// Code as exposed to clients
    pub fn normalized_code(&self) -> String {
        self.code.to_lowercase()
    }
}
