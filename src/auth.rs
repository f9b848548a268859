/// Authentication capability consumed by the order flow.
///
/// One injected value replaces scattered "is there a user?" null checks:
/// either the session is anonymous or it carries the account id and email.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthContext {
    Guest,
    Authenticated { id: String, email: String },
}

impl AuthContext {
    pub fn authenticated(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self::Authenticated {
            id: id.into(),
            email: email.into(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Account email for authenticated sessions.
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Authenticated { email, .. } => Some(email),
            Self::Guest => None,
        }
    }
}
