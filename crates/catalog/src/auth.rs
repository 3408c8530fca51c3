//! Caller identity as handed over by the HTTP boundary.

/// Role value granting unrestricted access.
pub const ROLE_SUPERUSER: &str = "superuser";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Role {
    Superuser,
    /// Any other role; such callers may still manage companies listing them.
    Other(String),
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        if s == ROLE_SUPERUSER { Role::Superuser } else { Role::Other(s.to_string()) }
    }
}

/// Authenticated caller: user id plus role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caller {
    pub user_id: i64,
    pub role: Role,
}

impl Caller {
    pub fn new(user_id: i64, role: &str) -> Self { Self { user_id, role: Role::from(role) } }

    pub fn superuser(user_id: i64) -> Self { Self { user_id, role: Role::Superuser } }

    pub fn is_superuser(&self) -> bool { matches!(self.role, Role::Superuser) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_superuser_string_is_privileged() {
        assert!(Caller::new(1, "superuser").is_superuser());
        assert!(!Caller::new(1, "Superuser").is_superuser());
        assert!(!Caller::new(1, "manager").is_superuser());
        assert_eq!(Caller::new(2, "client").role, Role::Other("client".into()));
    }
}
