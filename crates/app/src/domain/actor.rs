//! Request actors

use sprocket::roles::Role;

/// The authenticated identity a request acts as.
///
/// Sessions and token verification are the caller's concern; the engine only
/// needs the resolved email and role to scope reads and gate admin actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Normalised (lowercase) email address.
    pub email: String,

    /// Role the actor holds.
    pub role: Role,
}

impl Actor {
    /// Create an actor, normalising the email for comparisons.
    #[must_use]
    pub fn new(email: &str, role: Role) -> Self {
        Self {
            email: email.to_lowercase(),
            role,
        }
    }

    /// Whether this actor owns records filed under `email`.
    #[must_use]
    pub fn owns_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalised() {
        let actor = Actor::new("Rider@Example.COM", Role::Customer);

        assert_eq!(actor.email, "rider@example.com");
        assert!(actor.owns_email("RIDER@example.com"));
        assert!(!actor.owns_email("other@example.com"));
    }
}
