//! Caller classes and the transition guards that check them.

/// Who issued a command.
///
/// Follow-ups generated by states always carry [`Authority::Admin`].
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Authority {
    #[default]
    User,
    Admin,
}

impl Authority {
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Which callers may trigger a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Guard {
    Any,
    /// Engine-internal: a user typing the same command never matches.
    Admin,
}

impl Guard {
    pub const fn permits(self, authority: Authority) -> bool {
        match self {
            Self::Any => true,
            Self::Admin => authority.is_admin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_guard_rejects_users() {
        assert!(Guard::Any.permits(Authority::User));
        assert!(Guard::Any.permits(Authority::Admin));
        assert!(Guard::Admin.permits(Authority::Admin));
        assert!(!Guard::Admin.permits(Authority::User));
    }
}
