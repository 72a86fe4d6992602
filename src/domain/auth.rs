use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Owner,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Owner => "owner",
            Role::Staff => "staff",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "owner" => Some(Role::Owner),
            "staff" => Some(Role::Staff),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which roles a surface admits. One policy per route, evaluated by a single
/// decision function instead of a guard per role combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Any authenticated caller
    Authenticated,
    AdminOnly,
    OwnerOnly,
    OwnerOrStaff,
}

/// The verdict for one access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny { redirect: &'static str },
}

/// Decide whether a caller with the given role may pass the given policy.
/// `None` means unauthenticated. The engine's computations are role-agnostic;
/// this is the one place access is decided for the surfaces that gate on it.
pub fn authorize(role: Option<Role>, policy: AccessPolicy) -> Verdict {
    let Some(role) = role else {
        return Verdict::Deny { redirect: "/login" };
    };

    let allowed = match policy {
        AccessPolicy::Authenticated => true,
        AccessPolicy::AdminOnly => role == Role::Admin,
        AccessPolicy::OwnerOnly => role == Role::Owner,
        AccessPolicy::OwnerOrStaff => matches!(role, Role::Owner | Role::Staff),
    };

    if allowed {
        Verdict::Allow
    } else {
        Verdict::Deny {
            redirect: "/unauthorized",
        }
    }
}
