//! Row types returned by the query methods.
//!
//! Enumerations (roles, token types, providers) are stored as TEXT and exposed
//! through typed accessors.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::rbac::{PolicyError, Role};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub password_hash: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TokenRow {
    pub id: Uuid,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountRow {
    pub id: Uuid,
    pub provider: String,
    pub provider_account_id: String,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrganizationRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub domain: Option<String>,
    pub should_attach_users_by_domain: bool,
    pub avatar_url: Option<String>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrganizationRow {
    /// Whether a user signing up with `email` joins this organization
    /// automatically.
    pub fn attaches_email(&self, email: &str) -> bool {
        self.should_attach_users_by_domain
            && email
                .rsplit_once('@')
                .is_some_and(|(_, domain)| self.domain.as_deref() == Some(domain))
    }
}

/// An organization the caller belongs to, with their role in it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserOrganizationRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub avatar_url: Option<String>,
    pub role: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MemberRow {
    pub id: Uuid,
    pub role: String,
    pub organization_id: Uuid,
    pub user_id: Uuid,
}

impl MemberRow {
    pub fn role(&self) -> Result<Role, PolicyError> {
        self.role.parse()
    }
}

/// A member joined with the user it belongs to.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MemberWithUserRow {
    pub id: Uuid,
    pub role: String,
    pub user_id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub slug: String,
    pub avatar_url: Option<String>,
    pub organization_id: Uuid,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A project joined with its owner's public profile.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectWithOwnerRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub slug: String,
    pub avatar_url: Option<String>,
    pub organization_id: Uuid,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub owner_name: Option<String>,
    pub owner_avatar_url: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InviteRow {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub author_id: Option<Uuid>,
    pub organization_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl InviteRow {
    pub fn role(&self) -> Result<Role, PolicyError> {
        self.role.parse()
    }
}

/// An invite joined with its author and organization.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InviteDetailsRow {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub author_id: Option<Uuid>,
    pub author_name: Option<String>,
    pub author_avatar_url: Option<String>,
    pub organization_name: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Inserts
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: String,
    pub password_hash: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewOrganization {
    pub name: String,
    pub slug: String,
    pub domain: Option<String>,
    pub should_attach_users_by_domain: bool,
    pub owner_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub slug: String,
    pub organization_id: Uuid,
    pub owner_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct NewInvite {
    pub email: String,
    pub role: Role,
    pub author_id: Uuid,
    pub organization_id: Uuid,
}

/// Token kinds stored in `tokens.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    PasswordRecover,
}

impl TokenKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PasswordRecover => "PASSWORD_RECOVER",
        }
    }
}

/// OAuth providers stored in `accounts.provider`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountProvider {
    Github,
}

impl AccountProvider {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Github => "GITHUB",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_role_parsing() {
        let mut member = MemberRow {
            id: Uuid::new_v4(),
            role: "BILLING".to_string(),
            organization_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
        };
        assert_eq!(member.role().unwrap(), Role::Billing);

        member.role = "OWNER".to_string();
        assert!(member.role().is_err());
    }

    fn organization(domain: Option<&str>, attach: bool) -> OrganizationRow {
        OrganizationRow {
            id: Uuid::new_v4(),
            name: "Acme Inc".into(),
            slug: "acme-inc".into(),
            domain: domain.map(str::to_string),
            should_attach_users_by_domain: attach,
            avatar_url: None,
            owner_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_attaches_email_by_domain() {
        let acme = organization(Some("acme.com"), true);
        assert!(acme.attaches_email("jane@acme.com"));
        assert!(!acme.attaches_email("jane@other.com"));
        assert!(!acme.attaches_email("jane@sub.acme.com"));
        assert!(!acme.attaches_email("acme.com"));
    }

    #[test]
    fn test_attach_requires_flag_and_domain() {
        assert!(!organization(Some("acme.com"), false).attaches_email("jane@acme.com"));
        assert!(!organization(None, true).attaches_email("jane@acme.com"));
    }

    #[test]
    fn test_stored_enum_names() {
        assert_eq!(TokenKind::PasswordRecover.as_str(), "PASSWORD_RECOVER");
        assert_eq!(AccountProvider::Github.as_str(), "GITHUB");
    }
}
