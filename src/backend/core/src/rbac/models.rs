//! RBAC vocabulary: subjects, roles, actions and the resources they act on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::policy::PolicyError;

// ═══════════════════════════════════════════════════════════════════════════════
// Identifiers
// ═══════════════════════════════════════════════════════════════════════════════

/// Strongly-typed user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Role
// ═══════════════════════════════════════════════════════════════════════════════

/// A member's role inside one organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Member,
    Billing,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Member => "MEMBER",
            Self::Billing => "BILLING",
        }
    }

    pub const fn all() -> [Role; 3] {
        [Self::Admin, Self::Member, Self::Billing]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "MEMBER" => Ok(Self::Member),
            "BILLING" => Ok(Self::Billing),
            other => Err(PolicyError::UnknownRole(other.to_string())),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Action
// ═══════════════════════════════════════════════════════════════════════════════

/// Something a subject wants to do. `Manage` is the wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Manage,
    #[serde(alias = "read")]
    Get,
    Create,
    Update,
    Delete,
    TransferOwnership,
    Export,
}

impl Action {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manage => "manage",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::TransferOwnership => "transfer_ownership",
            Self::Export => "export",
        }
    }

    /// Whether a rule granting `self` also grants `requested`.
    pub fn covers(&self, requested: Action) -> bool {
        *self == Self::Manage || *self == requested
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manage" => Ok(Self::Manage),
            "get" | "read" => Ok(Self::Get),
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "transfer_ownership" => Ok(Self::TransferOwnership),
            "export" => Ok(Self::Export),
            other => Err(PolicyError::UnknownAction(other.to_string())),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Resources
// ═══════════════════════════════════════════════════════════════════════════════

/// The resource type, without ownership information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    User,
    Organization,
    Project,
    Member,
    Invite,
    Billing,
}

impl ResourceKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Organization => "Organization",
            Self::Project => "Project",
            Self::Member => "Member",
            Self::Invite => "Invite",
            Self::Billing => "Billing",
        }
    }

    /// Actions that mean something for this resource type.
    pub const fn supported_actions(&self) -> &'static [Action] {
        use Action::*;
        match self {
            Self::User => &[Manage, Get, Update, Delete],
            Self::Organization => &[Manage, Get, Create, Update, Delete, TransferOwnership],
            Self::Project => &[Manage, Get, Create, Update, Delete],
            Self::Member => &[Manage, Get, Update, Delete],
            Self::Invite => &[Manage, Get, Create, Delete],
            Self::Billing => &[Manage, Get, Export],
        }
    }

    pub fn supports(&self, action: Action) -> bool {
        self.supported_actions().contains(&action)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "User" => Ok(Self::User),
            "Organization" => Ok(Self::Organization),
            "Project" => Ok(Self::Project),
            "Member" => Ok(Self::Member),
            "Invite" => Ok(Self::Invite),
            "Billing" => Ok(Self::Billing),
            other => Err(PolicyError::UnknownResource(other.to_string())),
        }
    }
}

/// A concrete resource a permission is checked against.
///
/// Every variant may carry the id of the subject that owns it; rules with an
/// ownership condition compare it with the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "PascalCase")]
pub enum Resource {
    User { owner_id: Option<UserId> },
    Organization { owner_id: Option<UserId> },
    Project { owner_id: Option<UserId> },
    Member { owner_id: Option<UserId> },
    Invite { owner_id: Option<UserId> },
    Billing { owner_id: Option<UserId> },
}

impl Resource {
    /// The resource type with no owner attached.
    pub const fn any(kind: ResourceKind) -> Self {
        Self::with_owner(kind, None)
    }

    pub const fn with_owner(kind: ResourceKind, owner_id: Option<UserId>) -> Self {
        match kind {
            ResourceKind::User => Self::User { owner_id },
            ResourceKind::Organization => Self::Organization { owner_id },
            ResourceKind::Project => Self::Project { owner_id },
            ResourceKind::Member => Self::Member { owner_id },
            ResourceKind::Invite => Self::Invite { owner_id },
            ResourceKind::Billing => Self::Billing { owner_id },
        }
    }

    pub const fn organization(owner_id: UserId) -> Self {
        Self::Organization {
            owner_id: Some(owner_id),
        }
    }

    pub const fn project(owner_id: UserId) -> Self {
        Self::Project {
            owner_id: Some(owner_id),
        }
    }

    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::User { .. } => ResourceKind::User,
            Self::Organization { .. } => ResourceKind::Organization,
            Self::Project { .. } => ResourceKind::Project,
            Self::Member { .. } => ResourceKind::Member,
            Self::Invite { .. } => ResourceKind::Invite,
            Self::Billing { .. } => ResourceKind::Billing,
        }
    }

    pub const fn owner_id(&self) -> Option<UserId> {
        match self {
            Self::User { owner_id }
            | Self::Organization { owner_id }
            | Self::Project { owner_id }
            | Self::Member { owner_id }
            | Self::Invite { owner_id }
            | Self::Billing { owner_id } => *owner_id,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.owner_id() {
            Some(owner) => write!(f, "{}(owner={})", self.kind(), owner),
            None => write!(f, "{}", self.kind()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Subject
// ═══════════════════════════════════════════════════════════════════════════════

/// The caller a decision is made for: who they are and their role in the
/// organization the request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    pub id: UserId,
    pub role: Role,
}

impl Subject {
    pub fn new(id: impl Into<UserId>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_its_name() {
        for role in Role::all() {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("OWNER".parse::<Role>().is_err());
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_read_is_an_alias_for_get() {
        assert_eq!("read".parse::<Action>().unwrap(), Action::Get);
        assert_eq!("get".parse::<Action>().unwrap(), Action::Get);
        let action: Action = serde_json::from_str("\"read\"").unwrap();
        assert_eq!(action, Action::Get);
    }

    #[test]
    fn test_manage_covers_everything() {
        assert!(Action::Manage.covers(Action::Delete));
        assert!(Action::Manage.covers(Action::Manage));
        assert!(!Action::Get.covers(Action::Manage));
        assert!(!Action::Update.covers(Action::Delete));
    }

    #[test]
    fn test_supported_actions() {
        assert!(ResourceKind::Billing.supports(Action::Export));
        assert!(!ResourceKind::Project.supports(Action::Export));
        assert!(ResourceKind::Organization.supports(Action::TransferOwnership));
        assert!(!ResourceKind::Invite.supports(Action::TransferOwnership));
    }

    #[test]
    fn test_resource_owner() {
        let owner = UserId::new(Uuid::new_v4());
        let project = Resource::project(owner);
        assert_eq!(project.kind(), ResourceKind::Project);
        assert_eq!(project.owner_id(), Some(owner));
        assert_eq!(Resource::any(ResourceKind::Invite).owner_id(), None);
        assert_eq!(format!("{}", Resource::any(ResourceKind::Billing)), "Billing");
    }
}
