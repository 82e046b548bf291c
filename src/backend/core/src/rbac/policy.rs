//! Permission evaluation.
//!
//! An [`Ability`] answers "can this subject perform action A on resource R?".
//! Evaluation is a pure lookup in the static grant table of
//! [`roles`](super::roles): no I/O, no shared state. Anything the table does
//! not grant is denied.

use thiserror::Error;
use tracing::debug;

use super::models::{Action, Resource, ResourceKind, Role, Subject, UserId};
use super::roles::{rules_for, Rule};

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors raised while parsing the permission vocabulary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Unknown resource: {0}")]
    UnknownResource(String),
}

// ═══════════════════════════════════════════════════════════════════════════════
// Decision
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of a policy evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    Allow,
    /// Denied, with the reason.
    Deny(String),
}

impl PolicyDecision {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    #[must_use]
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Deny(_))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Ability
// ═══════════════════════════════════════════════════════════════════════════════

/// The permissions of one subject, built once per request and queried as
/// many times as needed.
#[derive(Debug, Clone, Copy)]
pub struct Ability {
    subject: Subject,
    rules: &'static [Rule],
}

impl Ability {
    pub fn for_subject(subject: Subject) -> Self {
        Self {
            subject,
            rules: rules_for(subject.role),
        }
    }

    pub fn for_user(user_id: impl Into<UserId>, role: Role) -> Self {
        Self::for_subject(Subject::new(user_id, role))
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    #[must_use]
    pub fn can(&self, action: Action, resource: &Resource) -> bool {
        self.decide(action, resource).is_allowed()
    }

    #[must_use]
    pub fn cannot(&self, action: Action, resource: &Resource) -> bool {
        !self.can(action, resource)
    }

    /// Evaluate and explain the outcome.
    pub fn decide(&self, action: Action, resource: &Resource) -> PolicyDecision {
        let kind = resource.kind();

        if !kind.supports(action) {
            return PolicyDecision::Deny(format!("{} does not support {}", kind, action));
        }

        let mut matched = false;
        for rule in self.rules.iter().filter(|r| r.applies_to(action, kind)) {
            matched = true;
            if rule.holds(&self.subject, resource) {
                return PolicyDecision::Allow;
            }
        }

        let reason = if matched {
            format!(
                "{} may only {} {} they own",
                self.subject.role, action, kind
            )
        } else {
            format!("{} is not granted {} on {}", self.subject.role, action, kind)
        };
        debug!(
            user_id = %self.subject.id,
            role = %self.subject.role,
            action = %action,
            resource = %resource,
            reason = %reason,
            "Permission denied"
        );
        PolicyDecision::Deny(reason)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Free functions
// ═══════════════════════════════════════════════════════════════════════════════

/// Single-shot evaluation.
#[must_use]
pub fn evaluate(subject_id: impl Into<UserId>, role: Role, action: Action, resource: &Resource) -> bool {
    Ability::for_user(subject_id, role).can(action, resource)
}

/// Evaluation from untrusted strings (stored roles, query parameters).
///
/// Any value outside the vocabulary denies.
#[must_use]
pub fn evaluate_str(
    subject_id: impl Into<UserId>,
    role: &str,
    action: &str,
    resource: &str,
    owner_id: Option<UserId>,
) -> bool {
    let parsed = role.parse::<Role>().and_then(|role| {
        let action = action.parse::<Action>()?;
        let kind = resource.parse::<ResourceKind>()?;
        Ok((role, action, kind))
    });

    match parsed {
        Ok((role, action, kind)) => {
            evaluate(subject_id, role, action, &Resource::with_owner(kind, owner_id))
        }
        Err(error) => {
            debug!(error = %error, "Denying unparseable permission query");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const ALL_ACTIONS: [Action; 7] = [
        Action::Manage,
        Action::Get,
        Action::Create,
        Action::Update,
        Action::Delete,
        Action::TransferOwnership,
        Action::Export,
    ];

    const ALL_KINDS: [ResourceKind; 6] = [
        ResourceKind::User,
        ResourceKind::Organization,
        ResourceKind::Project,
        ResourceKind::Member,
        ResourceKind::Invite,
        ResourceKind::Billing,
    ];

    fn user() -> UserId {
        UserId::new(Uuid::new_v4())
    }

    #[test]
    fn test_admin_allowed_every_supported_action() {
        let admin = user();
        let ability = Ability::for_user(admin, Role::Admin);

        for kind in ALL_KINDS {
            for &action in kind.supported_actions() {
                assert!(ability.can(action, &Resource::any(kind)), "{action} {kind}");
                assert!(ability.can(action, &Resource::with_owner(kind, Some(user()))));
            }
        }
    }

    #[test]
    fn test_admin_can_delete_and_transfer_organization_they_do_not_own() {
        let org = Resource::organization(user());
        assert!(evaluate(user(), Role::Admin, Action::Delete, &org));
        assert!(evaluate(user(), Role::Admin, Action::TransferOwnership, &org));
    }

    #[test]
    fn test_unsupported_action_denied_even_for_admin() {
        let ability = Ability::for_user(user(), Role::Admin);
        assert!(ability.cannot(Action::Export, &Resource::any(ResourceKind::Project)));
        assert!(ability.cannot(
            Action::TransferOwnership,
            &Resource::any(ResourceKind::Invite)
        ));
    }

    #[test]
    fn test_member_grants() {
        let me = user();
        let ability = Ability::for_user(me, Role::Member);

        assert!(ability.can(Action::Get, &Resource::any(ResourceKind::User)));
        assert!(ability.can(Action::Get, &Resource::any(ResourceKind::Member)));
        assert!(ability.can(Action::Get, &Resource::any(ResourceKind::Project)));
        assert!(ability.can(Action::Create, &Resource::any(ResourceKind::Project)));

        assert!(ability.cannot(Action::Update, &Resource::any(ResourceKind::Member)));
        assert!(ability.cannot(Action::Create, &Resource::any(ResourceKind::Invite)));
        assert!(ability.cannot(Action::Get, &Resource::any(ResourceKind::Invite)));
        assert!(ability.cannot(Action::Get, &Resource::any(ResourceKind::Billing)));
        assert!(ability.cannot(Action::Update, &Resource::organization(me)));
        assert!(ability.cannot(Action::Manage, &Resource::any(ResourceKind::Project)));
    }

    #[test]
    fn test_member_project_ownership() {
        let me = user();
        let other = user();

        assert!(evaluate(me, Role::Member, Action::Delete, &Resource::project(me)));
        assert!(evaluate(me, Role::Member, Action::Update, &Resource::project(me)));
        assert!(!evaluate(me, Role::Member, Action::Delete, &Resource::project(other)));
        assert!(!evaluate(me, Role::Member, Action::Update, &Resource::project(other)));
    }

    #[test]
    fn test_member_project_without_owner_denied() {
        let decision = Ability::for_user(user(), Role::Member)
            .decide(Action::Delete, &Resource::any(ResourceKind::Project));
        assert_eq!(
            decision,
            PolicyDecision::Deny("MEMBER may only delete Project they own".to_string())
        );
    }

    #[test]
    fn test_billing_grants() {
        let ability = Ability::for_user(user(), Role::Billing);
        let billing = Resource::any(ResourceKind::Billing);

        assert!(ability.can(Action::Get, &billing));
        assert!(ability.can(Action::Export, &billing));
        assert!(ability.can(Action::Manage, &billing));
        assert!(ability.cannot(Action::Delete, &Resource::organization(user())));
        assert!(ability.cannot(Action::Get, &Resource::any(ResourceKind::Project)));
    }

    #[test]
    fn test_only_granted_combinations_allowed() {
        // Exhaustive sweep for the two restricted roles, with and without an
        // owner match.
        let me = user();
        for role in [Role::Member, Role::Billing] {
            let ability = Ability::for_user(me, role);
            for kind in ALL_KINDS {
                for action in ALL_ACTIONS {
                    for owner in [None, Some(me), Some(user())] {
                        let resource = Resource::with_owner(kind, owner);
                        let expected = match (role, kind, action) {
                            (Role::Member, ResourceKind::User, Action::Get)
                            | (Role::Member, ResourceKind::Member, Action::Get)
                            | (Role::Member, ResourceKind::Project, Action::Get)
                            | (Role::Member, ResourceKind::Project, Action::Create) => true,
                            (Role::Member, ResourceKind::Project, Action::Update)
                            | (Role::Member, ResourceKind::Project, Action::Delete) => {
                                owner == Some(me)
                            }
                            (Role::Billing, ResourceKind::Billing, a) => kind.supports(a),
                            _ => false,
                        };
                        assert_eq!(
                            ability.can(action, &resource),
                            expected,
                            "{role} {action} {resource}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_decisions_are_deterministic() {
        let me = user();
        let resource = Resource::project(me);
        let first = evaluate(me, Role::Member, Action::Update, &resource);
        for _ in 0..100 {
            assert_eq!(evaluate(me, Role::Member, Action::Update, &resource), first);
        }
    }

    #[test]
    fn test_evaluate_str() {
        let me = user();
        assert!(evaluate_str(me, "ADMIN", "delete", "Organization", None));
        assert!(evaluate_str(me, "MEMBER", "read", "Project", None));
        assert!(evaluate_str(me, "MEMBER", "delete", "Project", Some(me)));
        assert!(!evaluate_str(me, "BILLING", "delete", "Organization", None));
    }

    #[test]
    fn test_evaluate_str_denies_unknown_vocabulary() {
        let me = user();
        assert!(!evaluate_str(me, "OWNER", "delete", "Organization", None));
        assert!(!evaluate_str(me, "ADMIN", "destroy", "Organization", None));
        assert!(!evaluate_str(me, "ADMIN", "delete", "Workspace", None));
        assert!(!evaluate_str(me, "", "", "", None));
    }
}
