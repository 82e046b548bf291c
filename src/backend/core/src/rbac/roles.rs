//! Static grant table: which rules each role carries.
//!
//! | Role    | Grants                                                             |
//! |---------|--------------------------------------------------------------------|
//! | ADMIN   | `manage` on every resource                                         |
//! | MEMBER  | `get` User/Member/Project, `create` Project, `update`/`delete` own Project |
//! | BILLING | `manage` Billing                                                   |

use std::fmt;

use super::models::{Action, Resource, ResourceKind, Role, Subject};

/// Ownership predicate attached to a rule.
pub type Condition = fn(&Subject, &Resource) -> bool;

/// Which resources a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTarget {
    All,
    Kind(ResourceKind),
}

impl RuleTarget {
    pub fn matches(&self, kind: ResourceKind) -> bool {
        match self {
            Self::All => true,
            Self::Kind(target) => *target == kind,
        }
    }
}

/// One grant: an action on a target, optionally guarded by a condition.
#[derive(Clone, Copy)]
pub struct Rule {
    pub action: Action,
    pub target: RuleTarget,
    pub condition: Option<Condition>,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("action", &self.action)
            .field("target", &self.target)
            .field("conditional", &self.condition.is_some())
            .finish()
    }
}

impl Rule {
    pub const fn allow(action: Action, target: RuleTarget) -> Self {
        Self {
            action,
            target,
            condition: None,
        }
    }

    pub const fn allow_when(action: Action, target: RuleTarget, condition: Condition) -> Self {
        Self {
            action,
            target,
            condition: Some(condition),
        }
    }

    /// Whether this rule is about `action` on `kind`, ignoring its condition.
    pub fn applies_to(&self, action: Action, kind: ResourceKind) -> bool {
        self.action.covers(action) && self.target.matches(kind)
    }

    /// Whether this rule's condition holds (rules without one always hold).
    pub fn holds(&self, subject: &Subject, resource: &Resource) -> bool {
        self.condition.map_or(true, |condition| condition(subject, resource))
    }
}

/// The resource is owned by the caller. A resource without an owner never is.
pub fn owned_by_subject(subject: &Subject, resource: &Resource) -> bool {
    resource.owner_id() == Some(subject.id)
}

const ADMIN_RULES: &[Rule] = &[Rule::allow(Action::Manage, RuleTarget::All)];

const MEMBER_RULES: &[Rule] = &[
    Rule::allow(Action::Get, RuleTarget::Kind(ResourceKind::User)),
    Rule::allow(Action::Get, RuleTarget::Kind(ResourceKind::Member)),
    Rule::allow(Action::Create, RuleTarget::Kind(ResourceKind::Project)),
    Rule::allow(Action::Get, RuleTarget::Kind(ResourceKind::Project)),
    Rule::allow_when(
        Action::Update,
        RuleTarget::Kind(ResourceKind::Project),
        owned_by_subject,
    ),
    Rule::allow_when(
        Action::Delete,
        RuleTarget::Kind(ResourceKind::Project),
        owned_by_subject,
    ),
];

const BILLING_RULES: &[Rule] = &[Rule::allow(
    Action::Manage,
    RuleTarget::Kind(ResourceKind::Billing),
)];

/// The rules granted to `role`.
pub fn rules_for(role: Role) -> &'static [Rule] {
    match role {
        Role::Admin => ADMIN_RULES,
        Role::Member => MEMBER_RULES,
        Role::Billing => BILLING_RULES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rbac::models::UserId;
    use uuid::Uuid;

    #[test]
    fn test_every_role_has_rules() {
        for role in Role::all() {
            assert!(!rules_for(role).is_empty());
        }
    }

    #[test]
    fn test_rules_are_unique_per_action_and_target() {
        for role in Role::all() {
            let rules = rules_for(role);
            for (i, a) in rules.iter().enumerate() {
                for b in &rules[i + 1..] {
                    assert!(
                        !(a.action == b.action && a.target == b.target),
                        "duplicate rule for {role}: {:?} {:?}",
                        a.action,
                        a.target
                    );
                }
            }
        }
    }

    #[test]
    fn test_owned_by_subject() {
        let me = UserId::new(Uuid::new_v4());
        let someone_else = UserId::new(Uuid::new_v4());
        let subject = Subject::new(me, Role::Member);

        assert!(owned_by_subject(&subject, &Resource::project(me)));
        assert!(!owned_by_subject(&subject, &Resource::project(someone_else)));
        assert!(!owned_by_subject(
            &subject,
            &Resource::any(ResourceKind::Project)
        ));
    }
}
