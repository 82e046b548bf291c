//! Permission evaluator properties through the public API.

use saas_core::rbac::{
    evaluate, evaluate_str, rules_for, Ability, Action, Resource, ResourceKind, Role, UserId,
};
use std::thread;
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
fn test_member_deletes_own_project_only() {
    let me = user();
    assert!(evaluate(me, Role::Member, Action::Delete, &Resource::project(me)));
    assert!(!evaluate(me, Role::Member, Action::Delete, &Resource::project(user())));
}

#[test]
fn test_billing_cannot_delete_organization() {
    let me = user();
    assert!(!evaluate(me, Role::Billing, Action::Delete, &Resource::organization(me)));
}

#[test]
fn test_admin_can_delete_organization() {
    assert!(evaluate(user(), Role::Admin, Action::Delete, &Resource::organization(user())));
}

#[test]
fn test_admin_is_unconditional_on_supported_actions() {
    let admin = user();
    for kind in ALL_KINDS {
        for &action in kind.supported_actions() {
            for owner in [None, Some(admin), Some(user())] {
                assert!(
                    evaluate(admin, Role::Admin, action, &Resource::with_owner(kind, owner)),
                    "ADMIN {action} {kind}"
                );
            }
        }
    }
}

#[test]
fn test_allowed_implies_some_rule_grants_it() {
    // Anything allowed must come from the role's table; nothing is implied.
    let me = user();
    for role in Role::all() {
        for kind in ALL_KINDS {
            for action in ALL_ACTIONS {
                let resource = Resource::with_owner(kind, Some(me));
                if evaluate(me, role, action, &resource) {
                    assert!(rules_for(role)
                        .iter()
                        .any(|rule| rule.applies_to(action, kind)));
                }
            }
        }
    }
}

#[test]
fn test_cannot_is_negation_of_can() {
    let me = user();
    for role in Role::all() {
        let ability = Ability::for_user(me, role);
        for kind in ALL_KINDS {
            for action in ALL_ACTIONS {
                let resource = Resource::with_owner(kind, Some(me));
                assert_ne!(ability.can(action, &resource), ability.cannot(action, &resource));
            }
        }
    }
}

#[test]
fn test_string_queries_match_typed_queries() {
    let me = user();
    for role in Role::all() {
        for kind in ALL_KINDS {
            for action in ALL_ACTIONS {
                assert_eq!(
                    evaluate_str(me, role.as_str(), action.as_str(), kind.as_str(), Some(me)),
                    evaluate(me, role, action, &Resource::with_owner(kind, Some(me))),
                );
            }
        }
    }
}

#[test]
fn test_unknown_strings_deny() {
    let me = user();
    assert!(!evaluate_str(me, "SUPERUSER", "manage", "Organization", None));
    assert!(!evaluate_str(me, "ADMIN", "approve", "Organization", None));
    assert!(!evaluate_str(me, "ADMIN", "manage", "Team", None));
}

#[test]
fn test_concurrent_evaluation_is_consistent() {
    let me = user();
    let expected = evaluate(me, Role::Member, Action::Update, &Resource::project(me));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            thread::spawn(move || {
                (0..1_000).all(|_| {
                    evaluate(me, Role::Member, Action::Update, &Resource::project(me)) == expected
                })
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
