// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn admin_can_route_anywhere() {
    let actor = ActorBuilder::default().admin(true).build();
    assert!(actor.can_route(&"Onboarding".into()));
    assert!(actor.can_route(&"Compliance".into()));
    assert!(actor.is_manager());
}

#[parameterized(
    own_department = { "Verification", true },
    other_department = { "Compliance", false },
)]
fn department_user_routes_own_stage_only(stage: &str, expected: bool) {
    let actor = ActorBuilder::default().department("Verification").build();
    assert_eq!(actor.can_route(&stage.into()), expected);
}

#[test]
fn stage_manager_can_route_managed_stage() {
    let actor = ActorBuilder::default().managed("Compliance").build();
    assert!(actor.can_route(&"Compliance".into()));
    assert!(!actor.can_route(&"Onboarding".into()));
    assert!(actor.is_manager());
}

#[test]
fn plain_department_user_is_not_manager() {
    let actor = ActorBuilder::default().department("Verification").build();
    assert!(!actor.is_manager());
}

#[test]
fn home_department_for_department_user() {
    let actor = ActorBuilder::default().department("Verification").build();
    assert_eq!(actor.home_department(), Some(&"Verification".into()));

    let admin = ActorBuilder::default().admin(true).build();
    assert_eq!(admin.home_department(), None);
}

#[test]
fn directory_resolves_known_users() {
    let directory = Directory::new(vec![
        ActorBuilder::default().user("alice@example.com").full_name("Alice").build(),
        ActorBuilder::default().user("bob@example.com").full_name("Bob").build(),
    ]);

    assert_eq!(directory.len(), 2);
    let alice = directory.resolve(&"alice@example.com".into()).unwrap();
    assert_eq!(alice.full_name, "Alice");
    assert!(directory.resolve(&"carol@example.com".into()).is_none());
}

#[test]
fn full_name_falls_back_to_user_id() {
    let directory = Directory::default();
    assert_eq!(directory.full_name(&"ghost@example.com".into()), "ghost@example.com");
}
