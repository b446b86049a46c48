//! Save/restore behaviour of the actor snapshot.

mod common;

use delve_core::env::{ItemGrant, StatusGrant};
use delve_core::{ActorSnapshot, ActorState, GameConfig};

fn seasoned_actor() -> ActorState {
    let content = common::content();
    let config = GameConfig::default();
    let mut actor = ActorState::new_run(&config, &content);
    actor.acquire_weapon(content.weapons["flame_blade"].clone());
    actor.acquire_armor(content.armors["knight_mail"].clone());
    actor.adjust_coins(17);
    actor.grant_key();
    actor.apply_event_outcome(
        &delve_core::env::EventOutcome {
            items: vec![ItemGrant {
                id: "potion".into(),
                quantity: 3,
            }],
            statuses: vec![StatusGrant::with_duration("guard", 2), StatusGrant::new("poison")],
            skills: vec!["mend".into()],
            ..Default::default()
        },
        &content,
    );
    actor.cast_skill("mend", &content).unwrap();
    actor
}

#[test]
fn restore_then_snapshot_is_a_fixed_point() {
    common::init_tracing();
    let content = common::content();
    let config = GameConfig::default();
    let snapshot = seasoned_actor().snapshot();

    let json = snapshot.to_json().unwrap();
    let decoded = ActorSnapshot::from_json(&json);
    assert_eq!(decoded, snapshot);

    let restored = ActorState::restore(&decoded, &content, &config);
    assert_eq!(restored.snapshot(), snapshot);
    assert_eq!(restored, seasoned_actor());
}

#[test]
fn snapshot_uses_camel_case_ids() {
    let json = seasoned_actor().snapshot().to_json().unwrap();
    let keys = ["\"weaponId\"", "\"armorStash\"", "\"hasKey\"", "\"itemId\"", "\"skillCooldowns\""];
    for key in keys {
        assert!(json.contains(key), "missing {key} in {json}");
    }
}

#[test]
fn unknown_inventory_item_is_dropped() {
    let content = common::content();
    let snapshot = ActorSnapshot::from_json(
        r#"{"hp": 50, "inventory": [
            {"itemId": "potion", "quantity": 2},
            {"itemId": "philosopher_stone", "quantity": 1},
            {"itemId": "potion"}
        ]}"#,
    );
    let actor = ActorState::restore(&snapshot, &content, &GameConfig::default());
    assert_eq!(actor.hp(), 50);
    assert_eq!(actor.inventory().len(), 1);
    assert_eq!(actor.inventory().count("potion"), 2);
}

#[test]
fn missing_weapon_gets_default_with_zero_charge() {
    let content = common::content();
    let snapshot = ActorSnapshot::from_json(
        r#"{"weaponId": null, "weaponCharges": {"pierce": 2, "ember": 1}}"#,
    );
    let actor = ActorState::restore(&snapshot, &content, &GameConfig::default());
    assert_eq!(actor.weapon().map(|w| w.id.as_str()), Some("wooden_sword"));
    assert_eq!(actor.charges().get("pierce"), Some(&0));
    assert_eq!(actor.charges().len(), 1);
    assert_eq!(actor.hp(), GameConfig::default().starting_kit.hp);
}

#[test]
fn malformed_fields_fall_back_independently() {
    let content = common::content();
    let snapshot = ActorSnapshot::from_json(
        r#"{"hp": -20, "mp": "12", "coins": 3.9, "hasKey": "yes",
            "weaponId": 42, "armorId": "knight_mail",
            "weaponStash": ["flame_blade", 7, "ghost_blade"],
            "statuses": [
                {"statusId": "guard", "remaining": 0},
                {"statusId": "poison", "remaining": 2}
            ],
            "skills": "mend"}"#,
    );
    let actor = ActorState::restore(&snapshot, &content, &GameConfig::default());
    assert_eq!(actor.hp(), 0);
    assert_eq!(actor.mp(), 12);
    assert_eq!(actor.coins(), 3);
    assert_eq!(actor.armor().map(|a| a.id.as_str()), Some("knight_mail"));
    assert_eq!(actor.weapon().map(|w| w.id.as_str()), Some("wooden_sword"));
    let stash: Vec<_> = actor.weapon_stash().iter().map(|w| w.id.as_str()).collect();
    assert_eq!(stash, ["flame_blade", "wooden_sword"]);
    assert_eq!(actor.statuses().len(), 1);
    assert!(actor.statuses().has("poison"));
}

#[test]
fn garbage_text_restores_a_fresh_run() {
    let content = common::content();
    let config = GameConfig::default();
    let actor = ActorState::restore(&ActorSnapshot::from_json("not json"), &content, &config);
    assert_eq!(actor, ActorState::new_run(&config, &content));
}
