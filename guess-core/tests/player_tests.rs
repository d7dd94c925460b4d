mod common;

use common::*;
use guess_core::LedgerError;
use guess_types::NameChange;

#[tokio::test]
async fn test_register_returns_fresh_credentials() {
    let ledger = TestLedger::on(day(2026, 10, 17));

    let a = ledger.players.register().await.unwrap();
    let b = ledger.players.register().await.unwrap();

    assert_ne!(a.public_id, b.public_id);
    assert_ne!(a.private_id, b.private_id);
    assert_eq!(a.private_id.len(), 256);

    let stored = ledger.store.player(&a.private_id).unwrap();
    assert_eq!(stored.name, "");
    assert!(stored.rooms.is_empty());
    assert!(stored.last_guess_date.is_none());
}

#[tokio::test]
async fn test_identify_requires_matching_pair() {
    let ledger = TestLedger::on(day(2026, 10, 17));
    let a = ledger.players.register().await.unwrap();
    let b = ledger.players.register().await.unwrap();

    let found = ledger.players.identify(a.public_id, &a.private_id).await.unwrap();
    assert_eq!(found.map(|i| i.public_id), Some(a.public_id));

    assert!(ledger.players.identify(a.public_id, &b.private_id).await.unwrap().is_none());
    assert!(ledger.players.identify(a.public_id, "nope").await.unwrap().is_none());
}

#[tokio::test]
async fn test_change_name() {
    let ledger = TestLedger::on(day(2026, 10, 17));
    let a = ledger.players.register().await.unwrap();

    assert_eq!(
        ledger.players.change_name(&a.private_id, "Kedi").await.unwrap(),
        NameChange::Changed
    );
    assert_eq!(
        ledger.players.change_name(&a.private_id, "Kedi").await.unwrap(),
        NameChange::Unchanged
    );
    assert_eq!(ledger.players.profile(a.public_id).await.unwrap().name, "Kedi");

    let missing = ledger.players.change_name("nobody", "Kedi").await;
    assert!(matches!(missing, Err(LedgerError::NotFound { .. })));
}

#[tokio::test]
async fn test_room_snapshot_hides_private_ids() {
    let ledger = TestLedger::on(day(2026, 10, 17));
    let a = ledger.players.register().await.unwrap();
    let b = ledger.players.register().await.unwrap();
    let c = ledger.players.register().await.unwrap();

    ledger.submissions.submit(guess_request(&a.private_id, "R1", 2, "A")).await.unwrap();
    ledger.submissions.submit(guess_request(&b.private_id, "R1", 6, "B")).await.unwrap();
    ledger.submissions.submit(guess_request(&b.private_id, "R9", 1, "B")).await.unwrap();
    ledger.submissions.submit(guess_request(&c.private_id, "R9", 1, "C")).await.unwrap();

    let snapshot = ledger.players.room_snapshot("R1").await.unwrap();
    assert_eq!(snapshot.len(), 2);
    assert!(snapshot.iter().all(|s| s.room.id == "R1" && s.room.guesses.len() == 1));
    let names: Vec<_> = snapshot.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);

    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(!json.contains("private_id"));
    assert!(!json.contains(&a.private_id));

    assert!(ledger.players.room_snapshot("empty").await.unwrap().is_empty());
}
