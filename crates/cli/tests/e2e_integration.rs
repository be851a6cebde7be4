//! End-to-end integration tests for the parking lot.
//!
//! These tests run full command scripts through the service, the way the
//! `run` command does, and check the exact reply text and what survives a
//! restart for each store backend.

use std::sync::Arc;

use parkinglot_core::processor::Reply;
use parkinglot_core::service::LotService;
use parkinglot_core::store::LotStore;
use parkinglot_store::{FileStore, NoopStore};
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────

async fn run_script(service: &LotService, script: &[&str]) -> Vec<String> {
    let mut replies = Vec::new();
    for line in script {
        match service.execute(line).await.unwrap() {
            Reply::Text(text) => replies.push(text),
            Reply::Exit => break,
        }
    }
    replies
}

async fn reply(service: &LotService, line: &str) -> String {
    match service.execute(line).await.unwrap() {
        Reply::Text(text) => text,
        Reply::Exit => panic!("unexpected exit for {line:?}"),
    }
}

const FILL_SIX: &[&str] = &[
    "create_parking_lot 6",
    "park KA-01-HH-1234 White",
    "park KA-01-HH-9999 White",
    "park KA-01-BB-0001 Black",
    "park KA-01-HH-7777 Red",
    "park KA-01-HH-2701 Blue",
    "park KA-01-HH-3141 Black",
];

// ── E2E: Reference scenario ──────────────────────────────────────────────

#[tokio::test]
async fn e2e_reference_scenario() {
    let service = LotService::open(Arc::new(NoopStore)).await.unwrap();

    let script = [
        "create_parking_lot 6",
        "park KA-01-HH-1234 White",
        "park KA-01-HH-9999 White",
        "park KA-01-BB-0001 Black",
        "park KA-01-HH-7777 Red",
        "park KA-01-HH-2701 Blue",
        "park KA-01-HH-3141 Black",
        "leave 4",
        "status",
        "park KA-01-P-333 White",
        "park DL-12-AA-9999 White",
        "registration_numbers_for_cars_with_colour White",
        "slot_numbers_for_cars_with_colour White",
        "slot_number_for_registration_number KA-01-HH-3141",
        "slot_number_for_registration_number MH-04-AY-1111",
        "exit",
        "park NEVER-SEEN Grey",
    ];

    let expected = vec![
        "Created a parking lot with 6 slots".to_string(),
        "Allocated slot number: 1".into(),
        "Allocated slot number: 2".into(),
        "Allocated slot number: 3".into(),
        "Allocated slot number: 4".into(),
        "Allocated slot number: 5".into(),
        "Allocated slot number: 6".into(),
        "Slot number 4 is free".into(),
        "Slot No.    Registration No    Colour\n\
         1           KA-01-HH-1234      White\n\
         2           KA-01-HH-9999      White\n\
         3           KA-01-BB-0001      Black\n\
         5           KA-01-HH-2701      Blue\n\
         6           KA-01-HH-3141      Black"
            .into(),
        "Allocated slot number: 4".into(),
        "Sorry, parking lot is full".into(),
        "KA-01-HH-1234, KA-01-HH-9999, KA-01-P-333".into(),
        "1, 2, 4".into(),
        "6".into(),
        "Not found".into(),
    ];

    assert_eq!(run_script(&service, &script).await, expected);
}

#[tokio::test]
async fn e2e_lowest_slot_after_scattered_departures() {
    let service = LotService::open(Arc::new(NoopStore)).await.unwrap();
    run_script(&service, FILL_SIX).await;

    assert_eq!(reply(&service, "leave 4").await, "Slot number 4 is free");
    assert_eq!(reply(&service, "leave 2").await, "Slot number 2 is free");
    assert_eq!(reply(&service, "leave 5").await, "Slot number 5 is free");
    assert_eq!(reply(&service, "leave 4").await, "Slot number 4 is free");
    assert_eq!(reply(&service, "leave 100").await, "The parking slot is inactive");

    assert_eq!(reply(&service, "park KA-01-HH-1235 White").await, "Allocated slot number: 2");
    assert_eq!(reply(&service, "park KA-01-HH-9999 White").await, "Allocated slot number: 4");
    assert_eq!(reply(&service, "park KA-01-HH-7777 Red").await, "Allocated slot number: 5");
    assert_eq!(reply(&service, "park KA-01-HH-0000 Red").await, "Sorry, parking lot is full");
}

#[tokio::test]
async fn e2e_repeated_parking_and_recreate() {
    let service = LotService::open(Arc::new(NoopStore)).await.unwrap();
    run_script(&service, FILL_SIX).await;

    assert_eq!(
        reply(&service, "park KA-01-HH-1234 White").await,
        "This is a repeated parking. Car already in parking."
    );

    assert_eq!(reply(&service, "create_parking_lot 2").await, "Created a parking lot with 2 slots");
    assert_eq!(reply(&service, "status").await, "Parking Lot is empty");
    assert_eq!(reply(&service, "park KA-01-HH-1234 White").await, "Allocated slot number: 1");
}

#[tokio::test]
async fn e2e_invalid_input_keeps_going() {
    let service = LotService::open(Arc::new(NoopStore)).await.unwrap();
    let replies = run_script(
        &service,
        &[
            "create_parking_lot 2",
            "teleport KA-01-HH-1234",
            "park KA-01-HH-1234",
            "leave two",
            "park KA-01-HH-1234 White",
        ],
    )
    .await;
    assert_eq!(
        replies,
        vec![
            "Created a parking lot with 2 slots",
            "Invalid Command",
            "Invalid Command",
            "Invalid Command",
            "Allocated slot number: 1",
        ]
    );
}

// ── E2E: Persistence across restarts ─────────────────────────────────────

async fn assert_survives_restart(open: impl Fn() -> Arc<dyn LotStore>) {
    {
        let service = LotService::open(open()).await.unwrap();
        run_script(&service, FILL_SIX).await;
        assert_eq!(reply(&service, "leave 3").await, "Slot number 3 is free");
    }

    let service = LotService::open(open()).await.unwrap();
    assert_eq!(
        reply(&service, "slot_number_for_registration_number KA-01-HH-3141").await,
        "6"
    );
    assert_eq!(
        reply(&service, "slot_numbers_for_cars_with_colour black").await,
        "6"
    );
    assert_eq!(reply(&service, "park KA-01-P-333 White").await, "Allocated slot number: 3");
    assert_eq!(reply(&service, "park DL-12-AA-9999 White").await, "Sorry, parking lot is full");
}

#[tokio::test]
async fn e2e_file_store_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lot.json");
    assert_survives_restart(|| -> Arc<dyn LotStore> {
        Arc::new(FileStore::open(path.clone()).unwrap())
    })
    .await;
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn e2e_sqlite_store_survives_restart_and_keeps_history() {
    use parkinglot_store::{sqlite_url, SqliteStore};

    let dir = TempDir::new().unwrap();
    let url = sqlite_url(&dir.path().join("parking_lot.db").display().to_string());

    {
        let service = LotService::open(Arc::new(SqliteStore::new(&url).await.unwrap()))
            .await
            .unwrap();
        run_script(&service, FILL_SIX).await;
        assert_eq!(reply(&service, "leave 1").await, "Slot number 1 is free");
        assert_eq!(reply(&service, "park KA-01-HH-1234 White").await, "Allocated slot number: 1");
    }

    let store = Arc::new(SqliteStore::new(&url).await.unwrap());
    let visits = store.history("KA-01-HH-1234").await.unwrap();
    assert_eq!(visits.len(), 2);
    assert!(visits[0].record.active);
    assert!(!visits[1].record.active);

    let service = LotService::open(store).await.unwrap();
    assert_eq!(
        reply(&service, "registration_numbers_for_cars_with_colour White").await,
        "KA-01-HH-1234, KA-01-HH-9999"
    );
    assert_eq!(reply(&service, "park NEW-CAR Green").await, "Sorry, parking lot is full");
}
