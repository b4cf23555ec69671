//! Per-owner serialization under concurrent submission.
//!
//! The ledger must apply same-owner mutations one at a time in arrival
//! order, each fully committed before the next begins, while different
//! owners proceed independently.

use std::sync::Arc;
use stipend_core::{LedgerError, TokenAddress, FREQ_MONTHLY};
use stipend_testkit::{test_address, LedgerFixture};

#[tokio::test(flavor = "multi_thread")]
async fn one_due_cycle_charges_exactly_once() {
    let fx = fixture().await;
    let owner = test_address(1);
    fx.fund(owner, TokenAddress::NATIVE, 10_000).await;
    fx.ledger
        .create_subscription(owner, "Acme", 100, FREQ_MONTHLY, TokenAddress::NATIVE)
        .await
        .unwrap();
    fx.clock.set(FREQ_MONTHLY);

    // Ten racing submissions of the same due payment. Serialized per
    // owner, the first commits and advances the schedule; the rest must
    // see the new window and fail TooEarly. Without serialization several
    // could pass the due-time check and double-charge.
    let fx = Arc::new(fx);
    let mut tasks = Vec::new();
    for _ in 0..10 {
        let fx = fx.clone();
        tasks.push(tokio::spawn(async move {
            fx.ledger.process_payment(owner, 0).await
        }));
    }

    let mut successes = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(()) => successes += 1,
            Err(LedgerError::TooEarly { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(fx.bank.balance(TokenAddress::NATIVE, owner).await, 9_900);
    let sub = &fx.ledger.get_user_subscriptions(owner).await[0];
    assert_eq!(sub.next_payment, 2 * FREQ_MONTHLY);
}

#[tokio::test(flavor = "multi_thread")]
async fn owners_do_not_block_each_other() {
    let fx = Arc::new(fixture().await);

    let mut tasks = Vec::new();
    for seed in 1..=4u8 {
        let fx = fx.clone();
        tasks.push(tokio::spawn(async move {
            let owner = test_address(seed);
            for _ in 0..25 {
                fx.ledger
                    .create_subscription(owner, "Acme", 100, FREQ_MONTHLY, TokenAddress::NATIVE)
                    .await
                    .unwrap();
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    for seed in 1..=4u8 {
        let subs = fx.ledger.get_user_subscriptions(test_address(seed)).await;
        assert_eq!(subs.len(), 25);
        // Indices were handed out sequentially per owner.
        for (index, sub) in subs.iter().enumerate() {
            assert!(sub.active, "subscription {index} inactive");
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn racing_cancels_yield_one_winner() {
    let fx = fixture().await;
    let owner = test_address(1);
    fx.ledger
        .create_subscription(owner, "Acme", 100, FREQ_MONTHLY, TokenAddress::NATIVE)
        .await
        .unwrap();

    let fx = Arc::new(fx);
    let mut tasks = Vec::new();
    for _ in 0..4 {
        let fx = fx.clone();
        tasks.push(tokio::spawn(async move {
            fx.ledger.cancel_subscription(owner, 0).await
        }));
    }

    let mut successes = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(()) => successes += 1,
            Err(LedgerError::AlreadyInactive { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(successes, 1);
    assert!(!fx.ledger.get_user_subscriptions(owner).await[0].active);
}

async fn fixture() -> LedgerFixture {
    let fx = LedgerFixture::new().await;
    fx.register_service("Acme", test_address(0x5E))
        .await
        .unwrap();
    fx
}
