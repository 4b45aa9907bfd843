// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use futures_util::StreamExt;

use super::*;
use crate::test_support::update;

#[test]
fn stop_is_idempotent() {
    let stop = StopSignal::new();
    assert!(!stop.is_stopped());
    assert!(stop.stop());
    assert!(!stop.stop());
    assert!(!stop.clone().stop());
    assert!(stop.is_stopped());
}

#[tokio::test]
async fn recv_returns_updates_in_send_order() -> anyhow::Result<()> {
    let (tx, mut updates) = channel(StopSignal::new());
    tx.send(update(1)).await?;
    tx.send(update(2)).await?;

    assert_eq!(updates.recv().await.map(|u| u.update_id), Some(1));
    assert_eq!(updates.recv().await.map(|u| u.update_id), Some(2));
    Ok(())
}

#[tokio::test]
async fn stop_ends_stream_and_drops_buffered_updates() -> anyhow::Result<()> {
    let stop = StopSignal::new();
    let (tx, mut updates) = channel(stop.clone());
    tx.send(update(1)).await?;

    stop.stop();
    assert!(updates.recv().await.is_none());
    assert!(updates.recv().await.is_none());
    assert!(tx.is_closed());
    Ok(())
}

#[tokio::test]
async fn stop_wakes_a_waiting_consumer() {
    let stop = StopSignal::new();
    let (_tx, mut updates) = channel(stop.clone());

    let waiter = tokio::spawn(async move { updates.recv().await });
    tokio::task::yield_now().await;
    stop.stop();
    assert!(matches!(waiter.await, Ok(None)));
}

#[tokio::test]
async fn deliver_gives_up_on_stop_when_channel_is_full() {
    let stop = StopSignal::new();
    let (tx, _updates) = channel(stop.clone());
    for id in 0..UPDATE_CHANNEL_BUFFER as i64 {
        assert!(deliver(&tx, &stop, update(id)).await);
    }

    let blocked = {
        let (tx, stop) = (tx.clone(), stop.clone());
        tokio::spawn(async move { deliver(&tx, &stop, update(1000)).await })
    };
    tokio::task::yield_now().await;
    stop.stop();
    assert!(matches!(blocked.await, Ok(false)));
}

#[tokio::test]
async fn deliver_reports_dropped_consumer() {
    let stop = StopSignal::new();
    let (tx, updates) = channel(stop.clone());
    drop(updates);
    assert!(!deliver(&tx, &stop, update(1)).await);
}

#[tokio::test]
async fn into_stream_yields_until_sender_drops() -> anyhow::Result<()> {
    let (tx, updates) = channel(StopSignal::new());
    for id in [3, 4, 5] {
        tx.send(update(id)).await?;
    }
    drop(tx);

    let ids: Vec<i64> = updates.into_stream().map(|u| u.update_id).collect().await;
    assert_eq!(ids, vec![3, 4, 5]);
    Ok(())
}
