use crate::tree::bst::Tree;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Buffer between a walker and its consumer
const CHANNEL_CAPACITY: usize = 16;

/// Sends every value of `tree` to `tx` in ascending order
///
/// The channel is closed when the walk finishes, as `tx` is dropped. The
/// walk stops early if the receiver goes away.
pub async fn walk(tree: Arc<Tree>, tx: mpsc::Sender<i64>) {
    for value in tree.iter() {
        if tx.send(value).await.is_err() {
            tracing::debug!("Tree walk receiver dropped, stopping early");
            return;
        }
    }
}

/// Reports whether two trees hold the same values
///
/// Each tree is walked by its own task; both streams are drained to the end
/// before comparing. Trees match when they have the same number of values
/// and the same set of distinct values, so a differing multiplicity of a
/// shared value is not detected.
pub async fn same_content(a: Arc<Tree>, b: Arc<Tree>) -> bool {
    let (tx_a, rx_a) = mpsc::channel(CHANNEL_CAPACITY);
    let (tx_b, rx_b) = mpsc::channel(CHANNEL_CAPACITY);

    let walk_a = tokio::spawn(walk(a, tx_a));
    let walk_b = tokio::spawn(walk(b, tx_b));

    let (values_a, values_b) = tokio::join!(drain(rx_a), drain(rx_b));

    for handle in [walk_a, walk_b] {
        if let Err(e) = handle.await {
            tracing::error!("Tree walk failed: {}", e);
            return false;
        }
    }

    equal_content(&values_a, &values_b)
}

async fn drain(mut rx: mpsc::Receiver<i64>) -> Vec<i64> {
    let mut values = Vec::new();
    while let Some(value) = rx.recv().await {
        values.push(value);
    }
    values
}

fn equal_content(a: &[i64], b: &[i64]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let distinct_a: HashSet<i64> = a.iter().copied().collect();
    let distinct_b: HashSet<i64> = b.iter().copied().collect();
    distinct_a == distinct_b
}
