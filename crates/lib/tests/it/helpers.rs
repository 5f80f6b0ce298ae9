use pixelsync::crdt::{Entry, MapState, RegisterState};

/// A live register state for building remote messages by hand.
pub fn live<V>(origin: &str, counter: u64, value: V) -> RegisterState<Entry<V>> {
    RegisterState::new(origin, counter, Entry::Value(value))
}

/// A tombstoned register state.
pub fn tombstone<V>(origin: &str, counter: u64) -> RegisterState<Entry<V>> {
    RegisterState::new(origin, counter, Entry::Tombstone)
}

/// Build a (possibly partial) map state from `(key, register)` pairs.
pub fn state_of<V>(entries: Vec<(&str, RegisterState<Entry<V>>)>) -> MapState<V> {
    entries
        .into_iter()
        .map(|(key, register)| (key.to_string(), register))
        .collect()
}

/// Every ordering of `items`.
pub fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut result = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head.clone());
            result.push(tail);
        }
    }
    result
}
