//! Deterministic fixtures shared by the benchmarks.

use dsf_core::{Domain, SlotSpec, State};

/// A composed domain with compositional intent/action names, so every strategy has shared
/// sub-tokens to work with.
pub fn synthetic_domain(intents: usize, entities: usize, slots: usize, actions: usize) -> Domain {
    Domain {
        intents: (0..intents)
            .map(|i| format!("topic{}_verb{}", i % 17, i))
            .collect(),
        entities: (0..entities).map(|i| format!("ent{i}")).collect(),
        slots: (0..slots).map(|i| SlotSpec::new(format!("s{i}"), 1 + i % 3)).collect(),
        actions: (0..actions)
            .map(|i| format!("utter_topic{}_{}", i % 11, i))
            .collect(),
        input_states: None,
    }
}

/// `n` states of `labels` entries each, drawn from the domain's labels plus a few unknown ones.
///
/// Weights alternate between whole and fractional so both dtypes are exercised.
pub fn gen_states(domain: &Domain, n: usize, labels: usize) -> Vec<State> {
    // Simple deterministic xorshift64, no rand dependency.
    let mut x: u64 = 0x1234_5678_9ABC_DEF0;
    let mut next = move || {
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        x
    };

    let known = domain.input_states();
    let mut out = Vec::with_capacity(n);
    for k in 0..n {
        let mut state = State::new();
        for _ in 0..labels {
            let r = next();
            let label = if r % 10 == 0 || known.is_empty() {
                format!("unknown_{}", r % 97)
            } else {
                known[(r as usize) % known.len()].clone()
            };
            let weight = if k % 2 == 0 {
                1.0
            } else {
                ((r >> 8) % 100) as f64 / 100.0
            };
            state.insert(label, weight);
        }
        out.push(state);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_are_deterministic() {
        let d = synthetic_domain(20, 3, 4, 10);
        assert_eq!(d, synthetic_domain(20, 3, 4, 10));
        assert_eq!(d.slot_states().len(), 1 + 2 + 3 + 1);
        let a = gen_states(&d, 8, 5);
        assert_eq!(a, gen_states(&d, 8, 5));
        assert_eq!(a.len(), 8);
        assert!(a.iter().all(|s| !s.is_empty() && s.len() <= 5));
    }
}
