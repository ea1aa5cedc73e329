use crate::models::FederalState;

/// Pairs of states that share a land border. Undirected; each pair is
/// listed once.
const BORDERS: &[(FederalState, FederalState)] = &[
    (FederalState::SchleswigHolstein, FederalState::Hamburg),
    (FederalState::SchleswigHolstein, FederalState::Niedersachsen),
    (
        FederalState::SchleswigHolstein,
        FederalState::MecklenburgVorpommern,
    ),
    (FederalState::Hamburg, FederalState::Niedersachsen),
    (FederalState::Bremen, FederalState::Niedersachsen),
    (
        FederalState::Niedersachsen,
        FederalState::MecklenburgVorpommern,
    ),
    (FederalState::Niedersachsen, FederalState::Brandenburg),
    (FederalState::Niedersachsen, FederalState::SachsenAnhalt),
    (FederalState::Niedersachsen, FederalState::Thueringen),
    (FederalState::Niedersachsen, FederalState::Hessen),
    (FederalState::Niedersachsen, FederalState::NordrheinWestfalen),
    (
        FederalState::MecklenburgVorpommern,
        FederalState::Brandenburg,
    ),
    (FederalState::Brandenburg, FederalState::Berlin),
    (FederalState::Brandenburg, FederalState::SachsenAnhalt),
    (FederalState::Brandenburg, FederalState::Sachsen),
    (FederalState::SachsenAnhalt, FederalState::Sachsen),
    (FederalState::SachsenAnhalt, FederalState::Thueringen),
    (FederalState::Sachsen, FederalState::Thueringen),
    (FederalState::Sachsen, FederalState::Bayern),
    (FederalState::Thueringen, FederalState::Hessen),
    (FederalState::Thueringen, FederalState::Bayern),
    (FederalState::Hessen, FederalState::NordrheinWestfalen),
    (FederalState::Hessen, FederalState::RheinlandPfalz),
    (FederalState::Hessen, FederalState::BadenWuerttemberg),
    (FederalState::Hessen, FederalState::Bayern),
    (
        FederalState::NordrheinWestfalen,
        FederalState::RheinlandPfalz,
    ),
    (FederalState::RheinlandPfalz, FederalState::Saarland),
    (
        FederalState::RheinlandPfalz,
        FederalState::BadenWuerttemberg,
    ),
    (FederalState::BadenWuerttemberg, FederalState::Bayern),
];

/// Proximity score for a pair of federal states, in [0, 100].
///
/// 100 means the same state; otherwise the score falls off with the
/// number of state borders between the two. Symmetric, and total over
/// all pairs of valid states.
pub fn state_distance(a: FederalState, b: FederalState) -> u8 {
    match border_hops(a, b) {
        0 => 100,
        1 => 75,
        2 => 55,
        3 => 35,
        4 => 20,
        _ => 10,
    }
}

/// Shortest number of borders to cross between two states, via
/// breadth-first search over the adjacency list. The state graph is
/// connected, so every pair has a finite hop count.
fn border_hops(from: FederalState, to: FederalState) -> u8 {
    if from == to {
        return 0;
    }

    let mut hops = [None::<u8>; 16];
    hops[from as usize] = Some(0);
    let mut frontier = vec![from];

    while let Some(state) = frontier.pop() {
        let depth = hops[state as usize].unwrap_or(0);
        for next in neighbors(state) {
            if hops[next as usize].is_none() {
                if next == to {
                    return depth + 1;
                }
                hops[next as usize] = Some(depth + 1);
                frontier.insert(0, next);
            }
        }
    }

    u8::MAX
}

fn neighbors(state: FederalState) -> impl Iterator<Item = FederalState> {
    BORDERS.iter().filter_map(move |&(a, b)| {
        if a == state {
            Some(b)
        } else if b == state {
            Some(a)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_state_scores_100() {
        for state in FederalState::ALL {
            assert_eq!(state_distance(state, state), 100);
        }
    }

    #[test]
    fn distance_is_symmetric_over_all_pairs() {
        for a in FederalState::ALL {
            for b in FederalState::ALL {
                assert_eq!(
                    state_distance(a, b),
                    state_distance(b, a),
                    "asymmetric for {a:?} / {b:?}"
                );
            }
        }
    }

    #[test]
    fn distance_is_total_and_in_range() {
        for a in FederalState::ALL {
            for b in FederalState::ALL {
                let score = state_distance(a, b);
                assert!(score >= 10 && score <= 100);
            }
        }
    }

    #[test]
    fn bordering_states_score_75() {
        assert_eq!(
            state_distance(FederalState::Berlin, FederalState::Brandenburg),
            75
        );
        assert_eq!(
            state_distance(FederalState::Bayern, FederalState::BadenWuerttemberg),
            75
        );
    }

    #[test]
    fn far_apart_states_score_low() {
        // Saarland to Mecklenburg-Vorpommern crosses at least four borders
        let score = state_distance(
            FederalState::Saarland,
            FederalState::MecklenburgVorpommern,
        );
        assert!(score <= 20, "expected a low score, got {score}");
    }

    #[test]
    fn state_graph_is_connected() {
        for a in FederalState::ALL {
            for b in FederalState::ALL {
                assert!(border_hops(a, b) < 16, "no path {a:?} -> {b:?}");
            }
        }
    }
}
