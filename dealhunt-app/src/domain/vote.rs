use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Contribution of one vote in this direction to a deal's net tally.
    pub fn signum(self) -> i32 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}

/// What the server did with a vote request, as reported by the vote
/// endpoint's `action` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteOutcome {
    /// No prior vote existed; the requested direction is now recorded.
    Added,
    /// A vote in the requested direction existed and was cleared.
    Removed,
    /// A vote in the opposite direction was flipped to the requested one.
    Updated,
}

/// A deal's vote tally paired with the current user's own vote, as last
/// confirmed by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteState {
    pub net_votes: i32,
    pub user_vote: Option<VoteDirection>,
}

impl VoteState {
    pub fn new(net_votes: i32, user_vote: Option<VoteDirection>) -> Self {
        Self {
            net_votes,
            user_vote,
        }
    }

    /// Apply the server-confirmed outcome of a vote in `direction`. The
    /// tally only ever moves by the outcome's delta; it is never
    /// recomputed from scratch.
    pub fn apply(&mut self, direction: VoteDirection, outcome: VoteOutcome) {
        match outcome {
            VoteOutcome::Added => {
                self.net_votes += direction.signum();
                self.user_vote = Some(direction);
            }
            VoteOutcome::Removed => {
                self.net_votes -= direction.signum();
                self.user_vote = None;
            }
            VoteOutcome::Updated => {
                self.net_votes += 2 * direction.signum();
                self.user_vote = Some(direction);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_added_moves_tally_toward_direction() {
        let mut state = VoteState::new(10, None);
        state.apply(VoteDirection::Up, VoteOutcome::Added);
        assert_eq!(state, VoteState::new(11, Some(VoteDirection::Up)));

        let mut state = VoteState::new(10, None);
        state.apply(VoteDirection::Down, VoteOutcome::Added);
        assert_eq!(state, VoteState::new(9, Some(VoteDirection::Down)));
    }

    #[test]
    fn test_removed_undoes_a_prior_vote() {
        let mut state = VoteState::new(11, Some(VoteDirection::Up));
        state.apply(VoteDirection::Up, VoteOutcome::Removed);
        assert_eq!(state, VoteState::new(10, None));

        let mut state = VoteState::new(9, Some(VoteDirection::Down));
        state.apply(VoteDirection::Down, VoteOutcome::Removed);
        assert_eq!(state, VoteState::new(10, None));
    }

    #[test]
    fn test_updated_flips_by_two() {
        let mut state = VoteState::new(5, Some(VoteDirection::Down));
        state.apply(VoteDirection::Up, VoteOutcome::Updated);
        assert_eq!(state, VoteState::new(7, Some(VoteDirection::Up)));

        let mut state = VoteState::new(5, Some(VoteDirection::Up));
        state.apply(VoteDirection::Down, VoteOutcome::Updated);
        assert_eq!(state, VoteState::new(3, Some(VoteDirection::Down)));
    }

    #[test]
    fn test_toggle_round_trip_restores_initial_state() {
        let mut state = VoteState::new(10, None);
        state.apply(VoteDirection::Up, VoteOutcome::Added);
        assert_eq!(state, VoteState::new(11, Some(VoteDirection::Up)));
        state.apply(VoteDirection::Up, VoteOutcome::Removed);
        assert_eq!(state, VoteState::new(10, None));
    }

    #[test]
    fn test_wire_encoding() {
        assert_eq!(
            serde_json::to_string(&VoteDirection::Up).unwrap(),
            "\"up\""
        );
        let outcome: VoteOutcome = serde_json::from_str("\"updated\"").unwrap();
        assert_eq!(outcome, VoteOutcome::Updated);
    }
}
