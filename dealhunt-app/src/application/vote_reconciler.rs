use crate::domain::{VoteDirection, VoteOutcome, VoteState};
use dashmap::DashMap;
use dealhunt_errors::AppError;
use std::sync::Arc;
use uuid::Uuid;

/// Capability the hosting shell injects: who is signed in, and a fresh
/// bearer token for them. The token is requested lazily at the moment a
/// vote is attempted and never cached here.
#[allow(async_fn_in_trait)]
pub trait AuthSession {
    fn current_user_id(&self) -> Option<String>;
    async fn bearer_token(&self) -> Result<String, AppError>;
}

/// The backend's vote mutation endpoint: records, clears or flips the
/// caller's vote on a deal and reports which of the three it did.
#[allow(async_fn_in_trait)]
pub trait DealVoteApi {
    async fn submit_vote(
        &self,
        deal_id: Uuid,
        direction: VoteDirection,
        bearer: &str,
    ) -> Result<VoteOutcome, AppError>;
}

impl<T: AuthSession + ?Sized> AuthSession for Arc<T> {
    fn current_user_id(&self) -> Option<String> {
        (**self).current_user_id()
    }

    async fn bearer_token(&self) -> Result<String, AppError> {
        (**self).bearer_token().await
    }
}

impl<T: DealVoteApi + ?Sized> DealVoteApi for Arc<T> {
    async fn submit_vote(
        &self,
        deal_id: Uuid,
        direction: VoteDirection,
        bearer: &str,
    ) -> Result<VoteOutcome, AppError> {
        (**self).submit_vote(deal_id, direction, bearer).await
    }
}

struct VoteWidget {
    state: VoteState,
    submitting: bool,
}

/// Per-deal vote state, kept consistent with the server by applying the
/// outcome delta of each confirmed vote. The displayed tally never moves
/// until the server has answered, so there is no rollback path; a failed
/// call leaves state exactly as it was.
///
/// One submission per deal may be in flight at a time. Calls arriving
/// while one is airborne are discarded, which keeps rapid double-clicks
/// from double-counting and makes response reordering impossible.
pub struct VoteReconciler<S, A> {
    session: S,
    api: A,
    widgets: DashMap<Uuid, VoteWidget>,
}

impl<S: AuthSession, A: DealVoteApi> VoteReconciler<S, A> {
    pub fn new(session: S, api: A) -> Self {
        Self {
            session,
            api,
            widgets: DashMap::new(),
        }
    }

    /// Start tracking a deal's vote pair, typically right after the deal
    /// is fetched. Re-tracking refreshes the pair from the server copy
    /// without disturbing an in-flight submission.
    pub fn track(&self, deal_id: Uuid, state: VoteState) {
        self.widgets
            .entry(deal_id)
            .and_modify(|w| w.state = state)
            .or_insert(VoteWidget {
                state,
                submitting: false,
            });
    }

    /// Stop tracking a deal (its view unmounted). A response still in
    /// flight for it will be discarded, not applied.
    pub fn release(&self, deal_id: Uuid) {
        self.widgets.remove(&deal_id);
    }

    /// The `(tally, user direction)` pair the view renders.
    pub fn state(&self, deal_id: Uuid) -> Option<VoteState> {
        self.widgets.get(&deal_id).map(|w| w.state)
    }

    /// Cast, clear or flip the current user's vote on a deal.
    ///
    /// Returns the reconciled state on success, `Ok(None)` when the call
    /// was discarded (a submission for this deal was already in flight,
    /// or the deal was released before the response landed), and an error
    /// otherwise. `Unauthenticated` is signalled without touching the
    /// network; `VoteFailed`/`MalformedResponse` leave state untouched.
    pub async fn request_vote(
        &self,
        deal_id: Uuid,
        direction: VoteDirection,
    ) -> Result<Option<VoteState>, AppError> {
        if self.session.current_user_id().is_none() {
            return Err(AppError::Unauthenticated);
        }

        {
            let mut widget = self
                .widgets
                .get_mut(&deal_id)
                .ok_or(AppError::DealNotFound)?;
            if widget.submitting {
                tracing::debug!("vote on {} ignored, submission in flight", deal_id);
                return Ok(None);
            }
            widget.submitting = true;
            // Guard dropped here; the map must not be held across awaits.
        }

        let result = self.submit(deal_id, direction).await;

        let Some(mut widget) = self.widgets.get_mut(&deal_id) else {
            tracing::debug!("vote response for released deal {} dropped", deal_id);
            return Ok(None);
        };
        widget.submitting = false;

        match result {
            Ok(outcome) => {
                widget.state.apply(direction, outcome);
                Ok(Some(widget.state))
            }
            Err(err) => Err(err),
        }
    }

    async fn submit(
        &self,
        deal_id: Uuid,
        direction: VoteDirection,
    ) -> Result<VoteOutcome, AppError> {
        let token = self.session.bearer_token().await.map_err(|e| match e {
            AppError::Unauthenticated => AppError::Unauthenticated,
            other => AppError::VoteFailed(other.to_string()),
        })?;

        self.api
            .submit_vote(deal_id, direction, &token)
            .await
            .map_err(|e| match e {
                e @ (AppError::VoteFailed(_)
                | AppError::MalformedResponse(_)
                | AppError::Unauthenticated) => e,
                other => AppError::VoteFailed(other.to_string()),
            })
    }
}
