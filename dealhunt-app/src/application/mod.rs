mod accounts;
mod deal_feed;
mod submit_deal;
mod vote_reconciler;

pub use accounts::{Accounts, EmailStep};
pub use deal_feed::{arrange, DealFeed, FeedSort};
pub use submit_deal::SubmitDeal;
pub use vote_reconciler::{AuthSession, DealVoteApi, VoteReconciler};
