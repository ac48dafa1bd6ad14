mod category;
mod deal;
mod deal_image;
mod user;
mod vote;

pub use category::{order_for_display, Category, CategoryWithDeals};
pub use deal::{format_posted_date, Deal, DealDraft, DealWithDetails};
pub use deal_image::DealImage;
pub use user::UserProfile;
pub use vote::{VoteDirection, VoteOutcome, VoteState};
