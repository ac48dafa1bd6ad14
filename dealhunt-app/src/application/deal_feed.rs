use crate::domain::{order_for_display, CategoryWithDeals, Deal};
use crate::infrastructure::api::DealsApiClient;
use chrono::{DateTime, Utc};
use dealhunt_errors::AppError;
use std::sync::Arc;

/// Deals older than this fall off the Trending tab.
const TRENDING_WINDOW_HOURS: i64 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSort {
    Hottest,
    Trending,
    Newest,
}

/// Front-page data: the deal list with primary images resolved, category
/// browsing and free-text search.
pub struct DealFeed {
    api: Arc<DealsApiClient>,
}

impl DealFeed {
    pub fn new(api: Arc<DealsApiClient>) -> Self {
        Self { api }
    }

    /// Load the feed: deals by net votes descending, each deal's primary
    /// image taken from the first gallery entry when one exists.
    pub async fn load(&self) -> Result<Vec<Deal>, AppError> {
        let mut deals = self.api.fetch_deals().await?;
        deals.sort_by(|a, b| b.net_votes.cmp(&a.net_votes));

        let galleries = futures::future::join_all(
            deals
                .iter()
                .map(|deal| self.api.fetch_deal_images(deal.deal_id)),
        )
        .await;

        for (deal, gallery) in deals.iter_mut().zip(galleries) {
            match gallery {
                Ok(images) => {
                    if let Some(first) = images.first() {
                        deal.primary_image_url = Some(first.image_url.clone());
                    }
                }
                // A missing gallery never blocks the feed.
                Err(err) => tracing::debug!("no gallery for {}: {}", deal.deal_id, err),
            }
        }

        Ok(deals)
    }

    pub async fn load_categories(&self) -> Result<Vec<CategoryWithDeals>, AppError> {
        let categories = self.api.fetch_categories_with_deals().await?;
        Ok(order_for_display(categories))
    }

    /// Free-text search; a blank query yields nothing rather than the
    /// whole feed.
    pub async fn search(&self, query: &str) -> Result<Vec<Deal>, AppError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let deals = self.api.fetch_deals().await?;
        Ok(deals
            .into_iter()
            .filter(|deal| deal.matches_query(query))
            .collect())
    }
}

/// Pure ordering for the feed tabs.
pub fn arrange(mut deals: Vec<Deal>, sort: FeedSort, now: DateTime<Utc>) -> Vec<Deal> {
    match sort {
        FeedSort::Hottest => deals.sort_by(|a, b| b.net_votes.cmp(&a.net_votes)),
        FeedSort::Trending => {
            deals.retain(|deal| {
                deal.created_at
                    .is_some_and(|created| (now - created).num_hours() <= TRENDING_WINDOW_HOURS)
            });
            deals.sort_by(|a, b| b.net_votes.cmp(&a.net_votes));
        }
        FeedSort::Newest => deals.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
    deals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn deal(title: &str, net_votes: i32, hours_old: i64, now: DateTime<Utc>) -> Deal {
        Deal {
            deal_id: uuid::Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            deal_url: "https://example.com/deal".to_string(),
            price: None,
            original_price: None,
            category_name: None,
            username: None,
            net_votes,
            primary_image_url: None,
            is_active: None,
            created_at: Some(now - Duration::hours(hours_old)),
        }
    }

    fn titles(deals: &[Deal]) -> Vec<&str> {
        deals.iter().map(|d| d.title.as_str()).collect()
    }

    #[test]
    fn test_hottest_orders_by_net_votes() {
        let now = Utc::now();
        let arranged = arrange(
            vec![deal("b", 5, 1, now), deal("a", 50, 2, now), deal("c", 20, 3, now)],
            FeedSort::Hottest,
            now,
        );
        assert_eq!(titles(&arranged), ["a", "c", "b"]);
    }

    #[test]
    fn test_trending_keeps_only_the_recent_window() {
        let now = Utc::now();
        let arranged = arrange(
            vec![
                deal("fresh-low", 5, 1, now),
                deal("stale-high", 500, 12, now),
                deal("fresh-high", 50, 2, now),
            ],
            FeedSort::Trending,
            now,
        );
        assert_eq!(titles(&arranged), ["fresh-high", "fresh-low"]);
    }

    #[test]
    fn test_newest_orders_by_created_at() {
        let now = Utc::now();
        let arranged = arrange(
            vec![deal("old", 99, 30, now), deal("new", 1, 1, now), deal("mid", 7, 10, now)],
            FeedSort::Newest,
            now,
        );
        assert_eq!(titles(&arranged), ["new", "mid", "old"]);
    }
}
