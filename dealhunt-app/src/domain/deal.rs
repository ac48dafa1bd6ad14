use super::deal_image::DealImage;
use super::vote::{VoteDirection, VoteState};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Deals above this net-vote count get the "hot" treatment in the feed.
const HOT_THRESHOLD: i32 = 100;

/// A deal as it appears in list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deal {
    pub deal_id: uuid::Uuid,
    pub title: String,
    pub description: Option<String>,
    pub deal_url: String,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
    pub category_name: Option<String>,
    pub username: Option<String>,
    pub net_votes: i32,
    pub primary_image_url: Option<String>,
    pub is_active: Option<bool>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Deal {
    /// Merchant label derived from the deal link: host without the `www.`
    /// prefix, first label only ("shopee.com.my" -> "shopee").
    pub fn merchant(&self) -> Option<String> {
        let parsed = url::Url::parse(&self.deal_url).ok()?;
        let host = parsed.host_str()?;
        let host = host.strip_prefix("www.").unwrap_or(host);
        host.split('.').next().map(str::to_string)
    }

    /// Rounded percentage off the original price, when both prices are
    /// present and the deal is actually cheaper.
    pub fn discount_percent(&self) -> Option<i32> {
        let price = self.price?;
        let original = self.original_price?;
        if original <= price || original <= 0.0 {
            return None;
        }
        Some(((original - price) / original * 100.0).round() as i32)
    }

    pub fn is_hot(&self) -> bool {
        self.net_votes > HOT_THRESHOLD
    }

    /// Deals are soft-deleted; an absent flag means active.
    pub fn is_inactive(&self) -> bool {
        self.is_active == Some(false)
    }

    /// Relative age label: "3h ago" within the first day, then a short
    /// date ("17th Jun").
    pub fn posted_ago(&self, now: chrono::DateTime<chrono::Utc>) -> String {
        let Some(created) = self.created_at else {
            return String::new();
        };
        let hours = (now - created).num_hours();
        if hours < 24 {
            format!("{}h ago", hours.max(0))
        } else {
            let day = created.day();
            format!("{}{} {}", day, ordinal_suffix(day), created.format("%b"))
        }
    }

    /// Free-text search over title, description and poster name.
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return false;
        }
        let contains = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|v| v.to_lowercase().contains(&q))
        };
        self.title.to_lowercase().contains(&q)
            || contains(&self.description)
            || contains(&self.username)
    }
}

/// A deal with everything the deal page needs: the viewer's own vote,
/// the image gallery and poster details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealWithDetails {
    pub deal_id: uuid::Uuid,
    pub title: String,
    pub description: Option<String>,
    pub deal_url: String,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
    pub category_name: Option<String>,
    pub net_votes: i32,
    pub user_vote: Option<VoteDirection>,
    #[serde(default)]
    pub images: Vec<DealImage>,
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub profile_pic: Option<String>,
    pub user_created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub user_total_likes: Option<i32>,
    pub is_active: Option<bool>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl DealWithDetails {
    /// The pair the vote reconciler tracks for this deal.
    pub fn vote_state(&self) -> VoteState {
        VoteState::new(self.net_votes, self.user_vote)
    }

    /// Whether `uid` is the poster; gates the edit/remove affordances.
    pub fn is_posted_by(&self, uid: &str) -> bool {
        self.user_id.as_deref() == Some(uid)
    }

    pub fn is_inactive(&self) -> bool {
        self.is_active == Some(false)
    }
}

/// Outgoing create/update payload assembled by the post-deal form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealDraft {
    pub deal_url: String,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
    pub category_name: Option<String>,
}

impl DealDraft {
    pub fn new(deal_url: String, title: String) -> Self {
        Self {
            deal_url,
            title,
            description: None,
            price: None,
            original_price: None,
            category_name: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_price(mut self, price: Option<f64>) -> Self {
        self.price = price;
        self
    }

    pub fn with_original_price(mut self, original_price: Option<f64>) -> Self {
        self.original_price = original_price;
        self
    }

    pub fn with_category(mut self, category_name: Option<String>) -> Self {
        self.category_name = category_name;
        self
    }
}

/// Long-form posted date, e.g. "17th Jun 25".
pub fn format_posted_date(date: chrono::DateTime<chrono::Utc>) -> String {
    let day = date.day();
    format!(
        "{}{} {} {}",
        day,
        ordinal_suffix(day),
        date.format("%b"),
        date.format("%y")
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    if (4..=20).contains(&day) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn sample_deal() -> Deal {
        Deal {
            deal_id: uuid::Uuid::new_v4(),
            title: "Wireless earbuds".to_string(),
            description: Some("Half price this week".to_string()),
            deal_url: "https://www.shopee.com.my/product/123".to_string(),
            price: Some(50.0),
            original_price: Some(100.0),
            category_name: Some("Electronics".to_string()),
            username: Some("dealfinder".to_string()),
            net_votes: 42,
            primary_image_url: None,
            is_active: None,
            created_at: Some(Utc.with_ymd_and_hms(2025, 6, 17, 12, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_merchant_strips_www_and_tld() {
        assert_eq!(sample_deal().merchant(), Some("shopee".to_string()));

        let mut deal = sample_deal();
        deal.deal_url = "not a url".to_string();
        assert_eq!(deal.merchant(), None);
    }

    #[test]
    fn test_discount_percent() {
        assert_eq!(sample_deal().discount_percent(), Some(50));

        let mut deal = sample_deal();
        deal.original_price = Some(40.0);
        assert_eq!(deal.discount_percent(), None);

        deal.original_price = None;
        assert_eq!(deal.discount_percent(), None);
    }

    #[test]
    fn test_posted_ago_recent_and_old() {
        let deal = sample_deal();
        let created = deal.created_at.unwrap();

        assert_eq!(deal.posted_ago(created + Duration::hours(3)), "3h ago");
        assert_eq!(deal.posted_ago(created + Duration::days(4)), "17th Jun");
    }

    #[test]
    fn test_matches_query() {
        let deal = sample_deal();
        assert!(deal.matches_query("EARBUDS"));
        assert!(deal.matches_query("half price"));
        assert!(deal.matches_query("dealfinder"));
        assert!(!deal.matches_query("laptop"));
        assert!(!deal.matches_query("   "));
    }

    #[test]
    fn test_format_posted_date() {
        let date = Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap();
        assert_eq!(format_posted_date(date), "2nd Jun 25");

        let date = Utc.with_ymd_and_hms(2025, 1, 11, 0, 0, 0).unwrap();
        assert_eq!(format_posted_date(date), "11th Jan 25");
    }

    #[test]
    fn test_hot_threshold() {
        let mut deal = sample_deal();
        assert!(!deal.is_hot());
        deal.net_votes = 101;
        assert!(deal.is_hot());
    }
}
