//! Canned articles served when no real store can answer.

use chrono::{DateTime, Duration, TimeZone, Utc};
use lazy_static::lazy_static;
use nt_core::{Article, Category, Importance, Sentiment};

/// 2024-06-02T06:00:00Z
const DEMO_EPOCH: i64 = 1_717_308_000;

struct DemoEntry {
    category: Category,
    title: &'static str,
    description: &'static str,
    source: &'static str,
    hours_before_epoch: i64,
    summary: [&'static str; 3],
    sentiment: Sentiment,
    importance: Importance,
}

const ENTRIES: &[DemoEntry] = &[
    DemoEntry {
        category: Category::Farming,
        title: "Negev growers expand drip irrigation to new date orchards",
        description: "Cooperatives in the Arava report higher yields after switching to sensor-driven irrigation.",
        source: "Demo Agriculture Desk",
        hours_before_epoch: 2,
        summary: [
            "Arava cooperatives extend drip irrigation to 400 new dunams",
            "Soil moisture sensors cut water use by roughly a fifth",
            "Growers expect the first full harvest next season",
        ],
        sentiment: Sentiment::Positive,
        importance: Importance::Medium,
    },
    DemoEntry {
        category: Category::Farming,
        title: "Heatwave warning issued for northern vegetable farms",
        description: "The agriculture ministry advises growers in the Galilee to adjust harvest schedules.",
        source: "Demo Agriculture Desk",
        hours_before_epoch: 9,
        summary: [
            "Temperatures expected above 40°C for three days",
            "Growers advised to harvest at night where possible",
            "Ministry hotline opened for crop damage reports",
        ],
        sentiment: Sentiment::Negative,
        importance: Importance::High,
    },
    DemoEntry {
        category: Category::Farming,
        title: "Vertical farming pilot opens near Tel Aviv",
        description: "A hydroponic facility begins supplying leafy greens to local supermarkets.",
        source: "Demo Agriculture Desk",
        hours_before_epoch: 30,
        summary: [
            "Hydroponic towers produce greens year round",
            "First deliveries go to twelve supermarket branches",
            "Operators plan a second site by the end of the year",
        ],
        sentiment: Sentiment::Neutral,
        importance: Importance::Low,
    },
    DemoEntry {
        category: Category::Tech,
        title: "Cybersecurity startup closes Series B round",
        description: "The Herzliya company will use the funding to grow its cloud detection team.",
        source: "Demo Tech Desk",
        hours_before_epoch: 1,
        summary: [
            "Round led by two international venture funds",
            "Headcount expected to double within eighteen months",
            "Product focuses on cloud workload threat detection",
        ],
        sentiment: Sentiment::Positive,
        importance: Importance::High,
    },
    DemoEntry {
        category: Category::Tech,
        title: "Chip design center announces new Haifa campus",
        description: "The expansion adds space for several hundred engineers.",
        source: "Demo Tech Desk",
        hours_before_epoch: 7,
        summary: [
            "Campus to open in phases starting next spring",
            "Hiring concentrated on hardware verification roles",
            "Local universities partner on internship programs",
        ],
        sentiment: Sentiment::Positive,
        importance: Importance::Medium,
    },
    DemoEntry {
        category: Category::Tech,
        title: "Regulator publishes draft rules for AI in healthcare",
        description: "Public comment is open for sixty days on the proposed framework.",
        source: "Demo Tech Desk",
        hours_before_epoch: 26,
        summary: [
            "Draft requires clinical validation for diagnostic models",
            "Hospitals must log model versions used in care decisions",
            "Industry groups ask for a longer transition period",
        ],
        sentiment: Sentiment::Neutral,
        importance: Importance::Medium,
    },
    DemoEntry {
        category: Category::Politics,
        title: "Coalition partners agree on budget framework",
        description: "The agreement clears the way for a first reading in the Knesset next week.",
        source: "Demo Politics Desk",
        hours_before_epoch: 3,
        summary: [
            "Framework sets spending ceilings for the next two years",
            "Defense and education receive the largest increases",
            "Opposition plans to challenge several clauses in committee",
        ],
        sentiment: Sentiment::Neutral,
        importance: Importance::High,
    },
    DemoEntry {
        category: Category::Politics,
        title: "Municipal election turnout hits record low",
        description: "Analysts point to voter fatigue after a long national campaign season.",
        source: "Demo Politics Desk",
        hours_before_epoch: 20,
        summary: [
            "Turnout fell below forty percent in several large cities",
            "Younger voters were least likely to participate",
            "Parties call for reforms to local election timing",
        ],
        sentiment: Sentiment::Negative,
        importance: Importance::Medium,
    },
    DemoEntry {
        category: Category::Politics,
        title: "New transparency portal lists ministry spending",
        description: "Citizens can now browse procurement contracts above a set threshold.",
        source: "Demo Politics Desk",
        hours_before_epoch: 40,
        summary: [
            "Portal covers contracts signed since January",
            "Data can be downloaded in open formats",
            "Watchdog groups welcome the move",
        ],
        sentiment: Sentiment::Positive,
        importance: Importance::Low,
    },
    DemoEntry {
        category: Category::Hospitality,
        title: "Eilat hotels report strong summer bookings",
        description: "Occupancy forecasts exceed last year's figures as new flight routes open.",
        source: "Demo Hospitality Desk",
        hours_before_epoch: 4,
        summary: [
            "Average occupancy forecast above eighty percent",
            "Two new European routes land at Ramon airport",
            "Hotels are hiring seasonal staff earlier than usual",
        ],
        sentiment: Sentiment::Positive,
        importance: Importance::Medium,
    },
    DemoEntry {
        category: Category::Hospitality,
        title: "Jerusalem restaurants adopt shared reservation platform",
        description: "More than a hundred venues join a citywide booking system.",
        source: "Demo Hospitality Desk",
        hours_before_epoch: 15,
        summary: [
            "Platform lets diners compare availability across venues",
            "No-show fees introduced at participating restaurants",
            "Tourism office promotes the service to visitors",
        ],
        sentiment: Sentiment::Neutral,
        importance: Importance::Low,
    },
    DemoEntry {
        category: Category::Hospitality,
        title: "Staff shortages persist across hotel industry",
        description: "The hotel association asks for expanded work visa quotas.",
        source: "Demo Hospitality Desk",
        hours_before_epoch: 33,
        summary: [
            "Association estimates thousands of unfilled positions",
            "Housekeeping and kitchen roles hardest to staff",
            "Government reviewing quota request",
        ],
        sentiment: Sentiment::Negative,
        importance: Importance::High,
    },
    DemoEntry {
        category: Category::General,
        title: "Light rail line extends service hours on weekends",
        description: "The transit authority adds late-night trains on Thursday and Saturday.",
        source: "Demo News Desk",
        hours_before_epoch: 5,
        summary: [
            "Trains run until 2 a.m. on selected nights",
            "Pilot will be reviewed after three months",
            "Bus connections adjusted to match new timetable",
        ],
        sentiment: Sentiment::Positive,
        importance: Importance::Low,
    },
    DemoEntry {
        category: Category::General,
        title: "Coastal cleanup draws thousands of volunteers",
        description: "Beaches from Nahariya to Ashkelon were cleared in a single morning.",
        source: "Demo News Desk",
        hours_before_epoch: 22,
        summary: [
            "Volunteers collected several tonnes of plastic",
            "Schools and companies organized their own teams",
            "Organizers plan a second cleanup in the autumn",
        ],
        sentiment: Sentiment::Positive,
        importance: Importance::Low,
    },
];

fn slug(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn build() -> Vec<Article> {
    let epoch: DateTime<Utc> = Utc.timestamp_opt(DEMO_EPOCH, 0).single().unwrap_or_default();
    let mut articles = ENTRIES
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let slug = slug(entry.title);
            Article {
                id: format!("demo-{}-{}", entry.category, i + 1),
                external_id: None,
                title: entry.title.to_string(),
                description: Some(entry.description.to_string()),
                content: None,
                url: format!("https://demo.invalid/{}/{}", entry.category, slug),
                image_url: None,
                published_at: epoch - Duration::hours(entry.hours_before_epoch),
                source: entry.source.to_string(),
                category: entry.category,
                summary: entry.summary.iter().map(|s| s.to_string()).collect(),
                sentiment: entry.sentiment,
                importance: entry.importance,
            }
        })
        .collect::<Vec<_>>();
    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    articles
}

lazy_static! {
    static ref DEMO_ARTICLES: Vec<Article> = build();
}

/// Demo listing for `category`, newest first, cut to `limit`. There is no
/// offset: every page of demo data is the same head slice.
pub fn demo_articles(category: Category, limit: usize) -> Vec<Article> {
    DEMO_ARTICLES
        .iter()
        .filter(|article| category.admits(article.category))
        .take(limit)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_demo_content() {
        for category in Category::ALL {
            let articles = demo_articles(category, 20);
            assert!(!articles.is_empty(), "no demo data for {}", category);
            assert!(articles.iter().all(|a| category.admits(a.category)));
            assert!(articles.windows(2).all(|w| w[0].published_at >= w[1].published_at));
        }
    }

    #[test]
    fn test_demo_respects_limit() {
        assert_eq!(demo_articles(Category::General, 4).len(), 4);
        assert_eq!(demo_articles(Category::General, 100).len(), ENTRIES.len());
        assert!(demo_articles(Category::Tech, 0).is_empty());
    }

    #[test]
    fn test_demo_urls_are_unique() {
        let mut urls = demo_articles(Category::General, 100)
            .into_iter()
            .map(|a| a.url)
            .collect::<Vec<_>>();
        urls.sort();
        urls.dedup();
        assert_eq!(urls.len(), ENTRIES.len());
    }
}
