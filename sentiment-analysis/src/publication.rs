//! Descriptive statistics of a news set

use std::collections::BTreeMap;

use chrono::{Datelike, Weekday};
use common::{IndexMap, NaiveDate};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::articles::NewsArticle;
use crate::keywords::{top_bigrams, top_keywords};

/// Summary of headline lengths in characters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LengthSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` below two headlines
    pub std_dev: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl LengthSummary {
    pub fn from_lengths(lengths: &[usize]) -> Option<Self> {
        if lengths.is_empty() {
            return None;
        }

        let mut sorted: Vec<f64> = lengths.iter().map(|l| *l as f64).collect();
        sorted.sort_by(f64::total_cmp);

        let std_dev = (sorted.len() > 1).then(|| sorted.iter().std_dev());
        Some(Self {
            count: sorted.len(),
            mean: sorted.iter().mean(),
            std_dev,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Linear interpolation between closest ranks of sorted, non-empty data
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
}

/// Publication activity of a set of articles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationStats {
    pub total_articles: usize,
    pub headline_length: Option<LengthSummary>,
    /// Most active publishers, highest count first
    pub top_publishers: Vec<(String, usize)>,
    pub per_date: BTreeMap<NaiveDate, usize>,
    /// Monday through Sunday, days without articles included
    pub per_weekday: Vec<(Weekday, usize)>,
    /// Hour of day in the publisher's clock
    pub per_hour: BTreeMap<u32, usize>,
    pub top_keywords: Vec<(String, usize)>,
    pub top_bigrams: Vec<(String, usize)>,
}

impl PublicationStats {
    pub fn from_articles(articles: &[NewsArticle], top_n: usize) -> Self {
        let lengths: Vec<usize> = articles.iter().filter_map(NewsArticle::headline_length).collect();
        let headlines = || articles.iter().filter_map(|a| a.headline.as_deref());

        let mut publishers: IndexMap<&str, usize> = IndexMap::new();
        for publisher in articles.iter().filter_map(|a| a.publisher.as_deref()) {
            *publishers.entry(publisher).or_insert(0) += 1;
        }
        let mut top_publishers: Vec<(String, usize)> = publishers
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        // stable sort keeps first-seen order among ties
        top_publishers.sort_by(|a, b| b.1.cmp(&a.1));
        top_publishers.truncate(top_n);

        let mut per_date = BTreeMap::new();
        let mut weekday_counts = [0usize; 7];
        let mut per_hour = BTreeMap::new();
        for published in articles.iter().filter_map(|a| a.published_at.as_ref()) {
            if let Some(date) = published.calendar_date() {
                *per_date.entry(date).or_insert(0) += 1;
                weekday_counts[date.weekday().num_days_from_monday() as usize] += 1;
            }
            if let Some(hour) = published.hour() {
                *per_hour.entry(hour).or_insert(0) += 1;
            }
        }

        let mut day = Weekday::Mon;
        let mut per_weekday = Vec::with_capacity(7);
        for count in weekday_counts {
            per_weekday.push((day, count));
            day = day.succ();
        }

        Self {
            total_articles: articles.len(),
            headline_length: LengthSummary::from_lengths(&lengths),
            top_publishers,
            per_date,
            per_weekday,
            per_hour,
            top_keywords: top_keywords(headlines(), top_n),
            top_bigrams: top_bigrams(headlines(), top_n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDateTime};
    use common::PublishedAt;

    fn article(headline: &str, when: &str, publisher: &str) -> NewsArticle {
        let naive = NaiveDateTime::parse_from_str(when, "%Y-%m-%d %H:%M:%S").unwrap();
        NewsArticle::new(headline, PublishedAt::Naive(naive), "AAPL").with_publisher(publisher)
    }

    #[test]
    fn test_length_summary_matches_describe() {
        let summary = LengthSummary::from_lengths(&[10, 20, 30, 40]).unwrap();
        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean, 25.0);
        assert_eq!(summary.min, 10.0);
        assert_eq!(summary.q25, 17.5);
        assert_eq!(summary.median, 25.0);
        assert_eq!(summary.q75, 32.5);
        assert_eq!(summary.max, 40.0);
        assert!((summary.std_dev.unwrap() - 12.909944487358056).abs() < 1e-9);

        let single = LengthSummary::from_lengths(&[7]).unwrap();
        assert_eq!(single.std_dev, None);
        assert_eq!(single.median, 7.0);
        assert!(LengthSummary::from_lengths(&[]).is_none());
    }

    #[test]
    fn test_publication_counts() {
        let articles = vec![
            article("a", "2024-01-01 09:15:00", "Reuters"),
            article("bb", "2024-01-01 14:00:00", "Benzinga"),
            article("ccc", "2024-01-03 09:45:00", "Benzinga"),
            NewsArticle::new(
                "dddd",
                PublishedAt::Zoned(DateTime::parse_from_rfc3339("2024-01-06T22:00:00-05:00").unwrap()),
                "MSFT",
            ),
        ];
        let stats = PublicationStats::from_articles(&articles, 1);

        assert_eq!(stats.total_articles, 4);
        assert_eq!(stats.top_publishers, vec![("Benzinga".to_string(), 2)]);
        assert_eq!(stats.per_date.len(), 3);
        assert_eq!(stats.per_hour.get(&9), Some(&2));
        assert_eq!(stats.per_hour.get(&22), Some(&1));

        // 2024-01-01 is a Monday, 2024-01-06 a Saturday
        assert_eq!(stats.per_weekday.len(), 7);
        assert_eq!(stats.per_weekday[0], (Weekday::Mon, 2));
        assert_eq!(stats.per_weekday[1], (Weekday::Tue, 0));
        assert_eq!(stats.per_weekday[2], (Weekday::Wed, 1));
        assert_eq!(stats.per_weekday[5], (Weekday::Sat, 1));
        assert_eq!(stats.per_weekday[6], (Weekday::Sun, 0));

        assert_eq!(stats.headline_length.unwrap().max, 4.0);
        assert_eq!(stats.top_keywords.len(), 1);
        assert!(stats.top_bigrams.is_empty());
    }

    #[test]
    fn test_hour_from_loader_text() {
        let articles = vec![
            NewsArticle::new(
                "Stocks open higher",
                PublishedAt::Text("2020-06-05 10:30:54-04:00".into()),
                "AAPL",
            ),
            NewsArticle::new("Date only", PublishedAt::Text("2020-06-05".into()), "AAPL"),
        ];
        let stats = PublicationStats::from_articles(&articles, 5);
        assert_eq!(stats.per_date.get(&NaiveDate::from_ymd_opt(2020, 6, 5).unwrap()), Some(&2));
        assert_eq!(stats.per_hour.get(&10), Some(&1));
        assert_eq!(stats.per_hour.values().sum::<usize>(), 1);
        assert_eq!(stats.top_keywords[0], ("stocks".to_string(), 1));
        assert_eq!(stats.top_bigrams[0], ("stocks open".to_string(), 1));
    }

    #[test]
    fn test_empty_articles() {
        let stats = PublicationStats::from_articles(&[], 15);
        assert_eq!(stats.total_articles, 0);
        assert!(stats.headline_length.is_none());
        assert!(stats.per_weekday.iter().all(|(_, count)| *count == 0));
        assert!(stats.top_keywords.is_empty());
    }
}
