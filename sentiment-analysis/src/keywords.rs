//! Most frequent words and word pairs across headlines

use common::IndexMap;

/// Lowercase whitespace tokens with surrounding punctuation stripped
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|token| {
            token
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|token| !token.is_empty())
        .collect()
}

/// The `limit` most frequent words over all headlines, highest count first.
///
/// Ties keep the order in which the words were first seen.
pub fn top_keywords<'a, I>(headlines: I, limit: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for headline in headlines {
        for word in tokenize(headline) {
            *counts.entry(word).or_insert(0) += 1;
        }
    }
    most_common(counts, limit)
}

/// The `limit` most frequent adjacent word pairs.
///
/// Pairs never span two headlines.
pub fn top_bigrams<'a, I>(headlines: I, limit: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for headline in headlines {
        let words = tokenize(headline);
        for pair in words.windows(2) {
            *counts.entry(format!("{} {}", pair[0], pair[1])).or_insert(0) += 1;
        }
    }
    most_common(counts, limit)
}

fn most_common(counts: IndexMap<String, usize>, limit: usize) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}
