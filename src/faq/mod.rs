//! Read-time grouping of near-duplicate questions.
//!
//! The workflow engine logs every question verbatim, so the same question
//! shows up with different casing, punctuation, and spacing. Grouping happens
//! here at read time; the stored rows are never rewritten.

use std::collections::HashMap;

use crate::models::{Faq, FaqGroup};

/// Default group limit for the FAQ listing endpoint.
pub const LISTING_LIMIT: usize = 100;
/// Group limit used inside the metrics summary.
pub const METRICS_TOP_LIMIT: usize = 5;

const STRIPPED_PUNCTUATION: &[char] = &['?', '!', '.', ',', ';', ':', '\'', '"', '(', ')'];

/// Canonical form of a question: trimmed, lowercased, fixed punctuation set
/// removed, whitespace runs collapsed to single spaces.
pub fn normalize_question(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Group questions by their normalized form.
///
/// Each group's frequency is the sum of row frequencies, counting missing or
/// non-positive values as 1. The representative text and agent come from the
/// first row seen for the group; the date is the most recent `asked_at`.
/// Groups are sorted by frequency descending and truncated to `limit`.
pub fn dedupe(records: &[Faq], limit: usize) -> Vec<FaqGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<FaqGroup> = Vec::new();

    for record in records {
        let key = normalize_question(&record.question);
        let weight = record.frequency.filter(|f| *f > 0).unwrap_or(1);

        match index.get(&key) {
            Some(&i) => {
                let group = &mut groups[i];
                group.frequency += weight;
                if group.agent_name.is_none() {
                    group.agent_name = record.agent_name.clone();
                }
                if record.asked_at > group.last_asked_at {
                    group.last_asked_at = record.asked_at;
                }
            }
            None => {
                index.insert(key, groups.len());
                groups.push(FaqGroup {
                    question: record.question.clone(),
                    frequency: weight,
                    agent_name: record.agent_name.clone(),
                    last_asked_at: record.asked_at,
                });
            }
        }
    }

    groups.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    groups.truncate(limit);
    groups
}
