//! Keyword- and template-driven [`Assistant`] implementation.

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{DateTime, Datelike, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::{
    Assistant, DelayInput, DelayPrediction, PriorityPrediction, SimilarMatch,
    SimilarityCandidate, TaskSuggestion, WorkloadEntry, WorkloadReport, WorkloadSuggestion,
};

const TASK_TEMPLATES: &[&str] = &[
    "Review fabric quality reports for {month}",
    "Update inventory for {category} section",
    "Schedule vendor meeting for raw material procurement",
    "Prepare monthly sales analysis report",
    "Conduct quality inspection for new shipment",
    "Update pricing for seasonal collection",
    "Review and approve purchase orders",
    "Coordinate with logistics for delivery schedule",
    "Prepare staff training schedule for new procedures",
    "Audit warehouse stock levels",
    "Complete quarterly performance review",
    "Update standard operating procedures",
    "Review and respond to customer feedback",
    "Prepare budget proposal for next quarter",
    "Schedule team building activity",
    "Review compliance documentation",
    "Update employee handbook",
    "Plan departmental meeting agenda",
    "Review and approve expense reports",
    "Coordinate cross-department project",
];

const CATEGORIES: &[&str] = &[
    "Cotton", "Silk", "Polyester", "Wool", "Linen", "Saree", "Dhoti", "Readymade",
];

const MONTHS: &[&str] = &[
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Keyword tables checked in order; the first hit wins.
const PRIORITY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "critical",
        &[
            "urgent",
            "emergency",
            "critical",
            "immediately",
            "asap",
            "deadline today",
            "overdue",
        ],
    ),
    (
        "high",
        &[
            "important",
            "priority",
            "soon",
            "this week",
            "client",
            "customer",
            "revenue",
        ],
    ),
    (
        "medium",
        &["review", "update", "prepare", "schedule", "plan", "coordinate"],
    ),
    (
        "low",
        &[
            "optional",
            "when possible",
            "future",
            "consider",
            "explore",
            "nice to have",
        ],
    ),
];

const COMPLEX_WORDS: &[&str] = &[
    "audit",
    "review all",
    "comprehensive",
    "complete overhaul",
    "migrate",
    "redesign",
];

const SUMMARY_ACTIONS: &[&str] = &[
    "reviewing and updating",
    "managing and coordinating",
    "analyzing and reporting",
    "planning and executing",
    "monitoring and improving",
];

const SUMMARY_DOMAINS: &[&str] = &[
    "textile operations",
    "business management",
    "quality assurance",
    "inventory management",
    "customer relations",
    "supply chain",
];

const SUMMARY_FOCUSES: &[&str] = &[
    "accuracy and completeness",
    "timely delivery",
    "cost optimization",
    "quality standards",
    "team collaboration",
];

const SUMMARY_EFFORTS: &[&str] = &["2-4 hours", "4-8 hours", "1-2 days", "2-3 days", "1 week"];

/// Minimum Dice similarity for a duplicate-detection match.
const SIMILARITY_THRESHOLD: f64 = 0.6;

/// Assistant backed by keyword tables and phrase templates.
///
/// Randomness comes from a seedable RNG so tests can fix outputs.
pub struct HeuristicAssistant {
    rng: Mutex<StdRng>,
}

impl HeuristicAssistant {
    /// Create an assistant seeded from system entropy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create an assistant with a fixed seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn lock_rng(&self) -> std::sync::MutexGuard<'_, StdRng> {
        self.rng
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for HeuristicAssistant {
    fn default() -> Self {
        Self::new()
    }
}

impl Assistant for HeuristicAssistant {
    fn suggest_tasks(
        &self,
        organization_name: &str,
        existing_titles: &[String],
        count: usize,
        now: DateTime<Utc>,
    ) -> Vec<TaskSuggestion> {
        let mut rng = self.lock_rng();

        let existing: HashSet<String> =
            existing_titles.iter().map(|t| t.to_lowercase()).collect();

        let month = MONTHS[now.month0() as usize];
        let mut pool: Vec<&str> = TASK_TEMPLATES.to_vec();
        pool.shuffle(&mut *rng);

        let mut suggestions = Vec::new();
        for template in pool.into_iter().take(count * 2) {
            let category = CATEGORIES[rng.gen_range(0..CATEGORIES.len())];
            let title = template
                .replace("{month}", month)
                .replace("{category}", category);
            if existing.contains(&title.to_lowercase()) {
                continue;
            }

            let priority = ["critical", "high", "medium", "medium", "low"]
                [rng.gen_range(0..5)];
            let due_days = match priority {
                "critical" => 1,
                "high" => 3,
                "medium" => 7,
                _ => 14,
            };
            suggestions.push(TaskSuggestion {
                title,
                priority: priority.to_string(),
                due_date: now + Duration::days(due_days),
                reason: format!(
                    "Suggested based on {organization_name}'s operational patterns and current period."
                ),
            });
            if suggestions.len() >= count {
                break;
            }
        }
        suggestions
    }

    fn predict_priority(&self, title: &str, description: &str) -> PriorityPrediction {
        let text = format!("{title} {description}").to_lowercase();

        for (priority, keywords) in PRIORITY_KEYWORDS {
            for keyword in *keywords {
                if text.contains(keyword) {
                    let confidence = self.lock_rng().gen_range(0.75..0.95);
                    return PriorityPrediction {
                        predicted_priority: (*priority).to_string(),
                        confidence: round2(confidence),
                        reason: format!(
                            "Contains keyword '{keyword}' indicating {priority} priority."
                        ),
                    };
                }
            }
        }

        let confidence = self.lock_rng().gen_range(0.6..0.8);
        PriorityPrediction {
            predicted_priority: "medium".to_string(),
            confidence: round2(confidence),
            reason: "No strong priority indicators found. Defaulting to medium priority."
                .to_string(),
        }
    }

    fn predict_delay(&self, input: &DelayInput) -> DelayPrediction {
        let title = input.title.to_lowercase();
        let mut risk: f64 = 0.3;

        match input.priority.as_str() {
            "critical" => risk += 0.1,
            "low" => risk += 0.15,
            _ => {}
        }

        if input.days_until_due <= 1 {
            risk += 0.3;
        } else if input.days_until_due <= 3 {
            risk += 0.15;
        } else if input.days_until_due > 14 {
            // Long timelines invite scope creep.
            risk += 0.1;
        }

        if COMPLEX_WORDS.iter().any(|w| title.contains(w)) {
            risk += 0.15;
        }

        if input.assignee_count > 3 {
            risk += 0.1;
        }

        if input.has_subtasks {
            risk += 0.05;
        }

        let risk = risk.min(0.95);

        let (risk_level, suggestion) = if risk > 0.7 {
            (
                "high",
                "Consider breaking this task into smaller parts or assigning additional resources.",
            )
        } else if risk > 0.4 {
            (
                "medium",
                "Monitor progress closely. Set up intermediate checkpoints.",
            )
        } else {
            ("low", "Task appears manageable within the given timeline.")
        };

        let confidence = self.lock_rng().gen_range(0.70..0.90);
        DelayPrediction {
            delay_probability: round2(risk),
            risk_level: risk_level.to_string(),
            suggestion: suggestion.to_string(),
            confidence: round2(confidence),
        }
    }

    fn find_similar(
        &self,
        title: &str,
        description: &str,
        candidates: &[SimilarityCandidate],
    ) -> Vec<SimilarMatch> {
        let input_text = format!("{title} {description}").to_lowercase();
        let input_title = title.to_lowercase();

        let mut matches: Vec<SimilarMatch> = candidates
            .iter()
            .filter_map(|c| {
                let cand_text = format!(
                    "{} {}",
                    c.title,
                    c.description.as_deref().unwrap_or_default()
                )
                .to_lowercase();
                let full = dice_similarity(&input_text, &cand_text);
                let title_only = dice_similarity(&input_title, &c.title.to_lowercase());
                let score = full.max(title_only);

                (score >= SIMILARITY_THRESHOLD).then(|| SimilarMatch {
                    task_id: c.id.clone(),
                    title: c.title.clone(),
                    status: c.status.clone(),
                    similarity: round1(score * 100.0),
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches.truncate(5);
        matches
    }

    fn generate_summary(&self, title: &str, priority: &str) -> String {
        let mut rng = self.lock_rng();
        let action = SUMMARY_ACTIONS[rng.gen_range(0..SUMMARY_ACTIONS.len())];
        let domain = SUMMARY_DOMAINS[rng.gen_range(0..SUMMARY_DOMAINS.len())];
        let focus = SUMMARY_FOCUSES[rng.gen_range(0..SUMMARY_FOCUSES.len())];
        let effort = SUMMARY_EFFORTS[rng.gen_range(0..SUMMARY_EFFORTS.len())];

        match rng.gen_range(0..3) {
            0 => format!(
                "This task involves {action} related to {domain}. Key focus areas include {focus}. Estimated effort: {effort}."
            ),
            1 => format!(
                "A {priority}-priority item requiring {action} in the {domain} area. This will impact {focus} and should be completed by the deadline."
            ),
            _ => format!(
                "'{title}' centers on {action} for {domain} operations. Key focus: {focus}. Estimated effort: {effort}."
            ),
        }
    }

    fn balance_workload(&self, workload: &[WorkloadEntry]) -> WorkloadReport {
        if workload.is_empty() {
            return WorkloadReport {
                workload: Vec::new(),
                average_tasks: 0.0,
                suggestions: Vec::new(),
                summary: "No team members found.".to_string(),
                confidence: 0.0,
            };
        }

        let avg = workload.iter().map(|w| w.active_tasks).sum::<usize>() as f64
            / workload.len() as f64;

        let overloaded: Vec<&WorkloadEntry> = workload
            .iter()
            .filter(|w| (w.active_tasks as f64) > avg * 1.5)
            .collect();
        let underloaded: Vec<&WorkloadEntry> = workload
            .iter()
            .filter(|w| (w.active_tasks as f64) < avg * 0.5)
            .collect();

        let mut rng = self.lock_rng();
        let mut suggestions = Vec::new();
        for over in &overloaded {
            let Some(target) = underloaded.choose(&mut *rng) else {
                break;
            };
            let excess = over.active_tasks.saturating_sub(avg as usize);
            let moved = excess.min(3);
            suggestions.push(WorkloadSuggestion {
                from_member: over.name.clone(),
                to_member: target.name.clone(),
                task_count: moved,
                reason: format!(
                    "{} has {} tasks (avg: {:.0}). Consider moving {} tasks to {}.",
                    over.name, over.active_tasks, avg, moved, target.name
                ),
            });
        }

        let summary = format!(
            "{} overloaded, {} underloaded out of {} members.",
            overloaded.len(),
            underloaded.len(),
            workload.len()
        );
        let confidence = round2(rng.gen_range(0.75..0.90));

        WorkloadReport {
            workload: workload.to_vec(),
            average_tasks: round1(avg),
            suggestions,
            summary,
            confidence,
        }
    }
}

/// Dice coefficient over character bigrams of the two strings.
fn dice_similarity(a: &str, b: &str) -> f64 {
    let a_grams = bigrams(a);
    let b_grams = bigrams(b);
    if a_grams.is_empty() || b_grams.is_empty() {
        return if a == b { 1.0 } else { 0.0 };
    }

    let mut b_pool: Vec<(char, char)> = b_grams.clone();
    let mut overlap = 0usize;
    for g in &a_grams {
        if let Some(pos) = b_pool.iter().position(|x| x == g) {
            b_pool.swap_remove(pos);
            overlap += 1;
        }
    }

    (2.0 * overlap as f64) / (a_grams.len() + b_grams.len()) as f64
}

fn bigrams(s: &str) -> Vec<(char, char)> {
    let chars: Vec<char> = s.chars().collect();
    chars.windows(2).map(|w| (w[0], w[1])).collect()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_priority_critical_keyword() {
        let assistant = HeuristicAssistant::with_seed(7);
        let prediction = assistant.predict_priority("Urgent: fix the billing outage", "");

        assert_eq!(prediction.predicted_priority, "critical");
        assert!(prediction.confidence >= 0.75 && prediction.confidence <= 0.95);
        assert!(prediction.reason.contains("urgent"));
    }

    #[test]
    fn test_predict_priority_defaults_to_medium() {
        let assistant = HeuristicAssistant::with_seed(7);
        let prediction = assistant.predict_priority("Water the office plants", "");

        assert_eq!(prediction.predicted_priority, "medium");
        assert!(prediction.confidence < 0.8);
    }

    #[test]
    fn test_predict_delay_tight_deadline_raises_risk() {
        let assistant = HeuristicAssistant::with_seed(7);

        let relaxed = assistant.predict_delay(&DelayInput {
            title: "Prepare slides".to_string(),
            priority: "medium".to_string(),
            assignee_count: 1,
            days_until_due: 7,
            has_subtasks: false,
        });
        let tight = assistant.predict_delay(&DelayInput {
            title: "Comprehensive audit of all stock".to_string(),
            priority: "critical".to_string(),
            assignee_count: 5,
            days_until_due: 1,
            has_subtasks: true,
        });

        assert!(tight.delay_probability > relaxed.delay_probability);
        assert_eq!(tight.risk_level, "high");
        assert_eq!(relaxed.risk_level, "low");
    }

    #[test]
    fn test_delay_probability_capped() {
        let assistant = HeuristicAssistant::with_seed(7);
        let prediction = assistant.predict_delay(&DelayInput {
            title: "Complete overhaul and comprehensive audit".to_string(),
            priority: "low".to_string(),
            assignee_count: 10,
            days_until_due: 0,
            has_subtasks: true,
        });

        assert!(prediction.delay_probability <= 0.95);
    }

    #[test]
    fn test_find_similar_ranks_exact_match_first() {
        let assistant = HeuristicAssistant::with_seed(7);
        let candidates = vec![
            SimilarityCandidate {
                id: "t1".to_string(),
                title: "Audit warehouse stock levels".to_string(),
                description: None,
                status: "todo".to_string(),
            },
            SimilarityCandidate {
                id: "t2".to_string(),
                title: "Plan the holiday party".to_string(),
                description: None,
                status: "todo".to_string(),
            },
        ];

        let matches = assistant.find_similar("Audit warehouse stock levels", "", &candidates);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].task_id, "t1");
        assert!(matches[0].similarity > 99.0);
    }

    #[test]
    fn test_find_similar_returns_at_most_five() {
        let assistant = HeuristicAssistant::with_seed(7);
        let candidates: Vec<SimilarityCandidate> = (0..10)
            .map(|i| SimilarityCandidate {
                id: format!("t{i}"),
                title: "Audit warehouse stock levels".to_string(),
                description: None,
                status: "todo".to_string(),
            })
            .collect();

        let matches = assistant.find_similar("Audit warehouse stock levels", "", &candidates);

        assert_eq!(matches.len(), 5);
    }

    #[test]
    fn test_suggest_tasks_skips_existing_titles_and_is_seeded() {
        let now = Utc::now();
        let a = HeuristicAssistant::with_seed(42);
        let b = HeuristicAssistant::with_seed(42);

        let first = a.suggest_tasks("Acme", &[], 5, now);
        let second = b.suggest_tasks("Acme", &[], 5, now);

        assert_eq!(first.len(), 5);
        let titles_a: Vec<&str> = first.iter().map(|s| s.title.as_str()).collect();
        let titles_b: Vec<&str> = second.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles_a, titles_b);

        let existing: Vec<String> = first.iter().map(|s| s.title.clone()).collect();
        let c = HeuristicAssistant::with_seed(42);
        let third = c.suggest_tasks("Acme", &existing, 5, now);
        for s in &third {
            assert!(!existing.contains(&s.title));
        }
    }

    #[test]
    fn test_dice_similarity_bounds() {
        assert!((dice_similarity("night", "night") - 1.0).abs() < f64::EPSILON);
        assert!(dice_similarity("night", "nacht") > 0.0);
        assert!(dice_similarity("night", "nacht") < 1.0);
        assert!((dice_similarity("abc", "xyz")).abs() < f64::EPSILON);
    }

    #[test]
    fn test_generate_summary_mentions_priority_or_effort() {
        let assistant = HeuristicAssistant::with_seed(3);
        let summary = assistant.generate_summary("Audit stock", "high");

        assert!(!summary.is_empty());
    }

    fn member(id: &str, name: &str, active_tasks: usize) -> WorkloadEntry {
        WorkloadEntry {
            member_id: id.to_string(),
            name: name.to_string(),
            active_tasks,
            total_points: active_tasks as i64 * 10,
        }
    }

    #[test]
    fn test_balance_workload_moves_from_overloaded_to_underloaded() {
        let assistant = HeuristicAssistant::with_seed(11);
        let report = assistant.balance_workload(&[
            member("u1", "Asha", 12),
            member("u2", "Bren", 4),
            member("u3", "Caro", 1),
        ]);

        assert!((report.average_tasks - 5.7).abs() < 0.01);
        assert_eq!(report.suggestions.len(), 1);
        let suggestion = &report.suggestions[0];
        assert_eq!(suggestion.from_member, "Asha");
        assert_eq!(suggestion.to_member, "Caro");
        assert_eq!(suggestion.task_count, 3);
        assert_eq!(report.summary, "1 overloaded, 1 underloaded out of 3 members.");
    }

    #[test]
    fn test_balance_workload_even_spread_suggests_nothing() {
        let assistant = HeuristicAssistant::with_seed(11);
        let report = assistant.balance_workload(&[
            member("u1", "Asha", 5),
            member("u2", "Bren", 5),
            member("u3", "Caro", 4),
        ]);

        assert!(report.suggestions.is_empty());
    }

    #[test]
    fn test_balance_workload_empty_membership() {
        let assistant = HeuristicAssistant::with_seed(11);
        let report = assistant.balance_workload(&[]);

        assert!(report.workload.is_empty());
        assert_eq!(report.summary, "No team members found.");
    }
}
