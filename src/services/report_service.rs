//! Post-session analytics
//!
//! Stateless functions over a quiz, its responses and a leaderboard snapshot.
//! Missing input yields zeroed reports, never errors.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::{
    constants::{TIME_BUCKETS_MS, TIME_SPIKE_FACTOR},
    models::{
        LeaderboardEntry, ParticipantReport, QuestionStats, Quiz, QuizSummary, Response,
        ResponseStatus, TimeBucket, TimeSpike, TopicStats,
    },
    utils::stats::{mean, median, round1},
};

pub struct ReportService;

impl ReportService {
    /// Analytics for one participant
    pub fn participant_report(
        quiz: &Quiz,
        user_id: Uuid,
        response: Option<&Response>,
        leaderboard: &[LeaderboardEntry],
    ) -> ParticipantReport {
        let total_questions = quiz.questions.len();
        let mut report = ParticipantReport {
            quiz_id: quiz.id,
            user_id,
            total_questions,
            unattempted: total_questions,
            max_possible_score: quiz.max_possible_score(),
            topics: Self::topic_stats(quiz, None),
            ..Default::default()
        };

        let Some(response) = response else {
            return report;
        };

        let attempted = response.attempted_count();
        let correct = response.correct_count();

        report.status = Some(response.status);
        report.attempted = attempted;
        report.correct = correct;
        report.wrong = attempted.saturating_sub(correct);
        report.unattempted = total_questions.saturating_sub(attempted);
        report.accuracy = if attempted > 0 {
            round1(correct as f64 / attempted as f64 * 100.0)
        } else {
            0.0
        };
        report.total_score = response.total_score;
        report.max_possible_score = response.max_possible_score;
        report.percentage = response.percentage;
        report.passed = response.status.is_final() && response.percentage >= quiz.settings.passing_score;
        report.total_time_taken = response.total_time_taken;
        report.topics = Self::topic_stats(quiz, Some(response));
        report.time_spikes = Self::time_spikes(response);

        if let Some(entry) = leaderboard.iter().find(|e| e.user_id == user_id) {
            report.rank = Some(entry.rank);
            report.percentile = entry.percentile;
        } else {
            report.rank = response.rank;
        }

        report
    }

    /// Analytics for a whole quiz over its finished responses
    pub fn quiz_summary(quiz: &Quiz, responses: &[Response]) -> QuizSummary {
        let finished: Vec<&Response> = responses.iter().filter(|r| r.status.is_final()).collect();

        let mut summary = QuizSummary {
            quiz_id: quiz.id,
            participants: responses.len(),
            completed: finished.len(),
            disqualified: finished
                .iter()
                .filter(|r| r.status == ResponseStatus::Disqualified)
                .count(),
            time_distribution: Self::time_distribution(&[]),
            questions: Self::question_stats(quiz, &finished),
            ..Default::default()
        };

        if finished.is_empty() {
            return summary;
        }

        let scores: Vec<f64> = finished.iter().map(|r| r.total_score as f64).collect();
        let percentages: Vec<f64> = finished.iter().map(|r| r.percentage).collect();
        let times: Vec<i64> = finished.iter().map(|r| r.total_time_taken).collect();
        let passed = finished
            .iter()
            .filter(|r| r.percentage >= quiz.settings.passing_score)
            .count();

        summary.average_score = round1(mean(&scores));
        summary.highest_score = finished.iter().map(|r| r.total_score).max().unwrap_or(0);
        summary.lowest_score = finished.iter().map(|r| r.total_score).min().unwrap_or(0);
        summary.average_percentage = round1(mean(&percentages));
        summary.pass_rate = round1(passed as f64 / finished.len() as f64 * 100.0);
        summary.median_time = median(&times);
        summary.time_distribution = Self::time_distribution(&times);

        summary
    }

    /// Correct/wrong/total per topic, alphabetically
    fn topic_stats(quiz: &Quiz, response: Option<&Response>) -> Vec<TopicStats> {
        let mut topics: BTreeMap<&str, TopicStats> = BTreeMap::new();

        for question in &quiz.questions {
            let stats = topics.entry(question.topic()).or_insert_with(|| TopicStats {
                topic: question.topic().to_string(),
                ..Default::default()
            });
            stats.total += 1;

            if let Some(answer) = response.and_then(|r| r.answer_for(&question.id)) {
                if answer.is_correct {
                    stats.correct += 1;
                } else if answer.is_attempted() {
                    stats.wrong += 1;
                }
            }
        }

        topics.into_values().collect()
    }

    /// Attempted answers slower than the spike factor times the participant's
    /// own average over attempted answers
    fn time_spikes(response: &Response) -> Vec<TimeSpike> {
        let attempted: Vec<_> = response.answers.iter().filter(|a| a.is_attempted()).collect();
        let times: Vec<f64> = attempted.iter().map(|a| a.time_taken as f64).collect();
        let average = mean(&times);
        if average <= 0.0 {
            return Vec::new();
        }

        attempted
            .into_iter()
            .filter(|a| a.time_taken as f64 > TIME_SPIKE_FACTOR * average)
            .map(|a| TimeSpike {
                question_id: a.question_id,
                time_taken: a.time_taken,
                average_time: round1(average),
            })
            .collect()
    }

    fn time_distribution(times: &[i64]) -> Vec<TimeBucket> {
        let mut buckets: Vec<TimeBucket> = TIME_BUCKETS_MS
            .iter()
            .map(|upper| TimeBucket {
                upper_ms: Some(*upper),
                count: 0,
            })
            .chain(std::iter::once(TimeBucket {
                upper_ms: None,
                count: 0,
            }))
            .collect();

        for time in times {
            let idx = TIME_BUCKETS_MS
                .iter()
                .position(|upper| time < upper)
                .unwrap_or(TIME_BUCKETS_MS.len());
            buckets[idx].count += 1;
        }

        buckets
    }

    fn question_stats(quiz: &Quiz, finished: &[&Response]) -> Vec<QuestionStats> {
        quiz.questions
            .iter()
            .map(|question| {
                let answers: Vec<_> = finished
                    .iter()
                    .filter_map(|r| r.answer_for(&question.id))
                    .filter(|a| a.is_attempted())
                    .collect();
                let correct = answers.iter().filter(|a| a.is_correct).count();
                let times: Vec<f64> = answers.iter().map(|a| a.time_taken as f64).collect();

                QuestionStats {
                    question_id: question.id,
                    position: question.position,
                    attempts: answers.len(),
                    correct,
                    correct_rate: if answers.is_empty() {
                        0.0
                    } else {
                        round1(correct as f64 / answers.len() as f64 * 100.0)
                    },
                    average_time: round1(mean(&times)),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::{
        AccessControl, Answer, Question, QuestionKind, QuestionType, QuizSettings,
    };

    fn question(position: u32, topic: Option<&str>) -> Question {
        Question {
            id: Uuid::new_v4(),
            position,
            text: format!("Q{position}"),
            kind: QuestionKind::FillBlank {
                accepted: vec!["yes".to_string()],
            },
            points: 10,
            difficulty: None,
            topic: topic.map(str::to_string),
            time_limit_seconds: None,
        }
    }

    fn quiz() -> Quiz {
        Quiz::draft(
            "Report".to_string(),
            Uuid::new_v4(),
            None,
            vec![
                question(1, Some("Algebra")),
                question(2, Some("Algebra")),
                question(3, None),
                question(4, None),
            ],
            QuizSettings::default(),
            AccessControl::default(),
        )
    }

    fn answered(quiz: &Quiz, values: &[(&str, i64)]) -> Response {
        let mut response = Response::new(quiz.id, Uuid::new_v4(), quiz.max_possible_score(), Utc::now());
        for (question, (value, time)) in quiz.questions.iter().zip(values) {
            let is_correct = question.kind.grade(value);
            response.record(Answer {
                question_id: question.id,
                question_type: QuestionType::FillBlank,
                value: value.to_string(),
                is_correct,
                points_earned: if is_correct { question.points } else { 0 },
                time_taken: *time,
                answered_at: Utc::now(),
            });
        }
        response.finalize(ResponseStatus::Completed, Utc::now(), 1);
        response
    }

    #[test]
    fn test_accuracy_excludes_unattempted() {
        let quiz = quiz();
        let response = answered(&quiz, &[("yes", 1000), ("no", 1000), ("", 0), ("", 0)]);
        let report = ReportService::participant_report(&quiz, response.user_id, Some(&response), &[]);

        assert_eq!(report.attempted, 2);
        assert_eq!(report.correct, 1);
        assert_eq!(report.wrong, 1);
        assert_eq!(report.unattempted, 2);
        assert_eq!(report.accuracy, 50.0);
        assert_eq!(report.percentage, 25.0);
        assert!(!report.passed);
    }

    #[test]
    fn test_topics_group_with_general_default() {
        let quiz = quiz();
        let response = answered(&quiz, &[("yes", 1000), ("no", 1000), ("yes", 1000), ("", 0)]);
        let report = ReportService::participant_report(&quiz, response.user_id, Some(&response), &[]);

        assert_eq!(
            report.topics,
            vec![
                TopicStats { topic: "Algebra".to_string(), correct: 1, wrong: 1, total: 2 },
                TopicStats { topic: "General".to_string(), correct: 1, wrong: 0, total: 2 },
            ]
        );
    }

    #[test]
    fn test_time_spikes_use_attempted_average() {
        let quiz = quiz();
        let response = answered(&quiz, &[("yes", 1000), ("yes", 1000), ("yes", 7000), ("", 0)]);
        let report = ReportService::participant_report(&quiz, response.user_id, Some(&response), &[]);

        assert_eq!(report.time_spikes.len(), 1);
        assert_eq!(report.time_spikes[0].question_id, quiz.questions[2].id);
        assert_eq!(report.time_spikes[0].average_time, 3000.0);
    }

    #[test]
    fn test_missing_response_reports_zeros() {
        let quiz = quiz();
        let report = ReportService::participant_report(&quiz, Uuid::new_v4(), None, &[]);

        assert_eq!(report.attempted, 0);
        assert_eq!(report.unattempted, 4);
        assert_eq!(report.accuracy, 0.0);
        assert!(report.status.is_none());
        assert_eq!(report.topics.iter().map(|t| t.total).sum::<usize>(), 4);
    }

    #[test]
    fn test_quiz_summary() {
        let quiz = quiz();
        let strong = answered(&quiz, &[("yes", 30_000), ("yes", 30_000), ("yes", 30_000), ("yes", 30_000)]);
        let weak = answered(&quiz, &[("yes", 100_000), ("no", 100_000), ("", 0), ("", 0)]);
        let summary = ReportService::quiz_summary(&quiz, &[strong, weak]);

        assert_eq!(summary.completed, 2);
        assert_eq!(summary.highest_score, 40);
        assert_eq!(summary.lowest_score, 10);
        assert_eq!(summary.average_score, 25.0);
        assert_eq!(summary.pass_rate, 50.0);
        assert_eq!(summary.median_time, 160_000);
        let counts: Vec<usize> = summary.time_distribution.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![0, 2, 0, 0, 0]);
        assert_eq!(summary.questions[0].attempts, 2);
        assert_eq!(summary.questions[1].correct_rate, 50.0);
        assert_eq!(summary.questions[2].attempts, 1);
    }

    #[test]
    fn test_empty_quiz_summary() {
        let summary = ReportService::quiz_summary(&quiz(), &[]);
        assert_eq!(summary.participants, 0);
        assert_eq!(summary.time_distribution.len(), TIME_BUCKETS_MS.len() + 1);
    }
}
