//! Derived grade computation.
//!
//! DESIGN
//! ======
//! A student's total is the sum of three rescaled components:
//! - Homework: the best `best_of` of up to `pool_size` homework scores,
//!   summed against their maxes and rescaled to `homework_target`.
//! - Midterm and final: each rescaled from its own max to its target.
//!
//! The total then maps to a letter through the course grading scale.
//! Everything is recomputed from the raw marks on each call; nothing is cached.
//!
//! EDGE CASES
//! ==========
//! A component whose max is zero contributes zero. Scores are clamped into
//! `[0, max]` so a component can never exceed its target. When one
//! assignment has several marks the last one counts.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{Assignment, Dataset, Mark, Student};
use crate::scale;

pub const MIDTERM_ID: &str = "MID";
pub const FINAL_ID: &str = "END";

// =============================================================================
// POLICY
// =============================================================================

/// Aggregation constants. `Default` is the course's published policy:
/// best 10 of 11 homework for 60 points, midterm 20, final 20.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradePolicy {
    pub best_of: usize,
    pub pool_size: usize,
    pub homework_target: f64,
    pub midterm_target: f64,
    pub final_target: f64,
}

impl Default for GradePolicy {
    fn default() -> Self {
        Self { best_of: 10, pool_size: 11, homework_target: 60.0, midterm_target: 20.0, final_target: 20.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component {
    Homework(u32),
    Midterm,
    Final,
}

fn classify(assignment_id: &str) -> Option<Component> {
    match assignment_id {
        MIDTERM_ID => Some(Component::Midterm),
        FINAL_ID => Some(Component::Final),
        id => id
            .strip_prefix('H')
            .and_then(|n| n.parse::<u32>().ok())
            .map(Component::Homework),
    }
}

// =============================================================================
// RESULTS
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeBreakdown {
    /// Rescaled homework contribution, `0..=homework_target`.
    pub homework: f64,
    pub midterm: f64,
    #[serde(rename = "final")]
    pub final_exam: f64,
    pub total: f64,
    pub homework_earned: f64,
    pub homework_possible: f64,
    pub homework_counted: usize,
    pub homework_dropped: usize,
    pub has_midterm: bool,
    pub has_final: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeReport {
    pub student_id: String,
    pub name: String,
    #[serde(flatten)]
    pub breakdown: GradeBreakdown,
    pub letter: Option<String>,
    pub point: Option<f64>,
}

// =============================================================================
// AGGREGATION
// =============================================================================

struct Scored {
    score: f64,
    max: f64,
}

/// Max for a mark: the mark's own, else the assignment's configured max.
fn effective_max(mark: &Mark, assignments: &[Assignment]) -> f64 {
    if mark.max > 0.0 {
        return mark.max;
    }
    assignments
        .iter()
        .find(|a| a.id == mark.assignment_id)
        .map_or(0.0, |a| a.max.max(0.0))
}

fn clamp_score(score: f64, max: f64) -> f64 {
    if max > 0.0 && score.is_finite() { score.clamp(0.0, max) } else { 0.0 }
}

fn rescale(earned: f64, possible: f64, target: f64) -> f64 {
    if possible > 0.0 { earned / possible * target } else { 0.0 }
}

/// Aggregate one student's marks into the three rescaled components.
pub fn aggregate<'a, I>(marks: I, assignments: &[Assignment], policy: &GradePolicy) -> GradeBreakdown
where
    I: IntoIterator<Item = &'a Mark>,
{
    // Keyed by homework number; a later mark for the same assignment replaces
    // an earlier one, as it does for the exams.
    let mut by_number: BTreeMap<u32, Scored> = BTreeMap::new();
    let mut midterm: Option<(f64, f64)> = None;
    let mut final_exam: Option<(f64, f64)> = None;

    for mark in marks {
        let Some(component) = classify(&mark.assignment_id) else {
            continue;
        };
        let max = effective_max(mark, assignments);
        let score = clamp_score(mark.marks, max);
        match component {
            Component::Homework(number) => {
                by_number.insert(number, Scored { score, max });
            }
            Component::Midterm => midterm = Some((score, max)),
            Component::Final => final_exam = Some((score, max)),
        }
    }

    // Only the first `pool_size` assignments by number are eligible.
    let mut homework: Vec<Scored> = by_number.into_values().take(policy.pool_size).collect();
    let pooled = homework.len();

    homework.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    homework.truncate(policy.best_of);

    let homework_earned: f64 = homework.iter().map(|s| s.score).sum();
    let homework_possible: f64 = homework.iter().map(|s| s.max).sum();
    let hw = rescale(homework_earned, homework_possible, policy.homework_target);

    let mid = midterm.map_or(0.0, |(score, max)| rescale(score, max, policy.midterm_target));
    let fin = final_exam.map_or(0.0, |(score, max)| rescale(score, max, policy.final_target));

    GradeBreakdown {
        homework: hw,
        midterm: mid,
        final_exam: fin,
        total: hw + mid + fin,
        homework_earned,
        homework_possible,
        homework_counted: homework.len(),
        homework_dropped: pooled - homework.len(),
        has_midterm: midterm.is_some(),
        has_final: final_exam.is_some(),
    }
}

fn report_for(dataset: &Dataset, student: &Student, policy: &GradePolicy) -> GradeReport {
    let breakdown = aggregate(dataset.marks_for(student), &dataset.assignments, policy);
    let band = scale::letter_for(&dataset.course.grading_scale, breakdown.total);
    GradeReport {
        student_id: student.id.clone(),
        name: student.name.clone(),
        breakdown,
        letter: band.map(|b| b.letter.clone()),
        point: band.map(|b| b.point),
    }
}

/// Grade one student by id. `None` when the id is not on the roster.
#[must_use]
pub fn grade_student(dataset: &Dataset, student_id: &str, policy: &GradePolicy) -> Option<GradeReport> {
    dataset
        .student(student_id)
        .map(|student| report_for(dataset, student, policy))
}

/// Grade every student on the roster, ordered by name.
#[must_use]
pub fn class_report(dataset: &Dataset, policy: &GradePolicy) -> Vec<GradeReport> {
    let mut reports: Vec<GradeReport> = dataset
        .students
        .iter()
        .map(|student| report_for(dataset, student, policy))
        .collect();
    reports.sort_by_key(|r| r.name.to_lowercase());
    reports
}

#[cfg(test)]
#[path = "grades_test.rs"]
mod tests;
