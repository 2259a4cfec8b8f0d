//! Turns what the solver knows into English answers.

use crate::puzzle::parser::Puzzle;
use crate::puzzle::sentence::{Question, Style, capitalize};
use crate::solver::entity::Kind;
use crate::solver::state::Solver;
use std::fmt::{Display, Formatter};

const NOTHING: &str = "Nothing.";
const UNKNOWN: &str = "I don't know.";
const IMPOSSIBLE: &str = "That's impossible.";

impl Question {
    /// Answers the question from the solver's current knowledge.
    ///
    /// Broad questions report whatever is known about the topic and fall
    /// back to `Nothing.`; specific questions report one attribute or
    /// `I don't know.`.
    #[must_use]
    pub fn answer(&self, solver: &Solver) -> String {
        let fallback = match self.style() {
            Style::Broad => NOTHING,
            Style::Specific(_) => UNKNOWN,
        };
        let (kind, name) = self.topic();
        let Some(subject) = solver.entity(kind, name) else {
            return fallback.to_owned();
        };

        // People are only ever the topic or the first attribute.
        let [first, second] = solver.known_about(subject);
        let (topic, first) = if kind == Kind::Person {
            (capitalize(name), first.known().map(str::to_owned))
        } else {
            (name.to_owned(), first.known().map(capitalize))
        };
        let second = second.known();

        match (self, first.as_deref(), second) {
            (Self::AboutPerson(_), Some(job), Some(color)) => {
                format!("{topic} is the {job} and lives in the {color} house.")
            }
            (Self::AboutPerson(_), Some(job), None) => format!("{topic} is the {job}."),
            (Self::AboutPerson(_), None, Some(color)) => {
                format!("{topic} lives in the {color} house.")
            }
            (Self::AboutJob(_), Some(person), Some(color)) => {
                format!("{person} is the {topic} and lives in the {color} house.")
            }
            (Self::AboutJob(_), Some(person), None) => format!("{person} is the {topic}."),
            (Self::AboutJob(_), None, Some(color)) => {
                format!("The {topic} lives in the {color} house.")
            }
            (Self::AboutColor(_), Some(person), Some(job)) => {
                format!("{person} is the {job} and lives in the {topic} house.")
            }
            (Self::AboutColor(_), Some(person), None) => {
                format!("{person} lives in the {topic} house.")
            }
            (Self::AboutColor(_), None, Some(job)) => {
                format!("The {job} lives in the {topic} house.")
            }
            (Self::PersonOfJob(_), Some(person), _) => format!("{person} is the {topic}."),
            (Self::PersonOfColor(_), Some(person), _) => {
                format!("{person} lives in the {topic} house.")
            }
            (Self::JobOfPerson(_), Some(job), _) => format!("{topic} is the {job}."),
            (Self::JobOfColor(_), _, Some(job)) => format!("The {job} lives in the {topic} house."),
            (Self::ColorOfPerson(_), _, Some(color)) => {
                format!("{topic} lives in the {color} house.")
            }
            (Self::ColorOfJob(_), _, Some(color)) => {
                format!("The {topic} lives in the {color} house.")
            }
            _ => fallback.to_owned(),
        }
    }
}

impl Puzzle {
    /// The answer to question `k`, if there is one.
    #[must_use]
    pub fn answer(&self, solver: &Solver, k: usize) -> Option<String> {
        self.questions().get(k).map(|q| q.form.answer(solver))
    }

    /// The full report: numbered assertions, a blank line, then either the
    /// impossibility notice or each question with its answer.
    #[must_use]
    pub const fn report<'a>(&'a self, solver: &'a Solver) -> Transcript<'a> {
        Transcript {
            puzzle: self,
            solver,
        }
    }

    /// [`Puzzle::report`] rendered to a string.
    #[must_use]
    pub fn transcript(&self, solver: &Solver) -> String {
        self.report(solver).to_string()
    }
}

/// A puzzle's assertions and answers, ready to print.
#[derive(Debug, Clone, Copy)]
pub struct Transcript<'a> {
    puzzle: &'a Puzzle,
    solver: &'a Solver,
}

impl Display for Transcript<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, assertion) in self.puzzle.assertions().iter().enumerate() {
            writeln!(f, "{}. {}", i + 1, assertion.text)?;
        }
        writeln!(f)?;

        if self.solver.is_impossible() {
            return writeln!(f, "{IMPOSSIBLE}");
        }
        for question in self.puzzle.questions() {
            writeln!(f, "Q: {}", question.text)?;
            writeln!(f, "A: {}", question.form.answer(self.solver))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::configs::SearchConfig;

    fn solve(text: &str) -> (Puzzle, Solver) {
        let puzzle: Puzzle = text.parse().unwrap();
        let mut solver = Solver::new();
        puzzle.inform(&mut solver, &SearchConfig::default());
        (puzzle, solver)
    }

    #[test]
    fn test_partial_knowledge() {
        let (puzzle, solver) = solve(
            "Joe is not the plumber. Tom is not the electrician. Bob is the carpenter. \
             Joe lives in the yellow house. What do you know about Joe? What does Tom do?",
        );
        assert_eq!(
            puzzle.answer(&solver, 0).as_deref(),
            Some("Joe is the electrician and lives in the yellow house.")
        );
        assert_eq!(puzzle.answer(&solver, 1).as_deref(), Some("Tom is the plumber."));
        assert_eq!(puzzle.answer(&solver, 2), None);
    }

    #[test]
    fn test_anonymous_partners_are_not_reported() {
        let (puzzle, solver) = solve(
            "Joe is not the plumber. Tom is not the electrician. Bob is the carpenter. \
             Joe lives in the yellow house. Where does Bob live? What do you know about Bob? \
             Who lives in the yellow house? What does the occupant of the yellow house do?",
        );
        let answers = (0..4)
            .map(|k| puzzle.answer(&solver, k).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(
            answers,
            vec![
                "I don't know.",
                "Bob is the carpenter.",
                "Joe lives in the yellow house.",
                "The electrician lives in the yellow house.",
            ]
        );
    }

    #[test]
    fn test_broad_answers_by_topic() {
        let (puzzle, solver) = solve(
            "Sue lives around here. There is a brown house. The professor lives around here. \
             What do you know about the professor? What do you know about the brown house? \
             Who is the professor? Where does the professor live?",
        );
        let answers = (0..4)
            .map(|k| puzzle.answer(&solver, k).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(
            answers,
            vec![
                "Sue is the professor and lives in the brown house.",
                "Sue is the professor and lives in the brown house.",
                "Sue is the professor.",
                "The professor lives in the brown house.",
            ]
        );
    }

    #[test]
    fn test_nothing_known() {
        let (puzzle, solver) = solve(
            "Jack lives in the blue house. Mary does not live in the blue house. \
             The mechanic lives around here. There is a red house. \
             The architect lives around here. The sailor lives around here. \
             Who is the mechanic? What do you know about Jack? What do you know about Mary?",
        );
        let answers = (0..3)
            .map(|k| puzzle.answer(&solver, k).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(
            answers,
            vec!["I don't know.", "Jack lives in the blue house.", "Nothing."]
        );
    }

    #[test]
    fn test_transcript_layout() {
        let (puzzle, solver) = solve("Sue lives around here. What does Sue do?");
        assert_eq!(solver.jobs().names().collect::<Vec<_>>(), vec!["job#0"]);
        assert_eq!(
            puzzle.transcript(&solver),
            "1. Sue lives around here.\n\nQ: What does Sue do?\nA: I don't know.\n"
        );
    }

    #[test]
    fn test_report_prints_like_transcript() {
        let (puzzle, solver) = solve(
            "Joe is not the plumber. Tom is not the electrician. Bob is the carpenter. \
             Joe lives in the yellow house. What does Tom do?",
        );
        let printed = format!("{}", puzzle.report(&solver));
        assert_eq!(printed, puzzle.transcript(&solver));
        assert!(printed.ends_with("\n\nQ: What does Tom do?\nA: Tom is the plumber.\n"));
    }

    #[test]
    fn test_transcript_when_impossible() {
        let (puzzle, solver) = solve(
            "Xavier lives in the red house. Xavier does not live in the red house. \
             Where does Xavier live?",
        );
        assert_eq!(
            puzzle.transcript(&solver),
            "1. Xavier lives in the red house.\n\
             2. Xavier does not live in the red house.\n\
             \n\
             That's impossible.\n"
        );
    }
}
