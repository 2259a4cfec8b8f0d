#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Reads a puzzle file into ordered assertions and questions.
//!
//! A puzzle is plain text. Every non-blank line holds one or more complete
//! sentences; a sentence ends with `.` (an assertion) or `?` (a question).
//! All assertions come before the first question. Runs of whitespace are
//! collapsed, so the text kept for each sentence is its normalised form.

use crate::error::{PuzzleError, PuzzleResult};
use crate::puzzle::sentence::{Assertion, Mutation, Named, Question, capitalize};
use crate::solver::configs::SearchConfig;
use crate::solver::entity::{Kind, Pairing};
use crate::solver::state::Solver;
use itertools::Itertools;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Words of the grammar that can never be used as names.
pub const KEYWORDS: [&str; 21] = [
    "the", "house", "lives", "around", "here", "there", "is", "a", "what", "do", "you", "know",
    "about", "who", "does", "occupant", "of", "not", "live", "in", "where",
];

/// A sentence as it appeared in the input, together with its reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement<T> {
    pub text: String,
    pub form: T,
}

/// A parsed puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Puzzle {
    assertions: Vec<Statement<Assertion>>,
    questions: Vec<Statement<Question>>,
    people: Vec<String>,
    jobs: Vec<String>,
    colors: Vec<String>,
}

impl Puzzle {
    /// Parses a puzzle from a reader.
    ///
    /// # Errors
    ///
    /// Any [`PuzzleError`]: an incomplete line, an assertion after a
    /// question, an unrecognised sentence, a question about an unknown name,
    /// a name that is a keyword or is used for two classes, or a read error.
    pub fn parse<R: BufRead>(reader: R) -> PuzzleResult<Self> {
        let sentences = split_sentences(reader)?;
        let (assertions, questions) = distribute(sentences)?;

        let assertions = assertions
            .into_iter()
            .map(|text| match Assertion::parse(&text) {
                Some(form) => Ok(Statement { text, form }),
                None => Err(PuzzleError::UnformattedAssertion(text)),
            })
            .collect::<PuzzleResult<Vec<_>>>()?;
        let questions = questions
            .into_iter()
            .map(|text| match Question::parse(&text) {
                Some(form) => Ok(Statement { text, form }),
                None => Err(PuzzleError::UnformattedQuestion(text)),
            })
            .collect::<PuzzleResult<Vec<_>>>()?;

        let named = |kind: Kind| {
            assertions
                .iter()
                .flat_map(|a| a.form.names())
                .filter(|&(k, _)| k == kind)
                .map(|(_, name)| name.to_owned())
                .unique()
                .collect_vec()
        };
        let (people, jobs, colors) = (named(Kind::Person), named(Kind::Job), named(Kind::Color));
        let puzzle = Self {
            assertions,
            questions,
            people,
            jobs,
            colors,
        };
        puzzle.check_diction()?;

        debug!(
            assertions = puzzle.assertions.len(),
            questions = puzzle.questions.len(),
            people = puzzle.people.len(),
            jobs = puzzle.jobs.len(),
            colors = puzzle.colors.len(),
            "puzzle parsed"
        );
        Ok(puzzle)
    }

    /// Opens and parses a puzzle file.
    ///
    /// # Errors
    ///
    /// See [`Puzzle::parse`].
    pub fn from_file(path: impl AsRef<Path>) -> PuzzleResult<Self> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    fn check_diction(&self) -> PuzzleResult<()> {
        if let Some((_, name)) = self
            .questions
            .iter()
            .map(|q| q.form.topic())
            .find(|&topic| !self.knows(topic))
        {
            return Err(PuzzleError::UnknownTopic(name.to_owned()));
        }

        if let Some(name) = self
            .names()
            .map(|(_, name)| name)
            .find(|name| KEYWORDS.contains(name))
        {
            return Err(PuzzleError::NameCollision(name.to_owned()));
        }

        // People are compared in their written, capitalised form.
        let people = self.people.iter().map(|name| capitalize(name)).collect_vec();
        let classes = [&people, &self.jobs, &self.colors];
        for (a, b) in classes.iter().tuple_combinations() {
            if let Some(name) = a.iter().find(|name| b.contains(name)) {
                return Err(PuzzleError::NameCollision(name.clone()));
            }
        }
        Ok(())
    }

    fn knows(&self, (kind, name): Named<'_>) -> bool {
        self.named(kind).iter().any(|n| n == name)
    }

    /// Every named entity, people first.
    fn names(&self) -> impl Iterator<Item = Named<'_>> {
        Kind::ALL.into_iter().flat_map(move |kind| {
            self.named(kind)
                .iter()
                .map(move |name| (kind, name.as_str()))
        })
    }

    /// The named entities of one class, in first-seen order.
    #[must_use]
    pub fn named(&self, kind: Kind) -> &[String] {
        match kind {
            Kind::Person => &self.people,
            Kind::Job => &self.jobs,
            Kind::Color => &self.colors,
        }
    }

    #[must_use]
    pub fn people(&self) -> &[String] {
        &self.people
    }

    #[must_use]
    pub fn jobs(&self) -> &[String] {
        &self.jobs
    }

    #[must_use]
    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    #[must_use]
    pub fn assertions(&self) -> &[Statement<Assertion>] {
        &self.assertions
    }

    #[must_use]
    pub fn questions(&self) -> &[Statement<Question>] {
        &self.questions
    }

    /// Feeds the puzzle to `solver` and solves as far as possible.
    ///
    /// The solver is re-seeded from the named entities, given every
    /// assertion, and propagated. If that leaves it undetermined the
    /// case-split search runs, and a decided state replaces `solver`.
    pub fn inform(&self, solver: &mut Solver, config: &SearchConfig) {
        solver.seed(&self.people, &self.jobs, &self.colors);

        for statement in &self.assertions {
            let Some(mutation) = statement.form.mutation() else {
                continue;
            };
            let (Mutation::Associate(a, b) | Mutation::Disassociate(a, b)) = mutation;
            let (Some(a), Some(b)) = (solver.entity(a.0, a.1), solver.entity(b.0, b.1)) else {
                continue;
            };
            let Some(pairing) = Pairing::between(a, b) else {
                continue;
            };
            match mutation {
                Mutation::Associate(..) => solver.associate(pairing),
                Mutation::Disassociate(..) => solver.disassociate(pairing),
            }
        }
        solver.propagate();

        if !solver.is_solved() && !solver.is_impossible() {
            if let Some(decided) = solver.explore_branches(config) {
                *solver = decided;
            }
        }
    }
}

impl FromStr for Puzzle {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.as_bytes())
    }
}

/// Splits the input into normalised sentences, line by line.
fn split_sentences<R: BufRead>(reader: R) -> PuzzleResult<Vec<String>> {
    let mut sentences = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let mut words = line.split_whitespace().peekable();
        if words.peek().is_none() {
            continue;
        }

        let mut sentence = String::new();
        let mut closed = false;
        for word in words {
            closed = word.ends_with(['.', '?']);
            if closed && word.len() == 1 {
                sentence.truncate(sentence.trim_end().len());
                sentence.push_str(word);
            } else {
                sentence.push_str(word);
                if !closed {
                    sentence.push(' ');
                }
            }
            if closed {
                sentences.push(std::mem::take(&mut sentence));
            }
        }
        if !closed {
            return Err(PuzzleError::IncompleteSentence { line: number + 1 });
        }
    }
    Ok(sentences)
}

/// Separates assertions from questions, which must come last.
fn distribute(sentences: Vec<String>) -> PuzzleResult<(Vec<String>, Vec<String>)> {
    let mut assertions = Vec::new();
    let mut questions = Vec::new();
    for sentence in sentences {
        if sentence.ends_with('?') {
            questions.push(sentence);
        } else if questions.is_empty() {
            assertions.push(sentence);
        } else {
            return Err(PuzzleError::AssertionAfterQuestion);
        }
    }
    Ok((assertions, questions))
}
