//! Personality classification and the two-pass type quiz.
//!
//! Answers are tallied per label; the label with the highest count wins.
//! Ties resolve to the label whose first answer came earliest in the sequence.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::catalog::Mission;
use crate::category::{Category, Difficulty};
use crate::error::ValidationError;
use crate::numbers::percent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonalityType {
    Explorer,
    Challenger,
    Social,
    Thinker,
    Steady,
}

/// Display copy for a personality type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub traits: &'static str,
}

impl PersonalityType {
    pub const ALL: &'static [Self] = &[
        Self::Explorer,
        Self::Challenger,
        Self::Social,
        Self::Thinker,
        Self::Steady,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Explorer => "explorer",
            Self::Challenger => "challenger",
            Self::Social => "social",
            Self::Thinker => "thinker",
            Self::Steady => "steady",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Explorer => 0,
            Self::Challenger => 1,
            Self::Social => 2,
            Self::Thinker => 3,
            Self::Steady => 4,
        }
    }

    #[must_use]
    pub const fn info(self) -> TypeInfo {
        match self {
            Self::Explorer => TypeInfo {
                name: "Explorer",
                description: "You grow through new experiences",
                traits: "Curious and adventurous, you enjoy trying new things",
            },
            Self::Challenger => TypeInfo {
                name: "Challenger",
                description: "You grow by taking on hard problems",
                traits: "Goal-oriented, you find satisfaction in overcoming difficulty",
            },
            Self::Social => TypeInfo {
                name: "Connector",
                description: "You grow through relationships",
                traits: "You value people and build synergy through cooperation",
            },
            Self::Thinker => TypeInfo {
                name: "Analyst",
                description: "You grow through deep thinking",
                traits: "Logical and systematic, you think things through",
            },
            Self::Steady => TypeInfo {
                name: "Anchor",
                description: "You grow through consistency",
                traits: "You seek stability and reach goals through steady effort",
            },
        }
    }

    /// Missions the selector prepends when this type biases recommendations.
    #[must_use]
    pub fn recommendations(self) -> Vec<Mission> {
        let entries: &[(&str, &str, Difficulty)] = match self {
            Self::Explorer => &[
                (
                    "Visit a place you have never been",
                    "Spend ten minutes somewhere new in your neighborhood.",
                    Difficulty::Easy,
                ),
                (
                    "Start a new hobby",
                    "Take the first concrete step into a hobby you have been curious about.",
                    Difficulty::Normal,
                ),
            ],
            Self::Challenger => &[
                (
                    "Tackle the task you keep postponing",
                    "Finish the one task you have been avoiding.",
                    Difficulty::Hard,
                ),
                (
                    "Change today's plan on purpose",
                    "Swap one planned activity for something unexpected.",
                    Difficulty::Normal,
                ),
            ],
            Self::Social => &[
                (
                    "Talk to a quiet colleague",
                    "Start a conversation with someone you rarely speak to.",
                    Difficulty::Normal,
                ),
                (
                    "Join a new gathering",
                    "Take part in a group or activity you usually skip.",
                    Difficulty::Hard,
                ),
            ],
            Self::Thinker => &[
                (
                    "Argue the other side",
                    "Spend five minutes arguing for a view you disagree with.",
                    Difficulty::Normal,
                ),
                (
                    "Decide without over-analyzing",
                    "Make one small decision within a minute.",
                    Difficulty::Easy,
                ),
            ],
            Self::Steady => &[
                (
                    "Break one small routine",
                    "Do one habitual thing in a different way today.",
                    Difficulty::Easy,
                ),
                (
                    "Work from a different spot",
                    "Spend an hour working somewhere unfamiliar.",
                    Difficulty::Normal,
                ),
            ],
        };

        entries
            .iter()
            .enumerate()
            .map(|(idx, (title, description, difficulty))| {
                Mission::new(
                    format!("rec-{}-{}", self.as_str(), idx + 1),
                    *title,
                    *description,
                    Category::Recommended,
                    Some(*difficulty),
                )
            })
            .collect()
    }
}

impl fmt::Display for PersonalityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersonalityType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "explorer" => Ok(Self::Explorer),
            "challenger" => Ok(Self::Challenger),
            "social" => Ok(Self::Social),
            "thinker" => Ok(Self::Thinker),
            "steady" => Ok(Self::Steady),
            other => Err(ValidationError::UnknownLabel {
                kind: "personality type",
                value: other.to_string(),
            }),
        }
    }
}

/// Per-label answer counts, remembering where each label first appeared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    counts: [u32; 5],
    first_seen: [Option<usize>; 5],
}

impl Tally {
    #[must_use]
    pub fn from_answers(answers: &[PersonalityType]) -> Self {
        let mut tally = Self::default();
        for (position, answer) in answers.iter().enumerate() {
            let idx = answer.index();
            tally.counts[idx] = tally.counts[idx].saturating_add(1);
            tally.first_seen[idx].get_or_insert(position);
        }
        tally
    }

    #[must_use]
    pub const fn count(&self, label: PersonalityType) -> u32 {
        self.counts[label.index()]
    }

    /// Highest count wins; ties go to the earliest first answer.
    #[must_use]
    pub fn dominant(&self) -> Option<PersonalityType> {
        PersonalityType::ALL
            .iter()
            .copied()
            .filter_map(|label| {
                let first = self.first_seen[label.index()]?;
                Some((label, self.count(label), first))
            })
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.2.cmp(&a.2)))
            .map(|(label, _, _)| label)
    }
}

/// Reduce a sequence of forced-choice answers to one label.
///
/// Returns `None` only when no answers were given.
#[must_use]
pub fn classify(answers: &[PersonalityType]) -> Option<PersonalityType> {
    Tally::from_answers(answers).dominant()
}

/// One forced-choice question; each option maps to a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub prompt: &'static str,
    pub options: [(&'static str, PersonalityType); 5],
}

pub const QUESTIONS: [Question; 3] = [
    Question {
        prompt: "When adapting to a new environment, you...",
        options: [
            ("explore it with curiosity", PersonalityType::Explorer),
            ("treat it as a challenge", PersonalityType::Challenger),
            ("adapt together with others", PersonalityType::Social),
            ("analyze it systematically", PersonalityType::Thinker),
            ("settle in slowly and steadily", PersonalityType::Steady),
        ],
    },
    Question {
        prompt: "Under stress, you...",
        options: [
            ("switch to a new activity", PersonalityType::Explorer),
            ("confront it head-on", PersonalityType::Challenger),
            ("talk it over with people around you", PersonalityType::Social),
            ("analyze the cause and make a plan", PersonalityType::Thinker),
            ("take time and resolve it calmly", PersonalityType::Steady),
        ],
    },
    Question {
        prompt: "Your attitude toward change is...",
        options: [
            ("change is an adventure", PersonalityType::Explorer),
            ("change is a chance to grow", PersonalityType::Challenger),
            ("change matters when shared", PersonalityType::Social),
            ("change deserves careful review", PersonalityType::Thinker),
            ("change is best taken gradually", PersonalityType::Steady),
        ],
    },
];

/// Which classification a quiz pass or override targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizPass {
    Current,
    Target,
}

impl QuizPass {
    const fn label(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Target => "target",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStage {
    Asking { pass: QuizPass, question: usize },
    Result,
}

/// Final quiz answer pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub current: PersonalityType,
    pub target: PersonalityType,
}

/// Two independent passes over [`QUESTIONS`], with manual override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalityQuiz {
    stage: QuizStage,
    current_answers: Vec<PersonalityType>,
    target_answers: Vec<PersonalityType>,
    current: Option<PersonalityType>,
    target: Option<PersonalityType>,
}

impl Default for PersonalityQuiz {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonalityQuiz {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stage: QuizStage::Asking {
                pass: QuizPass::Current,
                question: 0,
            },
            current_answers: Vec::new(),
            target_answers: Vec::new(),
            current: None,
            target: None,
        }
    }

    #[must_use]
    pub const fn stage(&self) -> QuizStage {
        self.stage
    }

    /// The question awaiting an answer, if any.
    #[must_use]
    pub fn question(&self) -> Option<&'static Question> {
        match self.stage {
            QuizStage::Asking { question, .. } => QUESTIONS.get(question),
            QuizStage::Result => None,
        }
    }

    /// Record an answer and advance; finishing a pass classifies it.
    pub fn answer(&mut self, choice: PersonalityType) -> QuizStage {
        let QuizStage::Asking { pass, question } = self.stage else {
            return self.stage;
        };
        let answers = match pass {
            QuizPass::Current => &mut self.current_answers,
            QuizPass::Target => &mut self.target_answers,
        };
        answers.push(choice);

        if question + 1 < QUESTIONS.len() {
            self.stage = QuizStage::Asking {
                pass,
                question: question + 1,
            };
            return self.stage;
        }

        let result = classify(answers);
        let slot = match pass {
            QuizPass::Current => &mut self.current,
            QuizPass::Target => &mut self.target,
        };
        // an overridden label is never replaced by a tally
        if slot.is_none() {
            *slot = result;
        }
        log::debug!("quiz pass {} classified as {result:?}", pass.label());
        self.stage = self.next_stage();
        self.stage
    }

    /// Pick a label directly, bypassing the questions for that pass.
    ///
    /// Answers already given for the pass are dropped. When the override
    /// lands mid-pass the quiz moves on to the next unanswered pass.
    pub fn override_type(&mut self, pass: QuizPass, choice: PersonalityType) {
        match pass {
            QuizPass::Current => {
                self.current = Some(choice);
                self.current_answers.clear();
            }
            QuizPass::Target => {
                self.target = Some(choice);
                self.target_answers.clear();
            }
        }
        if let QuizStage::Asking { pass: asking, .. } = self.stage
            && asking == pass
        {
            self.stage = self.next_stage();
        } else if self.current.is_some() && self.target.is_some() {
            self.stage = QuizStage::Result;
        }
        log::debug!("quiz {} type overridden to {choice}", pass.label());
    }

    /// First pass still missing a label, or the result when none is.
    const fn next_stage(&self) -> QuizStage {
        let pass = match (self.current, self.target) {
            (None, _) => QuizPass::Current,
            (Some(_), None) => QuizPass::Target,
            (Some(_), Some(_)) => return QuizStage::Result,
        };
        QuizStage::Asking {
            pass,
            question: 0,
        }
    }

    /// Overall progress: 0-50 in the first pass, 50-100 in the second.
    #[must_use]
    pub fn progress_percent(&self) -> u32 {
        let total = QUESTIONS.len();
        match self.stage {
            QuizStage::Asking {
                pass: QuizPass::Current,
                question,
            } => percent(question, total * 2),
            QuizStage::Asking {
                pass: QuizPass::Target,
                question,
            } => percent(total + question, total * 2),
            QuizStage::Result => 100,
        }
    }

    #[must_use]
    pub const fn current(&self) -> Option<PersonalityType> {
        self.current
    }

    #[must_use]
    pub const fn target(&self) -> Option<PersonalityType> {
        self.target
    }

    /// Both classifications, once available.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::QuizIncomplete`] naming the missing pass.
    pub fn finish(&self) -> Result<QuizResult, ValidationError> {
        let current = self
            .current
            .ok_or(ValidationError::QuizIncomplete(QuizPass::Current.label()))?;
        let target = self
            .target
            .ok_or(ValidationError::QuizIncomplete(QuizPass::Target.label()))?;
        Ok(QuizResult { current, target })
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
