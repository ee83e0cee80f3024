//! Question-detection rule table.
//!
//! Each trigger line (numbered item, H3, bold line, paragraph) is checked
//! against an ordered list of `{trigger, predicate, effect}` rules. The first
//! rule whose trigger and predicate both match decides; no match means the
//! line is plain content.
//!
//! Keyword lists are data on a `RuleProfile`. The candidate (test-taking) and
//! reviewer screens share every rule that can open a question; they differ
//! only in which paragraph verbs mark an instruction.

use serde::{Deserialize, Serialize};

/// Which kind of line a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Numbered,
    Heading3,
    Bold,
    Paragraph,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    ContainsQuestionMark,
    /// A lettered option appears within the lookahead window.
    OptionsAhead,
    /// Trimmed, lowercased text equals one of the labels.
    IsLabel(Vec<String>),
    /// Trimmed text has at most this many characters.
    AtMostChars(usize),
    /// Lowercased line text contains any keyword.
    TextContains(Vec<String>),
    /// Lowercased first bold run contains any keyword.
    BoldContains(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Open a new question. `free_text` marks it as needing a text input;
    /// `multiline` picks a textarea over a single-line input.
    Open { free_text: bool, multiline: bool },
    /// Stop evaluating; the line stays plain content.
    Reject,
    /// Mark the open question as needing a multiline text input.
    RequireText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub trigger: Trigger,
    pub predicate: Predicate,
    pub effect: Effect,
}

/// Facts about the line under evaluation.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub text: &'a str,
    pub bold_text: &'a str,
    pub options_ahead: bool,
}

impl Predicate {
    pub fn matches(&self, input: &RuleInput<'_>) -> bool {
        match self {
            Predicate::ContainsQuestionMark => input.text.contains('?'),
            Predicate::OptionsAhead => input.options_ahead,
            Predicate::IsLabel(labels) => {
                let normalized = input.text.trim().to_lowercase();
                labels.iter().any(|l| *l == normalized)
            }
            Predicate::AtMostChars(max) => input.text.trim().chars().count() <= *max,
            Predicate::TextContains(keywords) => contains_any(input.text, keywords),
            Predicate::BoldContains(keywords) => contains_any(input.bold_text, keywords),
        }
    }
}

fn contains_any(text: &str, keywords: &[String]) -> bool {
    let lowered = text.to_lowercase();
    keywords.iter().any(|k| lowered.contains(k.as_str()))
}

/// Named keyword profile for one call site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    #[default]
    Candidate,
    Reviewer,
}

#[derive(Debug, Clone)]
pub struct RuleProfile {
    pub kind: ProfileKind,
    pub rules: Vec<Rule>,
    /// H2 headings containing any of these reset the visible question number.
    pub section_reset_keywords: Vec<String>,
    /// How many following lines are scanned for lettered options.
    pub lookahead: usize,
}

const LOOKAHEAD_LINES: usize = 5;
const MIN_QUESTION_CHARS: usize = 15;

// Shared by every profile: anything that opens a question consumes an id.
const EXERCISE_KEYWORDS: &[&str] = &["ejercicio", "caso de estudio", "caso:"];

const BOLD_QUESTION_KEYWORDS: &[&str] = &["pregunta", "ejercicio"];

const REVIEWER_INSTRUCTION_VERBS: &[&str] = &["evalúe", "analice", "explique", "describa"];

const CANDIDATE_INSTRUCTION_VERBS: &[&str] = &[
    "evalúe", "analice", "explique", "describa", "evalúa", "analiza", "explica", "describe",
];

const QUESTION_LIST_LABELS: &[&str] = &["preguntas:"];

/// Matched case-sensitively, so "aparte" in running text does not reset.
const SECTION_RESET_KEYWORDS: &[&str] = &["Parte"];

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl RuleProfile {
    pub fn for_kind(kind: ProfileKind) -> Self {
        match kind {
            ProfileKind::Candidate => Self::candidate(),
            ProfileKind::Reviewer => Self::reviewer(),
        }
    }

    /// Keyword set used while a candidate is answering a test.
    pub fn candidate() -> Self {
        Self::build(ProfileKind::Candidate, CANDIDATE_INSTRUCTION_VERBS)
    }

    /// Keyword set used on the company's review screen.
    pub fn reviewer() -> Self {
        Self::build(ProfileKind::Reviewer, REVIEWER_INSTRUCTION_VERBS)
    }

    /// Opening rules are identical across profiles so both screens assign
    /// the same ids to one document. Only the instruction verbs differ.
    fn build(kind: ProfileKind, instruction: &[&str]) -> Self {
        let open_choice = Effect::Open {
            free_text: false,
            multiline: false,
        };
        let open_short = Effect::Open {
            free_text: true,
            multiline: false,
        };

        let rules = vec![
            // A list label never opens. A following option run opens even a
            // short item; otherwise short items are list text.
            Rule {
                trigger: Trigger::Numbered,
                predicate: Predicate::IsLabel(owned(QUESTION_LIST_LABELS)),
                effect: Effect::Reject,
            },
            Rule {
                trigger: Trigger::Numbered,
                predicate: Predicate::OptionsAhead,
                effect: open_choice,
            },
            Rule {
                trigger: Trigger::Numbered,
                predicate: Predicate::AtMostChars(MIN_QUESTION_CHARS),
                effect: Effect::Reject,
            },
            Rule {
                trigger: Trigger::Numbered,
                predicate: Predicate::ContainsQuestionMark,
                effect: open_short,
            },
            // Exercises are always answered in prose.
            Rule {
                trigger: Trigger::Heading3,
                predicate: Predicate::TextContains(owned(EXERCISE_KEYWORDS)),
                effect: Effect::Open {
                    free_text: true,
                    multiline: true,
                },
            },
            Rule {
                trigger: Trigger::Bold,
                predicate: Predicate::OptionsAhead,
                effect: open_choice,
            },
            Rule {
                trigger: Trigger::Bold,
                predicate: Predicate::ContainsQuestionMark,
                effect: open_short,
            },
            Rule {
                trigger: Trigger::Bold,
                predicate: Predicate::BoldContains(owned(BOLD_QUESTION_KEYWORDS)),
                effect: open_short,
            },
            Rule {
                trigger: Trigger::Paragraph,
                predicate: Predicate::TextContains(owned(instruction)),
                effect: Effect::RequireText,
            },
        ];

        RuleProfile {
            kind,
            rules,
            section_reset_keywords: owned(SECTION_RESET_KEYWORDS),
            lookahead: LOOKAHEAD_LINES,
        }
    }

    /// First matching effect for the trigger, skipping `Reject` into `None`.
    pub fn evaluate(&self, trigger: Trigger, input: &RuleInput<'_>) -> Option<Effect> {
        self.rules
            .iter()
            .filter(|rule| rule.trigger == trigger)
            .find(|rule| rule.predicate.matches(input))
            .map(|rule| rule.effect)
            .filter(|effect| *effect != Effect::Reject)
    }

    pub fn resets_numbering(&self, section_title: &str) -> bool {
        self.section_reset_keywords
            .iter()
            .any(|k| section_title.contains(k.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(text: &str, options_ahead: bool) -> RuleInput<'_> {
        RuleInput {
            text,
            bold_text: "",
            options_ahead,
        }
    }

    #[test]
    fn test_numbered_label_is_rejected_even_with_options() {
        let profile = RuleProfile::candidate();
        assert_eq!(
            profile.evaluate(Trigger::Numbered, &input("Preguntas:", true)),
            None
        );
        assert_eq!(
            profile.evaluate(Trigger::Numbered, &input("  PREGUNTAS:  ", false)),
            None
        );
    }

    #[test]
    fn test_numbered_short_text_is_rejected() {
        let profile = RuleProfile::candidate();
        // 15 characters exactly.
        assert_eq!(
            profile.evaluate(Trigger::Numbered, &input("¿Qué es Rust???", false)),
            None
        );
    }

    #[test]
    fn test_numbered_short_text_with_options_opens_choice() {
        let profile = RuleProfile::candidate();
        assert_eq!(
            profile.evaluate(Trigger::Numbered, &input("¿Qué es X?", true)),
            Some(Effect::Open {
                free_text: false,
                multiline: false
            })
        );
    }

    #[test]
    fn test_numbered_question_mark_opens_free_text() {
        let profile = RuleProfile::reviewer();
        assert_eq!(
            profile.evaluate(
                Trigger::Numbered,
                &input("¿Qué es la recursividad?", false)
            ),
            Some(Effect::Open {
                free_text: true,
                multiline: false
            })
        );
    }

    #[test]
    fn test_numbered_with_options_opens_choice() {
        let profile = RuleProfile::reviewer();
        assert_eq!(
            profile.evaluate(
                Trigger::Numbered,
                &input("Seleccione la opción correcta", true)
            ),
            Some(Effect::Open {
                free_text: false,
                multiline: false
            })
        );
    }

    #[test]
    fn test_numbered_plain_statement_does_not_open() {
        let profile = RuleProfile::candidate();
        assert_eq!(
            profile.evaluate(
                Trigger::Numbered,
                &input("Lea todas las instrucciones antes", false)
            ),
            None
        );
    }

    #[test]
    fn test_opening_rules_are_shared_across_profiles() {
        let candidate = RuleProfile::candidate();
        let reviewer = RuleProfile::reviewer();
        let opening = |p: &RuleProfile| -> Vec<Rule> {
            p.rules
                .iter()
                .filter(|r| r.trigger != Trigger::Paragraph)
                .cloned()
                .collect()
        };
        assert_eq!(opening(&candidate), opening(&reviewer));

        for text in ["Problema de concurrencia", "Tarea: refactor", "Actividad 2"] {
            assert!(candidate
                .evaluate(Trigger::Heading3, &input(text, false))
                .is_none());
        }
    }

    #[test]
    fn test_heading_exercise_is_multiline_free_text() {
        assert_eq!(
            RuleProfile::reviewer().evaluate(Trigger::Heading3, &input("Caso: API REST", false)),
            Some(Effect::Open {
                free_text: true,
                multiline: true
            })
        );
    }

    #[test]
    fn test_bold_keyword_matches_bold_run_only() {
        let profile = RuleProfile::reviewer();
        let with_keyword = RuleInput {
            text: "**Pregunta 3** Defina un trait",
            bold_text: "Pregunta 3",
            options_ahead: false,
        };
        assert!(profile.evaluate(Trigger::Bold, &with_keyword).is_some());

        let keyword_outside_bold = RuleInput {
            text: "**Nota** esta pregunta es opcional",
            bold_text: "Nota",
            options_ahead: false,
        };
        assert!(profile.evaluate(Trigger::Bold, &keyword_outside_bold).is_none());
    }

    #[test]
    fn test_paragraph_instruction_verbs_per_profile() {
        let text = "Explica tu solución.";
        assert_eq!(
            RuleProfile::candidate().evaluate(Trigger::Paragraph, &input(text, false)),
            Some(Effect::RequireText)
        );
        assert_eq!(
            RuleProfile::reviewer().evaluate(Trigger::Paragraph, &input(text, false)),
            None
        );
        assert_eq!(
            RuleProfile::reviewer()
                .evaluate(Trigger::Paragraph, &input("Explique su respuesta.", false)),
            Some(Effect::RequireText)
        );
    }

    #[test]
    fn test_section_reset() {
        let profile = RuleProfile::candidate();
        assert!(profile.resets_numbering("Parte 2: Práctica"));
        assert!(!profile.resets_numbering("Criterios de evaluación"));
    }

    #[test]
    fn test_section_reset_is_case_sensitive() {
        let profile = RuleProfile::reviewer();
        assert!(!profile.resets_numbering("Información aparte"));
        assert!(!profile.resets_numbering("PARTE 3"));
    }
}
