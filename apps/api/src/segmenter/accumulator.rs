//! Question Accumulator: one pass over the classified lines of a test document.
//!
//! State is threaded explicitly through `Accumulator` (`next_id`, the open
//! question, emitted questions and blocks), so `segment` is a pure function
//! from `(text, profile)` to `SegmentedTest`.
//!
//! Ids are consumed when a question *opens*. A question that never gathers an
//! answer slot is discarded at flush time, but its id is not handed out again.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::segmenter::classify::{classify, first_bold_text, InlineSegment, LineKind};
use crate::segmenter::rules::{Effect, RuleInput, RuleProfile, Trigger};

/// One lettered choice of a single-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub letter: char,
    pub text: String,
}

impl ChoiceOption {
    /// The exact string stored in the answer store when this option is picked.
    pub fn value(&self) -> String {
        format!("{}) {}", self.letter, self.text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    FreeText,
    SingleChoice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Synthetic `q<N>` id, stable for a given input text.
    pub id: String,
    /// Human-visible number; may restart per "Parte" section.
    pub number: u32,
    pub source_text: String,
    pub kind: QuestionKind,
    pub options: Vec<ChoiceOption>,
    pub multiline: bool,
}

/// A display block. The accumulator leaves `selected` and `value` empty;
/// `render::bind` fills them from an answer store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading {
        level: u8,
        text: String,
    },
    Question {
        question_id: String,
        number: u32,
        segments: Vec<InlineSegment>,
    },
    Option {
        question_id: String,
        letter: char,
        text: String,
        value: String,
        selected: bool,
    },
    TextInput {
        question_id: String,
        multiline: bool,
        value: String,
    },
    Paragraph {
        text: String,
    },
    Instruction {
        text: String,
    },
    Emphasis {
        segments: Vec<InlineSegment>,
    },
    Bullet {
        text: String,
    },
    Numbered {
        number: u32,
        text: String,
    },
    Code {
        language: String,
        text: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentedTest {
    pub questions: Vec<Question>,
    pub blocks: Vec<Block>,
}

impl SegmentedTest {
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

#[derive(Debug)]
struct OpenQuestion {
    id: String,
    number: u32,
    source_text: String,
    options: Vec<ChoiceOption>,
    needs_text: bool,
    multiline: bool,
}

impl OpenQuestion {
    fn has_content(&self) -> bool {
        !self.options.is_empty() || self.needs_text
    }
}

struct Accumulator<'p> {
    profile: &'p RuleProfile,
    next_id: u32,
    display_number: u32,
    open: Option<OpenQuestion>,
    questions: Vec<Question>,
    blocks: Vec<Block>,
}

impl<'p> Accumulator<'p> {
    fn new(profile: &'p RuleProfile) -> Self {
        Accumulator {
            profile,
            next_id: 1,
            display_number: 0,
            open: None,
            questions: Vec::new(),
            blocks: Vec::new(),
        }
    }

    fn open_question(&mut self, source_text: &str, segments: Vec<InlineSegment>, effect: Effect) {
        let Effect::Open {
            free_text,
            multiline,
        } = effect
        else {
            return;
        };

        let id = format!("q{}", self.next_id);
        self.next_id += 1;
        self.display_number += 1;
        debug!(question_id = %id, number = self.display_number, "opened question");

        self.blocks.push(Block::Question {
            question_id: id.clone(),
            number: self.display_number,
            segments,
        });
        self.open = Some(OpenQuestion {
            id,
            number: self.display_number,
            source_text: source_text.to_string(),
            options: Vec::new(),
            needs_text: free_text,
            multiline,
        });
    }

    fn flush(&mut self) {
        let Some(open) = self.open.take() else {
            return;
        };

        if !open.options.is_empty() {
            for option in &open.options {
                self.blocks.push(Block::Option {
                    question_id: open.id.clone(),
                    letter: option.letter,
                    text: option.text.clone(),
                    value: option.value(),
                    selected: false,
                });
            }
            self.questions.push(Question {
                id: open.id,
                number: open.number,
                source_text: open.source_text,
                kind: QuestionKind::SingleChoice,
                options: open.options,
                multiline: false,
            });
        } else if open.needs_text {
            self.blocks.push(Block::TextInput {
                question_id: open.id.clone(),
                multiline: open.multiline,
                value: String::new(),
            });
            self.questions.push(Question {
                id: open.id,
                number: open.number,
                source_text: open.source_text,
                kind: QuestionKind::FreeText,
                options: Vec::new(),
                multiline: open.multiline,
            });
        } else {
            debug!(question_id = %open.id, "discarded question without answer slot");
        }
    }

    fn options_ahead(&self, lines: &[&str], index: usize) -> bool {
        lines
            .iter()
            .skip(index + 1)
            .take(self.profile.lookahead)
            .any(|line| classify(line).is_lettered_option())
    }

    fn finish(mut self) -> SegmentedTest {
        self.flush();
        debug!(
            profile = ?self.profile.kind,
            questions = self.questions.len(),
            ids_consumed = self.next_id - 1,
            "segmented test document"
        );
        SegmentedTest {
            questions: self.questions,
            blocks: self.blocks,
        }
    }
}

fn plain(text: &str) -> Vec<InlineSegment> {
    vec![InlineSegment {
        text: text.to_string(),
        bold: false,
    }]
}

/// Partitions a test document into questions and display blocks.
pub fn segment(text: &str, profile: &RuleProfile) -> SegmentedTest {
    let lines: Vec<&str> = text.lines().collect();
    let mut acc = Accumulator::new(profile);
    let mut i = 0;

    while i < lines.len() {
        match classify(lines[i]) {
            LineKind::CodeFence { language } => {
                acc.flush();
                // An unmatched fence runs to the end of the document.
                let close = lines[i + 1..]
                    .iter()
                    .position(|l| l.starts_with("```"))
                    .map(|offset| i + 1 + offset)
                    .unwrap_or(lines.len());
                let body = lines[i + 1..close].join("\n");
                if !body.trim().is_empty() {
                    acc.blocks.push(Block::Code {
                        language,
                        text: body.trim().to_string(),
                    });
                }
                i = close;
            }
            LineKind::H1(text) => {
                acc.flush();
                acc.blocks.push(Block::Heading { level: 1, text });
            }
            LineKind::H2(text) => {
                acc.flush();
                if profile.resets_numbering(&text) {
                    acc.display_number = 0;
                }
                acc.blocks.push(Block::Heading { level: 2, text });
            }
            LineKind::H3(text) => {
                acc.flush();
                let input = RuleInput {
                    text: &text,
                    bold_text: "",
                    options_ahead: false,
                };
                match profile.evaluate(Trigger::Heading3, &input) {
                    Some(effect @ Effect::Open { .. }) => {
                        acc.open_question(&text, plain(&text), effect)
                    }
                    _ => acc.blocks.push(Block::Heading { level: 3, text }),
                }
            }
            LineKind::LetteredOption { letter, text } => match acc.open.as_mut() {
                Some(open) => open.options.push(ChoiceOption { letter, text }),
                None => debug!(%letter, "dropped option outside any question"),
            },
            LineKind::Bullet(text) => acc.blocks.push(Block::Bullet { text }),
            LineKind::NumberedItem { number, rest } => {
                acc.flush();
                let input = RuleInput {
                    text: &rest,
                    bold_text: "",
                    options_ahead: acc.options_ahead(&lines, i),
                };
                match profile.evaluate(Trigger::Numbered, &input) {
                    Some(effect @ Effect::Open { .. }) => {
                        acc.open_question(&rest, plain(&rest), effect)
                    }
                    _ => acc.blocks.push(Block::Numbered { number, text: rest }),
                }
            }
            LineKind::Bold(segments) => {
                acc.flush();
                let line = lines[i];
                let input = RuleInput {
                    text: line,
                    bold_text: first_bold_text(&segments),
                    options_ahead: acc.options_ahead(&lines, i),
                };
                match profile.evaluate(Trigger::Bold, &input) {
                    Some(effect @ Effect::Open { .. }) => acc.open_question(line, segments, effect),
                    _ => acc.blocks.push(Block::Emphasis { segments }),
                }
            }
            LineKind::Blank => {
                if acc.open.as_ref().is_some_and(OpenQuestion::has_content) {
                    acc.flush();
                }
            }
            LineKind::Paragraph(text) => {
                let input = RuleInput {
                    text: &text,
                    bold_text: "",
                    options_ahead: false,
                };
                let requires_text = acc.open.is_some()
                    && profile.evaluate(Trigger::Paragraph, &input) == Some(Effect::RequireText);
                match acc.open.as_mut() {
                    Some(open) if requires_text => {
                        open.needs_text = true;
                        open.multiline = true;
                        acc.blocks.push(Block::Instruction { text });
                    }
                    _ => acc.blocks.push(Block::Paragraph { text }),
                }
            }
        }
        i += 1;
    }

    acc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = "## Parte 1\n1. ¿Qué es X?\nA) Uno\nB) Dos\n\n### Ejercicio: Resuelve\nExplica tu solución.\n";

    const FULL_TEST: &str = r#"# Prueba Técnica: Backend Rust

## Información General
Duración estimada: 90 minutos

## Parte 1: Preguntas Teóricas
1. Preguntas:
2. ¿Cuál de estos tipos implementa Copy por defecto?
A) String
B) Vec<u8>
C) u32
D) Box<i32>

3. ¿Qué es la recursividad y cuándo conviene usarla?

**Pregunta 4:** Explique el modelo de ownership.

## Parte 2: Ejercicio Práctico
### Ejercicio 1: API de tareas
Implemente un endpoint que liste tareas.
```rust
fn main() {}
```

## Criterios de Evaluación
- Claridad del código
- Manejo de errores
"#;

    fn ids(test: &SegmentedTest) -> Vec<&str> {
        test.questions.iter().map(|q| q.id.as_str()).collect()
    }

    #[test]
    fn test_end_to_end_scenario_yields_two_questions() {
        let test = segment(SCENARIO, &RuleProfile::candidate());
        assert_eq!(test.questions.len(), 2);

        let q1 = &test.questions[0];
        assert_eq!(q1.id, "q1");
        assert_eq!(q1.kind, QuestionKind::SingleChoice);
        assert_eq!(q1.options.len(), 2);
        assert_eq!(q1.options[1].value(), "B) Dos");

        let q2 = &test.questions[1];
        assert_eq!(q2.id, "q2");
        assert_eq!(q2.kind, QuestionKind::FreeText);
        assert!(test.blocks.iter().any(|b| matches!(
            b,
            Block::TextInput { question_id, .. } if question_id == "q2"
        )));
    }

    #[test]
    fn test_end_to_end_scenario_same_for_reviewer() {
        let test = segment(SCENARIO, &RuleProfile::reviewer());
        assert_eq!(ids(&test), vec!["q1", "q2"]);
        assert_eq!(test.questions[1].kind, QuestionKind::FreeText);
    }

    #[test]
    fn test_segmenting_is_deterministic() {
        let profile = RuleProfile::reviewer();
        let first = segment(FULL_TEST, &profile);
        let second = segment(FULL_TEST, &profile);
        assert_eq!(first, second);
    }

    #[test]
    fn test_full_document_questions() {
        let test = segment(FULL_TEST, &RuleProfile::reviewer());
        assert_eq!(ids(&test), vec!["q1", "q2", "q3", "q4"]);

        assert_eq!(test.questions[0].kind, QuestionKind::SingleChoice);
        assert_eq!(test.questions[0].options.len(), 4);
        assert_eq!(test.questions[0].options[2].value(), "C) u32");
        assert_eq!(test.questions[1].kind, QuestionKind::FreeText);
        assert!(!test.questions[1].multiline);
        assert_eq!(test.questions[2].kind, QuestionKind::FreeText);
        // Exercise headings always take prose.
        assert_eq!(test.questions[3].kind, QuestionKind::FreeText);
        assert!(test.questions[3].multiline);
    }

    #[test]
    fn test_list_label_renders_as_numbered_text() {
        let test = segment("1. Preguntas:\n", &RuleProfile::candidate());
        assert!(test.questions.is_empty());
        assert_eq!(
            test.blocks,
            vec![Block::Numbered {
                number: 1,
                text: "Preguntas:".to_string()
            }]
        );
    }

    #[test]
    fn test_recursion_question_opens() {
        let test = segment("1. ¿Qué es la recursividad?\n", &RuleProfile::candidate());
        assert_eq!(ids(&test), vec!["q1"]);
        assert_eq!(test.questions[0].kind, QuestionKind::FreeText);
    }

    #[test]
    fn test_display_number_resets_per_part_but_ids_do_not() {
        let doc = "## Parte 1\n1. ¿Qué significa el borrow checker?\n\n## Parte 2\n1. ¿Para qué sirve un lifetime?\n";
        let test = segment(doc, &RuleProfile::candidate());
        assert_eq!(ids(&test), vec!["q1", "q2"]);
        assert_eq!(test.questions[0].number, 1);
        assert_eq!(test.questions[1].number, 1);
    }

    #[test]
    fn test_discarded_question_still_consumes_id() {
        // The bold line opens q1 expecting options, but a heading closes it
        // before any arrive; the stray option is then dropped.
        let doc = "**Seleccione una**\n## Sección\nA) Uno\n\n1. ¿Qué es el pattern matching en Rust?\n";
        let test = segment(doc, &RuleProfile::candidate());
        assert_eq!(ids(&test), vec!["q2"]);
        assert!(!test
            .blocks
            .iter()
            .any(|b| matches!(b, Block::Option { .. })));
    }

    #[test]
    fn test_lookahead_crosses_into_next_item() {
        // The option run five lines below belongs to item 2, but item 1
        // sees it too and opens as a choice question that never gets options.
        let doc = "1. ¿Qué es la recursividad en general?\n2. ¿Cuál es el tipo correcto?\nA) u8\nB) i8\n";
        let test = segment(doc, &RuleProfile::reviewer());
        assert_eq!(ids(&test), vec!["q2"]);
    }

    #[test]
    fn test_ids_strictly_increase() {
        let test = segment(FULL_TEST, &RuleProfile::candidate());
        let numbers: Vec<u32> = test
            .questions
            .iter()
            .map(|q| q.id.trim_start_matches('q').parse().unwrap())
            .collect();
        assert!(numbers.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_orphan_options_are_dropped() {
        let test = segment("A) Uno\nB) Dos\n", &RuleProfile::candidate());
        assert!(test.questions.is_empty());
        assert!(test.blocks.is_empty());
    }

    #[test]
    fn test_options_emitted_after_interleaved_prose() {
        let doc = "**¿Cuál es correcto?**\nA) Uno\nNota al margen\nB) Dos\n";
        let test = segment(doc, &RuleProfile::reviewer());
        assert_eq!(test.questions[0].options.len(), 2);
        let kinds: Vec<&str> = test
            .blocks
            .iter()
            .map(|b| match b {
                Block::Question { .. } => "question",
                Block::Paragraph { .. } => "paragraph",
                Block::Option { .. } => "option",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["question", "paragraph", "option", "option"]);
    }

    #[test]
    fn test_instruction_marks_choice_question_but_options_win() {
        let doc = "1. ¿Cuál de estas opciones es segura?\nA) unsafe\nB) safe\nExplique su elección.\n";
        let test = segment(doc, &RuleProfile::reviewer());
        assert_eq!(test.questions[0].kind, QuestionKind::SingleChoice);
        assert!(test
            .blocks
            .iter()
            .any(|b| matches!(b, Block::Instruction { .. })));
        assert!(!test
            .blocks
            .iter()
            .any(|b| matches!(b, Block::TextInput { .. })));
    }

    #[test]
    fn test_instruction_without_open_question_is_paragraph() {
        let test = segment("Explique su respuesta.\n", &RuleProfile::reviewer());
        assert_eq!(
            test.blocks,
            vec![Block::Paragraph {
                text: "Explique su respuesta.".to_string()
            }]
        );
    }

    #[test]
    fn test_code_block_is_collected_and_closes_question() {
        let doc = "### Ejercicio: Parser\n```rust\nfn parse() {}\n```\nTexto final\n";
        let test = segment(doc, &RuleProfile::reviewer());
        assert_eq!(ids(&test), vec!["q1"]);
        assert!(test.blocks.contains(&Block::Code {
            language: "rust".to_string(),
            text: "fn parse() {}".to_string()
        }));
        assert_eq!(
            test.blocks.last(),
            Some(&Block::Paragraph {
                text: "Texto final".to_string()
            })
        );
    }

    #[test]
    fn test_unclosed_code_fence_runs_to_end() {
        let test = segment("```\nlet x = 1;\n1. ¿No es pregunta aquí dentro?\n", &RuleProfile::candidate());
        assert!(test.questions.is_empty());
        assert_eq!(test.blocks.len(), 1);
    }

    #[test]
    fn test_empty_code_block_is_omitted() {
        let test = segment("```\n\n```\n", &RuleProfile::candidate());
        assert!(test.blocks.is_empty());
    }

    #[test]
    fn test_blank_line_before_options_keeps_question_open() {
        let doc = "**Pregunta 1**\n\nA) Uno\nB) Dos\n";
        let test = segment(doc, &RuleProfile::reviewer());
        assert_eq!(test.questions.len(), 1);
        assert_eq!(test.questions[0].kind, QuestionKind::SingleChoice);
    }

    #[test]
    fn test_blank_line_flushes_question_with_options() {
        let doc = "1. ¿Cuál es el tipo correcto aquí?\nA) u8\n\nB) i8\n";
        let test = segment(doc, &RuleProfile::candidate());
        assert_eq!(ids(&test), vec!["q1"]);
        assert_eq!(test.questions[0].options.len(), 1);
        let options: Vec<char> = test
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Option { letter, .. } => Some(*letter),
                _ => None,
            })
            .collect();
        assert_eq!(options, vec!['A']);
    }

    #[test]
    fn test_profiles_assign_same_ids() {
        let doc = "### Problema: concurrencia\nDescriba su enfoque.\n\n1. ¿Qué es la recursividad en programación?\n";
        let candidate = segment(doc, &RuleProfile::candidate());
        let reviewer = segment(doc, &RuleProfile::reviewer());
        assert_eq!(ids(&candidate), vec!["q1"]);
        assert_eq!(ids(&candidate), ids(&reviewer));
        assert_eq!(
            candidate.questions[0].source_text,
            reviewer.questions[0].source_text
        );

        for doc in [SCENARIO, FULL_TEST] {
            assert_eq!(
                ids(&segment(doc, &RuleProfile::candidate())),
                ids(&segment(doc, &RuleProfile::reviewer()))
            );
        }
    }

    #[test]
    fn test_non_question_bold_is_emphasis() {
        let test = segment("**Nota:** lea todo\n", &RuleProfile::reviewer());
        assert!(test.questions.is_empty());
        assert!(matches!(test.blocks[0], Block::Emphasis { .. }));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(segment("", &RuleProfile::candidate()), SegmentedTest::default());
    }
}
