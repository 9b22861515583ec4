//! Accumulates stream envelopes into the ordered answer list.
//!
//! The backend has shipped two delivery styles: fragments that must be
//! merged into one record per model (matched by id), and one complete
//! message per model where every payload is its own record. The board
//! supports both as an explicit [`AccumulationMode`]; they are never
//! mixed within one connection. Merge is the default since it is the
//! only one that survives a fragmenting upstream.

use tracing::warn;

use super::envelope::{Envelope, Fragment};

/// One model's answer as accumulated so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    /// Unique within the board. Upstream id, or `ai-N` when synthesized.
    pub id: String,
    /// Display name. Upstream name, its id, or `AI N` as a last resort.
    pub model: String,
    /// Append-only until complete.
    pub content: String,
    /// Monotonic. Once set, a later fragment cannot clear it.
    pub complete: bool,
}

/// How answer fragments combine into records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccumulationMode {
    /// Match fragments to records by id and extend them. Handles
    /// upstreams that split one answer across many events.
    #[default]
    Merge,
    /// Every fragment appends its own record under a synthetic id.
    /// Only for upstreams known to send one complete message per model.
    Append,
}

/// What one envelope did to the board, so the caller can react without
/// diffing the whole answer list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// Question id recorded, or re-observed when `duplicate` is set.
    /// `id` is always the value the board kept.
    QuestionId { id: u64, duplicate: bool },
    /// A new answer record appeared at `index`.
    Started { index: usize },
    /// The record at `index` grew by `text`. `completed` marks the
    /// false-to-true edge of its completion flag.
    Extended {
        index: usize,
        text: String,
        completed: bool,
    },
}

/// Reducer state for one answer-stream connection.
#[derive(Debug, Default)]
pub struct AnswerBoard {
    answers: Vec<Answer>,
    question_id: Option<u64>,
    mode: AccumulationMode,
}

impl AnswerBoard {
    pub fn new(mode: AccumulationMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Fold one envelope into the board. Deterministic: the same board
    /// and envelope always produce the same state and [`Applied`].
    pub fn apply(&mut self, envelope: Envelope) -> Applied {
        match envelope {
            Envelope::Init { question_id } => self.apply_init(question_id),
            Envelope::Answer(fragment) => match self.mode {
                AccumulationMode::Merge => self.merge(fragment),
                AccumulationMode::Append => self.push_new(fragment, true),
            },
        }
    }

    fn apply_init(&mut self, id: u64) -> Applied {
        match self.question_id {
            None => {
                self.question_id = Some(id);
                Applied::QuestionId {
                    id,
                    duplicate: false,
                }
            }
            Some(existing) if existing == id => Applied::QuestionId {
                id,
                duplicate: true,
            },
            Some(existing) => {
                warn!(kept = existing, ignored = id, "conflicting question id on stream");
                Applied::QuestionId {
                    id: existing,
                    duplicate: true,
                }
            }
        }
    }

    fn merge(&mut self, fragment: Fragment) -> Applied {
        if let Some(id) = &fragment.id
            && let Some(index) = self.answers.iter().position(|a| a.id == *id)
        {
            let answer = &mut self.answers[index];
            answer.content.push_str(&fragment.content);
            let completed = !answer.complete && fragment.complete;
            answer.complete |= fragment.complete;
            return Applied::Extended {
                index,
                text: fragment.content,
                completed,
            };
        }
        self.push_new(fragment, false)
    }

    fn push_new(&mut self, fragment: Fragment, synthesize_id: bool) -> Applied {
        let n = self.answers.len() + 1;
        let model = fragment
            .model
            .or_else(|| fragment.id.clone())
            .unwrap_or_else(|| format!("AI {n}"));
        let id = if synthesize_id {
            format!("ai-{n}")
        } else {
            fragment.id.unwrap_or_else(|| format!("ai-{n}"))
        };
        self.answers.push(Answer {
            id,
            model,
            content: fragment.content,
            complete: fragment.complete,
        });
        Applied::Started {
            index: self.answers.len() - 1,
        }
    }

    /// True when exactly `expected` answers are complete. Deliberately
    /// an equality, not "at least": two of three never completes, and
    /// neither does four.
    pub fn is_complete(&self, expected: usize) -> bool {
        self.complete_count() == expected
    }

    pub fn complete_count(&self) -> usize {
        self.answers.iter().filter(|a| a.complete).count()
    }

    /// Answers in first-observation order, which is display order.
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn question_id(&self) -> Option<u64> {
        self.question_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(id: &str, model: &str, content: &str, complete: bool) -> Envelope {
        Envelope::Answer(Fragment {
            id: Some(id.to_string()),
            model: Some(model.to_string()),
            content: content.to_string(),
            complete,
        })
    }

    fn bare(content: &str) -> Envelope {
        Envelope::Answer(Fragment {
            id: None,
            model: None,
            content: content.to_string(),
            complete: true,
        })
    }

    #[test]
    fn distinct_models_keep_first_observation_order() {
        let mut board = AnswerBoard::default();
        board.apply(fragment("ai1", "GPT-4", "a", true));
        board.apply(fragment("ai2", "Gemini", "b", true));
        board.apply(fragment("ai3", "Perplexity", "c", true));

        let models: Vec<&str> = board.answers().iter().map(|a| a.model.as_str()).collect();
        assert_eq!(models, ["GPT-4", "Gemini", "Perplexity"]);
    }

    #[test]
    fn fragments_concatenate_in_arrival_order() {
        let mut board = AnswerBoard::default();
        board.apply(fragment("ai1", "GPT-4", "노트북은 ", false));
        let applied = board.apply(fragment("ai1", "GPT-4", "이게 좋아요", true));

        assert_eq!(board.answers().len(), 1);
        assert_eq!(board.answers()[0].content, "노트북은 이게 좋아요");
        assert_eq!(
            applied,
            Applied::Extended {
                index: 0,
                text: "이게 좋아요".to_string(),
                completed: true,
            }
        );
    }

    #[test]
    fn completion_flag_is_monotonic() {
        let mut board = AnswerBoard::default();
        board.apply(fragment("ai1", "GPT-4", "done", true));
        let applied = board.apply(fragment("ai1", "GPT-4", "", false));

        assert!(board.answers()[0].complete);
        assert_eq!(
            applied,
            Applied::Extended {
                index: 0,
                text: String::new(),
                completed: false,
            }
        );
    }

    #[test]
    fn is_complete_is_exact_equality() {
        let mut board = AnswerBoard::default();
        board.apply(fragment("ai1", "GPT-4", "a", true));
        board.apply(fragment("ai2", "Gemini", "b", true));
        assert!(!board.is_complete(3));

        board.apply(fragment("ai3", "Perplexity", "c", true));
        assert!(board.is_complete(3));
    }

    #[test]
    fn two_of_three_never_completes() {
        let mut board = AnswerBoard::default();
        board.apply(fragment("ai1", "GPT-4", "a", true));
        board.apply(fragment("ai2", "Gemini", "b", false));
        assert!(!board.is_complete(3));
        assert_eq!(board.complete_count(), 1);
    }

    #[test]
    fn four_distinct_answers_overshoot_and_never_complete() {
        // Known brittleness of the equality check: a fourth provider
        // pushes the count past the expectation for good.
        let mut board = AnswerBoard::default();
        for (id, model) in [("ai1", "GPT-4"), ("ai2", "Gemini"), ("ai3", "Perplexity"), ("ai4", "Claude")]
        {
            board.apply(fragment(id, model, "x", true));
        }
        assert_eq!(board.complete_count(), 4);
        assert!(!board.is_complete(3));
    }

    #[test]
    fn init_records_question_id_once() {
        let mut board = AnswerBoard::default();
        let applied = board.apply(Envelope::Init { question_id: 12345 });
        assert_eq!(
            applied,
            Applied::QuestionId {
                id: 12345,
                duplicate: false,
            }
        );
        assert_eq!(board.question_id(), Some(12345));
    }

    #[test]
    fn repeated_init_same_value_is_a_noop() {
        let mut board = AnswerBoard::default();
        board.apply(Envelope::Init { question_id: 12345 });
        let applied = board.apply(Envelope::Init { question_id: 12345 });
        assert_eq!(
            applied,
            Applied::QuestionId {
                id: 12345,
                duplicate: true,
            }
        );
    }

    #[test]
    fn conflicting_init_keeps_the_first_id() {
        let mut board = AnswerBoard::default();
        board.apply(Envelope::Init { question_id: 12345 });
        let applied = board.apply(Envelope::Init { question_id: 999 });
        assert_eq!(board.question_id(), Some(12345));
        assert_eq!(
            applied,
            Applied::QuestionId {
                id: 12345,
                duplicate: true,
            }
        );
    }

    #[test]
    fn idless_fragments_each_get_their_own_record() {
        let mut board = AnswerBoard::default();
        board.apply(bare("first answer"));
        board.apply(bare("second answer"));

        assert_eq!(board.answers().len(), 2);
        assert_eq!(board.answers()[0].id, "ai-1");
        assert_eq!(board.answers()[0].model, "AI 1");
        assert_eq!(board.answers()[1].id, "ai-2");
        assert!(board.answers().iter().all(|a| a.complete));
    }

    #[test]
    fn append_mode_ignores_payload_ids_for_matching() {
        let mut board = AnswerBoard::new(AccumulationMode::Append);
        board.apply(fragment("same", "GPT-4", "a", true));
        board.apply(fragment("same", "GPT-4", "b", true));

        assert_eq!(board.answers().len(), 2);
        assert_eq!(board.answers()[0].id, "ai-1");
        assert_eq!(board.answers()[1].id, "ai-2");
        assert_eq!(board.answers()[1].content, "b");
    }

    #[test]
    fn model_name_falls_back_to_id() {
        let mut board = AnswerBoard::default();
        board.apply(Envelope::Answer(Fragment {
            id: Some("gemini".to_string()),
            model: None,
            content: "hi".to_string(),
            complete: false,
        }));
        assert_eq!(board.answers()[0].model, "gemini");
    }

    #[test]
    fn started_reports_the_new_index() {
        let mut board = AnswerBoard::default();
        assert_eq!(
            board.apply(fragment("ai1", "GPT-4", "a", false)),
            Applied::Started { index: 0 }
        );
        assert_eq!(
            board.apply(fragment("ai2", "Gemini", "b", false)),
            Applied::Started { index: 1 }
        );
    }
}
