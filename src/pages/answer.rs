//! Live answer streaming page.

use std::io::{self, Write};

use anyhow::Result;
use tracing::{debug, warn};

use crate::api::{Backend, QuestionContext};
use crate::consts::EXPECTED_ANSWER_COUNT;
use crate::session::Session;
use crate::spinner::Spinner;
use crate::stream::reducer::{AccumulationMode, AnswerBoard, Applied};
use crate::stream::{Phase, pump};

use super::{PageId, Prompt, Transition};

pub async fn run(
    prompt: &mut Prompt,
    session: &mut Session,
    backend: &dyn Backend,
    mode: AccumulationMode,
) -> Result<Transition> {
    let nickname = session.nickname.clone().unwrap_or_default();
    let question = session.question.clone().unwrap_or_default();

    println!();
    println!("{nickname}님의 질문");
    println!("  {question}");

    let context = QuestionContext {
        nickname,
        phone_number: session.phone_number.clone().unwrap_or_default(),
        question,
    };

    let (board, phase) = stream_answers(backend, &context, mode).await;
    debug_assert!(phase.is_terminal());

    // Whatever happened to the stream, a seen question id unlocks the
    // report page, exactly like the stored browser key did.
    if let Some(id) = board.question_id() {
        session.question_id = Some(id);
    }

    if phase != Phase::Complete {
        return disconnected(prompt).await;
    }

    if session.can_retry() {
        println!();
        let Some(again) = prompt
            .yes_no("1번 더 재질문 할 수 있어요! 재질문할까요?")
            .await?
        else {
            return Ok(Transition::Quit);
        };
        if again {
            session.retry_count += 1;
            session.reset_question();
            return Ok(Transition::Goto(PageId::Question));
        }
    }

    let Some(analyze) = prompt.yes_no("AIQ가 답변을 분석해드릴까요?").await? else {
        return Ok(Transition::Quit);
    };
    if analyze {
        Ok(Transition::Goto(PageId::Report))
    } else {
        Ok(Transition::Quit)
    }
}

/// One connection attempt: open the feed, pump it, and report the
/// terminal [`Phase`] it reached. The feed drops on return, so the
/// line is closed before the user starts reading prompts.
async fn stream_answers(
    backend: &dyn Backend,
    context: &QuestionContext,
    mode: AccumulationMode,
) -> (AnswerBoard, Phase) {
    let mut board = AnswerBoard::new(mode);
    let mut phase = Phase::Connecting;
    debug!(?phase, "opening answer stream");

    let spinner = Spinner::start("연결 중...");
    let mut feed = match backend.open_answer_feed(context).await {
        Ok(feed) => {
            spinner.stop().await;
            feed
        }
        Err(err) => {
            spinner.stop().await;
            warn!(%err, "answer stream failed to open");
            return (board, Phase::Errored);
        }
    };
    phase = Phase::Streaming;
    debug!(?phase, "answer stream open");

    println!("AI들이 답변을 준비하고 있어요...");

    let mut printer = StreamPrinter::new();
    let outcome = pump(
        feed.as_mut(),
        &mut board,
        EXPECTED_ANSWER_COUNT,
        |applied, board| printer.print(applied, board),
    )
    .await;
    if let Err(err) = &outcome {
        warn!(%err, "answer stream ended early");
    }
    phase = Phase::from_pump(&outcome);
    debug!(?phase, "answer stream finished");
    (board, phase)
}

async fn disconnected(prompt: &mut Prompt) -> Result<Transition> {
    println!("연결이 끊어졌습니다. 페이지를 새로고침 해주세요.");
    let Some(again) = prompt.yes_no("다시 연결할까요?").await? else {
        return Ok(Transition::Quit);
    };
    if again {
        Ok(Transition::Goto(PageId::Answer))
    } else {
        Ok(Transition::Quit)
    }
}

/// Prints stream progress as the reducer applies envelopes. Fragments
/// of the answer currently being printed append inline; a switch to
/// another answer re-announces its model first.
struct StreamPrinter {
    current: Option<usize>,
}

impl StreamPrinter {
    fn new() -> Self {
        Self { current: None }
    }

    fn print(&mut self, applied: Applied, board: &AnswerBoard) {
        match applied {
            Applied::QuestionId { .. } => {}
            Applied::Started { index } => {
                let answer = &board.answers()[index];
                println!();
                println!("● {}", answer.model);
                print!("{}", answer.content);
                self.current = Some(index);
                if answer.complete {
                    self.mark_complete(board);
                } else {
                    flush_stdout();
                }
            }
            Applied::Extended {
                index,
                text,
                completed,
            } => {
                if self.current != Some(index) {
                    let answer = &board.answers()[index];
                    println!();
                    println!("● {} (이어서)", answer.model);
                    self.current = Some(index);
                }
                print!("{text}");
                if completed {
                    self.mark_complete(board);
                } else {
                    flush_stdout();
                }
            }
        }
    }

    fn mark_complete(&mut self, board: &AnswerBoard) {
        println!();
        println!(
            "  답변 완료 ({}/{} 완료)",
            board.complete_count(),
            EXPECTED_ANSWER_COUNT
        );
        self.current = None;
    }
}

fn flush_stdout() {
    let _ = io::stdout().flush();
}
