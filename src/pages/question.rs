//! Question entry page.

use anyhow::Result;

use crate::consts::QUESTION_MAX_CHARS;
use crate::session::Session;

use super::{PageId, Prompt, Transition};

pub async fn run(prompt: &mut Prompt, session: &mut Session) -> Result<Transition> {
    let nickname = session.nickname.clone().unwrap_or_default();

    println!();
    println!("무엇이든 물어보세요!  ({nickname}님)");
    println!("3개의 AI가 여러분의 질문에 답변하고, 합의점을 정리해드립니다.");
    println!();

    let question = loop {
        let Some(question) = prompt
            .line("질문 (예: 200만원대 업무용 노트북 추천해주세요)\n> ")
            .await?
        else {
            return Ok(Transition::Quit);
        };
        if question.is_empty() {
            continue;
        }
        let length = question.chars().count();
        if length > QUESTION_MAX_CHARS {
            println!(
                "질문은 {QUESTION_MAX_CHARS}자까지 입력할 수 있어요. ({length} / {QUESTION_MAX_CHARS})"
            );
            continue;
        }
        println!("{length} / {QUESTION_MAX_CHARS}");
        break question;
    };

    session.question = Some(question);
    println!("질문하기 →");
    Ok(Transition::Goto(PageId::Answer))
}
