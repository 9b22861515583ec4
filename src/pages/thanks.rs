//! Thank-you page.

use anyhow::Result;

use crate::session::Session;

use super::{PageId, Prompt, Transition};

pub async fn run(prompt: &mut Prompt, session: &mut Session) -> Result<Transition> {
    let nickname = session.nickname.clone().unwrap_or_default();
    // Feedback submission already cleared the session on the normal
    // path; a direct visit must end with a clean slate too.
    session.clear();

    println!();
    if nickname.is_empty() {
        println!("감사합니다!");
    } else {
        println!("{nickname}님, 감사합니다!");
    }
    println!();
    println!("AIQ MVP 테스터로 참여해주셔서 정말 감사합니다.");
    println!("피드백은 AIQ 발전에 큰 도움이 됩니다.");
    println!("정식 출시 시 가장 먼저 알려드릴게요!");
    println!();
    println!("문의: aiq.official@gmail.com");
    println!("AIQ - AI와 함께하는 새로운 경험");
    println!();

    let Some(restart) = prompt.yes_no("다시 테스트하기?").await? else {
        return Ok(Transition::Quit);
    };
    if restart {
        Ok(Transition::Goto(PageId::Register))
    } else {
        Ok(Transition::Quit)
    }
}
