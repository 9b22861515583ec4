//! Satisfaction survey page.

use anyhow::Result;
use tracing::warn;

use crate::api::{Backend, FeedbackForm};
use crate::session::Session;
use crate::spinner::Spinner;

use super::{PageId, Prompt, Transition};

pub async fn run(
    prompt: &mut Prompt,
    session: &mut Session,
    backend: &dyn Backend,
) -> Result<Transition> {
    let nickname = session.nickname.clone().unwrap_or_default();

    println!();
    println!("사용자 만족도 조사");
    println!("{nickname}님의 소중한 피드백을 부탁드려요!");
    println!();

    if session.report.is_some() || session.question_id.is_some() {
        let Some(review) = prompt.yes_no("AIQ 보고서 다시 보기?").await? else {
            return Ok(Transition::Quit);
        };
        if review {
            return Ok(Transition::Goto(PageId::Report));
        }
    }

    let Some(convenience) = prompt.rating("비교 과정이 덜 번거로웠나요?").await? else {
        return Ok(Transition::Quit);
    };
    println!("{convenience}점");
    let Some(intention) = prompt
        .rating("이런 서비스가 있다면 사용할 의향이 있나요?")
        .await?
    else {
        return Ok(Transition::Quit);
    };
    println!("{intention}점");

    println!();
    println!("AIQ의 개선사항을 피드백 해주세요!");
    let Some(comment) = prompt
        .line("사용하면서 느꼈던 점이나 개선 사항을 자유롭게 적어주세요.\n> ")
        .await?
    else {
        return Ok(Transition::Quit);
    };

    let form = FeedbackForm {
        nickname,
        phone_number: session.phone_number.clone().unwrap_or_default(),
        convenience_rating: convenience,
        intention_rating: intention,
        comment,
    };

    let spinner = Spinner::start("제출 중...");
    match backend.submit_feedback(&form).await {
        Ok(()) => {
            spinner.finish_with("피드백이 제출되었습니다!").await;
            // The tour is over; a restart begins from a blank slate.
            session.clear();
            Ok(Transition::Goto(PageId::ThankYou))
        }
        Err(err) => {
            spinner.stop().await;
            warn!(%err, "feedback submission failed");
            println!("피드백 전송 실패");
            let Some(retry) = prompt.yes_no("다시 제출할까요?").await? else {
                return Ok(Transition::Quit);
            };
            if retry {
                Ok(Transition::Goto(PageId::Feedback))
            } else {
                Ok(Transition::Quit)
            }
        }
    }
}
