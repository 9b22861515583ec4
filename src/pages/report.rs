//! Synthesized report page.

use anyhow::Result;
use tracing::warn;

use crate::api::Backend;
use crate::error::ApiError;
use crate::report::render_report;
use crate::session::Session;
use crate::spinner::Spinner;

use super::{PageId, Prompt, Transition};

pub async fn run(
    prompt: &mut Prompt,
    session: &mut Session,
    backend: &dyn Backend,
) -> Result<Transition> {
    println!();
    println!("AI 합의점 보고서");
    println!("AIQ가 분석한 결과입니다");

    let report = match session.report.clone() {
        Some(cached) => cached,
        None => {
            let question_id = session.question_id.unwrap_or_default();
            let spinner = Spinner::start("AIQ가 보고서를 작성하고 있어요...");
            match backend.synthesize_report(question_id).await {
                Ok(report) => {
                    spinner.stop().await;
                    session.report = Some(report.clone());
                    report
                }
                Err(err) => {
                    spinner.stop().await;
                    warn!(%err, "report synthesis failed");
                    let message = match err {
                        ApiError::EmptyReport => "보고서가 비어 있습니다.",
                        _ => "보고서 요청 실패",
                    };
                    println!("{message}");
                    let Some(retry) = prompt.yes_no("다시 시도할까요?").await? else {
                        return Ok(Transition::Quit);
                    };
                    return if retry {
                        Ok(Transition::Goto(PageId::Report))
                    } else {
                        Ok(Transition::Quit)
                    };
                }
            }
        }
    };

    let rendered = render_report(&report);
    println!("{}", rendered.text);

    if !rendered.links.is_empty() {
        println!();
        for (index, link) in rendered.links.iter().enumerate() {
            println!("  [{}] {}", index + 1, link.url);
        }
        loop {
            let Some(choice) = prompt.line("열어볼 링크 번호 (건너뛰려면 Enter): ").await?
            else {
                return Ok(Transition::Quit);
            };
            if choice.is_empty() {
                break;
            }
            match choice.parse::<usize>() {
                Ok(n) if (1..=rendered.links.len()).contains(&n) => {
                    let url = &rendered.links[n - 1].url;
                    // Try to open browser, silently ignore failures (e.g. headless/SSH)
                    let _ = open::that(url);
                    println!("브라우저에서 열었어요: {url}");
                }
                _ => println!("1부터 {}까지의 번호를 입력해주세요.", rendered.links.len()),
            }
        }
    }

    println!();
    println!("보고서를 모두 확인하셨나요?");
    if prompt.line("다음 → (Enter) ").await?.is_none() {
        return Ok(Transition::Quit);
    }
    Ok(Transition::Goto(PageId::Feedback))
}
