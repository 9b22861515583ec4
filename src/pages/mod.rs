//! Page controllers and the flow driver.
//!
//! The client is a fixed tour: register → question → answer → report →
//! feedback → thank-you. Each page runs until it yields a
//! [`Transition`] and the driver walks them, enforcing the entry
//! guards the browser client enforced with redirects.

pub mod answer;
pub mod feedback;
pub mod question;
pub mod register;
pub mod report;
pub mod thanks;

use std::io::{self, Write};

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;

use crate::api::Backend;
use crate::session::Session;
use crate::stream::reducer::AccumulationMode;

/// The six pages of the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageId {
    Register,
    Question,
    Answer,
    Report,
    Feedback,
    ThankYou,
}

/// Where a page sends the flow next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Goto(PageId),
    Quit,
}

/// The page a visit gets redirected to when session context it needs
/// is missing, or `None` when the visit may proceed.
pub fn guard_redirect(page: PageId, session: &Session) -> Option<PageId> {
    let allowed = match page {
        PageId::Register | PageId::ThankYou => true,
        PageId::Question => session.nickname.is_some(),
        PageId::Answer => session.nickname.is_some() && session.question.is_some(),
        PageId::Report => session.question_id.is_some(),
        PageId::Feedback => session.nickname.is_some(),
    };
    (!allowed).then_some(PageId::Register)
}

/// Drive the whole flow from registration to exit.
pub async fn run_flow(backend: &dyn Backend, mode: AccumulationMode) -> Result<()> {
    let mut session = Session::new();
    let mut prompt = Prompt::new();
    let mut page = PageId::Register;

    loop {
        if let Some(redirect) = guard_redirect(page, &session) {
            debug!(from = ?page, to = ?redirect, "missing session context, redirecting");
            page = redirect;
            continue;
        }
        let transition = match page {
            PageId::Register => register::run(&mut prompt, &mut session).await?,
            PageId::Question => question::run(&mut prompt, &mut session).await?,
            PageId::Answer => answer::run(&mut prompt, &mut session, backend, mode).await?,
            PageId::Report => report::run(&mut prompt, &mut session, backend).await?,
            PageId::Feedback => feedback::run(&mut prompt, &mut session, backend).await?,
            PageId::ThankYou => thanks::run(&mut prompt, &mut session).await?,
        };
        match transition {
            Transition::Goto(next) => page = next,
            Transition::Quit => break,
        }
    }
    Ok(())
}

/// Line-oriented prompting over async stdin.
pub struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Show `label` and read one trimmed line. `None` means stdin
    /// closed (Ctrl+D).
    pub async fn line(&mut self, label: &str) -> Result<Option<String>> {
        print!("{label}");
        io::stdout().flush()?;
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }

    /// Ask a yes/no question, re-asking until the answer parses.
    pub async fn yes_no(&mut self, label: &str) -> Result<Option<bool>> {
        loop {
            let Some(answer) = self.line(&format!("{label} (y/n): ")).await? else {
                return Ok(None);
            };
            match answer.to_lowercase().as_str() {
                "y" | "yes" | "네" | "예" => return Ok(Some(true)),
                "n" | "no" | "아니요" | "아니오" => return Ok(Some(false)),
                _ => println!("y 또는 n으로 답해주세요."),
            }
        }
    }

    /// Ask for a 1-5 star rating, re-asking until valid.
    pub async fn rating(&mut self, label: &str) -> Result<Option<u8>> {
        loop {
            let Some(answer) = self.line(&format!("{label} (1-5): ")).await? else {
                return Ok(None);
            };
            match answer.parse::<u8>() {
                Ok(stars @ 1..=5) => return Ok(Some(stars)),
                _ => println!("모든 항목에 별점을 선택해 주세요"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registered() -> Session {
        let mut session = Session::new();
        session.nickname = Some("홍길동".to_string());
        session
    }

    #[test]
    fn fresh_session_may_only_enter_register_and_thanks() {
        let session = Session::new();
        assert_eq!(guard_redirect(PageId::Register, &session), None);
        assert_eq!(guard_redirect(PageId::ThankYou, &session), None);
        for page in [
            PageId::Question,
            PageId::Answer,
            PageId::Report,
            PageId::Feedback,
        ] {
            assert_eq!(
                guard_redirect(page, &session),
                Some(PageId::Register),
                "page: {page:?}"
            );
        }
    }

    #[test]
    fn nickname_unlocks_question_and_feedback() {
        let session = registered();
        assert_eq!(guard_redirect(PageId::Question, &session), None);
        assert_eq!(guard_redirect(PageId::Feedback, &session), None);
    }

    #[test]
    fn answer_needs_a_question_too() {
        let mut session = registered();
        assert_eq!(
            guard_redirect(PageId::Answer, &session),
            Some(PageId::Register)
        );
        session.question = Some("노트북 추천해주세요".to_string());
        assert_eq!(guard_redirect(PageId::Answer, &session), None);
    }

    #[test]
    fn report_needs_the_server_assigned_question_id() {
        let mut session = registered();
        session.question = Some("노트북 추천해주세요".to_string());
        assert_eq!(
            guard_redirect(PageId::Report, &session),
            Some(PageId::Register)
        );
        session.question_id = Some(42);
        assert_eq!(guard_redirect(PageId::Report, &session), None);
    }
}
