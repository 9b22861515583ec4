//! Tester registration page.

use anyhow::Result;

use crate::session::{Session, format_phone, normalize_phone};

use super::{PageId, Prompt, Transition};

pub async fn run(prompt: &mut Prompt, session: &mut Session) -> Result<Transition> {
    println!();
    println!("MVP 테스터 모집");
    println!("AIQ의 첫 번째 테스터가 되어주세요!");
    println!();

    let nickname = loop {
        let Some(name) = prompt.line("이름 (예: 홍길동): ").await? else {
            return Ok(Transition::Quit);
        };
        if name.is_empty() {
            println!("이름을 입력해주세요");
            continue;
        }
        break name;
    };

    println!();
    println!("* 추첨을 통해 스타벅스 기프티콘을 제공해 드립니다!🧋");
    println!("  이벤트에 참여하실 분은 전화번호를 반드시 작성해 주세요.");
    let Some(raw_phone) = prompt.line("전화번호 (선택): ").await? else {
        return Ok(Transition::Quit);
    };
    let phone = normalize_phone(&raw_phone);
    if !phone.is_empty() {
        println!("전화번호: {}", format_phone(&phone));
    }

    println!();
    println!("*위 조건에 부합하신 분만 테스트에 참여해 주세요.");
    loop {
        let Some(bought) = prompt
            .yes_no("최근 2년 내, 중·고가 제품을 2회 이상 구매한 경험이 있나요? (ex. 수십만~수백만 원대)")
            .await?
        else {
            return Ok(Transition::Quit);
        };
        let Some(compared) = prompt
            .yes_no("AI 2개 이상으로 쇼핑 비교를 해본 적이 있나요? (ex. GPT · Gemini · Perplexity)")
            .await?
        else {
            return Ok(Transition::Quit);
        };
        if bought && compared {
            break;
        }
        println!("위의 해당사항을 충족해야 참여할 수 있습니다.");
    }

    session.nickname = Some(nickname);
    session.phone_number = (!phone.is_empty()).then_some(phone);

    println!();
    println!("테스터 참여 시 개인정보 수집에 동의하게 됩니다.");
    println!("MVP 테스트 하러가기 →");
    Ok(Transition::Goto(PageId::Question))
}
