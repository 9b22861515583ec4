//! Offline demo backend.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::stream::envelope::{Envelope, Fragment};
use crate::stream::mock::{ScriptedEvent, ScriptedFeed};
use crate::stream::{AnswerFeed, FeedEvent};

use super::{Backend, FeedbackForm, QuestionContext};

const DEMO_QUESTION_ID: u64 = 12345;

const DEMO_ANSWERS: [(&str, &str, &str); 3] = [
    (
        "ai1",
        "GPT-4",
        "AI 기술은 앞으로 더욱 발전하여 인간의 삶을 편리하게 만들 것입니다. \
         특히 자연어 처리, 컴퓨터 비전, 로보틱스 분야에서 큰 진전이 예상됩니다. \
         다양한 산업에서 자동화와 최적화가 이루어질 것이며, 개인 맞춤형 서비스가 \
         보편화될 것입니다.",
    ),
    (
        "ai2",
        "Gemini",
        "AI 기술은 교육, 의료, 산업 전반에 걸쳐 혁신을 가져올 것입니다. \
         개인화된 서비스와 효율성 향상이 주요 트렌드가 될 것입니다. 멀티모달 \
         AI의 발전으로 텍스트, 이미지, 음성을 통합적으로 이해하는 시스템이 \
         보편화될 전망입니다.",
    ),
    (
        "ai3",
        "Perplexity",
        "AI의 미래는 기술적 발전과 함께 윤리적 고려가 중요해질 것입니다. \
         인간과 AI의 협업이 핵심 키워드가 될 것으로 예상합니다. 투명성과 \
         신뢰성 있는 AI 시스템 구축이 필수적이며, 사회적 합의를 통한 규제 \
         프레임워크 마련이 중요합니다.",
    ),
];

const DEMO_REPORT: &str = "## AI 합의점 보고서\n\n\
    세 AI의 답변을 종합하면 다음과 같은 합의점이 도출됩니다:\n\n\
    1. **기술적 발전**: 모든 AI가 지속적인 기술 발전을 예측\n\
    2. **인간과의 협업**: AI와 인간의 협력이 중요해질 것\n\
    3. **다양한 분야 적용**: 교육, 의료, 산업 등 전반적인 혁신 예상\n\
    4. **윤리적 고려**: 기술 발전과 함께 윤리 문제도 중요\n\n\
    ### 결론\n\
    세 AI 모두 AI 기술의 밝은 미래를 전망하면서도, 책임감 있는 발전의 \
    필요성을 강조하고 있습니다.";

/// Replays a canned session without touching the network. Lets the
/// whole flow run when no server is around.
pub struct DemoBackend;

#[async_trait]
impl Backend for DemoBackend {
    async fn open_answer_feed(
        &self,
        _context: &QuestionContext,
    ) -> Result<Box<dyn AnswerFeed>, ApiError> {
        let mut events = vec![
            ScriptedEvent::Delay(Duration::from_millis(1000)),
            ScriptedEvent::Event(FeedEvent::Envelope(Envelope::Init {
                question_id: DEMO_QUESTION_ID,
            })),
        ];
        for (index, (id, model, content)) in DEMO_ANSWERS.iter().enumerate() {
            let pause = if index == 0 { 1000 } else { 1500 };
            events.push(ScriptedEvent::Delay(Duration::from_millis(pause)));
            events.push(ScriptedEvent::Event(FeedEvent::Envelope(Envelope::Answer(
                Fragment {
                    id: Some((*id).to_string()),
                    model: Some((*model).to_string()),
                    content: (*content).to_string(),
                    complete: true,
                },
            ))));
        }
        Ok(Box::new(ScriptedFeed::new(events)))
    }

    async fn synthesize_report(&self, _question_id: u64) -> Result<String, ApiError> {
        Ok(DEMO_REPORT.to_string())
    }

    async fn submit_feedback(&self, _form: &FeedbackForm) -> Result<(), ApiError> {
        Ok(())
    }
}
