use serde_json::{json, Value};

use crate::model::AdvertiserBrief;
use crate::prompts::{require_text, ComposedPrompt, ResponseShape, Task, ValidationError};
use crate::seed::{FLOW_PATHS, HOOK_STRATEGIES};

const ROLE: &str = "\
# [Role]
당신은 대한민국 상위 1% 뷰티 바이럴 전문 PD이자 대본 작가입니다.
에덴 마케팅의 성공 영상 98개를 전수 분석한 데이터 기반의 '백만 뷰 필승 공식'만을 사용하여 대본을 작성합니다.
";

const KNOWLEDGE_BASE: &str = "\
# [Knowledge Base: 98개 영상 분석 요약]
1. 시청자는 '정보'가 아닌 '시각적 쾌감'과 '가치 전도(가성비)'에 반응한다.
2. 3초 이내에 타겟의 페르소나를 호명하거나 공포/이득을 제시해야 이탈하지 않는다.
3. 숫자는 형용사보다 강력하다. (예: '정말 싸다' 대신 '350원')
4. 문장이 길어지면 뇌는 읽기를 포기한다. 호흡은 최대한 짧게 가져간다.
";

const EDEN_RULES: &str = "\
# [Rule 1: 대본 생성 절대 공식 (The Eden Rules)]
1. 문장 길이: 모든 문장은 공백 제외 18~20자 이내로 작성한다.
2. 원고 분량: 전체 원고는 공백 포함 270-320자 이내로 제한한다.
3. 언어 선택: '너무', '정말', '진짜', '대박' 같은 추상적 형용사를 절대 금지한다.
   - 대체제: 반드시 '1억', '350원', '3일', '8년 차', '1위' 등 구체적인 [수치]와 [명사]로 치환한다.
4. 감정 표현: !!, !?, ..., ?? 등의 기호로 내레이션의 강약을 텍스트에 투영하되 남용하지 않는다.
5. 구조 분리: 문맥이 전환될 때마다(도입-증명-결말) 반드시 문단을 나눈다.
6. Rule 2의 후킹 전략 중 하나만 선택한다.
7. Rule 3의 문맥 흐름 중 하나만 선택한다.
8. 말투는 30대 여성의 말투로 진행한다.

# [Rule 1-A: 부정형 타격 및 손실 회피 화법]
- \"~~하신가요?\" 같은 친절한 질문 금지 -> \"~~하는 사람? 다 틀렸음!!\"
- \"~~하면 좋아요\" 같은 권유 금지 -> \"~~안 하면 무조건 손해임\"
- \"이 제품 어떠세요?\" 같은 광고 멘트 금지 -> \"이거 모르면 평생 고생함\"
- [경고 구간]: [~하지 마], [~지 마라], [~면 피부 망가짐]
- [상식 파괴]: [~아냐], [~다 틀렸어], [~다 거짓말임]
- [결과 강조]: [~면 전멸함], [~로 종결임], [~면 끝남]
- [행동 촉구]: [~당장 바꿔], [~쟁여둬], [~안 하면 손해]
- \"떡칠\", \"박멸\", \"똥손\", \"전멸\" 같은 날것의 단어를 순화하지 않는다.
";

const FIELD_GUIDE: &str = "\
[결과물 JSON 필드 가이드]
- hookStrategy: 후킹 전략 분석 (예: \"손실회피 : 기존 화장품에 실망했던 심리를 자극...\")
- keywordStrategy: 금기어 대체 및 전문성 전략 (예: \"침투 니들을 '흡수길'로 치환하여...\")
- hookType: 선택된 첫문장 기법 이름 (Rule 2 목록 중 하나)
- flowType: 선택된 문맥 흐름 이름 (Rule 3 목록 중 하나)
- charCount: 공백 포함 글자수 (숫자만)
- fullScript: 영상 통 대본 (문단 구분 필수, 오직 스크립트 내용만)
- successPoints: 성공 포인트 3가지
";

pub fn validate_brief(brief: &AdvertiserBrief) -> Result<(), ValidationError> {
    require_text("clientName", &brief.client_name, "client name is required")?;
    require_text("purpose", &brief.purpose, "campaign purpose is required")?;
    Ok(())
}

pub fn validate_tuning(script: &str) -> Result<(), ValidationError> {
    require_text("script", script, "the script to tune is empty")
}

pub fn compose_generation(brief: &AdvertiserBrief) -> ComposedPrompt {
    let instruction = format!(
        "{ROLE}\n\
         [광고주 정보]\n\
         - 고객사: {}\n\
         - 목적: {}\n\
         - 타겟: {}\n\
         - 핵심 메시지: {}\n\
         - 특장점(USP): {}\n\
         - 프로모션: {}\n\
         - 제한사항: {}\n\
         - 요청사항: {}\n\
         - 특별한 스토리: {}\n\n\
         {KNOWLEDGE_BASE}\n\
         {EDEN_RULES}\n\
         {}\n\
         # [Step-by-Step Task]\n\
         1. 광고주 정보를 분석하여 타겟의 '가장 아픈 결핍'을 파악한다.\n\
         2. Rule 2로 후킹을 쓰고, 착한 질문이 나오면 [부정/공포/폭로]형으로 재작성한다. Rule 3의 경로로 문맥을 짠다.\n\
         3. Rule 1의 문장 길이와 분량 규격을 엄격히 검수한다.\n\
         4. 모든 형용사적 표현을 [수치] 데이터로 치환한다.\n\
         5. 중학생이 봐도 이해할 수 있는 쉬운 단어를 쓴다.\n\
         6. 도입부 3문장까지 제품명을 숨기고 '이것', '괴물템', '그 비결'로 지칭한다.\n\
         7. 설명조의 문장은 '날것의 구어체'로 바꾼다.\n\n\
         {FIELD_GUIDE}",
        brief.client_name,
        brief.purpose,
        brief.target_audience,
        brief.key_message,
        brief.usp,
        brief.promotion,
        brief.constraints,
        brief.requests,
        brief.special_story,
        pattern_rules(),
    );

    ComposedPrompt {
        task: Task::ScriptGeneration,
        instruction,
        shape: ResponseShape::Json {
            schema: script_result_schema(),
        },
    }
}

pub fn compose_tuning(script: &str) -> ComposedPrompt {
    let instruction = format!(
        "{ROLE}\n\
         이번 작업은 새 대본 창작이 아니라 [기존 대본 진단 및 튜닝]입니다.\n\
         아래 원본 대본을 에덴 공식으로 진단하고, 규칙을 위반한 부분을 모두 고쳐 완성 대본을 다시 작성하세요.\n\n\
         [원본 대본]\n\
         {script}\n\n\
         {KNOWLEDGE_BASE}\n\
         {EDEN_RULES}\n\
         {}\n\
         # [Diagnosis Task]\n\
         1. 원본의 첫 문장이 Rule 2의 어떤 기법에 가장 가까운지 판별하고, 약하다면 더 강한 기법으로 교체한다.\n\
         2. 원본의 흐름을 Rule 3의 경로 중 하나로 재정렬한다.\n\
         3. 18~20자를 넘는 문장, 추상적 형용사, 정중한 권유형 어미를 모두 찾아 고친다.\n\
         4. 원본의 핵심 정보(제품, 수치, 프로모션)는 유지한다.\n\
         5. hookStrategy와 keywordStrategy에는 원본 대비 무엇을 왜 바꿨는지 진단 내용을 쓴다.\n\n\
         {FIELD_GUIDE}",
        pattern_rules(),
    );

    ComposedPrompt {
        task: Task::ScriptTuning,
        instruction,
        shape: ResponseShape::Json {
            schema: script_result_schema(),
        },
    }
}

pub fn is_known_hook(name: &str) -> bool {
    HOOK_STRATEGIES.iter().any(|hook| name.contains(hook))
}

pub fn is_known_flow(name: &str) -> bool {
    FLOW_PATHS.iter().any(|flow| name.contains(flow))
}

fn pattern_rules() -> String {
    format!(
        "# [Rule 2: 첫 문장 필승 후킹 ({} Hooks)]\n\
         광고주 정보를 분석하여 아래 기법 중 가장 적합한 하나를 선택해 시작한다.\n\
         ({})\n\n\
         # [Rule 3: 문맥의 흐름 ({} Flow Paths)]\n\
         후킹 이후의 흐름은 다음 경로 중 하나를 따른다.\n\
         ({})\n",
        HOOK_STRATEGIES.len(),
        HOOK_STRATEGIES.join(", "),
        FLOW_PATHS.len(),
        FLOW_PATHS.join(", "),
    )
}

fn script_result_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "hookStrategy": { "type": "STRING", "description": "후킹전략 분석 내용" },
            "keywordStrategy": { "type": "STRING", "description": "금기어 대체 및 전문성 전략 내용" },
            "hookType": { "type": "STRING", "description": "선택된 첫문장 후킹 기법 이름" },
            "flowType": { "type": "STRING", "description": "선택된 문맥 흐름 이름" },
            "charCount": { "type": "INTEGER", "description": "공백 포함 총 글자 수" },
            "fullScript": { "type": "STRING", "description": "최종 영상 대본 본문" },
            "successPoints": { "type": "STRING", "description": "성공 포인트 분석" }
        },
        "required": [
            "hookStrategy",
            "keywordStrategy",
            "hookType",
            "flowType",
            "charCount",
            "fullScript",
            "successPoints"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::{compose_generation, compose_tuning, is_known_flow, is_known_hook, validate_brief};
    use crate::model::AdvertiserBrief;
    use crate::prompts::{ResponseShape, Task};

    fn brief() -> AdvertiserBrief {
        AdvertiserBrief {
            client_name: "에덴 화장품 PDRN 앰플".to_owned(),
            purpose: "신규 고객 확보".to_owned(),
            target_audience: "30대 모공 고민녀".to_owned(),
            promotion: "1+1 행사".to_owned(),
            ..AdvertiserBrief::default()
        }
    }

    #[test]
    fn generation_prompt_interpolates_brief_and_is_deterministic() {
        let first = compose_generation(&brief());
        let second = compose_generation(&brief());
        assert_eq!(first, second);
        assert_eq!(first.task, Task::ScriptGeneration);
        assert!(first.instruction.contains("- 고객사: 에덴 화장품 PDRN 앰플"));
        assert!(first.instruction.contains("- 프로모션: 1+1 행사"));
        assert!(first.instruction.contains("캐릭터훅"));
        assert!(first.instruction.contains("상징적투자"));

        let ResponseShape::Json { schema } = &first.shape else {
            panic!("script generation should declare a JSON shape");
        };
        assert_eq!(schema["required"].as_array().map(Vec::len), Some(7));
        assert_eq!(schema["properties"]["charCount"]["type"], "INTEGER");
    }

    #[test]
    fn tuning_uses_same_shape_with_diagnostic_framing() {
        let tuned = compose_tuning("아직도 모공 방치해?");
        assert_eq!(tuned.task, Task::ScriptTuning);
        assert!(tuned.instruction.contains("[원본 대본]\n아직도 모공 방치해?"));
        assert!(tuned.instruction.contains("진단"));
        assert_eq!(tuned.shape, compose_generation(&brief()).shape);
    }

    #[test]
    fn brief_requires_client_and_purpose() {
        validate_brief(&brief()).expect("complete brief should validate");
        let mut missing = brief();
        missing.purpose = "  ".to_owned();
        let error = validate_brief(&missing).expect_err("blank purpose should fail");
        assert_eq!(error.field, "purpose");
    }

    #[test]
    fn pattern_lookup_matches_catalog_names() {
        assert!(is_known_hook("손실회피"));
        assert!(is_known_flow("고통-구원 흐름"));
        assert!(!is_known_hook("아무말"));
    }
}
