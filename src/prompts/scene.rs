use serde_json::{json, Value};

use crate::model::ShotRecord;
use crate::prompts::{require_text, ComposedPrompt, ResponseShape, Task, ValidationError};

pub const RECOMMENDATIONS_PER_SENTENCE: usize = 2;

pub fn validate(script: &str) -> Result<(), ValidationError> {
    require_text("script", script, "the script to analyze is empty")
}

/// The full reference collection is serialized into the instruction so the
/// model can only pick shots that exist.
pub fn compose(script: &str, shots: &[ShotRecord]) -> ComposedPrompt {
    let reference = serde_json::to_string(shots).unwrap_or_else(|_| "[]".to_owned());
    let instruction = format!(
        "# [Role]\n\
         당신은 에덴 마케팅의 성공 영상 98개를 전수 분석한 데이터를 보유한 '시각적 바이럴 공학 전문가'입니다.\n\
         제공된 대본의 각 문장을 분석하여 시청자의 뇌가 반응하는 최적의 촬영 구도안을 매칭합니다.\n\n\
         [대본]\n\
         {script}\n\n\
         [가용 구도 DB (Knowledge Base)]\n\
         {reference}\n\n\
         # [Section 1: 구도 매칭 절대 가이드]\n\
         1. 문장별 분해: 대본을 한 문장씩 뜯어서 각 문장에 가장 어울리는 구도를 [{RECOMMENDATIONS_PER_SENTENCE}개씩] 제안한다.\n\
         2. DB 한정: 반드시 위 구도 DB에 있는 구도만 선택하고, shotName은 DB의 name을 그대로 쓴다.\n\
         3. 직관적 액션: 모델이 즉각 이해할 수 있는 단순하고 강렬한 동작 위주로 전달한다.\n\
         4. 편집 배제: \"줌인 효과\", \"자막 넣기\" 등 편집 기술이 아닌, 촬영 현장의 [카메라 무빙]과 [모델의 신체 동작]만 기술한다.\n\
         5. 예시 링크: 추천 구도 정보에 DB의 원본 link를 반드시 포함한다.\n\
         6. 흐름 검수: 작성이 끝나면 영상 흐름상 어색함이 없는지 다시 한번 체크한다.\n\n\
         # [System Logic: 상세 분석 예시]\n\
         원고: 피부과 원장님이 다시는 오지 말래요..!\n\
         1. [거절 손짓] - 카메라를 향해 단호하게 손바닥을 내밀며 고개를 젓는 동작.\n\
         2. [충격 리액션] - 원장님의 말을 듣고 억울해하며 카메라 앞에서 뒤로 움찔 물러나는 동작.\n\n\
         [Output Format]\n\
         Provide the result strictly as a JSON array matching the schema, ordered by sentenceId starting at 1.\n"
    );

    ComposedPrompt {
        task: Task::ScenePlan,
        instruction,
        shape: ResponseShape::Json {
            schema: scene_plan_schema(),
        },
    }
}

fn scene_plan_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "sentenceId": { "type": "INTEGER" },
                "sentence": { "type": "STRING" },
                "recommendations": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "shotName": { "type": "STRING" },
                            "description": { "type": "STRING" },
                            "link": { "type": "STRING" }
                        },
                        "required": ["shotName", "description", "link"]
                    }
                }
            },
            "required": ["sentenceId", "sentence", "recommendations"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{compose, validate};
    use crate::prompts::Task;
    use crate::seed::seed_shots;

    #[test]
    fn every_reference_shot_is_embedded() {
        let shots = seed_shots();
        let prompt = compose("모공 방치하면 끝남!!\n이거 하나로 종결임.", &shots);
        assert_eq!(prompt.task, Task::ScenePlan);
        for shot in &shots {
            assert!(
                prompt.instruction.contains(&shot.name),
                "missing shot {}",
                shot.name
            );
            assert!(prompt.instruction.contains(&shot.link));
        }
        assert!(prompt.instruction.contains("[2개씩]"));
    }

    #[test]
    fn blank_script_is_rejected() {
        assert!(validate("\n\t ").is_err());
        validate("한 문장.").expect("non-blank script should validate");
    }
}
