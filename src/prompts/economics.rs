use serde_json::{json, Value};

use crate::model::{AdInputs, EconomicsMode};
use crate::prompts::{ComposedPrompt, ResponseShape, Task, ValidationError};

const SCENARIO_CPCS: [u32; 4] = [300, 500, 800, 1_000];
const ASSUMED_AVG_CPC: u32 = 500;

/// Full analysis needs every performance metric; otherwise the campaign is
/// treated as pre-launch and simulated from price and margin alone.
pub fn select_mode(inputs: &AdInputs) -> EconomicsMode {
    if inputs.cpm != 0.0 && inputs.ctr != 0.0 && inputs.cvr != 0.0 {
        EconomicsMode::Analysis
    } else {
        EconomicsMode::Simulation
    }
}

pub fn validate(inputs: &AdInputs) -> Result<(), ValidationError> {
    for (field, value) in [
        ("price", inputs.price),
        ("margin", inputs.margin),
        ("cpm", inputs.cpm),
        ("ctr", inputs.ctr),
        ("cvr", inputs.cvr),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::new(
                field,
                format!("{field} must be a non-negative number"),
            ));
        }
    }
    if inputs.price == 0.0 || inputs.margin == 0.0 {
        return Err(ValidationError::new(
            if inputs.price == 0.0 { "price" } else { "margin" },
            "price (S) and margin (M) are required",
        ));
    }
    Ok(())
}

pub fn compose(inputs: &AdInputs) -> ComposedPrompt {
    let mode = select_mode(inputs);
    let header = format!(
        "# [Role]\n\
         당신은 메타(페이스북/인스타그램) 광고 퍼포먼스 마케팅 전문가입니다.\n\
         아래 변수로 광고 경제성을 계산하고, 반드시 mode 필드를 \"{mode}\"로 설정한 JSON만 출력하세요.\n\n\
         [입력 변수]\n\
         - S (판매가): {}원\n\
         - M (개당 순마진): {}원\n\
         - CPM (1,000회 노출당 비용): {}원\n\
         - CTR (클릭률): {}%\n\
         - CVR (전환율): {}%\n\n",
        inputs.price, inputs.margin, inputs.cpm, inputs.ctr, inputs.cvr,
    );

    let body = match mode {
        EconomicsMode::Analysis => "\
# [ANALYSIS 모드: 정밀 진단]
1단계 계산 (tableData, 모든 값은 단위를 붙인 문자열):
- marginRate = M / S × 100 (%)
- endRoas (손익분기 ROAS) = S / M × 100 (%)
- optRoas (최적 목표 ROAS) = endRoas × 1.3
- 현재 CPC = CPM / (1000 × CTR / 100)
- mcvr (Max CPC) = M × CVR / 100
- optCpc (적정 CPC) = mcvr × 0.7
- currentRoi = (mcvr - 현재 CPC) / 현재 CPC × 100 (%)
판정 (verdict): 현재 CPC가 mcvr 이하이면 possible = true, 아니면 false. reason에 근거 수치를 쓴다.
2단계 (recommendation): targetRoas, targetCpc, 그리고 CTR/CVR 중 무엇을 얼마나 올려야 하는지 adjustment 한 문장.
3단계 (strategy.actionItems): 소재, 타겟, 랜딩 관점의 실행 항목 3~5개.
"
        .to_owned(),
        EconomicsMode::Simulation => format!(
            "# [SIMULATION 모드: 집행 전 시뮬레이션]\n\
             CPM/CTR/CVR 중 입력되지 않은 값이 있으므로 S와 M만으로 계산한다.\n\
             - survivalRoas (생존 하한선) = S / M × 100 (%)\n\
             - avgCpc: 뷰티 카테고리 평균 CPC {ASSUMED_AVG_CPC}원을 가정\n\
             - requiredCvr = avgCpc / M × 100 (%)\n\
             - scenarios: CPC {}원 각각에 대해 breakEvenCvr = CPC / M × 100, profitableCvr = breakEvenCvr × 1.3\n\
             - advice: 집행 초기 2주 동안 지켜야 할 CPC/CVR 기준과 소재 전략을 3문장 이내로.\n",
            SCENARIO_CPCS
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join("원, "),
        ),
    };

    ComposedPrompt {
        task: Task::AdEconomics,
        instruction: format!("{header}{body}"),
        shape: ResponseShape::Json {
            schema: schema_for(mode),
        },
    }
}

pub fn schema_for(mode: EconomicsMode) -> Value {
    match mode {
        EconomicsMode::Analysis => json!({
            "type": "OBJECT",
            "properties": {
                "mode": { "type": "STRING", "enum": ["ANALYSIS"] },
                "tableData": {
                    "type": "OBJECT",
                    "properties": {
                        "marginRate": { "type": "STRING" },
                        "endRoas": { "type": "STRING" },
                        "optRoas": { "type": "STRING" },
                        "mcvr": { "type": "STRING" },
                        "optCpc": { "type": "STRING" },
                        "currentRoi": { "type": "STRING" }
                    },
                    "required": ["marginRate", "endRoas", "optRoas", "mcvr", "optCpc", "currentRoi"]
                },
                "verdict": {
                    "type": "OBJECT",
                    "properties": {
                        "possible": { "type": "BOOLEAN" },
                        "reason": { "type": "STRING" }
                    },
                    "required": ["possible", "reason"]
                },
                "recommendation": {
                    "type": "OBJECT",
                    "properties": {
                        "targetRoas": { "type": "STRING" },
                        "targetCpc": { "type": "STRING" },
                        "adjustment": { "type": "STRING" }
                    },
                    "required": ["targetRoas", "targetCpc", "adjustment"]
                },
                "strategy": {
                    "type": "OBJECT",
                    "properties": {
                        "actionItems": { "type": "ARRAY", "items": { "type": "STRING" } }
                    },
                    "required": ["actionItems"]
                }
            },
            "required": ["mode", "tableData", "verdict", "recommendation", "strategy"]
        }),
        EconomicsMode::Simulation => json!({
            "type": "OBJECT",
            "properties": {
                "mode": { "type": "STRING", "enum": ["SIMULATION"] },
                "simulation": {
                    "type": "OBJECT",
                    "properties": {
                        "survivalRoas": { "type": "STRING" },
                        "avgCpc": { "type": "STRING" },
                        "requiredCvr": { "type": "STRING" },
                        "scenarios": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "cpc": { "type": "STRING" },
                                    "breakEvenCvr": { "type": "STRING" },
                                    "profitableCvr": { "type": "STRING" }
                                },
                                "required": ["cpc", "breakEvenCvr", "profitableCvr"]
                            }
                        },
                        "advice": { "type": "STRING" }
                    },
                    "required": ["survivalRoas", "avgCpc", "requiredCvr", "scenarios", "advice"]
                }
            },
            "required": ["mode", "simulation"]
        }),
    }
}
