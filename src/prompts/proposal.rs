use crate::model::ProposalInputs;
use crate::prompts::{require_text, ComposedPrompt, ResponseShape, Task, ValidationError};

pub struct PriceTier {
    pub name: &'static str,
    pub price: &'static str,
    pub scope: &'static str,
}

/// Quoted verbatim into every proposal; the model must not alter these.
pub const PRICE_TIERS: [PriceTier; 3] = [
    PriceTier {
        name: "STARTER",
        price: "600,000",
        scope: "바이럴 숏폼 대본 1편 + 촬영 구도안 + 기본 편집",
    },
    PriceTier {
        name: "GROWTH",
        price: "1,000,000",
        scope: "숏폼 2편 + 후킹 A/B 테스트 + 메타 광고 세팅 가이드",
    },
    PriceTier {
        name: "PREMIUM",
        price: "2,000,000",
        scope: "숏폼 4편 + 인플루언서 캐스팅 + 월간 퍼포먼스 리포트",
    },
];

const MONTH_LABELS: [&str; 4] = ["M-4", "M-3", "M-2", "M-1"];

pub fn validate(inputs: &ProposalInputs) -> Result<(), ValidationError> {
    require_text("clientName", &inputs.client_name, "client name is required")?;
    require_text("mainProduct", &inputs.main_product, "main product is required")?;
    Ok(())
}

pub fn compose(inputs: &ProposalInputs) -> ComposedPrompt {
    let volumes = MONTH_LABELS
        .iter()
        .zip(inputs.search_volume.iter())
        .map(|(label, value)| {
            let value = value.trim();
            format!("- {label}: {}", if value.is_empty() { "0" } else { value })
        })
        .collect::<Vec<_>>()
        .join("\n");

    let price_list = PRICE_TIERS
        .iter()
        .map(|tier| format!("- {} : {}원 (VAT 별도) / {}", tier.name, tier.price, tier.scope))
        .collect::<Vec<_>>()
        .join("\n");

    let instruction = format!(
        "# [Role]\n\
         당신은 에덴 마케팅의 제안서 디자이너 겸 전략가입니다.\n\
         아래 데이터로 광고주에게 보낼 한 장짜리 HTML 제안서를 작성합니다.\n\n\
         [광고주 정보]\n\
         - 고객사: {}\n\
         - 주력 판매 상품: {}\n\n\
         [최근 4개월 브랜드 키워드 검색량 (과거 → 최신)]\n\
         {volumes}\n\n\
         [에덴 가격 정책 - 절대 수정 금지]\n\
         {price_list}\n\
         위 가격표의 상품명과 금액을 한 글자도 바꾸지 말고 그대로 표기한다. 할인, 추가 상품, 다른 금액을 만들지 않는다.\n\n\
         # [구성]\n\
         1. 시장 진단: 검색량 추이(증감률 계산 포함)로 브랜드 인지도 상태를 진단한다.\n\
         2. 문제 정의: 주력 상품의 숏폼 바이럴 관점 약점을 3가지로 정리한다.\n\
         3. 에덴 맞춤 솔루션: 위 가격표 3개 티어를 비교표로 제시하고 추천 티어 하나를 강조한다.\n\
         4. 기대 효과와 다음 단계.\n\n\
         # [출력 규칙]\n\
         - <!DOCTYPE html>로 시작하는 완결된 단일 HTML 문서만 출력한다. 설명 문장이나 마크다운은 쓰지 않는다.\n\
         - 모든 CSS는 <style> 안에 인라인으로 넣고 외부 리소스를 참조하지 않는다.\n\
         - 인쇄용: @page {{ size: A4; margin: 0; }} 를 포함하고, 본문은 210mm × 297mm 한 페이지에 맞춘다.\n\
         - 브랜드 색상: 메인 #000000, 서브 #FFFFFF, 포인트 #87CEEB.\n",
        inputs.client_name.trim(),
        inputs.main_product.trim(),
    );

    ComposedPrompt {
        task: Task::Proposal,
        instruction,
        shape: ResponseShape::Html,
    }
}

#[cfg(test)]
mod tests {
    use super::{compose, validate};
    use crate::model::ProposalInputs;
    use crate::prompts::{ResponseShape, Task};

    fn inputs(client: &str, volumes: [&str; 4]) -> ProposalInputs {
        ProposalInputs {
            client_name: client.to_owned(),
            main_product: "PDRN 모공 앰플".to_owned(),
            search_volume: volumes.map(str::to_owned),
        }
    }

    #[test]
    fn price_list_is_always_verbatim() {
        for sample in [
            inputs("에덴 코스메틱", ["1200", "1500", "900", "3000"]),
            inputs("2,000,000 Corp", ["", "", "", ""]),
            inputs("x", ["999999999", "0", "0", "1"]),
        ] {
            let prompt = compose(&sample);
            for price in ["600,000", "1,000,000", "2,000,000"] {
                assert!(prompt.instruction.contains(price), "missing {price}");
            }
            assert_eq!(prompt.shape, ResponseShape::Html);
            assert_eq!(prompt.task, Task::Proposal);
            assert!(prompt.shape.schema().is_none());
        }
    }

    #[test]
    fn search_volumes_are_labelled_oldest_first() {
        let prompt = compose(&inputs("에덴", ["10", "20", " ", "40"]));
        assert!(prompt
            .instruction
            .contains("- M-4: 10\n- M-3: 20\n- M-2: 0\n- M-1: 40"));
        assert!(prompt.instruction.contains("@page { size: A4; margin: 0; }"));
    }

    #[test]
    fn client_and_product_are_required() {
        validate(&inputs("에덴", ["0", "0", "0", "0"])).expect("valid inputs");
        let mut missing = inputs("에덴", ["0", "0", "0", "0"]);
        missing.main_product.clear();
        assert_eq!(
            validate(&missing).expect_err("missing product").field,
            "mainProduct"
        );
    }
}
