use crate::model::{ShotCategory, ShotRecord, StaffAccount};

pub const SYSTEM_NAME: &str = "EDEN BEAUTY 자비스";

pub const MASTER_STAFF_ID: &str = "bestteameden";
const MASTER_STAFF_PW: &str = "1234";

pub const HOOK_STRATEGIES: [&str; 18] = [
    "상식파괴",
    "손실회피",
    "결과선공개",
    "금지/비밀",
    "논쟁/반박",
    "경험/권위",
    "내부자증언",
    "대비효과",
    "실험/검증",
    "긴급성",
    "타겟저격",
    "시각적질문",
    "오해깨기",
    "구조공식",
    "사회적증명",
    "가격충격",
    "약속/보장",
    "캐릭터훅",
];

pub const FLOW_PATHS: [&str; 10] = [
    "가성비전도",
    "시각카타르시스",
    "내부자밀고",
    "제3자증명",
    "상식재구성",
    "고통-구원",
    "전문기술",
    "시계열신뢰",
    "TPO밀착",
    "상징적투자",
];

// (id, category, name, action, description)
const SEED_SHOTS: [(&str, ShotCategory, &str, &str, &str); 15] = [
    ("1", ShotCategory::Intro, "거절 손짓", "카메라 거부", "카메라를 향해 검지 손가락을 흔들거나 손바닥을 내밀어 강하게 거부하는 동작."),
    ("2", ShotCategory::Intro, "모공 돌진", "초밀착 확대", "고민 부위를 렌즈 5cm 앞까지 0.5초 만에 바짝 밀착시키는 줌."),
    ("3", ShotCategory::Intro, "비밀 귓속말", "속삭임", "카메라 쪽으로 상체를 숙이고 손으로 입 옆을 가려 비밀을 말하는 포즈."),
    ("4", ShotCategory::Intro, "눈물 광공", "슬픈 표정", "거울 속 내 피부를 보며 세상에서 가장 슬픈 표정으로 한숨 쉬거나 울상 짓기."),
    ("5", ShotCategory::Intro, "충격 리액션", "놀람", "핸드폰이나 거울을 보다가 너무 놀라 뒤로 한 걸음 물러나며 입을 벌리는 동작."),
    ("6", ShotCategory::Development, "증거 투척", "내밀기", "영수증, 결제 화면, 혹은 다 쓴 공병 더미를 카메라 렌즈 향해 툭 던지듯 내밀기."),
    ("7", ShotCategory::Development, "매장 진입", "팔로우 샷", "매장이나 샵 입구에서 안쪽 진열대까지 카메라가 모델을 빠르게 따라 들어가는 무빙."),
    ("8", ShotCategory::Development, "도구 삽질", "초근접 사용", "스패출러나 전용 기구로 피부를 긁거나 제품을 펴 바르는 손동작 초근접 샷."),
    ("9", ShotCategory::Development, "공병 폭포", "쏟아내기", "바구니에 담긴 수십 개의 공병을 바닥에 와르르 쏟아내는 역동적 장면."),
    ("10", ShotCategory::Development, "내부자 시점", "핸드헬드", "진열대 사이 혹은 선반 너머로 카메라가 제품을 몰래 지켜보는 듯한 핸드헬드 무빙."),
    ("11", ShotCategory::Climax, "피지 긁기", "결과 포착", "도구에 피지가 뭉쳐 나오는 찰나를 흔들림 없이 포착하는 초밀착 근접 촬영."),
    ("12", ShotCategory::Climax, "바이너리 하프", "피부 반전", "얼굴 반을 손으로 가리고 있다가 문구에 맞춰 손을 치우며 반전 피부 노출."),
    ("13", ShotCategory::Climax, "팩 떼기", "카타르시스", "얼굴에 밀착된 팩을 가장자리부터 쫀득하게 한 번에 떼어내는 1초 컷."),
    ("14", ShotCategory::Climax, "광택 부심", "틸트 샷", "고개를 좌우로 천천히 돌리며 피부의 반사광을 조명에 반사시키는 틸트 샷."),
    ("15", ShotCategory::Climax, "탄력 탱글", "피부 탄력", "검지로 볼을 콕 찔렀을 때 피부가 즉각적으로 차오르는 탄력 시연 샷."),
];

pub fn seed_shots() -> Vec<ShotRecord> {
    SEED_SHOTS
        .iter()
        .map(|(id, category, name, action, description)| ShotRecord {
            id: (*id).to_owned(),
            category: *category,
            name: (*name).to_owned(),
            action: (*action).to_owned(),
            description: (*description).to_owned(),
            link: format!("https://example.com/ref{id}"),
        })
        .collect()
}

pub fn seed_staff() -> Vec<StaffAccount> {
    vec![StaffAccount::new(MASTER_STAFF_ID, MASTER_STAFF_PW)]
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{seed_shots, seed_staff, MASTER_STAFF_ID};

    #[test]
    fn seed_has_fifteen_unique_shots() {
        let shots = seed_shots();
        assert_eq!(shots.len(), 15);
        let ids = shots.iter().map(|shot| shot.id.as_str()).collect::<BTreeSet<_>>();
        assert_eq!(ids.len(), 15);
        assert_eq!(shots[0].link, "https://example.com/ref1");
    }

    #[test]
    fn seed_staff_is_master_only() {
        let staff = seed_staff();
        assert_eq!(staff.len(), 1);
        assert_eq!(staff[0].id, MASTER_STAFF_ID);
        assert_eq!(staff[0].pw, "1234");
    }
}
