//! Prompt builders and reply parsers for the LLM calls.
//!
//! Everything here is pure so the parsing rules can be tested without a
//! provider.

use crate::models::Review;

/// Emotion tags the LLM may assign to a place.
pub const EMOTION_TAG_CHOICES: [&str; 6] = ["정겨움", "편안함", "조용함", "활기참", "소박함", "세심함"];

/// Emotions given to a persisted place when the tags match nothing known.
pub const FALLBACK_EMOTIONS: [&str; 3] = ["정겨움", "편안함", "조용함"];

/// Summary used when a place summary cannot be generated.
pub const DEFAULT_SUMMARY: &str = "요약 정보를 생성할 수 없습니다.";

/// Taste profile used when the LLM describes a place instead of a person.
pub const TASTE_PROFILE_FALLBACK: &str = "따뜻함을 좋아하는 감성탐험가";

const PLACE_ENDINGS: [&str; 3] = ["공간", "장소", "가게"];

const MAX_EXPANDED_EMOTIONS: usize = 5;

/// Review texts to quote in a prompt, at most `limit`.
pub fn review_texts(reviews: &[Review], limit: usize) -> Vec<String> {
    reviews
        .iter()
        .map(|r| r.text.trim())
        .filter(|t| !t.is_empty())
        .take(limit)
        .map(str::to_string)
        .collect()
}

fn quoted_reviews(reviews: &[String]) -> String {
    if reviews.is_empty() {
        return "(리뷰 없음)".to_string();
    }
    reviews
        .iter()
        .map(|r| format!("- {}", r.replace('\n', " ")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One-sentence summary card from reviews.
pub fn summary_card_prompt(
    name: &str,
    rating: Option<f64>,
    reviews: &[String],
    types: &[String],
) -> String {
    let rating = rating
        .map(|r| format!("{:.1}", r))
        .unwrap_or_else(|| "정보 없음".to_string());
    format!(
        "아래는 '{name}' 가게의 실제 구글맵 리뷰 일부입니다.\n\
         평점: {rating}\n\
         업종: {types}\n\n\
         {reviews}\n\n\
         위 리뷰들을 바탕으로 사용자에게 보여줄 요약카드를 작성해줘.\n\n\
         조건:\n\
         - 1문장, 간결하게\n\
         - 리뷰 내용을 반영해 가게의 특징과 분위기를 설명\n\
         - 없는 사실은 절대 추가하지 마\n\
         - 가게 위치, 영업시간, 전화번호는 언급하지 마\n\
         - 예시: \"55년 넘게 연탄불 납작 불고기로 사랑받은 용산의 명소\"",
        types = if types.is_empty() { "정보 없음".to_string() } else { types.join(", ") },
        reviews = quoted_reviews(reviews),
    )
}

/// One-line summary of a place known only by name and address.
pub fn place_summary_prompt(name: &str, address: &str) -> String {
    format!(
        "아래는 가게 정보입니다:\n\
         이름: {name}\n\
         주소: {address}\n\n\
         이 가게의 특징을 리뷰 기반으로 상상하여 간결하고 매력적인 한줄 요약을 작성해 주세요.\n\
         조건:\n\
         - 주소는 반드시 한국어로 표현할 것\n\
         - 결과는 한글로만 작성할 것"
    )
}

/// Strip wrapping quotes and whitespace from a one-line reply.
pub fn parse_summary(reply: &str) -> String {
    reply
        .trim()
        .trim_matches(|c| c == '"' || c == '\'' || c == '“' || c == '”')
        .trim()
        .to_string()
}

pub fn emotion_tags_prompt(name: &str, reviews: &[String], types: &[String]) -> String {
    format!(
        "아래는 '{name}' 가게의 실제 구글맵 리뷰 일부입니다 (업종: {types}).\n\n\
         {reviews}\n\n\
         리뷰를 바탕으로 감정 태그를 생성해줘.\n\
         감정 태그의 종류는 다음과 같아: {choices}\n\
         감정 태그는 2-3개 정도로 작성해줘.\n\
         가장 유사해 보이는 태그 상위순서대로 쉼표로 구분해서 작성해줘.\n\
         예시: 정겨움, 편안함",
        types = if types.is_empty() { "정보 없음".to_string() } else { types.join(", ") },
        reviews = quoted_reviews(reviews),
        choices = EMOTION_TAG_CHOICES.join(", "),
    )
}

fn clean_tag(raw: &str) -> &str {
    raw.trim()
        .trim_start_matches(|c: char| c == '-' || c == '#' || c == '*' || c.is_ascii_digit() || c == '.')
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '[' || c == ']' || c.is_whitespace())
}

/// Known tags from a comma separated reply, in reply order, at most 3.
pub fn parse_emotion_tags(reply: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for raw in reply.split([',', '、', '\n']) {
        let tag = clean_tag(raw);
        if EMOTION_TAG_CHOICES.contains(&tag) && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags.truncate(3);
    tags
}

/// Recommendation text over the enriched places of a session.
pub fn overall_recommendation_prompt(
    location: &str,
    emotions: &[String],
    places: &[(String, String)],
) -> String {
    let emotions = emotions.join(", ");
    let listing = places
        .iter()
        .map(|(name, summary)| format!("- {}: {}", name, summary))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "{location}에서 {emotions} 감정을 느낄 수 있는 가게들을 추천해드립니다.\n\n\
         추천된 가게들:\n\
         {listing}\n\n\
         이 가게들이 {emotions} 감정을 잘 표현하는 이유를 각 가게의 특징과 분위기를 \
         고려해 2~3문장으로 소개해 주세요."
    )
}

/// Text used when the overall recommendation cannot be generated.
pub fn overall_recommendation_fallback(location: &str, emotions: &[String]) -> String {
    format!(
        "{}의 {} 가게 추천이 완료되었습니다.",
        location,
        emotions.join(", ")
    )
}

pub fn emotion_expansion_prompt(known: &[String], input: &[String]) -> String {
    format!(
        "당신은 감정 분류 전문가입니다.\n\
         아래는 사용할 수 있는 감정 태그 목록입니다 (이 목록 외 단어는 절대 사용하지 마세요):\n\n\
         {known}\n\n\
         입력된 감정 태그: {input}\n\n\
         규칙:\n\
         - 반드시 위 목록에 존재하는 감정 태그만 결과로 선택하세요.\n\
         - 입력된 감정과 가장 비슷하거나 함께 쓰일 만한 감정을 3~5개 고르세요.\n\
         - 반드시 JSON 배열 형식으로만 출력하세요. (예: [\"정겨움\", \"편안함\"])\n\
         - 설명, 불필요한 텍스트, 주석 없이 결과만 출력하세요.",
        known = known.join(", "),
        input = input.join(", "),
    )
}

/// Parse an expansion reply: a JSON array, or failing that a comma list.
/// Only names in `known` survive, deduplicated, at most 5.
pub fn parse_emotion_expansion(reply: &str, known: &[String]) -> Vec<String> {
    let trimmed = reply
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let names: Vec<String> = match serde_json::from_str::<Vec<String>>(trimmed) {
        Ok(names) => names,
        Err(_) => trimmed.split(',').map(|s| clean_tag(s).to_string()).collect(),
    };

    let mut expanded: Vec<String> = Vec::new();
    for name in names {
        let name = name.trim();
        if known.iter().any(|k| k == name) && !expanded.iter().any(|e| e == name) {
            expanded.push(name.to_string());
        }
    }
    expanded.truncate(MAX_EXPANDED_EMOTIONS);
    expanded
}

/// Prompt for the nickname-like taste profile of a user.
pub fn taste_profile_prompt(top_emotions: &[String]) -> String {
    format!(
        "다음은 사용자가 좋아하는 가게에 대해 자주 저장한 감정 리스트입니다: {}\n\n\
         이 정보를 바탕으로 사용자가 좋아하는 가게의 분위기 취향을 사람의 특징으로 요약하세요.\n\n\
         조건:\n\
         - 반드시 한 문장, [감정 특징]을 좋아하는 [별명] 형태로 작성하세요.\n\
         - 기호, 마크다운, 따옴표는 절대 쓰지 마세요.\n\
         - 문장은 반드시 사람을 나타내는 명사로 끝나야 합니다. (예: 탐험가, 플래너, 애호가)\n\
         - 공간, 장소, 가게 같은 단어로 끝내지 마세요.\n\
         - 감정 태그는 사람의 성격이 아니라 그 사람이 좋아하는 가게의 특징입니다.\n\n\
         올바른 예시:\n\
         - 따뜻함을 좋아하는 감성탐험가\n\
         - 현대적 감각을 즐기는 스마트 플래너",
        top_emotions.join(", ")
    )
}

/// Clean a taste profile reply. Replies describing a place get the fallback.
pub fn parse_taste_profile(reply: &str) -> String {
    let text = parse_summary(reply);
    let text = text.trim_end_matches(['.', '!']).trim();
    if text.is_empty() || PLACE_ENDINGS.iter().any(|ending| text.ends_with(ending)) {
        TASTE_PROFILE_FALLBACK.to_string()
    } else {
        text.to_string()
    }
}

pub fn closed_store_prompt(closed_store_info: &str, nearby_stores: &[String]) -> String {
    let listing = nearby_stores
        .iter()
        .enumerate()
        .map(|(i, store)| format!("{}. {}", i + 1, store))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "폐업한 가게 정보:\n{closed_store_info}\n\n\
         주변 가게 목록:\n{listing}\n\n\
         폐업한 가게를 아끼던 손님에게 주변 가게 중 대신 방문할 만한 곳을 추천해 주세요.\n\
         - 최대 3곳을 고르고 각각 추천 이유를 한 문장으로 설명하세요.\n\
         - 목록에 없는 가게는 추천하지 마세요."
    )
}

pub fn address_prompt(text: &str) -> String {
    format!(
        "다음 입력을 한국어 주소/가게명으로 정리해 주세요.\n\
         규칙:\n\
         1. 입력이 이미 한국어라면 절대 수정하지 말고 그대로 출력하세요.\n\
         2. 입력이 영어일 경우 번역하지 말고 한국어 발음과 표기법에 맞게 변환하세요.\n\
         3. 주소가 영어식 순서로 되어 있다면 한국식 주소 체계 순서(시/구/동/도로명/번지)로 재배열하세요.\n\
         4. 결과만 출력하세요.\n\n\
         예시:\n\
         입력: 14 한강대로 84길, 용산구, 서울특별시, 대한민국\n\
         출력: 서울특별시 용산구 한강대로84길 14\n\n\
         입력: {text}\n\
         출력:"
    )
}

fn is_hangul(c: char) -> bool {
    matches!(c, '\u{AC00}'..='\u{D7A3}' | '\u{1100}'..='\u{11FF}' | '\u{3130}'..='\u{318F}')
}

/// Hangul present and no Latin letters.
pub fn is_korean_text(text: &str) -> bool {
    text.chars().any(is_hangul) && !text.chars().any(|c| c.is_ascii_alphabetic())
}
