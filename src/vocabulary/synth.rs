use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::vocabulary::Word;

pub const CATEGORIES: [&str; 40] = [
    "挨拶", "日常", "基本単語", "動詞", "形容詞", "数字", "時間", "場所", "人間関係", "感情",
    "食事", "買い物", "交通", "旅行", "学校", "仕事", "趣味", "健康", "天気", "色", "動物",
    "言語", "ビジネス", "文化", "科学", "技術", "スポーツ", "音楽", "芸術", "自然", "政治",
    "経済", "IT", "法律", "医学", "心理", "哲学", "宗教", "歴史", "地理",
];

const BASIC_SYLLABLES: [&str; 56] = [
    "가", "나", "다", "라", "마", "바", "사", "아", "자", "차", "카", "타", "파", "하", //
    "고", "노", "도", "로", "모", "보", "소", "오", "조", "초", "코", "토", "포", "호", //
    "구", "누", "두", "루", "무", "부", "수", "우", "주", "추", "쿠", "투", "푸", "후", //
    "기", "니", "디", "리", "미", "비", "시", "이", "지", "치", "키", "티", "피", "히",
];

const INTERMEDIATE_SYLLABLES: [&str; 42] = [
    "갸", "냐", "댜", "랴", "먀", "뱌", "샤", "야", "쟈", "챠", "캬", "탸", "퍄", "햐", //
    "교", "뇨", "됴", "료", "묘", "뵤", "쇼", "요", "죠", "쵸", "쿄", "툐", "표", "효", //
    "규", "뉴", "듀", "류", "뮤", "뷰", "슈", "유", "쥬", "츄", "큐", "튜", "퓨", "휴",
];

const ADVANCED_SYLLABLES: [&str; 42] = [
    "각", "난", "닫", "랄", "맘", "밤", "삭", "악", "잘", "찰", "칵", "탁", "팍", "학", //
    "건", "넌", "던", "런", "먼", "번", "선", "언", "전", "천", "컨", "턴", "펀", "헌", //
    "곰", "놈", "돔", "롬", "몸", "봄", "솜", "옴", "좀", "촘", "콤", "톰", "폼", "홈",
];

const SUFFIXES: [&str; 10] = [
    "하다", "되다", "내다", "들다", "가다", "오다", "이다", "지다", "스럽다", "적이다",
];

const MEANING_ENDINGS: [&str; 10] = ["", "する", "な", "の", "へ", "から", "まで", "と", "が", "を"];

const KANJI: [&str; 48] = [
    "山", "川", "海", "空", "星", "雨", "雪", "風", "火", "水", "地", "木", "花", "鳥", "魚", "人",
    "子", "友", "家", "村", "町", "国", "手", "足", "目", "耳", "口", "心", "頭", "体", "名", "話",
    "歌", "絵", "字", "文", "本", "紙", "車", "船", "光", "音", "力", "物", "事", "時", "場", "色",
];

/// Katakana readings, multi-syllable suffixes included so the longest match
/// wins.
const KATAKANA: &[(&str, &str)] = &[
    ("가", "カ"), ("나", "ナ"), ("다", "タ"), ("라", "ラ"), ("마", "マ"), ("바", "パ"),
    ("사", "サ"), ("아", "ア"), ("자", "チャ"), ("차", "チャ"), ("카", "カ"), ("타", "タ"),
    ("파", "パ"), ("하", "ハ"), ("고", "コ"), ("노", "ノ"), ("도", "ト"), ("로", "ロ"),
    ("모", "モ"), ("보", "ポ"), ("소", "ソ"), ("오", "オ"), ("조", "チョ"), ("초", "チョ"),
    ("코", "コ"), ("토", "ト"), ("포", "ポ"), ("호", "ホ"), ("구", "ク"), ("누", "ヌ"),
    ("두", "トゥ"), ("루", "ル"), ("무", "ム"), ("부", "プ"), ("수", "ス"), ("우", "ウ"),
    ("주", "チュ"), ("추", "チュ"), ("쿠", "ク"), ("투", "トゥ"), ("푸", "プ"), ("후", "フ"),
    ("기", "キ"), ("니", "ニ"), ("디", "ティ"), ("리", "リ"), ("미", "ミ"), ("비", "ピ"),
    ("시", "シ"), ("이", "イ"), ("지", "チ"), ("치", "チ"), ("키", "キ"), ("티", "ティ"),
    ("피", "ピ"), ("히", "ヒ"), ("야", "ヤ"), ("요", "ヨ"), ("유", "ユ"), ("샤", "シャ"),
    ("쇼", "ショ"), ("슈", "シュ"), ("교", "キョ"), ("규", "キュ"), ("료", "リョ"), ("류", "リュ"),
    ("각", "カク"), ("난", "ナン"), ("닫", "タッ"), ("랄", "ラル"), ("맘", "マム"), ("밤", "パム"),
    ("삭", "サク"), ("악", "アク"), ("잘", "チャル"), ("찰", "チャル"), ("칵", "カク"),
    ("탁", "タク"), ("팍", "パク"), ("학", "ハク"), ("선", "ソン"), ("전", "チョン"),
    ("봄", "ポム"), ("몸", "モム"), ("하다", "ハダ"), ("되다", "テダ"), ("내다", "ネダ"),
    ("들다", "トゥルダ"), ("가다", "カダ"), ("오다", "オダ"), ("이다", "イダ"), ("지다", "チダ"),
    ("스럽다", "スロプタ"), ("적이다", "チョギダ"),
];

const MAX_MATCH: usize = 3;

/// Syllables available at `level`; higher levels include the lower sets.
pub fn syllables_for(level: &str) -> Vec<&'static str> {
    let mut set: Vec<&'static str> = BASIC_SYLLABLES.to_vec();
    match level {
        "中級" => set.extend(INTERMEDIATE_SYLLABLES),
        "上級" => {
            set.extend(INTERMEDIATE_SYLLABLES);
            set.extend(ADVANCED_SYLLABLES);
        }
        _ => {}
    }
    set
}

/// 50% 初級, 30% 中級, 20% 上級.
pub fn pick_level<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    let r: f64 = rng.gen_range(0.0..1.0);
    if r < 0.5 {
        "初級"
    } else if r < 0.8 {
        "中級"
    } else {
        "上級"
    }
}

pub fn korean_word<R: Rng + ?Sized>(level: &str, rng: &mut R) -> String {
    let syllables = syllables_for(level);
    let len = rng.gen_range(1..=3);
    let mut word: String = (0..len)
        .filter_map(|_| syllables.choose(rng).copied())
        .collect();
    if level != "初級" && rng.gen_bool(0.3) {
        if let Some(suffix) = SUFFIXES.choose(rng) {
            word.push_str(suffix);
        }
    }
    word
}

pub fn japanese_meaning<R: Rng + ?Sized>(kanji_count: usize, rng: &mut R) -> String {
    let mut meaning: String = (0..kanji_count.clamp(1, 4))
        .filter_map(|_| KANJI.choose(rng).copied())
        .collect();
    if let Some(ending) = MEANING_ENDINGS.choose(rng) {
        meaning.push_str(ending);
    }
    meaning
}

/// Greedy longest-match transliteration. Unmapped syllables pass through.
pub fn katakana_reading(korean: &str) -> String {
    let chars: Vec<char> = korean.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        let matched = (1..=MAX_MATCH.min(chars.len() - i)).rev().find_map(|len| {
            let piece: String = chars[i..i + len].iter().collect();
            KATAKANA
                .iter()
                .find(|(k, _)| *k == piece)
                .map(|(_, kana)| (len, *kana))
        });
        match matched {
            Some((len, kana)) => {
                out.push_str(kana);
                i += len;
            }
            None => {
                out.push(chars[i]);
                i += 1;
            }
        }
    }
    out
}

/// Generate up to `count` words with unique `korean` keys. Gives up after
/// a bounded number of collisions, so small syllable spaces cannot spin.
pub fn generate_words<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Word> {
    let max_attempts = count.saturating_mul(50).max(100);
    let mut seen: HashSet<String> = HashSet::with_capacity(count);
    let mut words = Vec::with_capacity(count);

    let mut attempts = 0;
    while words.len() < count && attempts < max_attempts {
        attempts += 1;
        let level = pick_level(rng);
        let korean = korean_word(level, rng);
        if !seen.insert(korean.clone()) {
            continue;
        }
        let category = CATEGORIES.choose(rng).copied().unwrap_or("日常");
        let kanji_count = korean.chars().count().div_ceil(2);
        let japanese = japanese_meaning(kanji_count, rng);
        let pronunciation = katakana_reading(&korean);
        words.push(Word::new(&korean, &japanese, &pronunciation, category, level));

        if words.len() % 1000 == 0 {
            log::info!("generated {} words", words.len());
        }
    }
    if words.len() < count {
        log::warn!(
            "stopped after {attempts} attempts with {} of {count} words",
            words.len()
        );
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn syllable_sets_grow_with_level() {
        let basic = syllables_for("初級");
        let mid = syllables_for("中級");
        let adv = syllables_for("上級");
        assert_eq!(basic.len(), BASIC_SYLLABLES.len());
        assert!(mid.len() > basic.len());
        assert!(adv.len() > mid.len());
        assert!(basic.iter().all(|s| adv.contains(s)));
    }

    #[test]
    fn beginner_words_have_no_suffix() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..200 {
            let word = korean_word("初級", &mut rng);
            let len = word.chars().count();
            assert!((1..=3).contains(&len), "{word}");
            assert!(word.chars().all(|c| BASIC_SYLLABLES.iter().any(|s| s.starts_with(c))));
        }
    }

    #[test]
    fn level_split_is_roughly_50_30_20() {
        let mut rng = SmallRng::seed_from_u64(11);
        let n = 10_000;
        let mut counts = [0usize; 3];
        for _ in 0..n {
            match pick_level(&mut rng) {
                "初級" => counts[0] += 1,
                "中級" => counts[1] += 1,
                _ => counts[2] += 1,
            }
        }
        let share = |c: usize| c as f64 / n as f64;
        assert!((share(counts[0]) - 0.5).abs() < 0.03);
        assert!((share(counts[1]) - 0.3).abs() < 0.03);
        assert!((share(counts[2]) - 0.2).abs() < 0.03);
    }

    #[test]
    fn katakana_prefers_longest_match() {
        assert_eq!(katakana_reading("가다"), "カダ");
        assert_eq!(katakana_reading("마스럽다"), "マスロプタ");
        assert_eq!(katakana_reading("하나"), "ハナ");
        assert_eq!(katakana_reading("뷁"), "뷁");
    }

    #[test]
    fn generated_words_are_unique_and_complete() {
        let mut rng = SmallRng::seed_from_u64(42);
        let words = generate_words(500, &mut rng);
        assert_eq!(words.len(), 500);
        let keys: HashSet<&str> = words.iter().map(|w| w.korean.as_str()).collect();
        assert_eq!(keys.len(), 500);
        for w in &words {
            assert!(!w.japanese.is_empty());
            assert!(!w.pronunciation.is_empty());
            assert!(CATEGORIES.contains(&w.category.as_str()));
        }
    }

    #[test]
    fn same_seed_same_words() {
        let a = generate_words(20, &mut SmallRng::seed_from_u64(5));
        let b = generate_words(20, &mut SmallRng::seed_from_u64(5));
        assert_eq!(a, b);
    }
}
