//! Keyword-based intent classification and name extraction.
//!
//! Both are deliberately naive heuristics: a fixed keyword table decides
//! between lookup and write, and a surname-prefix scan guesses at a person's
//! name. Neither validates against stored data.

/// The classifier's binary judgment of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// The message requests a lookup.
    Query,
    /// The message requests storing a new record.
    Store,
}

impl Intent {
    /// The label injected into the LLM system prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Query => "查询",
            Intent::Store => "记录",
        }
    }
}

/// Keywords indicating a lookup request. Checked first: a message containing
/// both a query and a store keyword classifies as a query.
const QUERY_KEYWORDS: &[&str] = &["查询", "查找", "搜索", "有哪些"];

/// Keywords indicating a write request.
const STORE_KEYWORDS: &[&str] = &["记录", "添加", "保存"];

/// Common single-character surnames recognized by the name heuristic.
const SURNAMES: &[char] = &['张', '李', '王', '刘', '陈', '杨', '黄', '周', '吴', '赵'];

/// Classify a message as a lookup or a write.
///
/// Query keywords strictly outrank store keywords; a message matching
/// neither set defaults to [`Intent::Query`].
pub fn classify(text: &str) -> Intent {
    let lower = text.to_lowercase();
    if QUERY_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Intent::Query;
    }
    if STORE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Intent::Store;
    }
    Intent::Query
}

fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&c)
}

/// Extract the first name-like token from a message.
///
/// A candidate is a recognized surname character followed by one or two CJK
/// ideographs, greedy to two. Heuristic only — no uniqueness or existence
/// guarantee.
pub fn extract_name(text: &str) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if !SURNAMES.contains(&c) {
            continue;
        }
        if i + 1 < chars.len() && is_cjk(chars[i + 1]) {
            let mut name = String::new();
            name.push(c);
            name.push(chars[i + 1]);
            if i + 2 < chars.len() && is_cjk(chars[i + 2]) {
                name.push(chars[i + 2]);
            }
            return Some(name);
        }
    }

    None
}
