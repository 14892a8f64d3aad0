use std::path::{Path, PathBuf};

use serde::Deserialize;
use unicode_normalization::UnicodeNormalization;

use crate::index::model::Language;

/// 默认 CDN 地址（可被 `CDN_URL` 环境变量或 `--cdn-prefix` 覆盖）
pub const DEFAULT_CDN_PREFIX: &str = "https://pub-bff98d8c588c415787d802617e94efc7.r2.dev";

const DEFAULT_ROOT: &str = "public/dse_past_papers";
const DEFAULT_OUTPUT: &str = "data/file-index.json";
const DEFAULT_URL_ROOT: &str = "/dse_past_papers";

/// 科目优先榜：榜内按此序排列，榜外科目按字典序排在其后
const SUBJECT_ORDER: &[&str] = &[
    "中國語文",
    "英國語文",
    "數學",
    "數學延伸單元一",
    "數學延伸單元二",
    "通識教育",
    "物理",
    "化學",
    "生物",
    "經濟",
    "企業、會計與財務概論",
    "中國歷史",
    "歷史",
    "地理",
    "資訊及通訊科技",
    "旅遊與款待",
];

/// 考试类别优先榜
const EXAM_TYPE_PRIORITY: &[&str] = &["DSE", "PP", "SP", "CE", "AL"];

/// 语言目录别名匹配器。
///
/// 目录名先 NFC 规范化再 lowercase，整名与别名表比对；命中即判定语言分支，
/// 不命中的目录在语言判定层被忽略。别名表有序，先命中者先（配置驱动，
/// 不在遍历代码里散落字符串比较）。
#[derive(Clone, Debug)]
pub struct LanguageMatcher {
    rules: Vec<(Language, Vec<String>)>,
}

impl LanguageMatcher {
    pub fn with_rules(rules: Vec<(Language, Vec<String>)>) -> Self {
        let rules = rules
            .into_iter()
            .map(|(lang, aliases)| {
                let aliases = aliases.iter().map(|a| Self::normalize(a)).collect();
                (lang, aliases)
            })
            .collect();
        Self { rules }
    }

    /// 判定目录名属于哪个语言分支
    pub fn classify(&self, dir_name: &str) -> Option<Language> {
        let key = Self::normalize(dir_name);
        self.rules
            .iter()
            .find(|(_, aliases)| aliases.iter().any(|a| *a == key))
            .map(|(lang, _)| *lang)
    }

    fn normalize(name: &str) -> String {
        name.nfc().collect::<String>().to_lowercase()
    }
}

impl Default for LanguageMatcher {
    fn default() -> Self {
        Self::with_rules(vec![
            (
                Language::Chinese,
                vec!["中文".into(), "chinese".into(), "chi".into()],
            ),
            (
                Language::English,
                vec!["英文".into(), "english".into(), "eng".into(), "eng.".into()],
            ),
        ])
    }
}

/// 归档配置：内建默认值 + 可选 TOML 覆盖 + `CDN_URL` 环境变量覆盖
#[derive(Clone, Debug)]
pub struct Config {
    /// 归档根目录（其直接子目录为科目）
    pub root: PathBuf,
    /// index artifact 输出位置
    pub output: PathBuf,
    /// CDN 前缀，FileEntry.path = cdn_prefix + url_root + 编码后的相对路径
    pub cdn_prefix: String,
    /// URL 中的根路径段（保持与对象存储上传路径一致）
    pub url_root: String,
    pub subject_order: Vec<String>,
    pub exam_type_priority: Vec<String>,
    pub languages: LanguageMatcher,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            cdn_prefix: DEFAULT_CDN_PREFIX.to_string(),
            url_root: DEFAULT_URL_ROOT.to_string(),
            subject_order: SUBJECT_ORDER.iter().map(|s| s.to_string()).collect(),
            exam_type_priority: EXAM_TYPE_PRIORITY.iter().map(|s| s.to_string()).collect(),
            languages: LanguageMatcher::default(),
        }
    }
}

/// TOML 覆盖文件；所有字段可省略，省略即用默认值
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    root: Option<PathBuf>,
    output: Option<PathBuf>,
    cdn_prefix: Option<String>,
    url_root: Option<String>,
    subject_order: Option<Vec<String>>,
    exam_type_priority: Option<Vec<String>>,
}

impl Config {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(path) = path {
            let text = std::fs::read_to_string(path)?;
            let file: ConfigFile = toml::from_str(&text)?;
            if let Some(v) = file.root {
                config.root = v;
            }
            if let Some(v) = file.output {
                config.output = v;
            }
            if let Some(v) = file.cdn_prefix {
                config.cdn_prefix = v;
            }
            if let Some(v) = file.url_root {
                config.url_root = v;
            }
            if let Some(v) = file.subject_order {
                config.subject_order = v;
            }
            if let Some(v) = file.exam_type_priority {
                config.exam_type_priority = v;
            }
        }

        if let Ok(url) = std::env::var("CDN_URL") {
            if !url.is_empty() {
                config.cdn_prefix = url;
            }
        }

        Ok(config)
    }
}
