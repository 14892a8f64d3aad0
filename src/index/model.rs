use serde::{Deserialize, Serialize};

/// "Misc" 哨兵年份：exam-type 目录下的散装文件归入此组
pub const MISC_YEAR: &str = "Misc";

/// 语言分支（科目下的中文 / 英文资料夹）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "chi")]
    Chinese,
    #[serde(rename = "eng")]
    English,
}

impl Language {
    pub fn other(self) -> Self {
        match self {
            Language::Chinese => Language::English,
            Language::English => Language::Chinese,
        }
    }
}

/// 单个可下载文件。`path` 是重写后的 CDN 绝对 URL，不是本地路径。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
}

/// artifact 里固定写作 `"type": "file"`，与既有消费方保持字节兼容
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    #[serde(rename = "file")]
    File,
}

/// 一个年份（或 Misc 哨兵）下的文件集合。不变式：`files` 非空。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearGroup {
    pub year: String,
    pub files: Vec<FileEntry>,
}

/// 一个考试类别（DSE / PP / SP / ...）。不变式：`years` 非空。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamTypeGroup {
    #[serde(rename = "type")]
    pub kind: String,
    pub years: Vec<YearGroup>,
}

/// 顶层科目。两个语言分支都可能缺失；缺失的分支在 JSON 中直接省略。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectData {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub english: Option<Vec<ExamTypeGroup>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chinese: Option<Vec<ExamTypeGroup>>,
}

impl SubjectData {
    pub fn branch(&self, language: Language) -> Option<&[ExamTypeGroup]> {
        match language {
            Language::Chinese => self.chinese.as_deref(),
            Language::English => self.english.as_deref(),
        }
    }
}
