use serde::{Deserialize, Serialize};

use crate::index::model::{ExamTypeGroup, Language, SubjectData, YearGroup};

/// 考试类别筛选：All 直通，Only 精确匹配单一类别
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExamTypeFilter {
    #[default]
    All,
    Only(String),
}

/// UI 四元选择状态（科目 / 语言 / 类别 / 搜索词）的可序列化值对象。
/// 投影函数对它是纯函数，不依赖任何 UI 框架。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub subject: String,
    pub language: Language,
    pub exam_type: ExamTypeFilter,
    pub query: String,
}

impl Selection {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            language: Language::Chinese,
            exam_type: ExamTypeFilter::All,
            query: String::new(),
        }
    }

    /// 切换科目：类别筛选复位为 All
    pub fn select_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
        self.exam_type = ExamTypeFilter::All;
    }

    /// 切换语言：同样复位类别筛选
    pub fn select_language(&mut self, language: Language) {
        self.language = language;
        self.exam_type = ExamTypeFilter::All;
    }
}

/// 浏览投影：可直接渲染的结果
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    /// 回退后的生效语言；两个分支都缺失（或科目不存在）时为 None，
    /// UI 据此渲染 unavailable 空态
    pub language: Option<Language>,
    /// 顶栏 tab 用的全量类别列表，不受类别筛选与搜索词影响
    pub exam_types: Vec<String>,
    /// 剪裁后的类别组；空 = no matches
    pub groups: Vec<ExamTypeGroup>,
}

impl Projection {
    fn unavailable() -> Self {
        Self {
            language: None,
            exam_types: Vec::new(),
            groups: Vec::new(),
        }
    }
}

/// 语言回退：请求的分支缺失而另一分支存在时静默切换。
/// 每次投影都重新判定——这是持续不变式，不是一次性默认值。
pub fn resolve_language(subject: &SubjectData, requested: Language) -> Option<Language> {
    if subject.branch(requested).is_some() {
        Some(requested)
    } else if subject.branch(requested.other()).is_some() {
        Some(requested.other())
    } else {
        None
    }
}

/// 纯投影：快照 + 选择状态 -> 剪裁后的类别组序列。
/// 不做 I/O，不改动快照；顺序继承自 artifact（构建期已排好）。
pub fn browse(subjects: &[SubjectData], selection: &Selection) -> Projection {
    let Some(subject) = subjects.iter().find(|s| s.name == selection.subject) else {
        return Projection::unavailable();
    };
    let Some(language) = resolve_language(subject, selection.language) else {
        return Projection::unavailable();
    };
    let Some(branch) = subject.branch(language) else {
        return Projection::unavailable();
    };

    let query = selection.query.to_lowercase();
    let groups = branch
        .iter()
        .filter(|group| match &selection.exam_type {
            ExamTypeFilter::All => true,
            ExamTypeFilter::Only(kind) => &group.kind == kind,
        })
        .filter_map(|group| {
            let years: Vec<YearGroup> = group
                .years
                .iter()
                .filter(|y| year_matches(y, &query))
                .cloned()
                .collect();
            (!years.is_empty()).then(|| ExamTypeGroup {
                kind: group.kind.clone(),
                years,
            })
        })
        .collect();

    Projection {
        language: Some(language),
        exam_types: branch.iter().map(|g| g.kind.clone()).collect(),
        groups,
    }
}

/// 大小写不敏感子串匹配：年份标签或任一文件名命中即保留。
/// 空查询对空串做 contains 恒为真，整组直通。
fn year_matches(year: &YearGroup, query_lower: &str) -> bool {
    year.year.to_lowercase().contains(query_lower)
        || year
            .files
            .iter()
            .any(|f| f.name.to_lowercase().contains(query_lower))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::model::{FileEntry, FileKind};

    fn file(name: &str) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            path: format!("https://cdn.example/papers/{name}"),
            kind: FileKind::File,
        }
    }

    fn year(label: &str, names: &[&str]) -> YearGroup {
        YearGroup {
            year: label.to_string(),
            files: names.iter().map(|n| file(n)).collect(),
        }
    }

    fn group(kind: &str, years: Vec<YearGroup>) -> ExamTypeGroup {
        ExamTypeGroup {
            kind: kind.to_string(),
            years,
        }
    }

    fn fixture() -> Vec<SubjectData> {
        vec![
            SubjectData {
                name: "Mathematics".to_string(),
                english: None,
                chinese: Some(vec![
                    group(
                        "DSE",
                        vec![
                            year("2023", &["Paper1.pdf", "Paper2.pdf"]),
                            year("2010", &["Paper1.pdf"]),
                        ],
                    ),
                    group("PP", vec![year("Misc", &["ByTopic 2010-2023.pdf"])]),
                ]),
            },
            SubjectData {
                name: "History".to_string(),
                english: Some(vec![group("DSE", vec![year("2019", &["Q1.pdf"])])]),
                chinese: None,
            },
            SubjectData {
                name: "Empty".to_string(),
                english: None,
                chinese: None,
            },
        ]
    }

    #[test]
    fn all_filter_with_empty_query_returns_branch_unpruned() {
        let data = fixture();
        let projection = browse(&data, &Selection::new("Mathematics"));
        assert_eq!(projection.language, Some(Language::Chinese));
        assert_eq!(projection.exam_types, vec!["DSE", "PP"]);
        assert_eq!(projection.groups.len(), 2);
        assert_eq!(projection.groups[0].years.len(), 2);
    }

    #[test]
    fn exam_type_filter_keeps_single_group() {
        let data = fixture();
        let mut selection = Selection::new("Mathematics");
        selection.exam_type = ExamTypeFilter::Only("PP".to_string());
        let projection = browse(&data, &selection);
        assert_eq!(projection.groups.len(), 1);
        assert_eq!(projection.groups[0].kind, "PP");
        // tab 列表不受筛选影响
        assert_eq!(projection.exam_types, vec!["DSE", "PP"]);
    }

    #[test]
    fn query_matches_year_label_or_file_name() {
        let data = fixture();
        let mut selection = Selection::new("Mathematics");
        selection.query = "2023".to_string();
        let projection = browse(&data, &selection);
        // DSE 的 2023 组命中年份；PP 的 Misc 组命中文件名 "ByTopic 2010-2023.pdf"
        assert_eq!(projection.groups.len(), 2);
        assert_eq!(projection.groups[0].years.len(), 1);
        assert_eq!(projection.groups[0].years[0].year, "2023");
        assert_eq!(projection.groups[1].years[0].year, "Misc");
    }

    #[test]
    fn query_match_is_case_insensitive_on_file_names() {
        let data = fixture();
        let mut selection = Selection::new("Mathematics");
        selection.query = "paper1".to_string();
        let projection = browse(&data, &selection);
        assert_eq!(projection.groups.len(), 1);
        assert_eq!(projection.groups[0].kind, "DSE");
        assert_eq!(projection.groups[0].years.len(), 2);
    }

    #[test]
    fn unmatched_query_yields_no_matches_state() {
        let data = fixture();
        let mut selection = Selection::new("Mathematics");
        selection.query = "2099".to_string();
        let projection = browse(&data, &selection);
        assert!(projection.groups.is_empty());
        // 语言与 tab 仍然可用，只有结果为空
        assert_eq!(projection.language, Some(Language::Chinese));
    }

    #[test]
    fn language_falls_back_when_requested_branch_absent() {
        let data = fixture();
        // History 只有英文分支；请求中文应静默回退
        let projection = browse(&data, &Selection::new("History"));
        assert_eq!(projection.language, Some(Language::English));
        assert_eq!(projection.groups.len(), 1);

        let mut selection = Selection::new("Mathematics");
        selection.language = Language::English;
        let projection = browse(&data, &selection);
        assert_eq!(projection.language, Some(Language::Chinese));
    }

    #[test]
    fn subject_with_no_branches_renders_unavailable() {
        let data = fixture();
        let projection = browse(&data, &Selection::new("Empty"));
        assert_eq!(projection.language, None);
        assert!(projection.exam_types.is_empty());
        assert!(projection.groups.is_empty());
    }

    #[test]
    fn unknown_subject_renders_unavailable() {
        let data = fixture();
        let projection = browse(&data, &Selection::new("Astronomy"));
        assert_eq!(projection.language, None);
        assert!(projection.groups.is_empty());
    }

    #[test]
    fn selection_transitions_reset_exam_type_filter() {
        let mut selection = Selection::new("Mathematics");
        selection.exam_type = ExamTypeFilter::Only("DSE".to_string());

        selection.select_language(Language::English);
        assert_eq!(selection.exam_type, ExamTypeFilter::All);

        selection.exam_type = ExamTypeFilter::Only("PP".to_string());
        selection.select_subject("History");
        assert_eq!(selection.exam_type, ExamTypeFilter::All);
        assert_eq!(selection.subject, "History");
    }

    #[test]
    fn browse_does_not_mutate_snapshot() {
        let data = fixture();
        let before = data.clone();
        let mut selection = Selection::new("Mathematics");
        selection.query = "2023".to_string();
        let _ = browse(&data, &selection);
        assert_eq!(data, before);
    }
}
