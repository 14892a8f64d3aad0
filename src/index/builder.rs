use std::fs;
use std::path::Path;

use tracing::{error, info};

use crate::config::Config;
use crate::index::model::{
    ExamTypeGroup, FileEntry, FileKind, Language, SubjectData, YearGroup, MISC_YEAR,
};
use crate::index::sort;
use crate::storage::snapshot::SnapshotStore;

/// 目录树 -> Subject 树的一次性批量构建器。
///
/// 层级语义（固定四层，年份层以下不再递归）：
/// ```text
/// root/<科目>/<语言别名>/<考试类别>/<年份>/<文件>
///                        └─ 类别目录下的散装文件 -> "Misc" 年份组
/// ```
/// 语言目录下的散装文件不收录（既有产物语义，测试钉死）。
/// 隐藏项（`.` 开头）在每一层都被排除；只列常规文件、只下钻目录。
pub struct IndexBuilder {
    config: Config,
}

impl IndexBuilder {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// 扫描整棵目录树。root 不存在时记日志并跳过本次构建（Ok(None)），
    /// 旧 artifact 保持不动。
    pub fn build(&self) -> anyhow::Result<Option<Vec<SubjectData>>> {
        let root = &self.config.root;
        if !root.is_dir() {
            error!("archive root not found: {}", root.display());
            return Ok(None);
        }

        let mut subjects = Vec::new();
        for name in list_dirs(root)? {
            subjects.push(self.scan_subject(&root.join(&name), name)?);
        }
        subjects.sort_by(|a, b| sort::priority_cmp(&a.name, &b.name, &self.config.subject_order));
        Ok(Some(subjects))
    }

    fn scan_subject(&self, dir: &Path, name: String) -> anyhow::Result<SubjectData> {
        let mut chinese_dir = None;
        let mut english_dir = None;
        for sub in list_dirs(dir)? {
            match self.config.languages.classify(&sub) {
                Some(Language::Chinese) => chinese_dir = Some(sub),
                Some(Language::English) => english_dir = Some(sub),
                // 语言别名之外的条目在这一层不参与判定
                None => {}
            }
        }

        let chinese = match chinese_dir {
            Some(d) => self.scan_exam_types(&dir.join(&d), &[name.clone(), d])?,
            None => None,
        };
        let english = match english_dir {
            Some(d) => self.scan_exam_types(&dir.join(&d), &[name.clone(), d])?,
            None => None,
        };

        Ok(SubjectData {
            name,
            english,
            chinese,
        })
    }

    /// 语言目录层：只扫描子目录作为考试类别；直接躺在语言目录下的散装
    /// 文件不会被收录（类别目录下的散装文件才进 Misc）。空分支收敛为 None。
    fn scan_exam_types(
        &self,
        dir: &Path,
        segments: &[String],
    ) -> anyhow::Result<Option<Vec<ExamTypeGroup>>> {
        let mut groups = Vec::new();
        for kind in list_dirs(dir)? {
            let mut segs = segments.to_vec();
            segs.push(kind.clone());
            let years = self.scan_years(&dir.join(&kind), &segs)?;
            if !years.is_empty() {
                groups.push(ExamTypeGroup { kind, years });
            }
        }
        groups.sort_by(|a, b| sort::priority_cmp(&a.kind, &b.kind, &self.config.exam_type_priority));
        Ok(if groups.is_empty() { None } else { Some(groups) })
    }

    fn scan_years(&self, dir: &Path, segments: &[String]) -> anyhow::Result<Vec<YearGroup>> {
        let mut years = Vec::new();

        let direct = self.scan_files(dir, segments)?;
        if !direct.is_empty() {
            years.push(YearGroup {
                year: MISC_YEAR.to_string(),
                files: direct,
            });
        }

        for year in list_dirs(dir)? {
            let mut segs = segments.to_vec();
            segs.push(year.clone());
            let files = self.scan_files(&dir.join(&year), &segs)?;
            if !files.is_empty() {
                years.push(YearGroup { year, files });
            }
        }

        years.sort_by(|a, b| sort::year_cmp(&a.year, &b.year));
        Ok(years)
    }

    fn scan_files(&self, dir: &Path, segments: &[String]) -> anyhow::Result<Vec<FileEntry>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let path = self.file_url(segments, &name);
            files.push(FileEntry {
                name,
                path,
                kind: FileKind::File,
            });
        }
        files.sort_by(|a, b| sort::natural_cmp(&a.name, &b.name));
        Ok(files)
    }

    /// FileEntry.path = cdn_prefix + url_root + "/段/段/..."，每段 percent-encode。
    /// 解码并去掉前缀即可精确还原 root 下的相对路径。
    fn file_url(&self, segments: &[String], file_name: &str) -> String {
        let mut url = format!("{}{}", self.config.cdn_prefix, self.config.url_root);
        for seg in segments.iter().map(String::as_str).chain([file_name]) {
            url.push('/');
            url.push_str(&urlencoding::encode(seg));
        }
        url
    }
}

/// 列出非隐藏子目录名。read_dir 顺序与 OS 相关，调用方负责最终排序。
fn list_dirs(dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        names.push(name);
    }
    Ok(names)
}

/// 一次性构建入口：全树在内存中构建完成后单次原子落盘。
/// 遍历或落盘中的任何错误在这里统一捕获记日志，绝不留半截输出。
pub fn run_build(config: &Config) {
    info!("scanning {}", config.root.display());
    if let Err(e) = build_and_write(config) {
        error!("error scanning archive: {e:#}");
    }
}

fn build_and_write(config: &Config) -> anyhow::Result<()> {
    let builder = IndexBuilder::new(config.clone());
    let Some(subjects) = builder.build()? else {
        return Ok(());
    };

    let store = SnapshotStore::new(config.output.clone());
    store.write_atomic(&subjects)?;
    info!(
        "index generated at {} ({} subjects)",
        store.path().display(),
        subjects.len()
    );
    Ok(())
}
