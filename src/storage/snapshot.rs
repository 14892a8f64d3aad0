use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::index::model::SubjectData;

/// index artifact 的原子存储（整体替换，无增量）。
///
/// 落盘流程：
/// 1) 整棵 Subject 树序列化为 pretty JSON（字节稳定，支撑幂等性校验）
/// 2) 写 `<output>.tmp` 并 fsync
/// 3) rename(tmp, target) 原子替换（POSIX 保证）
/// 4) fsync(dir) 确保目录项落盘
///
/// 任何一步失败都不触碰旧 artifact，只有 no-file 风险没有半截文件风险。
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_atomic(&self, subjects: &[SubjectData]) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let body = serde_json::to_vec_pretty(subjects)?;
        let tmp = self.path.with_extension("json.tmp");

        let mut file = File::create(&tmp)?;
        file.write_all(&body)?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)?;

        if let Some(parent) = self.path.parent() {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }
        Ok(())
    }

    /// 运行时消费接口：同步整读快照
    pub fn load(&self) -> anyhow::Result<Vec<SubjectData>> {
        let data = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&data)?)
    }
}
