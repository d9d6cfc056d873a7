use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::LossError;

/// 转储预测行时，低于该阈值的值一律写作0
pub const DUMP_THRESHOLD: f32 = 1e-6;

/// 准确率层的两个调试转储目标（均为追加模式的文本文件）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpPaths {
    /// 每个样本一行，空格分隔的预测值
    pub data: PathBuf,
    /// 每个样本一行，整数标签
    pub label: PathBuf,
}

impl DumpPaths {
    /// 两个目标须同时指定或同时不指定
    pub fn from_pair(
        data: Option<PathBuf>,
        label: Option<PathBuf>,
    ) -> Result<Option<Self>, LossError> {
        match (data, label) {
            (Some(data), Some(label)) => Ok(Some(Self { data, label })),
            (None, None) => Ok(None),
            _ => Err(LossError::DumpSinkPair),
        }
    }

    /// 每次调用各打开一次，在`DumpWriter::finish`时刷新
    pub(crate) fn open(&self) -> Result<DumpWriter, LossError> {
        Ok(DumpWriter {
            data: BufWriter::new(open_append(&self.data)?),
            label: BufWriter::new(open_append(&self.label)?),
        })
    }
}

fn open_append(path: &Path) -> Result<File, LossError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| LossError::Dump(format!("{}：{}", path.display(), e)))
}

pub(crate) struct DumpWriter {
    data: BufWriter<File>,
    label: BufWriter<File>,
}

impl DumpWriter {
    pub(crate) fn write_row(&mut self, row: &[f32]) -> Result<(), LossError> {
        for &value in row {
            if value >= DUMP_THRESHOLD {
                write!(self.data, "{} ", value)?;
            } else {
                write!(self.data, "0 ")?;
            }
        }
        writeln!(self.data)?;
        Ok(())
    }

    pub(crate) fn write_label(&mut self, label: f32) -> Result<(), LossError> {
        writeln!(self.label, "{}", label as i64)?;
        Ok(())
    }

    pub(crate) fn finish(mut self) -> Result<(), LossError> {
        self.data.flush()?;
        self.label.flush()?;
        Ok(())
    }
}
