use serde::Serialize;
use ts_rs::TS;

// 导入行错误
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "import.ts")]
pub struct ImportRowError {
    pub row: usize,
    pub field: String,
    pub message: String,
}

impl ImportRowError {
    pub fn new(row: usize, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            row,
            field: field.into(),
            message: message.into(),
        }
    }
}

// 批量导入结果
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "import.ts")]
pub struct ImportSummary {
    pub total: usize,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    pub errors: Vec<ImportRowError>,
}

impl ImportSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// 记录一行失败，同一行多个字段错误只计一次失败
    pub fn fail(&mut self, error: ImportRowError) {
        if !self.errors.iter().any(|e| e.row == error.row) {
            self.failed += 1;
        }
        self.errors.push(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failures_counted_per_row() {
        let mut summary = ImportSummary::new(3);
        summary.fail(ImportRowError::new(2, "USN", "missing"));
        summary.fail(ImportRowError::new(2, "Marks", "not a number"));
        summary.fail(ImportRowError::new(4, "Course Code", "unknown course"));
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.errors.len(), 3);
    }
}
