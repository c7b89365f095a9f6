use console::style;
use log::info;
use rust_i18n::t;

/// 單一佇列項目的處理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// 所有成品上傳完成且佇列項目已刪除
    Published { urls: Vec<String> },
    /// 不支援的類型，佇列項目保留
    Skipped { reason: String },
}

/// 失敗項目與錯誤種類
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    pub name: String,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub published: usize,
    pub skipped: usize,
    pub failures: Vec<FailedItem>,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &JobOutcome) {
        match outcome {
            JobOutcome::Published { .. } => self.published += 1,
            JobOutcome::Skipped { .. } => self.skipped += 1,
        }
    }

    pub fn record_failure(&mut self, failure: FailedItem) {
        self.failures.push(failure);
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn print(&self) {
        println!();
        println!("{}", style(t!("summary.title")).cyan().bold());
        println!("  {}", t!("summary.total", count = self.total));
        println!(
            "  {}",
            style(t!("summary.published", count = self.published)).green()
        );
        if self.skipped > 0 {
            println!(
                "  {}",
                style(t!("summary.skipped", count = self.skipped)).yellow()
            );
        }
        if self.has_failures() {
            println!("  {}", style(t!("summary.failed", count = self.failed())).red());
            for failure in &self.failures {
                println!(
                    "    - {} [{}] {}",
                    failure.name,
                    style(failure.kind).red(),
                    failure.message
                );
            }
        }

        info!(
            "佇列處理完成 - 總計: {}, 發布: {}, 略過: {}, 失敗: {}",
            self.total,
            self.published,
            self.skipped,
            self.failed()
        );
    }
}
