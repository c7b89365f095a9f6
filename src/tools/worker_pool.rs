use crate::error::{PipelineError, PipelineResult};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// 固定上限的工作執行緒池
///
/// 縮圖擷取與拼貼縮放共用同一個池，同時執行的外部程序不會超過 `max_workers`。
pub struct WorkerPool {
    pool: ThreadPool,
    max_workers: usize,
}

impl WorkerPool {
    pub fn new(max_workers: usize) -> PipelineResult<Self> {
        let max_workers = max_workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(max_workers)
            .thread_name(|i| format!("media-worker-{i}"))
            .build()
            .map_err(|e| PipelineError::WorkerPool(e.to_string()))?;

        Ok(Self { pool, max_workers })
    }

    #[must_use]
    pub const fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// 平行處理所有項目，結果依輸入順序排列
    ///
    /// 任一項目失敗即回傳該錯誤，其餘結果捨棄
    pub fn map_ordered<T, R, E, F>(&self, items: &[T], task: F) -> Result<Vec<R>, E>
    where
        T: Sync,
        R: Send,
        E: Send,
        F: Fn(usize, &T) -> Result<R, E> + Sync + Send,
    {
        self.pool.install(|| {
            items
                .par_iter()
                .enumerate()
                .map(|(index, item)| task(index, item))
                .collect()
        })
    }
}
