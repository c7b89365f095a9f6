/// 拼貼網格配置
///
/// 畫布寬度固定為 `cols * cell_width`，列數為 `ceil(count / cols)`，
/// 最後一列不足的格子保留背景色。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollageLayout {
    pub count: usize,
    pub cols: u32,
    pub rows: u32,
    pub cell_width: u32,
    pub cell_height: u32,
}

impl CollageLayout {
    /// `count` 或 `cols` 為 0 時回傳 `None`
    #[must_use]
    pub fn new(count: usize, cols: u32, cell_width: u32, cell_height: u32) -> Option<Self> {
        if count == 0 || cols == 0 {
            return None;
        }
        let rows = u32::try_from(count.div_ceil(cols as usize)).ok()?;

        Some(Self {
            count,
            cols,
            rows,
            cell_width,
            cell_height,
        })
    }

    #[must_use]
    pub const fn canvas_size(&self) -> (u32, u32) {
        (self.cols * self.cell_width, self.rows * self.cell_height)
    }

    /// 第 `index` 張縮圖的左上角座標（由左至右、由上至下）
    #[must_use]
    pub const fn cell_origin(&self, index: usize) -> (u32, u32) {
        let col = (index % self.cols as usize) as u32;
        let row = (index / self.cols as usize) as u32;
        (col * self.cell_width, row * self.cell_height)
    }

    /// 最後一列填入的格數
    #[must_use]
    pub const fn filled_in_last_row(&self) -> u32 {
        let remainder = (self.count % self.cols as usize) as u32;
        if remainder == 0 { self.cols } else { remainder }
    }

    /// 留白（背景色）的格數
    #[must_use]
    pub const fn blank_cells(&self) -> u32 {
        self.cols - self.filled_in_last_row()
    }
}
