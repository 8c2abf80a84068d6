use crate::error::{AppError, AppResult};
use serde::Serialize;

/// 章节：源文档中一段连续的页码范围
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chapter {
    /// 章节标题
    pub name: String,
    /// 起始页（从 1 开始）
    pub first_page: u32,
    /// 结束页（包含）
    pub last_page: u32,
}

impl Chapter {
    /// 创建章节并校验页码范围
    pub fn new(name: impl Into<String>, first_page: u32, last_page: u32) -> AppResult<Self> {
        let chapter = Self {
            name: name.into(),
            first_page,
            last_page,
        };
        chapter.check(0)?;
        Ok(chapter)
    }

    /// 单页章节
    pub fn single_page(name: impl Into<String>, page: u32) -> AppResult<Self> {
        Self::new(name, page, page)
    }

    /// 章节页数
    pub fn page_count(&self) -> u32 {
        self.last_page.saturating_sub(self.first_page) + 1
    }

    /// 校验 `1 <= first_page <= last_page`，`line` 用于错误定位
    pub(crate) fn check(&self, line: usize) -> AppResult<()> {
        if self.first_page == 0 {
            return Err(AppError::malformed(
                line,
                format!("章节 '{}' 的起始页必须从 1 开始", self.name),
            ));
        }
        if self.last_page < self.first_page {
            return Err(AppError::malformed(
                line,
                format!(
                    "章节 '{}' 的结束页 {} 小于起始页 {}",
                    self.name, self.last_page, self.first_page
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(Chapter::new("Body", 6, 20).unwrap().page_count(), 15);
        assert_eq!(Chapter::single_page("Appendix", 42).unwrap().page_count(), 1);
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(Chapter::new("Zero", 0, 3).is_err());
        assert!(Chapter::new("Backwards", 9, 3).is_err());
    }
}
