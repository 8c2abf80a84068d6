use crate::error::{AppError, AppResult};
use crate::models::Chapter;
use std::path::Path;
use tokio::fs;

/// 从清单文件加载章节列表
pub async fn load_manifest(manifest_path: &Path) -> AppResult<Vec<Chapter>> {
    let content = fs::read_to_string(manifest_path)
        .await
        .map_err(|e| AppError::io(manifest_path, e))?;

    let chapters = parse_manifest(&content)?;
    tracing::info!(
        "成功加载 {} 个章节: {}",
        chapters.len(),
        manifest_path.display()
    );

    Ok(chapters)
}

/// 解析清单文本
///
/// 每条记录两行：第一行是标题，第二行是 `"<起始页>"` 或 `"<起始页> <结束页>"`。
/// 标题位置上的空行会被跳过。
pub fn parse_manifest(content: &str) -> AppResult<Vec<Chapter>> {
    let mut chapters = Vec::new();
    let mut lines = content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .enumerate()
        .map(|(i, line)| (i + 1, line));

    while let Some((title_line, title)) = lines.next() {
        if title.trim().is_empty() {
            continue;
        }

        let (pages_line, pages) = lines.next().ok_or_else(|| {
            AppError::malformed(title_line, format!("章节 '{}' 缺少页码行", title))
        })?;

        let (first_page, last_page) = parse_page_range(pages_line, pages)?;
        let chapter = Chapter {
            name: title.to_string(),
            first_page,
            last_page,
        };
        chapter.check(pages_line)?;
        chapters.push(chapter);
    }

    Ok(chapters)
}

fn parse_page_range(line: usize, text: &str) -> AppResult<(u32, u32)> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    let parse = |field: &str| {
        field
            .parse::<u32>()
            .map_err(|_| AppError::malformed(line, format!("页码 '{}' 不是有效数字", field)))
    };

    match fields.as_slice() {
        [single] => {
            let page = parse(*single)?;
            Ok((page, page))
        }
        [first, last] => Ok((parse(*first)?, parse(*last)?)),
        [] => Err(AppError::malformed(line, "页码行为空")),
        _ => Err(AppError::malformed(
            line,
            format!("页码行最多包含两个数字，实际为 '{}'", text),
        )),
    }
}
