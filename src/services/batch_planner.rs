//! 批次规划 - 业务能力层
//!
//! 把章节列表切分为固定页数的渲染任务。纯函数，不触碰文件系统：
//! 相同输入总是得到相同顺序的任务列表（封面在前，章节按清单顺序，
//! 同一章节内批次序号递增）。

use crate::error::{AppError, AppResult};
use crate::models::{Chapter, JobTarget, OutputNaming, RenderJob};
use std::path::PathBuf;

/// 封面输出文件名
pub const COVER_FILE_NAME: &str = "cover.html";

/// 规划所有渲染任务
///
/// # 参数
/// - `chapters`: 章节列表
/// - `max_pages_per_batch`: 每个批次最多包含的页数
/// - `separate_files`: 是否每页输出一个文件
///
/// # 返回
/// 封面任务在前，随后是各章节的批次任务
pub fn plan(
    chapters: &[Chapter],
    max_pages_per_batch: u32,
    separate_files: bool,
) -> AppResult<Vec<RenderJob>> {
    if max_pages_per_batch == 0 {
        return Err(AppError::config("-b/--batch-size", "每批页数必须大于 0"));
    }

    let mut jobs = vec![cover_job()];

    for (chapter_index, chapter) in chapters.iter().enumerate() {
        chapter.check(0)?;

        if separate_files {
            jobs.extend(split_chapter(chapter_index, chapter, max_pages_per_batch));
        } else {
            jobs.push(RenderJob {
                target: JobTarget::Chapter(chapter_index),
                start_page: chapter.first_page,
                end_page: chapter.last_page,
                batch_part: 1,
                output: OutputNaming::Single(format!("{}.html", chapter_index)),
                dest_subdir: None,
            });
        }
    }

    Ok(jobs)
}

/// 批次数量：`ceil(总页数 / 每批页数)`
pub fn batch_count(total_pages: u32, max_pages_per_batch: u32) -> u32 {
    total_pages.div_ceil(max_pages_per_batch)
}

fn cover_job() -> RenderJob {
    RenderJob {
        target: JobTarget::Cover,
        start_page: 1,
        end_page: 1,
        batch_part: 1,
        output: OutputNaming::Single(COVER_FILE_NAME.to_string()),
        dest_subdir: None,
    }
}

fn split_chapter(chapter_index: usize, chapter: &Chapter, max_pages: u32) -> Vec<RenderJob> {
    let num_batches = batch_count(chapter.page_count(), max_pages);

    (1..=num_batches)
        .map(|batch_part| {
            let start_page = chapter.first_page + (batch_part - 1) * max_pages;
            let end_page = start_page
                .saturating_add(max_pages - 1)
                .min(chapter.last_page);
            RenderJob {
                target: JobTarget::Chapter(chapter_index),
                start_page,
                end_page,
                batch_part,
                output: OutputNaming::PerPage {
                    index_base: (batch_part - 1) * max_pages,
                },
                dest_subdir: Some(PathBuf::from(chapter_index.to_string())),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_manifest;
    use std::collections::HashSet;

    fn ranges(jobs: &[RenderJob], target: JobTarget) -> Vec<(u32, u32)> {
        jobs.iter()
            .filter(|job| job.target == target)
            .map(|job| (job.start_page, job.end_page))
            .collect()
    }

    #[test]
    fn test_manifest_example_batch_size_six() {
        let chapters = parse_manifest("Intro\n1 5\nBody\n6 20\n").unwrap();
        let jobs = plan(&chapters, 6, true).unwrap();

        assert_eq!(ranges(&jobs, JobTarget::Chapter(0)), vec![(1, 5)]);
        assert_eq!(
            ranges(&jobs, JobTarget::Chapter(1)),
            vec![(6, 11), (12, 17), (18, 20)]
        );
    }

    #[test]
    fn test_cover_is_planned_first() {
        let jobs = plan(&[], 6, true).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].target, JobTarget::Cover);
        assert_eq!((jobs[0].start_page, jobs[0].end_page, jobs[0].batch_part), (1, 1, 1));
        assert_eq!(jobs[0].output, OutputNaming::Single("cover.html".to_string()));
    }

    #[test]
    fn test_single_page_chapter() {
        let chapters = parse_manifest("Appendix\n42\n").unwrap();
        let jobs = plan(&chapters, 6, true).unwrap();
        assert_eq!(ranges(&jobs, JobTarget::Chapter(0)), vec![(42, 42)]);
    }

    #[test]
    fn test_batches_reconstruct_range_exactly() {
        for max_pages in 1..=9u32 {
            for first in 1..=4u32 {
                for last in first..=first + 25 {
                    let chapter = Chapter::new("C", first, last).unwrap();
                    let jobs = plan(std::slice::from_ref(&chapter), max_pages, true).unwrap();
                    let batches = ranges(&jobs, JobTarget::Chapter(0));

                    assert_eq!(
                        batches.len() as u32,
                        batch_count(chapter.page_count(), max_pages)
                    );
                    let pages: Vec<u32> = batches.iter().flat_map(|&(s, e)| s..=e).collect();
                    let expected: Vec<u32> = (first..=last).collect();
                    assert_eq!(pages, expected);
                    assert!(batches.iter().all(|&(s, e)| s <= e && e - s < max_pages));
                }
            }
        }
    }

    #[test]
    fn test_batch_parts_ascend_and_keys_are_unique() {
        let chapters = parse_manifest("A\n1 13\nB\n14 14\nC\n15 40\n").unwrap();
        let jobs = plan(&chapters, 6, true).unwrap();

        let keys: HashSet<_> = jobs.iter().map(|j| (j.target, j.batch_part)).collect();
        assert_eq!(keys.len(), jobs.len());

        let parts: Vec<u32> = jobs
            .iter()
            .filter(|j| j.target == JobTarget::Chapter(2))
            .map(|j| j.batch_part)
            .collect();
        assert_eq!(parts, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_per_page_index_base_is_offset_in_chapter() {
        let chapters = parse_manifest("Body\n6 20\n").unwrap();
        let jobs = plan(&chapters, 6, true).unwrap();
        let bases: Vec<_> = jobs[1..].iter().map(|j| j.output.clone()).collect();
        assert_eq!(
            bases,
            vec![
                OutputNaming::PerPage { index_base: 0 },
                OutputNaming::PerPage { index_base: 6 },
                OutputNaming::PerPage { index_base: 12 },
            ]
        );
        assert!(jobs[1..]
            .iter()
            .all(|j| j.dest_subdir == Some(PathBuf::from("0"))));
    }

    #[test]
    fn test_combined_mode_one_job_per_chapter() {
        let chapters = parse_manifest("Intro\n1 5\nBody\n6 20\n").unwrap();
        let jobs = plan(&chapters, 6, false).unwrap();

        assert_eq!(jobs.len(), 3);
        assert_eq!((jobs[2].start_page, jobs[2].end_page), (6, 20));
        assert_eq!(jobs[2].output, OutputNaming::Single("1.html".to_string()));
        assert_eq!(jobs[2].dest_subdir, None);
    }

    #[test]
    fn test_planning_is_deterministic() {
        let chapters = parse_manifest("Intro\n1 5\nBody\n6 20\nEnd\n21\n").unwrap();
        assert_eq!(plan(&chapters, 4, true).unwrap(), plan(&chapters, 4, true).unwrap());
    }

    #[test]
    fn test_invalid_chapter_is_malformed_manifest() {
        let chapters = vec![Chapter {
            name: "Broken".to_string(),
            first_page: 10,
            last_page: 9,
        }];
        assert!(matches!(
            plan(&chapters, 6, true),
            Err(AppError::MalformedManifest { .. })
        ));
    }

    #[test]
    fn test_pages_near_u32_max_do_not_overflow() {
        let chapters = parse_manifest("Last\n4294967295\n").unwrap();
        let jobs = plan(&chapters, 6, true).unwrap();
        assert_eq!(ranges(&jobs, JobTarget::Chapter(0)), vec![(u32::MAX, u32::MAX)]);

        let chapters = parse_manifest("Big\n4294967290 4294967295\n").unwrap();
        let jobs = plan(&chapters, 4, true).unwrap();
        assert_eq!(
            ranges(&jobs, JobTarget::Chapter(0)),
            vec![(4294967290, 4294967293), (4294967294, u32::MAX)]
        );
        assert!(jobs.iter().all(|j| j.start_page <= j.end_page));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        assert!(matches!(
            plan(&[], 0, true),
            Err(AppError::Configuration { .. })
        ));
    }
}
