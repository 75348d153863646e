use chrono::{DateTime, Utc};
use cron::Schedule;
use std::str::FromStr;
use tracing::debug;

use scheduler_errors::{SchedulerError, SchedulerResult};

/// 经典crontab表达式的字段数（分 时 日 月 周）
const CRONTAB_FIELDS_COUNT: usize = 5;

/// crontab星期字段的位置
const CRONTAB_DOW_INDEX: usize = 4;

/// crontab星期编号（0和7都是周日）对应的名称
const CRONTAB_DAY_NAMES: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// CRON表达式解析和推算工具
#[derive(Debug, Clone)]
pub struct CronScheduler {
    schedule: Schedule,
}

impl CronScheduler {
    /// 解析CRON表达式
    ///
    /// 同时接受5段的crontab格式和 `cron` crate 原生的6/7段格式（含秒、可选年份）。
    /// 5段表达式会在前面补一个 `0` 秒字段，星期字段按crontab编号（0/7=周日，1=周一）
    /// 转换为名称；6/7段表达式沿用 `cron` crate 的编号（1=周日）。
    pub fn new(cron_expr: &str) -> SchedulerResult<Self> {
        let normalized = Self::normalize_expression(cron_expr);
        let schedule = Schedule::from_str(&normalized).map_err(|e| SchedulerError::InvalidCron {
            expr: cron_expr.to_string(),
            message: e.to_string(),
        })?;

        if normalized != cron_expr.trim() {
            debug!("CRON表达式已规范化: '{}' -> '{}'", cron_expr, normalized);
        }

        Ok(Self { schedule })
    }

    fn normalize_expression(cron_expr: &str) -> String {
        let mut fields: Vec<String> = cron_expr.split_whitespace().map(str::to_string).collect();
        if fields.len() != CRONTAB_FIELDS_COUNT {
            return fields.join(" ");
        }

        fields[CRONTAB_DOW_INDEX] = Self::crontab_day_of_week(&fields[CRONTAB_DOW_INDEX]);
        format!("0 {}", fields.join(" "))
    }

    /// 把crontab星期字段改写成名称列表
    ///
    /// 无法识别的条目原样保留，交给 `cron` crate 报错。
    fn crontab_day_of_week(field: &str) -> String {
        let mut days: Vec<&str> = Vec::new();
        let mut passthrough: Vec<&str> = Vec::new();

        for item in field.split(',') {
            match Self::crontab_day_numbers(item) {
                Some(numbers) => {
                    for name in numbers.into_iter().map(|n| CRONTAB_DAY_NAMES[n % 7]) {
                        if !days.contains(&name) {
                            days.push(name);
                        }
                    }
                }
                None => passthrough.push(item),
            }
        }

        days.into_iter().chain(passthrough).collect::<Vec<_>>().join(",")
    }

    /// 展开单个星期条目（`N`、`A-B`、`*/S`、`A-B/S`、`N/S`）为0-7的编号
    fn crontab_day_numbers(item: &str) -> Option<Vec<usize>> {
        let (base, step) = match item.split_once('/') {
            Some((base, step)) => (base, Some(step.parse::<usize>().ok().filter(|s| *s > 0)?)),
            None => (item, None),
        };

        let (start, end) = match base.split_once('-') {
            Some((a, b)) => (a.parse::<usize>().ok()?, b.parse::<usize>().ok()?),
            None if base == "*" || base == "?" => {
                // 不带步长的通配符不需要改写
                step?;
                (0, 6)
            }
            None => {
                let day = base.parse::<usize>().ok()?;
                (day, if step.is_some() { 6 } else { day })
            }
        };

        if start > end || end > 7 {
            return None;
        }
        Some((start..=end).step_by(step.unwrap_or(1)).collect())
    }

    /// 获取 `from` 之后（不含）的下一次执行时间
    pub fn next_execution_time(&self, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&from).next()
    }

    /// 推算下一次执行时间，没有未来执行点时同样视为无效表达式
    pub fn predict_next_run(cron_expr: &str, after: DateTime<Utc>) -> SchedulerResult<DateTime<Utc>> {
        let scheduler = Self::new(cron_expr)?;
        scheduler.next_execution_time(after).ok_or_else(|| {
            SchedulerError::invalid_cron(cron_expr, "表达式在此时间之后没有执行点")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike, Weekday};

    #[test]
    fn test_cron_scheduler_creation() {
        assert!(CronScheduler::new("0 0 0 * * *").is_ok());
        assert!(CronScheduler::new("0 * * * *").is_ok());
        assert!(CronScheduler::new("invalid").is_err());
    }

    #[test]
    fn test_crontab_expression_is_normalized() {
        let scheduler = CronScheduler::new("  0 *  * * * ").unwrap();

        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap();
        let next = scheduler.next_execution_time(now).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 1, 1, 13, 0, 0).unwrap());
    }

    #[test]
    fn test_invalid_cron_keeps_original_expression() {
        match CronScheduler::new("61 * * * *").unwrap_err() {
            SchedulerError::InvalidCron { expr, .. } => assert_eq!(expr, "61 * * * *"),
            other => panic!("Expected InvalidCron error, got {other:?}"),
        }
    }

    #[test]
    fn test_next_execution_time_is_strictly_after() {
        let scheduler = CronScheduler::new("0 0 * * * *").unwrap();
        let on_the_hour = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let next = scheduler.next_execution_time(on_the_hour).unwrap();
        assert_eq!(next.hour(), 13);
    }

    #[test]
    fn test_predict_next_run() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap();
        let next = CronScheduler::predict_next_run("30 2 * * *", now).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 1, 2, 2, 30, 0).unwrap());

        assert!(CronScheduler::predict_next_run("not a cron", now).is_err());
    }

    #[test]
    fn test_crontab_day_of_week_numbering() {
        // 2024-01-01 是周一
        let monday = Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap();

        let next = CronScheduler::predict_next_run("0 9 * * 1", monday).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap());
        assert_eq!(next.weekday(), Weekday::Mon);

        let next = CronScheduler::predict_next_run("0 0 * * 0", monday).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap());
        assert_eq!(next.weekday(), Weekday::Sun);

        let next = CronScheduler::predict_next_run("0 0 * * 7", monday).unwrap();
        assert_eq!(next.weekday(), Weekday::Sun);
    }

    #[test]
    fn test_crontab_day_of_week_ranges_lists_and_steps() {
        let monday = Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap();

        let next = CronScheduler::predict_next_run("0 9 * * 1-5", monday).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap());

        let next = CronScheduler::predict_next_run("0 9 * * 5,6", monday).unwrap();
        assert_eq!(next.weekday(), Weekday::Fri);

        let next = CronScheduler::predict_next_run("0 9 * * 5-7", monday).unwrap();
        assert_eq!(next.weekday(), Weekday::Fri);

        // 0,2,4,6 => 周日、周二、周四、周六
        let next = CronScheduler::predict_next_run("0 9 * * */2", monday).unwrap();
        assert_eq!(next.weekday(), Weekday::Tue);

        let next = CronScheduler::predict_next_run("0 3 * * SUN", monday).unwrap();
        assert_eq!(next.weekday(), Weekday::Sun);
    }

    #[test]
    fn test_crontab_day_of_week_out_of_range_is_invalid() {
        let monday = Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap();
        assert!(matches!(
            CronScheduler::predict_next_run("0 9 * * 8", monday),
            Err(SchedulerError::InvalidCron { .. })
        ));
    }

    #[test]
    fn test_native_expression_keeps_cron_crate_numbering() {
        let monday = Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap();
        // 6段表达式中 1 表示周日
        let next = CronScheduler::predict_next_run("0 0 9 * * 1", monday).unwrap();
        assert_eq!(next.weekday(), Weekday::Sun);
    }

    #[test]
    fn test_predict_next_run_without_future_fire_time() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap();
        let result = CronScheduler::predict_next_run("0 0 0 1 1 * 2020", now);
        assert!(matches!(result, Err(SchedulerError::InvalidCron { .. })));
    }
}
