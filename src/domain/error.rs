// ==========================================
// 任务管理系统 - 领域层错误类型
// ==========================================
// 依据: Rust 错误处理最佳实践
// 依据: Scheduler_Specs_v0.4_Integrated.md - 7. 错误分类
// 工具: thiserror 派生宏
// ==========================================

use chrono::NaiveDate;
use thiserror::Error;

/// 周期规则校验错误
///
/// 全部在规则构造时抛出,引擎内部不做延迟校验
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    // ===== 周期字段错误 =====
    #[error("无效的重复间隔: interval={0}, 必须 >= 1")]
    InvalidInterval(u32),

    #[error("按周重复的星期集合为空")]
    EmptyWeekdays,

    #[error("无效的星期索引: {0}, 允许范围 0-6 (0=周日)")]
    InvalidWeekday(u8),

    #[error("按月重复必须且只能选择一种日期方式 (固定日期 或 第N个星期X)")]
    AmbiguousMonthlyVariant,

    #[error("第N个星期X方式需要同时给出 week_of_month 与 weekday")]
    IncompleteMonthlyWeekday,

    #[error("无效的月内日期: day_of_month={0}, 允许范围 1-31")]
    InvalidDayOfMonth(u32),

    #[error("无效的月内周序: week_of_month={0}, 允许 1-4 或 -1 (最后一周)")]
    InvalidWeekOfMonth(i32),

    #[error("按年重复缺少 month_of_year")]
    MissingMonthOfYear,

    #[error("无效的月份: month_of_year={0}, 允许范围 1-12")]
    InvalidMonthOfYear(u32),

    // ===== 结束条件错误 =====
    #[error("按日期结束缺少 end_date")]
    MissingEndDate,

    #[error("按次数结束缺少 end_count")]
    MissingEndCount,

    #[error("无效的结束次数: end_count={0}, 必须 >= 1")]
    InvalidEndCount(u32),

    // ===== 物化起点错误 =====
    #[error("计划开始日期早于锚点日期: scheduled_from={scheduled_from}, anchor_date={anchor_date}")]
    ScheduledFromBeforeAnchor {
        scheduled_from: NaiveDate,
        anchor_date: NaiveDate,
    },
}

/// Result 类型别名
pub type ValidationResult<T> = Result<T, ValidationError>;
