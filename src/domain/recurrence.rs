// ==========================================
// 任务管理系统 - 周期规则领域模型
// ==========================================
// 依据: Task_Dev_Master_Spec.md - PART B 周期任务体系
// 依据: Scheduler_Specs_v0.4_Integrated.md - 1. 周期规则全集
// ==========================================
// 职责: 扁平配置载荷 -> 类型安全的周期规则
// 红线: 规则一经构造不可变,非法组合不可表示
// ==========================================

use crate::domain::error::{ValidationError, ValidationResult};
use crate::domain::types::{EndMode, RepeatKind, WeekOfMonth};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 星期索引 (0=周日 .. 6=周六)
///
/// 与前端配置及历史数据的 0-6 约定一致
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

// ==========================================
// RecurrenceSpec - 前端扁平配置载荷
// ==========================================
// 前端把四种重复类型的子字段收进同一张表单,
// 未选中类型的字段原样留空; 本结构只做承接,
// 一切校验在 RecurrenceRule::from_spec 中完成
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurrenceSpec {
    /// 重复类型
    pub repeat_type: RepeatKind,

    /// 重复间隔 ("每 N 个周期")
    #[serde(default = "default_interval")]
    pub interval: u32,

    /// 按周: 选中的星期集合 (0=周日 .. 6=周六)
    #[serde(default)]
    pub weekdays: Option<Vec<u8>>,

    /// 按月(固定日期)/按年: 月内日期 1-31
    #[serde(default)]
    pub day_of_month: Option<u32>,

    /// 按月(第N个星期X): 周序 1,2,3,4 或 -1 (最后一周)
    #[serde(default)]
    pub week_of_month: Option<i32>,

    /// 按月(第N个星期X): 星期索引 0-6
    #[serde(default)]
    pub weekday: Option<u8>,

    /// 按年: 月份 1-12
    #[serde(default)]
    pub month_of_year: Option<u32>,

    /// 结束模式
    #[serde(default)]
    pub end_mode: EndMode,

    /// 结束日期 (end_mode=ON_DATE 时必填)
    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    /// 结束次数 (end_mode=AFTER_COUNT 时必填)
    #[serde(default)]
    pub end_count: Option<u32>,

    /// 锚点日期 (首次发生的那条任务的日期)
    pub anchor_date: NaiveDate,

    /// 计划开始日期 (留空 = 立即物化)
    #[serde(default)]
    pub scheduled_from: Option<NaiveDate>,

    /// 仅工作日 (按天重复时有效)
    #[serde(default)]
    pub business_days_only: bool,
}

fn default_interval() -> u32 {
    1
}

// ==========================================
// RecurrencePattern - 类型安全的重复模式
// ==========================================
// 红线: 每个分支只携带自己需要的字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurrencePattern {
    /// 按天重复
    Daily { business_days_only: bool },

    /// 按周重复: 每个周期周内逐个星期发生
    Weekly { weekdays: BTreeSet<u8> },

    /// 按月重复: 固定日期 (短月截断到月末)
    MonthlyByDate { day_of_month: u32 },

    /// 按月重复: 第N个星期X
    MonthlyByWeekday {
        week_of_month: WeekOfMonth,
        weekday: u8,
    },

    /// 按年重复
    Yearly { month_of_year: u32, day_of_month: u32 },
}

// ==========================================
// EndCondition - 结束条件
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndCondition {
    /// 永不结束 (序列无界,由调用方截取)
    Never,
    /// 发生日期超过 end 即结束 (含 end 当天)
    OnDate { end: NaiveDate },
    /// 发生满 count 次即结束
    AfterCount { count: u32 },
}

// ==========================================
// Materialization - 物化起点
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Materialization {
    /// 自锚点日期起立即生效
    Immediate,
    /// 自指定日期起生效 (不得早于锚点)
    ScheduledFrom { start: NaiveDate },
}

// ==========================================
// RecurrenceRule - 周期规则
// ==========================================
// 红线: 只能经 from_spec 构造,构造即校验
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub pattern: RecurrencePattern,
    pub interval: u32,
    pub end: EndCondition,
    pub anchor_date: NaiveDate,
    pub materialization: Materialization,
}

impl RecurrenceRule {
    /// 从前端扁平配置构造规则 (唯一入口)
    ///
    /// 校验全部在此完成,失败即返回,不做部分构造。
    /// 未选中类型残留的无关字段被忽略 (前端表单不清空它们)。
    ///
    /// # 参数
    /// - spec: 扁平配置载荷
    ///
    /// # 返回
    /// - Ok(RecurrenceRule): 校验通过的不可变规则
    /// - Err(ValidationError): 第一个命中的校验错误
    pub fn from_spec(spec: &RecurrenceSpec) -> ValidationResult<Self> {
        if spec.interval < 1 {
            return Err(ValidationError::InvalidInterval(spec.interval));
        }

        let pattern = match spec.repeat_type {
            RepeatKind::Daily => RecurrencePattern::Daily {
                business_days_only: spec.business_days_only,
            },
            RepeatKind::Weekly => RecurrencePattern::Weekly {
                weekdays: Self::validate_weekdays(spec)?,
            },
            RepeatKind::Monthly => Self::validate_monthly(spec)?,
            RepeatKind::Yearly => Self::validate_yearly(spec)?,
        };

        let end = match spec.end_mode {
            EndMode::Never => EndCondition::Never,
            EndMode::OnDate => {
                let end = spec.end_date.ok_or(ValidationError::MissingEndDate)?;
                EndCondition::OnDate { end }
            }
            EndMode::AfterCount => {
                let count = spec.end_count.ok_or(ValidationError::MissingEndCount)?;
                if count < 1 {
                    return Err(ValidationError::InvalidEndCount(count));
                }
                EndCondition::AfterCount { count }
            }
        };

        let materialization = match spec.scheduled_from {
            None => Materialization::Immediate,
            Some(start) => {
                if start < spec.anchor_date {
                    return Err(ValidationError::ScheduledFromBeforeAnchor {
                        scheduled_from: start,
                        anchor_date: spec.anchor_date,
                    });
                }
                Materialization::ScheduledFrom { start }
            }
        };

        Ok(Self {
            pattern,
            interval: spec.interval,
            end,
            anchor_date: spec.anchor_date,
            materialization,
        })
    }

    /// 按周: 星期集合校验 (未给出 = 默认锚点所在星期)
    fn validate_weekdays(spec: &RecurrenceSpec) -> ValidationResult<BTreeSet<u8>> {
        match &spec.weekdays {
            None => {
                let mut days = BTreeSet::new();
                days.insert(weekday_index(spec.anchor_date));
                Ok(days)
            }
            Some(raw) if raw.is_empty() => Err(ValidationError::EmptyWeekdays),
            Some(raw) => {
                let mut days = BTreeSet::new();
                for &d in raw {
                    if d > 6 {
                        return Err(ValidationError::InvalidWeekday(d));
                    }
                    days.insert(d);
                }
                Ok(days)
            }
        }
    }

    /// 按月: 两种日期方式必须且只能二选一
    fn validate_monthly(spec: &RecurrenceSpec) -> ValidationResult<RecurrencePattern> {
        let fixed = spec.day_of_month.is_some();
        let nth = spec.week_of_month.is_some() || spec.weekday.is_some();

        match (fixed, nth) {
            (true, true) | (false, false) => Err(ValidationError::AmbiguousMonthlyVariant),
            (true, false) => {
                let day = spec.day_of_month.unwrap_or_default();
                if !(1..=31).contains(&day) {
                    return Err(ValidationError::InvalidDayOfMonth(day));
                }
                Ok(RecurrencePattern::MonthlyByDate { day_of_month: day })
            }
            (false, true) => {
                let (raw_week, weekday) = match (spec.week_of_month, spec.weekday) {
                    (Some(w), Some(d)) => (w, d),
                    _ => return Err(ValidationError::IncompleteMonthlyWeekday),
                };
                let week = WeekOfMonth::from_index(raw_week)
                    .ok_or(ValidationError::InvalidWeekOfMonth(raw_week))?;
                if weekday > 6 {
                    return Err(ValidationError::InvalidWeekday(weekday));
                }
                Ok(RecurrencePattern::MonthlyByWeekday {
                    week_of_month: week,
                    weekday,
                })
            }
        }
    }

    /// 按年: 月份必填,月内日期默认取锚点的日
    fn validate_yearly(spec: &RecurrenceSpec) -> ValidationResult<RecurrencePattern> {
        let month = spec
            .month_of_year
            .ok_or(ValidationError::MissingMonthOfYear)?;
        if !(1..=12).contains(&month) {
            return Err(ValidationError::InvalidMonthOfYear(month));
        }
        let day = spec.day_of_month.unwrap_or_else(|| spec.anchor_date.day());
        if !(1..=31).contains(&day) {
            return Err(ValidationError::InvalidDayOfMonth(day));
        }
        Ok(RecurrencePattern::Yearly {
            month_of_year: month,
            day_of_month: day,
        })
    }

    /// 序列的有效起点
    ///
    /// # 规则
    /// - 立即物化: max(from, anchor_date)
    /// - 计划开始: max(from, scheduled_from)
    pub fn effective_start(&self, from: NaiveDate) -> NaiveDate {
        let floor = match self.materialization {
            Materialization::Immediate => self.anchor_date,
            Materialization::ScheduledFrom { start } => start,
        };
        from.max(floor)
    }
}
