// ==========================================
// 任务管理系统 - 周期日期推演引擎
// ==========================================
// 依据: Scheduler_Specs_v0.4_Integrated.md - 2. Occurrence Sequencer
// 职责: 周期规则 × 参考日期 -> 严格递增的发生日期序列
// 红线: 纯函数,无共享状态,相同输入必得相同序列
// ==========================================

use crate::domain::recurrence::{
    weekday_index, EndCondition, RecurrencePattern, RecurrenceRule,
};
use crate::domain::types::WeekOfMonth;
use chrono::{Datelike, Duration, NaiveDate};

// ==========================================
// OccurrenceSequencer - 日期推演引擎
// ==========================================
pub struct OccurrenceSequencer;

impl OccurrenceSequencer {
    /// 生成发生日期序列 (惰性迭代器)
    ///
    /// # 规则 (Scheduler_Specs 2.1)
    /// - 首个产出日期 >= max(from, 规则有效起点)
    /// - 输出严格递增,无重复
    /// - 结束条件满足即终止; Never 规则无界,由调用方截取
    ///
    /// # 参数
    /// - rule: 校验过的周期规则
    /// - from: 参考日期 (通常为"今天"或视野起点)
    pub fn generate(rule: &RecurrenceRule, from: NaiveDate) -> OccurrenceIter {
        OccurrenceIter::new(rule.clone(), from)
    }

    /// 某月最后一天
    pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
    }

    /// 月内日期,短月截断到月末
    ///
    /// # 示例
    /// ```
    /// use task_recur_scheduler::engine::OccurrenceSequencer;
    ///
    /// // 2026年2月没有31号 -> 截断到 2月28日
    /// let date = OccurrenceSequencer::clamped_day_of_month(2026, 2, 31).unwrap();
    /// assert_eq!(date, chrono::NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
    /// ```
    pub fn clamped_day_of_month(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, month, day).or_else(|| Self::last_day_of_month(year, month))
    }

    /// 某月第N个星期X / 最后一个星期X
    ///
    /// # 规则 (Scheduler_Specs 2.3)
    /// - First..Fourth: 从1号起正向数
    /// - Last: 从月末逆向找,部分月份有五个同名星期,不得按第四周近似
    ///
    /// # 示例
    /// ```
    /// use task_recur_scheduler::domain::types::WeekOfMonth;
    /// use task_recur_scheduler::engine::OccurrenceSequencer;
    ///
    /// // 2026年1月的周五: 2,9,16,23,30 -> 最后一个是第五周的30号
    /// let date = OccurrenceSequencer::nth_weekday_of_month(2026, 1, 5, WeekOfMonth::Last).unwrap();
    /// assert_eq!(date, chrono::NaiveDate::from_ymd_opt(2026, 1, 30).unwrap());
    /// ```
    pub fn nth_weekday_of_month(
        year: i32,
        month: u32,
        weekday: u8,
        week: WeekOfMonth,
    ) -> Option<NaiveDate> {
        match week.forward_offset() {
            Some(offset) => {
                let first = NaiveDate::from_ymd_opt(year, month, 1)?;
                let delta = (7 + i64::from(weekday) - i64::from(weekday_index(first))) % 7;
                first.checked_add_signed(Duration::days(delta + i64::from(offset) * 7))
            }
            None => {
                let last = Self::last_day_of_month(year, month)?;
                let delta = (7 + i64::from(weekday_index(last)) - i64::from(weekday)) % 7;
                last.checked_sub_signed(Duration::days(delta))
            }
        }
    }
}

/// 是否落在周末 (周六/周日)
fn is_weekend(date: NaiveDate) -> bool {
    matches!(weekday_index(date), 0 | 6)
}

/// (年,月) 前进 delta 个月
fn add_months(year: i32, month: u32, delta: i64) -> (i32, u32) {
    let zero_based = i64::from(year) * 12 + i64::from(month) - 1 + delta;
    (
        zero_based.div_euclid(12) as i32,
        (zero_based.rem_euclid(12) + 1) as u32,
    )
}

// ==========================================
// OccurrenceIter - 惰性发生日期迭代器
// ==========================================
// 可克隆、可重启 (重新调用 generate 即得同一序列)
#[derive(Debug, Clone)]
pub struct OccurrenceIter {
    rule: RecurrenceRule,
    start: NaiveDate,
    cursor: Cursor,
    emitted: u32,
    done: bool,
}

/// 各重复类型的推演游标
#[derive(Debug, Clone)]
enum Cursor {
    Daily {
        next: NaiveDate,
    },
    Weekly {
        block_start: NaiveDate, // 当前周期块的周日
        days: Vec<u8>,          // 升序星期索引
        slot: usize,
    },
    Monthly {
        year: i32,
        month: u32,
    },
    Yearly {
        year: i32,
    },
}

impl OccurrenceIter {
    fn new(rule: RecurrenceRule, from: NaiveDate) -> Self {
        let start = rule.effective_start(from);
        let mut done = false;

        let cursor = match &rule.pattern {
            RecurrencePattern::Daily { business_days_only } => {
                // 间隔为 7 的倍数且起点踩在周末: 网格上的每一步都落在同一星期,
                // 序列不含任何工作日,直接判空而不是空转扫描
                if *business_days_only && rule.interval % 7 == 0 && is_weekend(start) {
                    done = true;
                }
                Cursor::Daily { next: start }
            }
            RecurrencePattern::Weekly { weekdays } => {
                let days: Vec<u8> = weekdays.iter().copied().collect();
                let back = i64::from(weekday_index(start));
                let block_start = match start.checked_sub_signed(Duration::days(back)) {
                    Some(d) => d,
                    None => {
                        // 日历下界,序列判空
                        done = true;
                        start
                    }
                };
                Cursor::Weekly {
                    block_start,
                    days,
                    slot: 0,
                }
            }
            RecurrencePattern::MonthlyByDate { .. } | RecurrencePattern::MonthlyByWeekday { .. } => {
                // 月网格锚定在锚点所在月
                Cursor::Monthly {
                    year: rule.anchor_date.year(),
                    month: rule.anchor_date.month(),
                }
            }
            RecurrencePattern::Yearly { .. } => Cursor::Yearly {
                year: rule.anchor_date.year(),
            },
        };

        Self {
            rule,
            start,
            cursor,
            emitted: 0,
            done,
        }
    }

    /// 产出当前游标的候选日期并前进一步
    ///
    /// None = 日历越界,序列耗尽
    fn advance(cursor: &mut Cursor, pattern: &RecurrencePattern, interval: i64) -> Option<NaiveDate> {
        match cursor {
            Cursor::Daily { next } => {
                let candidate = *next;
                *next = next.checked_add_signed(Duration::days(interval))?;
                Some(candidate)
            }
            Cursor::Weekly {
                block_start,
                days,
                slot,
            } => {
                let day = *days.get(*slot)?;
                let candidate = block_start.checked_add_signed(Duration::days(i64::from(day)))?;
                *slot += 1;
                if *slot >= days.len() {
                    *slot = 0;
                    *block_start = block_start.checked_add_signed(Duration::days(7 * interval))?;
                }
                Some(candidate)
            }
            Cursor::Monthly { year, month } => {
                let candidate = match pattern {
                    RecurrencePattern::MonthlyByDate { day_of_month } => {
                        OccurrenceSequencer::clamped_day_of_month(*year, *month, *day_of_month)
                    }
                    RecurrencePattern::MonthlyByWeekday {
                        week_of_month,
                        weekday,
                    } => OccurrenceSequencer::nth_weekday_of_month(
                        *year,
                        *month,
                        *weekday,
                        *week_of_month,
                    ),
                    _ => None, // 游标与模式错配,不可达
                }?;
                let (next_year, next_month) = add_months(*year, *month, interval);
                *year = next_year;
                *month = next_month;
                Some(candidate)
            }
            Cursor::Yearly { year } => {
                let candidate = match pattern {
                    RecurrencePattern::Yearly {
                        month_of_year,
                        day_of_month,
                    } => OccurrenceSequencer::clamped_day_of_month(
                        *year,
                        *month_of_year,
                        *day_of_month,
                    ),
                    _ => None,
                }?;
                *year = year.checked_add(i32::try_from(interval).ok()?)?;
                Some(candidate)
            }
        }
    }
}

impl Iterator for OccurrenceIter {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.done {
            return None;
        }
        if let EndCondition::AfterCount { count } = self.rule.end {
            if self.emitted >= count {
                self.done = true;
                return None;
            }
        }

        let interval = i64::from(self.rule.interval);
        loop {
            let candidate = match Self::advance(&mut self.cursor, &self.rule.pattern, interval) {
                Some(d) => d,
                None => {
                    self.done = true;
                    return None;
                }
            };

            // 结束条件先于过滤判断: 越过 end 即终止
            if let EndCondition::OnDate { end } = self.rule.end {
                if candidate > end {
                    self.done = true;
                    return None;
                }
            }

            // 有效起点之前的网格点只前进不产出
            if candidate < self.start {
                continue;
            }

            // 仅工作日: 过滤后时钟仍按原间隔走
            if let RecurrencePattern::Daily {
                business_days_only: true,
            } = self.rule.pattern
            {
                if is_weekend(candidate) {
                    continue;
                }
            }

            self.emitted += 1;
            return Some(candidate);
        }
    }
}
