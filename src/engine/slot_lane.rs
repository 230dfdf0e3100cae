// ==========================================
// 任务管理系统 - 工作日槽位分配引擎
// ==========================================
// 依据: Scheduler_Specs_v0.4_Integrated.md - 3. Slot Lane
// 职责: 把时长请求打包进工作日内的时段槽位
// 红线: 单一持有者; 游标只进不退 (reset 除外); 与周期概念无关
// ==========================================

use crate::domain::workday::{minutes_of, SlotSegment, WorkdayWindow};
use crate::engine::error::{EngineError, EngineResult};
use anyhow::anyhow;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

// ==========================================
// SlotLane - 槽位分配车道
// ==========================================
// 一条车道服务一个主体/一批任务,用完即弃;
// 禁止进程级共享复用 (跨主体复用会破坏确定性)
#[derive(Debug, Clone)]
pub struct SlotLane {
    window: WorkdayWindow,
    base_date: NaiveDate,
    cursor_minutes: i64, // 当日游标 (自午夜起的分钟)
    day_offset: i64,     // 距 base_date 的天数
}

impl SlotLane {
    /// 创建车道,游标置于首日上班时刻
    ///
    /// # 参数
    /// - base_date: 车道基准日期
    /// - window: 工作日窗口配置
    ///
    /// # 返回
    /// - Err(InvalidConfiguration): 窗口顺序或单槽上限非法,
    ///   在构造期一次性拒绝,allocate 内不再校验
    pub fn new(base_date: NaiveDate, window: WorkdayWindow) -> EngineResult<Self> {
        Self::validate_window(&window)?;
        Ok(Self {
            cursor_minutes: minutes_of(window.day_start),
            window,
            base_date,
            day_offset: 0,
        })
    }

    /// 窗口配置校验: day_start < break_start < break_end < day_end
    pub(crate) fn validate_window(window: &WorkdayWindow) -> EngineResult<()> {
        let ordered = window.day_start < window.break_start
            && window.break_start < window.break_end
            && window.break_end < window.day_end;
        if !ordered {
            return Err(EngineError::InvalidConfiguration {
                reason: format!(
                    "窗口顺序必须满足 day_start < break_start < break_end < day_end, 实际 {} / {} / {} / {}",
                    window.day_start, window.break_start, window.break_end, window.day_end
                ),
            });
        }
        if window.max_slot_minutes < 1 {
            return Err(EngineError::InvalidConfiguration {
                reason: format!(
                    "单槽上限必须 >= 1 分钟, 实际 {}",
                    window.max_slot_minutes
                ),
            });
        }
        Ok(())
    }

    /// 分配一个槽位,返回开始时刻
    ///
    /// # 规则 (Scheduler_Specs 3.2)
    /// 1. 时长超过单槽上限时静默截断 (历史行为,拆分见 allocate_split)
    /// 2. 槽位与午休窗口相交 (或游标已在午休内) -> 游标推到午休结束
    /// 3. 放不进当日 -> 滚动到次日上班时刻,再做一次午休判断
    ///
    /// # 返回
    /// - Ok(NaiveDateTime): 槽位开始时刻
    /// - Err(InvalidDuration): 非正时长,车道状态不变
    pub fn allocate(&mut self, duration_minutes: i64) -> EngineResult<NaiveDateTime> {
        if duration_minutes <= 0 {
            return Err(EngineError::InvalidDuration {
                minutes: duration_minutes,
            });
        }

        let clamped = duration_minutes.min(self.window.max_slot_minutes);
        if clamped < duration_minutes {
            debug!(
                requested = duration_minutes,
                clamped, "时长超过单槽上限, 已截断"
            );
        }

        let mut cursor = self.cursor_minutes;
        let mut day = self.day_offset;

        cursor = self.push_past_break(cursor, clamped);
        if cursor + clamped > minutes_of(self.window.day_end) {
            day += 1;
            cursor = minutes_of(self.window.day_start);
            cursor = self.push_past_break(cursor, clamped);
            debug!(day_offset = day, "当日放不下, 滚动到次日");
        }

        let starts_at = self.stamp(day, cursor)?;

        // 全部计算成功后才提交状态
        self.cursor_minutes = cursor + clamped;
        self.day_offset = day;
        Ok(starts_at)
    }

    /// 分配并按需拆分超长任务
    ///
    /// 与 allocate 的区别: 超过单槽上限的时长不丢弃,而是切成
    /// 连续子槽 (每段 <= 上限,不跨午休、不跨下班,按需跨日)
    ///
    /// # 返回
    /// - Ok(Vec<SlotSegment>): 有序子槽; 时长不超限且不跨界时只有一段
    pub fn allocate_split(&mut self, duration_minutes: i64) -> EngineResult<Vec<SlotSegment>> {
        if duration_minutes <= 0 {
            return Err(EngineError::InvalidDuration {
                minutes: duration_minutes,
            });
        }

        let day_start = minutes_of(self.window.day_start);
        let break_start = minutes_of(self.window.break_start);
        let break_end = minutes_of(self.window.break_end);
        let day_end = minutes_of(self.window.day_end);

        let mut cursor = self.cursor_minutes;
        let mut day = self.day_offset;
        let mut remaining = duration_minutes;
        let mut segments = Vec::new();

        while remaining > 0 {
            // 游标落在午休内 -> 推到午休结束
            if cursor >= break_start && cursor < break_end {
                cursor = break_end;
            }
            // 当日已无余量 -> 跨日
            if cursor >= day_end {
                day += 1;
                cursor = day_start;
            }

            // 当前连续可用段的边界
            let boundary = if cursor < break_start { break_start } else { day_end };
            let span = boundary - cursor;
            let chunk = remaining.min(self.window.max_slot_minutes).min(span);

            segments.push(SlotSegment {
                starts_at: self.stamp(day, cursor)?,
                duration_minutes: chunk,
            });
            cursor += chunk;
            remaining -= chunk;
        }

        debug!(
            requested = duration_minutes,
            segment_count = segments.len(),
            "拆分分配完成"
        );

        self.cursor_minutes = cursor;
        self.day_offset = day;
        Ok(segments)
    }

    /// 游标重置到当日上班时刻 (day_offset 不变)
    pub fn reset(&mut self) {
        self.cursor_minutes = minutes_of(self.window.day_start);
        debug!(day_offset = self.day_offset, "槽位游标已重置");
    }

    /// 车道基准日期
    pub fn base_date(&self) -> NaiveDate {
        self.base_date
    }

    /// 距基准日期的天数
    pub fn day_offset(&self) -> i64 {
        self.day_offset
    }

    /// 当前游标时刻
    pub fn cursor_time(&self) -> NaiveTime {
        NaiveTime::from_num_seconds_from_midnight_opt((self.cursor_minutes * 60) as u32, 0)
            .unwrap_or(self.window.day_end)
    }

    /// 窗口配置
    pub fn window(&self) -> &WorkdayWindow {
        &self.window
    }

    /// 槽位 [cursor, cursor+d) 是否与午休窗口相交
    fn push_past_break(&self, cursor: i64, duration: i64) -> i64 {
        let break_start = minutes_of(self.window.break_start);
        let break_end = minutes_of(self.window.break_end);
        if cursor < break_end && cursor + duration > break_start {
            break_end
        } else {
            cursor
        }
    }

    /// (day_offset, 分钟游标) -> 具体时刻
    fn stamp(&self, day: i64, minutes: i64) -> EngineResult<NaiveDateTime> {
        let date = self
            .base_date
            .checked_add_signed(Duration::days(day))
            .ok_or_else(|| anyhow!("排程日期越出日历可表示范围: base={}, day_offset={}", self.base_date, day))?;
        let time = NaiveTime::from_num_seconds_from_midnight_opt((minutes * 60) as u32, 0)
            .ok_or_else(|| anyhow!("槽位时刻越界: {} 分钟", minutes))?;
        Ok(date.and_time(time))
    }
}
