// ==========================================
// 任务管理系统 - 工作日窗口领域模型
// ==========================================
// 依据: Task_Dev_Master_Spec.md - PART C 工作日历
// 依据: Scheduler_Specs_v0.4_Integrated.md - 3. 槽位分配
// ==========================================

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

// ==========================================
// WorkdayWindow - 工作日窗口
// ==========================================
// 约束: day_start < break_start < break_end < day_end
// 校验在 SlotLane 构造时执行,此处只承载数据
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkdayWindow {
    pub day_start: NaiveTime,       // 上班时刻
    pub break_start: NaiveTime,     // 午休开始
    pub break_end: NaiveTime,       // 午休结束
    pub day_end: NaiveTime,         // 下班时刻
    pub max_slot_minutes: i64,      // 单槽时长上限 (分钟)
}

impl WorkdayWindow {
    /// 上午可用时长 (分钟)
    pub fn morning_minutes(&self) -> i64 {
        minutes_of(self.break_start) - minutes_of(self.day_start)
    }

    /// 下午可用时长 (分钟)
    pub fn afternoon_minutes(&self) -> i64 {
        minutes_of(self.day_end) - minutes_of(self.break_end)
    }

    /// 全天可用时长 (分钟,扣除午休)
    pub fn working_minutes_per_day(&self) -> i64 {
        self.morning_minutes() + self.afternoon_minutes()
    }
}

/// 时刻 -> 自午夜起的分钟数
pub(crate) fn minutes_of(t: NaiveTime) -> i64 {
    use chrono::Timelike;
    i64::from(t.num_seconds_from_midnight()) / 60
}

// ==========================================
// PlacementRequest - 待排任务
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementRequest {
    pub subject: String,            // 任务主题
    pub duration_minutes: i64,      // 预计时长 (分钟)
}

// ==========================================
// SlotAssignment - 槽位分配结果
// ==========================================
// 红线: 只是排程快照,由持久化协作方落库
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub subject: String,            // 任务主题
    pub starts_at: NaiveDateTime,   // 槽位开始时刻
    pub duration_minutes: i64,      // 实际分配时长 (截断后)
}

// ==========================================
// SlotSegment - 拆分子槽
// ==========================================
// 用途: 超长任务跨槽拆分 (allocate_split)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSegment {
    pub starts_at: NaiveDateTime,   // 子槽开始时刻
    pub duration_minutes: i64,      // 子槽时长 (分钟)
}

// ==========================================
// SplitAssignment - 拆分分配结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitAssignment {
    pub subject: String,            // 任务主题
    pub segments: Vec<SlotSegment>, // 有序子槽列表
}

// ==========================================
// ScheduledOccurrence - 物化的周期发生
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledOccurrence {
    pub occurs_on: NaiveDate,       // 发生日期
    pub starts_at: NaiveDateTime,   // 当日开始时刻
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> WorkdayWindow {
        WorkdayWindow {
            day_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            break_start: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
            break_end: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            day_end: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            max_slot_minutes: 120,
        }
    }

    #[test]
    fn test_window_spans() {
        let w = window();
        assert_eq!(w.morning_minutes(), 240);
        assert_eq!(w.afternoon_minutes(), 240);
        assert_eq!(w.working_minutes_per_day(), 480);
    }
}
