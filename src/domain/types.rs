// ==========================================
// 任务管理系统 - 领域类型定义
// ==========================================
// 依据: Task_Dev_Master_Spec.md - PART B 周期任务体系
// 依据: Scheduler_Specs_v0.4_Integrated.md - 0.2 重复类型全集
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 重复类型 (Repeat Kind)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与前端配置一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepeatKind {
    Daily,   // 按天
    Weekly,  // 按周
    Monthly, // 按月
    Yearly,  // 按年
}

impl fmt::Display for RepeatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatKind::Daily => write!(f, "DAILY"),
            RepeatKind::Weekly => write!(f, "WEEKLY"),
            RepeatKind::Monthly => write!(f, "MONTHLY"),
            RepeatKind::Yearly => write!(f, "YEARLY"),
        }
    }
}

// ==========================================
// 结束模式 (End Mode)
// ==========================================
// 前端配置的扁平字段,经校验后转换为 EndCondition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndMode {
    #[default]
    Never,      // 永不结束
    OnDate,     // 按日期结束 (需配合 end_date)
    AfterCount, // 按次数结束 (需配合 end_count)
}

impl fmt::Display for EndMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndMode::Never => write!(f, "NEVER"),
            EndMode::OnDate => write!(f, "ON_DATE"),
            EndMode::AfterCount => write!(f, "AFTER_COUNT"),
        }
    }
}

// ==========================================
// 月内周序 (Week Of Month)
// ==========================================
// 外部配置取值: 1,2,3,4 或 -1 (最后一周)
// 红线: "最后" 不等于第四周,部分月份有五个同名星期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeekOfMonth {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl WeekOfMonth {
    /// 从扁平配置的整数取值转换
    ///
    /// # 参数
    /// - index: 1,2,3,4 或 -1 (最后一周)
    ///
    /// # 返回
    /// - Some(WeekOfMonth): 合法取值
    /// - None: 超出取值范围
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            1 => Some(WeekOfMonth::First),
            2 => Some(WeekOfMonth::Second),
            3 => Some(WeekOfMonth::Third),
            4 => Some(WeekOfMonth::Fourth),
            -1 => Some(WeekOfMonth::Last),
            _ => None,
        }
    }

    /// 正向周序 (First..Fourth → 0..3, Last → None)
    pub fn forward_offset(&self) -> Option<u32> {
        match self {
            WeekOfMonth::First => Some(0),
            WeekOfMonth::Second => Some(1),
            WeekOfMonth::Third => Some(2),
            WeekOfMonth::Fourth => Some(3),
            WeekOfMonth::Last => None,
        }
    }
}

impl fmt::Display for WeekOfMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekOfMonth::First => write!(f, "FIRST"),
            WeekOfMonth::Second => write!(f, "SECOND"),
            WeekOfMonth::Third => write!(f, "THIRD"),
            WeekOfMonth::Fourth => write!(f, "FOURTH"),
            WeekOfMonth::Last => write!(f, "LAST"),
        }
    }
}
