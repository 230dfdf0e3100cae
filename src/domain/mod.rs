// ==========================================
// 任务管理系统 - 领域模型层
// ==========================================
// 依据: Task_Dev_Master_Spec.md - PART C 数据与状态体系
// 依据: Scheduler_Specs_v0.4_Integrated.md - 主实体定义
// ==========================================
// 职责: 定义领域实体、类型、校验规则
// 红线: 不含日期推演逻辑,不含槽位分配逻辑
// ==========================================

pub mod error;
pub mod recurrence;
pub mod types;
pub mod workday;

// 重导出核心类型
pub use error::{ValidationError, ValidationResult};
pub use recurrence::{
    weekday_index, EndCondition, Materialization, RecurrencePattern, RecurrenceRule,
    RecurrenceSpec,
};
pub use types::{EndMode, RepeatKind, WeekOfMonth};
pub use workday::{
    PlacementRequest, ScheduledOccurrence, SlotAssignment, SlotSegment, SplitAssignment,
    WorkdayWindow,
};
