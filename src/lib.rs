// ==========================================
// 任务管理系统 - 周期任务排程引擎核心库
// ==========================================
// 依据: Task_Dev_Master_Spec.md - 排程子系统宪法
// 技术栈: Rust + chrono
// 系统定位: 纯进程内计算库 (持久化/通知由外部协作方承担)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 排程配置
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{EndMode, RepeatKind, WeekOfMonth};

// 领域实体
pub use domain::{
    EndCondition, Materialization, PlacementRequest, RecurrencePattern, RecurrenceRule,
    RecurrenceSpec, ScheduledOccurrence, SlotAssignment, SlotSegment, SplitAssignment,
    ValidationError, WorkdayWindow,
};

// 引擎
pub use engine::{
    EngineError, EngineResult, OccurrenceIter, OccurrenceSequencer, SchedulePipeline, SlotLane,
};

// 配置
pub use config::WorkdayProfile;
