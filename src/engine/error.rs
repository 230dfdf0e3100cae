// ==========================================
// 任务管理系统 - 引擎层错误类型
// ==========================================
// 依据: Rust 错误处理最佳实践
// 依据: Scheduler_Specs_v0.4_Integrated.md - 7. 错误分类
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::error::ValidationError;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 槽位分配错误 =====
    #[error("无效的任务时长: duration_minutes={minutes}, 必须 > 0")]
    InvalidDuration { minutes: i64 },

    #[error("无效的工作日窗口配置: {reason}")]
    InvalidConfiguration { reason: String },

    // ===== 规则校验错误 =====
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
