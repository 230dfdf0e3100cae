// ==========================================
// 任务管理系统 - 工作日配置
// ==========================================
// 依据: Scheduler_Specs_v0.4_Integrated.md - 6. 配置项全集
// ==========================================
// 职责: 工作日窗口默认值 + JSON 文件读写
// ==========================================

use crate::domain::workday::WorkdayWindow;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::Path;

// ==========================================
// WorkdayProfile - 工作日配置档
// ==========================================
// 全字段带默认值: 配置文件可以只覆写关心的字段
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkdayProfile {
    /// 上班时刻
    #[serde(default = "default_day_start")]
    pub day_start: NaiveTime,

    /// 午休开始
    #[serde(default = "default_break_start")]
    pub break_start: NaiveTime,

    /// 午休结束
    #[serde(default = "default_break_end")]
    pub break_end: NaiveTime,

    /// 下班时刻
    #[serde(default = "default_day_end")]
    pub day_end: NaiveTime,

    /// 单槽时长上限 (分钟)
    #[serde(default = "default_max_slot_minutes")]
    pub max_slot_minutes: i64,

    /// 无界周期规则的默认物化条数
    #[serde(default = "default_horizon_count")]
    pub default_horizon_count: usize,
}

fn default_day_start() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default()
}

fn default_break_start() -> NaiveTime {
    NaiveTime::from_hms_opt(13, 0, 0).unwrap_or_default()
}

fn default_break_end() -> NaiveTime {
    NaiveTime::from_hms_opt(14, 0, 0).unwrap_or_default()
}

fn default_day_end() -> NaiveTime {
    NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default()
}

fn default_max_slot_minutes() -> i64 {
    120
}

fn default_horizon_count() -> usize {
    10
}

impl Default for WorkdayProfile {
    fn default() -> Self {
        Self {
            day_start: default_day_start(),
            break_start: default_break_start(),
            break_end: default_break_end(),
            day_end: default_day_end(),
            max_slot_minutes: default_max_slot_minutes(),
            default_horizon_count: default_horizon_count(),
        }
    }
}

impl WorkdayProfile {
    /// 从 JSON 配置文件加载
    ///
    /// # 参数
    /// - path: 配置文件路径
    ///
    /// # 返回
    /// - Ok(WorkdayProfile): 缺省字段取内置默认值
    /// - Err: 文件不存在或 JSON 非法
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let raw = fs::read_to_string(path)?;
        let profile: WorkdayProfile = serde_json::from_str(&raw)?;
        Ok(profile)
    }

    /// 写回 JSON 配置文件 (便于导出当前生效配置)
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn Error>> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }

    /// 转换为引擎使用的工作日窗口
    ///
    /// 窗口顺序校验在开车道时执行,此处只做字段搬运
    pub fn window(&self) -> WorkdayWindow {
        WorkdayWindow {
            day_start: self.day_start,
            break_start: self.break_start,
            break_end: self.break_end,
            day_end: self.day_end,
            max_slot_minutes: self.max_slot_minutes,
        }
    }
}
