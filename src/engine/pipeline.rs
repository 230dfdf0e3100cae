// ==========================================
// 任务管理系统 - 排程编排器
// ==========================================
// 依据: Scheduler_Specs_v0.4_Integrated.md - 4. Schedule Pipeline
// 用途: 组合日期推演与槽位分配两个独立能力
// 红线: 槽位车道不感知周期; 车道由调用方持有,禁止进程级复用
// ==========================================

use crate::domain::recurrence::{EndCondition, RecurrenceRule};
use crate::domain::workday::{
    PlacementRequest, ScheduledOccurrence, SlotAssignment, SplitAssignment, WorkdayWindow,
};
use crate::engine::error::EngineResult;
use crate::engine::sequencer::OccurrenceSequencer;
use crate::engine::slot_lane::SlotLane;
use chrono::NaiveDate;
use tracing::{debug, info, instrument};

/// 无界规则物化时的默认截取条数
pub const DEFAULT_HORIZON_COUNT: usize = 10;

// ==========================================
// SchedulePipeline - 排程编排器
// ==========================================
pub struct SchedulePipeline {
    window: WorkdayWindow,
    default_horizon: usize,
}

impl SchedulePipeline {
    /// 创建编排器
    ///
    /// # 参数
    /// - window: 工作日窗口配置 (在开车道时校验)
    pub fn new(window: WorkdayWindow) -> Self {
        Self {
            window,
            default_horizon: DEFAULT_HORIZON_COUNT,
        }
    }

    /// 指定无界规则的默认物化视野
    pub fn with_default_horizon(mut self, count: usize) -> Self {
        self.default_horizon = count;
        self
    }

    /// 开一条新车道,由调用方独占持有
    pub fn open_lane(&self, base_date: NaiveDate) -> EngineResult<SlotLane> {
        SlotLane::new(base_date, self.window)
    }

    /// 批量放置: 按输入顺序逐个分配,返回平行结果列表
    ///
    /// # 规则 (Scheduler_Specs 4.2)
    /// - 每个请求恰好调用一次 allocate
    /// - 任一请求失败即中止整批,失败调用不留下半更新状态
    #[instrument(skip(self, lane, requests), fields(
        batch_size = requests.len(),
        base_date = %lane.base_date()
    ))]
    pub fn place_batch(
        &self,
        lane: &mut SlotLane,
        requests: &[PlacementRequest],
    ) -> EngineResult<Vec<SlotAssignment>> {
        let mut assignments = Vec::with_capacity(requests.len());
        for request in requests {
            let starts_at = lane.allocate(request.duration_minutes)?;
            // 截断以车道自己的窗口为准 (调用方可能带来外部车道)
            let placed = request.duration_minutes.min(lane.window().max_slot_minutes);
            debug!(subject = %request.subject, %starts_at, "任务已放置");
            assignments.push(SlotAssignment {
                subject: request.subject.clone(),
                starts_at,
                duration_minutes: placed,
            });
        }
        info!(placed = assignments.len(), "批量放置完成");
        Ok(assignments)
    }

    /// 批量放置 (拆分版): 超长任务切成连续子槽而不是截断
    #[instrument(skip(self, lane, requests), fields(
        batch_size = requests.len(),
        base_date = %lane.base_date()
    ))]
    pub fn place_batch_split(
        &self,
        lane: &mut SlotLane,
        requests: &[PlacementRequest],
    ) -> EngineResult<Vec<SplitAssignment>> {
        let mut assignments = Vec::with_capacity(requests.len());
        for request in requests {
            let segments = lane.allocate_split(request.duration_minutes)?;
            assignments.push(SplitAssignment {
                subject: request.subject.clone(),
                segments,
            });
        }
        info!(placed = assignments.len(), "批量拆分放置完成");
        Ok(assignments)
    }

    /// 物化周期任务的未来发生
    ///
    /// # 规则 (Scheduler_Specs 4.3)
    /// - 发生日期来自日期推演引擎
    /// - 当日时刻来自一条锚定在该日期的全新车道 (互不影响)
    /// - 无界规则按 limit (缺省为默认视野) 截取
    ///
    /// # 参数
    /// - rule: 周期规则
    /// - duration_minutes: 每次发生的任务时长
    /// - horizon_start: 视野起点 (通常为"今天")
    /// - limit: 最多物化条数 (None = 默认视野)
    #[instrument(skip(self, rule), fields(
        anchor_date = %rule.anchor_date,
        %horizon_start
    ))]
    pub fn materialize_recurrence(
        &self,
        rule: &RecurrenceRule,
        duration_minutes: i64,
        horizon_start: NaiveDate,
        limit: Option<usize>,
    ) -> EngineResult<Vec<ScheduledOccurrence>> {
        let cap = limit.unwrap_or(self.default_horizon);
        if matches!(rule.end, EndCondition::Never) && limit.is_none() {
            debug!(cap, "无界规则按默认视野截取");
        }

        let mut occurrences = Vec::new();
        for occurs_on in OccurrenceSequencer::generate(rule, horizon_start).take(cap) {
            let mut lane = self.open_lane(occurs_on)?;
            let starts_at = lane.allocate(duration_minutes)?;
            occurrences.push(ScheduledOccurrence {
                occurs_on,
                starts_at,
            });
        }
        info!(count = occurrences.len(), "周期任务物化完成");
        Ok(occurrences)
    }

    /// 下一个发生日期 (供协作方回填任务截止日)
    pub fn next_occurrence(&self, rule: &RecurrenceRule, after: NaiveDate) -> Option<NaiveDate> {
        OccurrenceSequencer::generate(rule, after).next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn window() -> WorkdayWindow {
        WorkdayWindow {
            day_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            break_start: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
            break_end: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            day_end: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            max_slot_minutes: 120,
        }
    }

    fn request(subject: &str, minutes: i64) -> PlacementRequest {
        PlacementRequest {
            subject: subject.to_string(),
            duration_minutes: minutes,
        }
    }

    #[test]
    fn test_place_batch_preserves_order() {
        let pipeline = SchedulePipeline::new(window());
        let base = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();
        let mut lane = pipeline.open_lane(base).unwrap();

        let assignments = pipeline
            .place_batch(
                &mut lane,
                &[request("A", 60), request("B", 30), request("C", 90)],
            )
            .unwrap();

        assert_eq!(assignments.len(), 3);
        assert_eq!(assignments[0].subject, "A");
        assert_eq!(assignments[1].subject, "B");
        assert_eq!(assignments[2].subject, "C");
        // 平行列表,逐槽递进
        assert!(assignments[0].starts_at < assignments[1].starts_at);
        assert!(assignments[1].starts_at < assignments[2].starts_at);
    }

    #[test]
    fn test_place_batch_aborts_on_invalid_request() {
        let pipeline = SchedulePipeline::new(window());
        let base = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();
        let mut lane = pipeline.open_lane(base).unwrap();

        let result = pipeline.place_batch(&mut lane, &[request("A", 60), request("B", -5)]);
        assert!(result.is_err());
        // 失败调用不动车道状态: 游标停在 A 之后
        assert_eq!(
            lane.cursor_time(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap()
        );
    }
}
