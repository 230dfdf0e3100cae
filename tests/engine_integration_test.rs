// ==========================================
// 排程引擎端到端集成测试
// ==========================================
// 测试目标: 扁平配置 -> 周期规则 -> 日期推演 + 槽位分配的完整链路
// 覆盖范围: Pipeline 组合、车道隔离、物化视野
// ==========================================

use chrono::{NaiveDate, NaiveTime};
use task_recur_scheduler::config::WorkdayProfile;
use task_recur_scheduler::domain::recurrence::{RecurrenceRule, RecurrenceSpec};
use task_recur_scheduler::domain::types::{EndMode, RepeatKind};
use task_recur_scheduler::domain::workday::PlacementRequest;
use task_recur_scheduler::engine::SchedulePipeline;

// ==========================================
// 测试辅助函数
// ==========================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn create_test_pipeline() -> SchedulePipeline {
    SchedulePipeline::new(WorkdayProfile::default().window())
}

fn request(subject: &str, minutes: i64) -> PlacementRequest {
    PlacementRequest {
        subject: subject.to_string(),
        duration_minutes: minutes,
    }
}

/// 周一/三/五,隔周重复,按次数结束的典型前端载荷
fn weekly_payload_rule() -> RecurrenceRule {
    let payload = r#"{
        "repeat_type": "WEEKLY",
        "interval": 2,
        "weekdays": [1, 3, 5],
        "end_mode": "AFTER_COUNT",
        "end_count": 6,
        "anchor_date": "2026-01-19"
    }"#;
    let spec: RecurrenceSpec = serde_json::from_str(payload).unwrap();
    RecurrenceRule::from_spec(&spec).unwrap()
}

// ==========================================
// 批量放置
// ==========================================

#[test]
fn test_batch_placement_parallel_results() {
    task_recur_scheduler::logging::init_test();
    let pipeline = create_test_pipeline();
    let mut lane = pipeline.open_lane(date(2026, 1, 20)).unwrap();

    let requests = vec![
        request("填写周报", 160), // 截断为120
        request("评审方案", 60),
        request("整理纪要", 60),
    ];
    let assignments = pipeline.place_batch(&mut lane, &requests).unwrap();

    assert_eq!(assignments.len(), 3);
    // 与输入平行: 主题一一对应
    assert_eq!(assignments[0].subject, "填写周报");
    assert_eq!(assignments[0].duration_minutes, 120);
    assert_eq!(
        assignments[0].starts_at.time(),
        NaiveTime::from_hms_opt(9, 0, 0).unwrap()
    );
    assert_eq!(
        assignments[1].starts_at.time(),
        NaiveTime::from_hms_opt(11, 0, 0).unwrap()
    );
    // 第三槽 [12:00,13:00) 贴着午休但不相交
    assert_eq!(
        assignments[2].starts_at.time(),
        NaiveTime::from_hms_opt(12, 0, 0).unwrap()
    );
}

#[test]
fn test_lanes_are_isolated_per_batch() {
    // 两条车道互不影响: 同样的请求序列得到同样的结果
    let pipeline = create_test_pipeline();
    let requests = vec![request("A", 120), request("B", 120), request("C", 60)];

    let mut lane_one = pipeline.open_lane(date(2026, 1, 20)).unwrap();
    let mut lane_two = pipeline.open_lane(date(2026, 1, 20)).unwrap();
    let first = pipeline.place_batch(&mut lane_one, &requests).unwrap();
    let second = pipeline.place_batch(&mut lane_two, &requests).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_split_batch_keeps_full_duration() {
    let pipeline = create_test_pipeline();
    let mut lane = pipeline.open_lane(date(2026, 1, 20)).unwrap();

    let assignments = pipeline
        .place_batch_split(&mut lane, &[request("年度盘点", 300)])
        .unwrap();

    assert_eq!(assignments.len(), 1);
    let total: i64 = assignments[0]
        .segments
        .iter()
        .map(|s| s.duration_minutes)
        .sum();
    assert_eq!(total, 300);
}

// ==========================================
// 周期任务物化
// ==========================================

#[test]
fn test_materialize_recurrence_composes_both_engines() {
    let pipeline = create_test_pipeline();
    let rule = weekly_payload_rule();

    let occurrences = pipeline
        .materialize_recurrence(&rule, 60, date(2026, 1, 19), None)
        .unwrap();

    // AfterCount(6) 在默认视野(10)之内: 全部物化
    let days: Vec<NaiveDate> = occurrences.iter().map(|o| o.occurs_on).collect();
    assert_eq!(
        days,
        vec![
            date(2026, 1, 19),
            date(2026, 1, 21),
            date(2026, 1, 23),
            date(2026, 2, 2),
            date(2026, 2, 4),
            date(2026, 2, 6),
        ]
    );

    // 每个发生日用全新车道: 当日时刻一律是上班时刻
    for occurrence in &occurrences {
        assert_eq!(occurrence.occurs_on, occurrence.starts_at.date());
        assert_eq!(
            occurrence.starts_at.time(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
    }
}

#[test]
fn test_materialize_unbounded_rule_cut_at_horizon() {
    let payload = r#"{
        "repeat_type": "DAILY",
        "interval": 1,
        "anchor_date": "2026-01-20"
    }"#;
    let spec: RecurrenceSpec = serde_json::from_str(payload).unwrap();
    let rule = RecurrenceRule::from_spec(&spec).unwrap();

    let pipeline = create_test_pipeline();
    // 缺省视野 = 10
    let defaulted = pipeline
        .materialize_recurrence(&rule, 30, date(2026, 1, 20), None)
        .unwrap();
    assert_eq!(defaulted.len(), 10);

    // 显式 limit 覆盖缺省视野
    let limited = pipeline
        .materialize_recurrence(&rule, 30, date(2026, 1, 20), Some(3))
        .unwrap();
    assert_eq!(limited.len(), 3);

    // 调大后的缺省视野
    let widened = SchedulePipeline::new(WorkdayProfile::default().window())
        .with_default_horizon(15)
        .materialize_recurrence(&rule, 30, date(2026, 1, 20), None)
        .unwrap();
    assert_eq!(widened.len(), 15);
}

#[test]
fn test_materialization_does_not_disturb_caller_lane() {
    // 物化走自己的新车道,调用方手里的车道游标不动
    let pipeline = create_test_pipeline();
    let mut lane = pipeline.open_lane(date(2026, 1, 20)).unwrap();
    lane.allocate(90).unwrap();
    let cursor_before = lane.cursor_time();

    let rule = weekly_payload_rule();
    pipeline
        .materialize_recurrence(&rule, 60, date(2026, 1, 19), None)
        .unwrap();

    assert_eq!(lane.cursor_time(), cursor_before);
}

#[test]
fn test_next_occurrence_for_due_date_backfill() {
    let pipeline = create_test_pipeline();
    let rule = weekly_payload_rule();

    // 周四查询: 下一个发生是周五
    assert_eq!(
        pipeline.next_occurrence(&rule, date(2026, 1, 22)),
        Some(date(2026, 1, 23))
    );
}

#[test]
fn test_yearly_rule_end_to_end() {
    let mut spec = RecurrenceSpec {
        repeat_type: RepeatKind::Yearly,
        interval: 1,
        weekdays: None,
        day_of_month: None,
        week_of_month: None,
        weekday: None,
        month_of_year: Some(4),
        end_mode: EndMode::Never,
        end_date: None,
        end_count: None,
        anchor_date: date(2026, 4, 30),
        scheduled_from: None,
        business_days_only: false,
    };
    spec.day_of_month = Some(30);
    let rule = RecurrenceRule::from_spec(&spec).unwrap();

    let pipeline = create_test_pipeline();
    let occurrences = pipeline
        .materialize_recurrence(&rule, 120, date(2026, 1, 1), Some(3))
        .unwrap();

    let days: Vec<NaiveDate> = occurrences.iter().map(|o| o.occurs_on).collect();
    assert_eq!(days, vec![date(2026, 4, 30), date(2027, 4, 30), date(2028, 4, 30)]);
}
