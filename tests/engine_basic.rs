#![forbid(unsafe_code)]
use chrono::{NaiveDate, Weekday};
use rotaplan::{
    AbsenceRecord, AbsenceStatus, EngineError, GenerateRequest, Role, RoleRequirement,
    RotaEngine, ShiftTemplate, ShiftType, StaffMember,
};
use std::collections::HashMap;

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

fn staff(name: &str, role: Role, max: f64, contracted: f64) -> StaffMember {
    let mut s = StaffMember::new(name, role, max, contracted).unwrap();
    s.available_days = vec![
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];
    s
}

fn template(
    id: &str,
    day: Weekday,
    start: &str,
    end: &str,
    reqs: &[(Role, u32)],
) -> ShiftTemplate {
    ShiftTemplate {
        id: id.into(),
        name: id.into(),
        day_of_week: day,
        start_time: start.into(),
        end_time: end.into(),
        role_requirements: reqs
            .iter()
            .map(|&(role, count)| RoleRequirement { role, count })
            .collect(),
        priority: 0,
        shift_type: ShiftType::Peak,
    }
}

fn full_week_request() -> GenerateRequest {
    let days = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];
    let templates = days
        .iter()
        .map(|&d| {
            template(
                &format!("day-{d}"),
                d,
                "08:00",
                "22:00",
                &[(Role::Manager, 1), (Role::Waiter, 2)],
            )
        })
        .collect();
    let roster = vec![
        staff("marc", Role::Manager, 45.0, 40.0),
        staff("mia", Role::Manager, 40.0, 32.0),
        staff("ana", Role::Waiter, 40.0, 35.0),
        staff("bea", Role::Waiter, 40.0, 35.0),
        staff("carl", Role::Waiter, 35.0, 30.0),
        staff("dora", Role::Waiter, 30.0, 24.0),
    ];
    GenerateRequest {
        week_start: monday(),
        templates,
        staff: roster,
        absences: Vec::new(),
    }
}

#[test]
fn rejects_non_monday_week_start() {
    let mut request = full_week_request();
    request.week_start = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
    let err = RotaEngine::new().generate(&request).unwrap_err();
    assert!(matches!(err, EngineError::WeekStartNotMonday(_)));
}

#[test]
fn rejects_empty_inputs() {
    let mut request = full_week_request();
    request.templates.clear();
    assert!(matches!(
        RotaEngine::new().generate(&request).unwrap_err(),
        EngineError::EmptyTemplates
    ));

    let mut request = full_week_request();
    request.staff.clear();
    assert!(matches!(
        RotaEngine::new().generate(&request).unwrap_err(),
        EngineError::EmptyStaff
    ));
}

#[test]
fn rejects_malformed_template_time() {
    let mut request = full_week_request();
    request.templates[0].start_time = "8h00".into();
    assert!(matches!(
        RotaEngine::new().generate(&request).unwrap_err(),
        EngineError::InvalidTemplate { .. }
    ));
}

#[test]
fn no_double_booking_per_day() {
    let result = RotaEngine::new().generate(&full_week_request()).unwrap();
    for day in &result.days {
        let mut seen = HashMap::new();
        for a in &day.assignments {
            *seen.entry(a.staff_id.clone()).or_insert(0u32) += 1;
        }
        assert!(
            seen.values().all(|&n| n <= 1),
            "double booking on {}",
            day.date
        );
    }
}

#[test]
fn weekly_hours_never_exceed_max() {
    let request = full_week_request();
    let result = RotaEngine::new().generate(&request).unwrap();
    let mut totals: HashMap<_, f64> = HashMap::new();
    for a in result.days.iter().flat_map(|d| d.assignments.iter()) {
        *totals.entry(a.staff_id.clone()).or_default() += a.hours;
    }
    for member in &request.staff {
        let total = totals.get(&member.id).copied().unwrap_or(0.0);
        assert!(
            total <= member.max_hours_per_week + 1e-9,
            "{} scheduled {total}h over max {}",
            member.name,
            member.max_hours_per_week
        );
    }
}

#[test]
fn approved_absence_days_are_excluded() {
    let mut request = full_week_request();
    let ana = request.staff[2].clone();
    assert_eq!(ana.name, "ana");
    let wednesday = NaiveDate::from_ymd_opt(2025, 6, 4).unwrap();
    let thursday = NaiveDate::from_ymd_opt(2025, 6, 5).unwrap();
    request.absences.push(
        AbsenceRecord::new(ana.id.clone(), wednesday, thursday, AbsenceStatus::Approved).unwrap(),
    );

    let result = RotaEngine::new().generate(&request).unwrap();
    for day in &result.days {
        if day.date >= wednesday && day.date <= thursday {
            assert!(
                day.assignments.iter().all(|a| a.staff_id != ana.id),
                "ana assigned during approved absence on {}",
                day.date
            );
        }
    }
}

#[test]
fn assignment_role_matches_staff_role() {
    let request = full_week_request();
    let result = RotaEngine::new().generate(&request).unwrap();
    for a in result.days.iter().flat_map(|d| d.assignments.iter()) {
        let member = request.staff.iter().find(|s| s.id == a.staff_id).unwrap();
        assert_eq!(a.role, member.role);
    }
}

#[test]
fn assignments_stay_inside_operating_window() {
    let result = RotaEngine::new().generate(&full_week_request()).unwrap();
    for day in &result.days {
        let (start, end) = (day.operating_start.unwrap(), day.operating_end.unwrap());
        for a in &day.assignments {
            assert!(a.end_minutes > a.start_minutes);
            assert!(a.start_minutes >= start);
            assert!(a.end_minutes <= end);
            assert_eq!(a.start_minutes % 30, 0);
            assert_eq!(a.end_minutes % 30, 0);
        }
    }
}

#[test]
fn generation_is_deterministic() {
    let request = full_week_request();
    let engine = RotaEngine::new();
    let first = engine.generate(&request).unwrap();
    let second = engine.generate(&request).unwrap();
    assert_eq!(first.summary.total_assignments, second.summary.total_assignments);
    for (a, b) in first.days.iter().zip(second.days.iter()) {
        assert_eq!(a.assignments, b.assignments);
    }
}

#[test]
fn overnight_window_produces_contained_assignments() {
    let request = GenerateRequest {
        week_start: monday(),
        templates: vec![template(
            "night",
            Weekday::Fri,
            "18:00",
            "02:00",
            &[(Role::Bartender, 2)],
        )],
        staff: vec![
            staff("nina", Role::Bartender, 40.0, 32.0),
            staff("otto", Role::Bartender, 40.0, 32.0),
        ],
        absences: Vec::new(),
    };
    let result = RotaEngine::new().generate(&request).unwrap();
    let friday = &result.days[4];
    assert!(friday.has_operations);
    assert_eq!(friday.operating_end, Some(1560)); // 02:00 le lendemain
    assert_eq!(friday.assignments.len(), 2);
    for a in &friday.assignments {
        assert!(a.end_minutes <= 1560);
        assert!(a.end_minutes > a.start_minutes);
        assert_eq!(a.hours, 8.0);
    }
}

#[test]
fn summary_totals_are_consistent() {
    let result = RotaEngine::new().generate(&full_week_request()).unwrap();
    let assignments: usize = result.days.iter().map(|d| d.assignments.len()).sum();
    let hours: f64 = result
        .days
        .iter()
        .flat_map(|d| d.assignments.iter())
        .map(|a| a.hours)
        .sum();
    assert_eq!(result.summary.total_assignments, assignments);
    assert!((result.summary.total_hours - hours).abs() < 1e-9);
    let utilization_hours: f64 = result.summary.staff_utilization.iter().map(|u| u.hours).sum();
    assert!((utilization_hours - hours).abs() < 1e-9);
}
