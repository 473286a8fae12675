//! Goals command handler

use grade_analytics::config::Config;
use grade_analytics::goals::GoalStatus;
use grade_analytics::report::ReportContext;
use std::path::Path;

/// Print goal evaluations and course target feasibility for a record
pub fn run(record_path: &Path, config: &Config) {
    let record = super::load_record_or_exit(record_path, config);
    let ctx = ReportContext::build(&record, config.missing_policy());

    println!("\n=== Course targets ===\n");
    let mut any_target = false;
    for row in &ctx.courses {
        let report = &row.feasibility;
        if !report.success {
            eprintln!("✗ {}: {}", row.course.id, report.message);
            continue;
        }
        if report.feasibility == GoalStatus::NoGoalSet {
            continue;
        }
        any_target = true;
        println!("{:<10} {}", row.course.id, report.feasibility);
        println!("           {}", report.message);
    }
    if !any_target {
        println!("No course targets set.");
    }

    println!("\n=== Goals ===\n");
    if ctx.goals.is_empty() {
        println!("No goals recorded.");
    }
    for goal in &ctx.goals {
        match &goal.result {
            Ok(eval) => {
                let mark = if eval.is_achieved { "✓" } else { " " };
                println!(
                    "{mark} {:<10} {:<15} current {:>6.2}  target {:>6.2}  completion {:>3.0}%  {}",
                    eval.goal_id,
                    eval.goal_type.to_string(),
                    eval.current_value,
                    eval.target_value,
                    eval.completion,
                    eval.status
                );
            }
            Err(message) => eprintln!("✗ {}: {message}", goal.goal_id),
        }
    }
}
