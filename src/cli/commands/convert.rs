//! Convert command handler

use grade_analytics::scale::GpaScale;
use grade_analytics::service;

/// Convert a percentage to GPA (or back) on the named scale
pub fn run(value: f64, scale_id: &str, to_percentage: bool) {
    let outcome = if to_percentage {
        service::try_convert_gpa_to_percentage(value, scale_id)
    } else {
        service::try_convert_percentage_to_gpa(value, scale_id)
    };

    let Some(converted) = outcome.value else {
        eprintln!("✗ {}", outcome.message);
        eprintln!(
            "  Known scales: {}",
            GpaScale::ALL.map(GpaScale::id).join(", ")
        );
        std::process::exit(1);
    };

    if to_percentage {
        println!("{value} on {scale_id} = {converted:.2}%");
    } else {
        let letter = scale_id
            .parse::<GpaScale>()
            .map(|s| s.converter().letter_for(value))
            .unwrap_or("-");
        println!("{value}% on {scale_id} = {converted:.2} ({letter})");
    }
}
