use super::config::MatchingConfig;
use super::{MatchComponent, MatchFactor, MatchInput};

pub(crate) struct MatchSignals {
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

pub(crate) fn score_input(
    input: &MatchInput,
    config: &MatchingConfig,
) -> (Vec<MatchComponent>, f64, MatchSignals) {
    let matched_skills: Vec<String> = input
        .job_skills
        .intersection(&input.candidate_skills)
        .cloned()
        .collect();
    let missing_skills: Vec<String> = input
        .job_skills
        .difference(&input.candidate_skills)
        .cloned()
        .collect();

    let skill_fraction = if input.job_skills.is_empty() {
        0.0
    } else {
        matched_skills.len() as f64 / input.job_skills.len() as f64
    };
    let points_fraction = saturating_fraction(input.candidate_points, config.points_saturation);
    let certificate_fraction = saturating_fraction(
        input.candidate_certificate_count,
        config.certificate_saturation,
    );

    let components = vec![
        component(
            MatchFactor::Skills,
            skill_fraction,
            config.weights.skills,
            format!(
                "{} of {} required skills held",
                matched_skills.len(),
                input.job_skills.len()
            ),
        ),
        component(
            MatchFactor::Points,
            points_fraction,
            config.weights.points,
            format!(
                "{} points against saturation {}",
                input.candidate_points, config.points_saturation
            ),
        ),
        component(
            MatchFactor::Certificates,
            certificate_fraction,
            config.weights.certificates,
            format!(
                "{} certificate(s) against saturation {}",
                input.candidate_certificate_count, config.certificate_saturation
            ),
        ),
    ];

    let weighted = config.weights.skills * skill_fraction
        + config.weights.points * points_fraction
        + config.weights.certificates * certificate_fraction;
    let value = round_hundredths((weighted * 100.0).clamp(0.0, 100.0));

    let signals = MatchSignals {
        matched_skills,
        missing_skills,
    };

    (components, value, signals)
}

fn component(factor: MatchFactor, fraction: f64, weight: f64, notes: String) -> MatchComponent {
    MatchComponent {
        factor,
        fraction: round_hundredths(fraction),
        contribution: round_hundredths(weight * fraction * 100.0),
        notes,
    }
}

/// Share of `saturation` reached by `value`, capped at 1. A zero saturation
/// means the factor is always full.
fn saturating_fraction(value: u32, saturation: u32) -> f64 {
    if saturation == 0 {
        return 1.0;
    }
    f64::from(value.min(saturation)) / f64::from(saturation)
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
