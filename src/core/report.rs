//! Human-facing rendering of an aurora report. Thresholds and wording here are
//! display policy and can change without touching the scoring model.

use crate::domain::model::{AuroraReport, ChanceBand};

pub const PLACEHOLDER: &str = "—";

impl ChanceBand {
    pub fn from_chance(chance: f64) -> Self {
        if chance >= 70.0 {
            ChanceBand::High
        } else if chance >= 40.0 {
            ChanceBand::Possible
        } else if chance >= 20.0 {
            ChanceBand::Unlikely
        } else {
            ChanceBand::VeryUnlikely
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChanceBand::High => "💫 High chance — look north tonight!",
            ChanceBand::Possible => "✨ Possible — worth keeping an eye on the sky",
            ChanceBand::Unlikely => "🌥 Unlikely — conditions are weak",
            ChanceBand::VeryUnlikely => "☁ Very unlikely tonight",
        }
    }
}

pub fn kp_activity_message(kp: f64) -> &'static str {
    if kp < 3.0 {
        "Low activity: auroras are unlikely at mid latitudes tonight."
    } else if kp < 5.0 {
        "Moderate activity: faint auroras possible at high latitudes under dark skies."
    } else if kp < 7.0 {
        "Strong activity: good chances for auroras at high latitudes if skies are clear."
    } else {
        "Severe geomagnetic storm: auroras may be visible much further south than usual."
    }
}

/// Unknown values render as a placeholder, never as a made-up number.
pub fn format_metric(value: Option<f64>, precision: usize, unit: &str) -> String {
    match value {
        Some(v) if unit.is_empty() => format!("{:.*}", precision, v),
        Some(v) => format!("{:.*} {}", precision, v, unit),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn render_text(report: &AuroraReport) -> String {
    let result = &report.result;
    let mut lines = vec![
        format!("🌌 Northern Lights chance in {}", report.location.label()),
        format!("Chance:            {:.0} / 100", result.chance),
        format!("Verdict:           {}", report.band.label()),
        format!("Note:              {}", result.note),
        format!(
            "Aurora nearby:     {}",
            format_metric(result.ovation_probability, 0, "/ 100")
        ),
        format!(
            "Kp:                {}",
            result
                .kp
                .map(|kp| format!("Kp {:.1}", kp))
                .unwrap_or_else(|| PLACEHOLDER.to_string())
        ),
        format!("Bz (GSM):          {}", format_metric(result.bz_gsm, 1, "nT")),
        format!("Solar wind speed:  {}", format_metric(result.speed, 0, "km/s")),
        format!("Proton density:    {}", format_metric(result.density, 1, "p/cm³")),
    ];

    if let Some(message) = &report.kp_activity {
        lines.push(message.clone());
    }
    if result.ovation_probability.is_some() && result.speed.is_none() {
        lines.push(
            "⚠️ Live solar wind data temporarily unavailable (NOAA), score may be less accurate."
                .to_string(),
        );
    }
    if let Some(ts) = report.forecast_time {
        lines.push(format!("OVATION forecast:  {}", ts.format("%Y-%m-%d %H:%M UTC")));
    }
    if let Some(ts) = report.solar_wind_time {
        lines.push(format!("Solar wind as of:  {}", ts.format("%Y-%m-%d %H:%M UTC")));
    }

    lines.join("\n")
}
