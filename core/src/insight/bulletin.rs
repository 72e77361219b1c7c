/// Canned behaviour insights for the insights page.
pub fn insight_bulletins() -> Vec<String> {
    [
        "Market Area Spike: +43% wrong turns between 7-9 PM",
        "School Zones Strict: active from 7 AM - 5 PM",
        "Night Mode Active: highway leniency after 10 PM",
        "AI Triggered: auto-flagged 19 cameras for model drift",
        "Prediction: helmet violations expected post-weekend",
    ]
    .iter()
    .map(|line| line.to_string())
    .collect()
}

pub fn export_notice() -> &'static str {
    "Coming soon: export the dashboard and insights as a printable briefing report."
}
