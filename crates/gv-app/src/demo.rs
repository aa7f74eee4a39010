//! Built-in sample exhibition, used when no catalog path is given

use anyhow::Result;
use gv_core::Hotspot;
use gv_data::EmbeddedSource;

const SAMPLE_EXHIBITION: &str = include_str!("../data/sample_exhibition.json");
const SAMPLE_HOTSPOTS: &str = include_str!("../data/sample_hotspots.json");

pub fn sample_source() -> EmbeddedSource {
    EmbeddedSource::new("sample exhibition", SAMPLE_EXHIBITION)
}

pub fn sample_hotspots() -> Result<Vec<Hotspot>> {
    Ok(serde_json::from_str(SAMPLE_HOTSPOTS)?)
}
