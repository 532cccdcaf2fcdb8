//! Ready-made unified records for embedding and retrieval tests.

use chrono::NaiveDate;

use envcat_core::models::{Contact, Keyword, KeywordType, SpatialExtent};
use envcat_core::UnifiedRecord;

use crate::{PEAT_CARBON_ID, RIVER_FLOW_ID, SOIL_CARBON_ID};

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

/// Minimal record with a deterministic surrogate key.
pub fn sample_record(source_id: &str, title: &str, abstract_text: Option<&str>) -> UnifiedRecord {
    let mut record = UnifiedRecord::new(format!("rec-{source_id}"), source_id, title);
    record.abstract_text = abstract_text.map(str::to_string);
    record
}

/// Three reconciled-looking records: soil carbon, river flow, peat carbon.
pub fn sample_catalogue() -> Vec<UnifiedRecord> {
    let mut soil = sample_record(
        SOIL_CARBON_ID,
        "Soil Carbon Survey 2020",
        Some("Topsoil organic carbon concentrations measured at 512 sites across Great Britain."),
    );
    soil.lineage = Some("Cores analysed for total carbon by dry combustion.".into());
    soil.publication_date = date(2020, 11, 25);
    soil.spatial_extent = Some(SpatialExtent::new(-8.648, 1.768, 49.864, 60.861));
    soil.keywords = vec![
        Keyword::new("Soil organic carbon", KeywordType::Theme),
        Keyword::new("Great Britain", KeywordType::Place),
    ];
    soil.contacts = vec![Contact {
        full_name: Some("Emmett, Bridget".into()),
        organisation_name: Some("UK Centre for Ecology & Hydrology".into()),
        ..Contact::with_role("author")
    }];

    let mut river = sample_record(
        RIVER_FLOW_ID,
        "River Flow Gauging Network Daily Flows",
        Some("Daily mean river discharge from gauging stations in Wales and southern England."),
    );
    river.publication_date = date(2018, 4, 10);
    river.spatial_extent = Some(SpatialExtent::new(-3.9, 0.6, 51.2, 52.9));
    river.keywords = vec![
        Keyword::new("Hydrology", KeywordType::Theme),
        Keyword::new("River discharge", KeywordType::Theme),
    ];
    river.contacts = vec![Contact {
        full_name: Some("Hannaford, Jamie".into()),
        organisation_name: Some("UK Centre for Ecology & Hydrology".into()),
        ..Contact::with_role("author")
    }];

    let mut peat = sample_record(
        PEAT_CARBON_ID,
        "Upland Peat Carbon Stocks in Wales",
        Some("Peat depth and soil carbon stock estimates for upland blanket bog in Wales."),
    );
    peat.publication_date = date(2022, 9, 1);
    peat.spatial_extent = Some(SpatialExtent::new(-4.8, -2.9, 51.6, 53.4));
    peat.keywords = vec![
        Keyword::new("Soil organic carbon", KeywordType::Theme),
        Keyword::new("Peatland", KeywordType::Theme),
        Keyword::new("Wales", KeywordType::Place),
    ];
    peat.contacts = vec![Contact {
        full_name: Some("Evans, Chris".into()),
        organisation_name: Some("Bangor University".into()),
        ..Contact::with_role("author")
    }];

    vec![soil, river, peat]
}
