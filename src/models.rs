use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Top-level shape of a saved arztsuche.116117.de search response.
/// A response without `arztPraxisDatas` is a schema violation and fails hard.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "arztPraxisDatas")]
    pub providers: Vec<Provider>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Provider {
    /// Opaque upstream identifier, sometimes a number, sometimes a string,
    /// sometimes missing entirely.
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tel: String,
    #[serde(default)]
    pub geschlecht: String,
    #[serde(default)]
    pub strasse: String,
    #[serde(default)]
    pub hausnummer: String,
    #[serde(default)]
    pub plz: String,
    #[serde(default)]
    pub ort: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub web: String,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub tsz: Vec<DayEntry>,
}

impl Provider {
    /// Stable dedup key for the identifier; absent and null both map to "".
    pub fn id_key(&self) -> String {
        match &self.id {
            None | Some(serde_json::Value::Null) => String::new(),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

/// One recurring weekly schedule slot (`tsz` entry).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DayEntry {
    #[serde(rename = "t", default)]
    pub day: String,
    #[serde(rename = "tszDesTyps", default)]
    pub blocks: Vec<TypeBlock>,
}

/// Intervals grouped by availability category; only the telephone category
/// is consumed here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TypeBlock {
    #[serde(rename = "typ", default)]
    pub category: String,
    #[serde(rename = "sprechzeiten", default)]
    pub intervals: Vec<RawInterval>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInterval {
    #[serde(rename = "zeit", default)]
    pub text: String,
}

/// A concrete future reachability window resolved against a reference instant.
#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub name: String,
    pub tel: String,
    pub ort: String,
}

/// One row of the exported weekly phone plan sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRow {
    #[serde(rename = "Wochentag")]
    pub wochentag: String,
    #[serde(rename = "Uhrzeit")]
    pub uhrzeit: String,
    #[serde(rename = "Arzt / Ärztin")]
    pub kontakte: String,
}

/// One row of the exported contact sheet.
#[derive(Debug, Clone, Serialize)]
pub struct ContactRow {
    pub id: String,
    pub name: String,
    pub tel: String,
    pub geschlecht: String,
    pub strasse: String,
    pub hausnummer: String,
    pub plz: String,
    pub ort: String,
    pub email: String,
    #[serde(rename = "distanz_in_meter")]
    pub distanz: Option<f64>,
    pub web: String,
    pub telefonische_sprechzeiten: String,
}
