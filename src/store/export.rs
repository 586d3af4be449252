use std::fmt;

use csv::WriterBuilder;
use tracing::debug;

use super::error::ExportError;
use crate::route::Route;

/// Column names of the CSV export, in order.
pub const CSV_HEADER: [&str; 5] = ["latitude", "longitude", "timestamp", "accuracy", "route_name"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => f.write_str("JSON"),
            ExportFormat::Csv => f.write_str("CSV"),
        }
    }
}

/// A serialized route, ready to be offered as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Serialize `route` without touching any store.
pub fn export(route: &Route, format: ExportFormat) -> Result<Export, ExportError> {
    let bytes = match format {
        ExportFormat::Json => to_json(route)?,
        ExportFormat::Csv => to_csv(route)?,
    };

    debug!(
        route_id = %route.id(),
        format = %format,
        bytes = bytes.len(),
        "Exported route"
    );

    Ok(Export {
        file_name: export_file_name(route, format),
        content_type: format.content_type(),
        bytes,
    })
}

/// `{name with whitespace runs replaced by underscores}_{id}.{ext}`
pub fn export_file_name(route: &Route, format: ExportFormat) -> String {
    let stem = route.name().split_whitespace().collect::<Vec<_>>().join("_");
    let stem = match (
        route.name().starts_with(char::is_whitespace),
        route.name().ends_with(char::is_whitespace),
    ) {
        (true, true) => format!("_{stem}_"),
        (true, false) => format!("_{stem}"),
        (false, true) => format!("{stem}_"),
        (false, false) => stem,
    };

    format!("{stem}_{}.{}", route.id(), format.extension())
}

fn to_json(route: &Route) -> Result<Vec<u8>, ExportError> {
    Ok(serde_json::to_vec_pretty(route)?)
}

fn to_csv(route: &Route) -> Result<Vec<u8>, ExportError> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;

    for sample in route.samples() {
        wtr.write_record([
            sample.latitude.to_string(),
            sample.longitude.to_string(),
            sample.captured_at.to_string(),
            sample
                .accuracy_meters
                .map(|accuracy| accuracy.to_string())
                .unwrap_or_default(),
            route.name().to_string(),
        ])?;
    }

    wtr.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rstest::rstest;

    use super::*;
    use crate::route::RouteId;
    use crate::sample::CoordinateSample;

    fn route_named(name: &str) -> Route {
        let start = Timestamp::from_second(1_700_000_000).unwrap();
        Route::finalize(
            RouteId::generate(),
            name,
            vec![
                CoordinateSample::new(-23.55052, -46.633308, start, Some(7.25)),
                CoordinateSample::new(-23.5505, -46.6333, start, None),
            ],
            start,
            Timestamp::from_second(1_700_000_005).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_json_round_trip() {
        let route = route_named("Morning Run");

        let export = export(&route, ExportFormat::Json).unwrap();
        let parsed: Route = serde_json::from_slice(&export.bytes).unwrap();

        assert_eq!(parsed, route);
        assert_eq!(export.content_type, "application/json");
    }

    #[test]
    fn test_json_is_indented_two_spaces() {
        let route = route_named("Morning Run");

        let json = String::from_utf8(export(&route, ExportFormat::Json).unwrap().bytes).unwrap();
        assert!(json.starts_with("{\n  \"id\": "));
    }

    #[test]
    fn test_csv_layout() {
        let route = route_named("Morning Run");

        let csv = String::from_utf8(export(&route, ExportFormat::Csv).unwrap().bytes).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "latitude,longitude,timestamp,accuracy,route_name");
        assert_eq!(
            lines[1],
            "-23.55052,-46.633308,2023-11-14T22:13:20Z,7.25,Morning Run"
        );
        assert_eq!(lines[2], "-23.5505,-46.6333,2023-11-14T22:13:20Z,,Morning Run");
    }

    #[test]
    fn test_csv_quotes_names_with_commas() {
        let route = route_named("Run, then walk");

        let csv = String::from_utf8(export(&route, ExportFormat::Csv).unwrap().bytes).unwrap();
        assert!(csv.lines().nth(1).unwrap().ends_with(",\"Run, then walk\""));
    }

    #[rstest]
    #[case("Morning Run", ExportFormat::Json, "Morning_Run")]
    #[case("Morning   Run", ExportFormat::Csv, "Morning_Run")]
    #[case("Lap\t1", ExportFormat::Json, "Lap_1")]
    #[case(" City Tour", ExportFormat::Csv, "_City_Tour")]
    fn test_file_name(#[case] name: &str, #[case] format: ExportFormat, #[case] stem: &str) {
        let route = route_named(name);

        let expected = format!("{stem}_{}.{}", route.id(), format.extension());
        assert_eq!(export_file_name(&route, format), expected);
    }
}
