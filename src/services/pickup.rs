//! Pickup locations from a delimited file.
//!
//! Row format: `agency,level,display name`. The first two columns compose
//! the location id; malformed rows are skipped with a warning.

use crate::error::{IlsError, IlsResult};
use crate::models::PickupLocation;

pub fn parse_locations_file(content: &str) -> Vec<PickupLocation> {
    content
        .lines()
        .enumerate()
        .filter_map(|(line_no, line)| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            let columns: Vec<&str> = line.splitn(3, ',').collect();
            match columns.as_slice() {
                [agency, level, display] => Some(PickupLocation {
                    location_id: format!("{}|{}", agency.trim(), level.trim()),
                    location_display: display.trim().to_string(),
                }),
                _ => {
                    tracing::warn!("skipping malformed pickup location row {}: {}", line_no + 1, line);
                    None
                }
            }
        })
        .collect()
}

pub async fn load_from_file(path: &str) -> IlsResult<Vec<PickupLocation>> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        IlsError::Config(format!("cannot read pickup locations file {}: {}", path, e))
    })?;
    Ok(parse_locations_file(&content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_compose_id_from_first_two_columns() {
        let parsed = parse_locations_file("MZK,1,Main desk\nMZK,2,Branch, annex\n");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].location_id, "MZK|1");
        assert_eq!(parsed[0].location_display, "Main desk");
        // the display column may itself contain commas
        assert_eq!(parsed[1].location_display, "Branch, annex");
    }

    #[test]
    fn malformed_and_blank_rows_are_skipped() {
        let parsed = parse_locations_file("MZK,1,Main desk\n\njust-one-column\nMZK,3\n");
        assert_eq!(parsed.len(), 1);
    }
}
