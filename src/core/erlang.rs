//! Erlang-B capacity table and channel lookup.

use crate::domain::ports::Storage;
use crate::utils::error::{CalcError, Result};

/// One Grade-of-Service column of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct GosColumn {
    /// Header label as it appears in the file, e.g. `"2%"`.
    pub label: String,
    /// Blocking probability as a fraction, e.g. `0.02`.
    pub gos: f64,
    /// Maximum offered traffic (Erlang) per row.
    capacities: Vec<f64>,
}

impl GosColumn {
    pub fn capacities(&self) -> &[f64] {
        &self.capacities
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelLookup {
    pub column: String,
    pub channels: u32,
    /// True when no row could carry the traffic and the row count was returned instead.
    pub saturated: bool,
}

/// Immutable Erlang-B table: rows ordered by channel count, one column per GoS.
#[derive(Debug, Clone)]
pub struct ErlangTable {
    channels: Vec<u32>,
    columns: Vec<GosColumn>,
}

impl ErlangTable {
    /// Reads the table through `storage`. A missing file is reported as a missing resource.
    pub async fn load<S: Storage>(storage: &S, path: &str) -> Result<Self> {
        tracing::debug!("Loading Erlang-B table from: {}", path);
        let bytes = storage.read_file(path).await.map_err(|e| match e {
            CalcError::IoError(source) => CalcError::MissingResourceError {
                path: path.to_string(),
                source,
            },
            other => other,
        })?;

        let table = Self::from_reader(bytes.as_slice())?;
        tracing::info!(
            "📶 Erlang-B table loaded: {} rows x {} GoS columns",
            table.row_count(),
            table.columns.len()
        );
        Ok(table)
    }

    /// Parses CSV with a channel-count column followed by `<percent>%` columns.
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        if headers.len() < 2 {
            return Err(CalcError::TableFormatError {
                message: "table needs a channel column and at least one GoS column".to_string(),
            });
        }

        let mut columns = headers
            .iter()
            .skip(1)
            .map(|label| -> Result<GosColumn> {
                Ok(GosColumn {
                    label: label.to_string(),
                    gos: parse_gos_label(label)?,
                    capacities: Vec::new(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut channels = Vec::new();
        for (row_index, record) in csv_reader.records().enumerate() {
            let record = record?;
            let line = row_index + 2;

            let count = record.get(0).unwrap_or_default();
            channels.push(count.parse::<u32>().map_err(|_| CalcError::TableFormatError {
                message: format!("line {}: invalid channel count '{}'", line, count),
            })?);

            for (column, cell) in columns.iter_mut().zip(record.iter().skip(1)) {
                let capacity = cell.parse::<f64>().map_err(|_| CalcError::TableFormatError {
                    message: format!(
                        "line {}: invalid capacity '{}' in column '{}'",
                        line, cell, column.label
                    ),
                })?;
                column.capacities.push(capacity);
            }
        }

        Ok(Self { channels, columns })
    }

    pub fn row_count(&self) -> usize {
        self.channels.len()
    }

    pub fn columns(&self) -> &[GosColumn] {
        &self.columns
    }

    /// Column whose GoS is numerically closest to `gos`; the first one wins a tie.
    pub fn closest_column(&self, gos: f64) -> Result<&GosColumn> {
        if !(0.0..=1.0).contains(&gos) {
            return Err(CalcError::invalid_input(
                "gos",
                "Grade of Service (GOS) must be between 0 and 1",
            ));
        }

        let mut best: Option<&GosColumn> = None;
        for column in &self.columns {
            match best {
                Some(current) if (column.gos - gos).abs() >= (current.gos - gos).abs() => {}
                _ => best = Some(column),
            }
        }
        best.ok_or_else(|| CalcError::TableFormatError {
            message: "table has no GoS columns".to_string(),
        })
    }

    /// Smallest channel count whose capacity at the closest GoS carries `traffic`.
    ///
    /// A match returns the value of the table's first (`N`) column for that row, not
    /// the row's position. The two agree only for tables whose `N` starts at 0, as the
    /// bundled one does; a table starting at `N = 1` reports one more than the index.
    /// Falls back to the row count when the traffic exceeds the table or is negative.
    pub fn channels_for(&self, gos: f64, traffic: f64) -> Result<ChannelLookup> {
        let column = self.closest_column(gos)?;

        let found = if traffic >= 0.0 {
            column
                .capacities
                .iter()
                .position(|&capacity| capacity >= traffic)
        } else {
            None
        };

        match found {
            Some(row) => Ok(ChannelLookup {
                column: column.label.clone(),
                channels: self.channels[row],
                saturated: false,
            }),
            None => {
                tracing::warn!(
                    "⚠️ Traffic {:.2} Erlang is too high or invalid for GoS column '{}'; assuming {} channels",
                    traffic,
                    column.label,
                    self.row_count()
                );
                Ok(ChannelLookup {
                    column: column.label.clone(),
                    channels: self.row_count() as u32,
                    saturated: true,
                })
            }
        }
    }
}

fn parse_gos_label(label: &str) -> Result<f64> {
    let percent = label.trim().trim_end_matches('%').trim();
    match percent.parse::<f64>() {
        Ok(value) if (0.0..=100.0).contains(&value) => Ok(value / 100.0),
        _ => Err(CalcError::TableFormatError {
            message: format!("invalid GoS column label '{}'", label),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_TABLE: &str = "\
N,1%,2%,5%
0,0.000,0.000,0.000
1,0.010,0.020,0.052
2,0.152,0.223,0.381
3,0.455,0.602,0.899
4,0.869,1.092,1.524
5,1.360,1.657,2.218
";

    struct InMemoryStorage(Option<Vec<u8>>);

    impl Storage for InMemoryStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.0.clone().ok_or_else(|| {
                CalcError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }
    }

    fn small_table() -> ErlangTable {
        ErlangTable::from_reader(SMALL_TABLE.as_bytes()).unwrap()
    }

    #[test]
    fn test_parse_table_shape() {
        let table = small_table();
        assert_eq!(table.row_count(), 6);
        let labels: Vec<&str> = table.columns().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["1%", "2%", "5%"]);
        assert_eq!(table.columns()[1].gos, 0.02);
        assert_eq!(table.columns()[2].capacities()[3], 0.899);
    }

    #[test]
    fn test_closest_column_selects_two_percent() {
        let table = small_table();
        assert_eq!(table.closest_column(0.02).unwrap().label, "2%");
        assert_eq!(table.closest_column(0.019).unwrap().label, "2%");
        assert_eq!(table.closest_column(0.0).unwrap().label, "1%");
        assert_eq!(table.closest_column(1.0).unwrap().label, "5%");
    }

    #[test]
    fn test_gos_out_of_range_is_invalid_input() {
        let table = small_table();
        for gos in [-0.01, 1.5, f64::NAN] {
            match table.channels_for(gos, 1.0) {
                Err(CalcError::InvalidInputError { field, .. }) => assert_eq!(field, "gos"),
                other => panic!("expected invalid input, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_channels_for_first_sufficient_row() {
        let table = small_table();
        let lookup = table.channels_for(0.02, 0.5).unwrap();
        assert_eq!(lookup.column, "2%");
        assert_eq!(lookup.channels, 3);
        assert!(!lookup.saturated);

        // 剛好等於容量也算足夠
        assert_eq!(table.channels_for(0.02, 0.602).unwrap().channels, 3);
        assert_eq!(table.channels_for(0.02, 0.0).unwrap().channels, 0);
    }

    #[test]
    fn test_channels_for_falls_back_to_row_count() {
        let table = small_table();

        let too_high = table.channels_for(0.05, 50.0).unwrap();
        assert_eq!(too_high.channels, 6);
        assert!(too_high.saturated);

        let negative = table.channels_for(0.05, -1.0).unwrap();
        assert_eq!(negative.channels, 6);
        assert!(negative.saturated);
    }

    #[test]
    fn test_channels_come_from_first_column() {
        let table = ErlangTable::from_reader(
            "N,2%\n1,0.020\n2,0.223\n3,0.602\n".as_bytes(),
        )
        .unwrap();
        assert_eq!(table.channels_for(0.02, 0.1).unwrap().channels, 2);

        let beyond = table.channels_for(0.02, 5.0).unwrap();
        assert!(beyond.saturated);
        assert_eq!(beyond.channels, 3);
    }

    #[test]
    fn test_labels_with_whitespace_are_accepted() {
        let table = ErlangTable::from_reader("N, 0.5% ,10\n0,0,0\n1,0.005,0.111\n".as_bytes()).unwrap();
        assert_eq!(table.columns()[0].gos, 0.005);
        assert_eq!(table.columns()[1].gos, 0.1);
    }

    #[test]
    fn test_malformed_tables_are_rejected() {
        assert!(matches!(
            ErlangTable::from_reader("N,abc%\n0,0\n".as_bytes()),
            Err(CalcError::TableFormatError { .. })
        ));
        assert!(matches!(
            ErlangTable::from_reader("N,1%\nx,0\n".as_bytes()),
            Err(CalcError::TableFormatError { .. })
        ));
        assert!(matches!(
            ErlangTable::from_reader("N,1%\n0,oops\n".as_bytes()),
            Err(CalcError::TableFormatError { .. })
        ));
        assert!(ErlangTable::from_reader("N\n0\n".as_bytes()).is_err());
    }

    #[test]
    fn test_load_through_storage() {
        let storage = InMemoryStorage(Some(SMALL_TABLE.as_bytes().to_vec()));
        let table = tokio_test::block_on(ErlangTable::load(&storage, "erlang.csv")).unwrap();
        assert_eq!(table.row_count(), 6);
    }

    #[test]
    fn test_load_missing_file_is_missing_resource() {
        let storage = InMemoryStorage(None);
        let result = tokio_test::block_on(ErlangTable::load(&storage, "nowhere.csv"));
        match result {
            Err(CalcError::MissingResourceError { path, .. }) => assert_eq!(path, "nowhere.csv"),
            other => panic!("expected missing resource, got {:?}", other),
        }
    }

    #[test]
    fn test_bundled_table() {
        let table = ErlangTable::from_reader(
            include_str!("../../data/erlang_b_table.csv").as_bytes(),
        )
        .unwrap();
        assert_eq!(table.row_count(), 201);
        assert_eq!(table.columns().len(), 17);
        assert_eq!(table.closest_column(0.02).unwrap().label, "2%");
        assert_eq!(table.channels_for(0.02, 5.0).unwrap().channels, 10);
        assert_eq!(table.channels_for(0.012, 5.0).unwrap().channels, 11);
    }
}
