//! Tier specification table.
//!
//! Loaded from a small CSV (`tier,ram,connection,iops`) maintained next to
//! the fleet config. The table is the safety evaluator's source of truth
//! for per-tier capacity limits.

use std::collections::HashMap;
use std::path::Path;

use tracing::warn;

/// Capacity limits for one instance tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierSpec {
    /// RAM in GB.
    pub ram_gb: f64,
    /// Maximum client connections.
    pub max_connections: u32,
    /// Maximum disk IOPS.
    pub max_iops: u32,
}

/// Tier name → capacity limits.
#[derive(Debug, Clone, Default)]
pub struct TierSpecTable {
    specs: HashMap<String, TierSpec>,
}

impl TierSpecTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a tier by name.
    pub fn get(&self, tier: &str) -> Option<&TierSpec> {
        self.specs.get(tier)
    }

    pub fn insert(&mut self, tier: impl Into<String>, spec: TierSpec) {
        self.specs.insert(tier.into(), spec);
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Parse the `tier,ram,connection,iops` CSV format.
    ///
    /// The header row is required. Blank lines and rows with a missing
    /// tier name or unparseable numbers are skipped with a warning rather
    /// than failing the load; a partially usable table still lets the
    /// rest of the fleet be processed.
    pub fn from_csv_str(content: &str) -> Self {
        let mut table = Self::new();
        let mut lines = content.lines();

        let header: Vec<&str> = match lines.next() {
            Some(h) => h.split(',').map(str::trim).collect(),
            None => return table,
        };
        let col = |name: &str| header.iter().position(|h| *h == name);
        let (Some(tier_col), Some(ram_col), Some(conn_col), Some(iops_col)) =
            (col("tier"), col("ram"), col("connection"), col("iops"))
        else {
            warn!("tier spec CSV is missing required columns (tier, ram, connection, iops)");
            return table;
        };

        for (line_no, line) in lines.enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            let field = |i: usize| fields.get(i).copied().unwrap_or("");

            let tier = field(tier_col);
            if tier.is_empty() {
                continue;
            }
            let parsed = (
                field(ram_col).parse::<f64>(),
                field(conn_col).parse::<u32>(),
                field(iops_col).parse::<u32>(),
            );
            match parsed {
                (Ok(ram_gb), Ok(max_connections), Ok(max_iops)) => {
                    table.insert(
                        tier,
                        TierSpec {
                            ram_gb,
                            max_connections,
                            max_iops,
                        },
                    );
                }
                _ => {
                    warn!(line = line_no + 2, tier, "skipping malformed tier spec row");
                }
            }
        }
        table
    }

    /// Load the table from a CSV file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_csv_str(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
tier,ram,connection,iops
M30,8,3000,3000
M40,16,6000,6000
M50,32,16000,16000
";

    #[test]
    fn parses_well_formed_table() {
        let table = TierSpecTable::from_csv_str(SAMPLE);
        assert_eq!(table.len(), 3);
        let m40 = table.get("M40").unwrap();
        assert_eq!(m40.ram_gb, 16.0);
        assert_eq!(m40.max_connections, 6000);
        assert_eq!(m40.max_iops, 6000);
    }

    #[test]
    fn unknown_tier_is_none() {
        let table = TierSpecTable::from_csv_str(SAMPLE);
        assert!(table.get("M400").is_none());
    }

    #[test]
    fn header_column_order_is_flexible() {
        let csv = "iops,tier,connection,ram\n3000,M30,3000,8\n";
        let table = TierSpecTable::from_csv_str(csv);
        assert_eq!(table.get("M30").unwrap().ram_gb, 8.0);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let csv = "tier,ram,connection,iops\nM30,eight,3000,3000\n\nM40,16,6000,6000\n,,,\n";
        let table = TierSpecTable::from_csv_str(csv);
        assert_eq!(table.len(), 1);
        assert!(table.get("M40").is_some());
    }

    #[test]
    fn missing_header_yields_empty_table() {
        let table = TierSpecTable::from_csv_str("M30,8,3000,3000\n");
        assert!(table.is_empty());
    }
}
