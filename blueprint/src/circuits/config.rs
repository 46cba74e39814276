//! Shape configuration of the assignment table.

use serde::{Deserialize, Serialize};

/// Default number of witness columns
pub const WITNESS_COLUMNS: usize = 15;

/// Column counts of the assignment table and build options.
///
/// Component parameters (bit widths, block counts) stay on the components;
/// this only fixes the table every component is placed into.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub witness_columns: usize,
    pub public_input_columns: usize,
    pub constant_columns: usize,
    pub selector_columns: usize,
    /// Re-check the filled table against the circuit when finalizing a build
    pub self_check: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            witness_columns: WITNESS_COLUMNS,
            public_input_columns: 1,
            constant_columns: 1,
            selector_columns: 16,
            self_check: cfg!(debug_assertions),
        }
    }
}

impl TableConfig {
    #[must_use]
    pub fn witness_columns(mut self, witness_columns: usize) -> Self {
        self.witness_columns = witness_columns;
        self
    }

    #[must_use]
    pub fn public_input_columns(mut self, public_input_columns: usize) -> Self {
        self.public_input_columns = public_input_columns;
        self
    }

    #[must_use]
    pub fn constant_columns(mut self, constant_columns: usize) -> Self {
        self.constant_columns = constant_columns;
        self
    }

    #[must_use]
    pub fn selector_columns(mut self, selector_columns: usize) -> Self {
        self.selector_columns = selector_columns;
        self
    }

    #[must_use]
    pub fn self_check(mut self, self_check: bool) -> Self {
        self.self_check = self_check;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_round_trip() {
        let config = TableConfig::default()
            .witness_columns(9)
            .selector_columns(4)
            .self_check(true);
        let json = serde_json::to_string(&config).unwrap();
        let back: TableConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: TableConfig = serde_json::from_str(r#"{ "witness_columns": 9 }"#).unwrap();
        assert_eq!(config.witness_columns, 9);
        assert_eq!(config.public_input_columns, 1);
        assert_eq!(config.selector_columns, TableConfig::default().selector_columns);
    }
}
