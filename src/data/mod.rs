/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable → Dataset (required columns checked)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  catalog  │  categorical columns → distinct values (once per load)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  Selection → matching row indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  indicators + time series (every selection change)
///   └───────────┘
/// ```

pub mod aggregate;
pub mod catalog;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
