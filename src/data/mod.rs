/// Data layer: core types, loading, profiling and chart planning.
///
/// Architecture:
/// ```text
///  .csv / .xlsx / .xls / .xlsb / .ods  (bytes + file name)
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse + coerce column types → Table
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  schema  │   │ profile  │  shape, numeric set / summary, missing counts
///   └──────────┘   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ planner  │  numeric set + request → chart series / matrix
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod planner;
pub mod profile;
pub mod schema;
pub mod stats;
