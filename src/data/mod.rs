/// Data layer: core types, row filtering, and loading.
///
/// Architecture:
/// ```text
///  .csv / .txt / .dat
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  split records (csv crate or whitespace runs)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  fields → Observation, or MalformedRow (skipped, counted)
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ LightCurve │  Vec<Observation> sorted by time, Summary statistics
///   └────────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
