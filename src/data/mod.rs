/// Data layer: core types, loading, and outlier filtering.
///
/// Architecture:
/// ```text
///      .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + sort rows → PendulumDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ PendulumDataset │  Vec<Measurement>, elapsed-seconds axis
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply IQR bound predicates → retained indices
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
