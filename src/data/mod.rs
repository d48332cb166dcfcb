/// Data layer: core types, loading, filtering and export.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → NutritionTable (rounded, columns checked)
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ NutritionTable │  header + Vec<MenuItem>, immutable
///   └────────────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ filter / pipeline │  AND-chain of row predicates → Selection
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  Selection → CSV
///   └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
