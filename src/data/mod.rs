//! Data layer: core types, loading, filtering and aggregation.
//!
//! Architecture:
//! ```text
//!  .xlsx / .csv / .parquet / .json
//!        │
//!        ▼
//!   ┌──────────┐      ┌─────────┐
//!   │  loader   │ ───▶ │  infer   │  cells → column kinds, text dates promoted
//!   └──────────┘      └─────────┘
//!        │  (memoized by `cache`)
//!        ▼
//!   ┌──────────┐
//!   │  Table    │  immutable columns, shared as Arc<Table>
//!   └──────────┘
//!        │
//!        ├──▶ catalog   distinct values per column, wildcard first
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  per-column selections → derived Table
//!   └──────────┘
//!        │
//!        ├──▶ aggregate   top-N groups, trend, shares
//!        ├──▶ metrics     rows / mean / sum
//!        └──▶ export      delimited bytes
//! ```

pub mod aggregate;
pub mod cache;
pub mod catalog;
pub mod export;
pub mod filter;
pub mod infer;
pub mod loader;
pub mod metrics;
pub mod model;
