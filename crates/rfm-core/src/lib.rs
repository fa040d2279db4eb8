//! RFM scoring and segmentation engine.
//!
//! [`analyze`] drives the whole pipeline over any [`TransactionSource`]:
//!
//! 1. **Extract**: one [`CustomerMetrics`](rfm_model::CustomerMetrics) per
//!    customer from the transaction rows.
//! 2. **Rank**: each metric becomes a rank in `1..=K`, by quantile bins with a
//!    dense-rank fallback, or by fixed intervals.
//! 3. **Score**: weighted composite score and rank code.
//! 4. **Segment**: score bands or an ordered rule table.
//! 5. **Summarize**: per-segment statistics.
//!
//! ```ignore
//! use rfm_core::analyze;
//! use rfm_model::RfmParameters;
//!
//! let result = analyze(&df, &RfmParameters::default())?;
//! println!("{} customers", result.summary.total_customers);
//! ```

pub mod datetime;
pub mod extract;
pub mod pipeline;
pub mod rank;
pub mod score;
pub mod segment;
pub mod source;
pub mod stats;
pub mod summary;

pub use extract::{Extraction, extract_metrics};
pub use pipeline::analyze;
pub use rank::{fixed_ranks, middle_rank, quantile_ranks, rank_customers};
pub use score::{composite_score, rank_code};
pub use segment::{Level, Predicate, Rule, RuleTable, Segmenter, score_band};
pub use source::TransactionSource;
pub use summary::build_summary;
