//! The visible-set pipeline: search, filter predicates, sort, paginate.
//!
//! Stages run in a fixed order over the current snapshot:
//! free-text search, then AND-combined filter predicates, then a stable
//! sort, then pagination. Every stage is a pure function, so each rule
//! is testable in isolation; [`QueryState`] holds the user-driven inputs
//! and their transition rules.

mod page;
mod predicate;
mod search;
mod sort;
mod state;

pub use page::PagePlan;
pub use page::paginate;
pub use page::plan;
pub use predicate::FilterPanel;
pub use predicate::Predicate;
pub use predicate::PredicateSet;
pub use predicate::filter_rows;
pub use search::search_rows;
pub use sort::Direction;
pub use sort::compare_values;
pub use sort::sort_rows;
pub use state::QueryState;
