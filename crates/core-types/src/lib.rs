//! # Shared sales entity model
//!
//! The foundational data structures for the commercial-performance dashboard:
//! the record shapes every source adapter produces and every aggregation
//! consumes, plus the small fixed vocabularies (market segments, deal stages,
//! quarters) and the month-label table.
//!
//! All records are immutable value types: a source adapter produces a whole
//! [`SalesDataBundle`] at load time and nothing mutates it afterwards.

pub mod enums;
pub mod error;
pub mod month;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{segment_fill, DealStage, Quarter, Segment, SEGMENT_PALETTE};
pub use error::CoreError;
pub use structs::{
    AcvByMonth, ArrByMonthPoint, ArrLicenseItem, ArrMinimumItem, ArrMonthDetail, ArrVolumeItem,
    ClientDeal, ClientWinsPoint, DealSegment, ForecastPoint, ForecastPointBySegment, PipelineDeal,
    PipelineStage, QuarterDeal, SalesDataBundle, SalesKpis,
};
