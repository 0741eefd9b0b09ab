//! redline-core - windowed diff rendering and change citations
//!
//! This crate holds the display logic for a document comparison result:
//! - [`window`]: compute which diff lines intersect a scrolled viewport
//! - [`citation`]: locate a changelog entry's fragment in the diff text
//! - [`session`]: the comparison lifecycle that feeds both

pub mod citation;
pub mod comparison;
pub mod document;
pub mod scroll;
pub mod session;
pub mod signal;
pub mod window;

pub use citation::{find_citation, resolve_citations, Citation};
pub use comparison::{Change, Changelog, ComparisonError, DocumentComparisonResult};
pub use document::{DiffDocument, LineKind};
pub use scroll::SmoothScroll;
pub use session::{ComparisonSession, SessionError, Stage};
pub use signal::{SignalHub, Subscription, ViewportSignal};
pub use window::{
    visible_range, DiffViewport, RenderedLine, ViewportState, VisibleRange, WindowConfig,
};
