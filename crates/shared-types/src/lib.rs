pub mod document;
pub mod finding;
pub mod reference;
pub mod report;

pub use document::{Document, Paragraph, Section, PREAMBLE_SECTION_ID};
pub use finding::{AdjudicationStatus, Evidence, Finding, Severity};
pub use reference::ReferenceChunk;
pub use report::{Issue, Report};
