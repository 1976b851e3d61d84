//! examlens-report: report rendering for graded attempts.

pub mod html;
