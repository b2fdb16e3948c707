//! Search submission: criteria, form rendering, response classification,
//! and the paginated results protocol.

pub mod criteria;
pub mod datatables;
pub mod form;
pub mod outcome;
