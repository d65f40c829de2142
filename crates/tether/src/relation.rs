//! Association access on rows.
//!
//! Associations are addressed through the source model's association map,
//! either by association accessor or by alias.

mod belongs_to;
