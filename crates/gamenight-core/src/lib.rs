// Library root: the drafting-session model and its presentation policy.
//
// Nothing in this crate performs I/O. Front ends own a `DraftSession`, issue
// mutations through it, and render `presentation::stage_view` snapshots.

pub mod presentation;
pub mod session;
