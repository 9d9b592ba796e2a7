/// An index into the clause arena.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ClauseRef(pub(crate) usize);
