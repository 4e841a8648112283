pub use crate::cmp::IsIdentical;
pub use crate::graph::Graph;
pub use crate::iso::{IsIsomorphic, TryIntoIsomorphism};
pub use crate::search::{is_isomorphic, Isomorphism, Outcome};
