//! Static resolution of scalar positions in a query document.

mod input;
mod output;

pub use input::resolve_input_paths;
pub use output::resolve_output_paths;

use crate::json_ext::Path;

/// One position holding a value of a transformable scalar type.
///
/// Input paths always start at a variable name; output paths are relative to
/// the top-level response object and use response keys (alias if present,
/// else field name). Array nesting is implicit, see
/// [`map_at_path`](crate::map_at_path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarPath {
    /// Name of the scalar type found at `path`.
    pub type_name: String,

    /// Where values of that type live.
    pub path: Path,
}
