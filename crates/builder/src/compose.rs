//! Field-list composition across inheritance layers.

use indexmap::IndexSet;

/// Union of `prior` (kept in its order) and the names of `declared` not
/// already present, in `declared` order.
///
/// Re-applying an already-included list returns `prior` unchanged.
pub fn compose<S: AsRef<str>>(declared: &[S], prior: &[String]) -> Vec<String> {
    let mut names: IndexSet<&str> = prior.iter().map(String::as_str).collect();
    for name in declared {
        names.insert(name.as_ref());
    }
    names.into_iter().map(str::to_owned).collect()
}
