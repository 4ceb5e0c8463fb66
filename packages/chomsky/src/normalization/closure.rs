use std::hash::Hash;

use indexmap::IndexSet;

/// Grows `set` with whatever `rule` derives from it until a full pass adds nothing.
///
/// `rule` must be monotone: a larger set never derives fewer elements. The loop
/// then terminates after at most as many passes as there are possible elements.
pub(crate) fn fixpoint<T, F>(mut set: IndexSet<T>, mut rule: F) -> IndexSet<T>
where
    T: Hash + Eq,
    F: FnMut(&IndexSet<T>) -> Vec<T>,
{
    loop {
        let derived = rule(&set);
        let size = set.len();

        set.extend(derived);

        if set.len() == size {
            return set;
        }
    }
}
