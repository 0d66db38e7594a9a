use trait_set::trait_set;

use crate::search::SearchProgress;

trait_set!
{
    /// Trait for any callback that can receive [search progress](SearchProgress) reports from a [driver](crate::search::SearchDriver).
    pub trait ProgressFn = FnMut(&SearchProgress) + Send;

    /// Trait for any callback that a [driver](crate::search::SearchDriver) polls before every attempt, returning true stops the search.
    pub trait StopFn = FnMut() -> bool + Send;
}
