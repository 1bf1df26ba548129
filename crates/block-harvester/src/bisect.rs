// Copyright 2025-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::{cmp::Ordering, future::Future};

/// Binary search for the smallest height in `[lower, upper)` whose
/// probe does not come back [`Ordering::Less`], returning `upper` when
/// every probe does.
///
/// The probe compares the value at a height against the target the
/// caller has in mind, may perform I/O, and may fail; the first error
/// aborts the search. Over a strictly increasing sequence this returns
/// the first height at or above the target. An exact hit returns as
/// soon as the midpoint lands on it, without bisecting all the way
/// down.
pub async fn ceiling<F, Fut, E>(
    mut lower: u64,
    mut upper: u64,
    mut probe: F,
) -> Result<u64, E>
where
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = Result<Ordering, E>>,
{
    while lower < upper {
        let mid = lower + (upper - lower) / 2;
        match probe(mid).await? {
            Ordering::Less => lower = mid + 1,
            Ordering::Equal => return Ok(mid),
            Ordering::Greater => upper = mid,
        }
    }
    Ok(lower)
}
