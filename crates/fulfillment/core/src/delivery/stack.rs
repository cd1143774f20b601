/// Splits `quantity` into stack sizes of `min(remaining, stack_limit)`.
///
/// A zero limit is treated as one. The result has `ceil(quantity / limit)`
/// entries summing to `quantity`.
pub fn split_stacks(quantity: u32, stack_limit: u32) -> Vec<u32> {
    let limit = stack_limit.max(1);
    let mut stacks = Vec::with_capacity(quantity.div_ceil(limit) as usize);
    let mut remaining = quantity;
    while remaining > 0 {
        let count = remaining.min(limit);
        stacks.push(count);
        remaining -= count;
    }
    stacks
}
