/// Length of the longest common suffix of `old` and `new` where elements are
/// considered equal by `eq`.
pub fn common_suffix_len<T>(old: &[T], new: &[T], eq: impl Fn(&T, &T) -> bool) -> usize {
    old.iter()
        .rev()
        .zip(new.iter().rev())
        .take_while(|(a, b)| eq(a, b))
        .count()
}
