/// Length of the longest common prefix of `old` and `new` where elements are
/// considered equal by `eq`.
pub fn common_prefix_len<T>(old: &[T], new: &[T], eq: impl Fn(&T, &T) -> bool) -> usize {
    old.iter().zip(new).take_while(|(a, b)| eq(a, b)).count()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_common_prefix_len() {
        let eq = |a: &u8, b: &u8| a == b;

        assert_eq!(common_prefix_len(b"", b"", eq), 0);
        assert_eq!(common_prefix_len(b"foobarbaz", b"foobarblah", eq), 7);
        assert_eq!(common_prefix_len(b"foobarbaz", b"blablabla", eq), 0);
        assert_eq!(common_prefix_len(&b"foobarbaz"[3..], &b"foobarblah"[3..], eq), 4);
    }

    #[test]
    fn test_common_prefix_len_with_custom_equality() {
        let eq = |a: &u8, b: &u8| a.eq_ignore_ascii_case(b);

        assert_eq!(common_prefix_len(b"HeLLo world", b"hello there", eq), 6);
    }
}
