use smallvec::SmallVec;

/// Decimal digits of a `usize`, most significant first.
pub(crate) type Digits = SmallVec<[u8; 20]>;

/// Converts a `usize` to its minimal ASCII decimal representation.
///
/// # Arguments
///
/// * `num: usize` - The length to be converted.
///
/// # Example
///
/// ```ignore
/// assert_eq!(&usize_to_digits(0)[..], b"0");
/// assert_eq!(&usize_to_digits(1024)[..], b"1024");
/// ```
pub(crate) fn usize_to_digits(mut num: usize) -> Digits {
    let mut out = Digits::new();
    loop {
        out.push(b'0' + (num % 10) as u8);
        num /= 10;
        if num == 0 {
            break;
        }
    }
    out.reverse();
    out
}

/// Number of decimal digits in a `usize`.
pub(crate) fn decimal_len(mut num: usize) -> usize {
    let mut len = 1;
    while num >= 10 {
        num /= 10;
        len += 1;
    }
    len
}

#[macro_export]
/// Helper macro to compose `From` implementations.
macro_rules! compose_from {
    ($to:tt, $mid:tt, $from:ty) => {
        impl From<$from> for $to {
            fn from(f: $from) -> Self { Self::from($mid::from(f)) }
        }
    };
}

#[macro_export]
/// Helper macro to make implementing `From` easier.
macro_rules! from_fn {
    ($to:ty, $from:ty, $fn:expr) => {
        impl From<$from> for $to {
            fn from(f: $from) -> $to { $fn(f) }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits() {
        assert_eq!(&usize_to_digits(0)[..], b"0");
        assert_eq!(&usize_to_digits(7)[..], b"7");
        assert_eq!(&usize_to_digits(10)[..], b"10");
        assert_eq!(&usize_to_digits(1024)[..], b"1024");
        assert_eq!(
            usize_to_digits(usize::max_value()).to_vec(),
            usize::max_value().to_string().into_bytes()
        );
    }

    #[test]
    fn digit_counts() {
        for n in &[0usize, 9, 10, 99, 100, 12345, usize::max_value()] {
            assert_eq!(decimal_len(*n), n.to_string().len());
        }
    }
}
