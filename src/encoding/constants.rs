/// `Null` marker, `n`.
pub(crate) const NULL: u8 = b'n';
/// `true` marker, `t`.
pub(crate) const TRUE: u8 = b't';
/// `false` marker, `f`.
pub(crate) const FALSE: u8 = b'f';
/// Integer start marker, `i`.
pub(crate) const INTEGER: u8 = b'i';
/// Text start marker, `u`.
pub(crate) const TEXT: u8 = b'u';
/// List start marker, `l`.
pub(crate) const LIST: u8 = b'l';
/// Dictionary start marker, `d`.
pub(crate) const DICTIONARY: u8 = b'd';
/// Terminator for integers, lists, and dictionaries, `e`.
pub(crate) const END: u8 = b'e';
/// Separates a length prefix from its payload, `:`.
pub(crate) const LEN_SEP: u8 = b':';
/// Sign of a negative integer, `-`.
pub(crate) const MINUS: u8 = b'-';
