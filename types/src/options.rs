use bitflags::bitflags;

bitflags! {
    /// Options for walking the fields of a type.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct EachFieldOptions: u32 {
        /// Require the top-level type to be a reference type.
        ///
        /// If this is not set, the top-level type is required to be a value
        /// type (a struct or tuple).
        const CLASS_TYPE = 1 << 0;

        /// Skip fields that can't be introspected.
        ///
        /// If not set, the first such field ends the walk and the walk
        /// reports failure.
        const IGNORE_UNKNOWN = 1 << 1;
    }
}

#[cfg(test)]
mod tests {
    use super::EachFieldOptions;

    #[test]
    fn raw_bits_are_stable() {
        assert_eq!(EachFieldOptions::CLASS_TYPE.bits(), 1);
        assert_eq!(EachFieldOptions::IGNORE_UNKNOWN.bits(), 2);
        assert_eq!(EachFieldOptions::default(), EachFieldOptions::empty());
        assert_eq!(
            EachFieldOptions::from_bits_truncate(0xff),
            EachFieldOptions::CLASS_TYPE | EachFieldOptions::IGNORE_UNKNOWN
        );
    }
}
