use proptest::prelude::*;

use civic_crypto::{derive_address, u64_seed};
use civic_types::Namespace;

proptest! {
    /// Derivation is a pure function of its inputs.
    #[test]
    fn derivation_is_deterministic(
        tag in prop::collection::vec(any::<u8>(), 0..32),
        id in any::<u64>(),
    ) {
        let ns = Namespace::from_label("prop").unwrap();
        let a = derive_address(&[&tag, &u64_seed(id)], &ns).unwrap();
        let b = derive_address(&[&tag, &u64_seed(id)], &ns).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Distinct (poll, candidate) pairs never share an address.
    #[test]
    fn fixed_width_pairs_do_not_collide(
        a in any::<(u64, u64)>(),
        b in any::<(u64, u64)>(),
    ) {
        prop_assume!(a != b);
        let ns = Namespace::from_label("prop").unwrap();
        let addr_a = derive_address(&[b"candidate", &u64_seed(a.0), &u64_seed(a.1)], &ns).unwrap();
        let addr_b = derive_address(&[b"candidate", &u64_seed(b.0), &u64_seed(b.1)], &ns).unwrap();
        prop_assert_ne!(addr_a, addr_b);
    }

    /// Splitting the same bytes differently across seeds changes the address.
    #[test]
    fn seed_split_changes_address(
        bytes in prop::collection::vec(any::<u8>(), 2..32),
        split in 1usize..31,
    ) {
        let split = split.min(bytes.len() - 1);
        let ns = Namespace::default();
        let whole = derive_address(&[&bytes], &ns).unwrap();
        let parts = derive_address(&[&bytes[..split], &bytes[split..]], &ns).unwrap();
        prop_assert_ne!(whole, parts);
    }
}
