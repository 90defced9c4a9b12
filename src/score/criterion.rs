//! The fitness functions.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::crypto::{Address, ADDRESS_NIBBLES};

/// Name of a criterion, as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CriterionKind {
    Least,
    Most,
    Ascending,
    StrictAscending,
    Target,
}

impl CriterionKind {
    pub const ALL: [CriterionKind; 5] = [
        CriterionKind::Least,
        CriterionKind::Most,
        CriterionKind::Ascending,
        CriterionKind::StrictAscending,
        CriterionKind::Target,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CriterionKind::Least => "least",
            CriterionKind::Most => "most",
            CriterionKind::Ascending => "ascending",
            CriterionKind::StrictAscending => "strictAscending",
            CriterionKind::Target => "target",
        }
    }
}

impl FromStr for CriterionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown criterion: {}", s))
    }
}

impl fmt::Display for CriterionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A pure, total ordering over addresses.
///
/// [`Criterion::compare`] returns `Greater` when `a` is the better address.
/// Criteria with an integer score break equal scores with the `least`
/// ordering, so `Equal` is only returned for identical addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    /// Numerically smallest address wins.
    Least,
    /// Numerically largest address wins.
    Most,
    /// Longest non-decreasing nibble prefix wins.
    Ascending,
    /// Longest prefix where each nibble equals or is one above the last.
    StrictAscending,
    /// Longest nibble prefix shared with the given address wins.
    Target(Address),
}

impl Criterion {
    /// Builds a criterion; `target` is only consulted for [`CriterionKind::Target`].
    pub fn from_kind(kind: CriterionKind, target: Option<Address>) -> Option<Self> {
        Some(match kind {
            CriterionKind::Least => Criterion::Least,
            CriterionKind::Most => Criterion::Most,
            CriterionKind::Ascending => Criterion::Ascending,
            CriterionKind::StrictAscending => Criterion::StrictAscending,
            CriterionKind::Target => Criterion::Target(target?),
        })
    }

    pub fn kind(&self) -> CriterionKind {
        match self {
            Criterion::Least => CriterionKind::Least,
            Criterion::Most => CriterionKind::Most,
            Criterion::Ascending => CriterionKind::Ascending,
            Criterion::StrictAscending => CriterionKind::StrictAscending,
            Criterion::Target(_) => CriterionKind::Target,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// The integer score of `address`, for criteria that have one.
    #[inline]
    pub fn score(&self, address: &Address) -> Option<u32> {
        match self {
            Criterion::Least | Criterion::Most => None,
            Criterion::Ascending => Some(ascending_run(address, false)),
            Criterion::StrictAscending => Some(ascending_run(address, true)),
            Criterion::Target(target) => Some(shared_prefix(address, target)),
        }
    }

    /// Compares `a` against `b`; `Greater` means `a` scores better.
    #[inline]
    pub fn compare(&self, a: &Address, b: &Address) -> Ordering {
        let least = b.cmp(a);
        match self {
            Criterion::Least => least,
            Criterion::Most => a.cmp(b),
            _ => self.score(a).cmp(&self.score(b)).then(least),
        }
    }

    /// True when `a` improves on or ties with `b`.
    #[inline]
    pub fn at_least_as_good(&self, a: &Address, b: &Address) -> bool {
        self.compare(a, b) != Ordering::Less
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Target(target) => write!(f, "target({})", target.to_hex_prefixed()),
            other => f.write_str(other.name()),
        }
    }
}

/// Length in nibbles of the leading run where each nibble is at least the
/// previous one. With `strict`, the run also ends on a step of more than one.
///
/// The run starts from an implicit previous nibble of 0.
pub fn ascending_run(address: &Address, strict: bool) -> u32 {
    let mut last = 0u8;
    let mut count = 0;
    for nibble in address.nibbles() {
        if nibble < last || (strict && nibble > last + 1) {
            return count;
        }
        last = nibble;
        count += 1;
    }
    ADDRESS_NIBBLES as u32
}

/// Number of leading nibbles `a` and `b` have in common.
pub fn shared_prefix(a: &Address, b: &Address) -> u32 {
    let mut count = 0;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes()) {
        let diff = x ^ y;
        if diff == 0 {
            count += 2;
            continue;
        }
        if diff & 0xf0 == 0 {
            count += 1;
        }
        break;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(hex_str: &str) -> Address {
        Address::from_hex(hex_str).unwrap()
    }

    const ZEROS: &str = "0000000000000000000000000000000000000000";
    const EFFS: &str = "ffffffffffffffffffffffffffffffffffffffff";

    #[test]
    fn test_least_and_most() {
        let zero = addr(ZEROS);
        let ff = addr(EFFS);
        assert_eq!(Criterion::Least.compare(&zero, &ff), Ordering::Greater);
        assert_eq!(Criterion::Most.compare(&ff, &zero), Ordering::Greater);
        assert_eq!(Criterion::Most.compare(&zero, &ff), Ordering::Less);
        assert_eq!(Criterion::Least.compare(&zero, &zero), Ordering::Equal);
    }

    #[test]
    fn test_least_is_reverse_of_most() {
        let samples = [
            addr(ZEROS),
            addr(EFFS),
            addr("0123456789abcdef0123456789abcdef01234567"),
            addr("0123456789abcdef0123456789abcdef01234568"),
            addr("8000000000000000000000000000000000000000"),
        ];
        for a in &samples {
            for b in &samples {
                let least = Criterion::Least.compare(a, b);
                let most = Criterion::Most.compare(a, b);
                assert_eq!(least, most.reverse());
                assert_eq!(most, a.as_bytes().cmp(b.as_bytes()));
            }
        }
    }

    #[test]
    fn test_ascending_run_bounds() {
        assert_eq!(ascending_run(&addr(ZEROS), false), 40);
        assert_eq!(ascending_run(&addr(EFFS), false), 40);
        assert_eq!(
            ascending_run(&addr("000111222333444555666777888999aaabbbcccd"), false),
            40
        );
        assert_eq!(
            ascending_run(&addr("1234543210000000000000000000000000000000"), false),
            5
        );
    }

    #[test]
    fn test_counting_sequence() {
        let a = addr("0123456789abcdef012300000000000000000000");
        assert_eq!(ascending_run(&a, false), 16);
        assert_eq!(ascending_run(&a, true), 16);
    }

    #[test]
    fn test_strict_run_gaps() {
        // 0,0,1,3: the jump from 1 to 3 ends the strict run only.
        let a = addr("0013000000000000000000000000000000000000");
        assert_eq!(ascending_run(&a, false), 4);
        assert_eq!(ascending_run(&a, true), 3);

        // Runs start from an implicit 0, so a leading 5 is already a gap.
        let b = addr("5678000000000000000000000000000000000000");
        assert_eq!(ascending_run(&b, true), 0);
        assert_eq!(ascending_run(&b, false), 4);
    }

    #[test]
    fn test_strict_never_exceeds_plain() {
        let samples = [
            ZEROS,
            EFFS,
            "0123456789abcdef0123456789abcdef01234567",
            "1122334455667788990000000000000000000000",
            "02468ace00000000000000000000000000000000",
            "ffff000000000000000000000000000000000001",
        ];
        for s in samples {
            let a = addr(s);
            assert!(ascending_run(&a, true) <= ascending_run(&a, false), "{}", s);
        }
    }

    #[test]
    fn test_shared_prefix() {
        let target = addr("deadbeef00000000000000000000000000000000");
        assert_eq!(shared_prefix(&target, &target), 40);
        assert_eq!(
            shared_prefix(&addr("deadbe0000000000000000000000000000000000"), &target),
            6
        );
        assert_eq!(
            shared_prefix(&addr("deadbf0000000000000000000000000000000000"), &target),
            5
        );
        assert_eq!(
            shared_prefix(&addr("0eadbeef00000000000000000000000000000000"), &target),
            0
        );
        assert_eq!(
            shared_prefix(&addr("deadbeef00000000000000000000000000000001"), &target),
            39
        );
    }

    #[test]
    fn test_score_ties_fall_back_to_least() {
        let a = addr("1000000000000000000000000000000000000000");
        let b = addr("1000000000000000000000000000000000000001");
        assert_eq!(Criterion::Ascending.score(&a), Criterion::Ascending.score(&b));
        assert_eq!(Criterion::Ascending.compare(&a, &b), Ordering::Greater);
        assert_eq!(Criterion::Ascending.compare(&b, &a), Ordering::Less);
    }

    #[test]
    fn test_target_prefers_longer_prefix() {
        let target = addr("cafe000000000000000000000000000000000000");
        let criterion = Criterion::Target(target);
        let near = addr("cafe100000000000000000000000000000000000");
        let far = addr("ca00000000000000000000000000000000000000");
        assert_eq!(criterion.compare(&near, &far), Ordering::Greater);
        assert_eq!(criterion.score(&near), Some(4));
        assert!(criterion.at_least_as_good(&target, &near));
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("least".parse::<CriterionKind>(), Ok(CriterionKind::Least));
        assert_eq!(
            "strictAscending".parse::<CriterionKind>(),
            Ok(CriterionKind::StrictAscending)
        );
        assert_eq!(
            "STRICTASCENDING".parse::<CriterionKind>(),
            Ok(CriterionKind::StrictAscending)
        );
        assert!("prefixes".parse::<CriterionKind>().is_err());
        assert_eq!(Criterion::from_kind(CriterionKind::Target, None), None);
    }
}
